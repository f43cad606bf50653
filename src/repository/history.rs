//! Device history repository. The log is append-only: this module exposes
//! reads and a transactional append used by the assignment flows.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::AppResult,
    models::{
        device::DeviceCondition,
        history::{HistoryAction, HistoryDetails, HistoryQuery},
    },
};

/// Append a history row inside the caller's transaction so the log entry
/// commits or rolls back with the device write it records.
pub async fn append_history(
    tx: &mut Transaction<'_, Postgres>,
    device_id: i32,
    employee_id: Option<i32>,
    action: HistoryAction,
    condition: Option<DeviceCondition>,
    reason: Option<&str>,
    recorded_at: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO device_history (device_id, employee_id, action, condition, reason, recorded_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(device_id)
    .bind(employee_id)
    .bind(action)
    .bind(condition)
    .bind(reason)
    .bind(recorded_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[derive(Clone)]
pub struct HistoryRepository {
    pool: Pool<Postgres>,
}

impl HistoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Full history of one device, newest first
    pub async fn get_for_device(&self, device_id: i32) -> AppResult<Vec<HistoryDetails>> {
        let entries = sqlx::query_as::<_, HistoryDetails>(
            r#"
            SELECT h.id, h.device_id, d.tag as device_tag, h.employee_id,
                   CASE WHEN e.id IS NULL THEN NULL
                        ELSE e.firstname || ' ' || e.lastname END as employee_name,
                   h.action, h.condition, h.reason, h.recorded_at
            FROM device_history h
            JOIN devices d ON h.device_id = d.id
            LEFT JOIN employees e ON h.employee_id = e.id
            WHERE h.device_id = $1
            ORDER BY h.recorded_at DESC, h.id DESC
            "#,
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Full history of one employee, newest first
    pub async fn get_for_employee(&self, employee_id: i32) -> AppResult<Vec<HistoryDetails>> {
        let entries = sqlx::query_as::<_, HistoryDetails>(
            r#"
            SELECT h.id, h.device_id, d.tag as device_tag, h.employee_id,
                   e.firstname || ' ' || e.lastname as employee_name,
                   h.action, h.condition, h.reason, h.recorded_at
            FROM device_history h
            JOIN devices d ON h.device_id = d.id
            JOIN employees e ON h.employee_id = e.id
            WHERE h.employee_id = $1
            ORDER BY h.recorded_at DESC, h.id DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Paginated global event feed with filters
    pub async fn search(&self, query: &HistoryQuery) -> AppResult<(Vec<HistoryDetails>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(50).clamp(1, 200);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut idx = 0;

        let mut device_id = None;
        let mut employee_id = None;
        let mut action = None;
        let mut since = None;
        let mut until = None;

        if let Some(id) = query.device_id {
            idx += 1;
            conditions.push(format!("h.device_id = ${}", idx));
            device_id = Some(id);
        }
        if let Some(id) = query.employee_id {
            idx += 1;
            conditions.push(format!("h.employee_id = ${}", idx));
            employee_id = Some(id);
        }
        if let Some(a) = query.action {
            idx += 1;
            conditions.push(format!("h.action = ${}", idx));
            action = Some(a);
        }
        if let Some(t) = query.since {
            idx += 1;
            conditions.push(format!("h.recorded_at >= ${}", idx));
            since = Some(t);
        }
        if let Some(t) = query.until {
            idx += 1;
            conditions.push(format!("h.recorded_at <= ${}", idx));
            until = Some(t);
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        macro_rules! bind_all {
            ($builder:expr) => {{
                let mut b = $builder;
                if let Some(v) = device_id {
                    b = b.bind(v);
                }
                if let Some(v) = employee_id {
                    b = b.bind(v);
                }
                if let Some(v) = action {
                    b = b.bind(v);
                }
                if let Some(v) = since {
                    b = b.bind(v);
                }
                if let Some(v) = until {
                    b = b.bind(v);
                }
                b
            }};
        }

        let count_query = format!("SELECT COUNT(*) FROM device_history h {}", where_clause);
        let total = bind_all!(sqlx::query_scalar::<_, i64>(&count_query))
            .fetch_one(&self.pool)
            .await?;

        let select_query = format!(
            r#"
            SELECT h.id, h.device_id, d.tag as device_tag, h.employee_id,
                   CASE WHEN e.id IS NULL THEN NULL
                        ELSE e.firstname || ' ' || e.lastname END as employee_name,
                   h.action, h.condition, h.reason, h.recorded_at
            FROM device_history h
            JOIN devices d ON h.device_id = d.id
            LEFT JOIN employees e ON h.employee_id = e.id
            {}
            ORDER BY h.recorded_at DESC, h.id DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );

        let entries = bind_all!(sqlx::query_as::<_, HistoryDetails>(&select_query))
            .fetch_all(&self.pool)
            .await?;

        Ok((entries, total))
    }

    /// Count events of one action since a given instant
    pub async fn count_since(&self, action: HistoryAction, since: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM device_history WHERE action = $1 AND recorded_at >= $2",
        )
        .bind(action)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
