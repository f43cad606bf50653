//! Devices repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        device::{
            format_tag, parse_tag, type_code, CreateDevice, Device, DeviceCondition, DeviceQuery,
            DeviceRow, DeviceShort, DeviceShortRow, DeviceStatus, UpdateDevice,
        },
        history::HistoryAction,
    },
    repository::history::append_history,
};

#[derive(Clone)]
pub struct DevicesRepository {
    pool: Pool<Postgres>,
}

impl DevicesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get device by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Device> {
        let row = sqlx::query_as::<_, DeviceRow>("SELECT * FROM devices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device with id {} not found", id)))?;

        Ok(row.into())
    }

    /// Get device by tag (case-insensitive)
    pub async fn get_by_tag(&self, tag: &str) -> AppResult<Option<Device>> {
        let row = sqlx::query_as::<_, DeviceRow>(
            "SELECT * FROM devices WHERE UPPER(tag) = UPPER($1)",
        )
        .bind(tag)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Check if a tag already exists
    pub async fn tag_exists(&self, tag: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM devices WHERE UPPER(tag) = UPPER($1) AND id != $2)",
            )
            .bind(tag)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM devices WHERE UPPER(tag) = UPPER($1))")
                .bind(tag)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Next generated tag for a device type. Scans existing generated tags
    /// for the type code and takes the highest sequence plus one.
    pub async fn next_tag(&self, device_type: &str) -> AppResult<String> {
        let code = type_code(device_type);

        let tags: Vec<String> = sqlx::query_scalar(
            "SELECT tag FROM devices WHERE tag LIKE $1",
        )
        .bind(format!("JOII{}%", code))
        .fetch_all(&self.pool)
        .await?;

        let max_seq = tags
            .iter()
            .filter_map(|t| parse_tag(t))
            .filter(|(c, _)| *c == code)
            .map(|(_, seq)| seq)
            .max()
            .unwrap_or(0);

        Ok(format_tag(&code, max_seq + 1))
    }

    /// Search devices with pagination
    pub async fn search(&self, query: &DeviceQuery) -> AppResult<(Vec<DeviceShort>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref search) = query.search {
            params.push(format!("%{}%", search.to_lowercase()));
            conditions.push(format!(
                "(LOWER(d.tag) LIKE ${i} OR LOWER(d.brand) LIKE ${i} OR LOWER(d.model) LIKE ${i})",
                i = params.len()
            ));
        }

        if let Some(ref device_type) = query.device_type {
            params.push(device_type.to_lowercase());
            conditions.push(format!("LOWER(d.device_type) = ${}", params.len()));
        }

        if let Some(condition) = query.condition {
            params.push(condition.as_str().to_string());
            conditions.push(format!("d.condition = ${}", params.len()));
        }

        match query.status {
            Some(DeviceStatus::Available) => {
                conditions.push("d.assigned_to IS NULL AND NOT d.retired".to_string())
            }
            Some(DeviceStatus::Assigned) => {
                conditions.push("d.assigned_to IS NOT NULL AND NOT d.retired".to_string())
            }
            Some(DeviceStatus::Retired) => conditions.push("d.retired".to_string()),
            None => {
                if !query.include_retired.unwrap_or(false) {
                    conditions.push("NOT d.retired".to_string());
                }
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM devices d {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            r#"
            SELECT d.id, d.tag, d.device_type, d.brand, d.model, d.condition,
                   d.retired, d.assigned_to,
                   CASE WHEN e.id IS NULL THEN NULL
                        ELSE e.firstname || ' ' || e.lastname END as holder_name
            FROM devices d
            LEFT JOIN employees e ON d.assigned_to = e.id
            {}
            ORDER BY d.tag
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );

        let mut select_builder = sqlx::query_as::<_, DeviceShortRow>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let devices = select_builder
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((devices, total))
    }

    /// Devices currently held by an employee
    pub async fn get_by_holder(&self, employee_id: i32) -> AppResult<Vec<DeviceShort>> {
        let devices = sqlx::query_as::<_, DeviceShortRow>(
            r#"
            SELECT d.id, d.tag, d.device_type, d.brand, d.model, d.condition,
                   d.retired, d.assigned_to,
                   e.firstname || ' ' || e.lastname as holder_name
            FROM devices d
            JOIN employees e ON d.assigned_to = e.id
            WHERE d.assigned_to = $1
            ORDER BY d.tag
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(devices.into_iter().map(Into::into).collect())
    }

    /// Create a new device with the given (already validated) tag
    pub async fn create(&self, device: &CreateDevice, tag: &str) -> AppResult<Device> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO devices (tag, device_type, brand, model, condition, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id
            "#,
        )
        .bind(tag)
        .bind(&device.device_type)
        .bind(&device.brand)
        .bind(&device.model)
        .bind(device.condition.unwrap_or(DeviceCondition::Good))
        .bind(&device.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing device
    pub async fn update(&self, id: i32, device: &UpdateDevice) -> AppResult<Device> {
        let now = Utc::now();

        let mut sets = vec!["updated_at = $1".to_string()];
        let mut param_idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(device.tag, "tag");
        add_field!(device.device_type, "device_type");
        add_field!(device.brand, "brand");
        add_field!(device.model, "model");
        add_field!(device.condition, "condition");
        add_field!(device.notes, "notes");
        let _ = param_idx;

        let query = format!("UPDATE devices SET {} WHERE id = {}", sets.join(", "), id);

        let mut builder = sqlx::query(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(device.tag);
        bind_field!(device.device_type);
        bind_field!(device.brand);
        bind_field!(device.model);
        if let Some(condition) = device.condition {
            builder = builder.bind(condition);
        }
        bind_field!(device.notes);

        builder.execute(&self.pool).await?;

        self.get_by_id(id).await
    }

    /// Delete a device. Refused while assigned; force also drops history
    /// (ON DELETE CASCADE).
    pub async fn delete(&self, id: i32, force: bool) -> AppResult<()> {
        let device = self.get_by_id(id).await?;

        if device.assigned_to.is_some() && !force {
            return Err(AppError::BusinessRule(
                ErrorCode::DeviceAlreadyAssigned,
                "Device is assigned. Unassign it first or use force=true.".to_string(),
            ));
        }

        let history_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM device_history WHERE device_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if history_count > 0 && !force {
            return Err(AppError::BusinessRule(
                ErrorCode::Failure,
                "Device has history entries. Retire it instead, or use force=true.".to_string(),
            ));
        }

        sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Assign a device to an employee. Device update and history append run
    /// in one transaction.
    pub async fn assign(
        &self,
        device_id: i32,
        employee_id: i32,
        reason: Option<&str>,
    ) -> AppResult<Device> {
        let now = Utc::now();
        let device = self.get_by_id(device_id).await?;

        if device.retired {
            return Err(AppError::BusinessRule(
                ErrorCode::DeviceRetired,
                format!("Device {} is retired", device.tag),
            ));
        }

        if let Some(holder) = device.assigned_to {
            return Err(AppError::BusinessRule(
                ErrorCode::DeviceAlreadyAssigned,
                format!("Device {} is already assigned to employee {}", device.tag, holder),
            ));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE devices SET assigned_to = $1, assigned_date = $2, updated_at = $2 WHERE id = $3",
        )
        .bind(employee_id)
        .bind(now)
        .bind(device_id)
        .execute(&mut *tx)
        .await?;

        append_history(
            &mut tx,
            device_id,
            Some(employee_id),
            HistoryAction::Assigned,
            Some(device.condition),
            reason,
            now,
        )
        .await?;

        tx.commit().await?;

        self.get_by_id(device_id).await
    }

    /// Unassign a device, recording the returned condition
    pub async fn unassign(
        &self,
        device_id: i32,
        action: HistoryAction,
        condition: Option<DeviceCondition>,
        reason: Option<&str>,
    ) -> AppResult<Device> {
        let now = Utc::now();
        let device = self.get_by_id(device_id).await?;

        let holder = device.assigned_to.ok_or_else(|| {
            AppError::BusinessRule(
                ErrorCode::DeviceNotAssigned,
                format!("Device {} is not assigned", device.tag),
            )
        })?;

        let condition = condition.unwrap_or(device.condition);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE devices
            SET assigned_to = NULL, assigned_date = NULL, condition = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(condition)
        .bind(now)
        .bind(device_id)
        .execute(&mut *tx)
        .await?;

        append_history(
            &mut tx,
            device_id,
            Some(holder),
            action,
            Some(condition),
            reason,
            now,
        )
        .await?;

        tx.commit().await?;

        self.get_by_id(device_id).await
    }

    /// Retire a device. A held device is returned first, in the same
    /// transaction.
    pub async fn retire(&self, device_id: i32, reason: Option<&str>) -> AppResult<Device> {
        let now = Utc::now();
        let device = self.get_by_id(device_id).await?;

        if device.retired {
            return Err(AppError::BusinessRule(
                ErrorCode::DeviceRetired,
                format!("Device {} is already retired", device.tag),
            ));
        }

        let mut tx = self.pool.begin().await?;

        if let Some(holder) = device.assigned_to {
            sqlx::query(
                "UPDATE devices SET assigned_to = NULL, assigned_date = NULL, updated_at = $1 WHERE id = $2",
            )
            .bind(now)
            .bind(device_id)
            .execute(&mut *tx)
            .await?;

            append_history(
                &mut tx,
                device_id,
                Some(holder),
                HistoryAction::Returned,
                Some(device.condition),
                reason,
                now,
            )
            .await?;
        }

        sqlx::query("UPDATE devices SET retired = TRUE, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(device_id)
            .execute(&mut *tx)
            .await?;

        append_history(
            &mut tx,
            device_id,
            None,
            HistoryAction::Retired,
            Some(device.condition),
            reason,
            now,
        )
        .await?;

        tx.commit().await?;

        self.get_by_id(device_id).await
    }

    /// Bring a retired device back into service
    pub async fn restore(&self, device_id: i32, reason: Option<&str>) -> AppResult<Device> {
        let now = Utc::now();
        let device = self.get_by_id(device_id).await?;

        if !device.retired {
            return Err(AppError::BusinessRule(
                ErrorCode::BadValue,
                format!("Device {} is not retired", device.tag),
            ));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE devices SET retired = FALSE, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(device_id)
            .execute(&mut *tx)
            .await?;

        append_history(
            &mut tx,
            device_id,
            None,
            HistoryAction::Restored,
            Some(device.condition),
            reason,
            now,
        )
        .await?;

        tx.commit().await?;

        self.get_by_id(device_id).await
    }

    /// Return every device held by an employee (resignation flow). All
    /// device updates and history rows commit atomically.
    pub async fn return_all_for_employee(
        &self,
        employee_id: i32,
        reason: Option<&str>,
    ) -> AppResult<i64> {
        let now = Utc::now();

        let held: Vec<(i32, DeviceCondition)> = sqlx::query_as(
            "SELECT id, condition FROM devices WHERE assigned_to = $1",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        if held.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        for (device_id, condition) in &held {
            sqlx::query(
                "UPDATE devices SET assigned_to = NULL, assigned_date = NULL, updated_at = $1 WHERE id = $2",
            )
            .bind(now)
            .bind(device_id)
            .execute(&mut *tx)
            .await?;

            append_history(
                &mut tx,
                *device_id,
                Some(employee_id),
                HistoryAction::Returned,
                Some(*condition),
                reason,
                now,
            )
            .await?;
        }

        tx.commit().await?;

        Ok(held.len() as i64)
    }

    /// Count devices held by an employee
    pub async fn count_held_by(&self, employee_id: i32) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM devices WHERE assigned_to = $1")
                .bind(employee_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
