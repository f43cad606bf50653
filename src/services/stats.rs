//! Statistics service

use chrono::{Duration, Utc};
use sqlx::Row;

use crate::{
    api::stats::{ActivityStats, ClientStats, DeviceStats, EmployeeStats, StatEntry, StatsResponse},
    error::AppResult,
    models::history::HistoryAction,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get inventory statistics
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let pool = &self.repository.pool;

        // Device stats
        let total_devices: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM devices")
            .fetch_one(pool)
            .await?;

        let assigned_devices: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM devices WHERE assigned_to IS NOT NULL AND NOT retired",
        )
        .fetch_one(pool)
        .await?;

        let available_devices: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM devices WHERE assigned_to IS NULL AND NOT retired",
        )
        .fetch_one(pool)
        .await?;

        let retired_devices: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM devices WHERE retired")
                .fetch_one(pool)
                .await?;

        let devices_by_type = sqlx::query(
            r#"
            SELECT LOWER(device_type) as label, COUNT(*) as value
            FROM devices
            WHERE NOT retired
            GROUP BY LOWER(device_type)
            ORDER BY value DESC
            "#,
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| StatEntry {
            label: row.get("label"),
            value: row.get("value"),
        })
        .collect();

        let devices_by_condition = sqlx::query(
            r#"
            SELECT condition as label, COUNT(*) as value
            FROM devices
            WHERE NOT retired
            GROUP BY condition
            ORDER BY value DESC
            "#,
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| StatEntry {
            label: row.get("label"),
            value: row.get("value"),
        })
        .collect();

        // Employee stats
        let total_employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(pool)
            .await?;

        let active_employees: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE status = 0")
                .fetch_one(pool)
                .await?;

        let holders: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT assigned_to) FROM devices WHERE assigned_to IS NOT NULL",
        )
        .fetch_one(pool)
        .await?;

        // Client stats
        let total_clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(pool)
            .await?;

        // Recent activity from the history log
        let since = Utc::now() - Duration::days(30);
        let recent_assignments = self
            .repository
            .history
            .count_since(HistoryAction::Assigned, since)
            .await?;
        let recent_returns = self
            .repository
            .history
            .count_since(HistoryAction::Unassigned, since)
            .await?
            + self
                .repository
                .history
                .count_since(HistoryAction::Returned, since)
                .await?;

        Ok(StatsResponse {
            devices: DeviceStats {
                total: total_devices,
                available: available_devices,
                assigned: assigned_devices,
                retired: retired_devices,
                by_type: devices_by_type,
                by_condition: devices_by_condition,
            },
            employees: EmployeeStats {
                total: total_employees,
                active: active_employees,
                resigned: total_employees - active_employees,
                holders,
            },
            clients: ClientStats {
                total: total_clients,
            },
            activity: ActivityStats {
                assignments_last_30_days: recent_assignments,
                returns_last_30_days: recent_returns,
            },
        })
    }
}
