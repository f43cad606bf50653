//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Device statistics
    pub devices: DeviceStats,
    /// Employee statistics
    pub employees: EmployeeStats,
    /// Client statistics
    pub clients: ClientStats,
    /// Recent activity from the history log
    pub activity: ActivityStats,
}

#[derive(Serialize, ToSchema)]
pub struct DeviceStats {
    /// Total number of devices (including retired)
    pub total: i64,
    pub available: i64,
    pub assigned: i64,
    pub retired: i64,
    /// Active devices by type
    pub by_type: Vec<StatEntry>,
    /// Active devices by condition
    pub by_condition: Vec<StatEntry>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeStats {
    pub total: i64,
    pub active: i64,
    pub resigned: i64,
    /// Employees currently holding at least one device
    pub holders: i64,
}

#[derive(Serialize, ToSchema)]
pub struct ClientStats {
    pub total: i64,
}

#[derive(Serialize, ToSchema)]
pub struct ActivityStats {
    pub assignments_last_30_days: i64,
    pub returns_last_30_days: i64,
}

#[derive(Serialize, ToSchema)]
pub struct StatEntry {
    /// Label
    pub label: String,
    /// Value
    pub value: i64,
}

/// Get inventory statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inventory statistics", body = StatsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
