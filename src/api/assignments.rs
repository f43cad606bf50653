//! Assignment lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        device::{Device, DeviceCondition},
        history::{HistoryDetails, HistoryQuery},
    },
};

use super::{AuthenticatedUser, PaginatedResponse};

/// Assign request
#[derive(Deserialize, ToSchema)]
pub struct AssignRequest {
    /// Employee receiving the device
    pub employee_id: i32,
    pub reason: Option<String>,
}

/// Unassign request
#[derive(Deserialize, ToSchema)]
pub struct UnassignRequest {
    /// Condition of the device as returned; defaults to its current one
    pub condition: Option<DeviceCondition>,
    pub reason: Option<String>,
}

/// Retire / restore request
#[derive(Deserialize, Default, ToSchema)]
pub struct LifecycleRequest {
    pub reason: Option<String>,
}

/// Assignment response
#[derive(Serialize, ToSchema)]
pub struct AssignmentResponse {
    pub status: String,
    pub device: Device,
}

/// Assign a device to an employee
#[utoipa::path(
    post,
    path = "/devices/{id}/assign",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Device ID")
    ),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Device assigned", body = AssignmentResponse),
        (status = 404, description = "Device or employee not found"),
        (status = 422, description = "Device already assigned, retired, or employee resigned")
    )
)]
pub async fn assign_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(device_id): Path<i32>,
    Json(request): Json<AssignRequest>,
) -> AppResult<Json<AssignmentResponse>> {
    let device = state
        .services
        .assignments
        .assign(device_id, request.employee_id, request.reason.as_deref())
        .await?;

    Ok(Json(AssignmentResponse {
        status: "assigned".to_string(),
        device,
    }))
}

/// Unassign a device from its holder
#[utoipa::path(
    post,
    path = "/devices/{id}/unassign",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Device ID")
    ),
    request_body = UnassignRequest,
    responses(
        (status = 200, description = "Device unassigned", body = AssignmentResponse),
        (status = 404, description = "Device not found"),
        (status = 422, description = "Device is not assigned")
    )
)]
pub async fn unassign_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(device_id): Path<i32>,
    Json(request): Json<UnassignRequest>,
) -> AppResult<Json<AssignmentResponse>> {
    let device = state
        .services
        .assignments
        .unassign(device_id, request.condition, request.reason.as_deref())
        .await?;

    Ok(Json(AssignmentResponse {
        status: "unassigned".to_string(),
        device,
    }))
}

/// Retire a device from service
#[utoipa::path(
    post,
    path = "/devices/{id}/retire",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Device ID")
    ),
    request_body = LifecycleRequest,
    responses(
        (status = 200, description = "Device retired", body = AssignmentResponse),
        (status = 404, description = "Device not found"),
        (status = 422, description = "Device is already retired")
    )
)]
pub async fn retire_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(device_id): Path<i32>,
    Json(request): Json<LifecycleRequest>,
) -> AppResult<Json<AssignmentResponse>> {
    let device = state
        .services
        .assignments
        .retire(device_id, request.reason.as_deref())
        .await?;

    Ok(Json(AssignmentResponse {
        status: "retired".to_string(),
        device,
    }))
}

/// Bring a retired device back into service
#[utoipa::path(
    post,
    path = "/devices/{id}/restore",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Device ID")
    ),
    request_body = LifecycleRequest,
    responses(
        (status = 200, description = "Device restored", body = AssignmentResponse),
        (status = 404, description = "Device not found"),
        (status = 422, description = "Device is not retired")
    )
)]
pub async fn restore_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(device_id): Path<i32>,
    Json(request): Json<LifecycleRequest>,
) -> AppResult<Json<AssignmentResponse>> {
    let device = state
        .services
        .assignments
        .restore(device_id, request.reason.as_deref())
        .await?;

    Ok(Json(AssignmentResponse {
        status: "restored".to_string(),
        device,
    }))
}

/// Global history feed with filters and pagination
#[utoipa::path(
    get,
    path = "/history",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(
        ("device_id" = Option<i32>, Query, description = "Filter by device"),
        ("employee_id" = Option<i32>, Query, description = "Filter by employee"),
        ("action" = Option<String>, Query, description = "Filter by action"),
        ("since" = Option<String>, Query, description = "Events at or after this instant (ISO 8601)"),
        ("until" = Option<String>, Query, description = "Events at or before this instant (ISO 8601)"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "History feed, newest first", body = PaginatedResponse<HistoryDetails>)
    )
)]
pub async fn list_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<PaginatedResponse<HistoryDetails>>> {
    let (entries, total) = state.services.assignments.search_history(&query).await?;

    Ok(Json(PaginatedResponse {
        items: entries,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(50),
    }))
}
