//! Device inventory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::device::{CreateDevice, Device, DeviceQuery, DeviceShort, UpdateDevice},
    models::history::HistoryDetails,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List devices with search and pagination
#[utoipa::path(
    get,
    path = "/devices",
    tag = "devices",
    security(("bearer_auth" = [])),
    params(
        ("search" = Option<String>, Query, description = "Search over tag, brand, model"),
        ("device_type" = Option<String>, Query, description = "Filter by device type"),
        ("status" = Option<String>, Query, description = "Filter by status (available, assigned, retired)"),
        ("condition" = Option<String>, Query, description = "Filter by condition"),
        ("include_retired" = Option<bool>, Query, description = "Include retired devices"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "List of devices", body = PaginatedResponse<DeviceShort>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_devices(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<DeviceQuery>,
) -> AppResult<Json<PaginatedResponse<DeviceShort>>> {
    let (devices, total) = state.services.devices.search(&query).await?;

    Ok(Json(PaginatedResponse {
        items: devices,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get device details by ID
#[utoipa::path(
    get,
    path = "/devices/{id}",
    tag = "devices",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Device details", body = Device),
        (status = 404, description = "Device not found")
    )
)]
pub async fn get_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Device>> {
    let device = state.services.devices.get_by_id(id).await?;
    Ok(Json(device))
}

/// Create a new device
#[utoipa::path(
    post,
    path = "/devices",
    tag = "devices",
    security(("bearer_auth" = [])),
    request_body = CreateDevice,
    responses(
        (status = 201, description = "Device created", body = Device),
        (status = 400, description = "Invalid input"),
        (status = 422, description = "Tag already in use")
    )
)]
pub async fn create_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(device): Json<CreateDevice>,
) -> AppResult<(StatusCode, Json<Device>)> {
    device
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.devices.create(device).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing device
#[utoipa::path(
    put,
    path = "/devices/{id}",
    tag = "devices",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Device ID")
    ),
    request_body = UpdateDevice,
    responses(
        (status = 200, description = "Device updated", body = Device),
        (status = 404, description = "Device not found"),
        (status = 422, description = "Tag already in use")
    )
)]
pub async fn update_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(device): Json<UpdateDevice>,
) -> AppResult<Json<Device>> {
    device
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.devices.update(id, device).await?;
    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct DeleteDeviceParams {
    pub force: Option<bool>,
}

/// Delete a device
#[utoipa::path(
    delete,
    path = "/devices/{id}",
    tag = "devices",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Device ID"),
        ("force" = Option<bool>, Query, description = "Force delete even when assigned or with history")
    ),
    responses(
        (status = 204, description = "Device deleted"),
        (status = 404, description = "Device not found"),
        (status = 422, description = "Device is assigned or has history")
    )
)]
pub async fn delete_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(params): Query<DeleteDeviceParams>,
) -> AppResult<StatusCode> {
    state
        .services
        .devices
        .delete(id, params.force.unwrap_or(false))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Tag generation request
#[derive(Deserialize, ToSchema)]
pub struct GenerateTagRequest {
    pub device_type: String,
}

/// Tag generation response
#[derive(Serialize, ToSchema)]
pub struct GenerateTagResponse {
    /// Next free generated tag for the type
    pub tag: String,
}

/// Preview the next generated tag for a device type
#[utoipa::path(
    post,
    path = "/devices/tags/generate",
    tag = "devices",
    security(("bearer_auth" = [])),
    request_body = GenerateTagRequest,
    responses(
        (status = 200, description = "Next tag", body = GenerateTagResponse)
    )
)]
pub async fn generate_tag(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<GenerateTagRequest>,
) -> AppResult<Json<GenerateTagResponse>> {
    let tag = state.services.devices.next_tag(&request.device_type).await?;
    Ok(Json(GenerateTagResponse { tag }))
}

/// Get a device's assignment history
#[utoipa::path(
    get,
    path = "/devices/{id}/history",
    tag = "devices",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "History entries, newest first", body = Vec<HistoryDetails>),
        (status = 404, description = "Device not found")
    )
)]
pub async fn get_device_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<HistoryDetails>>> {
    let history = state.services.devices.get_history(id).await?;
    Ok(Json(history))
}
