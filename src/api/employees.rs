//! Employee management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        device::DeviceShort,
        employee::{CreateEmployee, Employee, EmployeeQuery, EmployeeShort, ResignEmployee, UpdateEmployee},
        history::HistoryDetails,
    },
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List employees with search and pagination
#[utoipa::path(
    get,
    path = "/employees",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(
        ("name" = Option<String>, Query, description = "Search by name"),
        ("client_id" = Option<i32>, Query, description = "Filter by client"),
        ("department" = Option<String>, Query, description = "Filter by department"),
        ("include_resigned" = Option<bool>, Query, description = "Include resigned employees"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "List of employees", body = PaginatedResponse<EmployeeShort>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_employees(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EmployeeQuery>,
) -> AppResult<Json<PaginatedResponse<EmployeeShort>>> {
    let (employees, total) = state.services.employees.search(&query).await?;

    Ok(Json(PaginatedResponse {
        items: employees,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get employee details by ID
#[utoipa::path(
    get,
    path = "/employees/{id}",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee details", body = Employee),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Employee>> {
    let employee = state.services.employees.get_by_id(id).await?;
    Ok(Json(employee))
}

/// Create a new employee
#[utoipa::path(
    post,
    path = "/employees",
    tag = "employees",
    security(("bearer_auth" = [])),
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Referenced client not found")
    )
)]
pub async fn create_employee(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(employee): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    employee
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.employees.create(employee).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing employee
#[utoipa::path(
    put,
    path = "/employees/{id}",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn update_employee(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(employee): Json<UpdateEmployee>,
) -> AppResult<Json<Employee>> {
    employee
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.employees.update(id, employee).await?;
    Ok(Json(updated))
}

/// Mark an employee resigned
#[utoipa::path(
    post,
    path = "/employees/{id}/resign",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Employee ID")
    ),
    request_body = ResignEmployee,
    responses(
        (status = 200, description = "Employee resigned", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Already resigned or still holds devices")
    )
)]
pub async fn resign_employee(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<ResignEmployee>,
) -> AppResult<Json<Employee>> {
    let employee = state.services.employees.resign(id, request).await?;
    Ok(Json(employee))
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Employee ID")
    ),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Employee still holds devices")
    )
)]
pub async fn delete_employee(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.employees.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Devices currently held by an employee
#[utoipa::path(
    get,
    path = "/employees/{id}/devices",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Held devices", body = Vec<DeviceShort>),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee_devices(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<DeviceShort>>> {
    let devices = state.services.employees.get_devices(id).await?;
    Ok(Json(devices))
}

/// Assignment history of an employee
#[utoipa::path(
    get,
    path = "/employees/{id}/history",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "History entries, newest first", body = Vec<HistoryDetails>),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<HistoryDetails>>> {
    let history = state.services.employees.get_history(id).await?;
    Ok(Json(history))
}
