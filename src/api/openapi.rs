//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{assignments, auth, clients, devices, employees, health, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AIMS API",
        version = "1.0.0",
        description = "Assets & Inventory Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::update_profile,
        // Devices
        devices::list_devices,
        devices::get_device,
        devices::create_device,
        devices::update_device,
        devices::delete_device,
        devices::generate_tag,
        devices::get_device_history,
        // Assignments
        assignments::assign_device,
        assignments::unassign_device,
        assignments::retire_device,
        assignments::restore_device,
        assignments::list_history,
        // Employees
        employees::list_employees,
        employees::get_employee,
        employees::create_employee,
        employees::update_employee,
        employees::resign_employee,
        employees::delete_employee,
        employees::get_employee_devices,
        employees::get_employee_history,
        // Clients
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::update_role,
        users::delete_user,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Devices
            crate::models::device::Device,
            crate::models::device::DeviceShort,
            crate::models::device::DeviceQuery,
            crate::models::device::CreateDevice,
            crate::models::device::UpdateDevice,
            crate::models::device::DeviceCondition,
            crate::models::device::DeviceStatus,
            devices::GenerateTagRequest,
            devices::GenerateTagResponse,
            // Assignments
            assignments::AssignRequest,
            assignments::UnassignRequest,
            assignments::LifecycleRequest,
            assignments::AssignmentResponse,
            crate::models::history::HistoryAction,
            crate::models::history::HistoryDetails,
            crate::models::history::HistoryQuery,
            // Employees
            crate::models::employee::Employee,
            crate::models::employee::EmployeeShort,
            crate::models::employee::EmployeeQuery,
            crate::models::employee::EmployeeStatus,
            crate::models::employee::CreateEmployee,
            crate::models::employee::UpdateEmployee,
            crate::models::employee::ResignEmployee,
            // Clients
            crate::models::client::Client,
            crate::models::client::ClientShort,
            crate::models::client::ClientQuery,
            crate::models::client::CreateClient,
            crate::models::client::UpdateClient,
            // Users
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::UserQuery,
            crate::models::user::Role,
            crate::models::user::UserStatus,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateProfile,
            users::UpdateRole,
            // Stats
            stats::StatsResponse,
            stats::DeviceStats,
            stats::EmployeeStats,
            stats::ClientStats,
            stats::ActivityStats,
            stats::StatEntry,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "devices", description = "Device inventory management"),
        (name = "assignments", description = "Assignment lifecycle and history"),
        (name = "employees", description = "Employee management"),
        (name = "clients", description = "Client management"),
        (name = "users", description = "Application user management"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
