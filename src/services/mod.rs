//! Business logic services

pub mod assignments;
pub mod auth;
pub mod clients;
pub mod devices;
pub mod employees;
pub mod stats;

use sqlx::{Pool, Postgres};

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    /// Kept for readiness probes
    pub pool: Pool<Postgres>,
    pub auth: auth::AuthService,
    pub devices: devices::DevicesService,
    pub assignments: assignments::AssignmentsService,
    pub employees: employees::EmployeesService,
    pub clients: clients::ClientsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            pool: repository.pool.clone(),
            auth: auth::AuthService::new(repository.clone(), auth_config),
            devices: devices::DevicesService::new(repository.clone()),
            assignments: assignments::AssignmentsService::new(repository.clone()),
            employees: employees::EmployeesService::new(repository.clone()),
            clients: clients::ClientsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
