//! Repository layer for database operations

pub mod clients;
pub mod devices;
pub mod employees;
pub mod history;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub devices: devices::DevicesRepository,
    pub employees: employees::EmployeesRepository,
    pub clients: clients::ClientsRepository,
    pub history: history::HistoryRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            devices: devices::DevicesRepository::new(pool.clone()),
            employees: employees::EmployeesRepository::new(pool.clone()),
            clients: clients::ClientsRepository::new(pool.clone()),
            history: history::HistoryRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}
