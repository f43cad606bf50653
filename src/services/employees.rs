//! Employee management service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        device::DeviceShort,
        employee::{CreateEmployee, Employee, EmployeeQuery, EmployeeShort, ResignEmployee, UpdateEmployee},
        history::HistoryDetails,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EmployeesService {
    repository: Repository,
}

impl EmployeesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Employee> {
        self.repository.employees.get_by_id(id).await
    }

    pub async fn search(&self, query: &EmployeeQuery) -> AppResult<(Vec<EmployeeShort>, i64)> {
        self.repository.employees.search(query).await
    }

    /// Create an employee. A client reference must point at a real client.
    pub async fn create(&self, employee: CreateEmployee) -> AppResult<Employee> {
        if let Some(client_id) = employee.client_id {
            self.repository.clients.get_by_id(client_id).await?;
        }
        self.repository.employees.create(&employee).await
    }

    pub async fn update(&self, id: i32, employee: UpdateEmployee) -> AppResult<Employee> {
        self.repository.employees.get_by_id(id).await?;
        if let Some(client_id) = employee.client_id {
            self.repository.clients.get_by_id(client_id).await?;
        }
        self.repository.employees.update(id, &employee).await
    }

    /// Mark an employee resigned. Held devices block the resignation unless
    /// return_devices is set, in which case they are returned with history
    /// entries first.
    pub async fn resign(&self, id: i32, request: ResignEmployee) -> AppResult<Employee> {
        let employee = self.repository.employees.get_by_id(id).await?;

        if employee.status == crate::models::employee::EmployeeStatus::Resigned {
            return Err(AppError::BusinessRule(
                ErrorCode::EmployeeResigned,
                format!("{} has already resigned", employee.full_name()),
            ));
        }

        let held = self.repository.devices.count_held_by(id).await?;
        if held > 0 {
            if !request.return_devices.unwrap_or(false) {
                return Err(AppError::BusinessRule(
                    ErrorCode::EmployeeHasDevices,
                    format!(
                        "{} still holds {} device(s). Pass return_devices=true to return them.",
                        employee.full_name(),
                        held
                    ),
                ));
            }

            let returned = self
                .repository
                .devices
                .return_all_for_employee(id, Some("Employee resignation"))
                .await?;
            tracing::info!(employee = id, returned, "devices returned on resignation");
        }

        let date = request.date.unwrap_or_else(Utc::now);
        self.repository
            .employees
            .resign(id, date, request.reason.as_deref())
            .await
    }

    /// Delete an employee. Refused while devices are held.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.employees.get_by_id(id).await?;

        let held = self.repository.devices.count_held_by(id).await?;
        if held > 0 {
            return Err(AppError::BusinessRule(
                ErrorCode::EmployeeHasDevices,
                format!("Employee still holds {} device(s)", held),
            ));
        }

        self.repository.employees.delete(id).await
    }

    /// Devices currently held by an employee
    pub async fn get_devices(&self, id: i32) -> AppResult<Vec<DeviceShort>> {
        self.repository.employees.get_by_id(id).await?;
        self.repository.devices.get_by_holder(id).await
    }

    /// Assignment history of one employee, newest first
    pub async fn get_history(&self, id: i32) -> AppResult<Vec<HistoryDetails>> {
        self.repository.employees.get_by_id(id).await?;
        self.repository.history.get_for_employee(id).await
    }
}
