//! Assignment lifecycle service: who holds which device, when it moved,
//! and why. Every transition appends to the device history log in the same
//! transaction as the device write.

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        device::{Device, DeviceCondition},
        employee::EmployeeStatus,
        history::{HistoryAction, HistoryDetails, HistoryQuery},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AssignmentsService {
    repository: Repository,
}

impl AssignmentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Assign a device to an employee
    pub async fn assign(
        &self,
        device_id: i32,
        employee_id: i32,
        reason: Option<&str>,
    ) -> AppResult<Device> {
        let employee = self.repository.employees.get_by_id(employee_id).await?;

        if employee.status == EmployeeStatus::Resigned {
            return Err(AppError::BusinessRule(
                ErrorCode::EmployeeResigned,
                format!("{} has resigned and cannot receive assignments", employee.full_name()),
            ));
        }

        let device = self
            .repository
            .devices
            .assign(device_id, employee_id, reason)
            .await?;

        tracing::info!(
            device = %device.tag,
            employee = employee_id,
            "device assigned"
        );

        Ok(device)
    }

    /// Unassign a device, snapshotting its returned condition
    pub async fn unassign(
        &self,
        device_id: i32,
        condition: Option<DeviceCondition>,
        reason: Option<&str>,
    ) -> AppResult<Device> {
        let device = self
            .repository
            .devices
            .unassign(device_id, HistoryAction::Unassigned, condition, reason)
            .await?;

        tracing::info!(device = %device.tag, "device unassigned");

        Ok(device)
    }

    /// Retire a device from service
    pub async fn retire(&self, device_id: i32, reason: Option<&str>) -> AppResult<Device> {
        let device = self.repository.devices.retire(device_id, reason).await?;
        tracing::info!(device = %device.tag, "device retired");
        Ok(device)
    }

    /// Bring a retired device back into service
    pub async fn restore(&self, device_id: i32, reason: Option<&str>) -> AppResult<Device> {
        self.repository.devices.restore(device_id, reason).await
    }

    /// Paginated global history feed
    pub async fn search_history(
        &self,
        query: &HistoryQuery,
    ) -> AppResult<(Vec<HistoryDetails>, i64)> {
        self.repository.history.search(query).await
    }
}
