//! Device inventory service

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::device::{CreateDevice, Device, DeviceQuery, DeviceShort, UpdateDevice},
    models::history::HistoryDetails,
    repository::Repository,
};

#[derive(Clone)]
pub struct DevicesService {
    repository: Repository,
}

impl DevicesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Device> {
        self.repository.devices.get_by_id(id).await
    }

    pub async fn search(&self, query: &DeviceQuery) -> AppResult<(Vec<DeviceShort>, i64)> {
        self.repository.devices.search(query).await
    }

    /// Preview the next generated tag for a device type
    pub async fn next_tag(&self, device_type: &str) -> AppResult<String> {
        self.repository.devices.next_tag(device_type).await
    }

    /// Create a device. An explicit tag is checked for uniqueness; without
    /// one a tag is generated from the device type.
    pub async fn create(&self, device: CreateDevice) -> AppResult<Device> {
        let tag = match device.tag {
            Some(ref tag) => {
                let tag = tag.trim().to_string();
                if self.repository.devices.tag_exists(&tag, None).await? {
                    return Err(AppError::BusinessRule(
                        ErrorCode::TagAlreadyExists,
                        format!("Tag '{}' is already in use", tag),
                    ));
                }
                tag
            }
            None => self.repository.devices.next_tag(&device.device_type).await?,
        };

        self.repository.devices.create(&device, &tag).await
    }

    /// Update a device. Tag changes are re-checked for uniqueness.
    pub async fn update(&self, id: i32, device: UpdateDevice) -> AppResult<Device> {
        self.repository.devices.get_by_id(id).await?;

        if let Some(ref tag) = device.tag {
            if self.repository.devices.tag_exists(tag, Some(id)).await? {
                return Err(AppError::BusinessRule(
                    ErrorCode::TagAlreadyExists,
                    format!("Tag '{}' is already in use", tag),
                ));
            }
        }

        self.repository.devices.update(id, &device).await
    }

    pub async fn delete(&self, id: i32, force: bool) -> AppResult<()> {
        self.repository.devices.delete(id, force).await
    }

    /// Assignment history of one device, newest first
    pub async fn get_history(&self, id: i32) -> AppResult<Vec<HistoryDetails>> {
        self.repository.devices.get_by_id(id).await?;
        self.repository.history.get_for_device(id).await
    }
}
