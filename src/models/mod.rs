//! Data models for AIMS

pub mod client;
pub mod device;
pub mod employee;
pub mod history;
pub mod user;

// Re-export commonly used types
pub use client::{Client, ClientShort};
pub use device::{Device, DeviceCondition, DeviceShort, DeviceStatus};
pub use employee::{Employee, EmployeeShort, EmployeeStatus};
pub use history::{HistoryAction, HistoryDetails};
pub use user::{User, UserShort};
