//! Employee model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Employee status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active = 0,
    Resigned = 1,
}

impl From<i16> for EmployeeStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => EmployeeStatus::Resigned,
            _ => EmployeeStatus::Active,
        }
    }
}

/// Internal row structure for employee queries
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    id: i32,
    firstname: String,
    lastname: String,
    position: Option<String>,
    department: Option<String>,
    client_id: Option<i32>,
    client_name: Option<String>,
    status: i16,
    resignation_date: Option<DateTime<Utc>>,
    resignation_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            firstname: row.firstname,
            lastname: row.lastname,
            position: row.position,
            department: row.department,
            client_id: row.client_id,
            client_name: row.client_name,
            status: EmployeeStatus::from(row.status),
            resignation_date: row.resignation_date,
            resignation_reason: row.resignation_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Full employee model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub client_id: Option<i32>,
    pub client_name: Option<String>,
    pub status: EmployeeStatus,
    pub resignation_date: Option<DateTime<Utc>>,
    pub resignation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Internal row structure for EmployeeShort queries
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeShortRow {
    id: i32,
    firstname: String,
    lastname: String,
    position: Option<String>,
    department: Option<String>,
    client_name: Option<String>,
    status: i16,
    nb_devices: Option<i64>,
}

impl From<EmployeeShortRow> for EmployeeShort {
    fn from(row: EmployeeShortRow) -> Self {
        EmployeeShort {
            id: row.id,
            firstname: row.firstname,
            lastname: row.lastname,
            position: row.position,
            department: row.department,
            client_name: row.client_name,
            status: EmployeeStatus::from(row.status),
            nb_devices: row.nb_devices.unwrap_or(0),
        }
    }
}

/// Short employee representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeShort {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub client_name: Option<String>,
    pub status: EmployeeStatus,
    /// Devices currently held
    pub nb_devices: i64,
}

/// Employee query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Search by first or last name
    pub name: Option<String>,
    pub client_id: Option<i32>,
    pub department: Option<String>,
    /// Include resigned employees (default false)
    pub include_resigned: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create employee request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployee {
    #[validate(length(min = 1, message = "First name is required"))]
    pub firstname: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub lastname: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub client_id: Option<i32>,
}

/// Update employee request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployee {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub firstname: Option<String>,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub lastname: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub client_id: Option<i32>,
}

/// Resignation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResignEmployee {
    /// Defaults to now when omitted
    pub date: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    /// Return all held devices as part of the resignation; without this the
    /// request is refused while devices are still assigned
    pub return_devices: Option<bool>,
}
