//! Device model, tag codec and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Generated tags look like JOIILT0042: fixed prefix, type code, 4-digit
/// sequence. Free-form serials are accepted everywhere a tag is.
pub const TAG_PREFIX: &str = "JOII";

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^JOII([A-Z]{2,4})([0-9]{4})$").expect("invalid tag pattern"));

/// Physical condition of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCondition {
    New,
    Good,
    Fair,
    Poor,
    Defective,
}

impl DeviceCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCondition::New => "new",
            DeviceCondition::Good => "good",
            DeviceCondition::Fair => "fair",
            DeviceCondition::Poor => "poor",
            DeviceCondition::Defective => "defective",
        }
    }
}

impl std::fmt::Display for DeviceCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeviceCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(DeviceCondition::New),
            "good" => Ok(DeviceCondition::Good),
            "fair" => Ok(DeviceCondition::Fair),
            "poor" => Ok(DeviceCondition::Poor),
            "defective" => Ok(DeviceCondition::Defective),
            _ => Err(format!("Invalid device condition: {}", s)),
        }
    }
}

// SQLx conversion for DeviceCondition (stored as lowercase text)
impl sqlx::Type<Postgres> for DeviceCondition {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for DeviceCondition {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for DeviceCondition {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Assignment status, derived from assigned_to / retired; never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Available,
    Assigned,
    Retired,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Available => "available",
            DeviceStatus::Assigned => "assigned",
            DeviceStatus::Retired => "retired",
        }
    }

    pub fn derive(retired: bool, assigned_to: Option<i32>) -> Self {
        if retired {
            DeviceStatus::Retired
        } else if assigned_to.is_some() {
            DeviceStatus::Assigned
        } else {
            DeviceStatus::Available
        }
    }
}

/// Internal row structure for device queries
#[derive(Debug, Clone, FromRow)]
pub struct DeviceRow {
    id: i32,
    tag: String,
    device_type: String,
    brand: Option<String>,
    model: Option<String>,
    condition: DeviceCondition,
    retired: bool,
    assigned_to: Option<i32>,
    assigned_date: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DeviceRow> for Device {
    fn from(row: DeviceRow) -> Self {
        Device {
            status: DeviceStatus::derive(row.retired, row.assigned_to),
            id: row.id,
            tag: row.tag,
            device_type: row.device_type,
            brand: row.brand,
            model: row.model,
            condition: row.condition,
            retired: row.retired,
            assigned_to: row.assigned_to,
            assigned_date: row.assigned_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Full device model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Device {
    pub id: i32,
    /// Unique asset tag (generated or free-form serial)
    pub tag: String,
    pub device_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub condition: DeviceCondition,
    pub retired: bool,
    /// Employee currently holding the device, if any
    pub assigned_to: Option<i32>,
    pub assigned_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: DeviceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Internal row structure for DeviceShort queries
#[derive(Debug, Clone, FromRow)]
pub struct DeviceShortRow {
    id: i32,
    tag: String,
    device_type: String,
    brand: Option<String>,
    model: Option<String>,
    condition: DeviceCondition,
    retired: bool,
    assigned_to: Option<i32>,
    holder_name: Option<String>,
}

impl From<DeviceShortRow> for DeviceShort {
    fn from(row: DeviceShortRow) -> Self {
        DeviceShort {
            status: DeviceStatus::derive(row.retired, row.assigned_to),
            id: row.id,
            tag: row.tag,
            device_type: row.device_type,
            brand: row.brand,
            model: row.model,
            condition: row.condition,
            assigned_to: row.assigned_to,
            holder_name: row.holder_name,
        }
    }
}

/// Short device representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceShort {
    pub id: i32,
    pub tag: String,
    pub device_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub condition: DeviceCondition,
    pub status: DeviceStatus,
    pub assigned_to: Option<i32>,
    /// Full name of the current holder, if assigned
    pub holder_name: Option<String>,
}

/// Device query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DeviceQuery {
    /// Search over tag, brand and model
    pub search: Option<String>,
    pub device_type: Option<String>,
    pub status: Option<DeviceStatus>,
    pub condition: Option<DeviceCondition>,
    /// Include retired devices (default false)
    pub include_retired: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create device request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDevice {
    /// Explicit tag or serial; omit to have one generated from the type
    #[validate(length(min = 4, max = 64, message = "Tag must be 4-64 characters"))]
    pub tag: Option<String>,
    #[validate(length(min = 2, max = 64, message = "Device type must be 2-64 characters"))]
    pub device_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub condition: Option<DeviceCondition>,
    pub notes: Option<String>,
}

/// Update device request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDevice {
    #[validate(length(min = 4, max = 64, message = "Tag must be 4-64 characters"))]
    pub tag: Option<String>,
    pub device_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub condition: Option<DeviceCondition>,
    pub notes: Option<String>,
}

/// Derive the short uppercase type code used in generated tags.
/// Known types get their conventional code; anything else falls back to the
/// first letters of the type name.
pub fn type_code(device_type: &str) -> String {
    match device_type.to_lowercase().as_str() {
        "laptop" => "LT".to_string(),
        "desktop" => "DT".to_string(),
        "monitor" => "MN".to_string(),
        "printer" => "PR".to_string(),
        "phone" | "smartphone" => "PH".to_string(),
        "tablet" => "TB".to_string(),
        "router" => "RT".to_string(),
        "server" => "SV".to_string(),
        "keyboard" => "KB".to_string(),
        "mouse" => "MS".to_string(),
        other => {
            let letters: String = other
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .take(2)
                .collect::<String>()
                .to_uppercase();
            if letters.len() == 2 {
                letters
            } else {
                "XX".to_string()
            }
        }
    }
}

/// Format a generated tag from a type code and sequence number
pub fn format_tag(code: &str, sequence: u32) -> String {
    format!("{}{}{:04}", TAG_PREFIX, code, sequence)
}

/// Parse a generated tag into (type code, sequence). Free-form serials
/// return None.
pub fn parse_tag(tag: &str) -> Option<(String, u32)> {
    let caps = TAG_PATTERN.captures(tag)?;
    let code = caps.get(1)?.as_str().to_string();
    let sequence = caps.get(2)?.as_str().parse().ok()?;
    Some((code, sequence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_map_to_conventional_codes() {
        assert_eq!(type_code("Laptop"), "LT");
        assert_eq!(type_code("desktop"), "DT");
        assert_eq!(type_code("PRINTER"), "PR");
    }

    #[test]
    fn unknown_types_fall_back_to_initials() {
        assert_eq!(type_code("projector"), "PR");
        assert_eq!(type_code("webcam"), "WE");
        assert_eq!(type_code("x"), "XX");
    }

    #[test]
    fn tag_round_trip() {
        let tag = format_tag("LT", 42);
        assert_eq!(tag, "JOIILT0042");
        assert_eq!(parse_tag(&tag), Some(("LT".to_string(), 42)));
    }

    #[test]
    fn free_form_serials_do_not_parse() {
        assert_eq!(parse_tag("SN-9934-AB"), None);
        assert_eq!(parse_tag("JOIIlt0042"), None);
        assert_eq!(parse_tag("JOIILT42"), None);
    }

    #[test]
    fn status_derivation() {
        assert_eq!(DeviceStatus::derive(false, None), DeviceStatus::Available);
        assert_eq!(DeviceStatus::derive(false, Some(3)), DeviceStatus::Assigned);
        // Retired wins even if an assignment is still recorded
        assert_eq!(DeviceStatus::derive(true, Some(3)), DeviceStatus::Retired);
    }

    #[test]
    fn condition_parses_case_insensitively() {
        assert_eq!("Good".parse::<DeviceCondition>(), Ok(DeviceCondition::Good));
        assert!("broken".parse::<DeviceCondition>().is_err());
    }
}
