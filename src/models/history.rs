//! Device history model: append-only assignment event log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};

use super::device::DeviceCondition;

/// Assignment lifecycle actions recorded in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Assigned,
    Unassigned,
    /// Devices handed back during a resignation
    Returned,
    Retired,
    Restored,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Assigned => "assigned",
            HistoryAction::Unassigned => "unassigned",
            HistoryAction::Returned => "returned",
            HistoryAction::Retired => "retired",
            HistoryAction::Restored => "restored",
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HistoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assigned" => Ok(HistoryAction::Assigned),
            "unassigned" => Ok(HistoryAction::Unassigned),
            "returned" => Ok(HistoryAction::Returned),
            "retired" => Ok(HistoryAction::Retired),
            "restored" => Ok(HistoryAction::Restored),
            _ => Err(format!("Invalid history action: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for HistoryAction {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for HistoryAction {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for HistoryAction {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// History entry with device and employee names for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoryDetails {
    pub id: i32,
    pub device_id: i32,
    pub device_tag: String,
    pub employee_id: Option<i32>,
    pub employee_name: Option<String>,
    pub action: HistoryAction,
    /// Device condition snapshot at event time
    pub condition: Option<DeviceCondition>,
    pub reason: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// History feed query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    pub device_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub action: Option<HistoryAction>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_round_trip() {
        for action in [
            HistoryAction::Assigned,
            HistoryAction::Unassigned,
            HistoryAction::Returned,
            HistoryAction::Retired,
            HistoryAction::Restored,
        ] {
            assert_eq!(action.as_str().parse::<HistoryAction>(), Ok(action));
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!("stolen".parse::<HistoryAction>().is_err());
    }
}
