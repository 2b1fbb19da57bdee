use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row per clock action. Append-only: records are never updated after
/// creation, and history is served newest first.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "user_id": 42,
    "kind": "clockIn",
    "raw_time": "2026-03-02T09:45:12",
    "effective_time": "2026-03-02T10:00:00",
    "status": "early",
    "is_overtime": false,
    "selfie_ref": "selfies/42/1709341512.png",
    "created_at": "2026-03-02T09:45:12"
}))]
pub struct AttendanceRecord {
    pub id: u64,
    pub user_id: u64,

    /// "clockIn" or "clockOut".
    #[schema(example = "clockIn")]
    pub kind: String,

    /// Philippine wall-clock instant the action was initiated.
    #[schema(value_type = String, format = "date-time")]
    pub raw_time: NaiveDateTime,

    /// Philippine wall-clock instant credited for payroll purposes.
    #[schema(value_type = String, format = "date-time")]
    pub effective_time: NaiveDateTime,

    /// "onTime", "early", "late" or "overtime".
    #[schema(example = "early")]
    pub status: String,

    pub is_overtime: bool,

    /// Opaque reference to the selfie captured by the client.
    pub selfie_ref: Option<String>,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}
