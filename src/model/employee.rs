use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shift::ShiftConfig;

/// Admin-managed pay and shift settings for one employee. At most one row
/// per user; updates overwrite in place (no versioning).
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "user_id": 42,
    "position": "Barista",
    "hourly_rate": 120.0,
    "overtime_rate": 150.0,
    "start_hour": 10,
    "start_minute": 0,
    "end_hour": 19,
    "end_minute": 0
}))]
pub struct EmployeeDetails {
    pub user_id: u64,
    pub position: Option<String>,
    pub hourly_rate: Option<f64>,
    pub overtime_rate: Option<f64>,
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
}

impl EmployeeDetails {
    pub fn shift_config(&self) -> ShiftConfig {
        ShiftConfig {
            start_hour: self.start_hour,
            start_minute: self.start_minute,
            end_hour: self.end_hour,
            end_minute: self.end_minute,
        }
    }
}
