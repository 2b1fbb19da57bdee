use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payslip {
    pub id: u64,
    pub user_id: u64,

    /// Pay period the slip covers (first day of the month by convention).
    #[schema(example = "2026-02-01", value_type = String, format = "date")]
    pub period: NaiveDate,

    /// Free-form payslip body: text or a link to a rendered document.
    pub content: String,

    /// Admin user who issued the slip.
    pub sent_by: u64,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}
