use crate::auth::auth::AuthUser;
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::EmployeeDetails;
use crate::shift::{ClockKind, ClockOutcome, ShiftConfig, business_tz, classify};
use crate::utils::db_utils::page_offset;
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct ClockReq {
    /// Opaque reference to the selfie captured by the client at the moment
    /// of the action (storage is handled elsewhere).
    #[schema(example = "selfies/42/1709341512.png")]
    pub selfie_ref: String,
}

#[derive(Serialize, ToSchema)]
pub struct ClockResponse {
    #[schema(example = "clockIn")]
    pub kind: String,
    #[schema(example = "early")]
    pub status: String,
    pub is_overtime: bool,
    /// Philippine wall-clock instant credited for payroll purposes.
    #[schema(example = "2026-03-02T10:00:00", value_type = String, format = "date-time")]
    pub effective_time: chrono::NaiveDateTime,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    /// Filter by action: "clockIn" or "clockOut".
    #[schema(example = "clockIn")]
    pub kind: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedAttendanceResponse {
    pub data: Vec<AttendanceRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceStatusResponse {
    /// True when the latest record is a clock-in, i.e. the employee is
    /// currently on the clock.
    pub clocked_in: bool,
    pub last: Option<AttendanceRecord>,
}

/// Shift window for one user, defaults applied when no row exists.
async fn shift_config_for(pool: &MySqlPool, user_id: u64) -> Result<ShiftConfig, sqlx::Error> {
    let details = sqlx::query_as::<_, EmployeeDetails>(
        r#"
        SELECT user_id, position, hourly_rate, overtime_rate,
               start_hour, start_minute, end_hour, end_minute
        FROM employee_details
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(details
        .map(|d| d.shift_config())
        .unwrap_or_default())
}

/// Latest recorded action for one user, if any.
async fn last_clock_kind(pool: &MySqlPool, user_id: u64) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT kind
        FROM attendance
        WHERE user_id = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Classify and append one clock action. Records are immutable once
/// written; only the insert happens here.
async fn record_clock(
    kind: ClockKind,
    user_id: u64,
    selfie_ref: &str,
    pool: &MySqlPool,
) -> actix_web::Result<ClockOutcome> {
    let shift = shift_config_for(pool, user_id).await.map_err(|e| {
        tracing::error!(error = %e, user_id, "Failed to load shift config");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let now = Utc::now();
    let outcome = classify(kind, now, &shift);
    let raw_local = now.with_timezone(&business_tz()).naive_local();

    sqlx::query(
        r#"
        INSERT INTO attendance
        (user_id, kind, raw_time, effective_time, status, is_overtime, selfie_ref)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(raw_local)
    .bind(outcome.effective_time.naive_local())
    .bind(outcome.status.as_str())
    .bind(outcome.is_overtime)
    .bind(selfie_ref)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, kind = %kind, "Failed to record clock action");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(outcome)
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-in",
    request_body = ClockReq,
    responses(
        (status = 200, description = "Clocked in", body = ClockResponse),
        (status = 400, description = "Already clocked in"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ClockReq>,
) -> actix_web::Result<impl Responder> {
    let last = last_clock_kind(pool.get_ref(), auth.user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = auth.user_id, "Failed to read last action");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if last.as_deref() == Some(ClockKind::ClockIn.as_str()) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Already clocked in"
        })));
    }

    let outcome = record_clock(
        ClockKind::ClockIn,
        auth.user_id,
        &payload.selfie_ref,
        pool.get_ref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(ClockResponse {
        kind: ClockKind::ClockIn.as_str().to_string(),
        status: outcome.status.as_str().to_string(),
        is_overtime: outcome.is_overtime,
        effective_time: outcome.effective_time.naive_local(),
    }))
}

/// Clock-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-out",
    request_body = ClockReq,
    responses(
        (status = 200, description = "Clocked out", body = ClockResponse),
        (status = 400, description = "Not clocked in"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn clock_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ClockReq>,
) -> actix_web::Result<impl Responder> {
    let last = last_clock_kind(pool.get_ref(), auth.user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = auth.user_id, "Failed to read last action");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if last.as_deref() != Some(ClockKind::ClockIn.as_str()) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Not clocked in"
        })));
    }

    let outcome = record_clock(
        ClockKind::ClockOut,
        auth.user_id,
        &payload.selfie_ref,
        pool.get_ref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(ClockResponse {
        kind: ClockKind::ClockOut.as_str().to_string(),
        status: outcome.status.as_str().to_string(),
        is_overtime: outcome.is_overtime,
        effective_time: outcome.effective_time.naive_local(),
    }))
}

/// Paginated history for one user, newest first. Shared with the admin
/// per-employee view.
pub(crate) async fn fetch_history(
    pool: &MySqlPool,
    user_id: u64,
    query: &AttendanceQuery,
) -> actix_web::Result<PaginatedAttendanceResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = page_offset(page, per_page);

    // Invalid kinds fail closed before touching the database.
    let kind = match &query.kind {
        Some(raw) => Some(raw.parse::<ClockKind>().map_err(|e| {
            tracing::debug!(error = %e, "Rejected history filter");
            actix_web::error::ErrorBadRequest(e.to_string())
        })?),
        None => None,
    };

    let kind_clause = if kind.is_some() { "AND kind = ?" } else { "" };

    let count_sql = format!(
        "SELECT COUNT(*) FROM attendance WHERE user_id = ? {}",
        kind_clause
    );
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(user_id);
    if let Some(k) = kind {
        count_query = count_query.bind(k.as_str());
    }

    let total = count_query.fetch_one(pool).await.map_err(|e| {
        tracing::error!(error = %e, user_id, "Failed to count attendance records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, user_id, kind, raw_time, effective_time, status, is_overtime, selfie_ref, created_at
        FROM attendance
        WHERE user_id = ? {}
        ORDER BY id DESC
        LIMIT ? OFFSET ?
        "#,
        kind_clause
    );
    let mut data_query = sqlx::query_as::<_, AttendanceRecord>(&data_sql).bind(user_id);
    if let Some(k) = kind {
        data_query = data_query.bind(k.as_str());
    }
    data_query = data_query.bind(per_page as i64).bind(offset);

    let data = data_query.fetch_all(pool).await.map_err(|e| {
        tracing::error!(error = %e, user_id, "Failed to fetch attendance history");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(PaginatedAttendanceResponse {
        data,
        page,
        per_page,
        total,
    })
}

/// Own attendance history
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Paginated history, newest first", body = PaginatedAttendanceResponse),
        (status = 400, description = "Invalid kind filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let response = fetch_history(pool.get_ref(), auth.user_id, &query).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Current clocked-in/out state, derived from the latest record
#[utoipa::path(
    get,
    path = "/api/v1/attendance/status",
    responses(
        (status = 200, description = "Latest action and derived state", body = AttendanceStatusResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let last = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, user_id, kind, raw_time, effective_time, status, is_overtime, selfie_ref, created_at
        FROM attendance
        WHERE user_id = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to fetch latest record");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let clocked_in = last
        .as_ref()
        .map(|r| r.kind == ClockKind::ClockIn.as_str())
        .unwrap_or(false);

    Ok(HttpResponse::Ok().json(AttendanceStatusResponse {
        clocked_in,
        last,
    }))
}
