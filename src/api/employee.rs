use crate::api::attendance::{AttendanceQuery, fetch_history};
use crate::auth::auth::AuthUser;
use crate::model::role::Role;
use crate::shift::ShiftConfig;
use crate::utils::db_utils::page_offset;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Search by name or email
    pub search: Option<String>,
}

/// Employee profile joined with pay/shift details for the admin list.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 42,
    "email": "maria@example.com",
    "full_name": "Maria Santos",
    "profile_pic_ref": null,
    "position": "Barista",
    "hourly_rate": 120.0,
    "overtime_rate": 150.0,
    "start_hour": 10,
    "start_minute": 0,
    "end_hour": 19,
    "end_minute": 0
}))]
pub struct EmployeeListItem {
    pub id: u64,
    pub email: String,
    pub full_name: String,
    pub profile_pic_ref: Option<String>,
    pub position: Option<String>,
    pub hourly_rate: Option<f64>,
    pub overtime_rate: Option<f64>,
    pub start_hour: Option<u8>,
    pub start_minute: Option<u8>,
    pub end_hour: Option<u8>,
    pub end_minute: Option<u8>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeListItem>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 7)]
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployeeDetails {
    #[schema(example = "Barista")]
    pub position: Option<String>,
    #[schema(example = 120.0)]
    pub hourly_rate: Option<f64>,
    #[schema(example = 150.0)]
    pub overtime_rate: Option<f64>,
    #[schema(example = 10)]
    pub start_hour: Option<u8>,
    #[schema(example = 0)]
    pub start_minute: Option<u8>,
    #[schema(example = 19)]
    pub end_hour: Option<u8>,
    #[schema(example = 0)]
    pub end_minute: Option<u8>,
}

/// List employees with pay and shift details
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = page_offset(page, per_page);

    let like = query.search.as_ref().map(|s| format!("%{}%", s));

    let where_clause = if like.is_some() {
        "WHERE u.role_id = ? AND (u.full_name LIKE ? OR u.email LIKE ?)"
    } else {
        "WHERE u.role_id = ?"
    };

    let count_sql = format!("SELECT COUNT(*) FROM users u {}", where_clause);
    debug!(sql = %count_sql, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(Role::Employee.as_id());
    if let Some(like) = &like {
        count_query = count_query.bind(like).bind(like);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    let data_sql = format!(
        r#"
        SELECT
            u.id, u.email, u.full_name, u.profile_pic_ref,
            d.position, d.hourly_rate, d.overtime_rate,
            d.start_hour, d.start_minute, d.end_hour, d.end_minute
        FROM users u
        LEFT JOIN employee_details d ON d.user_id = u.id
        {}
        ORDER BY u.id DESC
        LIMIT ? OFFSET ?
        "#,
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching employees");

    let mut data_query =
        sqlx::query_as::<_, EmployeeListItem>(&data_sql).bind(Role::Employee.as_id());
    if let Some(like) = &like {
        data_query = data_query.bind(like).bind(like);
    }
    data_query = data_query.bind(per_page as i64).bind(offset);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Update pay rates, position and shift window for an employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}/details",
    params(
        ("employee_id", description = "Employee user ID")
    ),
    request_body = UpdateEmployeeDetails,
    responses(
        (status = 200, description = "Details saved"),
        (status = 400, description = "Invalid shift window"),
        (status = 404, description = "Employee not found"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_details(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateEmployeeDetails>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ? LIMIT 1)",
    )
    .bind(employee_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to check employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if !exists {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })));
    }

    // Merge over the current row (or defaults) so partial updates work.
    let current = sqlx::query_as::<_, (Option<String>, Option<f64>, Option<f64>, u8, u8, u8, u8)>(
        r#"
        SELECT position, hourly_rate, overtime_rate,
               start_hour, start_minute, end_hour, end_minute
        FROM employee_details
        WHERE user_id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee details");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let defaults = ShiftConfig::default();
    let (position, hourly_rate, overtime_rate, cur_shift) = match current {
        Some((position, hourly_rate, overtime_rate, sh, sm, eh, em)) => (
            position,
            hourly_rate,
            overtime_rate,
            ShiftConfig {
                start_hour: sh,
                start_minute: sm,
                end_hour: eh,
                end_minute: em,
            },
        ),
        None => (None, None, None, defaults),
    };

    let shift = ShiftConfig {
        start_hour: body.start_hour.unwrap_or(cur_shift.start_hour),
        start_minute: body.start_minute.unwrap_or(cur_shift.start_minute),
        end_hour: body.end_hour.unwrap_or(cur_shift.end_hour),
        end_minute: body.end_minute.unwrap_or(cur_shift.end_minute),
    };

    // Reversed or out-of-range windows are rejected here, at configuration
    // time; the classifier never sees one.
    if let Err(e) = shift.validate() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": e.to_string()
        })));
    }

    let position = body.position.clone().or(position);
    let hourly_rate = body.hourly_rate.or(hourly_rate);
    let overtime_rate = body.overtime_rate.or(overtime_rate);

    // Latest write wins; a single row per employee, no versioning.
    sqlx::query(
        r#"
        INSERT INTO employee_details
        (user_id, position, hourly_rate, overtime_rate,
         start_hour, start_minute, end_hour, end_minute)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            position = VALUES(position),
            hourly_rate = VALUES(hourly_rate),
            overtime_rate = VALUES(overtime_rate),
            start_hour = VALUES(start_hour),
            start_minute = VALUES(start_minute),
            end_hour = VALUES(end_hour),
            end_minute = VALUES(end_minute)
        "#,
    )
    .bind(employee_id)
    .bind(&position)
    .bind(hourly_rate)
    .bind(overtime_rate)
    .bind(shift.start_hour)
    .bind(shift.start_minute)
    .bind(shift.end_hour)
    .bind(shift.end_minute)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to save employee details");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Employee details updated successfully"
    })))
}

/// Attendance history of any employee (admin view)
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/attendance",
    params(
        ("employee_id", description = "Employee user ID"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "Paginated history, newest first"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn employee_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();
    let response = fetch_history(pool.get_ref(), employee_id, &query).await?;
    Ok(HttpResponse::Ok().json(response))
}
