use crate::auth::auth::AuthUser;
use crate::model::payslip::Payslip;
use crate::utils::db_utils::page_offset;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct SendPayslip {
    #[schema(example = "2026-02-01", value_type = String, format = "date")]
    pub period: NaiveDate,

    /// Payslip body: free-form text or a link to a rendered document.
    #[schema(example = "Base: 20,800.00 PHP / OT: 1,200.00 PHP / Net: 22,000.00 PHP")]
    pub content: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayslipQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayslipResponse {
    pub data: Vec<Payslip>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Issue a payslip to an employee
#[utoipa::path(
    post,
    path = "/api/v1/employees/{employee_id}/payslips",
    params(
        ("employee_id", description = "Employee user ID")
    ),
    request_body = SendPayslip,
    responses(
        (status = 201, description = "Payslip sent"),
        (status = 400, description = "Empty content"),
        (status = 404, description = "Employee not found"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Payslip"
)]
pub async fn send_payslip(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<SendPayslip>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    if payload.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Payslip content must not be empty"
        })));
    }

    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = ? LIMIT 1)")
            .bind(employee_id)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, employee_id, "Failed to check employee");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    if !exists {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO payslips (user_id, period, content, sent_by)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(payload.period)
    .bind(&payload.content)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to send payslip");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Payslip sent successfully"
    })))
}

/// Own payslips, newest first
#[utoipa::path(
    get,
    path = "/api/v1/payslips",
    params(PayslipQuery),
    responses(
        (status = 200, description = "Paginated payslips", body = PaginatedPayslipResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Payslip"
)]
pub async fn list_payslips(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PayslipQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = page_offset(page, per_page);

    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payslips WHERE user_id = ?")
            .bind(auth.user_id)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = auth.user_id, "Failed to count payslips");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    let data = sqlx::query_as::<_, Payslip>(
        r#"
        SELECT id, user_id, period, content, sent_by, created_at
        FROM payslips
        WHERE user_id = ?
        ORDER BY period DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(auth.user_id)
    .bind(per_page as i64)
    .bind(offset)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to fetch payslips");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(PaginatedPayslipResponse {
        data,
        page,
        per_page,
        total,
    }))
}
