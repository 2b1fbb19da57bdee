use crate::auth::auth::AuthUser;
use crate::model::role::Role;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;

/// Auditable role assignment: who gets which role at registration, and who
/// granted it. Replaces any notion of trusted identities baked into source.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct RoleGrant {
    #[schema(example = "lead@example.com")]
    pub email: String,
    #[schema(example = 1)]
    pub role_id: u8,
    pub granted_by: u64,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateRoleGrant {
    #[schema(example = "lead@example.com", format = "email")]
    pub email: String,
    #[schema(example = 1)]
    pub role_id: u8,
}

/// List role grants
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    responses(
        (status = 200, description = "All role grants", body = [RoleGrant]),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn list_grants(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let grants = sqlx::query_as::<_, RoleGrant>(
        r#"
        SELECT email, role_id, granted_by, created_at
        FROM role_grants
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch role grants");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(grants))
}

/// Create or replace a role grant
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    request_body = CreateRoleGrant,
    responses(
        (status = 201, description = "Grant recorded"),
        (status = 400, description = "Unknown role"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn create_grant(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRoleGrant>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if Role::from_id(payload.role_id).is_none() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Unknown role"
        })));
    }

    let email = payload.email.trim().to_lowercase();
    if email.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email must not be empty"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO role_grants (email, role_id, granted_by)
        VALUES (?, ?, ?)
        ON DUPLICATE KEY UPDATE
            role_id = VALUES(role_id),
            granted_by = VALUES(granted_by)
        "#,
    )
    .bind(&email)
    .bind(payload.role_id)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, %email, "Failed to record role grant");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(%email, role_id = payload.role_id, granted_by = auth.user_id, "Role grant recorded");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Role grant recorded"
    })))
}

/// Remove a role grant (future registrations for this email fall back to
/// the employee role)
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{email}",
    params(
        ("email", description = "Granted email")
    ),
    responses(
        (status = 200, description = "Grant removed"),
        (status = 404, description = "No grant for this email"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn delete_grant(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let email = path.into_inner().trim().to_lowercase();

    let result = sqlx::query("DELETE FROM role_grants WHERE email = ?")
        .bind(&email)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, %email, "Failed to delete role grant");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "No grant for this email"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Role grant removed"
    })))
}
