use crate::auth::auth::AuthUser;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use sqlx::MySqlPool;
use utoipa::ToSchema;

/// Columns a user may change on their own row. Everything else (role,
/// password, email) goes through dedicated flows.
const PROFILE_COLUMNS: &[&str] = &["full_name", "profile_pic_ref"];

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct ProfileResponse {
    pub id: u64,
    #[schema(example = "maria@example.com")]
    pub email: String,
    #[schema(example = "Maria Santos")]
    pub full_name: String,
    pub role_id: u8,
    pub profile_pic_ref: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

/// Own profile
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Current user's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let profile = sqlx::query_as::<_, ProfileResponse>(
        r#"
        SELECT id, email, full_name, role_id, profile_pic_ref, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to fetch profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match profile {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Profile not found"
        }))),
    }
}

/// Update own profile (full name, profile picture reference)
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Unknown or missing fields"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let update = build_update_sql("users", &body, PROFILE_COLUMNS, "id", auth.user_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Profile not found"));
    }

    Ok(HttpResponse::Ok().body("Profile updated successfully"))
}
