use actix_web::{HttpResponse, Result, web};
use sqlx::{PgPool, Row};

use auth_services::middleware::AdminUser;
use auth_services::types::AuthError;
use travel_services::types::{TravelError, is_foreign_key_violation};

/// Lists every account for administrators
pub async fn list_users(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
) -> Result<HttpResponse, AuthError> {
    let rows = sqlx::query(
        "SELECT id, name, email, role, is_active, created_at FROM users ORDER BY created_at DESC",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let users: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "id": row.get::<uuid::Uuid, _>("id"),
                "name": row.get::<String, _>("name"),
                "email": row.get::<String, _>("email"),
                "role": row.get::<String, _>("role"),
                "is_active": row.get::<bool, _>("is_active"),
                "created_at": row.get::<chrono::DateTime<chrono::Utc>, _>("created_at")
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "users": users,
        "count": users.len()
    })))
}

/// Deletes a user account, deleting sessions first to satisfy foreign keys.
/// Rejected while the user still has trip registrations.
pub async fn delete_user(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, TravelError> {
    let user_id = path.into_inner();

    log::warn!("🚨 Deleting user {}", user_id);

    let row = sqlx::query(
        "SELECT COUNT(*) AS registrations FROM trip_registrations WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool.get_ref())
    .await?;

    let registration_count: i64 = row.get("registrations");
    if registration_count > 0 {
        return Err(TravelError::UserHasRegistrations);
    }

    // Delete user sessions first (foreign key constraint)
    sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(pool.get_ref())
        .await?;

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                TravelError::UserHasRegistrations
            } else {
                TravelError::Database(e)
            }
        })?;

    if result.rows_affected() > 0 {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": format!("User {} deleted successfully", user_id),
            "deleted": true
        })))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": format!("No user found with id {}", user_id),
            "deleted": false
        })))
    }
}
