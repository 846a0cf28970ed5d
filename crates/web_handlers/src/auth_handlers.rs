use actix_web::{HttpResponse, Result, web};
use bcrypt::hash;
use sqlx::PgPool;
use validator::Validate;

use auth_services::jwt::JwtService;
use auth_services::middleware::AuthenticatedUser;
use auth_services::service::AuthService;
use auth_services::types::*;

/// Handles user signup by validating the request, creating a new user,
/// generating access and refresh tokens, and returning the user info.
/// Returns a 201 Created response with the user info and tokens.
pub async fn signup(
    pool: web::Data<PgPool>,
    request: web::Json<SignUpRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    let jwt_service = JwtService::new();

    // Create the user
    let user = auth_service.create_user(&request).await?;

    // Generate tokens
    let access_token = jwt_service.generate_access_token(&user)?;
    let refresh_token = jwt_service.generate_refresh_token(&user.id)?;

    // Hash and store the refresh token
    let refresh_token_hash = hash(&refresh_token, bcrypt::DEFAULT_COST)?;
    let _session_id = auth_service
        .create_session(&user.id, &refresh_token_hash)
        .await?;

    let response = AuthResponse {
        access_token,
        refresh_token,
        user: user.to_user_info(),
    };

    Ok(HttpResponse::Created().json(response))
}

/// Handles user login by validating the request, verifying credentials,
/// generating access and refresh tokens, and returning the user info.
pub async fn login(
    pool: web::Data<PgPool>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    let jwt_service = JwtService::new();

    // Verify credentials
    let user = auth_service
        .verify_password(&request.email, &request.password)
        .await?;

    // Generate tokens
    let access_token = jwt_service.generate_access_token(&user)?;
    let refresh_token = jwt_service.generate_refresh_token(&user.id)?;

    // Hash and store the refresh token
    let refresh_token_hash = hash(&refresh_token, bcrypt::DEFAULT_COST)?;
    let _session_id = auth_service
        .create_session(&user.id, &refresh_token_hash)
        .await?;

    let response = AuthResponse {
        access_token,
        refresh_token,
        user: user.to_user_info(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Exchanges a valid refresh token for a fresh access token.
pub async fn refresh(
    pool: web::Data<PgPool>,
    request: web::Json<RefreshRequest>,
) -> Result<HttpResponse, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    let jwt_service = JwtService::new();

    // The refresh token itself is a JWT carrying only the user ID
    let user_id = jwt_service.extract_user_id_from_token(&request.refresh_token)?;

    // It must also match a stored, unexpired session
    auth_service
        .verify_session(&user_id, &request.refresh_token)
        .await?;

    let user = auth_service
        .get_user_by_id(&user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let access_token = jwt_service.generate_access_token(&user)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "access_token": access_token
    })))
}

/// Revokes every refresh session of the authenticated user.
pub async fn logout(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AuthError> {
    let auth_service = AuthService::new(pool.get_ref().clone());
    let revoked = auth_service.delete_sessions(&user.0).await?;

    log::info!("Revoked {} session(s) for user {}", revoked, user.0);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Logged out",
        "revoked_sessions": revoked
    })))
}

/// Health check endpoint for auth service
pub async fn auth_health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": "auth",
        "status": "healthy",
        "timestamp": chrono::Utc::now()
    })))
}
