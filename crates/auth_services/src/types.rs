use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request body for creating a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    /// Display name of the new user.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Email address, used as the login identifier.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Plain-text password, hashed before storage.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request body for logging in.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address of the account.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Plain-text password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for exchanging a refresh token for a new access token.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    /// The refresh token issued at signup or login.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Request body for updating the authenticated user's profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// New email address.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
}

/// Public view of a user returned by auth and profile endpoints.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// Unique identifier of the user.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role string, `user` or `admin`.
    pub role: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Response body for successful signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Short-lived JWT for API requests.
    pub access_token: String,
    /// Long-lived token for obtaining new access tokens.
    pub refresh_token: String,
    /// The authenticated user.
    pub user: UserInfo,
}

// Database model - matching the exact schema
#[derive(Debug, sqlx::FromRow)]
pub struct User {
    /// Unique identifier of the user.
    pub id: Uuid,
    /// Email address, unique per account.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Bcrypt hash of the password.
    pub password_hash: String,
    /// Role string, `user` or `admin`.
    pub role: String,
    /// Soft-delete flag; inactive users cannot log in.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public projection of this user.
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
        }
    }
}

// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Email address, empty for refresh tokens.
    pub email: String,
    /// Role string, empty for refresh tokens.
    pub role: String,
    /// Expiration timestamp.
    pub exp: usize,
    /// Issued-at timestamp.
    pub iat: usize,
}

impl Claims {
    /// Whether these claims carry the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// An account with this email already exists.
    #[error("Email already exists")]
    EmailExists,

    /// Email/password combination did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No user with the given identifier.
    #[error("User not found")]
    UserNotFound,

    /// Refresh token is unknown, revoked, or past its expiry.
    #[error("Session expired")]
    SessionExpired,

    /// Authenticated but not allowed to perform this action.
    #[error("Insufficient permissions")]
    Forbidden,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing error.
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// JWT encoding or decoding error.
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Request failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl actix_web::ResponseError for AuthError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            AuthError::EmailExists => HttpResponse::Conflict().json(serde_json::json!({
                "error": "email_exists",
                "message": "An account with this email already exists"
            })),
            AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "invalid_credentials",
                "message": "Invalid email or password"
            })),
            AuthError::UserNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "user_not_found",
                "message": "User not found"
            })),
            AuthError::SessionExpired => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "session_expired",
                "message": "Session has expired, please log in again"
            })),
            AuthError::Forbidden => HttpResponse::Forbidden().json(serde_json::json!({
                "error": "forbidden",
                "message": "You are not allowed to perform this action"
            })),
            AuthError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            _ => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal_error",
                "message": "An internal error occurred"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_signup_request_validation() {
        let valid = SignUpRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "correcthorse".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = SignUpRequest {
            name: "Ada Lovelace".to_string(),
            email: "not-an-email".to_string(),
            password: "correcthorse".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignUpRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::EmailExists.error_response().status(), 409);
        assert_eq!(AuthError::InvalidCredentials.error_response().status(), 401);
        assert_eq!(AuthError::SessionExpired.error_response().status(), 401);
        assert_eq!(AuthError::UserNotFound.error_response().status(), 404);
        assert_eq!(AuthError::Forbidden.error_response().status(), 403);
        assert_eq!(
            AuthError::Validation("bad".to_string())
                .error_response()
                .status(),
            400
        );
    }

    #[test]
    fn test_claims_is_admin() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "ada@example.com".to_string(),
            role: "admin".to_string(),
            exp: 0,
            iat: 0,
        };
        assert!(claims.is_admin());

        let claims = Claims { role: "user".to_string(), ..claims };
        assert!(!claims.is_admin());
    }
}
