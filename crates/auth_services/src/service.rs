use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::types::{AuthError, SignUpRequest, UpdateProfileRequest, User};

/// Service for user persistence, credential checks, and refresh sessions.
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    /// Creates a new instance of `AuthService` with the provided database connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new user account with a bcrypt-hashed password.
    pub async fn create_user(&self, request: &SignUpRequest) -> Result<User, AuthError> {
        // Check if email already exists
        let existing_user = sqlx::query("SELECT id FROM users WHERE email = $1")
            .bind(request.email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        if existing_user.is_some() {
            return Err(AuthError::EmailExists);
        }

        // Hash the password
        let password_hash = hash(&request.password, DEFAULT_COST)?;

        // Insert the new user
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING
                id, email, name, password_hash, role,
                is_active, created_at, updated_at
            "#,
        )
        .bind(request.email.to_lowercase().trim())
        .bind(request.name.trim())
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::user_from_row(&row))
    }

    /// Looks up an active user by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT
                id, email, name, password_hash, role,
                is_active, created_at, updated_at
            FROM users
            WHERE email = $1 AND is_active = true
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::user_from_row))
    }

    /// Looks up an active user by ID.
    pub async fn get_user_by_id(&self, user_id: &Uuid) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT
                id, email, name, password_hash, role,
                is_active, created_at, updated_at
            FROM users
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::user_from_row))
    }

    /// Verifies an email/password pair, returning the user on success.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_valid = verify(password, &user.password_hash)?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Updates the authenticated user's name and email.
    pub async fn update_user_profile(
        &self,
        user_id: &Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<User, AuthError> {
        // The new email must not belong to another account
        let taken = sqlx::query("SELECT id FROM users WHERE email = $1 AND id != $2")
            .bind(request.email.to_lowercase())
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        if taken.is_some() {
            return Err(AuthError::EmailExists);
        }

        let row = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2, updated_at = NOW()
            WHERE id = $3 AND is_active = true
            RETURNING
                id, email, name, password_hash, role,
                is_active, created_at, updated_at
            "#,
        )
        .bind(request.name.trim())
        .bind(request.email.to_lowercase().trim())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Self::user_from_row(&row)),
            None => Err(AuthError::UserNotFound),
        }
    }

    /// Stores a hashed refresh token, returning the session ID.
    pub async fn create_session(
        &self,
        user_id: &Uuid,
        refresh_token_hash: &str,
    ) -> Result<Uuid, AuthError> {
        let row = sqlx::query(
            r#"
            INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(refresh_token_hash)
        .bind(Utc::now() + chrono::Duration::days(30)) // 30 day expiry
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    /// Checks that an unexpired session matching the refresh token exists.
    pub async fn verify_session(
        &self,
        user_id: &Uuid,
        refresh_token: &str,
    ) -> Result<(), AuthError> {
        let rows = sqlx::query(
            r#"
            SELECT refresh_token_hash
            FROM user_sessions
            WHERE user_id = $1 AND expires_at > NOW()
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let stored_hash: String = row.get("refresh_token_hash");
            if verify(refresh_token, &stored_hash)? {
                return Ok(());
            }
        }

        Err(AuthError::SessionExpired)
    }

    /// Revokes every session belonging to the user.
    pub async fn delete_sessions(&self, user_id: &Uuid) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
        User {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            password_hash: row.get("password_hash"),
            role: row.get("role"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}
