use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::types::{AuthError, Claims, User};

/// Issues and verifies the HS256 tokens used for API and page sessions.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Builds a service from the `JWT_SECRET` environment variable.
    pub fn new() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-this-in-production".to_string());

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    /// Generates a short-lived access token carrying the user's email and role.
    pub fn generate_access_token(&self, user: &User) -> Result<String, AuthError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(1))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            exp: expiration,
            iat: Utc::now().timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Generates a long-lived refresh token carrying only the user ID.
    pub fn generate_refresh_token(&self, user_id: &Uuid) -> Result<String, AuthError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(30))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            email: String::new(), // Empty for refresh tokens
            role: String::new(),  // Empty for refresh tokens
            exp: expiration,
            iat: Utc::now().timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verifies a token's signature and expiry, returning its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }

    /// Verifies a token and parses its subject as a user ID.
    pub fn extract_user_id_from_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = self.verify_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AuthError::Jwt(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidSubject,
            ))
        })?;

        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "traveler@example.com".to_string(),
            name: "Test Traveler".to_string(),
            password_hash: "irrelevant".to_string(),
            role: "user".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = JwtService::new();
        let user = test_user();

        let token = service.generate_access_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, "user");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_has_no_identity_claims() {
        let service = JwtService::new();
        let user_id = Uuid::new_v4();

        let token = service.generate_refresh_token(&user_id).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.email.is_empty());
        assert!(claims.role.is_empty());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = JwtService::new();
        let user = test_user();

        let mut token = service.generate_access_token(&user).unwrap();
        // Flip a character in the signature segment
        let flipped = if token.ends_with('a') { 'b' } else { 'a' };
        token.pop();
        token.push(flipped);

        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_extract_user_id_from_token() {
        let service = JwtService::new();
        let user = test_user();

        let token = service.generate_access_token(&user).unwrap();
        let user_id = service.extract_user_id_from_token(&token).unwrap();

        assert_eq!(user_id, user.id);
    }
}
