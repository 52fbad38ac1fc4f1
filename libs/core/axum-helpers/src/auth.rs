use axum::{extract::FromRequestParts, http::request::Parts, response::Response};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::detail_response;

/// Default bearer-token lifetime (30 minutes).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 1800;

/// JWT claims structure. The subject claim carries the user's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Stateless JWT authentication: HS256-signed, expiring bearer tokens.
///
/// Issuance embeds the user's email as the subject claim; verification
/// checks signature and expiry. Resolving the subject to a live user row is
/// the caller's job (the auth middleware), so a revoked or deactivated
/// account fails even while its token is unexpired.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    ttl_secs: i64,
}

impl JwtAuth {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Create a signed bearer token for the given email.
    pub fn create_token(&self, email: &str) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify signature and expiry, returning the decoded claims.
    ///
    /// Any failure is terminal: bad signature, expired, malformed. There is
    /// no retry path.
    pub fn verify_token(&self, token: &str) -> eyre::Result<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

/// The authenticated user resolved by the auth middleware.
///
/// Inserted into request extensions after the bearer token's subject claim
/// has been resolved to a live, active user row.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub is_admin: bool,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            detail_response(
                axum::http::StatusCode::UNAUTHORIZED,
                "Not authenticated",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let auth = JwtAuth::new("test-secret", 60);
        let token = auth.create_token("a@x.com").unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = JwtAuth::new("test-secret", 60);
        let token = auth.create_token("a@x.com").unwrap();

        let other = JwtAuth::new("other-secret", 60);
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Issue a token that expired an hour ago; default validation
        // applies a 60s leeway, so go well past it.
        let auth = JwtAuth::new("test-secret", -3600);
        let token = auth.create_token("a@x.com").unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let auth = JwtAuth::new("test-secret", 60);
        assert!(auth.verify_token("not-a-jwt").is_err());
    }
}
