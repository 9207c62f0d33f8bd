//! Bearer-token issuance and verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthResult};

/// Development fallback; deployments set AUTH_SECRET.
const DEV_SECRET: &str = "taskchat-dev-secret-change-me";

/// Default token lifetime in minutes.
const DEFAULT_EXPIRE_MINUTES: i64 = 30;

/// JWT claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id as a string.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// The one signing/verification policy object.
///
/// Issuance and verification share the same secret, algorithm, and expiry
/// window; routes never re-derive any of this themselves.
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expire_minutes: i64,
}

impl TokenManager {
    pub fn new(secret: &str, expire_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expire_minutes,
        }
    }

    /// Build from `AUTH_SECRET` and `TOKEN_EXPIRE_MINUTES` env vars,
    /// falling back to development defaults.
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_SECRET").unwrap_or_else(|_| DEV_SECRET.to_string());
        let expire_minutes = std::env::var("TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_EXPIRE_MINUTES);
        Self::new(&secret, expire_minutes)
    }

    /// Mint an access token for a user id.
    pub fn issue(&self, user_id: &str) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.expire_minutes * 60,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AuthError::Signing {
                message: e.to_string(),
            }
        })
    }

    /// Validate a token and return the subject user id.
    ///
    /// Accepts either the raw token or a full `Authorization` header value
    /// with a `Bearer ` prefix. Fails on bad signature, expiry, or a
    /// missing subject.
    pub fn verify(&self, token: &str) -> AuthResult<String> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token);

        let data = decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| AuthError::InvalidToken {
            message: e.to_string(),
        })?;

        if data.claims.sub.is_empty() {
            return Err(AuthError::InvalidToken {
                message: "missing subject".to_string(),
            });
        }

        Ok(data.claims.sub)
    }
}
