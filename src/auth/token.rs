use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of every issued token.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The authenticated user's identifier.
    pub id: i32,
    /// The authenticated user's email at issuance time.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch), always `iat + TOKEN_TTL_SECONDS`.
    pub exp: usize,
    /// Unique token id, so two tokens issued in the same second still differ.
    pub jti: String,
}

/// Signing and verification keys derived from the configured secret.
///
/// Built once at startup and shared by the auth flow (issuing) and the
/// request gate (verifying).
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for the given identity, valid for one hour.
    ///
    /// Returns `AppError::InternalError` if encoding fails.
    pub fn issue(&self, user_id: i32, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(TOKEN_TTL_SECONDS);

        let claims = Claims {
            id: user_id,
            email: email.to_string(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        self.sign(&claims)
    }

    /// Signs arbitrary claims with this key.
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry and decodes the claims.
    ///
    /// Any failure (bad signature, expired, malformed payload) is reported as
    /// `AppError::Forbidden`; the underlying reason is only logged.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("token rejected: {}", e);
                AppError::Forbidden("Invalid token".into())
            })
    }
}
