//! Signed, time-limited session tokens carrying the authenticated gym id.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use maxxzone_config::AuthConfig;
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Claim set embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Gym id the token was issued for.
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies HS256 session tokens.
///
/// The codec is constructed even when no secret is configured so the server
/// can boot; issuing or verifying without a secret fails with
/// [`AuthError::SecretMissing`].
#[derive(Clone)]
pub struct SessionTokens {
    keys: Option<Keys>,
    ttl: Duration,
}

impl SessionTokens {
    pub fn from_config(config: &AuthConfig) -> Self {
        let ttl = Duration::seconds(config.session_ttl_seconds.min(i64::MAX as u64) as i64);
        Self::new(config.jwt_secret.as_deref(), ttl)
    }

    pub fn new(secret: Option<&str>, ttl: Duration) -> Self {
        let keys = secret.map(|secret| Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });
        Self { keys, ttl }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Issue a token for the given gym, valid for the configured TTL.
    pub fn issue(&self, gym_id: i64) -> Result<String, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::SecretMissing)?;

        let now = Utc::now();
        let claims = Claims {
            sub: gym_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &keys.encoding).map_err(|_| AuthError::TokenCreation)
    }

    /// Verify a token and return the gym id it was issued for.
    ///
    /// Expiry is checked with zero leeway: one tick past `exp` fails.
    pub fn verify(&self, token: &str) -> Result<i64, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::SecretMissing)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|err| {
            match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            }
        })?;

        Ok(data.claims.sub)
    }
}
