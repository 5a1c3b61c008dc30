use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::AppError;

/// Shortest signing secret accepted at startup, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id, carried as a string on the wire.
    #[serde(with = "subject")]
    pub sub: i32,
    pub username: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

mod subject {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &i32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| de::Error::custom(format!("subject {:?} is not a user id", raw)))
    }
}

/// Signs and verifies HS256 bearer tokens with one shared secret.
///
/// Holds no per-token state: a token is valid exactly when its signature
/// matches and its `exp` has not passed, so tokens cannot be revoked early.
/// Issuer and audience are never checked.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Fails with `ConfigError::WeakSecret` when `secret` is shorter than
    /// [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, ConfigError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret {
                min_len: MIN_SECRET_LEN,
                actual_len: secret.len(),
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for the user that expires `ttl` from now.
    pub fn issue(&self, user_id: i32, username: &str) -> Result<String, AppError> {
        self.issue_at(user_id, username, Utc::now())
    }

    /// Issues a token as if it were created at `issued_at`.
    ///
    /// The output is deterministic for identical arguments.
    pub fn issue_at(
        &self,
        user_id: i32,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Checks the signature and expiry of `token` and returns its claims.
    ///
    /// Any failure (malformed input, bad signature, expired) is `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}
