use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::config::AuthSettings;

/// bcrypt only looks at the first 72 bytes of a password
pub const MAX_PASSWORD_BYTES: usize = 72;

const DEFAULT_BCRYPT_COST: u32 = 12;

/// Sample values that must never sign real tokens
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me",
    "changeme",
    "secret",
    "your-secret-key",
    "your-secret-key-here",
];

/// Errors from password hashing and token handling
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("Invalid token: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Password cannot be longer than {MAX_PASSWORD_BYTES} bytes")]
    PasswordTooLong,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token signing secret is missing or a placeholder; set SECRET_KEY")]
    WeakSecret,
}

/// JWT claims carried by access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// User id
    pub uid: i64,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Password hashing and access-token issuing/verification
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    /// Only HMAC algorithms are accepted since tokens are signed with a shared secret
    pub fn new(secret: &str, algorithm: &str, token_ttl: Duration) -> Result<Self, AuthError> {
        let algorithm = Algorithm::from_str(algorithm)
            .ok()
            .filter(|a| matches!(a, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512))
            .ok_or_else(|| AuthError::UnsupportedAlgorithm(algorithm.to_string()))?;

        let trimmed = secret.trim();
        if trimmed.is_empty()
            || PLACEHOLDER_SECRETS.iter().any(|p| trimmed.eq_ignore_ascii_case(p))
        {
            return Err(AuthError::WeakSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            token_ttl,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        })
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AuthError> {
        Self::new(
            &settings.secret_key,
            &settings.algorithm,
            Duration::minutes(settings.access_token_expire_minutes),
        )
    }

    /// Lower the bcrypt work factor, for tests and seeding
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost.clamp(4, 31);
        self
    }

    /// Token lifetime in seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.num_seconds()
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::PasswordTooLong);
        }
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    /// Malformed hashes count as a mismatch
    pub fn verify_password(&self, password: &str, hashed: &str) -> bool {
        bcrypt::verify(password, hashed).unwrap_or(false)
    }

    pub fn create_access_token(&self, username: &str, user_id: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            uid: user_id,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?)
    }

    /// Decode and validate signature and expiry
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(self.algorithm);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("algorithm", &self.algorithm)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}
