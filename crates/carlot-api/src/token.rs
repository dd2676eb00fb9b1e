//! Stateless bearer tokens (HS256 JWT) carrying the user's id and name.
//!
//! There is no revocation list and no refresh: a token is good until its
//! `exp`, whatever happens to the user afterwards.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use carlot_types::api::Claims;

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl: Duration,
}

/// Why a presented token was refused. Only ever logged; clients get one
/// generic 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no bearer token")]
    Missing,
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("bad token signature")]
    BadSignature,
}

pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: config.ttl,
        }
    }

    pub fn issue(&self, user_id: i64, name: &str) -> anyhow::Result<String> {
        self.issue_at(user_id, name, Utc::now())
    }

    pub fn issue_at(&self, user_id: i64, name: &str, issued_at: DateTime<Utc>) -> anyhow::Result<String> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| anyhow::anyhow!("token lifetime overflows the calendar"))?;

        let claims = Claims {
            user_id,
            name: name.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                _ => AuthError::Malformed,
            })
    }
}
