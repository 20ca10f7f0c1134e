use crate::db::models::Account;
use crate::error::{AppError, AuthError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried inside a signed token: the account's public number plus a
/// standard expiry timestamp.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub account_number: i64,
    pub exp: i64,
}

/// How the expiry claim is computed at issue time.
///
/// `Relative` is the production policy (expiry moves with issue time).
/// `Fixed` pins every token to one absolute instant regardless of when it
/// was issued; all tokens then expire together.
#[derive(Debug, Clone, Copy)]
pub enum ExpiryPolicy {
    Fixed(DateTime<Utc>),
    Relative(Duration),
}

pub struct TokenService {
    secret: String,
    expiry: ExpiryPolicy,
}

impl TokenService {
    /// The secret is injected at construction; configuration validates its
    /// presence at boot, so there is no empty-key signing path.
    pub fn new(secret: impl Into<String>, expiry: ExpiryPolicy) -> Self {
        Self {
            secret: secret.into(),
            expiry,
        }
    }

    /// Signs an HS256 token asserting the account's public number.
    pub fn issue(&self, account: &Account) -> Result<String, AppError> {
        let exp = match self.expiry {
            ExpiryPolicy::Fixed(instant) => instant.timestamp(),
            ExpiryPolicy::Relative(ttl) => (Utc::now() + ttl).timestamp(),
        };
        let claims = Claims {
            account_number: account.number,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))
    }

    /// Verifies signature and expiry. Only HS256 is accepted; a token signed
    /// under any other algorithm family is rejected outright.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                AuthError::InvalidSignature
            }
            _ => AuthError::Malformed,
        })
    }
}
