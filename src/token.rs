//! Session token codec
//!
//! Stateless signed tokens carrying the identity claims established at
//! login. The role claim is a snapshot at mint time; it is not re-checked
//! against the profile row until the next mint.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::Role;

/// Fixed token validity window: 7 days.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Provider identity id of the authenticated user
    pub sub: Uuid,
    pub email: String,
    /// Role snapshot at mint time
    pub role: Role,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("bad signature")]
    BadSignature,
    #[error("malformed token")]
    Malformed,
}

/// Mint a signed session token with the fixed TTL.
pub fn mint(
    user_id: Uuid,
    email: &str,
    role: Role,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    mint_at(user_id, email, role, secret, Utc::now())
}

/// Mint with an explicit clock. Lets tests produce already-expired tokens.
pub fn mint_at(
    user_id: Uuid,
    email: &str,
    role: Role,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role,
        iat: now.timestamp(),
        exp: now.timestamp() + TOKEN_TTL_SECS,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

/// Verify signature and expiry, returning the claims.
///
/// Zero leeway: a token is accepted up to and including its exact expiry
/// second and rejected strictly after.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed,
        })
}

/// Decode claims without checking signature or expiry.
///
/// Used only by the refresh flow to recover identity from a possibly-expired
/// cookie before re-minting. Never use this to authorize a request.
pub fn decode_unsafe(token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}
