//! Bearer token claims decoding.
//!
//! The token is a JWT-shaped `header.payload.signature` string. Only the
//! payload is read: it is base64url JSON carrying `id` (or `sub`), `email`,
//! `role`, `exp` and `iat`.
//!
//! TRADE-OFFS
//! ==========
//! No signature check happens here. Decoded claims are good enough to pick a
//! view or a redirect, never to authorize data access.

#[cfg(test)]
#[path = "claims_test.rs"]
mod claims_test;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Claims extracted from a session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Claims {
    /// User identifier (`id`, falling back to `sub`).
    #[serde(rename = "id")]
    pub subject_id: String,
    pub email: String,
    /// Open role tag, e.g. `"admin"` or `"user"`.
    pub role: String,
    /// Issue time in seconds since the Unix epoch, when present.
    #[serde(rename = "iat", skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,
    /// Expiry in seconds since the Unix epoch.
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Claims {
    /// Whether the token is no longer valid at `now` (seconds since epoch).
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// Seconds of validity left at `now`, or `None` once expired.
    #[must_use]
    pub fn expires_in(&self, now: i64) -> Option<u64> {
        let left = self.expires_at.saturating_sub(now);
        (left > 0).then(|| left.unsigned_abs())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("token must have three dot-separated segments")]
    Segments,
    #[error("token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not a claims object: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token payload is missing the `{0}` claim")]
    MissingClaim(&'static str),
}

/// Payload as it appears on the wire. Every field is optional so a missing
/// claim surfaces as [`DecodeError::MissingClaim`] rather than a serde message.
#[derive(Deserialize)]
struct WireClaims {
    #[serde(default, deserialize_with = "string_or_number")]
    id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    sub: Option<String>,
    email: Option<String>,
    role: Option<String>,
    iat: Option<i64>,
    exp: Option<i64>,
}

impl TryFrom<WireClaims> for Claims {
    type Error = DecodeError;

    fn try_from(wire: WireClaims) -> Result<Self, Self::Error> {
        Ok(Self {
            subject_id: wire.id.or(wire.sub).ok_or(DecodeError::MissingClaim("id"))?,
            email: wire.email.ok_or(DecodeError::MissingClaim("email"))?,
            role: wire.role.ok_or(DecodeError::MissingClaim("role"))?,
            issued_at: wire.iat,
            expires_at: wire.exp.ok_or(DecodeError::MissingClaim("exp"))?,
        })
    }
}

/// Backends disagree on whether user ids are strings or integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    }))
}

/// Decode the claims carried by `token` without verifying its signature.
///
/// # Errors
///
/// Returns [`DecodeError`] for anything that is not a three-segment token
/// whose payload is base64url JSON with `id`/`sub`, `email`, `role` and `exp`.
pub fn decode(token: &str) -> Result<Claims, DecodeError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(DecodeError::Segments);
    };
    if payload.is_empty() {
        return Err(DecodeError::Segments);
    }

    // Some encoders keep the padding; base64url in JWTs normally drops it.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let wire: WireClaims = serde_json::from_slice(&bytes)?;
    Claims::try_from(wire)
}
