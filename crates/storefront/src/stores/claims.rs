//! Session token identity claims.
//!
//! The commerce API issues JWTs whose payload embeds the user's id. The
//! storefront only needs that id for display and for the order-history
//! endpoint, so the payload segment is decoded without verifying the
//! signature - the API itself re-validates the token on every call.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

use fresh_cart_core::UserId;

/// Errors that can occur when decoding a token's claims.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// The token does not have the three dot-separated JWT segments.
    #[error("token is not a three-segment JWT")]
    Malformed,

    /// The payload segment is not valid base64url.
    #[error("token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload JSON does not carry the expected claims.
    #[error("token payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The identity claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// The user's id.
    pub id: UserId,
    /// The user's display name, when present.
    #[serde(default)]
    pub name: Option<String>,
    /// The user's role, when present.
    #[serde(default)]
    pub role: Option<String>,
    /// Issued-at timestamp (seconds).
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiry timestamp (seconds).
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the identity claims from a session token.
///
/// # Errors
///
/// Returns an error if the token is not a three-segment JWT or its
/// payload does not decode to the expected claims.
pub fn decode_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ClaimsError::Malformed);
    };

    // Tolerate padded producers
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Build an unsigned token carrying the given claims payload.
    pub(crate) fn make_token(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_decode_claims() {
        let token = make_token(&json!({
            "id": "640ab1f38f1a",
            "name": "Ahmed",
            "role": "user",
            "iat": 1_700_000_000,
            "exp": 1_707_776_000
        }));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.id, UserId::new("640ab1f38f1a"));
        assert_eq!(claims.name.as_deref(), Some("Ahmed"));
        assert_eq!(claims.exp, Some(1_707_776_000));
    }

    #[test]
    fn test_decode_minimal_claims() {
        let token = make_token(&json!({ "id": "u1" }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.id, UserId::new("u1"));
        assert_eq!(claims.name, None);
    }

    #[test]
    fn test_rejects_non_jwt() {
        assert!(matches!(decode_claims("nope"), Err(ClaimsError::Malformed)));
        assert!(matches!(
            decode_claims("a.b.c.d"),
            Err(ClaimsError::Malformed)
        ));
    }

    #[test]
    fn test_rejects_garbage_payload() {
        assert!(decode_claims("h.!!!.s").is_err());
    }
}
