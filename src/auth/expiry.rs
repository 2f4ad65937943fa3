//! Expiry extraction from JWT-shaped tokens.
//!
//! The signature is never verified; the claim is only used to decide when a
//! token should be refreshed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};

/// Read the `exp` claim (epoch seconds) from the payload segment of `token`.
///
/// Returns `None` when the token has no payload segment, the payload is not
/// base64, not a JSON object, or has no integer `exp`.
///
/// ```
/// use roost::auth::decode_expiration;
///
/// // {"exp":1700000000}
/// let token = "eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjE3MDAwMDAwMDB9.sig";
/// assert_eq!(decode_expiration(token), Some(1_700_000_000));
/// assert_eq!(decode_expiration("opaque-token"), None);
/// ```
pub fn decode_expiration(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;

    let mut normalized: String = payload
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    let decoded = STANDARD.decode(normalized.as_bytes()).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    claims.as_object()?.get("exp")?.as_i64()
}

/// [`decode_expiration`] as a timestamp.
pub fn decode_expiration_time(token: &str) -> Option<DateTime<Utc>> {
    decode_expiration(token).and_then(|exp| DateTime::from_timestamp(exp, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn jwt(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn reads_exp_claim() {
        let token = jwt(&serde_json::json!({ "sub": "42", "exp": 1_700_000_000 }));
        assert_eq!(decode_expiration(&token), Some(1_700_000_000));
    }

    #[test]
    fn handles_url_safe_alphabet_and_missing_padding() {
        // Payload bytes chosen so the encoding contains both '-' and '_'.
        let claims = serde_json::json!({ "exp": 1_800_000_000, "n": "??>>~~" });
        let token = jwt(&claims);
        let payload = token.split('.').nth(1).unwrap();
        assert!(payload.contains('-') || payload.contains('_'));
        assert_ne!(payload.len() % 4, 0);
        assert_eq!(decode_expiration(&token), Some(1_800_000_000));
    }

    #[test]
    fn two_segments_are_enough() {
        let token = jwt(&serde_json::json!({ "exp": 10 }));
        let truncated = token.rsplit_once('.').unwrap().0;
        assert_eq!(decode_expiration(truncated), Some(10));
    }

    #[test]
    fn single_segment_is_rejected() {
        assert_eq!(decode_expiration("eyJleHAiOjEwfQ"), None);
        assert_eq!(decode_expiration(""), None);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert_eq!(decode_expiration("header.!!!not-base64!!!.sig"), None);
    }

    #[test]
    fn non_json_payload_is_rejected() {
        let payload = URL_SAFE_NO_PAD.encode("plain text");
        assert_eq!(decode_expiration(&format!("h.{payload}.s")), None);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let payload = URL_SAFE_NO_PAD.encode("[1700000000]");
        assert_eq!(decode_expiration(&format!("h.{payload}.s")), None);
    }

    #[test]
    fn missing_or_non_integer_exp_is_rejected() {
        assert_eq!(decode_expiration(&jwt(&serde_json::json!({ "sub": "1" }))), None);
        assert_eq!(
            decode_expiration(&jwt(&serde_json::json!({ "exp": "1700000000" }))),
            None
        );
        assert_eq!(
            decode_expiration(&jwt(&serde_json::json!({ "exp": 1.5 }))),
            None
        );
    }

    #[test]
    fn expiration_time_converts_to_utc() {
        let token = jwt(&serde_json::json!({ "exp": 1_700_000_000 }));
        let at = decode_expiration_time(&token).unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
    }
}
