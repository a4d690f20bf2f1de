//! Slack request signature verification
//!
//! Slack signs every webhook with `v0=hex(HMAC-SHA256(secret, "v0:{timestamp}:{body}"))`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature
pub const SIGNATURE_HEADER: &str = "x-slack-signature";
/// Header carrying the signing timestamp (unix seconds)
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

const VERSION: &str = "v0";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing header {0}")]
    MissingHeader(&'static str),
    #[error("invalid request timestamp")]
    InvalidTimestamp,
    #[error("request timestamp outside the allowed window")]
    StaleTimestamp,
    #[error("malformed signature")]
    Malformed,
    #[error("signature mismatch")]
    Mismatch,
    #[error("signing secret rejected by HMAC")]
    InvalidKey,
}

/// Verifies inbound Slack requests against the app's signing secret
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>, tolerance_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs,
        }
    }

    /// Verify against the current time
    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        self.verify_at(timestamp, signature, body, chrono::Utc::now().timestamp())
    }

    /// Verify against an explicit `now` (unix seconds)
    pub fn verify_at(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
        now: i64,
    ) -> Result<(), SignatureError> {
        let timestamp = timestamp.ok_or(SignatureError::MissingHeader(TIMESTAMP_HEADER))?;
        let signature = signature.ok_or(SignatureError::MissingHeader(SIGNATURE_HEADER))?;

        let ts: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::InvalidTimestamp)?;
        if now.abs_diff(ts) > self.tolerance_secs.unsigned_abs() {
            return Err(SignatureError::StaleTimestamp);
        }

        let expected = signature
            .trim()
            .strip_prefix("v0=")
            .and_then(|digest| hex::decode(digest).ok())
            .ok_or(SignatureError::Malformed)?;

        self.mac(timestamp.trim(), body)?
            .verify_slice(&expected)
            .map_err(|_| SignatureError::Mismatch)
    }

    /// Compute the `v0=` signature for a timestamp and body
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> Result<String, SignatureError> {
        let digest = self.mac(timestamp, body)?.finalize().into_bytes();
        Ok(format!("{}={}", VERSION, hex::encode(digest)))
    }

    fn mac(&self, timestamp: &str, body: &[u8]) -> Result<HmacSha256, SignatureError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| SignatureError::InvalidKey)?;
        mac.update(VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);
        Ok(mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_531_420_618;

    // Example from Slack's "Verifying requests from Slack" guide
    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const BODY: &str = "token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
    const SIGNATURE: &str =
        "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503";

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(SECRET, 300)
    }

    #[test]
    fn test_known_slack_example() {
        let v = verifier();
        assert_eq!(v.sign("1531420618", BODY.as_bytes()).unwrap(), SIGNATURE);
        assert_eq!(
            v.verify_at(Some("1531420618"), Some(SIGNATURE), BODY.as_bytes(), NOW),
            Ok(())
        );
    }

    #[test]
    fn test_tampered_body_rejected() {
        let v = verifier();
        let body = BODY.replace("roadrunner", "coyote");
        assert_eq!(
            v.verify_at(Some("1531420618"), Some(SIGNATURE), body.as_bytes(), NOW),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let v = verifier();
        assert_eq!(
            v.verify_at(Some("1531420618"), Some(SIGNATURE), BODY.as_bytes(), NOW + 301),
            Err(SignatureError::StaleTimestamp)
        );
    }

    #[test]
    fn test_missing_and_malformed_headers() {
        let v = verifier();
        assert_eq!(
            v.verify_at(None, Some(SIGNATURE), BODY.as_bytes(), NOW),
            Err(SignatureError::MissingHeader(TIMESTAMP_HEADER))
        );
        assert_eq!(
            v.verify_at(Some("1531420618"), None, BODY.as_bytes(), NOW),
            Err(SignatureError::MissingHeader(SIGNATURE_HEADER))
        );
        assert_eq!(
            v.verify_at(Some("yesterday"), Some(SIGNATURE), BODY.as_bytes(), NOW),
            Err(SignatureError::InvalidTimestamp)
        );
        assert_eq!(
            v.verify_at(Some("1531420618"), Some("v1=abcd"), BODY.as_bytes(), NOW),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            v.verify_at(Some("1531420618"), Some("v0=zz"), BODY.as_bytes(), NOW),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            v.verify_at(Some("-9223372036854775808"), Some("v0=00"), b"x", NOW),
            Err(SignatureError::StaleTimestamp)
        );
        assert_eq!(
            v.verify_at(Some("9223372036854775807"), Some("v0=00"), b"x", i64::MIN),
            Err(SignatureError::StaleTimestamp)
        );
    }

    #[test]
    fn test_sign_then_verify_now() {
        let v = SignatureVerifier::new("another-secret", 300);
        let ts = chrono::Utc::now().timestamp().to_string();
        let sig = v.sign(&ts, b"text=hello").unwrap();
        assert!(v.verify(Some(&ts), Some(&sig), b"text=hello").is_ok());
    }
}
