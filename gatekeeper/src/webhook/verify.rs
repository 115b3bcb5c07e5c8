//! Webhook signature verification

use std::time::Duration;

use axum::http::HeaderMap;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::errors::BridgeError;

type HmacSha256 = Hmac<Sha256>;

/// Prefix the platform puts on issued signing secrets
const SECRET_PREFIX: &str = "whsec_";

/// Signature scheme accepted in the signature header
const SIGNATURE_SCHEME: &str = "v1";

/// Message id header
pub const HEADER_ID: &str = "webhook-id";

/// Unix timestamp header
pub const HEADER_TIMESTAMP: &str = "webhook-timestamp";

/// Signature list header
pub const HEADER_SIGNATURE: &str = "webhook-signature";

/// Identifying headers attached to one webhook delivery
#[derive(Debug, Clone)]
pub struct WebhookHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

impl WebhookHeaders {
    /// Extract the required webhook headers from a request header map
    pub fn from_header_map(headers: &HeaderMap) -> Result<Self, BridgeError> {
        Ok(Self {
            id: required_header(headers, HEADER_ID)?,
            timestamp: required_header(headers, HEADER_TIMESTAMP)?,
            signature: required_header(headers, HEADER_SIGNATURE)?,
        })
    }
}

fn required_header(headers: &HeaderMap, name: &str) -> Result<String, BridgeError> {
    headers
        .get(name)
        .ok_or_else(|| BridgeError::VerificationError(format!("missing {} header", name)))?
        .to_str()
        .map(|value| value.to_string())
        .map_err(|_| BridgeError::VerificationError(format!("invalid {} header", name)))
}

/// Verifies that inbound payloads were signed by the platform
pub struct SignatureVerifier {
    key: Vec<u8>,
    tolerance: Duration,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("key", &"<redacted>")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

impl SignatureVerifier {
    /// Create a verifier from a prefixed, base64-encoded signing secret
    pub fn new(secret: &SecretString, tolerance: Duration) -> Result<Self, BridgeError> {
        let encoded = secret.expose_secret().strip_prefix(SECRET_PREFIX).ok_or_else(|| {
            BridgeError::ConfigError(format!("webhook secret must start with {}", SECRET_PREFIX))
        })?;

        let key = BASE64
            .decode(encoded)
            .map_err(|_| BridgeError::ConfigError("webhook secret is not valid base64".to_string()))?;

        Ok(Self { key, tolerance })
    }

    /// Verify one delivery and return its payload as parsed JSON
    ///
    /// The signed content is the join `{id}.{timestamp}.{body}`. The
    /// signature header may carry several whitespace-separated
    /// `scheme,signature` pairs; a constant-time match on any `v1` entry
    /// accepts the delivery.
    pub fn verify(
        &self,
        body: &[u8],
        headers: &WebhookHeaders,
    ) -> Result<serde_json::Value, BridgeError> {
        self.verify_at(body, headers, Utc::now().timestamp())
    }

    // Clock is an argument so tests can pin it.
    fn verify_at(
        &self,
        body: &[u8],
        headers: &WebhookHeaders,
        now: i64,
    ) -> Result<serde_json::Value, BridgeError> {
        let timestamp: i64 = headers.timestamp.parse().map_err(|_| {
            BridgeError::VerificationError("timestamp header is not a unix timestamp".to_string())
        })?;

        if (now - timestamp).unsigned_abs() > self.tolerance.as_secs() {
            return Err(BridgeError::VerificationError(
                "message timestamp out of tolerance".to_string(),
            ));
        }

        let mut matched = false;
        for entry in headers.signature.split_whitespace() {
            let Some((scheme, encoded)) = entry.split_once(',') else {
                continue;
            };
            if scheme != SIGNATURE_SCHEME {
                continue;
            }
            let Ok(candidate) = BASE64.decode(encoded) else {
                continue;
            };
            if self
                .mac(&headers.id, &headers.timestamp, body)
                .verify_slice(&candidate)
                .is_ok()
            {
                matched = true;
                break;
            }
        }

        if !matched {
            return Err(BridgeError::VerificationError(
                "no matching signature found".to_string(),
            ));
        }

        serde_json::from_slice(body)
            .map_err(|_| BridgeError::VerificationError("payload is not valid JSON".to_string()))
    }

    /// Compute the `v1` signature entry for a delivery
    pub fn sign(&self, id: &str, timestamp: &str, body: &[u8]) -> String {
        let signature = self.mac(id, timestamp, body).finalize().into_bytes();
        format!("{},{}", SIGNATURE_SCHEME, BASE64.encode(signature))
    }

    fn mac(&self, id: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC key size is always valid");
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_dGhpcy1pcy1hLXRlc3Qtc2lnbmluZy1rZXk=";

    fn verifier() -> SignatureVerifier {
        let secret = SecretString::from(TEST_SECRET.to_string());
        SignatureVerifier::new(&secret, Duration::from_secs(300)).unwrap()
    }

    fn signed_headers(verifier: &SignatureVerifier, timestamp: i64, body: &[u8]) -> WebhookHeaders {
        let timestamp = timestamp.to_string();
        WebhookHeaders {
            id: "msg_2b3c".to_string(),
            timestamp: timestamp.clone(),
            signature: verifier.sign("msg_2b3c", &timestamp, body),
        }
    }

    #[test]
    fn test_verify_valid_signature() {
        let verifier = verifier();
        let body = br#"{"type":"deployment.validate","data":{}}"#;
        let headers = signed_headers(&verifier, 1_700_000_000, body);

        let payload = verifier.verify_at(body, &headers, 1_700_000_000).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({"type": "deployment.validate", "data": {}})
        );
    }

    #[test]
    fn test_verify_rejects_tampered_body() {
        let verifier = verifier();
        let body = br#"{"type":"deployment.validate","data":{}}"#.to_vec();
        let headers = signed_headers(&verifier, 1_700_000_000, &body);

        // Flip a single byte of the signed body
        let mut tampered = body.clone();
        tampered[10] ^= 0x01;

        let err = verifier.verify_at(&tampered, &headers, 1_700_000_000).unwrap_err();
        assert!(err.to_string().contains("no matching signature"));
    }

    #[test]
    fn test_verify_rejects_stale_timestamp() {
        let verifier = verifier();
        let body = br#"{"type":"deployment.validate","data":{}}"#;
        let headers = signed_headers(&verifier, 1_700_000_000, body);

        // Correctly signed, but delivered 301 seconds later
        let err = verifier.verify_at(body, &headers, 1_700_000_301).unwrap_err();
        assert!(err.to_string().contains("out of tolerance"));
    }

    #[test]
    fn test_verify_rejects_future_timestamp() {
        let verifier = verifier();
        let body = br#"{"type":"deployment.validate","data":{}}"#;
        let headers = signed_headers(&verifier, 1_700_000_400, body);

        let err = verifier.verify_at(body, &headers, 1_700_000_000).unwrap_err();
        assert!(err.to_string().contains("out of tolerance"));
    }

    #[test]
    fn test_verify_accepts_any_matching_signature() {
        let verifier = verifier();
        let body = br#"{"type":"deployment.validate","data":{}}"#;
        let mut headers = signed_headers(&verifier, 1_700_000_000, body);
        headers.signature = format!("v0,bm90LXJlYWw= v1,bm90LXJlYWw= {}", headers.signature);

        assert!(verifier.verify_at(body, &headers, 1_700_000_000).is_ok());
    }

    #[test]
    fn test_verify_rejects_non_numeric_timestamp() {
        let verifier = verifier();
        let body = br#"{}"#;
        let mut headers = signed_headers(&verifier, 1_700_000_000, body);
        headers.timestamp = "yesterday".to_string();

        let err = verifier.verify_at(body, &headers, 1_700_000_000).unwrap_err();
        assert!(err.to_string().contains("unix timestamp"));
    }

    #[test]
    fn test_verify_rejects_non_json_body() {
        let verifier = verifier();
        let body = b"not json at all";
        let headers = signed_headers(&verifier, 1_700_000_000, body);

        let err = verifier.verify_at(body, &headers, 1_700_000_000).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_secret_must_carry_prefix() {
        let secret = SecretString::from("dGhpcy1pcy1hLXRlc3Qtc2lnbmluZy1rZXk=".to_string());
        let err = SignatureVerifier::new(&secret, Duration::from_secs(300)).unwrap_err();
        assert!(matches!(err, BridgeError::ConfigError(_)));
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let mut header_map = HeaderMap::new();
        header_map.insert(HEADER_ID, "msg_2b3c".parse().unwrap());
        header_map.insert(HEADER_TIMESTAMP, "1700000000".parse().unwrap());

        let err = WebhookHeaders::from_header_map(&header_map).unwrap_err();
        assert!(err.to_string().contains("missing webhook-signature header"));
    }
}
