//! # Signed URL Generation
//!
//! Time-limited retrieval links for objects in a bucket. The token is an
//! HMAC-SHA256 over `bucket/name/expires` keyed with the secret, so a link is
//! only valid for the exact object and expiry it was issued for.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::errors::{StorageError, StorageResult};

type HmacSha256 = Hmac<Sha256>;

/// Signed URL generator
#[derive(Debug, Clone)]
pub struct SignedUrlGenerator {
    secret: Vec<u8>,
    default_expiry: Duration,
}

impl SignedUrlGenerator {
    /// Create a new generator with a one hour default expiry
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
            default_expiry: Duration::hours(1),
        }
    }

    /// Override the default expiry
    pub fn with_default_expiry(mut self, expiry: Duration) -> Self {
        self.default_expiry = expiry;
        self
    }

    /// Generate a signed URL
    pub fn generate(
        &self,
        bucket: &str,
        name: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> StorageResult<SignedUrl> {
        let expires = expires_at.unwrap_or_else(|| Utc::now() + self.default_expiry);
        // Sub-second precision does not survive the query string
        let expires_ts = expires.timestamp();
        let mac = self.mac(bucket, name, expires_ts)?;

        Ok(SignedUrl {
            bucket: bucket.to_string(),
            name: name.to_string(),
            expires_at: Utc.timestamp_opt(expires_ts, 0).single().unwrap_or(expires),
            signature: URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()),
        })
    }

    /// Verify the `expires`/`token` pair presented for an object
    pub fn verify(&self, bucket: &str, name: &str, expires_ts: i64, token: &str) -> StorageResult<()> {
        if Utc::now().timestamp() > expires_ts {
            return Err(StorageError::UrlExpired);
        }

        let presented = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| StorageError::InvalidSignature)?;

        self.mac(bucket, name, expires_ts)?
            .verify_slice(&presented)
            .map_err(|_| StorageError::InvalidSignature)
    }

    fn mac(&self, bucket: &str, name: &str, expires_ts: i64) -> StorageResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| StorageError::Internal(format!("signing key rejected: {}", e)))?;
        mac.update(format!("{}/{}/{}", bucket, name, expires_ts).as_bytes());
        Ok(mac)
    }
}

/// A signed URL
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub bucket: String,
    pub name: String,
    pub expires_at: DateTime<Utc>,
    pub signature: String,
}

impl SignedUrl {
    /// Render against the public base URL of the gateway
    pub fn to_url(&self, base_url: &str) -> String {
        format!(
            "{}?expires={}&token={}",
            object_url(base_url, &self.bucket, &self.name),
            self.expires_at.timestamp(),
            self.signature
        )
    }
}

/// Unsigned location of an object, as reported after upload
pub fn object_url(base_url: &str, bucket: &str, name: &str) -> String {
    format!(
        "{}/storage/{}/{}",
        base_url.trim_end_matches('/'),
        encode_path_segment(bucket),
        encode_path_segment(name)
    )
}

/// Percent-encode everything outside the RFC 3986 unreserved set
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify() {
        let generator = SignedUrlGenerator::new(b"test-secret");

        let signed = generator.generate("avatars", "user-123.png", None).unwrap();
        assert!(!signed.signature.is_empty());

        assert!(generator
            .verify("avatars", "user-123.png", signed.expires_at.timestamp(), &signed.signature)
            .is_ok());
    }

    #[test]
    fn test_default_expiry_is_one_hour() {
        let generator = SignedUrlGenerator::new(b"s");
        let signed = generator.generate("b", "f", None).unwrap();
        let remaining = signed.expires_at - Utc::now();
        assert!(remaining <= Duration::hours(1));
        assert!(remaining > Duration::minutes(59));
    }

    #[test]
    fn test_expired_url() {
        let generator = SignedUrlGenerator::new(b"test-secret");
        let past = Utc::now() - Duration::hours(1);
        let signed = generator.generate("test", "file.txt", Some(past)).unwrap();

        assert!(matches!(
            generator.verify("test", "file.txt", past.timestamp(), &signed.signature),
            Err(StorageError::UrlExpired)
        ));
    }

    #[test]
    fn test_invalid_signature() {
        let generator = SignedUrlGenerator::new(b"test-secret");
        let expires = (Utc::now() + Duration::hours(1)).timestamp();

        assert!(matches!(
            generator.verify("test", "file.txt", expires, "bad-signature"),
            Err(StorageError::InvalidSignature)
        ));
    }

    #[test]
    fn test_signature_is_keyed_hmac() {
        let generator = SignedUrlGenerator::new(b"key");
        let expires_at = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();
        let signed = generator.generate("b", "f", Some(expires_at)).unwrap();

        let mut mac = HmacSha256::new_from_slice(b"key").unwrap();
        mac.update(b"b/f/1700000000");
        assert_eq!(signed.signature, URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()));
    }

    #[test]
    fn test_truncated_or_padded_token_rejected() {
        let generator = SignedUrlGenerator::new(b"test-secret");
        let signed = generator.generate("bucket", "a.txt", None).unwrap();
        let expires = signed.expires_at.timestamp();

        let truncated = &signed.signature[..signed.signature.len() - 4];
        let extended = format!("{}AAAA", signed.signature);
        for token in [truncated, extended.as_str(), "", "!!not-base64!!"] {
            assert!(matches!(
                generator.verify("bucket", "a.txt", expires, token),
                Err(StorageError::InvalidSignature)
            ));
        }
    }

    #[test]
    fn test_signature_bound_to_object() {
        let generator = SignedUrlGenerator::new(b"test-secret");
        let signed = generator.generate("bucket", "a.txt", None).unwrap();

        assert!(generator
            .verify("bucket", "b.txt", signed.expires_at.timestamp(), &signed.signature)
            .is_err());
        assert!(SignedUrlGenerator::new(b"other-secret")
            .verify("bucket", "a.txt", signed.expires_at.timestamp(), &signed.signature)
            .is_err());
    }

    #[test]
    fn test_to_url() {
        let generator = SignedUrlGenerator::new(b"secret");
        let signed = generator.generate("bucket", "my file.txt", None).unwrap();

        let url = signed.to_url("https://files.example.com/");
        assert!(url.starts_with("https://files.example.com/storage/bucket/my%20file.txt?expires="));
        assert!(url.contains("&token="));
    }
}
