//! Media URL Signing
//!
//! Produces time-limited playback URLs that the delivery layer can
//! verify without a server round-trip. Two schemes with identical
//! expiry semantics:
//!
//! - [`CdnSigner`]: canned-policy signature for a CDN distribution. The
//!   policy pins the resource URL and a `DateLessThan` epoch; the
//!   Ed25519 signature and key-pair id travel as query parameters.
//! - [`StorageSigner`]: pre-signed direct-storage URL, HMAC-SHA256 over
//!   the object key and expiry. Fallback when no CDN signing material
//!   is configured.

use ed25519_dalek::{Signer, SigningKey};

use crate::crypto::{hmac_sha256, to_base64, to_base64_url};

/// A signed URL together with its expiry instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    pub url: String,
    /// Unix seconds after which the URL stops working
    pub expires_at: i64,
}

// ============================================================================
// CDN canned-policy signing
// ============================================================================

/// Signs CDN URLs with a canned policy and a private key / key-pair id
pub struct CdnSigner {
    domain: String,
    key_pair_id: String,
    signing_key: SigningKey,
}

impl CdnSigner {
    pub fn new(domain: impl Into<String>, key_pair_id: impl Into<String>, seed: [u8; 32]) -> Self {
        Self {
            domain: domain.into(),
            key_pair_id: key_pair_id.into(),
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Sign `object_key` so the URL is valid until `expires_at` (Unix seconds)
    pub fn sign(&self, object_key: &str, expires_at: i64) -> SignedUrl {
        let resource = format!("https://{}/{}", self.domain, object_key);
        let policy = canned_policy(&resource, expires_at);

        let signature = self.signing_key.sign(policy.as_bytes());
        let signature_b64 = url_safe_transcribe(&to_base64(&signature.to_bytes()));

        let url = format!(
            "{}?Expires={}&Signature={}&Key-Pair-Id={}",
            resource, expires_at, signature_b64, self.key_pair_id
        );

        SignedUrl { url, expires_at }
    }
}

impl std::fmt::Debug for CdnSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdnSigner")
            .field("domain", &self.domain)
            .field("key_pair_id", &self.key_pair_id)
            .finish_non_exhaustive()
    }
}

/// Fixed-form policy document the CDN edge verifies offline
fn canned_policy(resource: &str, expires_at: i64) -> String {
    format!(
        r#"{{"Statement":[{{"Resource":"{}","Condition":{{"DateLessThan":{{"AWS:EpochTime":{}}}}}}}]}}"#,
        resource, expires_at
    )
}

/// CDN query-string alphabet: `+` -> `-`, `=` -> `_`, `/` -> `~`
fn url_safe_transcribe(b64: &str) -> String {
    b64.chars()
        .map(|c| match c {
            '+' => '-',
            '=' => '_',
            '/' => '~',
            other => other,
        })
        .collect()
}

// ============================================================================
// Pre-signed storage fallback
// ============================================================================

/// Signs direct-storage URLs with an HMAC shared with the storage layer
#[derive(Clone)]
pub struct StorageSigner {
    endpoint: String,
    bucket: String,
    secret: [u8; 32],
}

impl StorageSigner {
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>, secret: [u8; 32]) -> Self {
        Self {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            secret,
        }
    }

    /// Pre-sign `object_key` so the URL is valid until `expires_at` (Unix seconds)
    pub fn sign(&self, object_key: &str, expires_at: i64) -> SignedUrl {
        // Signature binds key and expiry; newline keeps the fields unambiguous
        let payload = format!("{}\n{}", object_key, expires_at);
        let mac = hmac_sha256(&self.secret, payload.as_bytes());

        let url = format!(
            "{}/{}/{}?expires={}&signature={}",
            self.endpoint,
            self.bucket,
            object_key,
            expires_at,
            to_base64_url(&mac)
        );

        SignedUrl { url, expires_at }
    }
}

impl std::fmt::Debug for StorageSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageSigner")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cdn_signer() -> CdnSigner {
        CdnSigner::new("videos.example.com", "K2JCJMDEHXQW5F", [7u8; 32])
    }

    #[test]
    fn test_cdn_url_shape() {
        let signed = cdn_signer().sign("courses/1/intro.mp4", 1_700_000_000);

        assert!(
            signed
                .url
                .starts_with("https://videos.example.com/courses/1/intro.mp4?Expires=1700000000&Signature=")
        );
        assert!(signed.url.ends_with("&Key-Pair-Id=K2JCJMDEHXQW5F"));
        assert_eq!(signed.expires_at, 1_700_000_000);
    }

    #[test]
    fn test_cdn_signature_is_url_safe_and_deterministic() {
        let a = cdn_signer().sign("a.mp4", 1_700_000_000);
        let b = cdn_signer().sign("a.mp4", 1_700_000_000);
        assert_eq!(a, b);

        // Transcribed alphabet never contains raw base64 specials
        let query = a.url.split_once('?').unwrap().1;
        assert!(!query.contains('+') && !query.contains('/') && !query.contains('='));
    }

    #[test]
    fn test_cdn_signature_depends_on_key_and_expiry() {
        let base = cdn_signer().sign("a.mp4", 1_700_000_000);
        let other_expiry = cdn_signer().sign("a.mp4", 1_700_000_001);
        assert_ne!(base.url, other_expiry.url);

        let other_key = CdnSigner::new("videos.example.com", "K2JCJMDEHXQW5F", [8u8; 32])
            .sign("a.mp4", 1_700_000_000);
        assert_ne!(base.url, other_key.url);
    }

    #[test]
    fn test_canned_policy_format() {
        let policy = canned_policy("https://cdn.example.com/a.mp4", 123);
        assert_eq!(
            policy,
            r#"{"Statement":[{"Resource":"https://cdn.example.com/a.mp4","Condition":{"DateLessThan":{"AWS:EpochTime":123}}}]}"#
        );
    }

    #[test]
    fn test_storage_url_shape() {
        let signer = StorageSigner::new("https://storage.example.com", "academy-videos", [3u8; 32]);
        let signed = signer.sign("courses/1/intro.mp4", 1_700_000_000);

        assert!(signed.url.starts_with(
            "https://storage.example.com/academy-videos/courses/1/intro.mp4?expires=1700000000&signature="
        ));
        assert_eq!(signed.expires_at, 1_700_000_000);
    }

    #[test]
    fn test_storage_signature_binds_key_and_expiry() {
        let signer = StorageSigner::new("https://storage.example.com", "academy-videos", [3u8; 32]);

        let a = signer.sign("a.mp4", 1_700_000_000);
        let b = signer.sign("a.mp4", 1_700_000_000);
        assert_eq!(a, b);

        assert_ne!(signer.sign("b.mp4", 1_700_000_000).url, a.url);
        assert_ne!(signer.sign("a.mp4", 1_700_000_001).url, a.url);
    }

    #[test]
    fn test_both_schemes_share_expiry_semantics() {
        let storage = StorageSigner::new("https://storage.example.com", "b", [0u8; 32]);
        let expires_at = 1_700_000_000;

        assert_eq!(cdn_signer().sign("k", expires_at).expires_at, expires_at);
        assert_eq!(storage.sign("k", expires_at).expires_at, expires_at);
    }
}
