//! Media Configuration
//!
//! Signing material for playback URLs. The CDN scheme is used when its
//! material (domain, key pair id, private key) is configured; otherwise
//! every URL falls back to the pre-signed direct-storage scheme. Both
//! carry the same fixed expiry window.

use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::signing::{CdnSigner, SignedUrl, StorageSigner};

/// Playback URL lifetime (4 hours)
pub const DEFAULT_URL_TTL: Duration = Duration::from_secs(4 * 3600);

/// Media signing configuration
#[derive(Debug)]
pub struct MediaConfig {
    /// Preferred scheme when signing material is configured
    cdn: Option<CdnSigner>,
    /// Always-available fallback
    storage: StorageSigner,
    /// How long issued URLs stay valid
    pub url_ttl: Duration,
}

impl MediaConfig {
    pub fn new(cdn: Option<CdnSigner>, storage: StorageSigner) -> Self {
        Self {
            cdn,
            storage,
            url_ttl: DEFAULT_URL_TTL,
        }
    }

    /// Override the URL lifetime
    pub fn with_url_ttl(mut self, ttl: Duration) -> Self {
        self.url_ttl = ttl;
        self
    }

    /// Storage-only config with a random secret (for development)
    pub fn development() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&platform::crypto::random_bytes(32));
        Self::new(
            None,
            StorageSigner::new("http://localhost:9000", "academy-videos", secret),
        )
    }

    /// Whether the CDN scheme is active
    pub fn cdn_configured(&self) -> bool {
        self.cdn.is_some()
    }

    /// Sign `object_key` for playback starting at `now`
    pub fn sign(&self, object_key: &str, now: DateTime<Utc>) -> SignedUrl {
        let expires_at = now.timestamp() + self.url_ttl.as_secs() as i64;

        match &self.cdn {
            Some(cdn) => cdn.sign(object_key, expires_at),
            None => self.storage.sign(object_key, expires_at),
        }
    }

    /// URL lifetime in whole seconds
    pub fn url_ttl_secs(&self) -> i64 {
        self.url_ttl.as_secs() as i64
    }
}
