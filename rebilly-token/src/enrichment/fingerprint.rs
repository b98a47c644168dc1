//! Device fingerprint enrichment.

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::EnrichmentModule;
use crate::{error::Result, model::Fragment};

/// Fragment key carrying the fingerprint hash.
pub const FINGERPRINT_KEY: &str = "fingerprint";

/// Emits `{"fingerprint": "<sha256 hex>"}` computed over an ordered list of device
/// components.
///
/// The hash is stable for equal components in equal order. With no components the
/// fingerprint is `null`.
///
/// # Examples
///
/// ```
/// use rebilly_token::enrichment::DeviceFingerprint;
///
/// let fingerprint = DeviceFingerprint::new()
///     .with_component("userAgent", "Mozilla/5.0")
///     .with_component("language", "en-CA");
///
/// assert_eq!(fingerprint.hash().unwrap().len(), 64);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeviceFingerprint {
    components: Vec<(String, String)>,
}

impl DeviceFingerprint {
    /// Creates a fingerprint with no components.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a device component.
    #[must_use]
    pub fn with_component(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.components.push((name.into(), value.into()));
        self
    }

    /// Returns the hex-encoded SHA-256 of the components, or `None` when there are none.
    #[must_use]
    pub fn hash(&self) -> Option<String> {
        if self.components.is_empty() {
            return None;
        }

        let mut hasher = Sha256::new();
        for (name, value) in &self.components {
            // Length-prefix both parts so ("ab", "c") and ("a", "bc") differ.
            hasher.update((name.len() as u64).to_be_bytes());
            hasher.update(name.as_bytes());
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value.as_bytes());
        }
        Some(hex::encode(hasher.finalize()))
    }
}

#[async_trait]
impl EnrichmentModule for DeviceFingerprint {
    fn name(&self) -> &str {
        "fingerprint"
    }

    async fn produce(&self) -> Result<Fragment> {
        let mut fragment = Fragment::new();
        fragment.insert(FINGERPRINT_KEY.to_owned(), self.hash().map_or(Value::Null, Value::String));
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceFingerprint {
        DeviceFingerprint::new()
            .with_component("userAgent", "Mozilla/5.0 (X11; Linux x86_64)")
            .with_component("language", "fr-CA")
            .with_component("screen", "1920x1080")
            .with_component("timezone", "America/Toronto")
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(device().hash(), device().hash());
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = device().hash().unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_depends_on_components() {
        let other = device().with_component("platform", "Linux");
        assert_ne!(device().hash(), other.hash());
    }

    #[test]
    fn test_hash_separates_component_boundaries() {
        let left = DeviceFingerprint::new().with_component("ab", "c");
        let right = DeviceFingerprint::new().with_component("a", "bc");
        assert_ne!(left.hash(), right.hash());
    }

    #[test]
    fn test_no_components() {
        assert_eq!(DeviceFingerprint::new().hash(), None);
    }

    #[tokio::test]
    async fn test_produce() {
        let fragment = device().produce().await.unwrap();
        assert_eq!(fragment[FINGERPRINT_KEY], Value::String(device().hash().unwrap()));

        let fragment = DeviceFingerprint::new().produce().await.unwrap();
        assert_eq!(fragment[FINGERPRINT_KEY], Value::Null);
    }
}
