//! Enrichment modules.
//!
//! An enrichment module contributes a flat [`Fragment`] of extra data to every token
//! request: a device fingerprint, lead-source attribution, or anything the integrator
//! registers. All registered modules run concurrently; once every one has finished, their
//! fragments are merged in registration order, later modules overwriting earlier keys.
//!
//! Modules are expected to absorb their own expected failures. An error returned by a
//! module aborts the token creation attempt.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use rebilly_token::enrichment::{EnrichmentModule, FnModule, process_modules};
//! use serde_json::{Map, json};
//!
//! # async fn example() -> rebilly_token::Result<()> {
//! let modules: Vec<Arc<dyn EnrichmentModule>> = vec![
//!     Arc::new(FnModule::new("first", || Ok(Map::from_iter([("foo".into(), json!("bar"))])))),
//!     Arc::new(FnModule::new("second", || Ok(Map::from_iter([("foo".into(), json!("baz"))])))),
//! ];
//!
//! let merged = process_modules(&modules).await?;
//! assert_eq!(merged["foo"], "baz");
//! # Ok(())
//! # }
//! ```

pub mod fingerprint;
pub mod lead_source;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, instrument};

pub use fingerprint::DeviceFingerprint;
pub use lead_source::LeadSource;

use crate::{error::Result, model::Fragment};

/// A producer of enrichment data.
#[async_trait]
pub trait EnrichmentModule: Send + Sync {
    /// Short module name used in logs and error messages.
    fn name(&self) -> &str;

    /// Produces this module's fragment.
    ///
    /// # Errors
    ///
    /// Any error aborts the token creation attempt. Use
    /// [`TokenError::Enrichment`](crate::TokenError::Enrichment) to report failures.
    async fn produce(&self) -> Result<Fragment>;
}

/// Adapts a synchronous closure into an [`EnrichmentModule`].
pub struct FnModule<F> {
    name: String,
    produce: F,
}

impl<F> FnModule<F>
where
    F: Fn() -> Result<Fragment> + Send + Sync,
{
    /// Wraps `produce` under the given module name.
    pub fn new(name: impl Into<String>, produce: F) -> Self {
        Self { name: name.into(), produce }
    }
}

impl<F> fmt::Debug for FnModule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnModule").field("name", &self.name).finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> EnrichmentModule for FnModule<F>
where
    F: Fn() -> Result<Fragment> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn produce(&self) -> Result<Fragment> {
        (self.produce)()
    }
}

/// Shallow-merges fragments left to right; later fragments win on key collisions.
#[must_use]
pub fn merge_fragments(fragments: impl IntoIterator<Item = Fragment>) -> Fragment {
    fragments.into_iter().fold(Fragment::new(), |mut merged, fragment| {
        merged.extend(fragment);
        merged
    })
}

/// Runs every module concurrently and merges their fragments in registration order.
///
/// # Errors
///
/// Returns the first module error; the remaining modules are dropped.
#[instrument(skip(modules), fields(modules = modules.len()))]
pub async fn process_modules(modules: &[Arc<dyn EnrichmentModule>]) -> Result<Fragment> {
    let fragments = try_join_all(modules.iter().map(|module| async move {
        let fragment = module.produce().await?;
        debug!(module = module.name(), keys = fragment.len(), "enrichment module finished");
        Ok::<_, crate::TokenError>(fragment)
    }))
    .await?;

    Ok(merge_fragments(fragments))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{Value, json};

    use super::*;
    use crate::TokenError;

    fn fragment(value: Value) -> Fragment {
        match value {
            Value::Object(map) => map,
            _ => Fragment::new(),
        }
    }

    struct Delayed {
        delay: Duration,
        fragment: Fragment,
    }

    #[async_trait]
    impl EnrichmentModule for Delayed {
        fn name(&self) -> &str {
            "delayed"
        }

        async fn produce(&self) -> Result<Fragment> {
            tokio::time::sleep(self.delay).await;
            Ok(self.fragment.clone())
        }
    }

    #[test]
    fn test_merge_later_fragment_wins() {
        let merged = merge_fragments([
            fragment(json!({"foo": "bar"})),
            fragment(json!({"foo": "baz", "hello": "world"})),
        ]);

        assert_eq!(Value::Object(merged), json!({"foo": "baz", "hello": "world"}));
    }

    #[test]
    fn test_merge_nothing() {
        assert!(merge_fragments(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn test_process_modules_combines_results() {
        let modules: Vec<Arc<dyn EnrichmentModule>> = vec![
            Arc::new(FnModule::new("sync", || Ok(fragment(json!({"foo": "bar"}))))),
            Arc::new(Delayed {
                delay: Duration::from_millis(50),
                fragment: fragment(json!({"hello": "world"})),
            }),
        ];

        let merged = process_modules(&modules).await.unwrap();

        assert_eq!(merged["foo"], "bar");
        assert_eq!(merged["hello"], "world");
    }

    #[tokio::test]
    async fn test_process_modules_order_is_registration_order() {
        // The slow module is registered last, so it wins even though it finishes last.
        let modules: Vec<Arc<dyn EnrichmentModule>> = vec![
            Arc::new(FnModule::new("fast", || Ok(fragment(json!({"foo": "bar"}))))),
            Arc::new(Delayed {
                delay: Duration::from_millis(30),
                fragment: fragment(json!({"foo": "baz", "hello": "world"})),
            }),
        ];
        let merged = process_modules(&modules).await.unwrap();
        assert_eq!(merged["foo"], "baz");

        // Reversed registration: the fast module now wins although it finished first.
        let modules: Vec<Arc<dyn EnrichmentModule>> = vec![
            Arc::new(Delayed {
                delay: Duration::from_millis(30),
                fragment: fragment(json!({"foo": "baz"})),
            }),
            Arc::new(FnModule::new("fast", || Ok(fragment(json!({"foo": "bar"}))))),
        ];
        let merged = process_modules(&modules).await.unwrap();
        assert_eq!(merged["foo"], "bar");
    }

    #[tokio::test]
    async fn test_process_modules_empty() {
        let merged = process_modules(&[]).await.unwrap();
        assert!(merged.is_empty());
    }

    #[tokio::test]
    async fn test_process_modules_propagates_failure() {
        let modules: Vec<Arc<dyn EnrichmentModule>> = vec![
            Arc::new(FnModule::new("ok", || Ok(Fragment::new()))),
            Arc::new(FnModule::new("broken", || {
                Err(TokenError::Enrichment { module: "broken".into(), message: "boom".into() })
            })),
        ];

        let result = process_modules(&modules).await;

        assert!(matches!(result, Err(TokenError::Enrichment { module, .. }) if module == "broken"));
    }

    #[test]
    fn test_fn_module_debug() {
        let module = FnModule::new("utm", || Ok(Fragment::new()));
        assert!(format!("{module:?}").contains("utm"));
        assert_eq!(module.name(), "utm");
    }
}
