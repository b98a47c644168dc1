//! Lead-source attribution from UTM query parameters.

use async_trait::async_trait;
use serde_json::{Map, Value};
use url::{Url, form_urlencoded};

use super::EnrichmentModule;
use crate::{
    error::{Result, TokenError},
    model::Fragment,
};

/// Fragment key carrying the attribution data.
pub const LEAD_SOURCE_KEY: &str = "leadSource";

const UTM_PREFIX: &str = "utm_";

const UTM_FIELDS: &[&str] = &["source", "medium", "campaign", "term", "content"];

/// Emits `{"leadSource": {...}}` from the `utm_*` parameters of a page query string.
///
/// Parameter names lose their `utm_` prefix. Names and values are percent-decoded
/// (`+` reads as a space) and a value runs to the next `&`, so `utm_term=a=b` records
/// `"a=b"`. A parameter without `=` is recorded as `null`; unknown parameters are ignored.
///
/// # Examples
///
/// ```
/// use rebilly_token::enrichment::LeadSource;
///
/// let module = LeadSource::from_query("?utm_source=newsletter&utm_medium=email&page=2");
/// let fragment = module.fragment();
/// assert_eq!(fragment["leadSource"]["source"], "newsletter");
/// assert_eq!(fragment["leadSource"]["medium"], "email");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LeadSource {
    query: String,
}

impl LeadSource {
    /// Creates the module from a raw query string, with or without the leading `?`.
    #[must_use]
    pub fn from_query(query: impl Into<String>) -> Self {
        let mut query = query.into();
        if query.starts_with('?') {
            query.remove(0);
        }
        Self { query }
    }

    /// Creates the module from a full page URL.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Enrichment`] if the URL cannot be parsed.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| TokenError::Enrichment {
            module: "lead-source".to_owned(),
            message: format!("invalid page URL: {e}"),
        })?;
        Ok(Self::from_query(url.query().unwrap_or_default()))
    }

    /// Builds the attribution fragment.
    #[must_use]
    pub fn fragment(&self) -> Fragment {
        let mut lead_source = Map::new();

        for pair in self.query.split('&').filter(|p| !p.is_empty()) {
            let Some((name, value)) = form_urlencoded::parse(pair.as_bytes()).next() else {
                continue;
            };
            let Some(field) = name.strip_prefix(UTM_PREFIX).filter(|f| UTM_FIELDS.contains(f))
            else {
                continue;
            };

            let value =
                if pair.contains('=') { Value::String(value.into_owned()) } else { Value::Null };
            lead_source.insert(field.to_owned(), value);
        }

        let mut fragment = Fragment::new();
        fragment.insert(LEAD_SOURCE_KEY.to_owned(), Value::Object(lead_source));
        fragment
    }
}

#[async_trait]
impl EnrichmentModule for LeadSource {
    fn name(&self) -> &str {
        "lead-source"
    }

    async fn produce(&self) -> Result<Fragment> {
        Ok(self.fragment())
    }
}
