//! Token creation pipeline.
//!
//! [`TokenHandler`] owns the endpoint, the credential and the registered enrichment
//! modules, and runs each call through the same sequence:
//!
//! ```text
//! Payload ── extract (forms only) ──┐
//!                                   ├─ merge ── resolve method ── build request ── send ── normalize
//! modules ── run concurrently ──────┘
//! ```
//!
//! Precondition failures (no credential, no way to determine the method) are returned as
//! errors before anything is sent. Once a request reaches the transport, every outcome,
//! including transport failures, becomes a [`TokenResult`].

pub mod method;
pub mod request;
pub mod response;

use std::{fmt, sync::Arc};

use serde_json::{Map, Value};
use tracing::{Span, field, info, instrument, warn};

pub use method::{detect_method, resolve_method};
pub use request::{AUTH_HEADER, CONSUMER_HEADER, CONSUMER_ID, build_request, merge_payload};
pub use response::{CREATED, normalize};

use crate::{
    config::{ClientConfig, DEFAULT_ENDPOINT},
    enrichment::{self, EnrichmentModule},
    error::{Result, TokenError},
    form::{FieldExtractor, Form},
    model::{Fragment, TokenRequest, TokenResult},
    transport::{HttpTransport, Transport},
};

/// Input to a token creation call.
pub enum Payload<'a> {
    /// A form whose marked controls are extracted.
    Form(&'a dyn Form),
    /// Data supplied directly; used as-is as the base of the request body.
    Structured(Map<String, Value>),
}

impl fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form(_) => f.write_str("Payload::Form"),
            Self::Structured(data) => {
                f.debug_tuple("Payload::Structured").field(&data.keys().collect::<Vec<_>>()).finish()
            }
        }
    }
}

impl From<Map<String, Value>> for Payload<'_> {
    fn from(data: Map<String, Value>) -> Self {
        Self::Structured(data)
    }
}

impl<'a, F: Form> From<&'a F> for Payload<'a> {
    fn from(form: &'a F) -> Self {
        Self::Form(form)
    }
}

/// Runtime state of a [`TokenHandler`].
///
/// Only the handler's setters mutate it.
#[derive(Clone)]
pub struct HandlerConfig {
    endpoint: String,
    authorization: Option<String>,
    modules: Vec<Arc<dyn EnrichmentModule>>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_ENDPOINT.to_owned(), authorization: None, modules: Vec::new() }
    }
}

impl HandlerConfig {
    /// Returns the token endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the authorization credential, if set.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Returns the registered enrichment modules, in registration order.
    #[must_use]
    pub fn modules(&self) -> &[Arc<dyn EnrichmentModule>] {
        &self.modules
    }
}

impl fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modules: Vec<&str> = self.modules.iter().map(|m| m.name()).collect();
        f.debug_struct("HandlerConfig")
            .field("endpoint", &self.endpoint)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("modules", &modules)
            .finish()
    }
}

/// Creates payment tokens.
///
/// # Examples
///
/// ```rust,no_run
/// use rebilly_token::{TokenHandler, enrichment::LeadSource};
/// use serde_json::json;
///
/// # async fn example() -> rebilly_token::Result<()> {
/// let mut handler = TokenHandler::new()?;
/// handler.set_auth("pk_sandbox_...");
/// handler.register_module(LeadSource::from_query("utm_source=newsletter"));
///
/// let payload = json!({
///     "paymentInstrument": {"pan": "4111111111111111", "expMonth": "12", "expYear": "2030"},
///     "billingAddress": {"firstName": "Ada", "lastName": "Lovelace"},
/// });
/// let serde_json::Value::Object(payload) = payload else { unreachable!() };
///
/// handler
///     .create_token(payload.into(), |result| {
///         if let Some(token) = result.token_id() {
///             println!("token: {token}");
///         } else {
///             eprintln!("failed: {}", result.message);
///         }
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TokenHandler<T = HttpTransport> {
    config: HandlerConfig,
    extractor: FieldExtractor,
    transport: T,
}

impl TokenHandler<HttpTransport> {
    /// Creates a handler for the default endpoint using the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP transport cannot be created.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }

    /// Creates a handler from a client configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let mut handler = Self::with_transport(HttpTransport::with_config(config)?);
        handler.set_endpoint(config.endpoint.clone());
        if let Some(auth) = &config.auth {
            handler.set_auth(auth.clone());
        }
        Ok(handler)
    }
}

impl<T: Transport> TokenHandler<T> {
    /// Creates a handler for the default endpoint using the given transport.
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        Self { config: HandlerConfig::default(), extractor: FieldExtractor::default(), transport }
    }

    /// Replaces the form field extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replaces the token endpoint. The value is not validated.
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.config.endpoint = endpoint.into();
    }

    /// Replaces the authorization credential. The value is not validated.
    pub fn set_auth(&mut self, credential: impl Into<String>) {
        self.config.authorization = Some(credential.into());
    }

    /// Removes the authorization credential.
    pub fn clear_auth(&mut self) {
        self.config.authorization = None;
    }

    /// Appends an enrichment module. Later modules win on key collisions.
    pub fn register_module(&mut self, module: impl EnrichmentModule + 'static) {
        self.config.modules.push(Arc::new(module));
    }

    /// Appends an already shared enrichment module.
    pub fn register_shared_module(&mut self, module: Arc<dyn EnrichmentModule>) {
        self.config.modules.push(module);
    }

    /// Runs every registered module and returns their merged fragment.
    ///
    /// # Errors
    ///
    /// Returns the first module failure.
    pub async fn process_modules(&self) -> Result<Fragment> {
        enrichment::process_modules(&self.config.modules).await
    }

    /// Creates a token and hands the outcome to `callback`.
    ///
    /// The callback is invoked exactly once when a request was sent, whatever the outcome.
    /// It is never invoked when the call fails before sending.
    ///
    /// # Errors
    ///
    /// Returns the precondition or enrichment error that prevented the request.
    pub async fn create_token<F>(&self, payload: Payload<'_>, callback: F) -> Result<()>
    where
        F: FnOnce(TokenResult),
    {
        match self.request_token(payload).await {
            Ok(result) => {
                callback(result);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "token request not sent");
                Err(e)
            }
        }
    }

    /// Creates a token and returns the outcome.
    ///
    /// # Errors
    ///
    /// - [`TokenError::MissingAuthorization`] if no credential is set
    /// - [`TokenError::Enrichment`] if a module fails
    /// - [`TokenError::InvalidPayload`] if the merged data has the wrong shape
    /// - [`TokenError::MissingPaymentData`] or [`TokenError::UndetectableMethod`] if the
    ///   method cannot be resolved
    ///
    /// Transport failures are reported through the returned [`TokenResult`].
    #[instrument(
        skip_all,
        fields(endpoint = %self.config.endpoint, protocol = self.transport.protocol_name(), request_id = field::Empty)
    )]
    pub async fn request_token(&self, payload: Payload<'_>) -> Result<TokenResult> {
        let authorization = self.config.authorization().ok_or(TokenError::MissingAuthorization)?;

        let base = match payload {
            Payload::Form(form) => self.extractor.extract(form).into_map(),
            Payload::Structured(data) => data,
        };

        let enrichment = self.process_modules().await?;
        let mut body = TokenRequest::from_map(merge_payload(base, enrichment))?;
        let method = resolve_method(&mut body)?.to_owned();

        let request = build_request(&self.config.endpoint, Some(authorization), &body)?;
        Span::current().record("request_id", field::display(request.handle.id));
        info!(method = %method, "sending token request");

        let outcome = self.transport.send(&request).await;
        let result = normalize(outcome, request.handle);

        if result.error {
            warn!(status = ?result.status, message = %result.message, "token request failed");
        } else {
            info!(status = ?result.status, "token created");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::enrichment::FnModule;

    #[test]
    fn test_handler_config_default() {
        let config = HandlerConfig::default();
        assert_eq!(config.endpoint(), "https://api.rebilly.com/v2.1/tokens");
        assert_eq!(config.authorization(), None);
        assert!(config.modules().is_empty());
    }

    #[test]
    fn test_setters() {
        let mut handler = TokenHandler::new().unwrap();

        handler.set_endpoint("https://sandbox.example.com/tokens");
        handler.set_auth("secret");
        handler.register_module(FnModule::new("a", || Ok(Fragment::new())));
        handler.register_module(FnModule::new("b", || Ok(Fragment::new())));

        let config = handler.config();
        assert_eq!(config.endpoint(), "https://sandbox.example.com/tokens");
        assert_eq!(config.authorization(), Some("secret"));
        let names: Vec<&str> = config.modules().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["a", "b"]);

        handler.clear_auth();
        assert_eq!(handler.config().authorization(), None);
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::from_toml(
            r#"
            endpoint = "https://sandbox.example.com/tokens"
            auth = "from-config"
            protocol = "http2"
            "#,
        )
        .unwrap();

        let handler = TokenHandler::from_config(&config).unwrap();
        assert_eq!(handler.config().endpoint(), "https://sandbox.example.com/tokens");
        assert_eq!(handler.config().authorization(), Some("from-config"));
        assert_eq!(handler.transport().protocol_name(), "http/2");
    }

    #[test]
    fn test_from_invalid_config() {
        let config = ClientConfig { endpoint: "nope".to_owned(), ..ClientConfig::default() };
        assert!(matches!(TokenHandler::from_config(&config), Err(TokenError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_debug_redacts_credential() {
        let mut handler = TokenHandler::new().unwrap();
        handler.set_auth("super-secret");
        let debug_str = format!("{:?}", handler.config());
        assert!(!debug_str.contains("super-secret"));
        assert!(debug_str.contains("<redacted>"));
    }

    #[test]
    fn test_payload_debug_hides_values() {
        let Value::Object(data) = json!({"paymentInstrument": {"pan": "4111111111111111"}}) else {
            return;
        };
        let debug_str = format!("{:?}", Payload::from(data));
        assert!(debug_str.contains("paymentInstrument"));
        assert!(!debug_str.contains("4111"));
    }

    #[tokio::test]
    async fn test_handler_process_modules() {
        let mut handler = TokenHandler::new().unwrap();
        handler.register_module(FnModule::new("first", || {
            Ok(Fragment::from_iter([("foo".to_owned(), json!("bar"))]))
        }));
        handler.register_module(FnModule::new("second", || {
            Ok(Fragment::from_iter([
                ("foo".to_owned(), json!("baz")),
                ("hello".to_owned(), json!("world")),
            ]))
        }));

        let merged = handler.process_modules().await.unwrap();
        assert_eq!(Value::Object(merged), json!({"foo": "baz", "hello": "world"}));
    }

    #[tokio::test]
    async fn test_shared_module_serves_several_handlers() {
        let shared: Arc<dyn EnrichmentModule> = Arc::new(FnModule::new("shared", || {
            Ok(Fragment::from_iter([("channel".to_owned(), json!("web"))]))
        }));

        let mut checkout = TokenHandler::new().unwrap();
        let mut upgrade = TokenHandler::new().unwrap();
        checkout.register_shared_module(Arc::clone(&shared));
        upgrade.register_shared_module(Arc::clone(&shared));

        assert_eq!(Arc::strong_count(&shared), 3);
        for handler in [&checkout, &upgrade] {
            assert_eq!(handler.config().modules()[0].name(), "shared");
            let merged = handler.process_modules().await.unwrap();
            assert_eq!(Value::Object(merged), json!({"channel": "web"}));
        }
    }
}
