//! Token endpoint transport over reqwest.

use std::sync::LazyLock;

use reqwest::{Client, Method};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    config::{ClientConfig, Protocol},
    error::{Result, TokenError},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Client shared by every transport built with default settings, so they share one
/// connection pool.
#[allow(clippy::expect_used, reason = "a builder with the default settings cannot fail")]
static DEFAULT_HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    build_client(&ClientConfig::default()).expect("default token client settings are valid")
});

fn build_client(config: &ClientConfig) -> Result<Client> {
    let builder = Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout());

    let builder = match config.protocol {
        Protocol::Negotiate => builder,
        Protocol::Http1 => builder.http1_only(),
        Protocol::Http2 => builder.http2_prior_knowledge(),
    };

    builder.build().map_err(TokenError::HttpError)
}

/// Parses the target URI and checks it is an HTTP(S) URL with a host.
fn parse_uri(uri: &str) -> Result<Url> {
    let url =
        Url::parse(uri).map_err(|e| TokenError::TransportError(format!("invalid uri: {e}")))?;

    if !matches!(url.scheme(), "https" | "http") {
        return Err(TokenError::TransportError(format!(
            "unsupported scheme '{}': only http and https are allowed",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(TokenError::TransportError(format!("uri missing host: {uri}")));
    }

    Ok(url)
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.contains('\r') || name.contains('\n') || name.contains('\0') {
        return Err(TokenError::TransportError(
            "Invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains('\r') || value.contains('\n') || value.contains('\0') {
        return Err(TokenError::TransportError(
            "Invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

/// Token endpoint transport over reqwest.
///
/// # Examples
///
/// ```
/// use rebilly_token::{
///     ClientConfig,
///     config::Protocol,
///     transport::{HttpTransport, Transport},
/// };
///
/// let config = ClientConfig { request_timeout_ms: 5_000, protocol: Protocol::Http1, ..Default::default() };
///
/// let transport = HttpTransport::with_config(&config).unwrap();
/// assert_eq!(transport.protocol_name(), "http/1.1");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    protocol: Protocol,
}

impl HttpTransport {
    /// Creates a transport with the default deadlines and protocol negotiation.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` matches [`HttpTransport::with_config`].
    pub fn new() -> Result<Self> {
        Ok(Self { client: DEFAULT_HTTP_CLIENT.clone(), protocol: Protocol::Negotiate })
    }

    /// Creates a transport using the deadlines and protocol from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfig`] for out-of-range settings, or
    /// [`TokenError::HttpError`] if the client cannot be built.
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { client: build_client(config)?, protocol: config.protocol })
    }

    #[instrument(
        skip(self, request),
        fields(method = request.method, uri = %request.uri, request_id = %request.handle.id)
    )]
    async fn execute_request(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let url = parse_uri(&request.uri)?;

        // Security: Validate headers for CRLF injection
        for (name, value) in &request.headers {
            validate_header(name, value)?;
        }

        let method = Method::from_bytes(request.method.as_bytes()).map_err(|_| {
            TokenError::TransportError(format!("unsupported HTTP method: {}", request.method))
        })?;

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();

        let body = response.bytes().await.map_err(TokenError::HttpError)?.to_vec();

        debug!(status, body_len = body.len(), "received token endpoint response");

        Ok(TransportResponse { status, body, headers })
    }
}

impl Transport for HttpTransport {
    async fn send<'a>(&'a self, request: &'a TransportRequest) -> Result<TransportResponse> {
        self.execute_request(request).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.protocol {
            Protocol::Negotiate => "http",
            Protocol::Http1 => "http/1.1",
            Protocol::Http2 => "http/2",
        }
    }
}
