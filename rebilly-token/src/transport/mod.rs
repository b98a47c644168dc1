//! Transport abstraction.
//!
//! The token handler never performs network I/O itself. It builds a [`TransportRequest`]
//! and hands it to a [`Transport`], which returns the raw status, headers and body.
//! Interpreting the status is left to the response normalizer, so transports must not
//! turn non-2xx responses into errors.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rebilly_token::{
//!     RequestHandle,
//!     transport::{HttpTransport, Transport, TransportRequest},
//! };
//!
//! # async fn example() -> rebilly_token::Result<()> {
//! let transport = HttpTransport::new()?;
//!
//! let uri = "https://api.rebilly.com/v2.1/tokens";
//! let request = TransportRequest {
//!     method: "POST",
//!     uri: uri.to_owned(),
//!     headers: vec![("reb-auth".to_owned(), "secret".to_owned())],
//!     body: r#"{"method":"ach"}"#.to_owned(),
//!     handle: RequestHandle::new("POST", uri),
//! };
//!
//! let response = transport.send(&request).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::sync::Arc;

use crate::{error::Result, model::RequestHandle};

pub mod http;

pub use http::HttpTransport;

/// A fully built outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: &'static str,
    /// Target URI.
    pub uri: String,
    /// Request headers, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body.
    pub body: String,
    /// Handle identifying this request.
    pub handle: RequestHandle,
}

impl TransportRequest {
    /// Returns the first header with the given name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

/// Sends a [`TransportRequest`] and returns the raw response.
///
/// Implementations own timeouts and connection management. A request is sent exactly
/// once; no retries are performed at this layer.
pub trait Transport: Send + Sync {
    /// Sends the request.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received: invalid URI, rejected headers,
    /// connection or timeout failures.
    fn send<'a>(
        &'a self,
        request: &'a TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}

impl<T: Transport> Transport for Arc<T> {
    fn send<'a>(
        &'a self,
        request: &'a TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a {
        (**self).send(request)
    }

    fn protocol_name(&self) -> &'static str {
        (**self).protocol_name()
    }
}
