//! Error types for the tokenization client.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Precondition Errors** ([`TokenError::MissingAuthorization`],
//!   [`TokenError::MissingPaymentData`], [`TokenError::UndetectableMethod`],
//!   [`TokenError::InvalidPayload`]): the request never reaches the transport and the
//!   caller's callback is not invoked
//! - **Enrichment Errors** ([`TokenError::Enrichment`]): an enrichment module failed and the
//!   in-flight call was aborted
//! - **Transport Errors** ([`TokenError::HttpError`], [`TokenError::TransportError`]):
//!   produced by the transport; the handler folds them into a failed
//!   [`TokenResult`](crate::TokenResult) instead of returning them
//! - **Configuration Errors** ([`TokenError::InvalidConfig`])
//!
//! # Examples
//!
//! ```
//! use rebilly_token::error::{Result, TokenError};
//!
//! fn require_auth(auth: Option<&str>) -> Result<&str> {
//!     auth.ok_or(TokenError::MissingAuthorization)
//! }
//!
//! assert!(require_auth(None).is_err());
//! ```

use thiserror::Error;

/// Result type alias for tokenization operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, TokenError>;

/// Errors that can occur while creating a payment token.
///
/// This type implements `#[must_use]` to ensure errors are not silently ignored.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum TokenError {
    /// No authorization credential has been set on the handler.
    ///
    /// # Recovery
    ///
    /// Call [`TokenHandler::set_auth`](crate::TokenHandler::set_auth) before creating tokens.
    #[error("Missing authorization credential")]
    MissingAuthorization,

    /// The payload has neither a `method` nor a `paymentInstrument`.
    ///
    /// Without either one the payment method cannot be determined.
    #[error("Missing method and payment instrument data")]
    MissingPaymentData,

    /// A `paymentInstrument` was supplied but none of its fields identify a payment method.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebilly_token::error::TokenError;
    ///
    /// let err = TokenError::UndetectableMethod(vec!["foo".to_owned()]);
    /// assert_eq!(err.to_string(), "Cannot detect payment method from instrument fields: foo");
    /// ```
    #[error("Cannot detect payment method from instrument fields: {}", .0.join(", "))]
    UndetectableMethod(Vec<String>),

    /// The payload could not be interpreted as a token request.
    ///
    /// Occurs when `paymentInstrument` or `billingAddress` is present but is not a mapping,
    /// or when `method` is not a string.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// An enrichment module failed.
    ///
    /// Enrichment modules are expected to absorb their own expected failures; anything they
    /// surface aborts the token creation attempt.
    #[error("Enrichment module '{module}' failed: {message}")]
    Enrichment {
        /// Name of the failing module.
        module: String,
        /// Failure description.
        message: String,
    },

    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: connection refused, DNS failure, TLS errors, timeouts.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The transport rejected the request before sending it.
    ///
    /// Common causes are an unparseable endpoint, a non-HTTP scheme, or control characters
    /// in header values.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Request body serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded or failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TokenError {
    /// Returns true for errors raised before any request is handed to the transport.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingAuthorization
                | Self::MissingPaymentData
                | Self::UndetectableMethod(_)
                | Self::InvalidPayload(_)
        )
    }
}
