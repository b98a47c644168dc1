//! Data models shared across the token creation pipeline.
//!
//! The payload travelling through the pipeline is kept as a JSON object until the
//! payment method has been resolved, so enrichment fragments can be merged key by key.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Result, TokenError};

/// A flat mapping of field name to value.
pub type FieldMap = Map<String, Value>;

/// A partial data contribution produced by one enrichment module.
pub type Fragment = Map<String, Value>;

/// Wire key carrying the payment method.
pub const METHOD_KEY: &str = "method";

/// Wire key carrying the payment instrument fields.
pub const PAYMENT_INSTRUMENT_KEY: &str = "paymentInstrument";

/// Wire key carrying the billing address fields.
pub const BILLING_ADDRESS_KEY: &str = "billingAddress";

/// Instrument fields that identify a payment card.
pub const CARD_FIELDS: &[&str] = &["pan", "expMonth", "expYear", "cvv"];

/// Instrument fields that identify a bank account.
pub const ACH_FIELDS: &[&str] = &["routingNumber", "accountNumber", "accountType"];

/// Retired method identifiers and their current replacement.
pub const LEGACY_ALIASES: &[(&str, Method)] =
    &[("payment_card", Method::PaymentCard), ("bank_account", Method::Ach)];

/// Returns true if `name` belongs to any instrument vocabulary.
#[must_use]
pub fn is_instrument_field(name: &str) -> bool {
    Method::ALL.iter().any(|method| method.fields().contains(&name))
}

/// Current payment method identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Credit or debit card.
    #[serde(rename = "payment-card")]
    PaymentCard,
    /// Bank account (ACH).
    #[serde(rename = "ach")]
    Ach,
}

impl Method {
    /// Every method, in detection order.
    pub const ALL: [Self; 2] = [Self::PaymentCard, Self::Ach];

    /// Returns the wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PaymentCard => "payment-card",
            Self::Ach => "ach",
        }
    }

    /// Returns the instrument field vocabulary for this method.
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::PaymentCard => CARD_FIELDS,
            Self::Ach => ACH_FIELDS,
        }
    }

    /// Looks up a retired alias.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebilly_token::Method;
    ///
    /// assert_eq!(Method::from_legacy("bank_account"), Some(Method::Ach));
    /// assert_eq!(Method::from_legacy("ach"), None);
    /// ```
    #[must_use]
    pub fn from_legacy(value: &str) -> Option<Self> {
        LEGACY_ALIASES.iter().find(|(alias, _)| *alias == value).map(|(_, method)| *method)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The request body sent to the token endpoint.
///
/// `paymentInstrument` and `billingAddress` are always present on the wire, as `null` when
/// empty. Enrichment fields are flattened at the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Payment method identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Sensitive instrument fields.
    #[serde(rename = "paymentInstrument", default)]
    pub payment_instrument: Option<FieldMap>,
    /// Billing address fields.
    #[serde(rename = "billingAddress", default)]
    pub billing_address: Option<FieldMap>,
    /// Any additional top-level fields, including enrichment data.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenRequest {
    /// Interprets a merged payload object as a token request.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidPayload`] if `method` is not a string or the
    /// instrument/address entries are not mappings.
    pub fn from_map(data: Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(data))
            .map_err(|e| TokenError::InvalidPayload(e.to_string()))
    }

    /// Returns the method if it is present and non-empty.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref().filter(|m| !m.is_empty())
    }
}

/// Opaque handle identifying one outbound token request.
///
/// Created when the request is built and handed back with the result, whichever way the
/// exchange ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestHandle {
    /// Per-call correlation id.
    pub id: Uuid,
    /// HTTP method.
    pub method: &'static str,
    /// Target URI.
    pub uri: String,
}

impl RequestHandle {
    /// Creates a handle with a fresh correlation id.
    #[must_use]
    pub fn new(method: &'static str, uri: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), method, uri: uri.into() }
    }
}

/// Normalized outcome of a token creation call, delivered to the caller's callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenResult {
    /// True for transport and application failures.
    pub error: bool,
    /// HTTP status, absent when the transport failed before receiving a response.
    pub status: Option<u16>,
    /// Parsed response body.
    pub data: Option<Value>,
    /// `"success"`, the API's error message, or the transport error message.
    pub message: String,
    /// Handle of the request that produced this result.
    pub handle: RequestHandle,
}

impl TokenResult {
    /// Returns the token id from a successful response body.
    #[must_use]
    pub fn token_id(&self) -> Option<&str> {
        if self.error {
            return None;
        }
        self.data.as_ref()?.get("id")?.as_str()
    }
}
