//! Payment method resolution.

use tracing::{debug, info};

use crate::{
    error::{Result, TokenError},
    model::{FieldMap, Method, TokenRequest},
};

/// Detects the payment method from instrument field names.
///
/// Vocabularies are checked in [`Method::ALL`] order and the first one sharing at least one
/// field with the instrument wins.
///
/// # Examples
///
/// ```
/// use rebilly_token::{Method, token::detect_method};
/// use serde_json::{Map, json};
///
/// let instrument = Map::from_iter([("routingNumber".to_owned(), json!("011000015"))]);
/// assert_eq!(detect_method(&instrument), Some(Method::Ach));
/// ```
#[must_use]
pub fn detect_method(instrument: &FieldMap) -> Option<Method> {
    Method::ALL
        .into_iter()
        .find(|method| method.fields().iter().any(|field| instrument.contains_key(*field)))
}

/// Resolves `request.method` in place.
///
/// A present, non-empty method has retired aliases rewritten and is otherwise left
/// untouched. An absent method is detected from the payment instrument.
///
/// # Errors
///
/// - [`TokenError::MissingPaymentData`] if there is neither a method nor an instrument
/// - [`TokenError::UndetectableMethod`] if the instrument has no recognized field
pub fn resolve_method(request: &mut TokenRequest) -> Result<&str> {
    if let Some(current) = request.method() {
        if let Some(method) = Method::from_legacy(current) {
            debug!(legacy = current, method = %method, "rewrote legacy payment method");
            request.method = Some(method.as_str().to_owned());
        }
    } else {
        let Some(instrument) = &request.payment_instrument else {
            return Err(TokenError::MissingPaymentData);
        };
        let Some(method) = detect_method(instrument) else {
            return Err(TokenError::UndetectableMethod(instrument.keys().cloned().collect()));
        };
        info!(method = %method, "detected payment method from instrument fields");
        request.method = Some(method.as_str().to_owned());
    }

    request.method().ok_or(TokenError::MissingPaymentData)
}
