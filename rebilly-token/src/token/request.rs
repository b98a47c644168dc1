//! Request construction.

use serde_json::{Map, Value};

use crate::{
    error::{Result, TokenError},
    model::{Fragment, RequestHandle, TokenRequest},
    transport::TransportRequest,
};

/// Header carrying the authorization credential.
pub const AUTH_HEADER: &str = "reb-auth";

/// Header identifying this client to the API.
pub const CONSUMER_HEADER: &str = "reb-api-consumer";

/// Value of [`CONSUMER_HEADER`].
pub const CONSUMER_ID: &str = concat!("RebillySDK/Rust-Token ", env!("CARGO_PKG_VERSION"));

/// Merges enrichment fragments over the base payload data.
///
/// Fragment keys overwrite base keys of the same name.
#[must_use]
pub fn merge_payload(mut base: Map<String, Value>, enrichment: Fragment) -> Map<String, Value> {
    base.extend(enrichment);
    base
}

/// Builds the outbound POST request for a resolved token request.
///
/// # Errors
///
/// - [`TokenError::MissingAuthorization`] if no credential is set
/// - [`TokenError::Serialization`] if the body cannot be serialized
pub fn build_request(
    endpoint: &str,
    authorization: Option<&str>,
    body: &TokenRequest,
) -> Result<TransportRequest> {
    let credential = authorization.ok_or(TokenError::MissingAuthorization)?;
    let body = serde_json::to_string(body)?;

    Ok(TransportRequest {
        method: "POST",
        uri: endpoint.to_owned(),
        headers: vec![
            ("Content-Type".to_owned(), "application/json".to_owned()),
            (AUTH_HEADER.to_owned(), credential.to_owned()),
            (CONSUMER_HEADER.to_owned(), CONSUMER_ID.to_owned()),
        ],
        body,
        handle: RequestHandle::new("POST", endpoint),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_merge_enrichment_overwrites_base() {
        let merged = merge_payload(
            object(json!({"method": "ach", "foo": "base"})),
            object(json!({"foo": "enriched", "leadSource": {}})),
        );

        assert_eq!(Value::Object(merged), json!({"method": "ach", "foo": "enriched", "leadSource": {}}));
    }

    #[test]
    fn test_build_request_headers_and_body() {
        let body = TokenRequest { method: Some("ach".to_owned()), ..TokenRequest::default() };
        let request = build_request("https://api.example.com/tokens", Some("secret"), &body).unwrap();

        assert_eq!(request.method, "POST");
        assert_eq!(request.uri, "https://api.example.com/tokens");
        assert_eq!(request.header("reb-auth"), Some("secret"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert!(request.header("reb-api-consumer").unwrap().starts_with("RebillySDK/Rust-Token "));
        assert_eq!(request.handle.uri, request.uri);

        let sent: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(sent, json!({"method": "ach", "paymentInstrument": null, "billingAddress": null}));
    }

    #[test]
    fn test_build_request_requires_credential() {
        let body = TokenRequest::default();
        let result = build_request("https://api.example.com/tokens", None, &body);
        assert!(matches!(result, Err(TokenError::MissingAuthorization)));
    }

    #[test]
    fn test_build_request_fresh_handle_per_call() {
        let body = TokenRequest::default();
        let first = build_request("https://a.example.com", Some("k"), &body).unwrap();
        let second = build_request("https://a.example.com", Some("k"), &body).unwrap();
        assert_ne!(first.handle.id, second.handle.id);
    }
}
