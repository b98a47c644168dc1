//! Response normalization.

use serde_json::Value;

use crate::{
    error::Result,
    model::{RequestHandle, TokenResult},
    transport::TransportResponse,
};

/// The only status signalling a created token.
pub const CREATED: u16 = 201;

/// Message attached to successful results.
pub const SUCCESS_MESSAGE: &str = "success";

/// Maps a transport outcome to a [`TokenResult`].
///
/// - transport error: `error`, no status, no data, the error's message
/// - status 201: success with the parsed body
/// - any other status: `error` with the parsed body and its `error` field as message
///
/// An empty body parses as `null`. A body that is not JSON yields an error result without
/// data.
#[must_use]
pub fn normalize(outcome: Result<TransportResponse>, handle: RequestHandle) -> TokenResult {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            return TokenResult {
                error: true,
                status: None,
                data: None,
                message: e.to_string(),
                handle,
            };
        }
    };

    let status = response.status;
    let data = if response.body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&response.body) {
            Ok(data) => data,
            Err(e) => {
                return TokenResult {
                    error: true,
                    status: Some(status),
                    data: None,
                    message: format!("invalid response body: {e}"),
                    handle,
                };
            }
        }
    };

    if status == CREATED {
        return TokenResult {
            error: false,
            status: Some(status),
            data: Some(data),
            message: SUCCESS_MESSAGE.to_owned(),
            handle,
        };
    }

    let message = data
        .get("error")
        .and_then(Value::as_str)
        .map_or_else(|| format!("request failed with status {status}"), str::to_owned);

    TokenResult { error: true, status: Some(status), data: Some(data), message, handle }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::TokenError;

    fn handle() -> RequestHandle {
        RequestHandle::new("POST", "https://api.example.com/tokens")
    }

    fn response(status: u16, body: &str) -> Result<TransportResponse> {
        Ok(TransportResponse { status, body: body.as_bytes().to_vec(), headers: vec![] })
    }

    #[test]
    fn test_created_is_success() {
        let handle = handle();
        let result = normalize(response(201, r#"{"id":"tok_123"}"#), handle.clone());

        assert!(!result.error);
        assert_eq!(result.status, Some(201));
        assert_eq!(result.data, Some(json!({"id": "tok_123"})));
        assert_eq!(result.message, "success");
        assert_eq!(result.handle, handle);
    }

    #[test]
    fn test_application_error_uses_error_field() {
        let result = normalize(response(422, r#"{"error":"invalid card"}"#), handle());

        assert!(result.error);
        assert_eq!(result.status, Some(422));
        assert_eq!(result.data, Some(json!({"error": "invalid card"})));
        assert_eq!(result.message, "invalid card");
    }

    #[test]
    fn test_other_success_statuses_are_errors() {
        let result = normalize(response(200, r#"{"id":"tok_123"}"#), handle());
        assert!(result.error);
        assert_eq!(result.message, "request failed with status 200");
    }

    #[test]
    fn test_error_without_message_field() {
        let result = normalize(response(500, ""), handle());
        assert!(result.error);
        assert_eq!(result.data, Some(Value::Null));
        assert_eq!(result.message, "request failed with status 500");
    }

    #[test]
    fn test_invalid_json_body() {
        let result = normalize(response(502, "<html>Bad Gateway</html>"), handle());
        assert!(result.error);
        assert_eq!(result.status, Some(502));
        assert_eq!(result.data, None);
        assert!(result.message.starts_with("invalid response body"));
    }

    #[test]
    fn test_transport_error() {
        let handle = handle();
        let result = normalize(
            Err(TokenError::TransportError("connection refused".to_owned())),
            handle.clone(),
        );

        assert!(result.error);
        assert_eq!(result.status, None);
        assert_eq!(result.data, None);
        assert_eq!(result.message, "Transport error: connection refused");
        assert_eq!(result.handle, handle);
    }
}
