//! Environment-driven settings.

use rebilly_token::{ClientConfig, Result, TokenError};
use serde_json::{Map, Value};

/// Path of an optional TOML configuration file.
pub const CONFIG_VAR: &str = "REBILLY_TOKEN_CONFIG";
/// Overrides the configured credential.
pub const AUTH_VAR: &str = "REBILLY_AUTH";
/// Overrides the configured endpoint.
pub const ENDPOINT_VAR: &str = "REBILLY_ENDPOINT";
/// Page URL whose `utm_*` parameters are attached as lead-source data.
pub const PAGE_URL_VAR: &str = "REBILLY_PAGE_URL";

/// Builds the client configuration from a config file and overrides.
///
/// `lookup` returns the value of an environment variable, with empty values treated as
/// unset.
///
/// # Errors
///
/// Returns error if the file cannot be loaded or the resulting configuration is invalid.
pub fn load_config(lookup: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
    let var = |name: &str| non_empty(&lookup, name);

    let mut config = match var(CONFIG_VAR) {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };

    if let Some(endpoint) = var(ENDPOINT_VAR) {
        config.endpoint = endpoint;
    }
    if let Some(auth) = var(AUTH_VAR) {
        config.auth = Some(auth);
    }

    config.validate()?;
    Ok(config)
}

/// Returns the page URL to derive lead-source data from, if one is set.
pub fn page_url(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    non_empty(&lookup, PAGE_URL_VAR)
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.trim().is_empty())
}

/// Parses the token payload read from stdin.
///
/// # Errors
///
/// Returns [`TokenError::InvalidPayload`] unless the input is a JSON object.
pub fn parse_payload(input: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(input) {
        Ok(Value::Object(data)) => Ok(data),
        Ok(_) => Err(TokenError::InvalidPayload("payload must be a JSON object".to_owned())),
        Err(e) => Err(TokenError::InvalidPayload(format!("payload is not valid JSON: {e}"))),
    }
}
