//! Rebilly Token CLI
//!
//! Reads a JSON payload from stdin, exchanges it for a payment token and prints the
//! normalized result to stdout.
//!
//! ```text
//! $ echo '{"paymentInstrument": {"pan": "4111111111111111"}}' \
//!     | REBILLY_AUTH=pk_sandbox_... rebilly-token
//! ```
//!
//! # Exit Codes
//!
//! - `0`: token created
//! - `1`: the request was sent but failed
//! - `2`: the request could not be sent
//! - `3`: the result could not be written to stdout

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and tracing-subscriber"
)]

mod observability;
mod settings;

use std::{io, process::ExitCode};

use rebilly_token::{Result, TokenError, TokenHandler, TokenResult, enrichment::LeadSource};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    observability::init_logging();

    let result = match run().await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "token request was not sent");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = write_result(&mut tokio::io::stdout(), &result).await {
        error!(error = %e, status = ?result.status, "failed to write token result");
        return ExitCode::from(3);
    }

    if result.error { ExitCode::from(1) } else { ExitCode::SUCCESS }
}

async fn run() -> Result<TokenResult> {
    let lookup = |name: &str| std::env::var(name).ok();

    let config = settings::load_config(lookup)?;
    let mut handler = TokenHandler::from_config(&config)?;

    if let Some(page_url) = settings::page_url(lookup) {
        handler.register_module(LeadSource::from_url(&page_url)?);
    }

    info!(endpoint = handler.config().endpoint(), "reading payload from stdin");

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .map_err(|e| TokenError::InvalidPayload(format!("cannot read stdin: {e}")))?;
    let payload = settings::parse_payload(&input)?;

    handler.request_token(payload.into()).await
}

/// Writes `result` as pretty JSON followed by a newline, then flushes.
async fn write_result<W: AsyncWrite + Unpin>(out: &mut W, result: &TokenResult) -> io::Result<()> {
    let mut output = serde_json::to_vec_pretty(result)?;
    output.push(b'\n');
    out.write_all(&output).await?;
    out.flush().await
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn created() -> TokenResult {
        TokenResult {
            error: false,
            status: Some(201),
            data: Some(json!({"id": "tok_1"})),
            message: "success".to_owned(),
            handle: rebilly_token::RequestHandle::new("POST", "https://api.example.com/tokens"),
        }
    }

    #[tokio::test]
    async fn test_write_result_emits_json_line() {
        let (mut writer, mut reader) = tokio::io::duplex(64 * 1024);

        write_result(&mut writer, &created()).await.unwrap();
        drop(writer);

        let mut written = String::new();
        reader.read_to_string(&mut written).await.unwrap();
        assert!(written.ends_with('\n'));
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["data"]["id"], "tok_1");
    }

    #[tokio::test]
    async fn test_write_result_reports_closed_output() {
        let (mut writer, reader) = tokio::io::duplex(64);
        drop(reader);

        let err = write_result(&mut writer, &created()).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
