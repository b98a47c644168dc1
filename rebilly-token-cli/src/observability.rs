//! Stderr logging for the command-line client.
//!
//! stdout carries only the token result, so every event is written to stderr.
//! `RUST_LOG` filters events and `LOG_FORMAT=json` switches to one JSON object per line.

use std::io;

use tracing_subscriber::{EnvFilter, fmt};

const FORMAT_VAR: &str = "LOG_FORMAT";

/// Library events at `info`, everything else at `warn`.
const DEFAULT_FILTER: &str = "warn,rebilly_token=info,rebilly_token_cli=info";

fn wants_json(format: Option<&str>) -> bool {
    format.is_some_and(|value| value.trim().eq_ignore_ascii_case("json"))
}

/// Installs the global stderr subscriber.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = fmt().with_env_filter(filter).with_writer(io::stderr);

    if wants_json(std::env::var(FORMAT_VAR).ok().as_deref()) {
        builder.json().with_current_span(true).with_span_list(false).init();
    } else {
        builder.with_target(false).init();
    }
}
