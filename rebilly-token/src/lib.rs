//! Rebilly Token: payment tokenization client.
//!
//! Exchanges raw payment-instrument and billing data for an opaque token with a single
//! call to the Rebilly token API, so sensitive fields never have to touch the integrator's
//! own servers.
//!
//! # Overview
//!
//! - **Extraction**: read marked controls from a DOM-like [`form::Form`], or pass data
//!   directly as a JSON object
//! - **Enrichment**: run pluggable [`enrichment::EnrichmentModule`]s concurrently (device
//!   fingerprint, lead-source attribution, closures) and merge their output
//! - **Method resolution**: rewrite retired method aliases and detect the method from
//!   instrument fields
//! - **Exchange**: POST the request through a [`transport::Transport`] and normalize the
//!   response into a [`TokenResult`]
//! - **Validation**: standalone predicates in [`validate`] for pre-checking card and
//!   customer fields
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐
//! │ Form / JSON  │   │ Enrichment       │
//! │ payload      │   │ modules (async)  │
//! └──────┬───────┘   └────────┬─────────┘
//!        │ extract            │ merge in registration order
//!        └─────────┬──────────┘
//!                  ▼
//!        ┌──────────────────┐
//!        │  TokenHandler    │ resolve method, build request
//!        └────────┬─────────┘
//!                 │ POST + reb-auth
//!                 ▼
//!        ┌──────────────────┐
//!        │ Rebilly token API│ 201 Created → token
//!        └──────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rebilly_token::{
//!     TokenHandler,
//!     enrichment::DeviceFingerprint,
//!     form::{HtmlForm, InputElement},
//! };
//!
//! # async fn example() -> rebilly_token::Result<()> {
//! let mut handler = TokenHandler::new()?;
//! handler.set_auth("pk_sandbox_...");
//! handler.register_module(DeviceFingerprint::new().with_component("userAgent", "Mozilla/5.0"));
//!
//! let form = HtmlForm::new()
//!     .with_input(InputElement::new("4111111111111111").with_attribute("data-rebilly", "pan"))
//!     .with_input(InputElement::new("12").with_attribute("data-rebilly", "expMonth"))
//!     .with_input(InputElement::new("2030").with_attribute("data-rebilly", "expYear"))
//!     .with_input(InputElement::new("123").with_attribute("data-rebilly", "cvv"))
//!     .with_input(InputElement::new("Ada").with_attribute("data-rebilly", "firstName"));
//!
//! let result = handler.request_token((&form).into()).await?;
//! println!("{}: {:?}", result.message, result.token_id());
//! # Ok(())
//! # }
//! ```
//!
//! # Validation
//!
//! ```
//! use rebilly_token::validate::{card, customer};
//!
//! assert!(card::card_number("4494 5908 0494 9548"));
//! assert!(card::cvv(123));
//! assert!(!customer::city("Toronto 2"));
//! ```
//!
//! # Error Handling
//!
//! Calls that cannot be sent return a [`TokenError`]. Once a request has been sent,
//! transport failures and API errors are reported through [`TokenResult::error`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and wiremock"
)]

pub mod config;
pub mod enrichment;
pub mod error;
pub mod form;
pub mod model;
pub mod token;
pub mod transport;
pub mod validate;

pub use config::ClientConfig;
pub use error::{Result, TokenError};
pub use model::{Method, RequestHandle, TokenRequest, TokenResult};
pub use token::{HandlerConfig, Payload, TokenHandler};
