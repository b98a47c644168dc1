//! Creates a payment token from a checkout form.
//!
//! Validates the form fields locally, then exchanges them for a token with lead-source
//! and device fingerprint data attached.
//!
//! # Running this example
//!
//! ```bash
//! export REBILLY_AUTH=<publishable key>
//! cargo run --example create_token
//! ```
//!
//! Set `REBILLY_ENDPOINT` to target a sandbox or mock server.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use std::env;

use rebilly_token::{
    TokenHandler,
    enrichment::{DeviceFingerprint, LeadSource},
    form::{HtmlForm, InputElement, OptionElement, SelectElement},
    validate::{card, customer},
};

fn checkout_form() -> HtmlForm {
    HtmlForm::new()
        .with_input(InputElement::new("4111 1111 1111 1111").with_attribute("data-rebilly", "pan"))
        .with_input(InputElement::new("12").with_attribute("data-rebilly", "expMonth"))
        .with_input(InputElement::new("2030").with_attribute("data-rebilly", "expYear"))
        .with_input(InputElement::new("123").with_attribute("data-rebilly", "cvv"))
        .with_input(InputElement::new("Ada").with_attribute("data-rebilly", "firstName"))
        .with_input(InputElement::new("Lovelace").with_attribute("data-rebilly", "lastName"))
        .with_input(InputElement::new("H2X 1K4").with_attribute("data-rebilly", "postalCode"))
        .with_select(
            SelectElement::new()
                .with_attribute("data-rebilly", "country")
                .with_option(OptionElement::new("US"))
                .with_option(OptionElement::new("CA").selected()),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let checks = [
        ("card number", card::card_number("4111 1111 1111 1111")),
        ("expiry", card::expiry(12, 2030)),
        ("cvv", card::cvv("123")),
        ("first name", customer::first_name("Ada")),
        ("last name", customer::last_name("Lovelace")),
        ("postal code", customer::postal_code("H2X 1K4")),
    ];
    for (field, valid) in checks {
        if !valid {
            eprintln!("invalid {field}");
            return Ok(());
        }
    }

    let mut handler = TokenHandler::new()?;
    handler.set_auth(env::var("REBILLY_AUTH").map_err(|_| "REBILLY_AUTH is not set")?);
    if let Ok(endpoint) = env::var("REBILLY_ENDPOINT") {
        handler.set_endpoint(endpoint);
    }

    handler.register_module(LeadSource::from_url(
        "https://shop.example.com/checkout?utm_source=newsletter&utm_medium=email",
    )?);
    handler.register_module(
        DeviceFingerprint::new()
            .with_component("userAgent", "Mozilla/5.0 (X11; Linux x86_64)")
            .with_component("language", "en-CA")
            .with_component("timezone", "America/Toronto"),
    );

    let form = checkout_form();
    handler
        .create_token((&form).into(), |result| match result.token_id() {
            Some(token) => println!("token created: {token}"),
            None => eprintln!("token request failed ({:?}): {}", result.status, result.message),
        })
        .await?;

    Ok(())
}
