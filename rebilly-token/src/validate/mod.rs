//! Field validators for payment and billing data.
//!
//! Every validator is a pure predicate: it never panics and never returns an error, only
//! `true` or `false`. Validators that accept [`Display`](std::fmt::Display) values coerce
//! them to their string form first, so both `"123"` and `123` can be checked.
//!
//! - [`card`]: Luhn checksum, card number, expiry and CVV checks
//! - [`customer`]: name, address, city, region, postal code and phone number patterns
//!
//! # Examples
//!
//! ```
//! use rebilly_token::validate::{card, customer};
//!
//! assert!(card::card_number("4494 5908 0494 9548"));
//! assert!(card::cvv(123));
//! assert!(customer::postal_code("H1N 1n1"));
//! assert!(!customer::phone_number("1-800-CALL"));
//! ```

pub mod card;
pub mod customer;
