//! Payment card validators.

use std::fmt::Display;

use chrono::{Datelike, Local, NaiveDate};

/// Checks a digit string against the Luhn checksum.
///
/// The input must consist of ASCII digits only. Separators are not stripped, so a
/// formatted number such as `"5349-2077-8395-2559"` fails; use [`card_number`] for
/// user-entered values.
///
/// # Examples
///
/// ```
/// use rebilly_token::validate::card::luhn;
///
/// assert!(luhn("4601398104203552"));
/// assert!(!luhn("1131313"));
/// assert!(!luhn("5349-2077-8395-2559"));
/// ```
#[must_use]
pub fn luhn(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(index, digit)| {
            if index % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// Checks a user-entered card number.
///
/// Whitespace and dashes are removed before the Luhn check; any other non-digit
/// character fails validation.
#[must_use]
pub fn card_number(value: impl Display) -> bool {
    let digits: String =
        value.to_string().chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    luhn(&digits)
}

/// Checks that an expiry month/year pair is well formed and not in the past.
///
/// The year must be exactly four digits and the month an integer between 1 and 12.
/// A card expiring in the current month is still valid.
#[must_use]
pub fn expiry(month: impl Display, year: impl Display) -> bool {
    expiry_at(month, year, Local::now().date_naive())
}

/// Same as [`expiry`], evaluated against `today` instead of the local clock.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rebilly_token::validate::card::expiry_at;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// assert!(expiry_at("06", 2024, today));
/// assert!(!expiry_at(5, "2024", today));
/// ```
#[must_use]
pub fn expiry_at(month: impl Display, year: impl Display, today: NaiveDate) -> bool {
    let year = year.to_string();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let Ok(year) = year.parse::<i32>() else {
        return false;
    };

    let Ok(month) = month.to_string().trim().parse::<u32>() else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }

    (year, month) >= (today.year(), today.month())
}

/// Checks a card verification value: three or four digits.
#[must_use]
pub fn cvv(value: impl Display) -> bool {
    let value = value.to_string();
    matches!(value.len(), 3 | 4) && value.bytes().all(|b| b.is_ascii_digit())
}
