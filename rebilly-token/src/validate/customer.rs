//! Billing address and customer name validators.
//!
//! Letter classes are Unicode-aware, so names and addresses in any script are accepted.

#![allow(clippy::expect_used, reason = "patterns are literals checked by the tests below")]

use std::{fmt::Display, sync::LazyLock};

use regex::Regex;

// Letters (any script, with combining marks) and spaces.
static FIRST_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{M}\p{Zs}]+$").expect("FIRST_NAME_REGEX: invalid regex pattern")
});

// Letters, digits and spaces.
static LAST_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{M}\p{N}\p{Zs}]+$").expect("LAST_NAME_REGEX: invalid regex pattern")
});

// Letters, digits, spaces and common address punctuation.
static ADDRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{M}\p{N}\p{Zs}/\-.,#']+$").expect("ADDRESS_REGEX: invalid regex pattern")
});

// Letters and spaces; shared by city and region.
static PLACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{M}\p{Zs}]+$").expect("PLACE_REGEX: invalid regex pattern")
});

static POSTAL_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9\p{Zs}\-]+$").expect("POSTAL_CODE_REGEX: invalid regex pattern")
});

// Optional leading plus, then digits, spaces, parentheses and dashes.
static PHONE_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9\p{Zs}()\-]+$").expect("PHONE_NUMBER_REGEX: invalid regex pattern")
});

fn matches(pattern: &Regex, value: impl Display) -> bool {
    pattern.is_match(&value.to_string())
}

/// Checks a first name: letters and spaces only.
///
/// # Examples
///
/// ```
/// use rebilly_token::validate::customer::first_name;
///
/// assert!(first_name("Andrei Theodorescu"));
/// assert!(first_name("カウボーイビバップ"));
/// assert!(!first_name("Jebediah_Morrisson"));
/// ```
#[must_use]
pub fn first_name(value: impl Display) -> bool {
    matches(&FIRST_NAME_REGEX, value)
}

/// Checks a last name: letters, digits and spaces.
#[must_use]
pub fn last_name(value: impl Display) -> bool {
    matches(&LAST_NAME_REGEX, value)
}

/// Checks a street address line.
///
/// Allows letters, digits, spaces and `/ - . , # '`; rejects other symbols such as
/// `$ * & = :`.
#[must_use]
pub fn address(value: impl Display) -> bool {
    matches(&ADDRESS_REGEX, value)
}

/// Checks a city name: letters and spaces only.
#[must_use]
pub fn city(value: impl Display) -> bool {
    matches(&PLACE_REGEX, value)
}

/// Checks a region (state, province) name: letters and spaces only.
#[must_use]
pub fn region(value: impl Display) -> bool {
    matches(&PLACE_REGEX, value)
}

/// Checks a postal code: ASCII letters in either case, digits, spaces and dashes.
#[must_use]
pub fn postal_code(value: impl Display) -> bool {
    matches(&POSTAL_CODE_REGEX, value)
}

/// Checks a phone number: digits, spaces, parentheses, dashes and a leading `+`.
///
/// # Examples
///
/// ```
/// use rebilly_token::validate::customer::phone_number;
///
/// assert!(phone_number("(514) 321-7654"));
/// assert!(phone_number(5_143_217_654_u64));
/// assert!(!phone_number("[514]-321-7654"));
/// ```
#[must_use]
pub fn phone_number(value: impl Display) -> bool {
    matches(&PHONE_NUMBER_REGEX, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name() {
        assert!(first_name("Andrei Theodorescu"));
        assert!(first_name("カウボーイビバップ"));
        assert!(first_name("Zoë"));

        assert!(!first_name("Robert * Cloud"));
        assert!(!first_name("Jebediah_Morrisson"));
        assert!(!first_name("Agent 47"));
        assert!(!first_name(""));
    }

    #[test]
    fn test_last_name() {
        assert!(last_name("훈민정음 訓民正音"));
        assert!(last_name("здраво збогум"));
        assert!(last_name("De 08 Laurentiis"));

        assert!(!last_name("De;Laurentiis"));
        assert!(!last_name("De*Laurentiis"));
    }

    #[test]
    fn test_address() {
        assert!(address("6745 Rue De Carufel"));
        assert!(address("012 Brunnenstraße"));
        assert!(address("環七通り/都道318号線"));
        assert!(address("Apt. 4-B, 12 Main St."));

        assert!(!address("012 Brunnenstraße $*$&*"));
        assert!(!address("Aftcastle, Berlin = 09:339:1"));
    }

    #[test]
    fn test_city() {
        assert!(city("Pozdravljeni adijo"));
        assert!(city("Montréal"));

        assert!(!city("Pozdravljeni ++ adijo"));
        assert!(!city("District 9"));
    }

    #[test]
    fn test_region() {
        assert!(region("Pozdravljeni adijo"));
        assert!(!region("Pozdravljeni ++ adijo"));
    }

    #[test]
    fn test_postal_code() {
        assert!(postal_code("h1n1n1"));
        assert!(postal_code("h1n-1n1"));
        assert!(postal_code("h2b 4g6"));
        assert!(postal_code("H1N 1n1"));
        assert!(postal_code(90210));

        assert!(!postal_code("h2b+4g6"));
    }

    #[test]
    fn test_phone_number() {
        assert!(phone_number("(514) 321-7654"));
        assert!(phone_number(5_143_217_654_u64));
        assert!(phone_number("+01-800-4536"));

        assert!(!phone_number("[514]-321-7654"));
        assert!(!phone_number("1-800-CALL"));
        assert!(!phone_number("514+321"));
    }

    #[test]
    fn test_only_space_separators_accepted() {
        assert!(first_name("Jean\u{00a0}Luc"));
        assert!(address("12\u{3000}Main St"));

        for sep in ["\t", "\n", "\r\n"] {
            assert!(!first_name(format!("Jean{sep}Luc")), "first name with {sep:?}");
            assert!(!last_name(format!("De{sep}Laurentiis")), "last name with {sep:?}");
            assert!(!address(format!("12{sep}Main St")), "address with {sep:?}");
            assert!(!city(format!("New{sep}York")), "city with {sep:?}");
            assert!(!postal_code(format!("h2b{sep}4g6")), "postal code with {sep:?}");
            assert!(!phone_number(format!("514{sep}321")), "phone number with {sep:?}");
        }
    }
}
