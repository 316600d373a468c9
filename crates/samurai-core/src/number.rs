//! Telephone number normalization
//!
//! Turns user-entered telephone numbers into the `sip:<digits>@<domain>` form
//! the Samurai service expects as a remote URI.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::SamuraiError;

/// Default provider domain
pub const DEFAULT_DOMAIN: &str = "sipgate.de";

/// Default country code (Germany)
pub const DEFAULT_COUNTRY_CODE: &str = "49";

/// Default area code (Berlin)
pub const DEFAULT_AREA_CODE: &str = "30";

static LOCAL_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9]\d+$").unwrap());
static CITY_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0[1-9]\d+$").unwrap());
static INTERNATIONAL_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(00|\+)[1-9]\d+$").unwrap());

/// Dialing context used to complete local and city numbers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NumberPlan {
    /// Provider domain appended after `@`
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Country code without leading zeros or `+`
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Area code without the trunk zero
    #[serde(default = "default_area_code")]
    pub area_code: String,
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

fn default_area_code() -> String {
    DEFAULT_AREA_CODE.to_string()
}

impl Default for NumberPlan {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            country_code: default_country_code(),
            area_code: default_area_code(),
        }
    }
}

impl NumberPlan {
    pub fn new(domain: &str, country_code: &str, area_code: &str) -> Self {
        Self {
            domain: domain.to_string(),
            country_code: country_code.to_string(),
            area_code: area_code.to_string(),
        }
    }

    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = domain.to_string();
        self
    }

    pub fn with_country_code(mut self, country_code: &str) -> Self {
        self.country_code = country_code.to_string();
        self
    }

    pub fn with_area_code(mut self, area_code: &str) -> Self {
        self.area_code = area_code.to_string();
        self
    }

    /// Shorthand for [`normalize`] with this plan
    pub fn to_sip_uri(&self, raw: &str) -> Result<String, SamuraiError> {
        normalize(raw, self)
    }
}

/// Drops everything except digits and a single leading `+`.
///
/// Letters and punctuation inside the number are discarded, not rejected.
pub fn clean(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_digit() || (c == '+' && cleaned.is_empty()) {
            cleaned.push(c);
        }
    }
    cleaned
}

/// Normalizes a telephone number into `sip:<international digits>@<domain>`
///
/// Classification happens on the cleaned string, in this order:
///
/// * local number (`123456`): country and area code are prepended
/// * city number (`030123456`): the trunk zero is replaced by the country code
/// * international number (`+49...` or `0049...`): only the marker is removed
///
/// Anything else fails with [`SamuraiError::InvalidNumber`] carrying the
/// cleaned string.
///
/// # Example
///
/// ```rust
/// use samurai_core::{normalize, NumberPlan};
///
/// let plan = NumberPlan::default();
/// assert_eq!(
///     normalize("030 / 123 456", &plan).unwrap(),
///     "sip:4930123456@sipgate.de"
/// );
/// ```
pub fn normalize(raw: &str, plan: &NumberPlan) -> Result<String, SamuraiError> {
    let tel = clean(raw);

    let digits = if LOCAL_NUMBER.is_match(&tel) {
        format!("{}{}{}", plan.country_code, plan.area_code, tel)
    } else if CITY_NUMBER.is_match(&tel) {
        format!("{}{}", plan.country_code, &tel[1..])
    } else if INTERNATIONAL_NUMBER.is_match(&tel) {
        match tel.strip_prefix('+') {
            Some(rest) => rest.to_string(),
            None => tel[2..].to_string(),
        }
    } else {
        return Err(SamuraiError::InvalidNumber(tel));
    };

    let uri = format!("sip:{}@{}", digits, plan.domain);
    debug!("Normalized {:?} to {}", raw, uri);
    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn plan() -> NumberPlan {
        NumberPlan::default()
    }

    #[test]
    fn test_international_with_plus() {
        assert_eq!(
            normalize("+4930123456", &plan()).unwrap(),
            "sip:4930123456@sipgate.de"
        );
    }

    #[test]
    fn test_international_with_double_zero() {
        assert_eq!(
            normalize("0049 30 123456", &plan()).unwrap(),
            "sip:4930123456@sipgate.de"
        );
    }

    #[test]
    fn test_city_number() {
        assert_eq!(
            normalize("030123456", &plan()).unwrap(),
            "sip:4930123456@sipgate.de"
        );
    }

    #[test]
    fn test_local_number() {
        assert_eq!(
            normalize("123456", &plan()).unwrap(),
            "sip:4930123456@sipgate.de"
        );
    }

    #[test]
    fn test_empty_and_letters_are_invalid() {
        for raw in ["", "abc"] {
            match normalize(raw, &plan()) {
                Err(SamuraiError::InvalidNumber(cleaned)) => assert_eq!(cleaned, ""),
                other => panic!("expected InvalidNumber for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_invalid_number_carries_cleaned_string() {
        match normalize("000-12", &plan()) {
            Err(SamuraiError::InvalidNumber(cleaned)) => assert_eq!(cleaned, "00012"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_single_digit_is_invalid() {
        assert!(normalize("5", &plan()).is_err());
    }

    #[test]
    fn test_interior_letters_are_dropped() {
        assert_eq!(
            normalize("030-CALL-123456", &plan()).unwrap(),
            "sip:4930123456@sipgate.de"
        );
    }

    #[test]
    fn test_plus_only_kept_when_leading() {
        assert_eq!(clean("+49 (30) 123-456"), "+4930123456");
        assert_eq!(clean("49+30"), "4930");
        assert_eq!(clean("++49"), "+49");
    }

    #[test]
    fn test_plan_overrides() {
        let vienna = plan().with_country_code("43").with_area_code("1");
        assert_eq!(
            vienna.to_sip_uri("5551234").unwrap(),
            "sip:4315551234@sipgate.de"
        );

        let at = NumberPlan::new("sipgate.at", "43", "1");
        assert_eq!(
            at.to_sip_uri("01 5551234").unwrap(),
            "sip:4315551234@sipgate.at"
        );
    }

    #[test]
    fn test_domain_comes_from_plan() {
        let custom = plan().with_domain("example.net");
        assert_eq!(
            custom.to_sip_uri("+4930123456").unwrap(),
            "sip:4930123456@example.net"
        );
    }

    proptest! {
        #[test]
        fn prop_local_numbers_get_country_and_area(d in "[1-9][0-9]{1,12}") {
            prop_assert_eq!(
                normalize(&d, &plan()).unwrap(),
                format!("sip:4930{}@sipgate.de", d)
            );
        }

        #[test]
        fn prop_city_numbers_drop_trunk_zero(d in "0[1-9][0-9]{1,12}") {
            prop_assert_eq!(
                normalize(&d, &plan()).unwrap(),
                format!("sip:49{}@sipgate.de", &d[1..])
            );
        }

        #[test]
        fn prop_international_markers_are_equivalent(d in "[1-9][0-9]{1,12}") {
            let with_plus = normalize(&format!("+{}", d), &plan()).unwrap();
            let with_zeros = normalize(&format!("00{}", d), &plan()).unwrap();
            prop_assert_eq!(&with_plus, &with_zeros);
            prop_assert_eq!(with_plus, format!("sip:{}@sipgate.de", d));
        }

        #[test]
        fn prop_separators_do_not_change_result(d in "[1-9][0-9]{2,10}") {
            let spaced: String = d.chars().flat_map(|c| [c, ' ']).collect();
            prop_assert_eq!(
                normalize(&spaced, &plan()).unwrap(),
                normalize(&d, &plan()).unwrap()
            );
        }
    }
}
