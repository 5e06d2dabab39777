//! Courier-related types.
//!
//! - [`CourierKind`] - Enum of supported courier platforms
//! - [`PhoneNumber`] - Validated customer phone number

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Courier Kind
// ============================================================================

/// Supported courier platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourierKind {
    /// Steadfast Courier (cookie session + CSRF login).
    Steadfast,
    /// Pathao Courier (merchant API, bearer token).
    Pathao,
    /// RedX (merchant API, bearer token).
    Redx,
}

impl CourierKind {
    /// Returns the display name for this courier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Steadfast => "Steadfast",
            Self::Pathao => "Pathao",
            Self::Redx => "RedX",
        }
    }

    /// Returns all available courier kinds.
    pub fn all() -> &'static [CourierKind] {
        &[Self::Steadfast, Self::Pathao, Self::Redx]
    }

    /// Returns the report key for this courier (lowercase, no spaces).
    ///
    /// This is the same string serde produces.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Steadfast => "steadfast",
            Self::Pathao => "pathao",
            Self::Redx => "redx",
        }
    }
}

impl fmt::Display for CourierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CourierKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.key() == wanted)
            .ok_or_else(|| CoreError::UnknownCourier(s.to_string()))
    }
}

// ============================================================================
// Phone Number
// ============================================================================

/// Local mobile format: `01`, an operator digit `3`-`9`, eight more digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^01[3-9]\d{8}$").expect("Invalid regex"));

/// A Bangladeshi mobile number in local format (`01XNNNNNNNN`).
///
/// Construction is the only validation point: a `PhoneNumber` value is
/// always well formed, so couriers never re-check it. Input is not trimmed
/// or reformatted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validates and wraps a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPhoneNumber`] unless the input is exactly
    /// eleven digits starting with `01` followed by `3`-`9`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if PHONE_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(CoreError::InvalidPhoneNumber(raw.to_string()))
        }
    }

    /// Returns the number as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number with the `88` country prefix (`8801XNNNNNNNN`).
    pub fn international(&self) -> String {
        format!("88{}", self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courier_kind_from_str() {
        assert_eq!("pathao".parse::<CourierKind>().unwrap(), CourierKind::Pathao);
        assert_eq!(" RedX ".parse::<CourierKind>().unwrap(), CourierKind::Redx);
        assert!("ecourier".parse::<CourierKind>().is_err());
    }

    #[test]
    fn test_courier_kind_key_matches_display() {
        for kind in CourierKind::all() {
            assert_eq!(kind.to_string(), kind.key());
        }
    }

    #[test]
    fn test_phone_accepts_valid_numbers() {
        for raw in ["01712345678", "01311111111", "01999999999"] {
            let phone = PhoneNumber::parse(raw).unwrap();
            assert_eq!(phone.as_str(), raw);
        }
    }

    #[test]
    fn test_phone_rejects_malformed_numbers() {
        let cases = [
            "",
            "0171234567",    // too short
            "017123456789",  // too long
            "01212345678",   // operator digit 2
            "01012345678",   // operator digit 0
            "+8801712345678",
            "8801712345678",
            "0171234567a",
            " 01712345678",
            "01712345678 ",
        ];
        for raw in cases {
            let err = PhoneNumber::parse(raw).unwrap_err();
            assert!(err.is_validation(), "expected validation error for {raw:?}");
        }
    }

    #[test]
    fn test_phone_international() {
        let phone = PhoneNumber::parse("01712345678").unwrap();
        assert_eq!(phone.international(), "8801712345678");
    }
}
