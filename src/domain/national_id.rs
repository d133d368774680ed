//! National id (CPF) value object.
//!
//! An 11-digit identifier whose last two digits are weighted modulo-11
//! check digits. Punctuation is accepted on input and stripped.

use std::fmt;

use serde::Serialize;

use crate::config::NATIONAL_ID_LENGTH;

/// Why a national id was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NationalIdError {
    /// Not exactly 11 digits once punctuation is removed
    Length,
    /// All 11 digits are the same (e.g. 111.111.111-11)
    RepeatedDigits,
    /// First or second check digit does not match
    Checksum,
}

impl fmt::Display for NationalIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NationalIdError::Length => write!(f, "CPF must contain exactly 11 digits"),
            NationalIdError::RepeatedDigits => write!(f, "CPF cannot have all digits equal"),
            NationalIdError::Checksum => write!(f, "Invalid CPF"),
        }
    }
}

/// Normalized, checksum-valid national id (digits only).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    /// Parse and validate a national id, accepting `529.982.247-25` style input.
    pub fn parse(raw: &str) -> Result<Self, NationalIdError> {
        let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();

        if digits.len() != NATIONAL_ID_LENGTH {
            return Err(NationalIdError::Length);
        }
        if digits.iter().all(|d| *d == digits[0]) {
            return Err(NationalIdError::RepeatedDigits);
        }
        if check_digit(&digits[..9], 10) != digits[9] || check_digit(&digits[..10], 11) != digits[10]
        {
            return Err(NationalIdError::Checksum);
        }

        Ok(Self(digits.iter().map(|d| char::from(b'0' + *d as u8)).collect()))
    }

    /// Convenience predicate
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `11 - (Σ digit[i] * (first_weight - i)) mod 11`, folded to 0 when >= 10.
fn check_digit(digits: &[u32], first_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (first_weight - i as u32))
        .sum();
    let digit = 11 - (sum % 11);
    if digit >= 10 {
        0
    } else {
        digit
    }
}
