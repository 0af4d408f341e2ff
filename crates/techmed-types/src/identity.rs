//! Identity values: e-mail addresses and PESEL numbers.

use crate::{is_word_char, validated_string, ValidationError};

/// Weights applied to the first ten PESEL digits.
const PESEL_WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];

/// A syntactically valid e-mail address.
///
/// Accepted shape: `local@label.label...tld` where the local part and labels are made of word
/// characters, `-` (and `.` in the local part), there are at least two domain labels, and the
/// final label has at least two characters. Matching is case-insensitive and the original
/// casing is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(input: &str) -> Result<Self, ValidationError> {
        let (local, domain) = input.split_once('@').ok_or(ValidationError::Email)?;

        let local_ok = !local.is_empty()
            && local
                .chars()
                .all(|c| is_word_char(c) || c == '-' || c == '.');
        if !local_ok {
            return Err(ValidationError::Email);
        }

        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 {
            return Err(ValidationError::Email);
        }
        let labels_ok = labels
            .iter()
            .all(|label| !label.is_empty() && label.chars().all(|c| is_word_char(c) || c == '-'));
        if !labels_ok {
            return Err(ValidationError::Email);
        }

        let tld_len = labels.last().map(|l| l.chars().count()).unwrap_or(0);
        if tld_len < 2 {
            return Err(ValidationError::Email);
        }

        Ok(Self(input.to_owned()))
    }
}

validated_string!(Email);

/// A Polish national identification number with a verified checksum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pesel(String);

impl Pesel {
    /// Validates an 11-digit PESEL.
    ///
    /// The checks run in order: digits only, exact length, then the weighted checksum of the first
    /// ten digits (`(10 - sum mod 10) mod 10`) must equal the eleventh digit.
    pub fn new(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::PeselNotDigits);
        }
        if input.len() != 11 {
            return Err(ValidationError::PeselLength);
        }

        let digits: Vec<u32> = input.bytes().map(|b| u32::from(b - b'0')).collect();
        if Self::check_digit(&digits[..10]) != digits[10] {
            return Err(ValidationError::PeselChecksum);
        }

        Ok(Self(input.to_owned()))
    }

    /// Computes the check digit for the first ten PESEL digits.
    ///
    /// `digits` must hold exactly ten values in `0..=9`; extra values are ignored.
    pub fn check_digit(digits: &[u32]) -> u32 {
        let sum: u32 = digits
            .iter()
            .zip(PESEL_WEIGHTS.iter())
            .map(|(d, w)| d * w)
            .sum();
        (10 - sum % 10) % 10
    }
}

validated_string!(Pesel);
