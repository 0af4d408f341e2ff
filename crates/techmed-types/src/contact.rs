//! Contact details: phone numbers and postal addresses.

use crate::{is_word_char, validated_string, ValidationError};

const PHONE_MIN_LEN: usize = 3;
const PHONE_MAX_LEN: usize = 16;
const ADDRESS_MAX_LEN: usize = 255;

/// A phone number in one of the accepted shapes:
///
/// - a 3-digit short number (`112`)
/// - a 9-digit national number (`123456789`)
/// - an international number: `+`, a 1-3 digit country code, an optional single whitespace,
///   then at least 9 digits (`+48 123456789`, `+48123456789`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(input: &str) -> Result<Self, ValidationError> {
        let len = input.chars().count();
        if len < PHONE_MIN_LEN {
            return Err(ValidationError::PhoneTooShort);
        }
        if len > PHONE_MAX_LEN {
            return Err(ValidationError::PhoneTooLong);
        }

        if !Self::matches_pattern(input) {
            return Err(ValidationError::PhoneFormat);
        }
        Ok(Self(input.to_owned()))
    }

    fn matches_pattern(input: &str) -> bool {
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

        if all_digits(input) {
            return input.len() == 3 || input.len() == 9;
        }

        let Some(rest) = input.strip_prefix('+') else {
            return false;
        };

        match rest.split_once(char::is_whitespace) {
            Some((code, number)) => {
                all_digits(code) && code.len() <= 3 && all_digits(number) && number.len() >= 9
            }
            // Without a separator the country code and number run together; any split of
            // 1-3 + 9.. digits is acceptable, so only the total length matters.
            None => all_digits(rest) && rest.len() >= 10,
        }
    }
}

validated_string!(PhoneNumber);

/// A postal address made of word characters, whitespace and `,.'-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    pub fn new(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::AddressEmpty);
        }
        let chars_ok = input
            .chars()
            .all(|c| is_word_char(c) || c.is_whitespace() || matches!(c, ',' | '.' | '\'' | '-'));
        if !chars_ok {
            return Err(ValidationError::AddressCharacters);
        }
        if input.chars().count() > ADDRESS_MAX_LEN {
            return Err(ValidationError::AddressTooLong);
        }
        Ok(Self(input.to_owned()))
    }
}

validated_string!(Address);
