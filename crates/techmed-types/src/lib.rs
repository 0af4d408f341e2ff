//! # TechMed Types
//!
//! Validated value types shared by the TechMed crates.
//!
//! Every type in this crate can only be constructed through a checking constructor, so a value
//! that exists has already passed the field rules. The `Display` text of [`ValidationError`] is
//! the human-readable detail returned to API callers.

/// Implements the read-only string accessors and serde support shared by the validated
/// newtypes in this crate. The type must provide `fn new(&str) -> Result<Self, ValidationError>`.
macro_rules! validated_string {
    ($ty:ident) => {
        impl $ty {
            /// Returns the validated value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::new(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use validated_string;

mod contact;
mod identity;
mod person;
mod role;

pub use contact::{Address, PhoneNumber};
pub use identity::{Email, Pesel};
pub use person::{Gender, LicenseNumber, NameField, PersonName};
pub use role::{Role, UnknownRole};

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Field-level validation failures.
///
/// The messages are user-facing and are returned verbatim in the `detail` field of a 400
/// response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Email address must be valid")]
    Email,

    #[error("PESEL must contain only digits.")]
    PeselNotDigits,
    #[error("PESEL must be exactly 11 digits long.")]
    PeselLength,
    #[error("Invalid PESEL: checksum does not match.")]
    PeselChecksum,

    #[error("Gender is invalid")]
    Gender,

    #[error("Phone number must be at least 3 characters long.")]
    PhoneTooShort,
    #[error("Phone number must be at most 16 characters long.")]
    PhoneTooLong,
    #[error("Phone number must be valid")]
    PhoneFormat,

    #[error("{0} name cannot be empty.")]
    NameEmpty(NameField),
    #[error("{0} name must contain only letters")]
    NameNotLetters(NameField),
    #[error("{0} name must be between 3 and 32 characters long.")]
    NameLength(NameField),
    #[error("{0} name must be at most 32 characters long.")]
    NameTooLong(NameField),

    #[error("Address cannot be empty.")]
    AddressEmpty,
    #[error("Address contains invalid characters.")]
    AddressCharacters,
    #[error("Address must be at most 255 characters long.")]
    AddressTooLong,

    #[error("License number must be exactly 5 alphanumeric characters.")]
    LicenseNumber,

    #[error("The password must be at least 12 characters long.")]
    PasswordTooShort,
    #[error("This password is considered too weak")]
    PasswordTooWeak,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Word character: unicode letters and digits plus underscore.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
