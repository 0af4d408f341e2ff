//! Personal details: names, gender codes and doctor licence numbers.

use crate::{validated_string, ValidationError};

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 32;
const LICENSE_NUMBER_LEN: usize = 5;

/// Which name field a [`PersonName`] was validated as. Used to build error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    First,
    Middle,
    Last,
}

impl std::fmt::Display for NameField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NameField::First => "First",
            NameField::Middle => "Middle",
            NameField::Last => "Last",
        })
    }
}

/// A personal name made only of letters.
///
/// First and last names are required and must be 3-32 characters long. Middle names are
/// optional (see [`PersonName::optional`]) and only bounded above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(field: NameField, input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::NameEmpty(field));
        }
        if !input.chars().all(char::is_alphabetic) {
            return Err(ValidationError::NameNotLetters(field));
        }
        let len = input.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
            return Err(ValidationError::NameLength(field));
        }
        Ok(Self(input.to_owned()))
    }

    /// Validates an optional name. `None` and the empty string both mean "not given".
    pub fn optional(field: NameField, input: Option<&str>) -> Result<Option<Self>, ValidationError> {
        let Some(input) = input.filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        if !input.chars().all(char::is_alphabetic) {
            return Err(ValidationError::NameNotLetters(field));
        }
        if input.chars().count() > NAME_MAX_LEN {
            return Err(ValidationError::NameTooLong(field));
        }
        Ok(Some(Self(input.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gender code as recorded on patient and doctor profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "K")]
    Woman,
    #[serde(rename = "O")]
    Other,
    #[serde(rename = "I")]
    Intersex,
}

impl Gender {
    pub fn new(input: &str) -> Result<Self, ValidationError> {
        match input {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            "K" => Ok(Gender::Woman),
            "O" => Ok(Gender::Other),
            "I" => Ok(Gender::Intersex),
            _ => Err(ValidationError::Gender),
        }
    }

    /// Single-letter storage code.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Woman => "K",
            Gender::Other => "O",
            Gender::Intersex => "I",
        }
    }
}

/// A doctor's licence number: exactly five ASCII letters or digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseNumber(String);

impl LicenseNumber {
    pub fn new(input: &str) -> Result<Self, ValidationError> {
        if input.len() != LICENSE_NUMBER_LEN || !input.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ValidationError::LicenseNumber);
        }
        Ok(Self(input.to_owned()))
    }
}

validated_string!(LicenseNumber);
