//! Validation of admin-submitted profile data.
//!
//! Drafts hold the raw strings as received. `validate` checks the fields in a fixed order and
//! stops at the first failure, so callers always see the same message for the same input.

use chrono::NaiveDate;
use techmed_types::{
    Address, Email, Gender, LicenseNumber, NameField, Pesel, PersonName, PhoneNumber,
    ValidationError,
};

/// Unvalidated patient details.
#[derive(Debug, Clone, Default)]
pub struct PatientDraft {
    pub email: String,
    pub pesel: String,
    pub gender: String,
    pub phone_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub address: String,
}

/// Patient details that passed every field rule.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub email: Email,
    pub pesel: Pesel,
    pub gender: Gender,
    pub phone_number: PhoneNumber,
    pub first_name: PersonName,
    pub middle_name: Option<PersonName>,
    pub last_name: PersonName,
    pub address: Address,
}

impl PatientDraft {
    pub fn validate(&self) -> Result<NewPatient, ValidationError> {
        Ok(NewPatient {
            email: Email::new(&self.email)?,
            pesel: Pesel::new(&self.pesel)?,
            gender: Gender::new(&self.gender)?,
            phone_number: PhoneNumber::new(&self.phone_number)?,
            first_name: PersonName::new(NameField::First, &self.first_name)?,
            middle_name: PersonName::optional(NameField::Middle, self.middle_name.as_deref())?,
            last_name: PersonName::new(NameField::Last, &self.last_name)?,
            address: Address::new(&self.address)?,
        })
    }
}

/// Unvalidated doctor details.
#[derive(Debug, Clone)]
pub struct DoctorDraft {
    pub email: String,
    pub pesel: String,
    pub gender: String,
    pub phone_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub license_number: String,
    pub hire_date: NaiveDate,
    pub speciality_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub email: Email,
    pub pesel: Pesel,
    pub gender: Gender,
    pub phone_number: PhoneNumber,
    pub first_name: PersonName,
    pub middle_name: Option<PersonName>,
    pub last_name: PersonName,
    pub license_number: LicenseNumber,
    pub hire_date: NaiveDate,
    pub speciality_id: i64,
}

impl DoctorDraft {
    pub fn validate(&self) -> Result<NewDoctor, ValidationError> {
        Ok(NewDoctor {
            email: Email::new(&self.email)?,
            pesel: Pesel::new(&self.pesel)?,
            gender: Gender::new(&self.gender)?,
            phone_number: PhoneNumber::new(&self.phone_number)?,
            first_name: PersonName::new(NameField::First, &self.first_name)?,
            middle_name: PersonName::optional(NameField::Middle, self.middle_name.as_deref())?,
            last_name: PersonName::new(NameField::Last, &self.last_name)?,
            license_number: LicenseNumber::new(&self.license_number)?,
            hire_date: self.hire_date,
            speciality_id: self.speciality_id,
        })
    }
}
