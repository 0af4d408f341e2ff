//! Row types read from the relational store.
//!
//! These mirror the table layout (with a few joined columns) and are what the repositories
//! return. Wire shapes live in `api-shared`; nothing here is serialized to callers directly.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;

/// A user account joined with its `user_type` name.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    pub mfa_type: Option<String>,
    pub type_id: i64,
    pub type_name: String,
    pub link_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PatientRecord {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub pesel: String,
    pub gender: String,
    pub address: String,
    pub phone_number: String,
}

/// A doctor joined with the name of their speciality.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DoctorRecord {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub pesel: Option<String>,
    pub gender: Option<String>,
    pub phone_number: String,
    pub license_number: String,
    pub hire_date: NaiveDate,
    pub speciality_id: i64,
    pub speciality_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SpecialityRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AppointmentStatusRecord {
    pub id: i64,
    pub name: String,
}

/// An appointment joined with its status and the patient's public details.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AppointmentRecord {
    pub id: i64,
    pub date: NaiveDateTime,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub recommendations: Option<String>,
    pub status_id: i64,
    pub status_name: String,
    pub patient_id: i64,
    pub patient_first_name: String,
    pub patient_middle_name: Option<String>,
    pub patient_last_name: String,
    pub patient_gender: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FacilityRecord {
    pub facility_id: i64,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub facility_type: String,
    pub website: Option<String>,
    pub operating_hours: Option<String>,
}

/// Kinds of medical facility. Stored by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityType {
    Hospital,
    Clinic,
    Laboratory,
    Pharmacy,
}

impl FacilityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityType::Hospital => "Hospital",
            FacilityType::Clinic => "Clinic",
            FacilityType::Laboratory => "Laboratory",
            FacilityType::Pharmacy => "Pharmacy",
        }
    }
}

/// Lifecycle of a prescription. Stored by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrescriptionStatus {
    Active,
    Purchased,
    Canceled,
}

impl PrescriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionStatus::Active => "Active",
            PrescriptionStatus::Purchased => "Purchased",
            PrescriptionStatus::Canceled => "Canceled",
        }
    }
}
