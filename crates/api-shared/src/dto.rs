//! Request and response bodies.
//!
//! Field names follow the wire format exactly, including the upper-case `PESEL` key and the
//! `type` key for role names.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use techmed_core::models::{
    AppointmentRecord, AppointmentStatusRecord, DoctorRecord, FacilityRecord, PatientRecord,
    SpecialityRecord, UserRecord,
};
use techmed_core::{DoctorDraft, PatientDraft, Profile, ResolvedUser};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
}

/// Form body of `/auth/register` and `/auth/login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

/// Form body of `/auth/change_password`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenInfoRes {
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(rename = "PESEL")]
    pub pesel: String,
    pub gender: String,
    pub address: String,
    pub phone_number: String,
}

impl From<PatientRecord> for PatientRes {
    fn from(p: PatientRecord) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name,
            middle_name: p.middle_name,
            last_name: p.last_name,
            pesel: p.pesel,
            gender: p.gender,
            address: p.address,
            phone_number: p.phone_number,
        }
    }
}

/// Public subset of a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientStrippedRes {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: String,
}

impl From<PatientRecord> for PatientStrippedRes {
    fn from(p: PatientRecord) -> Self {
        Self {
            first_name: p.first_name,
            middle_name: p.middle_name,
            last_name: p.last_name,
            gender: p.gender,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SpecialityRefRes {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DoctorRes {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(rename = "PESEL")]
    pub pesel: Option<String>,
    pub gender: Option<String>,
    pub phone_number: String,
    pub license_number: String,
    pub hire_date: NaiveDate,
    pub speciality: SpecialityRefRes,
}

impl From<DoctorRecord> for DoctorRes {
    fn from(d: DoctorRecord) -> Self {
        Self {
            id: d.id,
            first_name: d.first_name,
            middle_name: d.middle_name,
            last_name: d.last_name,
            pesel: d.pesel,
            gender: d.gender,
            phone_number: d.phone_number,
            license_number: d.license_number,
            hire_date: d.hire_date,
            speciality: SpecialityRefRes {
                id: d.speciality_id,
                name: d.speciality_name,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FacilityRes {
    pub facility_id: i64,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub facility_type: String,
    pub website: Option<String>,
    pub operating_hours: Option<String>,
}

impl From<FacilityRecord> for FacilityRes {
    fn from(f: FacilityRecord) -> Self {
        Self {
            facility_id: f.facility_id,
            name: f.name,
            address: f.address,
            phone_number: f.phone_number,
            facility_type: f.facility_type,
            website: f.website,
            operating_hours: f.operating_hours,
        }
    }
}

/// A doctor with the facilities they work at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DoctorDetailRes {
    #[serde(flatten)]
    pub doctor: DoctorRes,
    pub facilities: Vec<FacilityRes>,
}

/// Public subset of a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DoctorStrippedRes {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub phone_number: String,
    pub license_number: String,
    pub hire_date: NaiveDate,
    pub speciality: SpecialityRefRes,
}

impl From<DoctorRecord> for DoctorStrippedRes {
    fn from(d: DoctorRecord) -> Self {
        Self {
            first_name: d.first_name,
            middle_name: d.middle_name,
            last_name: d.last_name,
            phone_number: d.phone_number,
            license_number: d.license_number,
            hire_date: d.hire_date,
            speciality: SpecialityRefRes {
                id: d.speciality_id,
                name: d.speciality_name,
            },
        }
    }
}

/// Who a user is, plus their role profile when the role has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfoRes {
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: String,
    #[serde(rename = "Patient", skip_serializing_if = "Option::is_none", default)]
    pub patient: Option<PatientRes>,
    #[serde(rename = "Doctor", skip_serializing_if = "Option::is_none", default)]
    pub doctor: Option<DoctorRes>,
}

impl From<ResolvedUser> for UserInfoRes {
    fn from(user: ResolvedUser) -> Self {
        let user_type = user.type_name().to_owned();
        let (patient, doctor) = match user.profile {
            Profile::Patient(p) => (Some(p.into()), None),
            Profile::Doctor(d) => (None, Some(d.into())),
            Profile::Admin | Profile::Unassigned | Profile::Other(_) => (None, None),
        };
        Self {
            email: user.email,
            user_type,
            patient,
            doctor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserTypeRes {
    pub id: i64,
    pub name: String,
}

/// An account without its password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserStrippedRes {
    pub id: i64,
    pub email: String,
    pub mfa_type: Option<String>,
    #[serde(rename = "type")]
    pub user_type: UserTypeRes,
}

impl From<UserRecord> for UserStrippedRes {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            email: u.email,
            mfa_type: u.mfa_type,
            user_type: UserTypeRes {
                id: u.type_id,
                name: u.type_name,
            },
        }
    }
}

/// JSON body of `/admin/patients/add`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewPatientReq {
    pub email: String,
    #[serde(rename = "PESEL")]
    pub pesel: String,
    pub gender: String,
    pub phone_number: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub address: String,
}

impl From<NewPatientReq> for PatientDraft {
    fn from(r: NewPatientReq) -> Self {
        Self {
            email: r.email,
            pesel: r.pesel,
            gender: r.gender,
            phone_number: r.phone_number,
            first_name: r.first_name,
            middle_name: r.middle_name,
            last_name: r.last_name,
            address: r.address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewPatientRes {
    pub message: String,
    pub patient_temp_password: String,
}

/// JSON body of `/admin/doctors/add`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewDoctorReq {
    pub email: String,
    #[serde(rename = "PESEL")]
    pub pesel: String,
    pub gender: String,
    pub phone_number: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub license_number: String,
    pub hire_date: NaiveDate,
    pub speciality_id: i64,
}

impl From<NewDoctorReq> for DoctorDraft {
    fn from(r: NewDoctorReq) -> Self {
        Self {
            email: r.email,
            pesel: r.pesel,
            gender: r.gender,
            phone_number: r.phone_number,
            first_name: r.first_name,
            middle_name: r.middle_name,
            last_name: r.last_name,
            license_number: r.license_number,
            hire_date: r.hire_date,
            speciality_id: r.speciality_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewDoctorRes {
    pub message: String,
    pub doctor_temp_password: String,
}

/// Query string of `/doctor/appointments`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentsQuery {
    /// First day of the range. Defaults to today.
    pub start_date: Option<NaiveDate>,
    /// Last day of the range, inclusive. Defaults to 90 days from today.
    pub end_date: Option<NaiveDate>,
    /// Status name, or `Any` for all statuses. Defaults to `Scheduled`.
    pub appointment_status: Option<String>,
}

impl From<AppointmentsQuery> for techmed_core::AppointmentFilter {
    fn from(q: AppointmentsQuery) -> Self {
        Self {
            start_date: q.start_date,
            end_date: q.end_date,
            status: q.appointment_status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AppointmentStatusRes {
    pub id: i64,
    pub name: String,
}

impl From<AppointmentStatusRecord> for AppointmentStatusRes {
    fn from(s: AppointmentStatusRecord) -> Self {
        Self {
            id: s.id,
            name: s.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AppointmentRes {
    pub id: i64,
    pub date: NaiveDateTime,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub status: AppointmentStatusRes,
    pub patient: PatientStrippedRes,
}

impl From<AppointmentRecord> for AppointmentRes {
    fn from(a: AppointmentRecord) -> Self {
        Self {
            id: a.id,
            date: a.date,
            reason: a.reason,
            diagnosis: a.diagnosis,
            status: AppointmentStatusRes {
                id: a.status_id,
                name: a.status_name,
            },
            patient: PatientStrippedRes {
                first_name: a.patient_first_name,
                middle_name: a.patient_middle_name,
                last_name: a.patient_last_name,
                gender: a.patient_gender,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SpecialityRes {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub code: String,
}

impl From<SpecialityRecord> for SpecialityRes {
    fn from(s: SpecialityRecord) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            code: s.code,
        }
    }
}
