//! # TechMed Core
//!
//! Business logic for the TechMed appointment system:
//! - credential hashing and password policy
//! - the SQLite store, its schema and per-table repositories
//! - role resolution, account self-service and administrative enrolment
//! - doctors' appointment schedules and development mock data
//!
//! **No API concerns**: tokens, cookies and HTTP mapping belong in `api-shared` and `api-rest`.

pub mod accounts;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod db;
pub mod enrolment;
pub mod error;
pub mod models;
pub mod repositories;
pub mod resolver;
pub mod schedule;
pub mod seed;
pub mod validation;

pub use accounts::{Account, AccountService};
pub use config::{CoreConfig, KdfParams};
pub use credentials::{generate_temporary_password, CredentialService, PasswordPolicy};
pub use db::Database;
pub use enrolment::{Enrolled, EnrolmentService};
pub use error::{CoreError, CoreResult};
pub use resolver::{Profile, ResolvedUser, RoleResolver};
pub use schedule::{AppointmentFilter, ScheduleService};
pub use validation::{DoctorDraft, PatientDraft};

pub use techmed_types::{NonEmptyText, Role, ValidationError};
