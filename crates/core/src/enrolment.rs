//! Administrative account creation.
//!
//! Patients and doctors are created together with a linked login account carrying a generated
//! temporary password. The profile row and the account row are written in one transaction.

use crate::constants::TEMP_PASSWORD_LEN;
use crate::credentials::{generate_temporary_password, CredentialService, PasswordPolicy};
use crate::repositories::{catalog, doctors, patients, users};
use crate::validation::{DoctorDraft, NewDoctor, NewPatient, PatientDraft};
use crate::{CoreError, CoreResult, Database};
use techmed_types::{Email, Role};

/// Result of creating a profile-backed account.
#[derive(Debug, Clone)]
pub struct Enrolled {
    pub user_id: i64,
    pub profile_id: i64,
    /// Shown once to the administrator. Only its hash is stored.
    pub temporary_password: String,
}

#[derive(Clone, Debug)]
pub struct EnrolmentService {
    db: Database,
    credentials: CredentialService,
}

impl EnrolmentService {
    pub fn new(db: Database, credentials: CredentialService) -> Self {
        Self { db, credentials }
    }

    /// Validate `draft` and create the patient with a linked `Patient` account.
    ///
    /// # Errors
    ///
    /// - `Validation` for the first field that fails its rule,
    /// - `UserAlreadyExists` if the email is taken.
    pub async fn create_patient(&self, draft: &PatientDraft) -> CoreResult<Enrolled> {
        let patient = draft.validate()?;
        if users::email_exists(self.db.pool(), patient.email.as_str()).await? {
            return Err(CoreError::UserAlreadyExists);
        }

        let temporary_password = generate_temporary_password(TEMP_PASSWORD_LEN)?;
        let digest = self
            .credentials
            .hash_blocking(temporary_password.clone())
            .await?;

        let (profile_id, user_id) = self.persist_patient(&patient, &digest).await?;
        tracing::info!("created patient {profile_id} with user {user_id}");
        Ok(Enrolled {
            user_id,
            profile_id,
            temporary_password,
        })
    }

    async fn persist_patient(&self, patient: &NewPatient, digest: &str) -> CoreResult<(i64, i64)> {
        let mut tx = self.db.pool().begin().await?;
        let profile_id = patients::insert(&mut *tx, patient).await?;
        let user_id = users::insert(
            &mut *tx,
            patient.email.as_str(),
            digest,
            Role::Patient,
            Some(profile_id),
        )
        .await
        .map_err(duplicate_as_existing)?;
        tx.commit().await?;
        Ok((profile_id, user_id))
    }

    /// Validate `draft` and create the doctor with a linked `Doctor` account.
    ///
    /// # Errors
    ///
    /// - `Validation` for the first field that fails its rule,
    /// - `UserAlreadyExists` if the email or licence number is taken,
    /// - `SpecialityNotFound` if `speciality_id` does not exist.
    pub async fn create_doctor(&self, draft: &DoctorDraft) -> CoreResult<Enrolled> {
        let doctor = draft.validate()?;
        if users::email_exists(self.db.pool(), doctor.email.as_str()).await?
            || doctors::license_exists(self.db.pool(), doctor.license_number.as_str()).await?
        {
            return Err(CoreError::UserAlreadyExists);
        }
        if !catalog::speciality_exists(self.db.pool(), doctor.speciality_id).await? {
            return Err(CoreError::SpecialityNotFound);
        }

        let temporary_password = generate_temporary_password(TEMP_PASSWORD_LEN)?;
        let digest = self
            .credentials
            .hash_blocking(temporary_password.clone())
            .await?;

        let (profile_id, user_id) = self.persist_doctor(&doctor, &digest).await?;
        tracing::info!("created doctor {profile_id} with user {user_id}");
        Ok(Enrolled {
            user_id,
            profile_id,
            temporary_password,
        })
    }

    async fn persist_doctor(&self, doctor: &NewDoctor, digest: &str) -> CoreResult<(i64, i64)> {
        let mut tx = self.db.pool().begin().await?;
        let profile_id = doctors::insert(&mut *tx, doctor)
            .await
            .map_err(duplicate_as_existing)?;
        let user_id = users::insert(
            &mut *tx,
            doctor.email.as_str(),
            digest,
            Role::Doctor,
            Some(profile_id),
        )
        .await
        .map_err(duplicate_as_existing)?;
        tx.commit().await?;
        Ok((profile_id, user_id))
    }

    /// Create an `Admin` account with a chosen password. Used by the CLI.
    pub async fn create_admin(
        &self,
        policy: &PasswordPolicy,
        email: &str,
        password: &str,
    ) -> CoreResult<i64> {
        let email = Email::new(email)?;
        policy.check(password)?;
        if users::email_exists(self.db.pool(), email.as_str()).await? {
            return Err(CoreError::UserAlreadyExists);
        }

        let digest = self.credentials.hash_blocking(password.to_owned()).await?;
        let id = users::insert(self.db.pool(), email.as_str(), &digest, Role::Admin, None)
            .await
            .map_err(duplicate_as_existing)?;
        tracing::info!("created admin user {id}");
        Ok(id)
    }
}

fn duplicate_as_existing(err: CoreError) -> CoreError {
    if err.is_unique_violation() {
        CoreError::UserAlreadyExists
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KdfParams;
    use chrono::NaiveDate;
    use techmed_types::ValidationError;

    async fn setup() -> (Database, EnrolmentService) {
        let db = Database::in_memory().await.expect("open");
        db.migrate().await.expect("migrate");
        catalog::insert_speciality(db.pool(), "Cardiology", "Heart", "CARD")
            .await
            .expect("speciality");
        let creds = CredentialService::new(KdfParams::insecure_fast()).expect("kdf");
        (db.clone(), EnrolmentService::new(db, creds))
    }

    fn patient_draft(email: &str) -> PatientDraft {
        PatientDraft {
            email: email.into(),
            pesel: "44051401359".into(),
            gender: "M".into(),
            phone_number: "123456789".into(),
            first_name: "Jan".into(),
            middle_name: None,
            last_name: "Kowalski".into(),
            address: "Polna 3, Warszawa".into(),
        }
    }

    fn doctor_draft(email: &str, license: &str, speciality_id: i64) -> DoctorDraft {
        DoctorDraft {
            email: email.into(),
            pesel: "62042621665".into(),
            gender: "F".into(),
            phone_number: "+48 600700800".into(),
            first_name: "Zofia".into(),
            middle_name: None,
            last_name: "Religa".into(),
            license_number: license.into(),
            hire_date: NaiveDate::from_ymd_opt(2021, 9, 1).expect("date"),
            speciality_id,
        }
    }

    async fn count(db: &Database, table: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM \"{table}\"");
        sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(db.pool())
            .await
            .expect("count")
    }

    #[tokio::test]
    async fn patient_gets_linked_account_and_temporary_password() {
        let (db, enrolment) = setup().await;
        let enrolled = enrolment
            .create_patient(&patient_draft("jan@example.com"))
            .await
            .expect("create");
        assert_eq!(enrolled.temporary_password.len(), TEMP_PASSWORD_LEN);

        let user = users::find_by_id(db.pool(), enrolled.user_id)
            .await
            .expect("query")
            .expect("user");
        assert_eq!(user.type_name, "Patient");
        assert_eq!(user.link_id, Some(enrolled.profile_id));
        assert_ne!(user.hashed_password, enrolled.temporary_password);
    }

    #[tokio::test]
    async fn duplicate_patient_email_is_rejected() {
        let (db, enrolment) = setup().await;
        enrolment
            .create_patient(&patient_draft("jan@example.com"))
            .await
            .expect("first");
        assert!(matches!(
            enrolment
                .create_patient(&patient_draft("jan@example.com"))
                .await,
            Err(CoreError::UserAlreadyExists)
        ));
        assert_eq!(count(&db, "patient").await, 1);
    }

    #[tokio::test]
    async fn failed_account_insert_leaves_no_orphan_profile() {
        let (db, enrolment) = setup().await;
        users::insert(db.pool(), "taken@example.com", "x", Role::Unassigned, None)
            .await
            .expect("existing user");

        // Skip the pre-check to simulate a concurrent registration of the same email.
        let patient = patient_draft("taken@example.com").validate().expect("valid");
        let err = enrolment
            .persist_patient(&patient, "digest")
            .await
            .expect_err("duplicate email");
        assert!(matches!(err, CoreError::UserAlreadyExists));
        assert_eq!(count(&db, "patient").await, 0);
    }

    #[tokio::test]
    async fn invalid_patient_is_rejected_before_any_write() {
        let (db, enrolment) = setup().await;
        let mut draft = patient_draft("jan@example.com");
        draft.first_name = "J4n".into();
        assert!(matches!(
            enrolment.create_patient(&draft).await,
            Err(CoreError::Validation(ValidationError::NameNotLetters(_)))
        ));
        assert_eq!(count(&db, "patient").await, 0);
        assert_eq!(count(&db, "user").await, 0);
    }

    #[tokio::test]
    async fn doctor_creation_checks_licence_and_speciality() {
        let (db, enrolment) = setup().await;
        let enrolled = enrolment
            .create_doctor(&doctor_draft("zofia@example.com", "ZR001", 1))
            .await
            .expect("create");
        let doctor = doctors::find_by_id(db.pool(), enrolled.profile_id)
            .await
            .expect("query")
            .expect("doctor");
        assert_eq!(doctor.speciality_name, "Cardiology");

        assert!(matches!(
            enrolment
                .create_doctor(&doctor_draft("other@example.com", "ZR001", 1))
                .await,
            Err(CoreError::UserAlreadyExists)
        ));
        assert!(matches!(
            enrolment
                .create_doctor(&doctor_draft("other@example.com", "ZR002", 99))
                .await,
            Err(CoreError::SpecialityNotFound)
        ));
        assert_eq!(count(&db, "doctor").await, 1);
    }

    #[tokio::test]
    async fn admin_creation_applies_password_policy() {
        let (db, enrolment) = setup().await;
        let policy = PasswordPolicy::default();
        assert!(matches!(
            enrolment
                .create_admin(&policy, "root@example.com", "password1234")
                .await,
            Err(CoreError::Validation(ValidationError::PasswordTooWeak))
        ));
        let id = enrolment
            .create_admin(&policy, "root@example.com", "an-admin-only-secret")
            .await
            .expect("admin");
        let user = users::find_by_id(db.pool(), id)
            .await
            .expect("query")
            .expect("user");
        assert_eq!(user.type_name, "Admin");
    }
}
