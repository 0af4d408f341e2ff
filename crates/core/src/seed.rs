//! Mock data for development databases.
//!
//! Every seeded account uses the password [`MOCK_PASSWORD`]. Dates are laid out around the
//! given `today` so the default appointment window always has something in it.

use crate::credentials::CredentialService;
use crate::models::{FacilityType, PrescriptionStatus};
use crate::repositories::appointments::{self, AppointmentRow};
use crate::repositories::{catalog, users};
use crate::{CoreResult, Database};
use chrono::{Days, NaiveDate, NaiveDateTime};
use sqlx::SqliteConnection;
use techmed_types::{Pesel, Role};

pub const MOCK_PASSWORD: &str = "password";

const PATIENT_COUNT: i64 = 100;
const DOCTOR_COUNT: i64 = 10;
const PATIENT_ACCOUNTS: i64 = 10;

const FIRST_NAMES: [&str; 10] = [
    "Anna", "Piotr", "Maria", "Krzysztof", "Katarzyna", "Tomasz", "Agnieszka", "Andrzej",
    "Barbara", "Marek",
];
const LAST_NAMES: [&str; 10] = [
    "Nowak", "Kowalski", "Wiśniewski", "Wójcik", "Kowalczyk", "Kamiński", "Lewandowski",
    "Zieliński", "Szymański", "Woźniak",
];
const MIDDLE_NAMES: [&str; 5] = ["Jan", "Ewa", "Adam", "Zofia", "Marta"];

const SPECIALITIES: [(&str, &str, &str); 3] = [
    ("Cardiology", "Heart and cardiovascular system", "CARD"),
    ("Neurology", "Brain and nervous system", "NEUR"),
    ("Orthopedics", "Bones and muscles", "ORTH"),
];

const DRUGS: [(&str, &str, &str, &str); 5] = [
    ("Aspirin", "Tablet", "500mg", "acetylsalicylic acid"),
    ("Amoxil", "Capsule", "250mg", "Amoxicillin"),
    ("Advil", "Tablet", "200mg", "Ibuprofen"),
    ("Ibuprofen", "Tablet", "200mg", "Ibuprofen"),
    ("Ibum", "Tablet", "200mg", "Ibuprofen"),
];

const FACILITIES: [(&str, &str, &str, FacilityType, &str, &str); 4] = [
    (
        "General Hospital",
        "123 Main St, Cityville",
        "123456789",
        FacilityType::Hospital,
        "http://generalhospital.example.com",
        "Mon-Fri 8:00-20:00, Sat 8:00-14:00",
    ),
    (
        "Downtown Clinic",
        "456 Broad Ave, Cityville",
        "123555019",
        FacilityType::Clinic,
        "http://downtownclinic.example.com",
        "Mon-Fri 9:00-17:00",
    ),
    (
        "City Labs",
        "789 Maple St, Cityville",
        "123555112",
        FacilityType::Laboratory,
        "http://citylabs.example.com",
        "Mon-Fri 7:00-19:00",
    ),
    (
        "Main Street Pharmacy",
        "101 Elm St, Cityville",
        "123555121",
        FacilityType::Pharmacy,
        "http://mainstreetpharmacy.example.com",
        "Mon-Sun 8:00-22:00",
    ),
];

const DOCTOR_FACILITIES: [(i64, i64); 7] = [(1, 1), (2, 1), (3, 2), (1, 3), (4, 4), (2, 2), (5, 1)];

/// Row counts written by [`insert_mock_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub patients: usize,
    pub doctors: usize,
    pub appointments: usize,
    pub prescriptions: usize,
    pub referrals: usize,
}

/// A valid PESEL whose first ten digits are `n` zero-padded.
pub fn mock_pesel(n: u64) -> String {
    let body = format!("{:010}", n % 10_000_000_000);
    let digits: Vec<u32> = body.bytes().map(|b| u32::from(b - b'0')).collect();
    format!("{body}{}", Pesel::check_digit(&digits))
}

fn shift(today: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        today.checked_add_days(magnitude)
    } else {
        today.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(today)
}

fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
}

/// Populate a freshly migrated database with mock data.
///
/// All rows are written in a single transaction. The password is hashed once and the digest
/// shared by every seeded account.
pub async fn insert_mock_data(
    db: &Database,
    credentials: &CredentialService,
    today: NaiveDate,
) -> CoreResult<SeedSummary> {
    let digest = credentials.hash_blocking(MOCK_PASSWORD.to_owned()).await?;
    let mut summary = SeedSummary::default();

    let mut tx = db.pool().begin().await?;

    for i in 0..PATIENT_COUNT {
        insert_patient(&mut *tx, i).await?;
        summary.patients += 1;
    }

    for (name, description, code) in SPECIALITIES {
        catalog::insert_speciality(&mut *tx, name, description, code).await?;
    }

    for i in 1..=DOCTOR_COUNT {
        insert_doctor(&mut *tx, i).await?;
        summary.doctors += 1;
    }

    for i in 0..PATIENT_ACCOUNTS {
        let email = format!("user{i}@example.com");
        users::insert(&mut *tx, &email, &digest, Role::Patient, Some(i + 1)).await?;
        summary.users += 1;
    }
    for (email, role, link) in [
        ("admin@example.com", Role::Admin, None),
        ("doctor@example.com", Role::Doctor, Some(1)),
        ("unassigned@example.com", Role::Unassigned, None),
    ] {
        users::insert(&mut *tx, email, &digest, role, link).await?;
        summary.users += 1;
    }

    // scheduled ahead of today, completed and cancelled behind it
    for i in 1..=20i64 {
        let doctor_id = i % DOCTOR_COUNT + 1;
        let patient_id = i % PATIENT_COUNT + 1;
        let hour = 10 + (i % 5) as u32;
        for (status_id, offset) in [(1, i), (2, -i), (3, -i)] {
            appointments::insert(
                &mut *tx,
                &AppointmentRow {
                    date: at_hour(shift(today, offset), hour),
                    status_id,
                    doctor_id,
                    patient_id,
                    reason: Some("Reason for appointment"),
                    treatment_plan: Some("Treatment plan"),
                    diagnosis: Some("Diagnosis"),
                    recommendations: Some("Recommendations"),
                },
            )
            .await?;
            summary.appointments += 1;
        }
    }

    for (name, form, strength, substance) in DRUGS {
        sqlx::query(
            "INSERT INTO drug (name, form, strength, active_substance) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(form)
        .bind(strength)
        .bind(substance)
        .execute(&mut *tx)
        .await?;
    }

    for i in 1..=20i64 {
        let status = if i % 2 == 0 {
            PrescriptionStatus::Active
        } else {
            PrescriptionStatus::Purchased
        };
        let issued = shift(today, -(i % 30) - 1);
        sqlx::query(
            "INSERT INTO prescription
                (doctor_id, patient_id, issue_date, expiration_date, notes, status)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(i % DOCTOR_COUNT + 1)
        .bind(i % PATIENT_COUNT + 1)
        .bind(issued)
        .bind(shift(issued, 60))
        .bind(format!("Notes for prescription {i}"))
        .bind(status.as_str())
        .execute(&mut *tx)
        .await?;
        summary.prescriptions += 1;
    }

    for i in 1..=60i64 {
        sqlx::query(
            "INSERT INTO prescription_item (prescription_id, drug_id, dosage, quantity)
             VALUES (?, ?, ?, ?)",
        )
        .bind(i % 20 + 1)
        .bind(i % DRUGS.len() as i64 + 1)
        .bind(format!("Dosage for item {i}"))
        .bind(i % 10 + 1)
        .execute(&mut *tx)
        .await?;
    }

    let mut referral_patients = Vec::with_capacity(20);
    for i in 1..=20i64 {
        let patient_id = i % PATIENT_COUNT + 1;
        sqlx::query(
            "INSERT INTO referral (patient_id, doctor_id, issue_date, reason) VALUES (?, ?, ?, ?)",
        )
        .bind(patient_id)
        .bind(i % DOCTOR_COUNT + 1)
        .bind(shift(today, -(i % 30) - 1))
        .bind(format!("Reason for referral {i}"))
        .execute(&mut *tx)
        .await?;
        referral_patients.push(patient_id);
        summary.referrals += 1;
    }

    for i in 1..=60i64 {
        let referral = (i % 20) as usize;
        sqlx::query(
            "INSERT INTO test_result (referral_id, patient_id, test_name, result, date_performed)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(referral as i64 + 1)
        .bind(referral_patients[referral])
        .bind(format!("Test for referral {}", referral + 1))
        .bind(format!("Result for test {i}"))
        .bind(shift(today, -(i % 30)))
        .execute(&mut *tx)
        .await?;
    }

    for (name, address, phone, kind, website, hours) in FACILITIES {
        sqlx::query(
            "INSERT INTO medical_facility
                (name, address, phone_number, facility_type, website, operating_hours)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(kind.as_str())
        .bind(website)
        .bind(hours)
        .execute(&mut *tx)
        .await?;
    }
    for (doctor_id, facility_id) in DOCTOR_FACILITIES {
        sqlx::query("INSERT INTO doctor_facility_association (doctor_id, facility_id) VALUES (?, ?)")
            .bind(doctor_id)
            .bind(facility_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!(
        "inserted mock data: {} users, {} patients, {} doctors, {} appointments",
        summary.users,
        summary.patients,
        summary.doctors,
        summary.appointments
    );
    Ok(summary)
}

async fn insert_patient(conn: &mut SqliteConnection, i: i64) -> CoreResult<()> {
    let idx = i as usize;
    sqlx::query(
        "INSERT INTO patient
            (first_name, middle_name, last_name, pesel, gender, address, phone_number)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(FIRST_NAMES[idx % FIRST_NAMES.len()])
    .bind(MIDDLE_NAMES[idx % MIDDLE_NAMES.len()])
    .bind(LAST_NAMES[(idx / FIRST_NAMES.len()) % LAST_NAMES.len()])
    .bind(mock_pesel(i as u64))
    .bind(if i % 2 == 0 { "M" } else { "F" })
    .bind(format!("{i} Main St, City, Country"))
    .bind(format!("{}", 500_000_000 + i))
    .execute(conn)
    .await?;
    Ok(())
}

async fn insert_doctor(conn: &mut SqliteConnection, i: i64) -> CoreResult<()> {
    let idx = i as usize;
    let hire_date = NaiveDate::from_ymd_opt(2022, 1, (i % 30 + 1) as u32);
    sqlx::query(
        "INSERT INTO doctor
            (first_name, middle_name, last_name, phone_number, license_number, hire_date,
             speciality_id)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(FIRST_NAMES[(idx + 3) % FIRST_NAMES.len()])
    .bind(MIDDLE_NAMES[idx % 3])
    .bind(LAST_NAMES[(idx + 5) % LAST_NAMES.len()])
    .bind(format!("555{}", 100_000 + i))
    .bind(format!("D{}", 1000 + i))
    .bind(hire_date)
    .bind(i % SPECIALITIES.len() as i64 + 1)
    .execute(conn)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KdfParams;
    use crate::resolver::{Profile, RoleResolver};
    use crate::schedule::{AppointmentFilter, ScheduleService};

    #[test]
    fn mock_pesels_are_valid() {
        for n in [0, 1, 42, 99, 9_999_999_999] {
            let pesel = mock_pesel(n);
            assert_eq!(pesel.len(), 11);
            assert!(Pesel::new(&pesel).is_ok(), "{pesel} should be valid");
        }
    }

    #[tokio::test]
    async fn seeded_database_is_consistent() {
        let db = Database::in_memory().await.expect("open");
        db.migrate().await.expect("migrate");
        let creds = CredentialService::new(KdfParams::insecure_fast()).expect("kdf");
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).expect("date");

        let summary = insert_mock_data(&db, &creds, today).await.expect("seed");
        assert_eq!(summary.users, 13);
        assert_eq!(summary.patients, 100);
        assert_eq!(summary.doctors, 10);
        assert_eq!(summary.appointments, 60);

        let resolver = RoleResolver::new(db.clone());
        let doctor = resolver
            .resolve_email("doctor@example.com")
            .await
            .expect("doctor");
        let Profile::Doctor(record) = &doctor.profile else {
            panic!("expected a doctor profile");
        };
        assert_eq!(record.license_number, "D1001");

        let user = users::find_by_email(db.pool(), "user3@example.com")
            .await
            .expect("query")
            .expect("user");
        assert!(creds.verify(MOCK_PASSWORD, &user.hashed_password));
        assert!(resolver.resolve_email("user3@example.com").await.is_ok());

        let upcoming = ScheduleService::new(db)
            .doctor_appointments(record.id, &AppointmentFilter::default(), today)
            .await
            .expect("appointments");
        assert_eq!(upcoming.len(), 2);
    }
}
