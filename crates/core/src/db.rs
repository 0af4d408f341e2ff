//! SQLite connection pool and schema management.

use crate::constants::APPOINTMENT_STATUSES;
use crate::CoreResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use techmed_types::Role;

const MAX_CONNECTIONS: u32 = 8;

/// Table definitions in dependency order. `reset` drops them in reverse.
const SCHEMA: &[(&str, &str)] = &[
    (
        "user_type",
        "CREATE TABLE IF NOT EXISTS user_type (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
    ),
    (
        "appointment_status",
        "CREATE TABLE IF NOT EXISTS appointment_status (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
    ),
    (
        "doctor_speciality",
        "CREATE TABLE IF NOT EXISTS doctor_speciality (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            code TEXT NOT NULL
        )",
    ),
    (
        "patient",
        "CREATE TABLE IF NOT EXISTS patient (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            middle_name TEXT,
            last_name TEXT NOT NULL,
            pesel TEXT NOT NULL,
            gender TEXT NOT NULL,
            address TEXT NOT NULL,
            phone_number TEXT NOT NULL
        )",
    ),
    (
        "doctor",
        "CREATE TABLE IF NOT EXISTS doctor (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            middle_name TEXT,
            last_name TEXT NOT NULL,
            pesel TEXT,
            gender TEXT,
            phone_number TEXT NOT NULL,
            license_number TEXT NOT NULL UNIQUE,
            hire_date DATE NOT NULL,
            speciality_id INTEGER NOT NULL REFERENCES doctor_speciality(id)
        )",
    ),
    (
        "user",
        "CREATE TABLE IF NOT EXISTS \"user\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            hashed_password TEXT NOT NULL,
            mfa_type TEXT,
            type_id INTEGER NOT NULL REFERENCES user_type(id),
            link_id INTEGER
        )",
    ),
    (
        "medical_facility",
        "CREATE TABLE IF NOT EXISTS medical_facility (
            facility_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            facility_type TEXT NOT NULL
                CHECK (facility_type IN ('Hospital', 'Clinic', 'Laboratory', 'Pharmacy')),
            website TEXT,
            operating_hours TEXT
        )",
    ),
    (
        "doctor_facility_association",
        "CREATE TABLE IF NOT EXISTS doctor_facility_association (
            doctor_id INTEGER NOT NULL REFERENCES doctor(id),
            facility_id INTEGER NOT NULL REFERENCES medical_facility(facility_id),
            PRIMARY KEY (doctor_id, facility_id)
        )",
    ),
    (
        "appointment",
        "CREATE TABLE IF NOT EXISTS appointment (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date DATETIME NOT NULL,
            status_id INTEGER NOT NULL DEFAULT 1 REFERENCES appointment_status(id),
            doctor_id INTEGER NOT NULL REFERENCES doctor(id),
            patient_id INTEGER NOT NULL REFERENCES patient(id),
            reason TEXT,
            treatment_plan TEXT,
            diagnosis TEXT,
            recommendations TEXT
        )",
    ),
    (
        "drug",
        "CREATE TABLE IF NOT EXISTS drug (
            drug_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            form TEXT NOT NULL,
            strength TEXT NOT NULL,
            active_substance TEXT
        )",
    ),
    (
        "prescription",
        "CREATE TABLE IF NOT EXISTS prescription (
            prescription_id INTEGER PRIMARY KEY AUTOINCREMENT,
            doctor_id INTEGER NOT NULL REFERENCES doctor(id),
            patient_id INTEGER NOT NULL REFERENCES patient(id),
            issue_date DATE NOT NULL,
            expiration_date DATE NOT NULL,
            notes TEXT,
            status TEXT NOT NULL CHECK (status IN ('Active', 'Purchased', 'Canceled'))
        )",
    ),
    (
        "prescription_item",
        "CREATE TABLE IF NOT EXISTS prescription_item (
            item_id INTEGER PRIMARY KEY AUTOINCREMENT,
            prescription_id INTEGER NOT NULL REFERENCES prescription(prescription_id),
            drug_id INTEGER NOT NULL REFERENCES drug(drug_id),
            dosage TEXT NOT NULL,
            quantity INTEGER NOT NULL
        )",
    ),
    (
        "referral",
        "CREATE TABLE IF NOT EXISTS referral (
            referral_id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id INTEGER NOT NULL REFERENCES patient(id),
            doctor_id INTEGER NOT NULL REFERENCES doctor(id),
            issue_date DATE NOT NULL,
            reason TEXT NOT NULL
        )",
    ),
    (
        "test_result",
        "CREATE TABLE IF NOT EXISTS test_result (
            test_result_id INTEGER PRIMARY KEY AUTOINCREMENT,
            referral_id INTEGER NOT NULL REFERENCES referral(referral_id),
            patient_id INTEGER NOT NULL REFERENCES patient(id),
            test_name TEXT NOT NULL,
            result TEXT NOT NULL,
            date_performed DATE NOT NULL
        )",
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_patient_pesel ON patient(pesel)",
    "CREATE INDEX IF NOT EXISTS idx_appointment_doctor_date ON appointment(doctor_id, date)",
];

/// Handle to the relational store.
///
/// Cheap to clone; all clones share one pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `url` with foreign keys enforced.
    pub async fn connect(url: &str) -> CoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        tracing::info!("connected to database at {url}");
        Ok(Self { pool })
    }

    /// A private in-memory database.
    ///
    /// The pool holds exactly one connection that is never recycled, since every new SQLite
    /// memory connection is a fresh empty database.
    pub async fn in_memory() -> CoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all tables and seed the fixed lookup rows. Safe to run repeatedly.
    pub async fn migrate(&self) -> CoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for (_, statement) in SCHEMA {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        for statement in INDEXES {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        for role in Role::ALL {
            sqlx::query("INSERT OR IGNORE INTO user_type (id, name) VALUES (?, ?)")
                .bind(crate::constants::role_type_id(role))
                .bind(role.name())
                .execute(&mut *tx)
                .await?;
        }
        for (id, name) in (1i64..).zip(APPOINTMENT_STATUSES) {
            sqlx::query("INSERT OR IGNORE INTO appointment_status (id, name) VALUES (?, ?)")
                .bind(id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!("schema migrated");
        Ok(())
    }

    /// Drop every table and recreate the schema. All data is lost.
    pub async fn reset(&self) -> CoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for (table, _) in SCHEMA.iter().rev() {
            let statement = format!("DROP TABLE IF EXISTS \"{table}\"");
            sqlx::query(&statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        tracing::warn!("all tables dropped");
        self.migrate().await
    }

    /// True when no user accounts exist yet.
    pub async fn is_empty(&self) -> CoreResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM \"user\"")
            .fetch_one(&self.pool)
            .await?;
        Ok(count == 0)
    }
}
