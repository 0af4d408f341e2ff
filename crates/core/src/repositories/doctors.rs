//! Doctor profiles and their facility associations.

use crate::models::{DoctorRecord, FacilityRecord};
use crate::validation::NewDoctor;
use crate::CoreResult;
use sqlx::SqliteExecutor;

const SELECT_DOCTOR: &str = "SELECT d.id, d.first_name, d.middle_name, d.last_name, d.pesel,
        d.gender, d.phone_number, d.license_number, d.hire_date, d.speciality_id,
        s.name AS speciality_name
    FROM doctor d
    JOIN doctor_speciality s ON s.id = d.speciality_id";

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> CoreResult<Option<DoctorRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SELECT_DOCTOR} WHERE d.id = ?");
    Ok(sqlx::query_as::<_, DoctorRecord>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?)
}

pub async fn find_by_license<'e, E>(
    executor: E,
    license_number: &str,
) -> CoreResult<Option<DoctorRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SELECT_DOCTOR} WHERE d.license_number = ?");
    Ok(sqlx::query_as::<_, DoctorRecord>(&sql)
        .bind(license_number)
        .fetch_optional(executor)
        .await?)
}

pub async fn list<'e, E>(executor: E) -> CoreResult<Vec<DoctorRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SELECT_DOCTOR} ORDER BY d.id");
    Ok(sqlx::query_as::<_, DoctorRecord>(&sql)
        .fetch_all(executor)
        .await?)
}

pub async fn license_exists<'e, E>(executor: E, license_number: &str) -> CoreResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM doctor WHERE license_number = ?")
        .bind(license_number)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

pub async fn insert<'e, E>(executor: E, doctor: &NewDoctor) -> CoreResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO doctor
            (first_name, middle_name, last_name, pesel, gender, phone_number, license_number,
             hire_date, speciality_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(doctor.first_name.as_str())
    .bind(doctor.middle_name.as_ref().map(|m| m.as_str()))
    .bind(doctor.last_name.as_str())
    .bind(doctor.pesel.as_str())
    .bind(doctor.gender.code())
    .bind(doctor.phone_number.as_str())
    .bind(doctor.license_number.as_str())
    .bind(doctor.hire_date)
    .bind(doctor.speciality_id)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Facilities the doctor works at, by facility id.
pub async fn facilities<'e, E>(executor: E, doctor_id: i64) -> CoreResult<Vec<FacilityRecord>>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, FacilityRecord>(
        "SELECT f.facility_id, f.name, f.address, f.phone_number, f.facility_type, f.website,
                f.operating_hours
         FROM medical_facility f
         JOIN doctor_facility_association a ON a.facility_id = f.facility_id
         WHERE a.doctor_id = ?
         ORDER BY f.facility_id",
    )
    .bind(doctor_id)
    .fetch_all(executor)
    .await?)
}
