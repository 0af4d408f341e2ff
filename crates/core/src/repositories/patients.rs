//! Patient profiles.

use crate::models::PatientRecord;
use crate::validation::NewPatient;
use crate::CoreResult;
use sqlx::SqliteExecutor;

const SELECT_PATIENT: &str = "SELECT id, first_name, middle_name, last_name, pesel, gender,
        address, phone_number
    FROM patient";

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> CoreResult<Option<PatientRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SELECT_PATIENT} WHERE id = ?");
    Ok(sqlx::query_as::<_, PatientRecord>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?)
}

/// First patient with the given PESEL. The column is not unique, so duplicates are possible.
pub async fn find_by_pesel<'e, E>(executor: E, pesel: &str) -> CoreResult<Option<PatientRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SELECT_PATIENT} WHERE pesel = ? ORDER BY id LIMIT 1");
    Ok(sqlx::query_as::<_, PatientRecord>(&sql)
        .bind(pesel)
        .fetch_optional(executor)
        .await?)
}

pub async fn list<'e, E>(executor: E) -> CoreResult<Vec<PatientRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SELECT_PATIENT} ORDER BY id");
    Ok(sqlx::query_as::<_, PatientRecord>(&sql)
        .fetch_all(executor)
        .await?)
}

pub async fn insert<'e, E>(executor: E, patient: &NewPatient) -> CoreResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO patient
            (first_name, middle_name, last_name, pesel, gender, address, phone_number)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(patient.first_name.as_str())
    .bind(patient.middle_name.as_ref().map(|m| m.as_str()))
    .bind(patient.last_name.as_str())
    .bind(patient.pesel.as_str())
    .bind(patient.gender.code())
    .bind(patient.address.as_str())
    .bind(patient.phone_number.as_str())
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}
