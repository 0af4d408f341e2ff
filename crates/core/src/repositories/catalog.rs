//! Lookup tables: doctor specialities and appointment statuses.

use crate::models::{AppointmentStatusRecord, SpecialityRecord};
use crate::CoreResult;
use sqlx::SqliteExecutor;

pub async fn specialities<'e, E>(executor: E) -> CoreResult<Vec<SpecialityRecord>>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, SpecialityRecord>(
        "SELECT id, name, description, code FROM doctor_speciality ORDER BY id",
    )
    .fetch_all(executor)
    .await?)
}

pub async fn speciality_exists<'e, E>(executor: E, id: i64) -> CoreResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM doctor_speciality WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

pub async fn insert_speciality<'e, E>(
    executor: E,
    name: &str,
    description: &str,
    code: &str,
) -> CoreResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let result =
        sqlx::query("INSERT INTO doctor_speciality (name, description, code) VALUES (?, ?, ?)")
            .bind(name)
            .bind(description)
            .bind(code)
            .execute(executor)
            .await?;
    Ok(result.last_insert_rowid())
}

pub async fn appointment_statuses<'e, E>(executor: E) -> CoreResult<Vec<AppointmentStatusRecord>>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, AppointmentStatusRecord>(
        "SELECT id, name FROM appointment_status ORDER BY id",
    )
    .fetch_all(executor)
    .await?)
}

pub async fn appointment_status_by_name<'e, E>(
    executor: E,
    name: &str,
) -> CoreResult<Option<AppointmentStatusRecord>>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, AppointmentStatusRecord>(
        "SELECT id, name FROM appointment_status WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(executor)
    .await?)
}
