//! Appointments.

use crate::models::AppointmentRecord;
use crate::CoreResult;
use chrono::NaiveDateTime;
use sqlx::SqliteExecutor;

/// Values for a new appointment row.
#[derive(Debug, Clone)]
pub struct AppointmentRow<'a> {
    pub date: NaiveDateTime,
    pub status_id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub reason: Option<&'a str>,
    pub treatment_plan: Option<&'a str>,
    pub diagnosis: Option<&'a str>,
    pub recommendations: Option<&'a str>,
}

/// A doctor's appointments with `from <= date < until`, optionally restricted to one status,
/// ordered by date.
pub async fn list_for_doctor<'e, E>(
    executor: E,
    doctor_id: i64,
    from: NaiveDateTime,
    until: NaiveDateTime,
    status_id: Option<i64>,
) -> CoreResult<Vec<AppointmentRecord>>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, AppointmentRecord>(
        "SELECT a.id, a.date, a.reason, a.diagnosis, a.treatment_plan, a.recommendations,
                a.status_id, s.name AS status_name,
                p.id AS patient_id, p.first_name AS patient_first_name,
                p.middle_name AS patient_middle_name, p.last_name AS patient_last_name,
                p.gender AS patient_gender
         FROM appointment a
         JOIN appointment_status s ON s.id = a.status_id
         JOIN patient p ON p.id = a.patient_id
         WHERE a.doctor_id = ?
           AND a.date >= ?
           AND a.date < ?
           AND (? IS NULL OR a.status_id = ?)
         ORDER BY a.date, a.id",
    )
    .bind(doctor_id)
    .bind(from)
    .bind(until)
    .bind(status_id)
    .bind(status_id)
    .fetch_all(executor)
    .await?)
}

pub async fn insert<'e, E>(executor: E, row: &AppointmentRow<'_>) -> CoreResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO appointment
            (date, status_id, doctor_id, patient_id, reason, treatment_plan, diagnosis,
             recommendations)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(row.date)
    .bind(row.status_id)
    .bind(row.doctor_id)
    .bind(row.patient_id)
    .bind(row.reason)
    .bind(row.treatment_plan)
    .bind(row.diagnosis)
    .bind(row.recommendations)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}
