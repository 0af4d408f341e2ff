//! `/doctor`: the calling doctor's own data.

use crate::error::{ApiError, ApiResult};
use crate::extract::DoctorUser;
use crate::state::AppState;
use api_shared::dto::{AppointmentRes, AppointmentsQuery, ErrorRes};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

#[utoipa::path(
    get,
    path = "/doctor/appointments",
    tag = "doctor",
    params(AppointmentsQuery),
    responses(
        (status = 200, description = "Matching appointments ordered by date", body = [AppointmentRes]),
        (status = 400, description = "Unknown appointment status or malformed date", body = ErrorRes),
        (status = 401, description = "Caller is not a doctor", body = ErrorRes)
    )
)]
/// The caller's appointments within a date range
///
/// Both ends of the range are whole days: an appointment at 23:00 on `end_date` is included.
#[axum::debug_handler]
pub async fn appointments(
    State(state): State<AppState>,
    DoctorUser(doctor): DoctorUser,
    query: Result<Query<AppointmentsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<AppointmentRes>>> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let today = chrono::Local::now().date_naive();
    let found = state
        .schedule
        .doctor_appointments(doctor.id, &query.into(), today)
        .await?;
    Ok(Json(found.into_iter().map(Into::into).collect()))
}
