//! `/misc`: reference data for authenticated clients, and the development reset.

use crate::error::{ApiError, ApiResult};
use crate::extract::CurrentUser;
use crate::state::AppState;
use api_shared::dto::{AppointmentStatusRes, ErrorRes, MessageRes, SpecialityRes};
use axum::extract::State;
use axum::Json;
use techmed_core::repositories::catalog;
use techmed_core::seed;

#[utoipa::path(
    get,
    path = "/misc/get_doctor_specialities",
    tag = "misc",
    responses(
        (status = 200, description = "All doctor specialities", body = [SpecialityRes]),
        (status = 401, description = "No valid session", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_doctor_specialities(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<SpecialityRes>>> {
    let specialities = catalog::specialities(state.db.pool()).await?;
    Ok(Json(specialities.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/misc/get_appointment_statuses",
    tag = "misc",
    responses(
        (status = 200, description = "All appointment statuses", body = [AppointmentStatusRes]),
        (status = 401, description = "No valid session", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_appointment_statuses(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<AppointmentStatusRes>>> {
    let statuses = catalog::appointment_statuses(state.db.pool()).await?;
    Ok(Json(statuses.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/misc/reset",
    tag = "misc",
    responses(
        (status = 200, description = "Schema recreated and mock data inserted", body = MessageRes),
        (status = 404, description = "Development mode is off", body = ErrorRes)
    )
)]
/// Drop every table, recreate the schema and insert mock data
///
/// Answers 404 unless development mode is on.
#[axum::debug_handler]
pub async fn reset(State(state): State<AppState>) -> ApiResult<Json<MessageRes>> {
    if !state.dev_mode {
        return Err(ApiError::NotFound("Not Found".into()));
    }

    state.db.reset().await?;
    let summary =
        seed::insert_mock_data(&state.db, &state.credentials, chrono::Local::now().date_naive())
            .await?;
    tracing::info!("database reset: {summary:?}");
    Ok(Json(MessageRes::new("Database reset")))
}
