//! `/admin`: directory lookups and account enrolment. Every handler requires the `Admin` role.

use crate::error::{ApiError, ApiResult};
use crate::extract::AdminUser;
use crate::state::AppState;
use api_shared::dto::{
    DoctorDetailRes, DoctorStrippedRes, ErrorRes, NewDoctorReq, NewDoctorRes, NewPatientReq,
    NewPatientRes, PatientRes, PatientStrippedRes, UserInfoRes, UserStrippedRes,
};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use techmed_core::repositories::{doctors, patients, users};
use techmed_core::{CoreError, DoctorDraft, PatientDraft};

fn path_param<T>(path: Result<Path<T>, PathRejection>) -> ApiResult<T> {
    path.map(|Path(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    responses(
        (status = 200, description = "All accounts", body = [UserStrippedRes]),
        (status = 401, description = "Caller is not an administrator", body = ErrorRes)
    )
)]
/// List every account, without password digests
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<UserStrippedRes>>> {
    let users = users::list(state.db.pool()).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/admin/users/{user_id}",
    tag = "admin",
    params(("user_id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "The account and its profile", body = UserInfoRes),
        (status = 401, description = "Caller is not an administrator", body = ErrorRes),
        (status = 404, description = "User not found", body = ErrorRes)
    )
)]
/// Look up an account by id, resolved to its role and profile
#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    user_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<UserInfoRes>> {
    let user_id = path_param(user_id)?;
    let user = state.resolver.resolve_user_id(user_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/admin/patients",
    tag = "admin",
    responses(
        (status = 200, description = "All patients", body = [PatientStrippedRes]),
        (status = 401, description = "Caller is not an administrator", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<PatientStrippedRes>>> {
    let patients = patients::list(state.db.pool()).await?;
    Ok(Json(patients.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/admin/patients/{pesel}",
    tag = "admin",
    params(("pesel" = String, Path, description = "Patient's PESEL")),
    responses(
        (status = 200, description = "The patient", body = PatientRes),
        (status = 401, description = "Caller is not an administrator", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Look up a patient by PESEL
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    _admin: AdminUser,
    pesel: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<PatientRes>> {
    let pesel = path_param(pesel)?;
    let patient = patients::find_by_pesel(state.db.pool(), &pesel)
        .await?
        .ok_or(CoreError::NotFound("Patient"))?;
    Ok(Json(patient.into()))
}

#[utoipa::path(
    get,
    path = "/admin/doctors",
    tag = "admin",
    responses(
        (status = 200, description = "All doctors", body = [DoctorStrippedRes]),
        (status = 401, description = "Caller is not an administrator", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<DoctorStrippedRes>>> {
    let doctors = doctors::list(state.db.pool()).await?;
    Ok(Json(doctors.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/admin/doctors/{license_number}",
    tag = "admin",
    params(("license_number" = String, Path, description = "Doctor's licence number")),
    responses(
        (status = 200, description = "The doctor and the facilities they work at", body = DoctorDetailRes),
        (status = 401, description = "Caller is not an administrator", body = ErrorRes),
        (status = 404, description = "Doctor not found", body = ErrorRes)
    )
)]
/// Look up a doctor by licence number
#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    _admin: AdminUser,
    license_number: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<DoctorDetailRes>> {
    let license_number = path_param(license_number)?;
    let doctor = doctors::find_by_license(state.db.pool(), &license_number)
        .await?
        .ok_or(CoreError::NotFound("Doctor"))?;
    let facilities = doctors::facilities(state.db.pool(), doctor.id).await?;
    Ok(Json(DoctorDetailRes {
        doctor: doctor.into(),
        facilities: facilities.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/admin/patients/add",
    tag = "admin",
    request_body = NewPatientReq,
    responses(
        (status = 201, description = "Patient and account created", body = NewPatientRes),
        (status = 400, description = "Invalid field or existing account", body = ErrorRes),
        (status = 401, description = "Caller is not an administrator", body = ErrorRes)
    )
)]
/// Create a patient with a linked `Patient` account
///
/// # Returns
/// The generated temporary password. It is not stored and cannot be retrieved again.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - a field fails validation (the detail names the first failing rule),
/// - an account with the email already exists.
#[axum::debug_handler]
pub async fn add_patient(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    body: Result<Json<NewPatientReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<NewPatientRes>)> {
    let draft = PatientDraft::from(json_body(body)?);
    let enrolled = state.enrolment.create_patient(&draft).await?;
    tracing::info!("admin {} created patient {}", admin.id, enrolled.profile_id);
    Ok((
        StatusCode::CREATED,
        Json(NewPatientRes {
            message: "Patient created".into(),
            patient_temp_password: enrolled.temporary_password,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/admin/doctors/add",
    tag = "admin",
    request_body = NewDoctorReq,
    responses(
        (status = 201, description = "Doctor and account created", body = NewDoctorRes),
        (status = 400, description = "Invalid field, existing account or unknown speciality", body = ErrorRes),
        (status = 401, description = "Caller is not an administrator", body = ErrorRes)
    )
)]
/// Create a doctor with a linked `Doctor` account
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - a field fails validation,
/// - the email or licence number is already registered,
/// - the speciality does not exist.
#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    body: Result<Json<NewDoctorReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<NewDoctorRes>)> {
    let draft = DoctorDraft::from(json_body(body)?);
    let enrolled = state.enrolment.create_doctor(&draft).await?;
    tracing::info!("admin {} created doctor {}", admin.id, enrolled.profile_id);
    Ok((
        StatusCode::CREATED,
        Json(NewDoctorRes {
            message: "Doctor created".into(),
            doctor_temp_password: enrolled.temporary_password,
        }),
    ))
}
