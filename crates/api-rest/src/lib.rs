//! # API REST
//!
//! REST API implementation for TechMed.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Cookie sessions and role gating (`extract` module)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON and form bodies, CORS, error mapping)
//!
//! Uses `api-shared` for tokens and wire types, `techmed-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use config::{CookieSettings, RestConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use api_shared::dto;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use handlers::{admin, auth, doctor, health, misc};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::change_password,
        auth::extend_session,
        auth::verify_token,
        auth::get_my_info,
        admin::list_users,
        admin::get_user,
        admin::list_patients,
        admin::get_patient,
        admin::list_doctors,
        admin::get_doctor,
        admin::add_patient,
        admin::add_doctor,
        doctor::appointments,
        misc::get_doctor_specialities,
        misc::get_appointment_statuses,
        misc::reset,
    ),
    components(schemas(
        api_shared::HealthRes,
        dto::MessageRes,
        dto::ErrorRes,
        dto::CredentialsForm,
        dto::ChangePasswordForm,
        dto::TokenInfoRes,
        dto::UserInfoRes,
        dto::UserTypeRes,
        dto::UserStrippedRes,
        dto::PatientRes,
        dto::PatientStrippedRes,
        dto::SpecialityRefRes,
        dto::DoctorRes,
        dto::DoctorStrippedRes,
        dto::DoctorDetailRes,
        dto::FacilityRes,
        dto::NewPatientReq,
        dto::NewPatientRes,
        dto::NewDoctorReq,
        dto::NewDoctorRes,
        dto::AppointmentStatusRes,
        dto::AppointmentRes,
        dto::SpecialityRes,
    )),
    tags(
        (name = "auth", description = "Registration, login and sessions"),
        (name = "admin", description = "Administrator directory and enrolment"),
        (name = "doctor", description = "The calling doctor's data"),
        (name = "misc", description = "Reference data"),
    )
)]
pub struct ApiDoc;

/// Build the REST router with CORS, request tracing and Swagger UI.
///
/// CORS admits credentialed requests from `cors_origins` only.
pub fn build_router(state: AppState, cors_origins: Vec<HeaderValue>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(cors_origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/change_password", post(auth::change_password))
        .route("/auth/extend_session", get(auth::extend_session))
        .route("/auth/verify_token", get(auth::verify_token))
        .route("/auth/get_my_info", get(auth::get_my_info))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:user_id", get(admin::get_user))
        .route("/admin/patients", get(admin::list_patients))
        .route("/admin/patients/add", post(admin::add_patient))
        .route("/admin/patients/:pesel", get(admin::get_patient))
        .route("/admin/doctors", get(admin::list_doctors))
        .route("/admin/doctors/add", post(admin::add_doctor))
        .route("/admin/doctors/:license_number", get(admin::get_doctor))
        .route("/doctor/appointments", get(doctor::appointments))
        .route("/misc/get_doctor_specialities", get(misc::get_doctor_specialities))
        .route("/misc/get_appointment_statuses", get(misc::get_appointment_statuses))
        .route("/misc/reset", post(misc::reset))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
