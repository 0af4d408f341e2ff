//! `/auth`: registration, login and session management.

use crate::error::{ApiError, ApiResult};
use crate::extract::{session_cookie, CurrentUser, Session};
use crate::state::AppState;
use api_shared::dto::{
    ChangePasswordForm, CredentialsForm, ErrorRes, MessageRes, TokenInfoRes, UserInfoRes,
};
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Form, Json};
use axum_extra::extract::cookie::CookieJar;

fn form_body<T>(form: Result<Form<T>, FormRejection>) -> ApiResult<T> {
    form.map(|Form(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Issue a token for `email` and set it as the session cookie.
fn start_session(
    state: &AppState,
    jar: CookieJar,
    email: &str,
    role: &str,
) -> ApiResult<CookieJar> {
    let (token, _) = state
        .tokens
        .issue(email, role)
        .map_err(|e| ApiError::Internal(format!("token issue failed: {e}")))?;
    Ok(jar.add(session_cookie(token, &state.cookie)))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Account created, session cookie set", body = MessageRes),
        (status = 400, description = "Invalid email, weak password or existing account", body = ErrorRes)
    )
)]
/// Register a new account
///
/// The account starts with the `Unassigned` role until an administrator links it to a profile.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the email or password fails validation,
/// - an account with the email already exists.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> ApiResult<(StatusCode, CookieJar, Json<MessageRes>)> {
    let form = form_body(form)?;
    let account = state.accounts.register(&form.email, &form.password).await?;
    let jar = start_session(&state, jar, &account.email, &account.type_name)?;
    Ok((
        StatusCode::CREATED,
        jar,
        Json(MessageRes::new("Register successful")),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Session cookie set", body = MessageRes),
        (status = 401, description = "Invalid username or password", body = ErrorRes)
    )
)]
/// Log in with email and password
///
/// # Errors
/// Returns `401 Unauthorized` for an unknown email or a wrong password. Both cases take the
/// same time and return the same detail.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> ApiResult<(CookieJar, Json<MessageRes>)> {
    let form = form_body(form)?;
    let account = state
        .accounts
        .authenticate(&form.email, &form.password)
        .await?;
    let jar = start_session(&state, jar, &account.email, &account.type_name)?;
    tracing::info!("user {} logged in", account.id);
    Ok((jar, Json(MessageRes::new("Login successful"))))
}

#[utoipa::path(
    post,
    path = "/auth/change_password",
    tag = "auth",
    request_body(content = ChangePasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Password changed", body = MessageRes),
        (status = 400, description = "New password rejected by the policy", body = ErrorRes),
        (status = 401, description = "No session, or wrong current password", body = ErrorRes)
    )
)]
/// Change the caller's password
///
/// # Errors
/// - `400 Bad Request` if the new password is too short or too weak,
/// - `401 Unauthorized` if there is no valid session or the current password is wrong.
#[axum::debug_handler]
pub async fn change_password(
    State(state): State<AppState>,
    Session(claims): Session,
    form: Result<Form<ChangePasswordForm>, FormRejection>,
) -> ApiResult<Json<MessageRes>> {
    let form = form_body(form)?;
    state
        .accounts
        .change_password(&claims.sub, &form.current_password, &form.new_password)
        .await?;
    Ok(Json(MessageRes::new("Password change successful")))
}

#[utoipa::path(
    get,
    path = "/auth/extend_session",
    tag = "auth",
    responses(
        (status = 200, description = "Fresh session cookie set", body = MessageRes),
        (status = 401, description = "No valid session", body = ErrorRes)
    )
)]
/// Replace the session token with one expiring a full lifetime from now
#[axum::debug_handler]
pub async fn extend_session(
    State(state): State<AppState>,
    Session(claims): Session,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<MessageRes>)> {
    let jar = start_session(&state, jar, &claims.sub, &claims.role)?;
    Ok((jar, Json(MessageRes::new("Session extend successful"))))
}

#[utoipa::path(
    get,
    path = "/auth/verify_token",
    tag = "auth",
    responses(
        (status = 200, description = "Claims of the session token", body = TokenInfoRes),
        (status = 401, description = "No valid session", body = ErrorRes)
    )
)]
#[axum::debug_handler(state = AppState)]
pub async fn verify_token(Session(claims): Session) -> Json<TokenInfoRes> {
    Json(TokenInfoRes {
        email: claims.sub,
        user_type: claims.role,
    })
}

#[utoipa::path(
    get,
    path = "/auth/get_my_info",
    tag = "auth",
    responses(
        (status = 200, description = "The caller and their profile", body = UserInfoRes),
        (status = 401, description = "No valid session", body = ErrorRes),
        (status = 500, description = "Account linked to a missing profile", body = ErrorRes)
    )
)]
/// The caller's account, with their patient or doctor profile when they have one
#[axum::debug_handler(state = AppState)]
pub async fn get_my_info(CurrentUser(user): CurrentUser) -> Json<UserInfoRes> {
    Json(user.into())
}
