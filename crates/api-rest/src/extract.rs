//! Session extraction and role gating.
//!
//! The session is the `access_token` cookie. Handlers name the level of access they need by the
//! extractor they take:
//! - [`Session`]: a valid, unexpired token
//! - [`CurrentUser`]: a valid token whose subject still has an account
//! - [`AdminUser`] / [`DoctorUser`]: a current user holding that role
//!
//! Role checks use the role stored in the database, never the `type` claim.

use crate::config::CookieSettings;
use crate::error::ApiError;
use crate::state::AppState;
use api_shared::Claims;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use techmed_core::models::DoctorRecord;
use techmed_core::{ResolvedUser, Role};

pub const SESSION_COOKIE: &str = "access_token";

/// Build the session cookie carrying `token`.
pub fn session_cookie(token: String, settings: &CookieSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(time::Duration::seconds(settings.max_age.num_seconds()))
        .build()
}

/// Verified claims of the caller's session token.
#[derive(Debug, Clone)]
pub struct Session(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value())
            .filter(|v| !v.is_empty())
        else {
            tracing::warn!("{} {}: no session cookie", parts.method, parts.uri.path());
            return Err(ApiError::unauthenticated());
        };

        Ok(Session(state.tokens.verify(token)?))
    }
}

/// The caller's account, resolved to its role and profile.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub ResolvedUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Session(claims) = Session::from_request_parts(parts, state).await?;
        let user = state.resolver.resolve_email(&claims.sub).await?;
        Ok(CurrentUser(user))
    }
}

impl CurrentUser {
    pub fn require(self, role: Role) -> Result<ResolvedUser, ApiError> {
        if self.0.has_role(role) {
            Ok(self.0)
        } else {
            tracing::warn!("user {} ({}) denied", self.0.id, self.0.type_name());
            Err(ApiError::Forbidden { required: role })
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminUser(pub ResolvedUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        Ok(AdminUser(user.require(Role::Admin)?))
    }
}

/// A caller holding the `Doctor` role, with their doctor profile.
#[derive(Debug, Clone)]
pub struct DoctorUser(pub DoctorRecord);

#[async_trait]
impl FromRequestParts<AppState> for DoctorUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        match user.require(Role::Doctor)?.profile {
            techmed_core::Profile::Doctor(doctor) => Ok(DoctorUser(doctor)),
            _ => Err(ApiError::Integrity("doctor role without a doctor profile".into())),
        }
    }
}
