//! Shared state handed to every handler.

use crate::config::{CookieSettings, RestConfig};
use api_shared::TokenService;
use techmed_core::{
    AccountService, CoreError, CoreResult, CredentialService, Database, EnrolmentService,
    PasswordPolicy, RoleResolver, ScheduleService,
};

/// Application state for the REST API server
///
/// Every service shares the one connection pool held by `db`.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
    pub credentials: CredentialService,
    pub accounts: AccountService,
    pub enrolment: EnrolmentService,
    pub resolver: RoleResolver,
    pub schedule: ScheduleService,
    pub tokens: TokenService,
    pub cookie: CookieSettings,
    /// Enables `/misc/reset`.
    pub dev_mode: bool,
}

impl AppState {
    pub fn new(
        db: Database,
        credentials: CredentialService,
        policy: PasswordPolicy,
        tokens: TokenService,
        cookie: CookieSettings,
        dev_mode: bool,
    ) -> Self {
        Self {
            accounts: AccountService::new(db.clone(), credentials.clone(), policy),
            enrolment: EnrolmentService::new(db.clone(), credentials.clone()),
            resolver: RoleResolver::new(db.clone()),
            schedule: ScheduleService::new(db.clone()),
            db,
            credentials,
            tokens,
            cookie,
            dev_mode,
        }
    }

    /// Build the state from resolved configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the KDF parameters or signing secret are unusable, `Io` if the
    /// weak-password file cannot be read.
    pub fn from_config(db: Database, cfg: &RestConfig) -> CoreResult<Self> {
        let credentials = CredentialService::new(cfg.core.kdf())?;
        let policy = PasswordPolicy::load(cfg.core.weak_passwords_file())?;
        let tokens = TokenService::new(cfg.jwt_secret(), cfg.token_ttl)
            .map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        Ok(Self::new(
            db,
            credentials,
            policy,
            tokens,
            cfg.cookie,
            cfg.core.dev_mode(),
        ))
    }
}
