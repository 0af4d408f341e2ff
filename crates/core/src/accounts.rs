//! Self-service account operations: registration, login and password change.

use crate::credentials::{CredentialService, PasswordPolicy};
use crate::repositories::users;
use crate::{CoreError, CoreResult, Database};
use techmed_types::{Email, Role};

/// The identity a session is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub email: String,
    /// `user_type` name, carried as the token's `type` claim.
    pub type_name: String,
}

#[derive(Clone, Debug)]
pub struct AccountService {
    db: Database,
    credentials: CredentialService,
    policy: PasswordPolicy,
}

impl AccountService {
    pub fn new(db: Database, credentials: CredentialService, policy: PasswordPolicy) -> Self {
        Self {
            db,
            credentials,
            policy,
        }
    }

    /// Create an `Unassigned` account.
    ///
    /// # Errors
    ///
    /// - `Validation` if the email is malformed or the password fails the policy,
    /// - `UserAlreadyExists` if the email is taken.
    pub async fn register(&self, email: &str, password: &str) -> CoreResult<Account> {
        let email = Email::new(email)?;
        self.policy.check(password)?;

        if users::email_exists(self.db.pool(), email.as_str()).await? {
            return Err(CoreError::UserAlreadyExists);
        }

        let digest = self.credentials.hash_blocking(password.to_owned()).await?;
        let id = users::insert(
            self.db.pool(),
            email.as_str(),
            &digest,
            Role::Unassigned,
            None,
        )
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                CoreError::UserAlreadyExists
            } else {
                e
            }
        })?;

        tracing::info!("registered user {id}");
        Ok(Account {
            id,
            email: email.into_inner(),
            type_name: Role::Unassigned.name().to_owned(),
        })
    }

    /// Check an email/password pair.
    ///
    /// Unknown emails still pay for one hash verification, and both failure cases return the
    /// same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> CoreResult<Account> {
        let Some(user) = users::find_by_email(self.db.pool(), email).await? else {
            self.credentials
                .verify_dummy_blocking(password.to_owned())
                .await?;
            tracing::warn!("login attempt for unknown account");
            return Err(CoreError::InvalidCredentials);
        };

        let valid = self
            .credentials
            .verify_blocking(password.to_owned(), user.hashed_password)
            .await?;
        if !valid {
            tracing::warn!("wrong password for user {}", user.id);
            return Err(CoreError::InvalidCredentials);
        }

        Ok(Account {
            id: user.id,
            email: user.email,
            type_name: user.type_name,
        })
    }

    /// Replace the password of the account identified by `email`.
    ///
    /// The new password is checked against the policy before the current password is verified.
    pub async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> CoreResult<()> {
        self.policy.check(new_password)?;

        let user = users::find_by_email(self.db.pool(), email)
            .await?
            .ok_or(CoreError::Unauthenticated)?;

        let valid = self
            .credentials
            .verify_blocking(current_password.to_owned(), user.hashed_password)
            .await?;
        if !valid {
            tracing::warn!("wrong current password for user {}", user.id);
            return Err(CoreError::IncorrectCurrentPassword);
        }

        let digest = self
            .credentials
            .hash_blocking(new_password.to_owned())
            .await?;
        if !users::update_password(self.db.pool(), user.id, &digest).await? {
            return Err(CoreError::Unauthenticated);
        }
        tracing::info!("password changed for user {}", user.id);
        Ok(())
    }
}
