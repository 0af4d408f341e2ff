//! Resolution of a user account to its role and role-specific profile.

use crate::models::{DoctorRecord, PatientRecord, UserRecord};
use crate::repositories::{doctors, patients, users};
use crate::{CoreError, CoreResult, Database};
use techmed_types::Role;

/// The profile attached to a user, by role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    Patient(PatientRecord),
    Doctor(DoctorRecord),
    Admin,
    Unassigned,
    /// A `user_type` name this build does not know about.
    Other(String),
}

/// A user together with the profile its role links to.
#[derive(Debug, Clone)]
pub struct ResolvedUser {
    pub id: i64,
    pub email: String,
    pub mfa_type: Option<String>,
    pub profile: Profile,
}

impl ResolvedUser {
    pub fn role(&self) -> Option<Role> {
        match self.profile {
            Profile::Patient(_) => Some(Role::Patient),
            Profile::Doctor(_) => Some(Role::Doctor),
            Profile::Admin => Some(Role::Admin),
            Profile::Unassigned => Some(Role::Unassigned),
            Profile::Other(_) => None,
        }
    }

    /// Role name as reported to callers. Unknown roles report as `Other`.
    pub fn type_name(&self) -> &'static str {
        self.role().map(|r| r.name()).unwrap_or("Other")
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    pub fn doctor(&self) -> Option<&DoctorRecord> {
        match &self.profile {
            Profile::Doctor(doctor) => Some(doctor),
            _ => None,
        }
    }

    pub fn patient(&self) -> Option<&PatientRecord> {
        match &self.profile {
            Profile::Patient(patient) => Some(patient),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RoleResolver {
    db: Database,
}

impl RoleResolver {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Resolve the subject of a session. A subject with no account is unauthenticated.
    pub async fn resolve_email(&self, email: &str) -> CoreResult<ResolvedUser> {
        let Some(user) = users::find_by_email(self.db.pool(), email).await? else {
            tracing::warn!("session subject has no account");
            return Err(CoreError::Unauthenticated);
        };
        self.resolve(user).await
    }

    /// Resolve a user by id, for administrative lookups.
    pub async fn resolve_user_id(&self, id: i64) -> CoreResult<ResolvedUser> {
        let user = users::find_by_id(self.db.pool(), id)
            .await?
            .ok_or(CoreError::NotFound("User"))?;
        self.resolve(user).await
    }

    async fn resolve(&self, user: UserRecord) -> CoreResult<ResolvedUser> {
        let profile = match user.type_name.parse::<Role>() {
            Ok(Role::Patient) => {
                let link = profile_link(&user)?;
                let patient = patients::find_by_id(self.db.pool(), link)
                    .await?
                    .ok_or_else(|| missing_profile(&user, link))?;
                Profile::Patient(patient)
            }
            Ok(Role::Doctor) => {
                let link = profile_link(&user)?;
                let doctor = doctors::find_by_id(self.db.pool(), link)
                    .await?
                    .ok_or_else(|| missing_profile(&user, link))?;
                Profile::Doctor(doctor)
            }
            Ok(Role::Admin) => Profile::Admin,
            Ok(Role::Unassigned) => Profile::Unassigned,
            Err(unknown) => Profile::Other(unknown.0),
        };

        Ok(ResolvedUser {
            id: user.id,
            email: user.email,
            mfa_type: user.mfa_type,
            profile,
        })
    }
}

fn profile_link(user: &UserRecord) -> CoreResult<i64> {
    user.link_id.ok_or_else(|| {
        tracing::error!("{} user {} has no profile link", user.type_name, user.id);
        CoreError::IntegrityViolation(format!("user {} has no profile link", user.id))
    })
}

fn missing_profile(user: &UserRecord, link: i64) -> CoreError {
    tracing::error!(
        "{} user {} links to missing profile {link}",
        user.type_name,
        user.id
    );
    CoreError::IntegrityViolation(format!("user {} links to missing profile {link}", user.id))
}
