//! User roles.

/// The role a user account holds.
///
/// Stored as the name of a `user_type` row and carried as the `type` claim of session tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Role {
    Patient,
    Doctor,
    Admin,
    Unassigned,
}

/// Returned when a stored role name is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 4] = [Role::Patient, Role::Doctor, Role::Admin, Role::Unassigned];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
            Role::Admin => "Admin",
            Role::Unassigned => "Unassigned",
        }
    }

    /// Whether accounts with this role must link to a profile row.
    pub fn requires_profile(&self) -> bool {
        matches!(self, Role::Patient | Role::Doctor)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_only() {
        for role in Role::ALL {
            assert_eq!(role.name().parse::<Role>(), Ok(role));
        }
        assert_eq!(
            "Nurse".parse::<Role>(),
            Err(UnknownRole("Nurse".to_owned()))
        );
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn only_patient_and_doctor_need_profiles() {
        assert!(Role::Patient.requires_profile());
        assert!(Role::Doctor.requires_profile());
        assert!(!Role::Admin.requires_profile());
        assert!(!Role::Unassigned.requires_profile());
    }
}
