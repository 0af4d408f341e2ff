//! Constants used throughout the TechMed core crate.
//!
//! Seeded lookup identifiers and defaults live here so the schema, repositories and seed data
//! agree on them.

use techmed_types::Role;

/// Default database location when `DATABASE_URL` is not configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://techmed.db";

/// Argon2id memory cost in KiB (128 MiB).
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 128 * 1024;

/// Argon2id iteration count.
pub const DEFAULT_ARGON2_TIME_COST: u32 = 25;

/// Argon2id lanes.
pub const DEFAULT_ARGON2_PARALLELISM: u32 = 4;

/// Length of the derived password hash in bytes.
pub const ARGON2_OUTPUT_LEN: usize = 64;

/// Length of the random salt in bytes.
pub const ARGON2_SALT_LEN: usize = 16;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 12;

/// Length of generated temporary passwords for admin-created accounts.
pub const TEMP_PASSWORD_LEN: usize = 16;

/// Shortest temporary password the generator will produce.
pub const MIN_TEMP_PASSWORD_LEN: usize = 6;

/// Default look-ahead window for a doctor's appointment list.
pub const DEFAULT_APPOINTMENT_WINDOW_DAYS: i64 = 90;

/// Status name that disables the appointment status filter.
pub const ANY_APPOINTMENT_STATUS: &str = "Any";

/// Status applied when no appointment status filter is given.
pub const DEFAULT_APPOINTMENT_STATUS: &str = "Scheduled";

/// Appointment statuses seeded into `appointment_status`, in id order starting at 1.
pub const APPOINTMENT_STATUSES: [&str; 3] = ["Scheduled", "Completed", "Cancelled"];

/// `user_type.id` for each role. The rows are seeded by the schema migration.
pub fn role_type_id(role: Role) -> i64 {
    match role {
        Role::Patient => 1,
        Role::Doctor => 2,
        Role::Admin => 3,
        Role::Unassigned => 4,
    }
}
