//! Data access for each table group.
//!
//! Every function takes any SQLite executor, so the same call works against the pool or inside
//! a transaction (`&mut *tx`).

pub mod appointments;
pub mod catalog;
pub mod doctors;
pub mod patients;
pub mod users;
