//! # API Shared
//!
//! Definitions shared by the TechMed API surfaces.
//!
//! Contains:
//! - Session token issuing and verification (`token` module)
//! - Request and response bodies with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest`.

pub mod dto;
pub mod health;
pub mod token;

pub use health::{HealthRes, HealthService};
pub use token::{Claims, TokenError, TokenService};
