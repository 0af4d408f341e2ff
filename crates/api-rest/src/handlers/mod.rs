//! Request handlers, one module per route prefix.

pub mod admin;
pub mod auth;
pub mod doctor;
pub mod health;
pub mod misc;
