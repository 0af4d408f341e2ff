//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Environment variables are read by the binaries only; the helpers
//! here parse the raw values so the parsing rules can be tested without touching process state.

use crate::constants::{
    DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_ARGON2_PARALLELISM, DEFAULT_ARGON2_TIME_COST,
    DEFAULT_DATABASE_URL,
};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use techmed_types::NonEmptyText;

/// Argon2id cost parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            time_cost: DEFAULT_ARGON2_TIME_COST,
            parallelism: DEFAULT_ARGON2_PARALLELISM,
        }
    }
}

impl KdfParams {
    /// Cheapest parameters Argon2 accepts. Only for tests and local tooling.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: 8,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_url: NonEmptyText,
    kdf: KdfParams,
    weak_passwords_file: Option<PathBuf>,
    dev_mode: bool,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The KDF parameters are checked against Argon2's limits here so a bad deployment fails at
    /// startup rather than on the first login.
    pub fn new(
        database_url: impl AsRef<str>,
        kdf: KdfParams,
        weak_passwords_file: Option<PathBuf>,
        dev_mode: bool,
    ) -> CoreResult<Self> {
        let database_url = NonEmptyText::new(database_url)
            .map_err(|_| CoreError::InvalidConfig("database url cannot be empty".into()))?;

        crate::credentials::argon2_params(&kdf)?;

        if let Some(path) = &weak_passwords_file {
            if !path.is_file() {
                return Err(CoreError::InvalidConfig(format!(
                    "weak password list is not a file: {}",
                    path.display()
                )));
            }
        }

        Ok(Self {
            database_url,
            kdf,
            weak_passwords_file,
            dev_mode,
        })
    }

    pub fn database_url(&self) -> &str {
        self.database_url.as_str()
    }

    pub fn kdf(&self) -> KdfParams {
        self.kdf
    }

    pub fn weak_passwords_file(&self) -> Option<&Path> {
        self.weak_passwords_file.as_deref()
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }
}

/// Resolve the database URL, falling back to the default when unset or blank.
pub fn database_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Parse Argon2 cost parameters from optional string values.
///
/// Each missing or blank value falls back to the corresponding default.
pub fn kdf_params_from_env_values(
    memory_kib: Option<String>,
    time_cost: Option<String>,
    parallelism: Option<String>,
) -> CoreResult<KdfParams> {
    let defaults = KdfParams::default();
    Ok(KdfParams {
        memory_kib: parse_u32("argon2 memory", memory_kib)?.unwrap_or(defaults.memory_kib),
        time_cost: parse_u32("argon2 time cost", time_cost)?.unwrap_or(defaults.time_cost),
        parallelism: parse_u32("argon2 parallelism", parallelism)?
            .unwrap_or(defaults.parallelism),
    })
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off` (case-insensitive).
pub fn bool_from_env_value(name: &str, value: Option<String>, default: bool) -> CoreResult<bool> {
    let Some(value) = value.map(|v| v.trim().to_ascii_lowercase()).filter(|v| !v.is_empty())
    else {
        return Ok(default);
    };

    match value.as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(CoreError::InvalidConfig(format!(
            "{name} must be a boolean, got {other:?}"
        ))),
    }
}

fn parse_u32(name: &str, value: Option<String>) -> CoreResult<Option<u32>> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<u32>().map_err(|_| {
                CoreError::InvalidConfig(format!("{name} must be a positive integer, got {v:?}"))
            })
        })
        .transpose()
}
