//! REST server configuration.
//!
//! Every value is read once at startup. The lookup is injectable so tests can resolve a
//! configuration without touching the process environment.

use axum::http::HeaderValue;
use chrono::Duration;
use std::path::PathBuf;
use techmed_core::config::{
    bool_from_env_value, database_url_from_env_value, kdf_params_from_env_values,
};
use techmed_core::{CoreConfig, CoreError, CoreResult};

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 120;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";

/// Attributes of the `access_token` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    pub secure: bool,
    pub max_age: Duration,
}

/// Configuration of the REST server, including the core configuration it wraps.
#[derive(Clone)]
pub struct RestConfig {
    pub addr: String,
    pub core: CoreConfig,
    pub token_ttl: Duration,
    pub cookie: CookieSettings,
    pub cors_origins: Vec<HeaderValue>,
    jwt_secret: String,
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("addr", &self.addr)
            .field("core", &self.core)
            .field("token_ttl", &self.token_ttl)
            .field("cookie", &self.cookie)
            .field("cors_origins", &self.cors_origins)
            .finish_non_exhaustive()
    }
}

impl RestConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration from `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the signing secret is missing, a number or flag does not parse, a CORS
    /// origin is not a valid header value, or the core configuration is rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let addr = get("TECHMED_REST_ADDR").unwrap_or_else(|| DEFAULT_REST_ADDR.into());

        let jwt_secret = get("TECHMED_JWT_SECRET")
            .ok_or_else(|| CoreError::InvalidConfig("TECHMED_JWT_SECRET must be set".into()))?;

        let ttl_minutes =
            parse_positive("TECHMED_TOKEN_TTL_MINUTES", get("TECHMED_TOKEN_TTL_MINUTES"))?
                .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        let token_ttl = Duration::try_minutes(ttl_minutes).ok_or_else(|| {
            CoreError::InvalidConfig("TECHMED_TOKEN_TTL_MINUTES is out of range".into())
        })?;

        let max_age = match parse_positive(
            "TECHMED_COOKIE_MAX_AGE_SECS",
            get("TECHMED_COOKIE_MAX_AGE_SECS"),
        )? {
            Some(secs) => Duration::try_seconds(secs).ok_or_else(|| {
                CoreError::InvalidConfig("TECHMED_COOKIE_MAX_AGE_SECS is out of range".into())
            })?,
            None => token_ttl,
        };
        let secure = bool_from_env_value(
            "TECHMED_COOKIE_SECURE",
            get("TECHMED_COOKIE_SECURE"),
            false,
        )?;

        let cors_origins = parse_origins(
            &get("TECHMED_CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into()),
        )?;

        let kdf = kdf_params_from_env_values(
            get("TECHMED_ARGON2_MEMORY_KIB"),
            get("TECHMED_ARGON2_TIME_COST"),
            get("TECHMED_ARGON2_PARALLELISM"),
        )?;
        let dev_mode = bool_from_env_value("TECHMED_DEV_MODE", get("TECHMED_DEV_MODE"), false)?;
        let core = CoreConfig::new(
            database_url_from_env_value(get("DATABASE_URL")),
            kdf,
            get("TECHMED_WEAK_PASSWORDS_FILE").map(PathBuf::from),
            dev_mode,
        )?;

        Ok(Self {
            addr,
            core,
            token_ttl,
            cookie: CookieSettings { secure, max_age },
            cors_origins,
            jwt_secret,
        })
    }

    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

fn parse_positive(name: &str, value: Option<String>) -> CoreResult<Option<i64>> {
    value
        .map(|v| match v.trim().parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(CoreError::InvalidConfig(format!(
                "{name} must be a positive integer, got {v:?}"
            ))),
        })
        .transpose()
}

fn parse_origins(value: &str) -> CoreResult<Vec<HeaderValue>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| CoreError::InvalidConfig(format!("invalid CORS origin {origin:?}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_with_only_a_secret() {
        let cfg = RestConfig::from_lookup(lookup(&[("TECHMED_JWT_SECRET", "s3cret")]))
            .expect("config");
        assert_eq!(cfg.addr, DEFAULT_REST_ADDR);
        assert_eq!(cfg.token_ttl, Duration::minutes(120));
        assert_eq!(cfg.cookie.max_age, cfg.token_ttl);
        assert!(!cfg.cookie.secure);
        assert_eq!(cfg.cors_origins, vec![HeaderValue::from_static("http://localhost:3000")]);
        assert_eq!(cfg.core.database_url(), "sqlite://techmed.db");
        assert!(!cfg.core.dev_mode());
        assert_eq!(cfg.jwt_secret(), b"s3cret");
    }

    #[test]
    fn secret_is_required() {
        assert!(matches!(
            RestConfig::from_lookup(lookup(&[])),
            Err(CoreError::InvalidConfig(_))
        ));
        assert!(matches!(
            RestConfig::from_lookup(lookup(&[("TECHMED_JWT_SECRET", "   ")])),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = RestConfig::from_lookup(lookup(&[
            ("TECHMED_JWT_SECRET", "s3cret"),
            ("TECHMED_REST_ADDR", "127.0.0.1:9000"),
            ("TECHMED_TOKEN_TTL_MINUTES", "30"),
            ("TECHMED_COOKIE_MAX_AGE_SECS", "10800"),
            ("TECHMED_COOKIE_SECURE", "yes"),
            ("TECHMED_CORS_ORIGINS", "http://a.test, http://b.test"),
            ("TECHMED_DEV_MODE", "1"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]))
        .expect("config");
        assert_eq!(cfg.addr, "127.0.0.1:9000");
        assert_eq!(cfg.token_ttl, Duration::minutes(30));
        assert_eq!(cfg.cookie.max_age, Duration::hours(3));
        assert!(cfg.cookie.secure);
        assert_eq!(cfg.cors_origins.len(), 2);
        assert!(cfg.core.dev_mode());
        assert_eq!(cfg.core.database_url(), "sqlite::memory:");
    }

    #[test]
    fn rejects_non_positive_lifetimes() {
        for bad in ["0", "-5", "soon"] {
            assert!(
                RestConfig::from_lookup(lookup(&[
                    ("TECHMED_JWT_SECRET", "s3cret"),
                    ("TECHMED_TOKEN_TTL_MINUTES", bad),
                ]))
                .is_err(),
                "{bad}"
            );
        }
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let cfg = RestConfig::from_lookup(lookup(&[("TECHMED_JWT_SECRET", "hunter2-secret")]))
            .expect("config");
        assert!(!format!("{cfg:?}").contains("hunter2-secret"));
    }
}
