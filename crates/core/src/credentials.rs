//! Password hashing, password policy and temporary password generation.
//!
//! Digests are Argon2id PHC strings. Verification re-derives using the parameters embedded in
//! the stored digest, so changing [`KdfParams`] does not invalidate existing accounts.

use crate::config::KdfParams;
use crate::constants::{
    ARGON2_OUTPUT_LEN, ARGON2_SALT_LEN, MIN_PASSWORD_LEN, MIN_TEMP_PASSWORD_LEN,
};
use crate::{CoreError, CoreResult};
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use techmed_types::ValidationError;

const BUILTIN_WEAK_PASSWORDS: &str = include_str!("../data/weak_passwords.txt");

const TEMP_PASSWORD_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

// Only ever compared against, never stored.
const DUMMY_PASSWORD: &str = "timing-equaliser-not-a-password";

/// Build Argon2 parameters from configuration, rejecting values outside Argon2's limits.
pub(crate) fn argon2_params(kdf: &KdfParams) -> CoreResult<Params> {
    Params::new(
        kdf.memory_kib,
        kdf.time_cost,
        kdf.parallelism,
        Some(ARGON2_OUTPUT_LEN),
    )
    .map_err(|e| CoreError::InvalidConfig(format!("invalid argon2 parameters: {e}")))
}

/// Argon2id password hashing and verification.
#[derive(Clone)]
pub struct CredentialService {
    params: Params,
    dummy_digest: Arc<OnceLock<String>>,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish()
    }
}

impl CredentialService {
    pub fn new(kdf: KdfParams) -> CoreResult<Self> {
        Ok(Self {
            params: argon2_params(&kdf)?,
            dummy_digest: Arc::new(OnceLock::new()),
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt and return the PHC string.
    pub fn hash(&self, password: &str) -> CoreResult<String> {
        let mut salt = [0u8; ARGON2_SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| CoreError::PasswordHash(e.to_string()))?;

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CoreError::PasswordHash(e.to_string()))
    }

    /// Check a password against a stored digest.
    ///
    /// A digest that cannot be parsed verifies as `false`.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            tracing::warn!("stored password digest is not a valid PHC string");
            return false;
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Run a verification against a throwaway digest so that a login for an unknown account
    /// costs the same as one for a known account.
    pub fn verify_dummy(&self, password: &str) {
        let digest = self
            .dummy_digest
            .get_or_init(|| self.hash(DUMMY_PASSWORD).unwrap_or_default());
        let _ = self.verify(password, digest);
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_blocking(&self, password: String) -> CoreResult<String> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.hash(&password)).await?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_blocking(&self, password: String, digest: String) -> CoreResult<bool> {
        let this = self.clone();
        Ok(tokio::task::spawn_blocking(move || this.verify(&password, &digest)).await?)
    }

    /// [`verify_dummy`](Self::verify_dummy) on the blocking thread pool.
    pub async fn verify_dummy_blocking(&self, password: String) -> CoreResult<()> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.verify_dummy(&password)).await?;
        Ok(())
    }
}

/// Minimum length plus a deny-list of known weak passwords.
#[derive(Clone, Debug)]
pub struct PasswordPolicy {
    weak: Arc<HashSet<String>>,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        let mut weak = HashSet::new();
        extend_word_list(&mut weak, BUILTIN_WEAK_PASSWORDS);
        Self {
            weak: Arc::new(weak),
        }
    }
}

impl PasswordPolicy {
    /// Built-in list, extended with the newline-delimited entries of `extra` when given.
    pub fn load(extra: Option<&Path>) -> CoreResult<Self> {
        let mut weak = HashSet::new();
        extend_word_list(&mut weak, BUILTIN_WEAK_PASSWORDS);

        if let Some(path) = extra {
            let contents = std::fs::read_to_string(path)?;
            let before = weak.len();
            extend_word_list(&mut weak, &contents);
            tracing::info!(
                "loaded {} extra weak passwords from {}",
                weak.len() - before,
                path.display()
            );
        }

        Ok(Self {
            weak: Arc::new(weak),
        })
    }

    pub fn check(&self, password: &str) -> Result<(), ValidationError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.weak.contains(password) {
            return Err(ValidationError::PasswordTooWeak);
        }
        Ok(())
    }
}

fn extend_word_list(set: &mut HashSet<String>, contents: &str) {
    set.extend(
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_owned),
    );
}

/// Random password drawn from ASCII letters, digits and punctuation.
pub fn generate_temporary_password(len: usize) -> CoreResult<String> {
    if len < MIN_TEMP_PASSWORD_LEN {
        return Err(CoreError::InvalidConfig(format!(
            "temporary passwords must be at least {MIN_TEMP_PASSWORD_LEN} characters"
        )));
    }
    let mut rng = OsRng;
    Ok((0..len)
        .map(|_| TEMP_PASSWORD_ALPHABET[rng.gen_range(0..TEMP_PASSWORD_ALPHABET.len())] as char)
        .collect())
}
