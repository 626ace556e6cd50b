//! Password hashing utilities
//!
//! Passwords are stored as `<salt>.<hash>`: the salt is 8 random bytes
//! rendered as hex, the hash is the hex scrypt output keyed with that salt.

use rand::Rng;
use scrypt::{scrypt, Params};

use crate::support::errors::InfraError;

const SALT_LEN: usize = 8;
const SEPARATOR: char = '.';

/// Output lengths scrypt accepts; anything else was not written by us.
const MIN_HASH_LEN: usize = 10;
const MAX_HASH_LEN: usize = 64;

/// scrypt cost parameters (N = 2^log_n)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptSettings {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
    /// Output length in bytes of freshly derived hashes
    pub key_len: usize,
}

impl Default for ScryptSettings {
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 8,
            p: 1,
            key_len: 32,
        }
    }
}

/// A stored password split into its salt and raw hash bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPassword {
    pub salt: String,
    pub hash: Vec<u8>,
}

impl StoredPassword {
    /// Parse a `salt.hash` value. Returns `None` when either part is
    /// missing or empty, the hash is not hex, or it decodes to a length
    /// scrypt cannot produce.
    pub fn parse(stored: &str) -> Option<Self> {
        let (salt, hash) = stored.split_once(SEPARATOR)?;
        if salt.is_empty() || hash.is_empty() {
            return None;
        }
        let hash = hex::decode(hash).ok()?;
        if !(MIN_HASH_LEN..=MAX_HASH_LEN).contains(&hash.len()) {
            return None;
        }
        Some(Self {
            salt: salt.to_string(),
            hash,
        })
    }
}

/// Salted scrypt hasher
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    settings: ScryptSettings,
    params: Params,
}

impl PasswordHasher {
    pub fn new(settings: ScryptSettings) -> Result<Self, InfraError> {
        let params = Params::new(settings.log_n, settings.r, settings.p, settings.key_len)
            .map_err(|e| InfraError::Crypto(format!("Invalid scrypt parameters: {}", e)))?;
        Ok(Self { settings, params })
    }

    pub fn settings(&self) -> &ScryptSettings {
        &self.settings
    }

    /// Hash a password with a fresh random salt, returning `salt.hash`.
    pub fn hash(&self, password: &str) -> Result<String, InfraError> {
        let salt_bytes: [u8; SALT_LEN] = rand::thread_rng().gen();
        let salt = hex::encode(salt_bytes);

        let mut derived = vec![0u8; self.settings.key_len];
        self.derive(password, &salt, &mut derived)?;

        Ok(format!("{}{}{}", salt, SEPARATOR, hex::encode(derived)))
    }

    /// Verify a password against a stored value.
    ///
    /// The derived output length follows the stored hash, so values written
    /// with a different `key_len` still verify.
    pub fn verify(&self, password: &str, stored: &StoredPassword) -> Result<bool, InfraError> {
        let mut derived = vec![0u8; stored.hash.len()];
        self.derive(password, &stored.salt, &mut derived)?;
        Ok(constant_time_eq(&derived, &stored.hash))
    }

    /// [`hash`](Self::hash) on the blocking pool; scrypt is CPU and memory
    /// bound and must not run on an async worker.
    pub async fn hash_blocking(&self, password: &str) -> Result<String, InfraError> {
        let hasher = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(join_err)?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(
        &self,
        password: &str,
        stored: StoredPassword,
    ) -> Result<bool, InfraError> {
        let hasher = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(join_err)?
    }

    fn derive(&self, password: &str, salt: &str, out: &mut [u8]) -> Result<(), InfraError> {
        scrypt(password.as_bytes(), salt.as_bytes(), &self.params, out)
            .map_err(|e| InfraError::Crypto(format!("Failed to derive key: {}", e)))
    }
}

fn join_err(e: tokio::task::JoinError) -> InfraError {
    InfraError::Crypto(format!("Hashing task failed: {}", e))
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
