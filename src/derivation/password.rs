//! Category-scoped password hashing.
//!
//! [`PasswordHasher`] stores passwords as Argon2id hashes with a fresh random
//! salt. A category identifier is appended to the password before hashing,
//! so the same password produces unrelated hashes in different contexts.
//!
//! Every hash produced by one hasher shares the same
//! `$argon2id$v=19$m=…,t=…,p=…$` prefix. Stored hashes omit it, and
//! [`PasswordHasher::verify`] puts it back when it is missing.

use std::fmt::Display;

use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;

use super::argon2::{self, Argon2Config, Argon2Error, Variant, Version};
use crate::primitives::ZeroedBuffer;

/// Salt length used for stored passwords.
pub const SALT_LENGTH: usize = 16;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to generate salt: {0}")]
    Rng(#[from] rand::Error),

    #[error(transparent)]
    Hash(#[from] Argon2Error),
}

/// Argon2id password hasher with fixed cost parameters.
///
/// # Example
///
/// ```rust
/// use warden::derivation::password::PasswordHasher;
///
/// let hasher = PasswordHasher {
///     memory_cost: 64,
///     time_cost: 1,
///     ..PasswordHasher::default()
/// };
///
/// let stored = hasher.hash(b"s3cret", 7).unwrap();
/// assert!(!stored.starts_with('$'));
/// assert!(hasher.verify(&stored, b"s3cret", 7));
/// assert!(!hasher.verify(&stored, b"s3cret", 8));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordHasher {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub lanes: u32,
    pub threads: u32,
    pub hash_length: u32,
}

impl Default for PasswordHasher {
    /// 64 MiB, 3 passes, 4 lanes on 4 threads, 32-byte tag.
    fn default() -> Self {
        Self {
            memory_cost: 64 * 1024,
            time_cost: 3,
            lanes: 4,
            threads: 4,
            hash_length: 32,
        }
    }
}

impl PasswordHasher {
    /// Prefix shared by every hash of this hasher, stripped from stored
    /// hashes.
    pub fn prefix(&self) -> String {
        format!(
            "${}$v={}$m={},t={},p={}$",
            Variant::Id.name(),
            Version::V0x13.as_u32(),
            self.memory_cost,
            self.time_cost,
            self.lanes,
        )
    }

    /// Hashes `password` within `category_id` and returns the stored form.
    pub fn hash(&self, password: &[u8], category_id: impl Display) -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng.try_fill_bytes(&mut salt)?;

        let encoded = argon2::hash_encoded(Argon2Config {
            password: scoped_password(password, category_id),
            salt: Some(salt.to_vec()),
            clear_password: true,
            ..self.config()
        })?;

        let prefix = self.prefix();
        Ok(match encoded.strip_prefix(prefix.as_str()) {
            Some(stored) => stored.to_owned(),
            None => encoded,
        })
    }

    /// Checks `password` within `category_id` against a stored hash, with
    /// or without its prefix.
    pub fn verify(&self, stored: &str, password: &[u8], category_id: impl Display) -> bool {
        let encoded = if stored.starts_with('$') {
            stored.to_owned()
        } else {
            format!("{}{stored}", self.prefix())
        };

        argon2::verify_encoded(
            &encoded,
            Argon2Config {
                password: scoped_password(password, category_id),
                clear_password: true,
                ..self.config()
            },
        )
    }

    fn config(&self) -> Argon2Config {
        Argon2Config {
            variant: Variant::Id,
            version: Version::V0x13,
            hash_length: self.hash_length,
            time_cost: self.time_cost,
            memory_cost: self.memory_cost,
            lanes: self.lanes,
            threads: self.threads,
            ..Argon2Config::default()
        }
    }
}

/// `password || category_id`, in wiped storage.
fn scoped_password(password: &[u8], category_id: impl Display) -> ZeroedBuffer<u8> {
    let category = category_id.to_string();

    let mut scoped = ZeroedBuffer::new(password.len() + category.len());
    scoped[..password.len()].copy_from_slice(password);
    scoped[password.len()..].copy_from_slice(category.as_bytes());
    scoped
}
