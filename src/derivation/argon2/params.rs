//! Parameter definitions and validation for Argon2.
//!
//! This module defines the configurable inputs of an Argon2 computation and
//! validates them before any memory is allocated, so that a bad
//! configuration fails fast instead of mid-hash.

use thiserror::Error;

use crate::primitives::ZeroedBuffer;

/// Number of synchronisation points (slices) per pass.
pub const SYNC_POINTS: u32 = 4;

/// Minimum tag length in bytes.
pub const MIN_HASH_LENGTH: u32 = 4;

/// Minimum salt length in bytes, when a salt is given.
pub const MIN_SALT_LENGTH: usize = 8;

/// Maximum secret length in bytes.
pub const MAX_SECRET_LENGTH: usize = 128;

/// Maximum number of lanes (24-bit field in the reference design).
pub const MAX_LANES: u32 = 0x00FF_FFFF;

/// Addressing variant.
///
/// The discriminant is the `y` value hashed into H0 and into every
/// data-independent address block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Argon2d: data-dependent addressing throughout.
    D = 0,
    /// Argon2i: data-independent addressing throughout.
    I = 1,
    /// Argon2id: data-independent for the first half of the first pass,
    /// data-dependent afterwards.
    Id = 2,
}

impl Variant {
    /// Identifier used in encoded hashes (`argon2d`, `argon2i`, `argon2id`).
    pub fn name(self) -> &'static str {
        match self {
            Variant::D => "argon2d",
            Variant::I => "argon2i",
            Variant::Id => "argon2id",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "argon2d" => Some(Variant::D),
            "argon2i" => Some(Variant::I),
            "argon2id" => Some(Variant::Id),
            _ => None,
        }
    }

    /// Whether the segment at (`pass`, `slice`) uses data-independent
    /// addressing.
    pub(crate) fn data_independent(self, pass: u32, slice: u32) -> bool {
        match self {
            Variant::D => false,
            Variant::I => true,
            Variant::Id => pass == 0 && slice < SYNC_POINTS / 2,
        }
    }
}

/// Algorithm version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Version {
    /// Version 1.0 (`0x10`): later passes overwrite blocks.
    V0x10 = 0x10,
    /// Version 1.3 (`0x13`): later passes XOR into existing blocks.
    #[default]
    V0x13 = 0x13,
}

impl Version {
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0x10 => Some(Version::V0x10),
            0x13 => Some(Version::V0x13),
            _ => None,
        }
    }
}

/// Inputs of one Argon2 computation.
///
/// # Recommended Values
///
/// The defaults (64 MiB, 3 passes, 4 lanes, 32-byte tag, Argon2id v1.3)
/// follow the reference "second recommended option" of RFC 9106 §4.
///
/// # Example
///
/// ```rust
/// use warden::derivation::argon2::Argon2Config;
///
/// let config = Argon2Config {
///     memory_cost: 32,
///     time_cost: 1,
///     lanes: 1,
///     ..Argon2Config::with_password(b"hunter2", b"saltsaltsalt")
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct Argon2Config {
    pub variant: Variant,
    pub version: Version,
    /// Tag length in bytes (at least 4).
    pub hash_length: u32,
    /// Number of passes over memory (at least 1).
    pub time_cost: u32,
    /// Requested memory in 1 KiB blocks. Raised to `2 × 4 × lanes` when
    /// smaller, then rounded down to a multiple of `4 × lanes`.
    pub memory_cost: u32,
    /// Degree of parallelism (number of lanes, 1..=2^24-1).
    pub lanes: u32,
    /// Worker threads used to fill lanes; capped at `lanes`.
    pub threads: u32,
    pub password: ZeroedBuffer<u8>,
    /// Optional salt (at least 8 bytes).
    pub salt: Option<Vec<u8>>,
    /// Optional secret key (at most 128 bytes).
    pub secret: Option<ZeroedBuffer<u8>>,
    pub associated_data: Option<Vec<u8>>,
    /// Wipe the password once it has been absorbed into H0.
    pub clear_password: bool,
    /// Wipe the secret once it has been absorbed into H0.
    pub clear_secret: bool,
}

/// Errors that can occur during parameter validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("hash length must be at least 4 bytes, got {0}")]
    HashLengthTooShort(u32),

    #[error("salt must be at least 8 bytes, got {0}")]
    SaltTooShort(usize),

    #[error("secret must be at most 128 bytes, got {0}")]
    SecretTooLong(usize),

    #[error("time cost must be at least 1")]
    TooFewPasses,

    #[error("lanes must be between 1 and 16777215, got {0}")]
    LanesOutOfRange(u32),

    #[error("threads must be at least 1")]
    TooFewThreads,

    #[error("{field} is too long ({len} bytes)")]
    InputTooLong { field: &'static str, len: usize },
}

impl Argon2Config {
    /// Default parameters with the given password and salt.
    pub fn with_password(password: &[u8], salt: &[u8]) -> Self {
        Self {
            password: ZeroedBuffer::from_slice(password),
            salt: Some(salt.to_vec()),
            ..Self::default()
        }
    }

    /// Checks every parameter against the algorithm's requirements.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hash_length < MIN_HASH_LENGTH {
            return Err(ConfigError::HashLengthTooShort(self.hash_length));
        }

        if self.time_cost < 1 {
            return Err(ConfigError::TooFewPasses);
        }

        if self.lanes < 1 || self.lanes > MAX_LANES {
            return Err(ConfigError::LanesOutOfRange(self.lanes));
        }

        if self.threads < 1 {
            return Err(ConfigError::TooFewThreads);
        }

        if let Some(salt) = &self.salt {
            if salt.len() < MIN_SALT_LENGTH {
                return Err(ConfigError::SaltTooShort(salt.len()));
            }
        }

        if let Some(secret) = &self.secret {
            if secret.len() > MAX_SECRET_LENGTH {
                return Err(ConfigError::SecretTooLong(secret.len()));
            }
        }

        check_u32_len("password", self.password.len())?;
        check_u32_len("salt", self.salt.as_ref().map_or(0, Vec::len))?;
        check_u32_len(
            "associated data",
            self.associated_data.as_ref().map_or(0, Vec::len),
        )?;

        Ok(())
    }

    /// Memory cost after raising to the minimum and rounding down to a whole
    /// number of segments per lane.
    pub fn memory_blocks(&self) -> u32 {
        let quantum = SYNC_POINTS * self.lanes;
        let requested = self.memory_cost.max(2 * quantum);
        (requested / quantum) * quantum
    }

    /// Threads actually used for filling.
    pub fn effective_threads(&self) -> u32 {
        self.threads.clamp(1, self.lanes.max(1))
    }
}

fn check_u32_len(field: &'static str, len: usize) -> Result<(), ConfigError> {
    if u32::try_from(len).is_err() {
        return Err(ConfigError::InputTooLong { field, len });
    }
    Ok(())
}

impl Default for Argon2Config {
    /// Argon2id v1.3, 64 MiB, 3 passes, 4 lanes, 1 thread, 32-byte tag,
    /// empty password and no salt.
    fn default() -> Self {
        Self {
            variant: Variant::Id,
            version: Version::V0x13,
            hash_length: 32,
            time_cost: 3,
            memory_cost: 64 * 1024,
            lanes: 4,
            threads: 1,
            password: ZeroedBuffer::new(0),
            salt: None,
            secret: None,
            associated_data: None,
            clear_password: false,
            clear_secret: false,
        }
    }
}
