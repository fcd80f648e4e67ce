//! BLAKE2b hash function (RFC 7693).
//!
//! BLAKE2b is a 64-bit optimised hash producing digests of 1 to 64 bytes,
//! with optional keying, salting, personalization and tree-hashing
//! parameters. Inside this crate it is the primitive behind Argon2: the
//! initial hash H0, the variable-length function H' and the final tag.
//!
//! # Structure
//!
//! - [`Blake2bCore`]: the raw state machine (`initialize` / `update` /
//!   `finish`) over an 8-word parameter block.
//! - [`Blake2b`]: a configured hasher built from [`Blake2bConfig`] and an
//!   optional [`Blake2bTreeConfig`].
//! - [`blake2b_long`]: the variable-length H' construction used by Argon2.
//!
//! The implementation is bit-exact with RFC 7693: same IV, same rotation
//! constants (32, 24, 16, 63), same sigma schedule and parameter-block
//! layout. Any deviation would break compatibility with stored hashes.

use thiserror::Error;

mod core;
mod hasher;
mod long;

pub use self::core::{BLOCK_BYTES, Blake2bCore, OUT_BYTES};
pub use hasher::{
    Blake2b, Blake2bConfig, Blake2bTreeConfig, MAX_KEY_BYTES, PERSONALIZATION_BYTES, SALT_BYTES,
};
pub use long::{blake2b_long, blake2b_long_into};

/// Errors reported by BLAKE2b configuration and buffer handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Blake2bError {
    #[error("output size must be between 1 and 64 bytes, got {0}")]
    OutputSize(usize),

    #[error("key must be at most 64 bytes, got {0}")]
    KeyLength(usize),

    #[error("salt must be exactly 16 bytes, got {0}")]
    SaltLength(usize),

    #[error("personalization must be exactly 16 bytes, got {0}")]
    PersonalizationLength(usize),

    #[error("tree depth must be at least 1")]
    TreeDepth,

    #[error("inner hash size must be at most 64 bytes, got {0}")]
    InnerHashSize(u8),

    #[error("range {start}+{count} is out of bounds for input of length {len}")]
    RangeOutOfBounds {
        start: usize,
        count: usize,
        len: usize,
    },

    #[error("output buffer must be {expected} bytes, got {actual}")]
    OutputBufferSize { expected: usize, actual: usize },
}

/// Computes the unkeyed BLAKE2b digest of `input` with `output_size` bytes.
///
/// # Example
///
/// ```rust
/// use warden::hash::blake2b::blake2b;
///
/// let digest = blake2b(64, b"abc").unwrap();
/// assert_eq!(digest[0], 0xba);
/// ```
pub fn blake2b(output_size: usize, input: &[u8]) -> Result<Vec<u8>, Blake2bError> {
    let mut hasher = Blake2b::new(output_size)?;
    hasher.update(input);
    Ok(hasher.finalize())
}
