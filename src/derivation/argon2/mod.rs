//! Argon2 memory-hard password hashing (RFC 9106).
//!
//! All three variants are supported:
//!
//! - **Argon2d**: data-dependent addressing; fastest, but memory access
//!   patterns depend on the password.
//! - **Argon2i**: data-independent addressing; resists side-channel attacks.
//! - **Argon2id**: data-independent for the first half of the first pass,
//!   data-dependent afterwards. The recommended default.
//!
//! Versions 1.3 (`0x13`, default) and 1.0 (`0x10`) are both implemented; they
//! differ only in whether later passes XOR into or overwrite memory.
//!
//! # Algorithm Overview
//!
//! 1. **Initialization**: H0 = BLAKE2b(params || password || salt || secret || data)
//! 2. **Lane initialization**: the first two blocks of each lane come from
//!    H' (variable-length BLAKE2b) over H0.
//! 3. **Memory filling**: every other block is `G(previous, reference)`,
//!    where G is built on the BLAKE2b round function.
//! 4. **Finalization**: the last blocks of all lanes are XORed together and
//!    hashed with H' to produce the tag.
//!
//! # Memory Organization
//!
//! Memory is a matrix of 1024-byte blocks:
//! - **Lanes**: rows that can be filled in parallel.
//! - **Slices**: each lane is divided into 4 slices (sync points).
//! - **Segments**: the blocks of one lane within one slice.
//!
//! Lanes are filled by up to `threads` workers. All workers finish a slice
//! before any starts the next one, so the result does not depend on the
//! thread count.
//!
//! # Example
//!
//! ```rust
//! use warden::derivation::argon2::{self, Argon2Config};
//!
//! let config = Argon2Config {
//!     memory_cost: 256,
//!     time_cost: 2,
//!     lanes: 2,
//!     threads: 2,
//!     ..Argon2Config::with_password(b"correct horse", b"battery staple")
//! };
//!
//! let encoded = argon2::hash_encoded(config).unwrap();
//! assert!(encoded.starts_with("$argon2id$v=19$m=256,t=2,p=2$"));
//! assert!(argon2::verify(&encoded, b"correct horse"));
//! assert!(!argon2::verify(&encoded, b"wrong horse"));
//! ```

mod block;
mod boundary;
mod core;
mod encoding;
mod memory;
mod params;
mod reference;

pub use block::{BLOCK_BYTES, BLOCK_WORDS, Block};
pub use self::core::{
    Argon2, Argon2Error, CostLimits, DEFAULT_CHUNK_BLOCKS, hash_encoded, verify, verify_encoded,
    verify_encoded_with_limits,
};
pub use encoding::{DecodeError, EncodedHash};
pub use params::{
    Argon2Config, ConfigError, MAX_LANES, MAX_SECRET_LENGTH, MIN_HASH_LENGTH, MIN_SALT_LENGTH,
    SYNC_POINTS, Variant, Version,
};
