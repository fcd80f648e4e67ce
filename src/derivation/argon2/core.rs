use thiserror::Error;
use tracing::debug;

use super::boundary::{finalize, initialize_lanes, prehash};
use super::encoding::{DecodeError, EncodedHash};
use super::memory::{BlockMemory, FillParams, MemoryLayout, fill};
use super::params::{Argon2Config, ConfigError};
use crate::hash::blake2b::Blake2bError;
use crate::primitives::{ConstantTimeEq, ZeroedBuffer};

/// Default ceiling for a single working-memory allocation, in blocks
/// (1 GiB).
pub const DEFAULT_CHUNK_BLOCKS: usize = 1 << 20;

/// Errors that can occur during Argon2 computation.
#[derive(Debug, Error)]
pub enum Argon2Error {
    /// Invalid parameter values.
    #[error("invalid argon2 configuration: {0}")]
    Config(#[from] ConfigError),

    /// Working memory could not be allocated.
    #[error(
        "out of memory allocating {requested_blocks} blocks for {lanes} lanes \
         (chunk {chunk} of {chunk_count})"
    )]
    OutOfMemory {
        requested_blocks: usize,
        lanes: u32,
        chunk: usize,
        chunk_count: usize,
    },

    /// The password or secret was wiped by an earlier run with a `clear_*`
    /// flag set, so it can no longer be hashed.
    #[error("argon2 {0} was cleared by a previous hash")]
    InputCleared(&'static str),

    /// Encoded hash parameters exceed the verifier's limits.
    #[error("encoded {field} cost {value} exceeds the limit of {limit}")]
    CostLimit {
        field: &'static str,
        value: u32,
        limit: u32,
    },

    /// Malformed encoded hash.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Blake2b(#[from] Blake2bError),
}

/// An Argon2 engine bound to one configuration.
///
/// Construction validates the configuration and allocates the working
/// memory; [`Argon2::hash`] runs the computation. The memory belongs to the
/// engine and is zeroed when the engine is dropped.
///
/// # Example
///
/// ```rust
/// use warden::derivation::argon2::{Argon2, Argon2Config};
///
/// let config = Argon2Config {
///     memory_cost: 64,
///     time_cost: 1,
///     lanes: 2,
///     ..Argon2Config::with_password(b"password", b"somesalt")
/// };
///
/// let mut engine = Argon2::new(config).unwrap();
/// let tag = engine.hash().unwrap();
/// assert_eq!(tag.len(), 32);
/// ```
pub struct Argon2 {
    config: Argon2Config,
    layout: MemoryLayout,
    memory: BlockMemory,
}

impl Argon2 {
    /// Validates `config` and allocates working memory.
    pub fn new(config: Argon2Config) -> Result<Self, Argon2Error> {
        Self::with_chunk_limit(config, DEFAULT_CHUNK_BLOCKS)
    }

    /// Like [`Argon2::new`], splitting working memory into allocations of
    /// at most `max_chunk_blocks` blocks.
    pub fn with_chunk_limit(config: Argon2Config, max_chunk_blocks: usize) -> Result<Self, Argon2Error> {
        config.validate()?;

        let layout = MemoryLayout::new(&config);
        let memory = BlockMemory::allocate(layout.total_blocks as usize, max_chunk_blocks, config.lanes)?;

        debug!(
            variant = config.variant.name(),
            version = config.version.as_u32(),
            blocks = memory.len(),
            chunks = memory.chunk_count(),
            lanes = layout.lanes,
            passes = config.time_cost,
            threads = config.effective_threads(),
            "argon2 engine ready"
        );

        Ok(Self {
            config,
            layout,
            memory,
        })
    }

    pub fn config(&self) -> &Argon2Config {
        &self.config
    }

    /// Number of blocks of working memory after normalisation.
    pub fn memory_blocks(&self) -> u32 {
        self.layout.total_blocks
    }

    /// Number of allocations backing the working memory.
    pub fn memory_chunks(&self) -> usize {
        self.memory.chunk_count()
    }

    /// Runs the computation and returns the tag.
    ///
    /// 1. H0 over all inputs.
    /// 2. First two blocks of each lane from H'.
    /// 3. `time_cost` passes of segment filling, slice by slice.
    /// 4. H' over the XOR of the last block of every lane.
    ///
    /// With `clear_password` or `clear_secret` set, the input is wiped by
    /// the first run and later runs fail with [`Argon2Error::InputCleared`].
    pub fn hash(&mut self) -> Result<ZeroedBuffer<u8>, Argon2Error> {
        if self.config.password.is_released() {
            return Err(Argon2Error::InputCleared("password"));
        }
        if self.config.secret.as_ref().is_some_and(ZeroedBuffer::is_released) {
            return Err(Argon2Error::InputCleared("secret"));
        }

        let h0 = prehash(&mut self.config)?;
        initialize_lanes(&mut self.memory, &self.layout, &h0)?;
        drop(h0);

        fill(
            &mut self.memory,
            &self.layout,
            FillParams {
                passes: self.config.time_cost,
                variant: self.config.variant,
                version: self.config.version,
                threads: self.config.effective_threads(),
            },
        );

        let tag = finalize(&self.memory, &self.layout, self.config.hash_length as usize);
        self.memory.wipe();
        tag
    }

    /// Runs the computation and returns the encoded hash string.
    pub fn hash_encoded(&mut self) -> Result<String, Argon2Error> {
        let tag = self.hash()?;

        Ok(EncodedHash {
            variant: self.config.variant,
            version: self.config.version,
            memory_cost: self.config.memory_cost,
            time_cost: self.config.time_cost,
            lanes: self.config.lanes,
            salt: self.config.salt.clone().unwrap_or_default(),
            tag: tag.to_vec(),
        }
        .to_string())
    }
}

/// Hashes `config` and returns the encoded form
/// (`$argon2id$v=19$m=…,t=…,p=…$salt$tag`).
pub fn hash_encoded(config: Argon2Config) -> Result<String, Argon2Error> {
    Argon2::new(config)?.hash_encoded()
}

/// Upper bounds on the costs an encoded hash may make a verifier pay.
///
/// Encoded strings carry their own memory and time costs, so an attacker
/// who controls the string controls the work done to check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostLimits {
    /// Largest accepted `m=` value, in KiB.
    pub max_memory_cost: u32,
    /// Largest accepted `t=` value.
    pub max_time_cost: u32,
}

impl Default for CostLimits {
    /// 4 GiB of memory and 1024 passes.
    fn default() -> Self {
        Self {
            max_memory_cost: 1 << 22,
            max_time_cost: 1 << 10,
        }
    }
}

impl CostLimits {
    /// Accepts no more than `max_memory_cost` KiB and `max_time_cost` passes.
    pub fn new(max_memory_cost: u32, max_time_cost: u32) -> Self {
        Self {
            max_memory_cost,
            max_time_cost,
        }
    }

    /// Checks the costs of `encoded` against the limits.
    pub fn check(&self, encoded: &EncodedHash) -> Result<(), Argon2Error> {
        if encoded.memory_cost > self.max_memory_cost {
            return Err(Argon2Error::CostLimit {
                field: "memory",
                value: encoded.memory_cost,
                limit: self.max_memory_cost,
            });
        }
        if encoded.time_cost > self.max_time_cost {
            return Err(Argon2Error::CostLimit {
                field: "time",
                value: encoded.time_cost,
                limit: self.max_time_cost,
            });
        }
        Ok(())
    }
}

/// Verifies `encoded` against the password, secret, associated data and
/// thread count in `config`, within the default [`CostLimits`].
///
/// Variant, version, costs, lanes, salt and tag length come from the
/// encoded string. Returns `false` for a malformed string, costs above the
/// limits, an unusable configuration or a mismatch, without saying which.
pub fn verify_encoded(encoded: &str, config: Argon2Config) -> bool {
    verify_encoded_with_limits(encoded, config, CostLimits::default())
}

/// Like [`verify_encoded`], refusing strings whose costs exceed `limits`
/// before any memory is allocated.
pub fn verify_encoded_with_limits(encoded: &str, mut config: Argon2Config, limits: CostLimits) -> bool {
    let expected = match encoded.parse::<EncodedHash>() {
        Ok(expected) => expected,
        Err(err) => {
            debug!(error = %err, "argon2 verification rejected malformed hash");
            return false;
        }
    };

    if let Err(err) = limits.check(&expected) {
        debug!(error = %err, "argon2 verification rejected expensive hash");
        return false;
    }

    let Ok(hash_length) = u32::try_from(expected.tag.len()) else {
        return false;
    };

    config.variant = expected.variant;
    config.version = expected.version;
    config.memory_cost = expected.memory_cost;
    config.time_cost = expected.time_cost;
    config.lanes = expected.lanes;
    config.hash_length = hash_length;
    config.salt = (!expected.salt.is_empty()).then(|| expected.salt.clone());

    let computed = match Argon2::new(config).and_then(|mut engine| engine.hash()) {
        Ok(tag) => tag,
        Err(err) => {
            debug!(error = %err, "argon2 verification could not recompute hash");
            return false;
        }
    };

    computed.as_slice().ct_eq(expected.tag.as_slice())
}

/// Verifies `password` against `encoded` with no secret or associated
/// data, on a single thread.
pub fn verify(encoded: &str, password: &[u8]) -> bool {
    verify_encoded(
        encoded,
        Argon2Config {
            password: ZeroedBuffer::from_slice(password),
            threads: 1,
            ..Argon2Config::default()
        },
    )
}
