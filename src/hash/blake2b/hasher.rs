//! Configured BLAKE2b hashing.
//!
//! [`Blake2b`] wraps [`Blake2bCore`] with everything that depends on the
//! configuration: packing the parameter block, feeding the key block,
//! truncating the output and resetting for a new message.

use super::core::{BLOCK_BYTES, Blake2bCore, OUT_BYTES};
use super::Blake2bError;
use crate::primitives::ZeroedBuffer;

/// Maximum key length in bytes (RFC 7693 §2.1).
pub const MAX_KEY_BYTES: usize = 64;

/// Required salt length in bytes, when a salt is given.
pub const SALT_BYTES: usize = 16;

/// Required personalization length in bytes, when one is given.
pub const PERSONALIZATION_BYTES: usize = 16;

/// Sequential-mode BLAKE2b configuration.
#[derive(Clone, Debug)]
pub struct Blake2bConfig {
    /// Digest length in bytes (1..=64).
    pub output_size: usize,
    /// Optional MAC key (at most 64 bytes).
    pub key: Option<Vec<u8>>,
    /// Optional salt (exactly 16 bytes).
    pub salt: Option<Vec<u8>>,
    /// Optional personalization string (exactly 16 bytes).
    pub personalization: Option<Vec<u8>>,
}

impl Default for Blake2bConfig {
    /// Unkeyed BLAKE2b-512.
    fn default() -> Self {
        Self {
            output_size: OUT_BYTES,
            key: None,
            salt: None,
            personalization: None,
        }
    }
}

/// Tree-hashing parameters (RFC 7693 §2.5, BLAKE2 paper §2.10).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Blake2bTreeConfig {
    /// Maximum number of children per node; 0 means unlimited.
    pub fanout: u8,
    /// Maximum tree depth (1..=255).
    pub max_height: u8,
    /// Maximum leaf length in bytes; 0 means unlimited.
    pub leaf_size: u32,
    pub node_offset: u64,
    pub node_depth: u8,
    /// Inner digest length in bytes (0..=64).
    pub inner_hash_size: u8,
    /// Whether this node is the last one of its layer.
    pub is_last_node: bool,
}

impl Default for Blake2bTreeConfig {
    /// The parameters of plain sequential hashing.
    fn default() -> Self {
        Self {
            fanout: 1,
            max_height: 1,
            leaf_size: 0,
            node_offset: 0,
            node_depth: 0,
            inner_hash_size: 0,
            is_last_node: false,
        }
    }
}

/// A configured BLAKE2b hasher.
///
/// # Example
///
/// ```rust
/// use warden::hash::blake2b::Blake2b;
///
/// let mut hasher = Blake2b::new(32).unwrap();
/// hasher.update(b"abc");
/// let digest = hasher.finalize();
/// assert_eq!(digest.len(), 32);
/// ```
pub struct Blake2b {
    core: Blake2bCore,
    params: [u64; 8],
    output_size: usize,
    /// Key zero-padded to one full block.
    key_block: Option<ZeroedBuffer<u8>>,
    last_node: bool,
}

impl Blake2b {
    /// Unkeyed hasher producing `output_size` bytes.
    pub fn new(output_size: usize) -> Result<Self, Blake2bError> {
        Self::with_config(
            &Blake2bConfig {
                output_size,
                ..Blake2bConfig::default()
            },
            None,
        )
    }

    /// Keyed hasher (BLAKE2b-MAC) producing `output_size` bytes.
    pub fn new_keyed(output_size: usize, key: &[u8]) -> Result<Self, Blake2bError> {
        Self::with_config(
            &Blake2bConfig {
                output_size,
                key: Some(key.to_vec()),
                ..Blake2bConfig::default()
            },
            None,
        )
    }

    /// Builds a hasher from a full configuration.
    ///
    /// # Errors
    /// Rejects output sizes outside 1..=64, keys longer than 64 bytes, salts
    /// or personalizations that are not exactly 16 bytes, a zero tree depth
    /// and inner hash sizes above 64.
    pub fn with_config(
        config: &Blake2bConfig,
        tree: Option<&Blake2bTreeConfig>,
    ) -> Result<Self, Blake2bError> {
        if !(1..=OUT_BYTES).contains(&config.output_size) {
            return Err(Blake2bError::OutputSize(config.output_size));
        }

        let key_len = config.key.as_ref().map_or(0, Vec::len);
        if key_len > MAX_KEY_BYTES {
            return Err(Blake2bError::KeyLength(key_len));
        }

        let salt = fixed_16(config.salt.as_deref(), Blake2bError::SaltLength)?;
        let personal = fixed_16(
            config.personalization.as_deref(),
            Blake2bError::PersonalizationLength,
        )?;

        let tree = tree.copied().unwrap_or_default();
        if tree.max_height == 0 {
            return Err(Blake2bError::TreeDepth);
        }
        if tree.inner_hash_size as usize > OUT_BYTES {
            return Err(Blake2bError::InnerHashSize(tree.inner_hash_size));
        }

        let mut params = [0u64; 8];
        params[0] = config.output_size as u64
            | (key_len as u64) << 8
            | (tree.fanout as u64) << 16
            | (tree.max_height as u64) << 24
            | (tree.leaf_size as u64) << 32;
        params[1] = tree.node_offset;
        params[2] = tree.node_depth as u64 | (tree.inner_hash_size as u64) << 8;
        params[4] = load_u64(&salt[..8]);
        params[5] = load_u64(&salt[8..]);
        params[6] = load_u64(&personal[..8]);
        params[7] = load_u64(&personal[8..]);

        let key_block = config.key.as_deref().filter(|k| !k.is_empty()).map(|key| {
            let mut block = ZeroedBuffer::<u8>::new(BLOCK_BYTES);
            block[..key.len()].copy_from_slice(key);
            block
        });

        let mut hasher = Self {
            core: Blake2bCore::new(),
            params,
            output_size: config.output_size,
            key_block,
            last_node: tree.is_last_node,
        };
        hasher.reset();

        Ok(hasher)
    }

    /// Digest length in bytes.
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Starts a new message with the same configuration (and key).
    pub fn reset(&mut self) {
        self.core.initialize(&self.params);
        self.core.set_last_node(self.last_node);

        if let Some(key_block) = &self.key_block {
            self.core.update(key_block);
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.core.update(data);
    }

    /// Absorbs `data[start..start + count]`.
    pub fn update_range(&mut self, data: &[u8], start: usize, count: usize) -> Result<(), Blake2bError> {
        self.core.update_range(data, start, count)
    }

    /// Consumes the hasher and returns the digest.
    pub fn finalize(mut self) -> Vec<u8> {
        let mut full = self.core.finish();
        let out = full[..self.output_size].to_vec();
        zeroize::Zeroize::zeroize(&mut full);
        out
    }

    /// Writes the digest into `out`, which must be exactly `output_size`
    /// bytes long. The hasher must be [`reset`](Self::reset) before reuse.
    pub fn finalize_into(&mut self, out: &mut [u8]) -> Result<(), Blake2bError> {
        if out.len() != self.output_size {
            return Err(Blake2bError::OutputBufferSize {
                expected: self.output_size,
                actual: out.len(),
            });
        }

        let mut full = self.core.finish();
        out.copy_from_slice(&full[..self.output_size]);
        zeroize::Zeroize::zeroize(&mut full);
        Ok(())
    }
}

fn fixed_16(value: Option<&[u8]>, err: fn(usize) -> Blake2bError) -> Result<[u8; 16], Blake2bError> {
    match value {
        None => Ok([0u8; 16]),
        Some(bytes) => bytes.try_into().map_err(|_| err(bytes.len())),
    }
}

#[inline(always)]
fn load_u64(bytes: &[u8]) -> u64 {
    u64::from_le_bytes(core::array::from_fn(|i| bytes[i]))
}
