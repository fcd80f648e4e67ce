//! Initialization and finalization for Argon2.
//!
//! This module handles the boundary operations of the algorithm: the
//! initial hash H0 over every input, the seeding of the first two blocks of
//! each lane, and the derivation of the tag from the filled memory.

use zeroize::Zeroize;

use super::block::{BLOCK_BYTES, Block};
use super::core::Argon2Error;
use super::memory::{BlockMemory, MemoryLayout};
use super::params::Argon2Config;
use crate::hash::blake2b::{Blake2b, blake2b_long_into};
use crate::primitives::ZeroedBuffer;

/// Length of H0 in bytes.
pub(crate) const PREHASH_BYTES: usize = 64;

/// Computes the initial hash H0 from all Argon2 inputs (RFC 9106 §3.2).
///
/// ```text
/// H0 = BLAKE2b(p || T || m || t || v || y || |P| || P || |S| || S || |K| || K || |X| || X)
/// ```
///
/// `m` is the requested memory cost, before normalisation. The password and
/// secret are wiped from the configuration right after being absorbed when
/// the corresponding `clear_*` flag is set.
pub(crate) fn prehash(config: &mut Argon2Config) -> Result<ZeroedBuffer<u8>, Argon2Error> {
    let mut hasher = Blake2b::new(PREHASH_BYTES)?;

    for word in [
        config.lanes,
        config.hash_length,
        config.memory_cost,
        config.time_cost,
        config.version.as_u32(),
        config.variant as u32,
    ] {
        hasher.update(&word.to_le_bytes());
    }

    hasher.update(&len32(&config.password));
    hasher.update(&config.password);
    if config.clear_password {
        config.password.release();
    }

    let salt = config.salt.as_deref().unwrap_or_default();
    hasher.update(&len32(salt));
    hasher.update(salt);

    match config.secret.as_mut() {
        Some(secret) => {
            hasher.update(&len32(secret));
            hasher.update(secret);
            if config.clear_secret {
                secret.release();
            }
        }
        None => hasher.update(&0u32.to_le_bytes()),
    }

    let associated_data = config.associated_data.as_deref().unwrap_or_default();
    hasher.update(&len32(associated_data));
    hasher.update(associated_data);

    let mut h0 = ZeroedBuffer::new(PREHASH_BYTES);
    hasher.finalize_into(&mut h0)?;
    Ok(h0)
}

/// Seeds blocks 0 and 1 of every lane:
/// `B[lane][j] = H'^1024(H0 || LE32(j) || LE32(lane))`.
pub(crate) fn initialize_lanes(
    memory: &mut BlockMemory,
    layout: &MemoryLayout,
    h0: &[u8],
) -> Result<(), Argon2Error> {
    let mut bytes = [0u8; BLOCK_BYTES];

    for lane in 0..layout.lanes {
        for column in 0..2u32 {
            blake2b_long_into(
                &mut bytes,
                &[h0, &column.to_le_bytes(), &lane.to_le_bytes()],
            )?;
            memory.block_mut(layout.index(lane, column)).load_bytes(&bytes);
        }
    }

    bytes.zeroize();
    Ok(())
}

/// Finalizes the computation and produces the tag.
///
/// The last block of each lane is XORed into one block, which is then
/// hashed with H' to the requested tag length. Every lane therefore
/// contributes to the output.
pub(crate) fn finalize(
    memory: &BlockMemory,
    layout: &MemoryLayout,
    hash_length: usize,
) -> Result<ZeroedBuffer<u8>, Argon2Error> {
    let mut final_block = Block::ZERO;
    for lane in 0..layout.lanes {
        final_block.xor_assign(memory.block(layout.index(lane, layout.lane_len - 1)));
    }

    let mut bytes = [0u8; BLOCK_BYTES];
    final_block.store_bytes(&mut bytes);

    let mut tag = ZeroedBuffer::new(hash_length);
    let result = blake2b_long_into(&mut tag, &[&bytes]);
    bytes.zeroize();
    result?;

    Ok(tag)
}

#[inline]
fn len32(bytes: &[u8]) -> [u8; 4] {
    // Lengths are bounded by `Argon2Config::validate`.
    (bytes.len() as u32).to_le_bytes()
}
