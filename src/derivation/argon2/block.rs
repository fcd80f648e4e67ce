//! Block operations for Argon2.
//!
//! This module defines the 1024-byte memory block and the compression
//! function G used to fill memory. G is built from the BLAKE2b round
//! function, with the additions replaced by `a + b + 2·lo(a)·lo(b)` to
//! increase the latency of each mixing step on dedicated hardware.

use zeroize::Zeroize;

use super::params::Variant;

/// Number of 64-bit words in a block.
pub const BLOCK_WORDS: usize = 128;

/// Block size in bytes.
pub const BLOCK_BYTES: usize = BLOCK_WORDS * 8;

/// A 1024-byte memory block (128 × 64-bit words).
///
/// Blocks are the fundamental unit of Argon2 memory. Each block is zeroed
/// on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Block(pub [u64; BLOCK_WORDS]);

impl Block {
    pub(crate) const ZERO: Self = Self([0u64; BLOCK_WORDS]);

    pub(crate) fn xor_assign(&mut self, other: &Block) {
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| *a ^= b);
    }

    pub(crate) fn load_bytes(&mut self, bytes: &[u8; BLOCK_BYTES]) {
        for (word, chunk) in self.0.iter_mut().zip(bytes.chunks_exact(8)) {
            *word = u64::from_le_bytes(core::array::from_fn(|i| chunk[i]));
        }
    }

    pub(crate) fn store_bytes(&self, out: &mut [u8; BLOCK_BYTES]) {
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
    }

    /// Compression function G (RFC 9106 §3.5).
    ///
    /// Computes `R = X ⊕ Y`, then `Z = P_col(P_row(R))`, and returns `Z ⊕ R`.
    /// P is applied first to the 8 rows of 16 consecutive words, then to the
    /// 8 columns of 2-word pairs.
    pub(crate) fn compress(x: &Self, y: &Self) -> Self {
        let mut r = x.clone();
        r.xor_assign(y);

        let mut z = r.clone();
        z.permute_rows();
        z.permute_columns();
        z.xor_assign(&r);

        r.zeroize();
        z
    }

    /// Writes `G(prev, reference)` into `self`, or XORs it into the current
    /// contents when `accumulate` is set (version 1.3, passes after the
    /// first).
    pub(crate) fn fill(&mut self, prev: &Block, reference: &Block, accumulate: bool) {
        let next = Block::compress(prev, reference);
        if accumulate {
            self.xor_assign(&next);
        } else {
            self.0 = next.0;
        }
    }

    fn permute_rows(&mut self) {
        for row in self.0.chunks_exact_mut(16) {
            let mut v: [u64; 16] = core::array::from_fn(|i| row[i]);
            permute_p(&mut v);
            row.copy_from_slice(&v);
        }
    }

    fn permute_columns(&mut self) {
        for col in 0..8 {
            let index = |k: usize| 2 * col + 16 * (k / 2) + (k % 2);

            let mut v: [u64; 16] = core::array::from_fn(|k| self.0[index(k)]);
            permute_p(&mut v);
            for (k, word) in v.iter().enumerate() {
                self.0[index(k)] = *word;
            }
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl core::fmt::Debug for Block {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Block([..; 128])")
    }
}

/// Generator of pseudo-random reference addresses for data-independent
/// segments.
///
/// Each refresh computes `G(0, G(0, Z))`, where `Z` encodes the segment
/// position, the total block count, the number of passes, the variant and a
/// counter incremented on every refresh. One refresh yields 128 values.
pub(crate) struct AddressGenerator {
    input: Block,
    addresses: Block,
}

impl AddressGenerator {
    pub(crate) fn new(pass: u32, lane: u32, slice: u32, total_blocks: u32, passes: u32, variant: Variant) -> Self {
        let mut input = Block::ZERO;
        input.0[0] = pass as u64;
        input.0[1] = lane as u64;
        input.0[2] = slice as u64;
        input.0[3] = total_blocks as u64;
        input.0[4] = passes as u64;
        input.0[5] = variant as u64;

        Self {
            input,
            addresses: Block::ZERO,
        }
    }

    /// Produces the next 128 addresses.
    pub(crate) fn refresh(&mut self) {
        self.input.0[6] += 1;
        let tmp = Block::compress(&Block::ZERO, &self.input);
        self.addresses = Block::compress(&Block::ZERO, &tmp);
    }

    /// Address for position `index` of the current batch.
    #[inline]
    pub(crate) fn address(&self, index: usize) -> u64 {
        self.addresses.0[index % BLOCK_WORDS]
    }
}

/// Multiply-hardened addition: `a + b + 2 · lo32(a) · lo32(b)`.
#[inline(always)]
fn fblamka(a: u64, b: u64) -> u64 {
    let product = (a & 0xFFFF_FFFF).wrapping_mul(b & 0xFFFF_FFFF);
    a.wrapping_add(b).wrapping_add(product.wrapping_mul(2))
}

/// GB mixing function (Argon2 variant of BLAKE2b's G).
///
/// Rotation amounts are 32, 24, 16 and 63 bits, as in BLAKE2b; there are no
/// message words.
#[inline(always)]
fn gb(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize) {
    v[a] = fblamka(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = fblamka(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = fblamka(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = fblamka(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// P permutation: one BLAKE2b-style round over a 4×4 word matrix, columns
/// then diagonals.
#[inline(always)]
fn permute_p(v: &mut [u64; 16]) {
    gb(v, 0, 4, 8, 12);
    gb(v, 1, 5, 9, 13);
    gb(v, 2, 6, 10, 14);
    gb(v, 3, 7, 11, 15);

    gb(v, 0, 5, 10, 15);
    gb(v, 1, 6, 11, 12);
    gb(v, 2, 7, 8, 13);
    gb(v, 3, 4, 9, 14);
}
