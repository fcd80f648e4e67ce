//! BLAKE2b core state machine (RFC 7693).
//!
//! This module implements the incremental BLAKE2b compression machinery:
//! block buffering, the 128-bit byte counter, the finalisation flags and
//! the compression function F itself.
//!
//! It provides:
//! - [`Blake2bCore`], the raw `initialize` / `update` / `finish` state
//!   machine driven by an 8-word parameter block
//! - the compression function operating on 1024-bit blocks
//!
//! Parameter-block construction, keying and output truncation live one
//! level up in [`super::Blake2b`].

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::Blake2bError;

/// Size of one compression block in bytes.
pub const BLOCK_BYTES: usize = 128;

/// Size of the full internal digest in bytes.
pub const OUT_BYTES: usize = 64;

const ROUNDS: usize = 12;

/// BLAKE2b initialisation vector (same words as the SHA-512 IV).
pub(crate) const IV: [u64; 8] = [
    0x6A09_E667_F3BC_C908,
    0xBB67_AE85_84CA_A73B,
    0x3C6E_F372_FE94_F82B,
    0xA54F_F53A_5F1D_36F1,
    0x510E_527F_ADE6_82D1,
    0x9B05_688C_2B3E_6C1F,
    0x1F83_D9AB_FB41_BD6B,
    0x5BE0_CD19_137E_2179,
];

/// Message word permutation schedule, one row per round.
const SIGMA: [[usize; 16]; ROUNDS] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

/// Incremental BLAKE2b state.
///
/// The lifecycle is strictly `initialize` → `update`* → `finish`. Calling
/// `update` or `finish` on a state that was never initialised, or that has
/// already been finished, is a programming error and panics. Re-running
/// `initialize` makes the state usable again.
///
/// All fields are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Blake2bCore {
    /// Pending input not yet compressed.
    buf: [u8; BLOCK_BYTES],
    /// Number of valid bytes in `buf`.
    buf_len: usize,
    /// Message schedule of the block being compressed.
    m: [u64; 16],
    /// Chain value.
    h: [u64; 8],
    /// Byte counter, low word.
    t0: u64,
    /// Byte counter, high word.
    t1: u64,
    /// Final-block flag.
    f0: u64,
    /// Last-node flag (tree hashing only).
    f1: u64,
    last_node: bool,
    initialized: bool,
    finished: bool,
}

impl Blake2bCore {
    /// Creates an uninitialised state.
    pub fn new() -> Self {
        Self {
            buf: [0u8; BLOCK_BYTES],
            buf_len: 0,
            m: [0u64; 16],
            h: [0u64; 8],
            t0: 0,
            t1: 0,
            f0: 0,
            f1: 0,
            last_node: false,
            initialized: false,
            finished: false,
        }
    }

    /// Resets the state for a new message.
    ///
    /// The chain value becomes the IV XORed with the 8-word parameter block
    /// (digest length, key length, fan-out, depth, leaf length, node offset,
    /// node depth, inner length, salt and personalization).
    pub fn initialize(&mut self, config: &[u64; 8]) {
        for ((h, iv), p) in self.h.iter_mut().zip(IV).zip(config) {
            *h = iv ^ p;
        }

        self.buf.zeroize();
        self.m.zeroize();
        self.buf_len = 0;
        self.t0 = 0;
        self.t1 = 0;
        self.f0 = 0;
        self.f1 = 0;
        self.initialized = true;
        self.finished = false;
    }

    /// Marks the message as the last node of a tree layer.
    ///
    /// When set, finalisation also raises the second flag word. Has no
    /// meaning for sequential hashing.
    pub fn set_last_node(&mut self, last_node: bool) {
        self.last_node = last_node;
    }

    /// Absorbs `data`.
    ///
    /// The final block (even a full one) always stays buffered, because it
    /// must be compressed with the finalisation flag set.
    ///
    /// # Panics
    /// Panics if the state is not initialised or already finished.
    pub fn update(&mut self, data: &[u8]) {
        self.assert_live("update");

        if data.is_empty() {
            return;
        }

        let mut data = data;
        let fill = BLOCK_BYTES - self.buf_len;

        if data.len() > fill {
            self.buf[self.buf_len..].copy_from_slice(&data[..fill]);
            self.increment_counter(BLOCK_BYTES as u64);
            compress(&mut self.h, &mut self.m, &self.buf, self.t0, self.t1, 0, 0);
            self.buf_len = 0;
            data = &data[fill..];

            while data.len() > BLOCK_BYTES {
                let (block, rest) = data.split_at(BLOCK_BYTES);
                self.increment_counter(BLOCK_BYTES as u64);
                compress(&mut self.h, &mut self.m, as_block(block), self.t0, self.t1, 0, 0);
                data = rest;
            }
        }

        self.buf[self.buf_len..self.buf_len + data.len()].copy_from_slice(data);
        self.buf_len += data.len();
    }

    /// Absorbs `data[start..start + count]`.
    ///
    /// # Errors
    /// Returns [`Blake2bError::RangeOutOfBounds`] if the range does not lie
    /// within `data`.
    pub fn update_range(&mut self, data: &[u8], start: usize, count: usize) -> Result<(), Blake2bError> {
        let end = start
            .checked_add(count)
            .filter(|&end| end <= data.len())
            .ok_or(Blake2bError::RangeOutOfBounds {
                start,
                count,
                len: data.len(),
            })?;

        self.update(&data[start..end]);
        Ok(())
    }

    /// Finalises the message and returns the full 64-byte chain value.
    ///
    /// # Panics
    /// Panics if the state is not initialised or already finished.
    pub fn finish(&mut self) -> [u8; OUT_BYTES] {
        let mut out = [0u8; OUT_BYTES];
        self.finish_block(&mut out);
        out
    }

    /// Finalises the message into `out`, which must be exactly 64 bytes.
    ///
    /// # Errors
    /// Returns [`Blake2bError::OutputBufferSize`] for any other length. The
    /// state is left untouched in that case.
    pub fn finish_into(&mut self, out: &mut [u8]) -> Result<(), Blake2bError> {
        let actual = out.len();
        let out: &mut [u8; OUT_BYTES] = out
            .try_into()
            .map_err(|_| Blake2bError::OutputBufferSize {
                expected: OUT_BYTES,
                actual,
            })?;

        self.finish_block(out);
        Ok(())
    }

    fn finish_block(&mut self, out: &mut [u8; OUT_BYTES]) {
        self.assert_live("finish");

        self.increment_counter(self.buf_len as u64);
        self.f0 = u64::MAX;
        if self.last_node {
            self.f1 = u64::MAX;
        }

        self.buf[self.buf_len..].fill(0);
        compress(&mut self.h, &mut self.m, &self.buf, self.t0, self.t1, self.f0, self.f1);

        for (chunk, word) in out.chunks_exact_mut(8).zip(self.h) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }

        self.buf.zeroize();
        self.buf_len = 0;
        self.finished = true;
    }

    #[inline]
    fn increment_counter(&mut self, bytes: u64) {
        let (t0, carry) = self.t0.overflowing_add(bytes);
        self.t0 = t0;
        if carry {
            self.t1 = self.t1.wrapping_add(1);
        }
    }

    #[inline]
    fn assert_live(&self, operation: &str) {
        assert!(self.initialized, "blake2b: {operation} before initialize");
        assert!(!self.finished, "blake2b: {operation} after finish");
    }
}

impl Default for Blake2bCore {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn as_block(bytes: &[u8]) -> &[u8; BLOCK_BYTES] {
    // Callers always split off exactly one block.
    bytes
        .try_into()
        .unwrap_or_else(|_| unreachable!("block slice must be {BLOCK_BYTES} bytes"))
}

/// BLAKE2b mixing function G.
#[inline(always)]
fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// Compression function F (RFC 7693 §3.2).
///
/// Loads the block into the message schedule as little-endian words, runs
/// 12 rounds of G over the local working vector and folds the result back
/// into the chain value.
fn compress(
    h: &mut [u64; 8],
    m: &mut [u64; 16],
    block: &[u8; BLOCK_BYTES],
    t0: u64,
    t1: u64,
    f0: u64,
    f1: u64,
) {
    for (word, chunk) in m.iter_mut().zip(block.chunks_exact(8)) {
        *word = u64::from_le_bytes(core::array::from_fn(|i| chunk[i]));
    }

    let mut v = [0u64; 16];
    v[..8].copy_from_slice(h);
    v[8..].copy_from_slice(&IV);
    v[12] ^= t0;
    v[13] ^= t1;
    v[14] ^= f0;
    v[15] ^= f1;

    for s in &SIGMA {
        // Columns
        g(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
        g(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
        g(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
        g(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);

        // Diagonals
        g(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
        g(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
        g(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
        g(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
    }

    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }

    v.zeroize();
}
