//! Variable-length BLAKE2b (H', RFC 9106 §3.3).
//!
//! Argon2 needs digests longer than the 64 bytes BLAKE2b can produce: full
//! 1024-byte blocks when seeding each lane, and arbitrary tag lengths at
//! finalisation. H' chains BLAKE2b-512 invocations, emitting the first half
//! of each intermediate digest:
//!
//! ```text
//! T <= 64:  H'(X) = BLAKE2b-T(LE32(T) || X)
//! T >  64:  V1 = BLAKE2b-64(LE32(T) || X)
//!           Vi = BLAKE2b-64(V(i-1))            while > 64 bytes remain
//!           Vr = BLAKE2b-(remaining)(V(r-1))
//!           H'(X) = V1[..32] || V2[..32] || ... || Vr
//! ```

use zeroize::Zeroize;

use super::core::OUT_BYTES;
use super::{Blake2b, Blake2bError};

const HALF: usize = OUT_BYTES / 2;

/// Fills `out` with H' of the concatenation of `input` parts.
///
/// # Errors
/// Returns [`Blake2bError::OutputSize`] if `out` is empty or longer than
/// `u32::MAX` bytes.
pub fn blake2b_long_into(out: &mut [u8], input: &[&[u8]]) -> Result<(), Blake2bError> {
    let len_prefix = u32::try_from(out.len())
        .ok()
        .filter(|&len| len > 0)
        .ok_or(Blake2bError::OutputSize(out.len()))?
        .to_le_bytes();

    if out.len() <= OUT_BYTES {
        let mut hasher = Blake2b::new(out.len())?;
        hasher.update(&len_prefix);
        input.iter().for_each(|part| hasher.update(part));
        return hasher.finalize_into(out);
    }

    let mut v = [0u8; OUT_BYTES];

    let mut hasher = Blake2b::new(OUT_BYTES)?;
    hasher.update(&len_prefix);
    input.iter().for_each(|part| hasher.update(part));
    hasher.finalize_into(&mut v)?;

    out[..HALF].copy_from_slice(&v[..HALF]);
    let mut written = HALF;

    while out.len() - written > OUT_BYTES {
        let mut hasher = Blake2b::new(OUT_BYTES)?;
        hasher.update(&v);
        hasher.finalize_into(&mut v)?;

        out[written..written + HALF].copy_from_slice(&v[..HALF]);
        written += HALF;
    }

    let remaining = out.len() - written;
    let mut hasher = Blake2b::new(remaining)?;
    hasher.update(&v);
    hasher.finalize_into(&mut out[written..])?;

    v.zeroize();
    Ok(())
}

/// Computes H' of `input` with an output of `output_size` bytes.
pub fn blake2b_long(output_size: usize, input: &[u8]) -> Result<Vec<u8>, Blake2bError> {
    let mut out = vec![0u8; output_size];
    blake2b_long_into(&mut out, &[input])?;
    Ok(out)
}
