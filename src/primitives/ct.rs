/// Constant-time comparison utilities.
///
/// This trait provides the equality primitive used when comparing digests
/// during verification. Implementations must ensure that execution time does
/// not depend on the contents being compared: every byte is visited and no
/// early exit is taken on the first difference.
pub trait ConstantTimeEq {
    /// Returns `true` if `self == other`, in constant time with respect to
    /// the contents.
    fn ct_eq(&self, other: &Self) -> bool;
}

impl ConstantTimeEq for [u8] {
    /// Constant-time equality test for byte slices.
    ///
    /// Slices of different lengths are unequal. The length check looks at the
    /// lengths only, never at the contents. For equal lengths, all bytes are
    /// XORed and accumulated before the single comparison at the end.
    #[inline(never)]
    fn ct_eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        let diff = self
            .iter()
            .zip(other)
            .fold(0u8, |acc, (a, b)| core::hint::black_box(acc | (a ^ b)));

        // 0 -> 1, anything else -> 0, without branching on `diff`.
        (((diff as u64).wrapping_sub(1) >> 63) as u8) == 1
    }
}

impl<const N: usize> ConstantTimeEq for [u8; N] {
    #[inline(always)]
    fn ct_eq(&self, other: &Self) -> bool {
        self.as_slice().ct_eq(other.as_slice())
    }
}
