//! Register and predicate types shared by the backends
//!
//! This module provides the small portability layer the backends build on:
//!
//! - `simd_arch` re-exports `std::arch::x86_64` on x86_64 so the hardware
//!   engines can refer to intrinsics uniformly.
//! - [`Lanes`] is the register type of the portable backend: a plain lane
//!   array whose alignment equals the native vector width, so that a
//!   `VectorAligned` access can read it in one piece.
//! - [`Bitmask`] is the predicate type of the portable backend: bit `i` holds
//!   lane `i`. The widest configuration (512-bit registers of 8-bit lanes)
//!   needs 64 lanes, which is exactly one `u64`.

#[cfg(target_arch = "x86_64")]
pub use std::arch::x86_64 as simd_arch;

/// Portable register: `N` lanes of `T` aligned to the native vector width.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(not(any(feature = "width-256", feature = "width-512")), repr(align(16)))]
#[cfg_attr(all(feature = "width-256", not(feature = "width-512")), repr(align(32)))]
#[cfg_attr(feature = "width-512", repr(align(64)))]
pub struct Lanes<T, const N: usize>(pub [T; N]);

impl<T: Copy, const N: usize> Lanes<T, N> {
    /// Build a register by evaluating `f` once per lane, lane 0 first.
    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self(core::array::from_fn(f))
    }

    /// Combine two registers lane by lane.
    #[inline(always)]
    pub fn zip_map(self, other: Self, mut f: impl FnMut(T, T) -> T) -> Self {
        Self(core::array::from_fn(|i| f(self.0[i], other.0[i])))
    }

    /// Apply `f` to every lane.
    #[inline(always)]
    pub fn map(self, mut f: impl FnMut(T) -> T) -> Self {
        Self(core::array::from_fn(|i| f(self.0[i])))
    }

    /// Build a predicate from a lane-wise test of two registers.
    #[inline(always)]
    pub fn compare(self, other: Self, mut f: impl FnMut(T, T) -> bool) -> Bitmask {
        let mut bits = 0u64;
        for i in 0..N {
            if f(self.0[i], other.0[i]) {
                bits |= 1 << i;
            }
        }
        Bitmask(bits)
    }
}

/// Portable predicate: one bit per lane, lane 0 in the least significant bit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct Bitmask(pub u64);

impl Bitmask {
    /// Predicate with the low `lanes` bits set.
    #[inline(always)]
    pub const fn all(lanes: usize) -> Self {
        if lanes >= 64 {
            Bitmask(u64::MAX)
        } else {
            Bitmask((1u64 << lanes) - 1)
        }
    }

    /// Whether lane `lane` is set.
    #[inline(always)]
    pub const fn test(self, lane: usize) -> bool {
        (self.0 >> lane) & 1 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmask_all_covers_full_word() {
        assert_eq!(Bitmask::all(4).0, 0b1111);
        assert_eq!(Bitmask::all(64).0, u64::MAX);
        assert_eq!(Bitmask::all(0).0, 0);
    }

    #[test]
    fn test_lanes_compare_sets_matching_bits() {
        let a = Lanes([1i32, 5, 3, 7]);
        let b = Lanes([2i32, 4, 3, 8]);
        let lt = a.compare(b, |x, y| x < y);
        assert_eq!(lt.0, 0b1001);
        assert!(lt.test(0));
        assert!(!lt.test(1));
    }

    #[test]
    fn test_lanes_alignment_matches_vector_width() {
        assert_eq!(
            core::mem::align_of::<Lanes<u8, 4>>(),
            crate::config::VECTOR_BYTES
        );
    }
}
