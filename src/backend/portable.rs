//! Portable backend
//!
//! One backend per scalar type, generated by `portable_backend!`. The register
//! is a [`Lanes`] array aligned to the native vector width and the predicate a
//! [`Bitmask`]. Lane arithmetic is delegated to the element kind
//! ([`ArithmeticKind`]), so the per-type code only fixes the lane layout:
//! lane count, load/store, fill and the lane index table.
//!
//! This backend is always compiled. It serves every type that has no hardware
//! engine in the current build and is also the reference the hardware engines
//! are tested against.

use std::marker::PhantomData;

use num_traits::AsPrimitive;

use super::types::{Bitmask, Lanes};
use super::{Backend, FloatBackend, IntegerBackend};
use crate::config::{BackendFamily, VECTOR_BYTES};
use crate::kind::{ArithmeticKind, FloatKind, SignedKind, UnsignedKind};

/// Portable backend for scalar type `T`.
#[derive(Debug, Clone, Copy)]
pub struct Portable<T>(PhantomData<T>);

/// Lanes of `T` in one native register.
pub const fn lanes_of<T>() -> usize {
    VECTOR_BYTES / core::mem::size_of::<T>()
}

macro_rules! portable_backend {
    ($t:ty, $kind:ty) => {
        impl Backend for Portable<$t> {
            type Scalar = $t;
            type Register = Lanes<$t, { lanes_of::<$t>() }>;
            type Predicate = Bitmask;

            const LANES: usize = lanes_of::<$t>();
            const FAMILY: BackendFamily = BackendFamily::Portable;

            // ===== Constants =====

            #[inline]
            fn lane_index() -> Self::Register {
                lazy_static::lazy_static! {
                    static ref LANE_INDEX: Lanes<$t, { lanes_of::<$t>() }> = {
                        log::debug!(
                            "portable: initialised {}-lane index table for {}",
                            lanes_of::<$t>(),
                            stringify!($t)
                        );
                        Lanes::from_fn(|i| i as $t)
                    };
                }
                *LANE_INDEX
            }

            #[inline(always)]
            fn all_true() -> Self::Predicate {
                Bitmask::all(Self::LANES)
            }

            // ===== Memory Operations =====

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> Self::Register {
                unsafe { core::ptr::read_unaligned(ptr as *const Self::Register) }
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $t) -> Self::Register {
                unsafe { core::ptr::read(ptr as *const Self::Register) }
            }

            #[inline(always)]
            unsafe fn store(reg: Self::Register, ptr: *mut $t) {
                unsafe { core::ptr::write_unaligned(ptr as *mut Self::Register, reg) }
            }

            #[inline(always)]
            unsafe fn store_aligned(reg: Self::Register, ptr: *mut $t) {
                unsafe { core::ptr::write(ptr as *mut Self::Register, reg) }
            }

            #[inline(always)]
            fn fill(value: $t) -> Self::Register {
                Lanes([value; lanes_of::<$t>()])
            }

            // ===== Arithmetic =====

            #[inline(always)]
            fn add(a: Self::Register, b: Self::Register) -> Self::Register {
                a.zip_map(b, <$kind as ArithmeticKind<$t>>::add)
            }

            #[inline(always)]
            fn sub(a: Self::Register, b: Self::Register) -> Self::Register {
                a.zip_map(b, <$kind as ArithmeticKind<$t>>::sub)
            }

            #[inline(always)]
            fn mul(a: Self::Register, b: Self::Register) -> Self::Register {
                a.zip_map(b, <$kind as ArithmeticKind<$t>>::mul)
            }

            #[inline(always)]
            fn div(a: Self::Register, b: Self::Register) -> Self::Register {
                a.zip_map(b, <$kind as ArithmeticKind<$t>>::div)
            }

            #[inline(always)]
            fn min(a: Self::Register, b: Self::Register) -> Self::Register {
                a.zip_map(b, <$kind as ArithmeticKind<$t>>::min)
            }

            #[inline(always)]
            fn max(a: Self::Register, b: Self::Register) -> Self::Register {
                a.zip_map(b, <$kind as ArithmeticKind<$t>>::max)
            }

            #[inline(always)]
            fn abs(a: Self::Register) -> Self::Register {
                a.map(<$kind as ArithmeticKind<$t>>::abs)
            }

            // ===== Comparison =====

            #[inline(always)]
            fn equal(a: Self::Register, b: Self::Register) -> Bitmask {
                a.compare(b, <$kind as ArithmeticKind<$t>>::eq)
            }

            #[inline(always)]
            fn not_equal(a: Self::Register, b: Self::Register) -> Bitmask {
                a.compare(b, <$kind as ArithmeticKind<$t>>::ne)
            }

            #[inline(always)]
            fn greater_than(a: Self::Register, b: Self::Register) -> Bitmask {
                a.compare(b, <$kind as ArithmeticKind<$t>>::gt)
            }

            #[inline(always)]
            fn greater_eq(a: Self::Register, b: Self::Register) -> Bitmask {
                a.compare(b, <$kind as ArithmeticKind<$t>>::ge)
            }

            #[inline(always)]
            fn less_than(a: Self::Register, b: Self::Register) -> Bitmask {
                a.compare(b, <$kind as ArithmeticKind<$t>>::lt)
            }

            #[inline(always)]
            fn less_eq(a: Self::Register, b: Self::Register) -> Bitmask {
                a.compare(b, <$kind as ArithmeticKind<$t>>::le)
            }

            // ===== Reduction =====

            #[inline]
            fn reduce_sum(a: Self::Register) -> $t {
                a.0.iter()
                    .fold(0 as $t, |acc, &x| <$kind as ArithmeticKind<$t>>::add(acc, x))
            }

            #[inline]
            fn reduce_min(a: Self::Register) -> $t {
                a.0[1..]
                    .iter()
                    .fold(a.0[0], |acc, &x| <$kind as ArithmeticKind<$t>>::min(acc, x))
            }

            #[inline]
            fn reduce_max(a: Self::Register) -> $t {
                a.0[1..]
                    .iter()
                    .fold(a.0[0], |acc, &x| <$kind as ArithmeticKind<$t>>::max(acc, x))
            }

            // ===== Lane Access =====

            #[inline(always)]
            fn lane_get(a: Self::Register, index: usize) -> $t {
                a.0[index]
            }

            #[inline(always)]
            fn lane_set(a: Self::Register, index: usize, value: $t) -> Self::Register {
                // `index` narrows to the lane type; callers keep it below LANES.
                let hot = Self::equal(Self::lane_index(), Self::fill(index as $t));
                Self::select(hot, Self::fill(value), a)
            }

            // ===== Select / Gather =====

            #[inline(always)]
            fn select(pred: Bitmask, t: Self::Register, f: Self::Register) -> Self::Register {
                Lanes::from_fn(|i| if pred.test(i) { t.0[i] } else { f.0[i] })
            }

            #[inline]
            fn gather<I>(a: Self::Register, indices: I::Register) -> Self::Register
            where
                I: Backend,
                I::Scalar: AsPrimitive<usize>,
            {
                debug_assert_eq!(I::LANES, Self::LANES);
                Lanes::from_fn(|i| a.0[I::lane_get(indices, i).as_()])
            }

            // ===== Predicate Algebra =====

            #[inline(always)]
            fn pred_splat(value: bool) -> Bitmask {
                if value { Self::all_true() } else { Bitmask(0) }
            }

            #[inline(always)]
            fn pred_and(a: Bitmask, b: Bitmask) -> Bitmask {
                Bitmask(a.0 & b.0)
            }

            #[inline(always)]
            fn pred_or(a: Bitmask, b: Bitmask) -> Bitmask {
                Bitmask(a.0 | b.0)
            }

            #[inline(always)]
            fn pred_xor(a: Bitmask, b: Bitmask) -> Bitmask {
                Bitmask(a.0 ^ b.0)
            }

            #[inline(always)]
            fn pred_not(a: Bitmask) -> Bitmask {
                Bitmask(!a.0 & Self::all_true().0)
            }

            #[inline(always)]
            fn pred_and_not(a: Bitmask, b: Bitmask) -> Bitmask {
                Bitmask(a.0 & !b.0)
            }

            #[inline(always)]
            fn pred_count(a: Bitmask) -> usize {
                a.0.count_ones() as usize
            }
        }
    };
}

macro_rules! portable_integer_backend {
    ($($t:ty),*) => {$(
        impl IntegerBackend for Portable<$t> {
            #[inline(always)]
            fn bit_and(a: Self::Register, b: Self::Register) -> Self::Register {
                a.zip_map(b, |x, y| x & y)
            }

            #[inline(always)]
            fn bit_or(a: Self::Register, b: Self::Register) -> Self::Register {
                a.zip_map(b, |x, y| x | y)
            }

            #[inline(always)]
            fn bit_xor(a: Self::Register, b: Self::Register) -> Self::Register {
                a.zip_map(b, |x, y| x ^ y)
            }
        }
    )*};
}

macro_rules! portable_float_backend {
    ($($t:ty),*) => {$(
        impl FloatBackend for Portable<$t> {
            #[inline(always)]
            fn sqrt(a: Self::Register) -> Self::Register {
                a.map(<$t>::sqrt)
            }
        }
    )*};
}

portable_backend!(i8, SignedKind);
portable_backend!(i16, SignedKind);
portable_backend!(i32, SignedKind);
portable_backend!(i64, SignedKind);
portable_backend!(u8, UnsignedKind);
portable_backend!(u16, UnsignedKind);
portable_backend!(u32, UnsignedKind);
portable_backend!(u64, UnsignedKind);
portable_backend!(f32, FloatKind);
portable_backend!(f64, FloatKind);

portable_integer_backend!(i8, i16, i32, i64, u8, u16, u32, u64);
portable_float_backend!(f32, f64);

// ============================================================================
// UNIT TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    type I16 = Portable<i16>;
    type U8 = Portable<u8>;
    type F64 = Portable<f64>;

    fn iota_i16() -> <I16 as Backend>::Register {
        I16::lane_index()
    }

    #[test]
    fn test_lane_index_counts_up() {
        let idx = iota_i16();
        for i in 0..I16::LANES {
            assert_eq!(I16::lane_get(idx, i), i as i16);
        }
    }

    #[test]
    fn test_load_store_roundtrip_unaligned() {
        let data: Vec<u8> = (0..=U8::LANES as u8).collect();
        // Offset by one element to force an unaligned address.
        let reg = unsafe { U8::load(data.as_ptr().add(1)) };
        let mut out = vec![0u8; U8::LANES];
        unsafe { U8::store(reg, out.as_mut_ptr()) };
        assert_eq!(&out[..], &data[1..]);
    }

    #[test]
    fn test_unsigned_compare_does_not_sign_extend() {
        let big = U8::fill(200);
        let small = U8::fill(100);
        assert_eq!(U8::pred_count(U8::greater_than(big, small)), U8::LANES);
        assert_eq!(U8::pred_count(U8::less_than(big, small)), 0);
    }

    #[test]
    fn test_lane_set_only_touches_one_lane() {
        let reg = I16::lane_set(I16::fill(0), 1, 42);
        assert_eq!(I16::lane_get(reg, 0), 0);
        assert_eq!(I16::lane_get(reg, 1), 42);
        assert_eq!(I16::reduce_sum(reg), 42);
    }

    #[test]
    fn test_lane_set_hits_every_lane() {
        for i in 0..F64::LANES {
            let reg = F64::lane_set(F64::fill(0.0), i, -1.0);
            let hot = F64::equal(F64::lane_index(), F64::fill(i as f64));
            assert_eq!(F64::equal(reg, F64::fill(-1.0)), hot);
        }
        for i in 0..U8::LANES {
            let reg = U8::lane_set(U8::fill(7), i, 200);
            assert_eq!(U8::lane_get(reg, i), 200);
            assert_eq!(U8::pred_count(U8::equal(reg, U8::fill(7))), U8::LANES - 1);
        }
    }

    #[test]
    fn test_lane_set_past_end_is_noop() {
        let reg = I16::lane_set(I16::fill(3), I16::LANES + 5, 42);
        assert_eq!(I16::pred_count(I16::equal(reg, I16::fill(3))), I16::LANES);
    }

    #[test]
    fn test_reductions() {
        let idx = iota_i16();
        let n = I16::LANES as i16;
        assert_eq!(I16::reduce_sum(idx), n * (n - 1) / 2);
        assert_eq!(I16::reduce_min(idx), 0);
        assert_eq!(I16::reduce_max(idx), n - 1);
    }

    #[test]
    fn test_predicate_not_stays_within_lanes() {
        let none = F64::pred_splat(false);
        assert_eq!(F64::pred_count(F64::pred_not(none)), F64::LANES);
        assert_eq!(F64::pred_not(none), F64::all_true());
    }

    #[test]
    fn test_gather_reverses_lanes() {
        let n = U8::LANES;
        let rev = Portable::<u8>::fill(0);
        let rev = (0..n).fold(rev, |r, i| U8::lane_set(r, i, (n - 1 - i) as u8));
        let out = U8::gather::<U8>(U8::lane_index(), rev);
        for i in 0..n {
            assert_eq!(U8::lane_get(out, i), (n - 1 - i) as u8);
        }
    }

    #[test]
    fn test_float_sqrt_and_abs() {
        let v = F64::fill(-4.0);
        assert_eq!(F64::lane_get(F64::abs(v), 0), 4.0);
        assert!(F64::lane_get(F64::sqrt(v), 0).is_nan());
        assert_eq!(F64::lane_get(F64::sqrt(F64::abs(v)), 0), 2.0);
    }

    #[test]
    fn test_integer_bitwise() {
        let a = U8::fill(0b1100);
        let b = U8::fill(0b1010);
        assert_eq!(U8::lane_get(U8::bit_and(a, b), 0), 0b1000);
        assert_eq!(U8::lane_get(U8::bit_or(a, b), 0), 0b1110);
        assert_eq!(U8::lane_get(U8::bit_xor(a, b), 0), 0b0110);
    }
}
