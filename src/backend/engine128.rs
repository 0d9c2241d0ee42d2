//! 128‑bit SSE2 engines (x86_64)
//!
//! Hardware backends for `f32` (4 lanes), `f64` (2 lanes) and `i32` (4 lanes)
//! built directly on `std::arch::x86_64` SSE2 intrinsics. SSE2 is part of the
//! x86_64 baseline, so no runtime feature detection is needed; the engines are
//! compiled whenever the build targets x86_64 with the 128-bit width (see
//! `build.rs`).
//!
//! Highlights
//! - Predicates are register-typed lane masks (all ones / all zeros), exactly
//!   what the SSE2 compare instructions produce; `pred_count` folds them with
//!   `movemask` + `count_ones`.
//! - Horizontal reductions use two shuffle + op steps.
//! - Operations SSE2 lacks are emulated by the shims at the bottom of this
//!   file: 32-bit lane multiply (two `pmuludq`), signed 32-bit min/max
//!   (compare + blend), NaN-skipping float min/max (unordered compare + blend),
//!   integer division and runtime-index gather (store to a temporary array,
//!   compute per lane, reload).
//!
//! Safety
//! - Loads and stores dereference raw pointers; the caller guarantees
//!   `LANES` valid elements and, for the aligned forms, 16-byte alignment.

#![allow(unused_unsafe)]

use num_traits::AsPrimitive;

use super::types::simd_arch::{self, __m128, __m128d, __m128i};
use super::{Backend, FloatBackend, IntegerBackend};
use crate::config::BackendFamily;

/// SSE2 engine for `f32`: 4 lanes in an `__m128`.
#[derive(Clone, Copy, Debug)]
pub struct Sse2F32;

/// SSE2 engine for `f64`: 2 lanes in an `__m128d`.
#[derive(Clone, Copy, Debug)]
pub struct Sse2F64;

/// SSE2 engine for `i32`: 4 lanes in an `__m128i`.
#[derive(Clone, Copy, Debug)]
pub struct Sse2I32;

// ============================================================================
// f32 x 4
// ============================================================================

impl Backend for Sse2F32 {
    type Scalar = f32;
    type Register = __m128;
    type Predicate = __m128;

    const LANES: usize = 4; // 128 bits ÷ 32 bits
    const FAMILY: BackendFamily = BackendFamily::Sse2;

    // ===== Constants =====

    #[inline]
    fn lane_index() -> __m128 {
        lazy_static::lazy_static! {
            static ref LANE_INDEX: __m128 = {
                log::debug!("SSE2: initialised 4-lane index table for f32");
                unsafe { simd_arch::_mm_setr_ps(0.0, 1.0, 2.0, 3.0) }
            };
        }
        *LANE_INDEX
    }

    #[inline]
    fn all_true() -> __m128 {
        lazy_static::lazy_static! {
            static ref ALL_TRUE: __m128 = unsafe {
                simd_arch::_mm_castsi128_ps(simd_arch::_mm_set1_epi32(-1))
            };
        }
        *ALL_TRUE
    }

    // ===== Memory Operations =====

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> __m128 {
        unsafe { simd_arch::_mm_loadu_ps(ptr) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> __m128 {
        unsafe { simd_arch::_mm_load_ps(ptr) }
    }

    #[inline(always)]
    unsafe fn store(reg: __m128, ptr: *mut f32) {
        unsafe { simd_arch::_mm_storeu_ps(ptr, reg) }
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m128, ptr: *mut f32) {
        unsafe { simd_arch::_mm_store_ps(ptr, reg) }
    }

    #[inline(always)]
    fn fill(value: f32) -> __m128 {
        unsafe { simd_arch::_mm_set1_ps(value) }
    }

    // ===== Arithmetic =====

    #[inline(always)]
    fn add(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_add_ps(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_sub_ps(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_mul_ps(a, b) }
    }

    #[inline(always)]
    fn div(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_div_ps(a, b) }
    }

    // A NaN lane loses to a number in either operand position.
    #[inline(always)]
    fn min(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_min_ps(a, skip_nan_ps(a, b)) }
    }

    #[inline(always)]
    fn max(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_max_ps(a, skip_nan_ps(a, b)) }
    }

    #[inline(always)]
    fn abs(a: __m128) -> __m128 {
        unsafe { simd_arch::_mm_andnot_ps(simd_arch::_mm_set1_ps(-0.0), a) }
    }

    // ===== Comparison =====

    #[inline(always)]
    fn equal(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_cmpeq_ps(a, b) }
    }

    #[inline(always)]
    fn not_equal(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_cmpneq_ps(a, b) }
    }

    #[inline(always)]
    fn greater_than(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_cmpgt_ps(a, b) }
    }

    #[inline(always)]
    fn greater_eq(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_cmpge_ps(a, b) }
    }

    #[inline(always)]
    fn less_than(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_cmplt_ps(a, b) }
    }

    #[inline(always)]
    fn less_eq(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_cmple_ps(a, b) }
    }

    // ===== Reduction =====

    #[inline]
    fn reduce_sum(a: __m128) -> f32 {
        unsafe {
            let pairs = simd_arch::_mm_add_ps(a, simd_arch::_mm_movehl_ps(a, a));
            let lane1 = simd_arch::_mm_shuffle_ps::<0b01>(pairs, pairs);
            simd_arch::_mm_cvtss_f32(simd_arch::_mm_add_ss(pairs, lane1))
        }
    }

    #[inline]
    fn reduce_min(a: __m128) -> f32 {
        unsafe {
            let pairs = Self::min(a, simd_arch::_mm_movehl_ps(a, a));
            let lane1 = simd_arch::_mm_shuffle_ps::<0b01>(pairs, pairs);
            simd_arch::_mm_cvtss_f32(Self::min(pairs, lane1))
        }
    }

    #[inline]
    fn reduce_max(a: __m128) -> f32 {
        unsafe {
            let pairs = Self::max(a, simd_arch::_mm_movehl_ps(a, a));
            let lane1 = simd_arch::_mm_shuffle_ps::<0b01>(pairs, pairs);
            simd_arch::_mm_cvtss_f32(Self::max(pairs, lane1))
        }
    }

    // ===== Lane Access =====

    #[inline]
    fn lane_get(a: __m128, index: usize) -> f32 {
        // Store to a temporary array; extract intrinsics need an immediate.
        let mut tmp = [0f32; 4];
        unsafe { simd_arch::_mm_storeu_ps(tmp.as_mut_ptr(), a) };
        tmp[index]
    }

    #[inline]
    fn lane_set(a: __m128, index: usize, value: f32) -> __m128 {
        let hot = Self::equal(Self::lane_index(), Self::fill(index as f32));
        Self::select(hot, Self::fill(value), a)
    }

    // ===== Select / Gather =====

    #[inline(always)]
    fn select(pred: __m128, t: __m128, f: __m128) -> __m128 {
        unsafe {
            simd_arch::_mm_or_ps(
                simd_arch::_mm_and_ps(pred, t),
                simd_arch::_mm_andnot_ps(pred, f),
            )
        }
    }

    #[inline]
    fn gather<I>(a: __m128, indices: I::Register) -> __m128
    where
        I: Backend,
        I::Scalar: AsPrimitive<usize>,
    {
        let mut src = [0f32; 4];
        unsafe { simd_arch::_mm_storeu_ps(src.as_mut_ptr(), a) };
        let out: [f32; 4] = core::array::from_fn(|i| src[I::lane_get(indices, i).as_()]);
        unsafe { simd_arch::_mm_loadu_ps(out.as_ptr()) }
    }

    // ===== Predicate Algebra =====

    #[inline(always)]
    fn pred_splat(value: bool) -> __m128 {
        if value {
            Self::all_true()
        } else {
            unsafe { simd_arch::_mm_setzero_ps() }
        }
    }

    #[inline(always)]
    fn pred_and(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_and_ps(a, b) }
    }

    #[inline(always)]
    fn pred_or(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_or_ps(a, b) }
    }

    #[inline(always)]
    fn pred_xor(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_xor_ps(a, b) }
    }

    #[inline(always)]
    fn pred_not(a: __m128) -> __m128 {
        unsafe { simd_arch::_mm_xor_ps(a, Self::all_true()) }
    }

    #[inline(always)]
    fn pred_and_not(a: __m128, b: __m128) -> __m128 {
        unsafe { simd_arch::_mm_andnot_ps(b, a) }
    }

    #[inline(always)]
    fn pred_count(a: __m128) -> usize {
        unsafe { simd_arch::_mm_movemask_ps(a) }.count_ones() as usize
    }
}

impl FloatBackend for Sse2F32 {
    #[inline(always)]
    fn sqrt(a: __m128) -> __m128 {
        unsafe { simd_arch::_mm_sqrt_ps(a) }
    }
}

// ============================================================================
// f64 x 2
// ============================================================================

impl Backend for Sse2F64 {
    type Scalar = f64;
    type Register = __m128d;
    type Predicate = __m128d;

    const LANES: usize = 2; // 128 bits ÷ 64 bits
    const FAMILY: BackendFamily = BackendFamily::Sse2;

    // ===== Constants =====

    #[inline]
    fn lane_index() -> __m128d {
        lazy_static::lazy_static! {
            static ref LANE_INDEX: __m128d = {
                log::debug!("SSE2: initialised 2-lane index table for f64");
                unsafe { simd_arch::_mm_setr_pd(0.0, 1.0) }
            };
        }
        *LANE_INDEX
    }

    #[inline]
    fn all_true() -> __m128d {
        lazy_static::lazy_static! {
            static ref ALL_TRUE: __m128d = unsafe {
                simd_arch::_mm_castsi128_pd(simd_arch::_mm_set1_epi32(-1))
            };
        }
        *ALL_TRUE
    }

    // ===== Memory Operations =====

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> __m128d {
        unsafe { simd_arch::_mm_loadu_pd(ptr) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> __m128d {
        unsafe { simd_arch::_mm_load_pd(ptr) }
    }

    #[inline(always)]
    unsafe fn store(reg: __m128d, ptr: *mut f64) {
        unsafe { simd_arch::_mm_storeu_pd(ptr, reg) }
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m128d, ptr: *mut f64) {
        unsafe { simd_arch::_mm_store_pd(ptr, reg) }
    }

    #[inline(always)]
    fn fill(value: f64) -> __m128d {
        unsafe { simd_arch::_mm_set1_pd(value) }
    }

    // ===== Arithmetic =====

    #[inline(always)]
    fn add(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_add_pd(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_sub_pd(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_mul_pd(a, b) }
    }

    #[inline(always)]
    fn div(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_div_pd(a, b) }
    }

    #[inline(always)]
    fn min(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_min_pd(a, skip_nan_pd(a, b)) }
    }

    #[inline(always)]
    fn max(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_max_pd(a, skip_nan_pd(a, b)) }
    }

    #[inline(always)]
    fn abs(a: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_andnot_pd(simd_arch::_mm_set1_pd(-0.0), a) }
    }

    // ===== Comparison =====

    #[inline(always)]
    fn equal(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_cmpeq_pd(a, b) }
    }

    #[inline(always)]
    fn not_equal(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_cmpneq_pd(a, b) }
    }

    #[inline(always)]
    fn greater_than(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_cmpgt_pd(a, b) }
    }

    #[inline(always)]
    fn greater_eq(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_cmpge_pd(a, b) }
    }

    #[inline(always)]
    fn less_than(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_cmplt_pd(a, b) }
    }

    #[inline(always)]
    fn less_eq(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_cmple_pd(a, b) }
    }

    // ===== Reduction =====

    #[inline]
    fn reduce_sum(a: __m128d) -> f64 {
        unsafe {
            let high = simd_arch::_mm_unpackhi_pd(a, a);
            simd_arch::_mm_cvtsd_f64(simd_arch::_mm_add_sd(a, high))
        }
    }

    #[inline]
    fn reduce_min(a: __m128d) -> f64 {
        unsafe {
            let high = simd_arch::_mm_unpackhi_pd(a, a);
            simd_arch::_mm_cvtsd_f64(Self::min(a, high))
        }
    }

    #[inline]
    fn reduce_max(a: __m128d) -> f64 {
        unsafe {
            let high = simd_arch::_mm_unpackhi_pd(a, a);
            simd_arch::_mm_cvtsd_f64(Self::max(a, high))
        }
    }

    // ===== Lane Access =====

    #[inline]
    fn lane_get(a: __m128d, index: usize) -> f64 {
        let mut tmp = [0f64; 2];
        unsafe { simd_arch::_mm_storeu_pd(tmp.as_mut_ptr(), a) };
        tmp[index]
    }

    #[inline]
    fn lane_set(a: __m128d, index: usize, value: f64) -> __m128d {
        let hot = Self::equal(Self::lane_index(), Self::fill(index as f64));
        Self::select(hot, Self::fill(value), a)
    }

    // ===== Select / Gather =====

    #[inline(always)]
    fn select(pred: __m128d, t: __m128d, f: __m128d) -> __m128d {
        unsafe {
            simd_arch::_mm_or_pd(
                simd_arch::_mm_and_pd(pred, t),
                simd_arch::_mm_andnot_pd(pred, f),
            )
        }
    }

    #[inline]
    fn gather<I>(a: __m128d, indices: I::Register) -> __m128d
    where
        I: Backend,
        I::Scalar: AsPrimitive<usize>,
    {
        let mut src = [0f64; 2];
        unsafe { simd_arch::_mm_storeu_pd(src.as_mut_ptr(), a) };
        let out: [f64; 2] = core::array::from_fn(|i| src[I::lane_get(indices, i).as_()]);
        unsafe { simd_arch::_mm_loadu_pd(out.as_ptr()) }
    }

    // ===== Predicate Algebra =====

    #[inline(always)]
    fn pred_splat(value: bool) -> __m128d {
        if value {
            Self::all_true()
        } else {
            unsafe { simd_arch::_mm_setzero_pd() }
        }
    }

    #[inline(always)]
    fn pred_and(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_and_pd(a, b) }
    }

    #[inline(always)]
    fn pred_or(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_or_pd(a, b) }
    }

    #[inline(always)]
    fn pred_xor(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_xor_pd(a, b) }
    }

    #[inline(always)]
    fn pred_not(a: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_xor_pd(a, Self::all_true()) }
    }

    #[inline(always)]
    fn pred_and_not(a: __m128d, b: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_andnot_pd(b, a) }
    }

    #[inline(always)]
    fn pred_count(a: __m128d) -> usize {
        unsafe { simd_arch::_mm_movemask_pd(a) }.count_ones() as usize
    }
}

impl FloatBackend for Sse2F64 {
    #[inline(always)]
    fn sqrt(a: __m128d) -> __m128d {
        unsafe { simd_arch::_mm_sqrt_pd(a) }
    }
}

// ============================================================================
// i32 x 4
// ============================================================================

impl Backend for Sse2I32 {
    type Scalar = i32;
    type Register = __m128i;
    type Predicate = __m128i;

    const LANES: usize = 4; // 128 bits ÷ 32 bits
    const FAMILY: BackendFamily = BackendFamily::Sse2;

    // ===== Constants =====

    #[inline]
    fn lane_index() -> __m128i {
        lazy_static::lazy_static! {
            static ref LANE_INDEX: __m128i = {
                log::debug!("SSE2: initialised 4-lane index table for i32");
                unsafe { simd_arch::_mm_setr_epi32(0, 1, 2, 3) }
            };
        }
        *LANE_INDEX
    }

    #[inline]
    fn all_true() -> __m128i {
        lazy_static::lazy_static! {
            static ref ALL_TRUE: __m128i = unsafe { simd_arch::_mm_set1_epi32(-1) };
        }
        *ALL_TRUE
    }

    // ===== Memory Operations =====

    #[inline(always)]
    unsafe fn load(ptr: *const i32) -> __m128i {
        unsafe { simd_arch::_mm_loadu_si128(ptr as *const __m128i) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const i32) -> __m128i {
        unsafe { simd_arch::_mm_load_si128(ptr as *const __m128i) }
    }

    #[inline(always)]
    unsafe fn store(reg: __m128i, ptr: *mut i32) {
        unsafe { simd_arch::_mm_storeu_si128(ptr as *mut __m128i, reg) }
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m128i, ptr: *mut i32) {
        unsafe { simd_arch::_mm_store_si128(ptr as *mut __m128i, reg) }
    }

    #[inline(always)]
    fn fill(value: i32) -> __m128i {
        unsafe { simd_arch::_mm_set1_epi32(value) }
    }

    // ===== Arithmetic =====

    #[inline(always)]
    fn add(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_add_epi32(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_sub_epi32(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m128i, b: __m128i) -> __m128i {
        mullo_epi32(a, b)
    }

    #[inline]
    fn div(a: __m128i, b: __m128i) -> __m128i {
        lanewise_epi32(a, b, |x, y| x / y)
    }

    #[inline(always)]
    fn min(a: __m128i, b: __m128i) -> __m128i {
        Self::select(Self::greater_than(a, b), b, a)
    }

    #[inline(always)]
    fn max(a: __m128i, b: __m128i) -> __m128i {
        Self::select(Self::greater_than(a, b), a, b)
    }

    // No pabsd before SSSE3.
    #[inline(always)]
    fn abs(a: __m128i) -> __m128i {
        let zero = unsafe { simd_arch::_mm_setzero_si128() };
        Self::select(Self::less_than(a, zero), Self::sub(zero, a), a)
    }

    // ===== Comparison =====

    #[inline(always)]
    fn equal(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_cmpeq_epi32(a, b) }
    }

    #[inline(always)]
    fn not_equal(a: __m128i, b: __m128i) -> __m128i {
        Self::pred_not(Self::equal(a, b))
    }

    #[inline(always)]
    fn greater_than(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_cmpgt_epi32(a, b) }
    }

    #[inline(always)]
    fn greater_eq(a: __m128i, b: __m128i) -> __m128i {
        Self::pred_not(Self::less_than(a, b))
    }

    #[inline(always)]
    fn less_than(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_cmplt_epi32(a, b) }
    }

    #[inline(always)]
    fn less_eq(a: __m128i, b: __m128i) -> __m128i {
        Self::pred_not(Self::greater_than(a, b))
    }

    // ===== Reduction =====

    #[inline]
    fn reduce_sum(a: __m128i) -> i32 {
        let halves = Self::add(a, swap_halves(a));
        let total = Self::add(halves, swap_pairs(halves));
        unsafe { simd_arch::_mm_cvtsi128_si32(total) }
    }

    #[inline]
    fn reduce_min(a: __m128i) -> i32 {
        let halves = Self::min(a, swap_halves(a));
        let total = Self::min(halves, swap_pairs(halves));
        unsafe { simd_arch::_mm_cvtsi128_si32(total) }
    }

    #[inline]
    fn reduce_max(a: __m128i) -> i32 {
        let halves = Self::max(a, swap_halves(a));
        let total = Self::max(halves, swap_pairs(halves));
        unsafe { simd_arch::_mm_cvtsi128_si32(total) }
    }

    // ===== Lane Access =====

    #[inline]
    fn lane_get(a: __m128i, index: usize) -> i32 {
        let mut tmp = [0i32; 4];
        unsafe { simd_arch::_mm_storeu_si128(tmp.as_mut_ptr() as *mut __m128i, a) };
        tmp[index]
    }

    #[inline]
    fn lane_set(a: __m128i, index: usize, value: i32) -> __m128i {
        let hot = Self::equal(Self::lane_index(), Self::fill(index as i32));
        Self::select(hot, Self::fill(value), a)
    }

    // ===== Select / Gather =====

    #[inline(always)]
    fn select(pred: __m128i, t: __m128i, f: __m128i) -> __m128i {
        unsafe {
            simd_arch::_mm_or_si128(
                simd_arch::_mm_and_si128(pred, t),
                simd_arch::_mm_andnot_si128(pred, f),
            )
        }
    }

    #[inline]
    fn gather<I>(a: __m128i, indices: I::Register) -> __m128i
    where
        I: Backend,
        I::Scalar: AsPrimitive<usize>,
    {
        let mut src = [0i32; 4];
        unsafe { simd_arch::_mm_storeu_si128(src.as_mut_ptr() as *mut __m128i, a) };
        let out: [i32; 4] = core::array::from_fn(|i| src[I::lane_get(indices, i).as_()]);
        unsafe { simd_arch::_mm_loadu_si128(out.as_ptr() as *const __m128i) }
    }

    // ===== Predicate Algebra =====

    #[inline(always)]
    fn pred_splat(value: bool) -> __m128i {
        if value {
            Self::all_true()
        } else {
            unsafe { simd_arch::_mm_setzero_si128() }
        }
    }

    #[inline(always)]
    fn pred_and(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_and_si128(a, b) }
    }

    #[inline(always)]
    fn pred_or(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_or_si128(a, b) }
    }

    #[inline(always)]
    fn pred_xor(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_xor_si128(a, b) }
    }

    #[inline(always)]
    fn pred_not(a: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_xor_si128(a, Self::all_true()) }
    }

    #[inline(always)]
    fn pred_and_not(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_andnot_si128(b, a) }
    }

    #[inline(always)]
    fn pred_count(a: __m128i) -> usize {
        unsafe { simd_arch::_mm_movemask_ps(simd_arch::_mm_castsi128_ps(a)) }.count_ones() as usize
    }
}

impl IntegerBackend for Sse2I32 {
    #[inline(always)]
    fn bit_and(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_and_si128(a, b) }
    }

    #[inline(always)]
    fn bit_or(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_or_si128(a, b) }
    }

    #[inline(always)]
    fn bit_xor(a: __m128i, b: __m128i) -> __m128i {
        unsafe { simd_arch::_mm_xor_si128(a, b) }
    }
}

// ============================================================================
// SHIMS FOR OPERATIONS MISSING FROM SSE2
// ============================================================================

/// Low 32 bits of each lane product (`pmulld` is SSE4.1).
///
/// `pmuludq` multiplies lanes 0 and 2; shifting each 64-bit half right by 32
/// brings lanes 1 and 3 into position for a second multiply. The low halves of
/// the four products are then interleaved back into lane order. The low 32
/// bits of a product are the same for signed and unsigned inputs.
#[inline(always)]
fn mullo_epi32(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let even = simd_arch::_mm_mul_epu32(a, b);
        let odd = simd_arch::_mm_mul_epu32(
            simd_arch::_mm_srli_epi64::<32>(a),
            simd_arch::_mm_srli_epi64::<32>(b),
        );
        simd_arch::_mm_unpacklo_epi32(
            simd_arch::_mm_shuffle_epi32::<0b00_00_10_00>(even),
            simd_arch::_mm_shuffle_epi32::<0b00_00_10_00>(odd),
        )
    }
}

/// `b` with its NaN lanes replaced by the matching lanes of `a`.
///
/// `minps`/`maxps` return the second operand when either lane is NaN, so
/// passing this as the second operand makes a single NaN lose to a number.
#[inline(always)]
fn skip_nan_ps(a: __m128, b: __m128) -> __m128 {
    unsafe {
        let nan = simd_arch::_mm_cmpunord_ps(b, b);
        simd_arch::_mm_or_ps(
            simd_arch::_mm_and_ps(nan, a),
            simd_arch::_mm_andnot_ps(nan, b),
        )
    }
}

#[inline(always)]
fn skip_nan_pd(a: __m128d, b: __m128d) -> __m128d {
    unsafe {
        let nan = simd_arch::_mm_cmpunord_pd(b, b);
        simd_arch::_mm_or_pd(
            simd_arch::_mm_and_pd(nan, a),
            simd_arch::_mm_andnot_pd(nan, b),
        )
    }
}

/// Lanes `[2, 3, 0, 1]`.
#[inline(always)]
fn swap_halves(a: __m128i) -> __m128i {
    unsafe { simd_arch::_mm_shuffle_epi32::<0b01_00_11_10>(a) }
}

/// Lanes `[1, 0, 3, 2]`.
#[inline(always)]
fn swap_pairs(a: __m128i) -> __m128i {
    unsafe { simd_arch::_mm_shuffle_epi32::<0b10_11_00_01>(a) }
}

/// Apply a scalar operation lane by lane (no SSE integer divide exists).
#[inline]
fn lanewise_epi32(a: __m128i, b: __m128i, f: impl Fn(i32, i32) -> i32) -> __m128i {
    let mut x = [0i32; 4];
    let mut y = [0i32; 4];
    unsafe {
        simd_arch::_mm_storeu_si128(x.as_mut_ptr() as *mut __m128i, a);
        simd_arch::_mm_storeu_si128(y.as_mut_ptr() as *mut __m128i, b);
    }
    let out: [i32; 4] = core::array::from_fn(|i| f(x[i], y[i]));
    unsafe { simd_arch::_mm_loadu_si128(out.as_ptr() as *const __m128i) }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
