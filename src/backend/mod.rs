//! Backend table
//!
//! This module defines the seam between the public `Vector`/`Mask` value
//! types and the code that actually drives vector registers. Every supported
//! scalar type is bound (in `element.rs`) to exactly one [`Backend`]
//! implementation, chosen when the crate is compiled.
//!
//! ## Families
//!
//! - `portable`: one macro-generated backend per scalar type. Registers are
//!   aligned lane arrays ([`types::Lanes`]) and predicates are bitmasks
//!   ([`types::Bitmask`]). Works for every width and every target; the loops
//!   are simple enough for the compiler to lower to native vector code.
//! - `engine128`: SSE2 engines for `f32`, `f64` and `i32` on x86_64 with the
//!   128-bit width. Registers are `__m128`/`__m128d`/`__m128i` and predicates
//!   are all-ones/all-zeros lane masks of the same register type.
//!
//! Adding a hardware family means writing a new backend per scalar type and
//! pointing the type at it in `element.rs`; `Vector` and `Mask` do not change.
//!
//! ## Contract
//!
//! All operations are pure functions of their arguments and the constant
//! `LANES`; none allocate and none fail at runtime. Loads and stores take raw
//! pointers and are `unsafe`: the pointer must be valid for `LANES` elements,
//! and for the `_aligned` forms must be aligned to the vector width.
//! `lane_get`/`lane_set` expect `index < LANES`; the backends do not report
//! violations (`lane_set` leaves the register unchanged, `lane_get` panics).
//!
//! Every `Register` is laid out in memory as `LANES` contiguous scalars, lane 0
//! first, so a reference to a register can be read as `*const Scalar`.

use num_traits::AsPrimitive;

use crate::config::BackendFamily;

pub mod portable;
pub mod types;

#[cfg(lanewise_sse2)]
pub mod engine128;

pub use portable::Portable;
#[cfg(lanewise_sse2)]
pub use engine128::{Sse2F32, Sse2F64, Sse2I32};

/// Uniform operation set over one scalar type's vector register.
///
/// Implementations are zero-sized markers; the backend itself has no runtime
/// instance.
pub trait Backend: 'static {
    /// Scalar type held in each lane.
    type Scalar: Copy;
    /// Hardware (or emulated) vector register.
    type Register: Copy;
    /// Hardware (or emulated) per-lane predicate.
    type Predicate: Copy;

    /// Number of lanes: native width in bytes divided by the scalar size.
    const LANES: usize;
    /// Family this backend belongs to.
    const FAMILY: BackendFamily;

    // ===== Constants =====
    /// Register holding `0, 1, .., LANES - 1`. Computed once per process.
    fn lane_index() -> Self::Register;
    /// Predicate with every lane set. Computed once per process.
    fn all_true() -> Self::Predicate;

    // ===== Memory Operations =====
    /// Load `LANES` contiguous elements from an element-aligned pointer.
    ///
    /// Safety: `ptr` must be valid for reads of `LANES` elements.
    unsafe fn load(ptr: *const Self::Scalar) -> Self::Register;
    /// Load `LANES` contiguous elements from a vector-aligned pointer.
    ///
    /// Safety: as `load`, and `ptr` must be aligned to the vector width.
    unsafe fn load_aligned(ptr: *const Self::Scalar) -> Self::Register;
    /// Store all lanes to an element-aligned pointer.
    ///
    /// Safety: `ptr` must be valid for writes of `LANES` elements.
    unsafe fn store(reg: Self::Register, ptr: *mut Self::Scalar);
    /// Store all lanes to a vector-aligned pointer.
    ///
    /// Safety: as `store`, and `ptr` must be aligned to the vector width.
    unsafe fn store_aligned(reg: Self::Register, ptr: *mut Self::Scalar);

    // ===== Creation =====
    /// Broadcast a scalar into every lane.
    fn fill(value: Self::Scalar) -> Self::Register;

    // ===== Arithmetic =====
    fn add(a: Self::Register, b: Self::Register) -> Self::Register;
    fn sub(a: Self::Register, b: Self::Register) -> Self::Register;
    fn mul(a: Self::Register, b: Self::Register) -> Self::Register;
    /// Lane-wise division. Integer division by zero or `MIN / -1` panics.
    fn div(a: Self::Register, b: Self::Register) -> Self::Register;
    fn min(a: Self::Register, b: Self::Register) -> Self::Register;
    fn max(a: Self::Register, b: Self::Register) -> Self::Register;
    /// Lane-wise absolute value following the element kind: sign bit cleared
    /// for floats, conditional negation for signed integers (`MIN` stays
    /// `MIN`), identity for unsigned integers.
    fn abs(a: Self::Register) -> Self::Register;

    // ===== Comparison =====
    fn equal(a: Self::Register, b: Self::Register) -> Self::Predicate;
    fn not_equal(a: Self::Register, b: Self::Register) -> Self::Predicate;
    fn greater_than(a: Self::Register, b: Self::Register) -> Self::Predicate;
    fn greater_eq(a: Self::Register, b: Self::Register) -> Self::Predicate;
    fn less_than(a: Self::Register, b: Self::Register) -> Self::Predicate;
    fn less_eq(a: Self::Register, b: Self::Register) -> Self::Predicate;

    // ===== Reduction =====
    fn reduce_sum(a: Self::Register) -> Self::Scalar;
    fn reduce_min(a: Self::Register) -> Self::Scalar;
    fn reduce_max(a: Self::Register) -> Self::Scalar;

    // ===== Lane Access =====
    /// Read lane `index`.
    fn lane_get(a: Self::Register, index: usize) -> Self::Scalar;
    /// Replace lane `index` by merging a broadcast of `value` under the
    /// one-hot predicate `lane_index() == index`.
    fn lane_set(a: Self::Register, index: usize, value: Self::Scalar) -> Self::Register;

    // ===== Select / Gather =====
    /// Lane-wise `pred ? t : f`.
    fn select(pred: Self::Predicate, t: Self::Register, f: Self::Register) -> Self::Register;
    /// `out[i] = a[indices[i]]` for an index register of the same lane count.
    fn gather<I>(a: Self::Register, indices: I::Register) -> Self::Register
    where
        I: Backend,
        I::Scalar: AsPrimitive<usize>;

    // ===== Predicate Algebra =====
    fn pred_splat(value: bool) -> Self::Predicate;
    fn pred_and(a: Self::Predicate, b: Self::Predicate) -> Self::Predicate;
    fn pred_or(a: Self::Predicate, b: Self::Predicate) -> Self::Predicate;
    fn pred_xor(a: Self::Predicate, b: Self::Predicate) -> Self::Predicate;
    fn pred_not(a: Self::Predicate) -> Self::Predicate;
    /// `a & !b`.
    fn pred_and_not(a: Self::Predicate, b: Self::Predicate) -> Self::Predicate;
    /// Number of set lanes.
    fn pred_count(a: Self::Predicate) -> usize;
}

/// Bitwise operations, available only for integer scalars.
pub trait IntegerBackend: Backend {
    fn bit_and(a: Self::Register, b: Self::Register) -> Self::Register;
    fn bit_or(a: Self::Register, b: Self::Register) -> Self::Register;
    fn bit_xor(a: Self::Register, b: Self::Register) -> Self::Register;
}

/// Floating-point only operations.
pub trait FloatBackend: Backend {
    /// Lane-wise square root; negative lanes produce NaN.
    fn sqrt(a: Self::Register) -> Self::Register;
}
