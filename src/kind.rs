//! Element-kind classification
//!
//! Every supported scalar belongs to exactly one [`ElementKind`]. The kind
//! picks the family of lane operations whose semantics differ between signed
//! integers, unsigned integers and floating point: wrapping versus IEEE
//! arithmetic, integer versus NaN-aware min/max, and the absolute value.
//!
//! The operations live in the [`ArithmeticKind`] trait, implemented once per
//! kind and reused by every backend of that kind instead of being written out
//! for each concrete type.

use num_traits::{Float, PrimInt, Signed, Unsigned, WrappingAdd, WrappingMul, WrappingSub};

/// Classification of a scalar element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Two's complement signed integer.
    Signed,
    /// Unsigned integer.
    Unsigned,
    /// IEEE 754 binary floating point.
    Float,
}

impl ElementKind {
    pub fn is_integer(self) -> bool {
        !matches!(self, ElementKind::Float)
    }
}

/// Lane-level operations whose semantics depend on the element kind.
///
/// Integer `add`/`sub`/`mul` wrap on overflow like the hardware does. Integer
/// `div` follows Rust's native division on this target: it panics on a zero
/// divisor and on `MIN / -1`. Floating-point `min`/`max` return the other
/// operand when one of them is NaN.
///
/// Comparisons are ordered: for floats every comparison involving NaN is
/// false except `ne`, which is true.
pub trait ArithmeticKind<T: Copy + PartialOrd> {
    const KIND: ElementKind;

    fn add(a: T, b: T) -> T;
    fn sub(a: T, b: T) -> T;
    fn mul(a: T, b: T) -> T;
    fn div(a: T, b: T) -> T;
    fn min(a: T, b: T) -> T;
    fn max(a: T, b: T) -> T;
    fn abs(a: T) -> T;

    #[inline(always)]
    fn eq(a: T, b: T) -> bool {
        a == b
    }
    #[inline(always)]
    fn ne(a: T, b: T) -> bool {
        a != b
    }
    #[inline(always)]
    fn lt(a: T, b: T) -> bool {
        a < b
    }
    #[inline(always)]
    fn le(a: T, b: T) -> bool {
        a <= b
    }
    #[inline(always)]
    fn gt(a: T, b: T) -> bool {
        a > b
    }
    #[inline(always)]
    fn ge(a: T, b: T) -> bool {
        a >= b
    }
}

/// Kind marker for signed integers.
#[derive(Debug, Clone, Copy)]
pub struct SignedKind;

/// Kind marker for unsigned integers.
#[derive(Debug, Clone, Copy)]
pub struct UnsignedKind;

/// Kind marker for floating point.
#[derive(Debug, Clone, Copy)]
pub struct FloatKind;

impl<T> ArithmeticKind<T> for SignedKind
where
    T: PrimInt + Signed + WrappingAdd + WrappingSub + WrappingMul,
{
    const KIND: ElementKind = ElementKind::Signed;

    #[inline(always)]
    fn add(a: T, b: T) -> T {
        a.wrapping_add(&b)
    }
    #[inline(always)]
    fn sub(a: T, b: T) -> T {
        a.wrapping_sub(&b)
    }
    #[inline(always)]
    fn mul(a: T, b: T) -> T {
        a.wrapping_mul(&b)
    }
    #[inline(always)]
    fn div(a: T, b: T) -> T {
        a / b
    }
    #[inline(always)]
    fn min(a: T, b: T) -> T {
        core::cmp::min(a, b)
    }
    #[inline(always)]
    fn max(a: T, b: T) -> T {
        core::cmp::max(a, b)
    }
    // MIN stays MIN, as with a hardware negate.
    #[inline(always)]
    fn abs(a: T) -> T {
        if a < T::zero() { T::zero().wrapping_sub(&a) } else { a }
    }
}

impl<T> ArithmeticKind<T> for UnsignedKind
where
    T: PrimInt + Unsigned + WrappingAdd + WrappingSub + WrappingMul,
{
    const KIND: ElementKind = ElementKind::Unsigned;

    #[inline(always)]
    fn add(a: T, b: T) -> T {
        a.wrapping_add(&b)
    }
    #[inline(always)]
    fn sub(a: T, b: T) -> T {
        a.wrapping_sub(&b)
    }
    #[inline(always)]
    fn mul(a: T, b: T) -> T {
        a.wrapping_mul(&b)
    }
    #[inline(always)]
    fn div(a: T, b: T) -> T {
        a / b
    }
    #[inline(always)]
    fn min(a: T, b: T) -> T {
        core::cmp::min(a, b)
    }
    #[inline(always)]
    fn max(a: T, b: T) -> T {
        core::cmp::max(a, b)
    }
    #[inline(always)]
    fn abs(a: T) -> T {
        a
    }
}

impl<T: Float> ArithmeticKind<T> for FloatKind {
    const KIND: ElementKind = ElementKind::Float;

    #[inline(always)]
    fn add(a: T, b: T) -> T {
        a + b
    }
    #[inline(always)]
    fn sub(a: T, b: T) -> T {
        a - b
    }
    #[inline(always)]
    fn mul(a: T, b: T) -> T {
        a * b
    }
    #[inline(always)]
    fn div(a: T, b: T) -> T {
        a / b
    }
    #[inline(always)]
    fn min(a: T, b: T) -> T {
        a.min(b)
    }
    #[inline(always)]
    fn max(a: T, b: T) -> T {
        a.max(b)
    }
    #[inline(always)]
    fn abs(a: T) -> T {
        a.abs()
    }
}
