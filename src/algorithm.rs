//! Free functions over `Vector` and `Mask`.
//!
//! Everything here is generic over the element type; per-type behaviour comes
//! from the backend, never from branching on the concrete type.
//!
//! ## Reduction
//!
//! [`reduce_with`] folds all lanes with an associative, commutative operator.
//! Operators with a native horizontal reduction ([`Plus`], [`Minimum`],
//! [`Maximum`]) use it directly. Any other operator, including a closure
//! `Fn(Vector<T>, Vector<T>) -> Vector<T>`, goes through a gather tree:
//!
//! ```text
//! low[i]  = i / 2
//! high[i] = low[i] + LANES / 2
//! repeat log2(LANES) times:  x = op(gather(x, low), gather(x, high))
//! ```
//!
//! after which every lane holds the full reduction and lane 0 is returned.
//! For floats the tree pairs lanes differently from a left fold, so the
//! result can differ from a scalar loop by rounding.

use crate::backend::{Backend, FloatBackend};
use crate::element::Element;
use crate::kind::ElementKind;
use crate::mask::Mask;
use crate::vector::Vector;

// ============================================================================
// Elementwise
// ============================================================================

#[inline(always)]
pub fn min<T: Element>(a: Vector<T>, b: Vector<T>) -> Vector<T> {
    Vector::from_register(T::Backend::min(a.register(), b.register()))
}

#[inline(always)]
pub fn max<T: Element>(a: Vector<T>, b: Vector<T>) -> Vector<T> {
    Vector::from_register(T::Backend::max(a.register(), b.register()))
}

/// `(min(a, b), max(a, b))`.
#[inline(always)]
pub fn minmax<T: Element>(a: Vector<T>, b: Vector<T>) -> (Vector<T>, Vector<T>) {
    (min(a, b), max(a, b))
}

/// Lane-wise absolute value.
///
/// Floats clear the sign bit, signed integers negate the negative lanes
/// (`MIN` stays `MIN`), and unsigned integers are returned unchanged.
#[inline]
pub fn abs<T: Element>(x: Vector<T>) -> Vector<T> {
    match T::KIND {
        ElementKind::Float => Vector::from_register(T::Backend::abs(x.register())),
        ElementKind::Signed => choose(x.simd_lt(Vector::zero()), -x, x),
        ElementKind::Unsigned => x,
    }
}

/// Lane-wise square root; negative lanes become NaN.
#[inline(always)]
pub fn sqrt<T: Element>(x: Vector<T>) -> Vector<T>
where
    T::Backend: FloatBackend,
{
    Vector::from_register(<T::Backend as FloatBackend>::sqrt(x.register()))
}

/// Lanes of `t` where `mask` is set, lanes of `f` elsewhere.
#[inline(always)]
pub fn choose<T: Element>(mask: Mask<T>, t: Vector<T>, f: Vector<T>) -> Vector<T> {
    mask.select(t, f)
}

/// Copies the lanes of `src` selected by `mask` into `dst`.
#[inline(always)]
pub fn mask_assign<T: Element>(mask: Mask<T>, dst: &mut Vector<T>, src: Vector<T>) {
    *dst = mask.select(src, *dst);
}

// ============================================================================
// Reduction
// ============================================================================

/// Associative, commutative operator usable with [`reduce_with`].
pub trait ReduceOp<T: Element> {
    /// Lane-wise combination of two partial results.
    fn combine(&self, a: Vector<T>, b: Vector<T>) -> Vector<T>;

    /// Full reduction using a native horizontal instruction, when the
    /// operator has one.
    #[inline(always)]
    fn native(&self, _x: &Vector<T>) -> Option<T> {
        None
    }
}

/// Addition; the default reduction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plus;

/// Lane-wise minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minimum;

/// Lane-wise maximum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Maximum;

impl<T: Element> ReduceOp<T> for Plus {
    #[inline(always)]
    fn combine(&self, a: Vector<T>, b: Vector<T>) -> Vector<T> {
        a + b
    }

    #[inline(always)]
    fn native(&self, x: &Vector<T>) -> Option<T> {
        Some(x.reduce_sum())
    }
}

impl<T: Element> ReduceOp<T> for Minimum {
    #[inline(always)]
    fn combine(&self, a: Vector<T>, b: Vector<T>) -> Vector<T> {
        min(a, b)
    }

    #[inline(always)]
    fn native(&self, x: &Vector<T>) -> Option<T> {
        Some(x.reduce_min())
    }
}

impl<T: Element> ReduceOp<T> for Maximum {
    #[inline(always)]
    fn combine(&self, a: Vector<T>, b: Vector<T>) -> Vector<T> {
        max(a, b)
    }

    #[inline(always)]
    fn native(&self, x: &Vector<T>) -> Option<T> {
        Some(x.reduce_max())
    }
}

impl<T, F> ReduceOp<T> for F
where
    T: Element,
    F: Fn(Vector<T>, Vector<T>) -> Vector<T>,
{
    #[inline(always)]
    fn combine(&self, a: Vector<T>, b: Vector<T>) -> Vector<T> {
        self(a, b)
    }
}

/// Sum of all lanes.
#[inline]
pub fn reduce<T: Element>(x: Vector<T>) -> T {
    reduce_with(x, Plus)
}

/// All lanes folded with `op`.
#[inline]
pub fn reduce_with<T: Element, O: ReduceOp<T>>(x: Vector<T>, op: O) -> T {
    match op.native(&x) {
        Some(value) => value,
        None => reduce_tree(x, &op),
    }
}

/// Gather-tree reduction; see the module docs.
pub fn reduce_tree<T: Element, O: ReduceOp<T> + ?Sized>(x: Vector<T>, op: &O) -> T {
    let lanes = Vector::<T>::LANES;
    debug_assert!(lanes.is_power_of_two());

    let low = Vector::<T::Bits>::lane_index() / <T::Bits as Element>::from_lane(2);
    let high = low + <T::Bits as Element>::from_lane(lanes / 2);

    let mut acc = x;
    let mut step = 1;
    while step < lanes {
        acc = op.combine(acc.gather(low), acc.gather(high));
        step *= 2;
    }
    acc.get(0)
}

// ============================================================================
// Mask queries
// ============================================================================

#[inline]
pub fn popcount<T: Element>(mask: Mask<T>) -> usize {
    mask.popcount()
}

#[inline]
pub fn all_of<T: Element>(mask: Mask<T>) -> bool {
    mask.all_of()
}

#[inline]
pub fn any_of<T: Element>(mask: Mask<T>) -> bool {
    mask.any_of()
}

/// Complement of [`all_of`]; see [`Mask::none_of`].
#[inline]
pub fn none_of<T: Element>(mask: Mask<T>) -> bool {
    mask.none_of()
}

#[inline]
pub fn some_of<T: Element>(mask: Mask<T>) -> bool {
    mask.some_of()
}

#[inline]
pub fn find_first_set<T: Element>(mask: Mask<T>) -> Option<usize> {
    mask.find_first_set()
}

#[inline]
pub fn find_last_set<T: Element>(mask: Mask<T>) -> Option<usize> {
    mask.find_last_set()
}
