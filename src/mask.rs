//! `Mask<T>`: one boolean per lane of `Vector<T>`.
//!
//! A mask owns the backend's predicate value and has exactly as many lanes as
//! `Vector<T>`. Masks come from vector comparisons, from a broadcast boolean,
//! or from a raw predicate, and combine with `! & | ^`. Rust cannot overload
//! `&&`/`||`; use `&`/`|`, which are lane-wise and never short-circuit.
//!
//! Single-lane accessors are checked: an index outside `[0, LANES)` is
//! reported as [`Error::LaneOutOfRange`] by `get`/`set`, and `mask[i]` panics.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Index, Not};

use crate::backend::Backend;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::vector::Vector;

/// Predicate type backing `Mask<T>`.
pub type Predicate<T> = <<T as Element>::Backend as Backend>::Predicate;

/// Lane-parallel boolean.
#[derive(Clone, Copy)]
pub struct Mask<T: Element> {
    pred: Predicate<T>,
}

impl<T: Element> Mask<T> {
    /// Number of lanes; always equal to `Vector::<T>::LANES`.
    pub const LANES: usize = <T::Backend as Backend>::LANES;

    #[inline(always)]
    pub const fn size() -> usize {
        Self::LANES
    }

    /// Every lane set to `value`.
    #[inline(always)]
    pub fn splat(value: bool) -> Self {
        Self::from_predicate(T::Backend::pred_splat(value))
    }

    #[inline(always)]
    pub fn from_predicate(pred: Predicate<T>) -> Self {
        Self { pred }
    }

    /// The underlying predicate.
    #[inline(always)]
    pub fn predicate(self) -> Predicate<T> {
        self.pred
    }

    // ===== Lane Access =====

    /// Only lane `index` set.
    #[inline]
    fn one_hot(index: usize) -> Self {
        Vector::<T>::lane_index().simd_eq(Vector::splat(T::from_lane(index)))
    }

    #[inline]
    fn check(index: usize) -> Result<()> {
        if index >= Self::LANES {
            return Err(Error::LaneOutOfRange {
                index,
                lanes: Self::LANES,
            });
        }
        Ok(())
    }

    #[inline]
    fn test(&self, index: usize) -> bool {
        (*self & Self::one_hot(index)).popcount() != 0
    }

    /// Lane `index`.
    pub fn get(&self, index: usize) -> Result<bool> {
        Self::check(index)?;
        Ok(self.test(index))
    }

    /// Sets lane `index` to `value`, leaving the other lanes untouched.
    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        Self::check(index)?;
        let hot = Self::one_hot(index).pred;
        self.pred = if value {
            T::Backend::pred_or(self.pred, hot)
        } else {
            T::Backend::pred_and_not(self.pred, hot)
        };
        Ok(())
    }

    /// Iterator over the lanes, lane 0 first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + use<T> {
        let m = *self;
        (0..Self::LANES).map(move |i| m.test(i))
    }

    // ===== Queries =====

    /// Number of set lanes.
    #[inline(always)]
    pub fn popcount(&self) -> usize {
        T::Backend::pred_count(self.pred)
    }

    /// Every lane set.
    #[inline]
    pub fn all_of(&self) -> bool {
        self.popcount() == Self::LANES
    }

    /// At least one lane set.
    #[inline]
    pub fn any_of(&self) -> bool {
        self.popcount() > 0
    }

    /// Not every lane set: true unless `all_of()`.
    ///
    /// Note this is the complement of `all_of`, not "no lane set"; use
    /// [`Mask::is_clear`] for that.
    #[inline]
    pub fn none_of(&self) -> bool {
        self.popcount() != Self::LANES
    }

    /// Some but not all lanes set.
    #[inline]
    pub fn some_of(&self) -> bool {
        let n = self.popcount();
        n > 0 && n < Self::LANES
    }

    /// No lane set.
    #[inline]
    pub fn is_clear(&self) -> bool {
        self.popcount() == 0
    }

    /// Lowest set lane, if any.
    pub fn find_first_set(&self) -> Option<usize> {
        if self.is_clear() {
            return None;
        }
        let past_end = Vector::splat(T::from_lane(Self::LANES));
        Some(self.select(Vector::lane_index(), past_end).reduce_min().to_lane())
    }

    /// Highest set lane, if any.
    pub fn find_last_set(&self) -> Option<usize> {
        if self.is_clear() {
            return None;
        }
        Some(self.select(Vector::lane_index(), Vector::zero()).reduce_max().to_lane())
    }

    // ===== Lane-wise =====

    /// Lanes of `t` where set, lanes of `f` elsewhere.
    #[inline(always)]
    pub fn select(self, t: Vector<T>, f: Vector<T>) -> Vector<T> {
        Vector::from_register(T::Backend::select(self.pred, t.register(), f.register()))
    }

    /// Lanes where both masks agree.
    #[inline(always)]
    pub fn simd_eq(self, other: Self) -> Self {
        !(self ^ other)
    }

    /// Lanes where the masks differ.
    #[inline(always)]
    pub fn simd_ne(self, other: Self) -> Self {
        self ^ other
    }
}

impl<T: Element> Default for Mask<T> {
    /// All lanes clear.
    fn default() -> Self {
        Self::splat(false)
    }
}

impl<T: Element> From<bool> for Mask<T> {
    fn from(value: bool) -> Self {
        Self::splat(value)
    }
}

/// True when every lane agrees.
impl<T: Element> PartialEq for Mask<T> {
    fn eq(&self, other: &Self) -> bool {
        (*self ^ *other).is_clear()
    }
}

impl<T: Element> Eq for Mask<T> {}

/// Read-only lane access. Panics if `index >= LANES`.
impl<T: Element> Index<usize> for Mask<T> {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        match self.get(index) {
            Ok(true) => &true,
            Ok(false) => &false,
            Err(e) => panic!("{}", e),
        }
    }
}

// ============================================================================
// Logical operators
// ============================================================================

impl<T: Element> Not for Mask<T> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self::from_predicate(T::Backend::pred_not(self.pred))
    }
}

macro_rules! mask_logic {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $backend_fn:ident) => {
        impl<T: Element> $Op for Mask<T> {
            type Output = Self;

            #[inline(always)]
            fn $op(self, rhs: Self) -> Self {
                Self::from_predicate(T::Backend::$backend_fn(self.pred, rhs.pred))
            }
        }

        impl<T: Element> $OpAssign for Mask<T> {
            #[inline(always)]
            fn $op_assign(&mut self, rhs: Self) {
                self.pred = T::Backend::$backend_fn(self.pred, rhs.pred);
            }
        }
    };
}

mask_logic!(BitAnd, bitand, BitAndAssign, bitand_assign, pred_and);
mask_logic!(BitOr, bitor, BitOrAssign, bitor_assign, pred_or);
mask_logic!(BitXor, bitxor, BitXorAssign, bitxor_assign, pred_xor);

// ============================================================================
// Formatting
// ============================================================================

/// `( 1 0 .. )`
impl<T: Element> fmt::Display for Mask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for lane in self.iter() {
            write!(f, " {}", lane as u8)?;
        }
        write!(f, " )")
    }
}

impl<T: Element> fmt::Debug for Mask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
