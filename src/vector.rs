//! `Vector<T>`: a fixed number of `T` lanes held in one native register.
//!
//! Every operation is a thin wrapper over the backend bound to `T` (see
//! `element.rs`); the vector itself only owns the register value.
//!
//! ## Indexed access
//!
//! `get`/`set` are not validated by the vector: the index is handed straight
//! to the backend, which panics on `get` and ignores `set` when the index is
//! past the last lane. `get_unchecked` skips even that and reads the lane
//! through a raw pointer. `Mask` accessors, in contrast, return an error for
//! an out-of-range index.

use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::align::{self, Alignment, ElementAligned};
use crate::backend::{Backend, IntegerBackend};
use crate::config::memory_alignment;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::mask::Mask;

/// Register type backing `Vector<T>`.
pub type Register<T> = <<T as Element>::Backend as Backend>::Register;

/// Lane-parallel numeric value.
#[derive(Clone, Copy)]
pub struct Vector<T: Element> {
    reg: Register<T>,
}

impl<T: Element> Vector<T> {
    /// Number of lanes.
    pub const LANES: usize = <T::Backend as Backend>::LANES;

    /// Number of lanes.
    #[inline(always)]
    pub const fn size() -> usize {
        Self::LANES
    }

    // ===== Construction =====

    /// Every lane set to `value`.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self::from_register(T::Backend::fill(value))
    }

    /// Every lane zero.
    #[inline(always)]
    pub fn zero() -> Self {
        Self::splat(T::ZERO)
    }

    #[inline(always)]
    pub fn from_register(reg: Register<T>) -> Self {
        Self { reg }
    }

    /// The underlying register.
    #[inline(always)]
    pub fn register(self) -> Register<T> {
        self.reg
    }

    /// Lane `i` set to `f(i)`, lane 0 first.
    pub fn from_fn(mut f: impl FnMut(usize) -> T) -> Self {
        (0..Self::LANES).fold(Self::zero(), |mut v, i| {
            v.set(i, f(i));
            v
        })
    }

    /// `0, 1, .., LANES - 1`.
    #[inline]
    pub fn lane_index() -> Self {
        Self::from_register(T::Backend::lane_index())
    }

    /// `base, base + step, base + 2 * step, ..` with the element type's
    /// arithmetic (wrapping for integers).
    #[inline]
    pub fn index_series(base: T, step: T) -> Self {
        Self::splat(base) + Self::lane_index() * step
    }

    // ===== Memory =====

    /// Loads the first `LANES` elements of `slice`.
    ///
    /// # Panics
    ///
    /// If `slice` is shorter than `LANES`, or `tag` is `VectorAligned` and
    /// the slice does not start on a vector boundary.
    pub fn from_slice<A: Alignment>(slice: &[T], tag: A) -> Self {
        match Self::try_from_slice(slice, tag) {
            Ok(v) => v,
            Err(e) => panic!("Vector::from_slice: {}", e),
        }
    }

    /// Loads the first `LANES` elements of `slice`, reporting a short or
    /// misaligned slice as an error.
    pub fn try_from_slice<A: Alignment>(slice: &[T], tag: A) -> Result<Self> {
        Self::check_access::<A>(slice.as_ptr(), slice.len())?;
        // Length and alignment checked above.
        Ok(unsafe { Self::from_ptr(slice.as_ptr(), tag) })
    }

    /// Loads `LANES` elements from `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANES` elements and, for
    /// `VectorAligned`, aligned to [`memory_alignment()`] bytes.
    #[inline(always)]
    pub unsafe fn from_ptr<A: Alignment>(ptr: *const T, _tag: A) -> Self {
        let reg = if A::VECTOR_ALIGNED {
            unsafe { T::Backend::load_aligned(ptr) }
        } else {
            unsafe { T::Backend::load(ptr) }
        };
        Self::from_register(reg)
    }

    /// Replaces all lanes with the first `LANES` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`Vector::from_slice`].
    pub fn copy_from_slice<A: Alignment>(&mut self, slice: &[T], tag: A) {
        *self = Self::from_slice(slice, tag);
    }

    /// # Safety
    ///
    /// As [`Vector::from_ptr`].
    #[inline(always)]
    pub unsafe fn copy_from_ptr<A: Alignment>(&mut self, ptr: *const T, tag: A) {
        *self = unsafe { Self::from_ptr(ptr, tag) };
    }

    /// Stores all lanes to the start of `slice`.
    ///
    /// # Panics
    ///
    /// If `slice` is shorter than `LANES`, or `tag` is `VectorAligned` and
    /// the slice does not start on a vector boundary.
    pub fn copy_to_slice<A: Alignment>(&self, slice: &mut [T], tag: A) {
        if let Err(e) = self.try_copy_to_slice(slice, tag) {
            panic!("Vector::copy_to_slice: {}", e);
        }
    }

    /// Stores all lanes to the start of `slice`, reporting a short or
    /// misaligned slice as an error.
    pub fn try_copy_to_slice<A: Alignment>(&self, slice: &mut [T], tag: A) -> Result<()> {
        Self::check_access::<A>(slice.as_ptr(), slice.len())?;
        unsafe { self.copy_to_ptr(slice.as_mut_ptr(), tag) };
        Ok(())
    }

    /// Stores all lanes to `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `LANES` elements and, for
    /// `VectorAligned`, aligned to [`memory_alignment()`] bytes.
    #[inline(always)]
    pub unsafe fn copy_to_ptr<A: Alignment>(&self, ptr: *mut T, _tag: A) {
        if A::VECTOR_ALIGNED {
            unsafe { T::Backend::store_aligned(self.reg, ptr) }
        } else {
            unsafe { T::Backend::store(self.reg, ptr) }
        }
    }

    /// Lanes as a `Vec`, lane 0 first.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = vec![T::ZERO; Self::LANES];
        unsafe { self.copy_to_ptr(out.as_mut_ptr(), ElementAligned) };
        out
    }

    /// Iterator over the lanes, lane 0 first.
    pub fn iter(&self) -> impl Iterator<Item = T> + use<T> {
        let v = *self;
        (0..Self::LANES).map(move |i| v.get(i))
    }

    fn check_access<A: Alignment>(ptr: *const T, len: usize) -> Result<()> {
        if len < Self::LANES {
            return Err(Error::SliceTooShort {
                len,
                lanes: Self::LANES,
            });
        }
        if !align::is_aligned_for::<A, T>(ptr) {
            return Err(Error::Misaligned {
                align: memory_alignment(),
            });
        }
        Ok(())
    }

    // ===== Lane Access =====

    /// Lane `index`. Panics in the backend when `index >= LANES`.
    #[inline(always)]
    pub fn get(&self, index: usize) -> T {
        T::Backend::lane_get(self.reg, index)
    }

    /// Replaces lane `index`; an index past the last lane changes nothing.
    #[inline(always)]
    pub fn set(&mut self, index: usize, value: T) {
        self.reg = T::Backend::lane_set(self.reg, index, value);
    }

    /// Lane `index` without any check.
    ///
    /// # Safety
    ///
    /// `index` must be less than `LANES`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> T {
        // Registers hold LANES contiguous scalars.
        unsafe { *(&self.reg as *const Register<T> as *const T).add(index) }
    }

    // ===== Increment / Decrement =====

    /// Adds one to every lane and returns the updated vector.
    #[inline]
    pub fn increment(&mut self) -> &mut Self {
        *self += T::ONE;
        self
    }

    /// Subtracts one from every lane and returns the updated vector.
    #[inline]
    pub fn decrement(&mut self) -> &mut Self {
        *self -= T::ONE;
        self
    }

    /// Adds one to every lane and returns the previous value.
    #[inline]
    pub fn post_increment(&mut self) -> Self {
        let old = *self;
        *self += T::ONE;
        old
    }

    /// Subtracts one from every lane and returns the previous value.
    #[inline]
    pub fn post_decrement(&mut self) -> Self {
        let old = *self;
        *self -= T::ONE;
        old
    }

    // ===== Comparison =====

    #[inline(always)]
    pub fn simd_eq(self, other: Self) -> Mask<T> {
        Mask::from_predicate(T::Backend::equal(self.reg, other.reg))
    }

    #[inline(always)]
    pub fn simd_ne(self, other: Self) -> Mask<T> {
        Mask::from_predicate(T::Backend::not_equal(self.reg, other.reg))
    }

    #[inline(always)]
    pub fn simd_lt(self, other: Self) -> Mask<T> {
        Mask::from_predicate(T::Backend::less_than(self.reg, other.reg))
    }

    #[inline(always)]
    pub fn simd_le(self, other: Self) -> Mask<T> {
        Mask::from_predicate(T::Backend::less_eq(self.reg, other.reg))
    }

    #[inline(always)]
    pub fn simd_gt(self, other: Self) -> Mask<T> {
        Mask::from_predicate(T::Backend::greater_than(self.reg, other.reg))
    }

    #[inline(always)]
    pub fn simd_ge(self, other: Self) -> Mask<T> {
        Mask::from_predicate(T::Backend::greater_eq(self.reg, other.reg))
    }

    // ===== Reduction =====

    /// Sum of all lanes using the backend's horizontal add.
    #[inline]
    pub fn reduce_sum(self) -> T {
        T::Backend::reduce_sum(self.reg)
    }

    #[inline]
    pub fn reduce_min(self) -> T {
        T::Backend::reduce_min(self.reg)
    }

    #[inline]
    pub fn reduce_max(self) -> T {
        T::Backend::reduce_max(self.reg)
    }

    /// `out[i] = self[indices[i]]`. Panics if an index is not a lane.
    #[inline]
    pub(crate) fn gather(self, indices: Vector<T::Bits>) -> Self {
        Self::from_register(T::Backend::gather::<<T::Bits as Element>::Backend>(
            self.reg,
            indices.register(),
        ))
    }
}

impl<T: Element> Default for Vector<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Element> From<T> for Vector<T> {
    fn from(value: T) -> Self {
        Self::splat(value)
    }
}

/// True when every lane compares equal.
impl<T: Element> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.simd_eq(*other).all_of()
    }
}

impl<T: Element> Index<usize> for Vector<T> {
    type Output = T;

    /// Reference to lane `index`.
    ///
    /// # Panics
    ///
    /// If `index >= LANES`.
    #[inline]
    fn index(&self, index: usize) -> &T {
        assert!(
            index < Self::LANES,
            "lane index {} out of range for {} lanes",
            index,
            Self::LANES
        );
        unsafe { &*(&self.reg as *const Register<T> as *const T).add(index) }
    }
}

// ============================================================================
// Arithmetic operators
// ============================================================================

macro_rules! vector_arithmetic {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $backend_fn:ident) => {
        impl<T: Element> $Op for Vector<T> {
            type Output = Self;

            #[inline(always)]
            fn $op(self, rhs: Self) -> Self {
                Self::from_register(T::Backend::$backend_fn(self.reg, rhs.reg))
            }
        }

        impl<T: Element> $Op<T> for Vector<T> {
            type Output = Self;

            #[inline(always)]
            fn $op(self, rhs: T) -> Self {
                <Self as $Op<Self>>::$op(self, Self::splat(rhs))
            }
        }

        impl<T: Element> $OpAssign for Vector<T> {
            #[inline(always)]
            fn $op_assign(&mut self, rhs: Self) {
                *self = <Self as $Op<Self>>::$op(*self, rhs);
            }
        }

        impl<T: Element> $OpAssign<T> for Vector<T> {
            #[inline(always)]
            fn $op_assign(&mut self, rhs: T) {
                *self = <Self as $Op<T>>::$op(*self, rhs);
            }
        }
    };
}

vector_arithmetic!(Add, add, AddAssign, add_assign, add);
vector_arithmetic!(Sub, sub, SubAssign, sub_assign, sub);
vector_arithmetic!(Mul, mul, MulAssign, mul_assign, mul);
vector_arithmetic!(Div, div, DivAssign, div_assign, div);

/// Multiplies by `NEG_ONE`: modular negation for unsigned types.
impl<T: Element> Neg for Vector<T> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        self * T::NEG_ONE
    }
}

// ============================================================================
// Bitwise operators (integer elements only)
// ============================================================================

macro_rules! vector_bitwise {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $backend_fn:ident) => {
        impl<T: Element> $Op for Vector<T>
        where
            T::Backend: IntegerBackend,
        {
            type Output = Self;

            #[inline(always)]
            fn $op(self, rhs: Self) -> Self {
                Self::from_register(<T::Backend as IntegerBackend>::$backend_fn(
                    self.reg, rhs.reg,
                ))
            }
        }

        impl<T: Element> $Op<T> for Vector<T>
        where
            T::Backend: IntegerBackend,
        {
            type Output = Self;

            #[inline(always)]
            fn $op(self, rhs: T) -> Self {
                <Self as $Op<Self>>::$op(self, Self::splat(rhs))
            }
        }

        impl<T: Element> $OpAssign for Vector<T>
        where
            T::Backend: IntegerBackend,
        {
            #[inline(always)]
            fn $op_assign(&mut self, rhs: Self) {
                *self = <Self as $Op<Self>>::$op(*self, rhs);
            }
        }

        impl<T: Element> $OpAssign<T> for Vector<T>
        where
            T::Backend: IntegerBackend,
        {
            #[inline(always)]
            fn $op_assign(&mut self, rhs: T) {
                *self = <Self as $Op<T>>::$op(*self, rhs);
            }
        }
    };
}

vector_bitwise!(BitAnd, bitand, BitAndAssign, bitand_assign, bit_and);
vector_bitwise!(BitOr, bitor, BitOrAssign, bitor_assign, bit_or);
vector_bitwise!(BitXor, bitxor, BitXorAssign, bitxor_assign, bit_xor);

// ============================================================================
// Formatting
// ============================================================================

/// `( e0 e1 .. )`
impl<T: Element> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for lane in self.iter() {
            write!(f, " {}", lane)?;
        }
        write!(f, " )")
    }
}

impl<T: Element> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
