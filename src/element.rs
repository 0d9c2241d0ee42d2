//! Supported scalar element types and their backend bindings.
//!
//! [`Element`] is sealed: the set of scalars is closed, and a type without an
//! implementation (`f16`, `i128`, `bool`, ...) cannot be used in a `Vector`
//! or `Mask` at all. The backend for each type is fixed here at compile time:
//!
//! | type             | backend (x86_64, 128-bit)  | backend (otherwise) |
//! |------------------|----------------------------|---------------------|
//! | `i32`            | [`Sse2I32`]                | `Portable<i32>`     |
//! | `f32`            | [`Sse2F32`]                | `Portable<f32>`     |
//! | `f64`            | [`Sse2F64`]                | `Portable<f64>`     |
//! | everything else  | `Portable<T>`              | `Portable<T>`       |
//!
//! [`Sse2I32`]: crate::backend::engine128::Sse2I32
//! [`Sse2F32`]: crate::backend::engine128::Sse2F32
//! [`Sse2F64`]: crate::backend::engine128::Sse2F64

use std::fmt;

use num_traits::AsPrimitive;

use crate::backend::{Backend, Portable};
use crate::kind::{ArithmeticKind, ElementKind, FloatKind, SignedKind, UnsignedKind};

#[cfg(lanewise_sse2)]
use crate::backend::{Sse2F32, Sse2F64, Sse2I32};

mod sealed {
    pub trait Sealed {}
}

/// A scalar type that can be held in the lanes of a `Vector`.
pub trait Element:
    sealed::Sealed
    + Copy
    + Default
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + AsPrimitive<usize>
    + Send
    + Sync
    + 'static
{
    /// Lane arithmetic family.
    type Kind: ArithmeticKind<Self>;
    /// Backend serving this type in the current build.
    type Backend: Backend<Scalar = Self>;
    /// Unsigned integer of the same width; used for lane index vectors.
    type Bits: Element + AsPrimitive<usize>;

    const KIND: ElementKind;
    const NAME: &'static str;
    const ZERO: Self;
    const ONE: Self;
    /// Multiplicative inverse of one: `-1`, or `MAX` for unsigned types so
    /// that negation is modular.
    const NEG_ONE: Self;

    /// Converts a lane number to this type. Lane numbers are always small
    /// enough to be exact in every supported type.
    fn from_lane(lane: usize) -> Self;

    /// Converts a lane number held in this type back to `usize`.
    #[inline(always)]
    fn to_lane(self) -> usize {
        self.as_()
    }
}

macro_rules! element {
    ($t:ty, $kind:ty, $backend:ty, $bits:ty, $neg_one:expr, $one:expr) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            type Kind = $kind;
            type Backend = $backend;
            type Bits = $bits;

            const KIND: ElementKind = <$kind as ArithmeticKind<$t>>::KIND;
            const NAME: &'static str = stringify!($t);
            const ZERO: Self = 0 as $t;
            const ONE: Self = $one;
            const NEG_ONE: Self = $neg_one;

            #[inline(always)]
            fn from_lane(lane: usize) -> Self {
                lane as $t
            }
        }
    };
}

element!(i8, SignedKind, Portable<i8>, u8, -1, 1);
element!(i16, SignedKind, Portable<i16>, u16, -1, 1);
element!(i64, SignedKind, Portable<i64>, u64, -1, 1);
element!(u8, UnsignedKind, Portable<u8>, u8, u8::MAX, 1);
element!(u16, UnsignedKind, Portable<u16>, u16, u16::MAX, 1);
element!(u32, UnsignedKind, Portable<u32>, u32, u32::MAX, 1);
element!(u64, UnsignedKind, Portable<u64>, u64, u64::MAX, 1);

#[cfg(lanewise_sse2)]
element!(i32, SignedKind, Sse2I32, u32, -1, 1);
#[cfg(lanewise_sse2)]
element!(f32, FloatKind, Sse2F32, u32, -1.0, 1.0);
#[cfg(lanewise_sse2)]
element!(f64, FloatKind, Sse2F64, u64, -1.0, 1.0);

#[cfg(not(lanewise_sse2))]
element!(i32, SignedKind, Portable<i32>, u32, -1, 1);
#[cfg(not(lanewise_sse2))]
element!(f32, FloatKind, Portable<f32>, u32, -1.0, 1.0);
#[cfg(not(lanewise_sse2))]
element!(f64, FloatKind, Portable<f64>, u64, -1.0, 1.0);
