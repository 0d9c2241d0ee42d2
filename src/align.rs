//! Alignment tags for vector loads and stores.
//!
//! A tag is passed by value to every memory operation and selects, at compile
//! time, whether the access may assume the pointer is aligned to the full
//! vector width ([`VectorAligned`]) or only to the element ([`ElementAligned`]).
//! The trait is sealed, so no other tag can be passed.

mod sealed {
    pub trait Sealed {}
}

/// Alignment contract of a memory access.
pub trait Alignment: sealed::Sealed + Copy {
    /// True when the pointer is promised to be aligned to
    /// [`memory_alignment()`](crate::config::memory_alignment) bytes.
    const VECTOR_ALIGNED: bool;
}

/// The pointer is aligned to the element type only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementAligned;

/// The pointer is aligned to the native vector width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VectorAligned;

impl sealed::Sealed for ElementAligned {}
impl sealed::Sealed for VectorAligned {}

impl Alignment for ElementAligned {
    const VECTOR_ALIGNED: bool = false;
}

impl Alignment for VectorAligned {
    const VECTOR_ALIGNED: bool = true;
}

/// True when `ptr` satisfies the contract of tag `A`.
#[inline]
pub(crate) fn is_aligned_for<A: Alignment, T>(ptr: *const T) -> bool {
    !A::VECTOR_ALIGNED || (ptr as usize) % crate::config::memory_alignment() == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::Lanes;
    use crate::config::VECTOR_BYTES;

    #[test]
    fn test_element_aligned_accepts_any_pointer() {
        let data = [0u8; 3];
        assert!(is_aligned_for::<ElementAligned, u8>(data[1..].as_ptr()));
    }

    #[test]
    fn test_vector_aligned_checks_address() {
        let block = Lanes::<u8, VECTOR_BYTES>([0; VECTOR_BYTES]);
        assert!(is_aligned_for::<VectorAligned, u8>(block.0.as_ptr()));
        assert!(!is_aligned_for::<VectorAligned, u8>(block.0[1..].as_ptr()));
    }
}
