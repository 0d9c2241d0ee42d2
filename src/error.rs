use thiserror::Error;

/// Errors raised by the checked accessors.
///
/// Everything else in the crate is either rejected at compile time or is an
/// unchecked precondition of an `unsafe fn`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A mask lane index outside `[0, lanes)`.
    #[error("lane index {index} out of range for {lanes} lanes")]
    LaneOutOfRange { index: usize, lanes: usize },

    /// A slice holding fewer elements than one vector.
    #[error("slice of length {len} is shorter than {lanes} lanes")]
    SliceTooShort { len: usize, lanes: usize },

    /// A `VectorAligned` access on memory without vector alignment.
    #[error("slice is not aligned to {align} bytes")]
    Misaligned { align: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
