//! Build configuration: native vector width and backend family metadata.
//!
//! The vector width is fixed when the crate is compiled and cannot be queried
//! from the running CPU. It is chosen by Cargo features:
//!
//! - no width feature: 128-bit registers (SSE2 on x86_64, portable elsewhere)
//! - `width-256`: 256-bit registers
//! - `width-512`: 512-bit registers (wins when both width features are set)
//!
//! The `portable` feature disables the hardware engines so every element type
//! is served by the lane-array backend, which is handy when comparing engines.

use crate::backend::Backend;
use crate::element::Element;

/// Native vector register width in bits.
#[cfg(feature = "width-512")]
pub const VECTOR_BITS: usize = 512;
/// Native vector register width in bits.
#[cfg(all(feature = "width-256", not(feature = "width-512")))]
pub const VECTOR_BITS: usize = 256;
/// Native vector register width in bits.
#[cfg(not(any(feature = "width-256", feature = "width-512")))]
pub const VECTOR_BITS: usize = 128;

/// Native vector register width in bytes.
pub const VECTOR_BYTES: usize = VECTOR_BITS / 8;

/// Family of backend implementations a scalar type can be served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFamily {
    /// Lane-array backend, available for every element type on every target.
    Portable,
    /// SSE2 engine (x86_64, 128-bit width).
    Sse2,
}

impl BackendFamily {
    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            BackendFamily::Portable => "portable",
            BackendFamily::Sse2 => "SSE2",
        }
    }
}

/// Alignment in bytes promised by a `VectorAligned` access.
pub const fn memory_alignment() -> usize {
    VECTOR_BYTES
}

/// Number of lanes a `Vector<T>` holds in this build.
pub const fn lane_count<T: Element>() -> usize {
    <T::Backend as Backend>::LANES
}

/// Backend family serving `T` in this build.
pub fn backend_family<T: Element>() -> BackendFamily {
    <T::Backend as Backend>::FAMILY
}

/// Returns a human-readable description of the backend serving `T`.
pub fn describe<T: Element>() -> String {
    format!(
        "{} ({}-bit, {} lanes of {})",
        backend_family::<T>().name(),
        VECTOR_BITS,
        lane_count::<T>(),
        T::NAME
    )
}

/// Log the build configuration for every supported element type.
pub fn log_configuration() {
    log::info!(
        "lanewise: {}-bit vectors, {}-byte vector alignment",
        VECTOR_BITS,
        memory_alignment()
    );
    log::info!("  {}", describe::<i8>());
    log::info!("  {}", describe::<i16>());
    log::info!("  {}", describe::<i32>());
    log::info!("  {}", describe::<i64>());
    log::info!("  {}", describe::<u8>());
    log::info!("  {}", describe::<u16>());
    log::info!("  {}", describe::<u32>());
    log::info!("  {}", describe::<u64>());
    log::info!("  {}", describe::<f32>());
    log::info!("  {}", describe::<f64>());
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_count_follows_width() {
        assert_eq!(lane_count::<u8>(), VECTOR_BYTES);
        assert_eq!(lane_count::<i16>(), VECTOR_BYTES / 2);
        assert_eq!(lane_count::<f32>(), VECTOR_BYTES / 4);
        assert_eq!(lane_count::<u64>(), VECTOR_BYTES / 8);
    }

    #[test]
    fn test_backend_family_selection() {
        // Only f32, f64 and i32 have hardware engines; the rest are portable.
        assert_eq!(backend_family::<u16>(), BackendFamily::Portable);
        assert_eq!(backend_family::<i64>(), BackendFamily::Portable);

        #[cfg(lanewise_sse2)]
        {
            assert_eq!(backend_family::<f32>(), BackendFamily::Sse2);
            assert_eq!(backend_family::<f64>(), BackendFamily::Sse2);
            assert_eq!(backend_family::<i32>(), BackendFamily::Sse2);
        }
        #[cfg(not(lanewise_sse2))]
        {
            assert_eq!(backend_family::<f32>(), BackendFamily::Portable);
        }
    }

    #[test]
    fn test_describe_mentions_lanes() {
        let desc = describe::<i32>();
        println!("i32 backend: {}", desc);
        assert!(desc.contains(&format!("{} lanes of i32", lane_count::<i32>())));
        assert!(desc.contains(&VECTOR_BITS.to_string()));
    }
}
