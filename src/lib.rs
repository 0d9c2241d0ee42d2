//! Fixed-width lane-parallel vectors and masks.
//!
//! `Vector<T>` holds as many `T` lanes as fit in one native vector register
//! and lowers every arithmetic, comparison and reduction to a single backend
//! register operation. `Mask<T>` is the matching one-boolean-per-lane
//! predicate. The register width is fixed at build time (see [`config`]).
//!
//! ```
//! use lanewise::{Vector, ElementAligned, algorithm::{choose, reduce}};
//!
//! let data: Vec<i32> = (0..Vector::<i32>::LANES as i32).collect();
//! let mut x = Vector::from_slice(&data, ElementAligned);
//! x += 3;
//! let even = (x & 1).simd_eq(Vector::zero());
//! let kept = choose(even, x, Vector::zero());
//! assert_eq!(reduce(kept), kept.to_vec().iter().sum::<i32>());
//! ```

pub mod algorithm;
pub mod align;
pub mod backend;
pub mod config;
pub mod element;
pub mod error;
pub mod kind;
pub mod mask;
pub mod vector;

pub use align::{Alignment, ElementAligned, VectorAligned};
pub use config::{BackendFamily, VECTOR_BITS, VECTOR_BYTES};
pub use element::Element;
pub use error::{Error, Result};
pub use kind::ElementKind;
pub use mask::Mask;
pub use vector::Vector;
