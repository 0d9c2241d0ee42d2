// Lane-wise operations, checked against scalar loops for every element type.

use std::ops::{BitAnd, BitOr, BitXor};

use approx::assert_relative_eq;
use lanewise::algorithm::{Maximum, Minimum, abs, max, min, minmax, reduce, reduce_tree, reduce_with, sqrt};
use lanewise::backend::{FloatBackend, IntegerBackend};
use lanewise::{Element, ElementAligned, ElementKind, Vector};
use num_traits::{AsPrimitive, Float};

// ============================================================================
// Helpers
// ============================================================================

/// `start, start + 1, ..` converted with `as` (wrapping for narrow integers).
fn iota<T: Element>(start: usize) -> Vec<T> {
    (0..Vector::<T>::LANES).map(|i| T::from_lane(start + i)).collect()
}

fn apply<T: Element>(data: &[T], f: impl Fn(T) -> T) -> Vec<T> {
    data.iter().map(|&x| f(x)).collect()
}

fn assert_lanes<T: Element>(x: Vector<T>, expected: &[T]) {
    println!("x:        {}", x);
    println!("expected: {:?}", expected);
    assert_eq!(x.to_vec(), expected);
}

/// Scalar reference arithmetic from `std`, independent of the crate's lane
/// kinds: integers wrap, division truncates, floats follow IEEE 754.
trait Reference: Element {
    fn ref_add(self, b: Self) -> Self;
    fn ref_sub(self, b: Self) -> Self;
    fn ref_mul(self, b: Self) -> Self;
    fn ref_div(self, b: Self) -> Self;
    fn ref_abs(self) -> Self;
}

macro_rules! reference_int {
    ($($t:ty => $abs:expr),* $(,)?) => {$(
        impl Reference for $t {
            fn ref_add(self, b: Self) -> Self { self.wrapping_add(b) }
            fn ref_sub(self, b: Self) -> Self { self.wrapping_sub(b) }
            fn ref_mul(self, b: Self) -> Self { self.wrapping_mul(b) }
            fn ref_div(self, b: Self) -> Self { self / b }
            fn ref_abs(self) -> Self { ($abs)(self) }
        }
    )*};
}

macro_rules! reference_float {
    ($($t:ty),*) => {$(
        impl Reference for $t {
            fn ref_add(self, b: Self) -> Self { self + b }
            fn ref_sub(self, b: Self) -> Self { self - b }
            fn ref_mul(self, b: Self) -> Self { self * b }
            fn ref_div(self, b: Self) -> Self { self / b }
            fn ref_abs(self) -> Self { self.abs() }
        }
    )*};
}

reference_int!(
    i8 => i8::wrapping_abs,
    i16 => i16::wrapping_abs,
    i32 => i32::wrapping_abs,
    i64 => i64::wrapping_abs,
    u8 => |x| x,
    u16 => |x| x,
    u32 => |x| x,
    u64 => |x| x,
);
reference_float!(f32, f64);

fn add<T: Reference>(a: T, b: T) -> T {
    a.ref_add(b)
}

fn sub<T: Reference>(a: T, b: T) -> T {
    a.ref_sub(b)
}

fn mul<T: Reference>(a: T, b: T) -> T {
    a.ref_mul(b)
}

fn div<T: Reference>(a: T, b: T) -> T {
    a.ref_div(b)
}

fn scalar<T: Element>(n: usize) -> T {
    T::from_lane(n)
}

fn to_f64<T: AsPrimitive<f64>>(x: T) -> f64 {
    x.as_()
}

// ============================================================================
// Checks shared by every element type
// ============================================================================

fn copy_and_construct<T: Element>() {
    let mut data = iota::<T>(5);
    let mut x = Vector::<T>::zero();

    x.copy_from_slice(&data, ElementAligned);
    assert_lanes(x, &data);

    data.fill(T::ZERO);
    x.copy_to_slice(&mut data, ElementAligned);
    assert_lanes(x, &data);

    let y = x;
    assert_lanes(y, &data);

    x = Vector::splat(scalar(42));
    assert_lanes(x, &vec![scalar::<T>(42); Vector::<T>::LANES]);

    for i in 0..Vector::<T>::LANES {
        let val = T::from_lane(2 * i + 42);
        x.set(i, val);
        assert_eq!(x.get(i), val);
        assert_eq!(x[i], val);
    }
}

fn addition<T: Reference>() {
    let mut data = iota::<T>(5);
    let mut x = Vector::from_slice(&data, ElementAligned);

    data = apply(&data, |e| add(e, scalar(5)));
    x += scalar::<T>(5);
    assert_lanes(x, &data);

    data = apply(&data, |e| add(e, scalar(3)));
    x = x + scalar::<T>(3);
    assert_lanes(x, &data);

    data = apply(&data, |e| add(e, T::ONE));
    assert_lanes(*x.increment(), &data);
    assert_lanes(x.post_increment(), &data);
}

fn subtraction<T: Reference>() {
    let mut data = iota::<T>(5);
    let mut x = Vector::from_slice(&data, ElementAligned);

    data = apply(&data, |e| sub(e, scalar(5)));
    x -= scalar::<T>(5);
    assert_lanes(x, &data);

    data = apply(&data, |e| sub(e, scalar(3)));
    x = x - scalar::<T>(3);
    assert_lanes(x, &data);

    data = apply(&data, |e| sub(e, T::ONE));
    assert_lanes(*x.decrement(), &data);
    assert_lanes(x.post_decrement(), &data);
}

fn multiplication<T: Reference>() {
    let mut data = iota::<T>(5);
    let mut x = Vector::from_slice(&data, ElementAligned);
    let minus_three = mul(scalar::<T>(3), T::NEG_ONE);

    data = apply(&data, |e| mul(e, scalar(5)));
    x *= scalar::<T>(5);
    assert_lanes(x, &data);

    data = apply(&data, |e| mul(e, minus_three));
    x = x * minus_three;
    assert_lanes(x, &data);

    data = apply(&data, |e| mul(e, T::NEG_ONE));
    assert_lanes(-x, &data);
}

fn division<T: Reference>() {
    let mut data = iota::<T>(120);
    let mut x = Vector::from_slice(&data, ElementAligned);
    let minus_three = mul(scalar::<T>(3), T::NEG_ONE);

    data = apply(&data, |e| div(e, scalar(5)));
    x /= scalar::<T>(5);
    assert_lanes(x, &data);

    data = apply(&data, |e| div(e, minus_three));
    x = x / minus_three;
    assert_lanes(x, &data);
}

fn comparison<T: Element>() {
    let data = iota::<T>(5);
    let x = Vector::from_slice(&data, ElementAligned);

    let mut y = x;
    assert!(x.simd_eq(y).all_of());
    assert!(x.simd_ne(y).is_clear());
    assert!(x.simd_lt(y).is_clear());
    assert!(x.simd_le(y).all_of());
    assert!(x.simd_gt(y).is_clear());
    assert!(x.simd_ge(y).all_of());

    y = Vector::from_slice(&data, ElementAligned);
    y += T::ONE;
    assert!(x.simd_eq(y).is_clear());
    assert!(x.simd_ne(y).all_of());
    assert!(x.simd_lt(y).all_of());
    assert!(x.simd_le(y).all_of());
    assert!(x.simd_gt(y).is_clear());
    assert!(x.simd_ge(y).is_clear());
}

fn elementwise_binary<T: Element>() {
    let data_x = iota::<T>(0);
    let data_y: Vec<T> = data_x.iter().rev().copied().collect();
    let x = Vector::from_slice(&data_x, ElementAligned);
    let y = Vector::from_slice(&data_y, ElementAligned);

    let expected_min: Vec<T> = data_x
        .iter()
        .zip(&data_y)
        .map(|(&a, &b)| if b < a { b } else { a })
        .collect();
    assert_lanes(min(x, y), &expected_min);

    let expected_max: Vec<T> = data_x
        .iter()
        .zip(&data_y)
        .map(|(&a, &b)| if b > a { b } else { a })
        .collect();
    assert_lanes(max(x, y), &expected_max);
}

fn absolute<T: Reference>() {
    // Straddle zero for signed types.
    let start = mul(scalar::<T>(Vector::<T>::LANES / 2), T::NEG_ONE);
    let x = Vector::index_series(start, T::ONE);
    let expected: Vec<T> = x.iter().map(T::ref_abs).collect();
    assert_lanes(abs(x), &expected);
}

fn reductions<T: Reference + AsPrimitive<f64>>() {
    let data = iota::<T>(5);
    let x = Vector::from_slice(&data, ElementAligned);

    let sum_vec = data.iter().fold(T::ZERO, |acc, &e| add(acc, e));
    let sum_simd = reduce(x);
    println!("sum: {} reduce(x): {}", sum_vec, sum_simd);
    assert_eq!(sum_vec, sum_simd);

    let product_vec = data.iter().fold(T::ONE, |acc, &e| mul(acc, e));
    let product_simd = reduce_with(x, |a: Vector<T>, b: Vector<T>| a * b);
    println!("product: {} reduce(x, mul): {}", product_vec, product_simd);
    if T::KIND == ElementKind::Float {
        assert_relative_eq!(to_f64(product_vec), to_f64(product_simd), max_relative = 1e-6);
    } else {
        assert_eq!(product_vec, product_simd);
    }
}

// ============================================================================
// Kind-restricted checks
// ============================================================================

fn bitwise<T>()
where
    T: Element + BitAnd<Output = T> + BitOr<Output = T> + BitXor<Output = T>,
    T::Backend: IntegerBackend,
{
    let mut data = iota::<T>(5);
    let mut x = Vector::from_slice(&data, ElementAligned);

    data = apply(&data, |e| e & scalar(0x03));
    x &= scalar::<T>(0x03);
    assert_lanes(x, &data);

    data = apply(&data, |e| e | scalar(0xF0));
    x |= scalar::<T>(0xF0);
    assert_lanes(x, &data);

    data = apply(&data, |e| e ^ scalar(0xFF));
    x ^= scalar::<T>(0xFF);
    assert_lanes(x, &data);
}

fn square_root<T: Element + AsPrimitive<f64>>()
where
    T::Backend: FloatBackend,
{
    let data = iota::<T>(5);
    let x = Vector::from_slice(&data, ElementAligned);
    let root = sqrt(x);
    for (i, &e) in data.iter().enumerate() {
        let expected = to_f64(e).sqrt();
        assert_relative_eq!(to_f64(root.get(i)), expected, max_relative = 1e-6);
    }
}

/// A NaN lane loses to a number in min/max whichever side it is on, and every
/// ordered comparison with NaN is false while `simd_ne` is true.
fn nan_edge_cases<T: Element + Float>() {
    let n = Vector::<T>::LANES;
    let nan = Vector::<T>::splat(T::nan());
    let one = Vector::<T>::splat(T::one());
    println!("backend: {}", lanewise::config::describe::<T>());

    for (a, b) in [(one, nan), (nan, one)] {
        assert_lanes(min(a, b), &vec![T::one(); n]);
        assert_lanes(max(a, b), &vec![T::one(); n]);
        let (lo, hi) = minmax(a, b);
        assert_eq!(lo, one);
        assert_eq!(hi, one);
    }
    assert!(min(nan, nan).iter().all(|e| e.is_nan()));
    assert!(max(nan, nan).iter().all(|e| e.is_nan()));

    // NaN alternates between the operands lane by lane.
    let a = Vector::<T>::from_fn(|i| if i % 2 == 0 { T::nan() } else { T::from_lane(i) });
    let b = Vector::<T>::from_fn(|i| if i % 2 == 0 { T::from_lane(i) } else { T::nan() });
    let lanes: Vec<T> = (0..n).map(T::from_lane).collect();
    assert_lanes(min(a, b), &lanes);
    assert_lanes(min(b, a), &lanes);
    assert_lanes(max(a, b), &lanes);
    assert_lanes(max(b, a), &lanes);

    for (x, y) in [(nan, nan), (nan, one), (one, nan)] {
        assert!(x.simd_eq(y).is_clear());
        assert!(x.simd_ne(y).all_of());
        assert!(x.simd_lt(y).is_clear());
        assert!(x.simd_le(y).is_clear());
        assert!(x.simd_gt(y).is_clear());
        assert!(x.simd_ge(y).is_clear());
    }

    // One NaN lane anywhere is skipped by the min/max reductions.
    for pos in 0..n {
        let x = Vector::<T>::from_fn(|i| if i == pos { T::nan() } else { T::from_lane(i + 1) });
        let rest: Vec<T> = (0..n).filter(|&i| i != pos).map(|i| T::from_lane(i + 1)).collect();
        let lo = rest.iter().copied().fold(T::infinity(), T::min);
        let hi = rest.iter().copied().fold(T::neg_infinity(), T::max);
        assert_eq!(reduce_with(x, Minimum), lo, "NaN in lane {}", pos);
        assert_eq!(reduce_with(x, Maximum), hi, "NaN in lane {}", pos);
        assert_eq!(reduce_tree(x, &Minimum), lo, "NaN in lane {}", pos);
        assert_eq!(reduce_tree(x, &Maximum), hi, "NaN in lane {}", pos);
        assert_eq!(x.reduce_min(), lo);
        assert_eq!(x.reduce_max(), hi);
    }
}

// ============================================================================
// Per-type instantiation
// ============================================================================

macro_rules! operation_tests {
    ($module:ident, $t:ty) => {
        mod $module {
            use super::*;

            #[test]
            fn copy_and_construct() {
                super::copy_and_construct::<$t>();
            }

            #[test]
            fn addition() {
                super::addition::<$t>();
            }

            #[test]
            fn subtraction() {
                super::subtraction::<$t>();
            }

            #[test]
            fn multiplication() {
                super::multiplication::<$t>();
            }

            #[test]
            fn division() {
                super::division::<$t>();
            }

            #[test]
            fn comparison() {
                super::comparison::<$t>();
            }

            #[test]
            fn elementwise_binary() {
                super::elementwise_binary::<$t>();
            }

            #[test]
            fn absolute() {
                super::absolute::<$t>();
            }

            #[test]
            fn reductions() {
                super::reductions::<$t>();
            }
        }
    };
}

operation_tests!(int8, i8);
operation_tests!(int16, i16);
operation_tests!(int32, i32);
operation_tests!(int64, i64);
operation_tests!(uint8, u8);
operation_tests!(uint16, u16);
operation_tests!(uint32, u32);
operation_tests!(uint64, u64);
operation_tests!(float32, f32);
operation_tests!(float64, f64);

#[test]
fn bitwise_integers() {
    bitwise::<i8>();
    bitwise::<i16>();
    bitwise::<i32>();
    bitwise::<i64>();
    bitwise::<u8>();
    bitwise::<u16>();
    bitwise::<u32>();
    bitwise::<u64>();
}

#[test]
fn nan_operands_floats() {
    nan_edge_cases::<f32>();
    nan_edge_cases::<f64>();
}

#[test]
fn square_root_floats() {
    square_root::<f32>();
    square_root::<f64>();
}
