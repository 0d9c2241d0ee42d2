// tests/scenario.rs
//
// End-to-end walk through the public API on an eight-lane integer vector.
// Which integer type has eight lanes depends on the configured width.

use lanewise::algorithm::{choose, mask_assign, reduce};
use lanewise::{Element, ElementAligned, Mask, Vector, VectorAligned, config};

#[cfg(not(any(feature = "width-256", feature = "width-512")))]
type Lane8 = i16;
#[cfg(all(feature = "width-256", not(feature = "width-512")))]
type Lane8 = i32;
#[cfg(feature = "width-512")]
type Lane8 = i64;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_eight_lane_walkthrough() {
    init_logging();
    log::info!("eight-lane type: {}", config::describe::<Lane8>());
    assert_eq!(Vector::<Lane8>::LANES, 8);

    let data: [Lane8; 8] = [5, 6, 7, 8, 9, 10, 11, 12];
    let mut x = Vector::from_slice(&data, ElementAligned);
    x += 3;
    assert_eq!(x.to_vec(), vec![8, 9, 10, 11, 12, 13, 14, 15]);
    assert_eq!(x.to_string(), "( 8 9 10 11 12 13 14 15 )");

    assert_eq!(reduce(x), 92);

    let even = (x & 1).simd_eq(Vector::zero());
    assert_eq!(even.popcount(), 4);
    assert_eq!(even.to_string(), "( 1 0 1 0 1 0 1 0 )");

    let kept = choose(even, x, Vector::splat(0));
    assert_eq!(kept.to_vec(), vec![8, 0, 10, 0, 12, 0, 14, 0]);

    let mut odd_only = x;
    mask_assign(even, &mut odd_only, Vector::zero());
    assert_eq!(odd_only.to_vec(), vec![0, 9, 0, 11, 0, 13, 0, 15]);
}

#[test]
fn test_walkthrough_any_width() {
    init_logging();
    let n = Vector::<i32>::LANES as i32;
    let mut x = Vector::<i32>::index_series(5, 1);
    x += 3;
    let expected_sum: i32 = (8..8 + n).sum();
    assert_eq!(reduce(x), expected_sum);

    let even: Mask<i32> = (x & 1).simd_eq(Vector::zero());
    assert_eq!(even.popcount(), (n / 2) as usize);
    let kept = choose(even, x, Vector::zero());
    for (i, lane) in kept.iter().enumerate() {
        let value = 8 + i as i32;
        assert_eq!(lane, if value % 2 == 0 { value } else { 0 });
    }
}

#[test]
fn test_vector_aligned_round_trip() {
    init_logging();

    // Over-allocate and find a vector-aligned window.
    let align = config::memory_alignment();
    let lanes = Vector::<f32>::LANES;
    let buffer: Vec<f32> = (0..lanes + align).map(|i| i as f32).collect();
    let offset = buffer.as_ptr().align_offset(align);
    let window = &buffer[offset..offset + lanes];

    let v = Vector::from_slice(window, VectorAligned);
    let mut out = vec![0f32; lanes + align];
    let out_offset = out.as_ptr().align_offset(align);
    v.copy_to_slice(&mut out[out_offset..], VectorAligned);
    assert_eq!(&out[out_offset..out_offset + lanes], window);
}

#[test]
fn test_configuration_is_logged() {
    init_logging();
    config::log_configuration();
    for desc in [
        config::describe::<u8>(),
        config::describe::<f64>(),
        config::describe::<<f64 as Element>::Bits>(),
    ] {
        assert!(desc.contains(&format!("{}-bit", lanewise::VECTOR_BITS)));
    }
}
