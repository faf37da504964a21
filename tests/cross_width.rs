// tests/cross_width.rs
// The same logical arrays processed at every lane width must produce
// identical output, equal to the scalar loop.

mod common;

use common::naive_compress;
use ferrous_lanes::core::BitPermute;
use ferrous_lanes::kernels::{
    compress_bits_lanewise, expand_bits_lanewise, popcount_lanewise, selective_store,
    selective_store_scalar,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LEN: usize = 10_007;

fn random_words32(rng: &mut StdRng) -> (Vec<i32>, Vec<i32>) {
    let input = (0..LEN).map(|_| rng.gen()).collect();
    let masks = (0..LEN).map(|_| rng.gen::<i32>() & rng.gen::<i32>()).collect();
    (input, masks)
}

#[test]
fn test_compress_bits_identical_across_widths_32() {
    let mut rng = StdRng::seed_from_u64(0x1234);
    let (input, masks) = random_words32(&mut rng);
    let scalar: Vec<i32> = input.iter().zip(&masks).map(|(&x, &m)| x.compress_bits(m)).collect();

    let mut out64 = vec![0i32; LEN];
    let mut out128 = vec![0i32; LEN];
    let mut out256 = vec![0i32; LEN];
    let mut out512 = vec![0i32; LEN];
    compress_bits_lanewise::<i32, 2>(&input, &masks, &mut out64).unwrap();
    compress_bits_lanewise::<i32, 4>(&input, &masks, &mut out128).unwrap();
    compress_bits_lanewise::<i32, 8>(&input, &masks, &mut out256).unwrap();
    compress_bits_lanewise::<i32, 16>(&input, &masks, &mut out512).unwrap();

    assert_eq!(out64, scalar);
    assert_eq!(out128, scalar);
    assert_eq!(out256, scalar);
    assert_eq!(out512, scalar);
}

#[test]
fn test_expand_bits_identical_across_widths_64() {
    let mut rng = StdRng::seed_from_u64(0x5678);
    let input: Vec<i64> = (0..LEN).map(|_| rng.gen()).collect();
    let masks: Vec<i64> = (0..LEN).map(|_| rng.gen::<i64>() | rng.gen::<i64>()).collect();
    let scalar: Vec<i64> = input.iter().zip(&masks).map(|(&x, &m)| x.expand_bits(m)).collect();

    let mut outputs = vec![vec![0i64; LEN]; 4];
    expand_bits_lanewise::<i64, 1>(&input, &masks, &mut outputs[0]).unwrap();
    expand_bits_lanewise::<i64, 2>(&input, &masks, &mut outputs[1]).unwrap();
    expand_bits_lanewise::<i64, 4>(&input, &masks, &mut outputs[2]).unwrap();
    expand_bits_lanewise::<i64, 8>(&input, &masks, &mut outputs[3]).unwrap();
    for out in &outputs {
        assert_eq!(out, &scalar);
    }
}

#[test]
fn test_lanewise_compress_matches_bit_loop() {
    let mut rng = StdRng::seed_from_u64(0x9ABC);
    let input: Vec<i64> = (0..LEN).map(|_| rng.gen()).collect();
    let masks: Vec<i64> = (0..LEN).map(|_| rng.gen()).collect();
    let mut out = vec![0i64; LEN];
    compress_bits_lanewise::<i64, 4>(&input, &masks, &mut out).unwrap();
    for k in 0..LEN {
        assert_eq!(out[k] as u64, naive_compress(input[k] as u64, masks[k] as u64, 64), "word {}", k);
    }
}

#[test]
fn test_popcount_identical_across_widths() {
    let mut rng = StdRng::seed_from_u64(0xDEF0);
    let input: Vec<i16> = (0..LEN).map(|_| rng.gen()).collect();
    let scalar: Vec<i16> = input.iter().map(|x| x.count_ones() as i16).collect();
    let mut out = vec![0i16; LEN];
    popcount_lanewise::<i16, 4>(&input, &mut out).unwrap();
    assert_eq!(out, scalar);
    popcount_lanewise::<i16, 32>(&input, &mut out).unwrap();
    assert_eq!(out, scalar);
}

fn conflict_data<T>(rng: &mut StdRng, mismatch_rate: f64) -> (Vec<T>, Vec<T>, Vec<T>)
where
    T: Copy + std::ops::BitXor<Output = T> + From<i8> + TryFrom<usize>,
    rand::distributions::Standard: rand::distributions::Distribution<T>,
{
    let a: Vec<T> = (0..LEN).map(|_| rng.gen()).collect();
    let b: Vec<T> = a
        .iter()
        .map(|&x| if rng.gen_bool(mismatch_rate) { x ^ T::from(1i8) } else { x })
        .collect();
    let idx: Vec<T> = (0..LEN)
        .map(|_| T::try_from(rng.gen_range(0..LEN)).unwrap_or_else(|_| T::from(0i8)))
        .collect();
    (a, b, idx)
}

#[test]
fn test_selective_store_int_all_widths() {
    let mut rng = StdRng::seed_from_u64(20);
    let (a, b, idx) = conflict_data::<i32>(&mut rng, 0.2);
    let mut expected = vec![0i32; LEN];
    let n = selective_store_scalar(&a, &b, &idx, &mut expected).unwrap();
    assert!(n > 0 && n < LEN);

    let mut out = vec![0i32; LEN];
    assert_eq!(selective_store::<i32, 2>(&a, &b, &idx, &mut out).unwrap(), n);
    assert_eq!(out[..n], expected[..n]);
    let mut out = vec![0i32; LEN];
    assert_eq!(selective_store::<i32, 4>(&a, &b, &idx, &mut out).unwrap(), n);
    assert_eq!(out[..n], expected[..n]);
    let mut out = vec![0i32; LEN];
    assert_eq!(selective_store::<i32, 8>(&a, &b, &idx, &mut out).unwrap(), n);
    assert_eq!(out[..n], expected[..n]);
    let mut out = vec![0i32; LEN];
    assert_eq!(selective_store::<i32, 16>(&a, &b, &idx, &mut out).unwrap(), n);
    assert_eq!(out[..n], expected[..n]);
}

#[test]
fn test_selective_store_long_all_widths() {
    let mut rng = StdRng::seed_from_u64(64);
    let (a, b, idx) = conflict_data::<i64>(&mut rng, 0.5);
    let mut expected = vec![0i64; LEN];
    let n = selective_store_scalar(&a, &b, &idx, &mut expected).unwrap();

    for (lanes, count) in [
        (1, selective_store::<i64, 1>(&a, &b, &idx, &mut vec![0; LEN])),
        (2, selective_store::<i64, 2>(&a, &b, &idx, &mut vec![0; LEN])),
        (4, selective_store::<i64, 4>(&a, &b, &idx, &mut vec![0; LEN])),
        (8, selective_store::<i64, 8>(&a, &b, &idx, &mut vec![0; LEN])),
    ] {
        assert_eq!(count.unwrap(), n, "{} lanes", lanes);
    }

    let mut out = vec![0i64; LEN];
    selective_store::<i64, 8>(&a, &b, &idx, &mut out).unwrap();
    assert_eq!(out[..n], expected[..n]);
}

#[test]
fn test_selective_store_no_conflicts() {
    let data: Vec<i32> = (0..100).collect();
    let mut out = vec![-1i32; 100];
    assert_eq!(selective_store::<i32, 8>(&data, &data, &data, &mut out).unwrap(), 0);
    assert!(out.iter().all(|&x| x == -1));
}
