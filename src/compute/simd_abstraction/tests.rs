//! Unit tests for the SIMD abstraction layer.

#![cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]

use super::permute::*;
use super::{SimdEngine, SimdEngine128};
use crate::core::bit_permute::BitPermute;

const WORDS: [u32; 8] = [
    0xCAFE_BABE,
    0x0000_0000,
    0xFFFF_FFFF,
    0x8000_0001,
    0xDEAD_BEEF,
    0x1234_5678,
    0x0F0F_0F0F,
    0xA5A5_5A5A,
];

const MASKS: [u32; 8] = [
    0xFF00_FFF0,
    0xFFFF_FFFF,
    0x0000_0000,
    0x8000_0000,
    0x0F0F_F0F0,
    0x5555_5555,
    0xFFFF_0000,
    0x0000_0001,
];

/// Test bitwise operations for SimdEngine128
#[test]
fn test_simd_engine_128_bitwise() {
    unsafe {
        let a = SimdEngine128::set1_epi32(0b1111_0000);
        let b = SimdEngine128::set1_epi32(0b1010_1010);
        let mut out = [0u32; 4];

        SimdEngine128::storeu_u32(out.as_mut_ptr(), SimdEngine128::and(a, b));
        assert_eq!(out, [0b1010_0000; 4]);

        SimdEngine128::storeu_u32(out.as_mut_ptr(), SimdEngine128::or(a, b));
        assert_eq!(out, [0b1111_1010; 4]);

        SimdEngine128::storeu_u32(out.as_mut_ptr(), SimdEngine128::xor(a, b));
        assert_eq!(out, [0b0101_1010; 4]);

        // andnot(b, a) = !b & a
        SimdEngine128::storeu_u32(out.as_mut_ptr(), SimdEngine128::andnot(b, a));
        assert_eq!(out, [0b0101_0000; 4]);
    }
}

/// Test runtime-count shifts for both lane widths
#[test]
fn test_simd_engine_128_shifts() {
    unsafe {
        let words = [0x8000_0001u32, 0xF000_000F, 1, u32::MAX];
        let v = SimdEngine128::loadu_u32(words.as_ptr());
        let mut out = [0u32; 4];
        for count in [0, 1, 4, 16, 31] {
            SimdEngine128::storeu_u32(out.as_mut_ptr(), SimdEngine128::sll_epi32(v, count));
            assert_eq!(out, words.map(|w| w << count), "sll {}", count);
            SimdEngine128::storeu_u32(out.as_mut_ptr(), SimdEngine128::srl_epi32(v, count));
            assert_eq!(out, words.map(|w| w >> count), "srl {}", count);
        }

        let longs = [0x8000_0000_0000_0001u64, 0x0123_4567_89AB_CDEF];
        let v = SimdEngine128::loadu_u64(longs.as_ptr());
        let mut out = [0u64; 2];
        for count in [1, 8, 32, 63] {
            SimdEngine128::storeu_u64(out.as_mut_ptr(), SimdEngine128::sll_epi64(v, count));
            assert_eq!(out, longs.map(|w| w << count), "sll {}", count);
            SimdEngine128::storeu_u64(out.as_mut_ptr(), SimdEngine128::srl_epi64(v, count));
            assert_eq!(out, longs.map(|w| w >> count), "srl {}", count);
        }
    }
}

#[test]
fn test_register_compress_matches_word_function() {
    unsafe {
        for chunk in 0..2 {
            let words = &WORDS[chunk * 4..chunk * 4 + 4];
            let masks = &MASKS[chunk * 4..chunk * 4 + 4];
            let v = SimdEngine128::loadu_u32(words.as_ptr());
            let m = SimdEngine128::loadu_u32(masks.as_ptr());
            let mut out = [0u32; 4];

            SimdEngine128::storeu_u32(out.as_mut_ptr(), compress_epi32::<SimdEngine128>(v, m));
            for k in 0..4 {
                assert_eq!(out[k], words[k].compress_bits(masks[k]), "lane {}", k);
            }

            SimdEngine128::storeu_u32(out.as_mut_ptr(), expand_epi32::<SimdEngine128>(v, m));
            for k in 0..4 {
                assert_eq!(out[k], words[k].expand_bits(masks[k]), "lane {}", k);
            }
        }
    }
}

#[test]
fn test_register_parallel_suffix_xor() {
    unsafe {
        let v = SimdEngine128::loadu_u32(WORDS.as_ptr());
        let mut out = [0u32; 4];
        SimdEngine128::storeu_u32(out.as_mut_ptr(), parallel_suffix_xor_epi32::<SimdEngine128>(v));
        for k in 0..4 {
            assert_eq!(out[k], WORDS[k].parallel_suffix_xor());
        }
    }
}

#[test]
fn test_slice_kernels_handle_tails() {
    let input: Vec<u64> = (0..11u64).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15)).collect();
    let masks: Vec<u64> = (0..11u64).map(|i| (i * 0x0101_0101_0101_0101) ^ 0xF0F0).collect();
    let mut out = vec![0u64; 11];

    unsafe { compress_u64_slices::<SimdEngine128>(&input, &masks, &mut out) };
    for k in 0..11 {
        assert_eq!(out[k], input[k].compress_bits(masks[k]));
    }

    unsafe { expand_u64_slices::<SimdEngine128>(&input, &masks, &mut out) };
    for k in 0..11 {
        assert_eq!(out[k], input[k].expand_bits(masks[k]));
    }
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_simd_engine_256_matches_128() {
    use super::SimdEngine256;

    if !is_x86_feature_detected!("avx2") {
        eprintln!("Skipping AVX2 test: CPU does not support AVX2");
        return;
    }

    #[target_feature(enable = "avx2")]
    unsafe fn run(input: &[u32], masks: &[u32], out: &mut [u32]) {
        compress_u32_slices::<SimdEngine256>(input, masks, out)
    }

    let mut wide = [0u32; 8];
    let mut narrow = [0u32; 8];
    unsafe {
        run(&WORDS, &MASKS, &mut wide);
        compress_u32_slices::<SimdEngine128>(&WORDS, &MASKS, &mut narrow);
    }
    assert_eq!(wide, narrow);
}
