// tests/bit_permute_laws.rs
// Algebraic identities of bit compress/expand for 32- and 64-bit words.

mod common;

use common::{naive_compress, naive_compress_u32, naive_expand, naive_expand_u32};
use ferrous_lanes::core::{compress_u32, compress_u64, expand_u32, expand_u64, BitPermute};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2048))]

    #[test]
    fn compress_matches_bit_loop_32(x in any::<u32>(), m in any::<u32>()) {
        prop_assert_eq!(compress_u32(x, m), naive_compress_u32(x, m));
        prop_assert_eq!(expand_u32(x, m), naive_expand_u32(x, m));
    }

    #[test]
    fn compress_matches_bit_loop_64(x in any::<u64>(), m in any::<u64>()) {
        prop_assert_eq!(compress_u64(x, m), naive_compress(x, m, 64));
        prop_assert_eq!(expand_u64(x, m), naive_expand(x, m, 64));
    }

    #[test]
    fn compress_ignores_unmasked_bits_32(x in any::<u32>(), m in any::<u32>()) {
        prop_assert_eq!(x.compress_bits(m), (x & m).compress_bits(m));
    }

    #[test]
    fn compress_ignores_unmasked_bits_64(x in any::<u64>(), m in any::<u64>()) {
        prop_assert_eq!(x.compress_bits(m), (x & m).compress_bits(m));
    }

    #[test]
    fn single_bit_masks_32(x in any::<u32>(), n in 0u32..32) {
        prop_assert_eq!(x.compress_bits(1 << n), (x >> n) & 1);
        prop_assert_eq!(x.expand_bits(1 << n), (x & 1) << n);
    }

    #[test]
    fn single_bit_masks_64(x in any::<u64>(), n in 0u32..64) {
        prop_assert_eq!(x.compress_bits(1 << n), (x >> n) & 1);
        prop_assert_eq!(x.expand_bits(1 << n), (x & 1) << n);
    }

    #[test]
    fn high_run_masks_are_shifts_32(x in any::<u32>(), n in 0u32..32) {
        prop_assert_eq!(x.compress_bits(u32::MAX << n), x >> n);
        prop_assert_eq!(x.expand_bits(u32::MAX << n), x << n);
    }

    #[test]
    fn high_run_masks_are_shifts_64(x in any::<u64>(), n in 0u32..64) {
        prop_assert_eq!(x.compress_bits(u64::MAX << n), x >> n);
        prop_assert_eq!(x.expand_bits(u64::MAX << n), x << n);
    }

    #[test]
    fn mask_compresses_to_low_run_32(m in any::<u32>()) {
        let expected = if m == 0 || m == u32::MAX { m } else { (1u32 << m.count_ones()) - 1 };
        prop_assert_eq!(m.compress_bits(m), expected);
        prop_assert_eq!(u32::MAX.expand_bits(m), m);
    }

    #[test]
    fn mask_compresses_to_low_run_64(m in any::<u64>()) {
        let expected = if m == 0 || m == u64::MAX { m } else { (1u64 << m.count_ones()) - 1 };
        prop_assert_eq!(m.compress_bits(m), expected);
        prop_assert_eq!(u64::MAX.expand_bits(m), m);
    }

    #[test]
    fn round_trips_32(x in any::<u32>(), m in any::<u32>()) {
        prop_assert_eq!(x.expand_bits(m).compress_bits(m), x & m.compress_bits(m));
        prop_assert_eq!(x.compress_bits(m).expand_bits(m), x & m);
        prop_assert_eq!(x.expand_bits(m) & m, x.expand_bits(m));
    }

    #[test]
    fn round_trips_64(x in any::<u64>(), m in any::<u64>()) {
        prop_assert_eq!(x.expand_bits(m).compress_bits(m), x & m.compress_bits(m));
        prop_assert_eq!(x.compress_bits(m).expand_bits(m), x & m);
        prop_assert_eq!(x.expand_bits(m) & m, x.expand_bits(m));
    }

    #[test]
    fn signed_views_share_bits(x in any::<i64>(), m in any::<i64>()) {
        prop_assert_eq!(x.compress_bits(m) as u64, (x as u64).compress_bits(m as u64));
        prop_assert_eq!(x.expand_bits(m) as u64, (x as u64).expand_bits(m as u64));
        let (x, m) = (x as i32, m as i32);
        prop_assert_eq!(x.compress_bits(m) as u32, (x as u32).compress_bits(m as u32));
    }

    #[test]
    fn sheep_and_goats_partitions_bits(x in any::<u32>(), m in any::<u32>()) {
        let sag = x.sheep_and_goats(m);
        prop_assert_eq!(sag.count_ones(), x.count_ones());
        let low = (!m).count_ones();
        let low_mask = if low == 32 { u32::MAX } else { (1u32 << low) - 1 };
        prop_assert_eq!(sag & low_mask, x.compress_bits(!m));
    }

    #[test]
    fn select_bit_finds_nth_one(x in any::<u64>(), n in 0u32..64) {
        let pos = x.select_bit(n);
        if n < x.count_ones() {
            prop_assert_eq!(x >> pos & 1, 1);
            let below = if pos == 0 { 0 } else { x & ((1u64 << pos) - 1) };
            prop_assert_eq!(below.count_ones(), n);
        } else {
            prop_assert_eq!(pos, 64);
        }
    }
}

#[test]
fn test_worked_examples() {
    assert_eq!(compress_u32(0xCAFE_BABE, 0xFF00_FFF0), 0xCABAB);
    assert_eq!(expand_u32(0x000C_ABAB, 0xFF00_FFF0), 0xCA00_BAB0);
    assert_eq!(0xCAFE_BABEu32.sheep_and_goats(0xFF00_FFF0), 0xCABA_BFEE);
    assert_eq!(0xCAFE_BABEu32.compress_left(0xFF00_FFF0), 0xCABA_B000);
}

#[test]
fn test_boundary_masks() {
    for x in [0u64, 1, 0xDEAD_BEEF_CAFE_BABE, u64::MAX] {
        assert_eq!(x.compress_bits(0), 0);
        assert_eq!(x.expand_bits(0), 0);
        assert_eq!(x.compress_bits(u64::MAX), x);
        assert_eq!(x.expand_bits(u64::MAX), x);
        let w = x as u32;
        assert_eq!(w.compress_bits(0), 0);
        assert_eq!(w.expand_bits(u32::MAX), w);
    }
}
