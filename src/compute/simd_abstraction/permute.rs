//! Register-wide bit compress/expand.
//!
//! The same parallel-prefix rounds as `core::bit_permute`, written against
//! [`SimdEngine`] so every lane of a register is permuted at once. Each lane
//! computes exactly what the scalar word function computes for its value and
//! mask.
//!
//! All functions are `#[inline(always)]` so they are compiled into the
//! caller's `#[target_feature]` context.

use super::SimdEngine;
use crate::core::bit_permute::BitPermute;

macro_rules! register_permute {
    (
        word: $word:ty,
        rounds: $rounds:expr,
        bits: $bits:expr,
        width: $width:ident,
        set1: $set1:ident,
        sll: $sll:ident,
        srl: $srl:ident,
        load: $load:ident,
        store: $store:ident,
        psx: $psx:ident,
        compress: $compress:ident,
        expand: $expand:ident,
        compress_slices: $compress_slices:ident,
        expand_slices: $expand_slices:ident $(,)?
    ) => {
        /// XOR-prefix cascade over every lane: `x ^= x << 1; x ^= x << 2; ...`
        #[inline(always)]
        pub unsafe fn $psx<E: SimdEngine>(x: E::Vec) -> E::Vec {
            let mut prefix = x;
            let mut shift = 1i32;
            while shift < $bits {
                prefix = E::xor(prefix, E::$sll(prefix, shift));
                shift <<= 1;
            }
            prefix
        }

        /// Lanewise `compress(i, mask)`.
        #[inline(always)]
        pub unsafe fn $compress<E: SimdEngine>(i: E::Vec, mask: E::Vec) -> E::Vec {
            let ones = E::$set1(-1);
            let mut mask = mask;
            let mut i = E::and(i, mask);
            let mut mask_count = E::$sll(E::xor(mask, ones), 1);

            for round in 0..$rounds {
                let shift = 1i32 << round;
                let mask_prefix = $psx::<E>(mask_count);
                let mask_move = E::and(mask_prefix, mask);
                mask = E::or(E::xor(mask, mask_move), E::$srl(mask_move, shift));
                let t = E::and(i, mask_move);
                i = E::or(E::xor(i, t), E::$srl(t, shift));
                mask_count = E::andnot(mask_prefix, mask_count);
            }
            i
        }

        /// Lanewise `expand(i, mask)`.
        #[inline(always)]
        pub unsafe fn $expand<E: SimdEngine>(i: E::Vec, mask: E::Vec) -> E::Vec {
            let ones = E::$set1(-1);
            let original_mask = mask;
            let mut mask = mask;
            let mut mask_count = E::$sll(E::xor(mask, ones), 1);
            let mut moves = [E::$set1(0); $rounds];

            for (round, slot) in moves.iter_mut().enumerate() {
                let mask_prefix = $psx::<E>(mask_count);
                let mask_move = E::and(mask_prefix, mask);
                *slot = mask_move;
                mask = E::or(E::xor(mask, mask_move), E::$srl(mask_move, 1i32 << round));
                mask_count = E::andnot(mask_prefix, mask_count);
            }

            let mut i = i;
            for round in (0..$rounds).rev() {
                let t = E::$sll(i, 1i32 << round);
                i = E::or(E::andnot(moves[round], i), E::and(t, moves[round]));
            }
            E::and(i, original_mask)
        }

        /// `out[k] = compress(input[k], masks[k])` for equal-length slices.
        /// Full registers go through the engine, the tail through the word
        /// function.
        ///
        /// # Safety
        /// The engine's CPU features must be available. Slice lengths are
        /// checked by the caller.
        #[inline(always)]
        pub unsafe fn $compress_slices<E: SimdEngine>(input: &[$word], masks: &[$word], out: &mut [$word]) {
            debug_assert!(input.len() == masks.len() && input.len() == out.len());
            let lanes = E::$width;
            let len = input.len().min(masks.len()).min(out.len());
            let bound = len - len % lanes;

            let mut k = 0;
            while k < bound {
                let v = E::$load(input.as_ptr().add(k));
                let m = E::$load(masks.as_ptr().add(k));
                E::$store(out.as_mut_ptr().add(k), $compress::<E>(v, m));
                k += lanes;
            }
            for k in bound..len {
                out[k] = input[k].compress_bits(masks[k]);
            }
        }

        /// `out[k] = expand(input[k], masks[k])`. See the compress variant.
        ///
        /// # Safety
        /// The engine's CPU features must be available.
        #[inline(always)]
        pub unsafe fn $expand_slices<E: SimdEngine>(input: &[$word], masks: &[$word], out: &mut [$word]) {
            debug_assert!(input.len() == masks.len() && input.len() == out.len());
            let lanes = E::$width;
            let len = input.len().min(masks.len()).min(out.len());
            let bound = len - len % lanes;

            let mut k = 0;
            while k < bound {
                let v = E::$load(input.as_ptr().add(k));
                let m = E::$load(masks.as_ptr().add(k));
                E::$store(out.as_mut_ptr().add(k), $expand::<E>(v, m));
                k += lanes;
            }
            for k in bound..len {
                out[k] = input[k].expand_bits(masks[k]);
            }
        }
    };
}

register_permute! {
    word: u32,
    rounds: 5,
    bits: 32,
    width: WIDTH_32,
    set1: set1_epi32,
    sll: sll_epi32,
    srl: srl_epi32,
    load: loadu_u32,
    store: storeu_u32,
    psx: parallel_suffix_xor_epi32,
    compress: compress_epi32,
    expand: expand_epi32,
    compress_slices: compress_u32_slices,
    expand_slices: expand_u32_slices,
}

register_permute! {
    word: u64,
    rounds: 6,
    bits: 64,
    width: WIDTH_64,
    set1: set1_epi64,
    sll: sll_epi64,
    srl: srl_epi64,
    load: loadu_u64,
    store: storeu_u64,
    psx: parallel_suffix_xor_epi64,
    compress: compress_epi64,
    expand: expand_epi64,
    compress_slices: compress_u64_slices,
    expand_slices: expand_u64_slices,
}
