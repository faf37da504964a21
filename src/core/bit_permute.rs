//! Generalized bit compress/expand (Hacker's Delight, 2nd ed., 7.4 and 7.7).
//!
//! `compress` gathers the bits of a word selected by a mask into a contiguous
//! low-order run; `expand` is the inverse scatter. Both run a fixed number of
//! parallel-prefix rounds (5 for 32-bit words, 6 for 64-bit words) with no
//! data-dependent branches and no tables, so they are total over every input
//! and map one-to-one onto lanewise SIMD shift/xor/and sequences.
//!
//! ```
//! use ferrous_lanes::core::bit_permute::BitPermute;
//!
//! assert_eq!(0xCAFEBABEu32.compress_bits(0xFF00FFF0), 0xCABAB);
//! assert_eq!(0x0000CABABu32.expand_bits(0xFF00FFF0), 0xCA00BAB0);
//! assert_eq!(0xCAFEBABEu32.sheep_and_goats(0xFF00FFF0), 0xCABABFEE);
//! ```

/// Branch-free bit permutations over fixed-width words.
pub trait BitPermute: Copy {
    /// Word width in bits.
    const BITS: u32;

    /// Number of parallel-prefix rounds, `log2(BITS)`.
    const ROUNDS: usize;

    /// XOR-prefix cascade: `x ^= x << 1; x ^= x << 2; ...` up to `BITS / 2`.
    ///
    /// Bit `k` of the result is the parity of bits `0..=k` of the input.
    fn parallel_suffix_xor(self) -> Self;

    /// Packs the bits of `self` selected by `mask` (LSB first) into the low
    /// bits of the result. All higher result bits are zero.
    fn compress_bits(self, mask: Self) -> Self;

    /// Scatters the low bits of `self` into the one-bit positions of `mask`
    /// (LSB first). All non-mask result bits are zero.
    fn expand_bits(self, mask: Self) -> Self;

    /// Compress towards the most significant end:
    /// `reverse(compress(reverse(self), reverse(mask)))`.
    fn compress_left(self, mask: Self) -> Self;

    /// Sheep-and-goats: masked bits packed high, unmasked bits packed low.
    fn sheep_and_goats(self, mask: Self) -> Self;

    /// Bit position of the one bit of `self` with index `n`, or `BITS` when
    /// `self` has `n` or fewer one bits.
    fn select_bit(self, n: u32) -> u32;
}

macro_rules! impl_bit_permute_unsigned {
    ($word:ty, $rounds:expr) => {
        impl BitPermute for $word {
            const BITS: u32 = <$word>::BITS;
            const ROUNDS: usize = $rounds;

            #[inline]
            fn parallel_suffix_xor(self) -> Self {
                let mut prefix = self;
                let mut shift = 1u32;
                while shift < Self::BITS {
                    prefix ^= prefix << shift;
                    shift <<= 1;
                }
                prefix
            }

            #[inline]
            fn compress_bits(self, mask: Self) -> Self {
                let mut mask = mask;
                let mut i = self & mask;
                // Bits with a zero of the mask immediately to their right
                let mut mask_count = !mask << 1;

                for round in 0..Self::ROUNDS {
                    let shift = 1u32 << round;
                    // Mask bits with an odd number of zeros to the right
                    let mask_prefix = mask_count.parallel_suffix_xor();
                    let mask_move = mask_prefix & mask;
                    mask = (mask ^ mask_move) | (mask_move >> shift);
                    let t = i & mask_move;
                    i = (i ^ t) | (t >> shift);
                    mask_count &= !mask_prefix;
                }
                i
            }

            #[inline]
            fn expand_bits(self, mask: Self) -> Self {
                let original_mask = mask;
                let mut mask = mask;
                let mut mask_count = !mask << 1;
                let mut moves: [$word; $rounds] = [0; $rounds];

                // Forward pass compacts the mask only and records each round's moves
                for (round, slot) in moves.iter_mut().enumerate() {
                    let mask_prefix = mask_count.parallel_suffix_xor();
                    let mask_move = mask_prefix & mask;
                    *slot = mask_move;
                    mask = (mask ^ mask_move) | (mask_move >> (1u32 << round));
                    mask_count &= !mask_prefix;
                }

                let mut i = self;
                for round in (0..Self::ROUNDS).rev() {
                    let t = i << (1u32 << round);
                    i = (i & !moves[round]) | (t & moves[round]);
                }
                i & original_mask
            }

            #[inline]
            fn compress_left(self, mask: Self) -> Self {
                self.reverse_bits()
                    .compress_bits(mask.reverse_bits())
                    .reverse_bits()
            }

            #[inline]
            fn sheep_and_goats(self, mask: Self) -> Self {
                self.compress_left(mask) | self.compress_bits(!mask)
            }

            #[inline]
            fn select_bit(self, n: u32) -> u32 {
                let nth = (1 as $word).checked_shl(n).unwrap_or(0);
                nth.expand_bits(self).trailing_zeros()
            }
        }
    };
}

impl_bit_permute_unsigned!(u32, 5);
impl_bit_permute_unsigned!(u64, 6);

// Signed words permute their two's-complement bit pattern.
macro_rules! impl_bit_permute_signed {
    ($word:ty, $unsigned:ty) => {
        impl BitPermute for $word {
            const BITS: u32 = <$unsigned as BitPermute>::BITS;
            const ROUNDS: usize = <$unsigned as BitPermute>::ROUNDS;

            #[inline]
            fn parallel_suffix_xor(self) -> Self {
                (self as $unsigned).parallel_suffix_xor() as $word
            }

            #[inline]
            fn compress_bits(self, mask: Self) -> Self {
                (self as $unsigned).compress_bits(mask as $unsigned) as $word
            }

            #[inline]
            fn expand_bits(self, mask: Self) -> Self {
                (self as $unsigned).expand_bits(mask as $unsigned) as $word
            }

            #[inline]
            fn compress_left(self, mask: Self) -> Self {
                (self as $unsigned).compress_left(mask as $unsigned) as $word
            }

            #[inline]
            fn sheep_and_goats(self, mask: Self) -> Self {
                (self as $unsigned).sheep_and_goats(mask as $unsigned) as $word
            }

            #[inline]
            fn select_bit(self, n: u32) -> u32 {
                (self as $unsigned).select_bit(n)
            }
        }
    };
}

impl_bit_permute_signed!(i32, u32);
impl_bit_permute_signed!(i64, u64);

/// 32-bit compress. See [`BitPermute::compress_bits`].
#[inline]
pub fn compress_u32(i: u32, mask: u32) -> u32 {
    i.compress_bits(mask)
}

/// 32-bit expand. See [`BitPermute::expand_bits`].
#[inline]
pub fn expand_u32(i: u32, mask: u32) -> u32 {
    i.expand_bits(mask)
}

/// 64-bit compress. See [`BitPermute::compress_bits`].
#[inline]
pub fn compress_u64(i: u64, mask: u64) -> u64 {
    i.compress_bits(mask)
}

/// 64-bit expand. See [`BitPermute::expand_bits`].
#[inline]
pub fn expand_u64(i: u64, mask: u64) -> u64 {
    i.expand_bits(mask)
}
