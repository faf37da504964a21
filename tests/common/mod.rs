// tests/common/mod.rs
// Bit-at-a-time references for compress/expand, independent of the
// parallel-prefix implementation.

#![allow(dead_code)]

/// Walks the mask's one bits from the least significant end, packing the
/// selected bits of `x` into the low end of the result.
pub fn naive_compress(x: u64, mask: u64, width: u32) -> u64 {
    let mut result = 0u64;
    let mut out_bit = 0;
    for bit in 0..width {
        if mask >> bit & 1 == 1 {
            result |= (x >> bit & 1) << out_bit;
            out_bit += 1;
        }
    }
    result
}

/// Deposits the low bits of `x`, in order, into the mask's one bits.
pub fn naive_expand(x: u64, mask: u64, width: u32) -> u64 {
    let mut result = 0u64;
    let mut in_bit = 0;
    for bit in 0..width {
        if mask >> bit & 1 == 1 {
            result |= (x >> in_bit & 1) << bit;
            in_bit += 1;
        }
    }
    result
}

pub fn naive_compress_u32(x: u32, mask: u32) -> u32 {
    naive_compress(x as u64, mask as u64, 32) as u32
}

pub fn naive_expand_u32(x: u32, mask: u32) -> u32 {
    naive_expand(x as u64, mask as u64, 32) as u32
}
