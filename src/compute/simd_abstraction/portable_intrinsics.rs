//! Portable helpers that mirror the subset of SSE2 intrinsics the 128-bit
//! engine needs.
//!
//! The shift helpers take a runtime `count` (x86 `_mm_sll_*` with the count
//! in a register, NEON `vshlq_*` with a negative count for right shifts), so
//! the generic compress/expand rounds can pass `1 << round` directly.
//!
//! All functions are `unsafe` for the same reasons as the underlying
//! intrinsics (pointer validity, CPU features). Counts are always in
//! `0..lane_bits`; larger counts are never produced by callers.

use super::types::{__m128i, simd_arch};

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_set1_epi32(a: i32) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_set1_epi32(a)
    }
    #[cfg(target_arch = "aarch64")]
    {
        __m128i(simd_arch::vdupq_n_u32(a as u32))
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_set1_epi64x(a: i64) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_set1_epi64x(a)
    }
    #[cfg(target_arch = "aarch64")]
    {
        __m128i::from_u64(simd_arch::vdupq_n_u64(a as u64))
    }
}

/// Bitwise AND of two 128-bit vectors
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_and_si128(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_and_si128(a, b)
    }
    #[cfg(target_arch = "aarch64")]
    {
        __m128i(simd_arch::vandq_u32(a.0, b.0))
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_or_si128(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_or_si128(a, b)
    }
    #[cfg(target_arch = "aarch64")]
    {
        __m128i(simd_arch::vorrq_u32(a.0, b.0))
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_xor_si128(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_xor_si128(a, b)
    }
    #[cfg(target_arch = "aarch64")]
    {
        __m128i(simd_arch::veorq_u32(a.0, b.0))
    }
}

/// `!a & b`, matching the x86 operand order
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_andnot_si128(a: __m128i, b: __m128i) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_andnot_si128(a, b)
    }
    #[cfg(target_arch = "aarch64")]
    {
        // vbicq(x, y) = x & !y
        __m128i(simd_arch::vbicq_u32(b.0, a.0))
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_sll_epi32_var(a: __m128i, count: i32) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_sll_epi32(a, simd_arch::_mm_cvtsi32_si128(count))
    }
    #[cfg(target_arch = "aarch64")]
    {
        __m128i(simd_arch::vshlq_u32(a.0, simd_arch::vdupq_n_s32(count)))
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_srl_epi32_var(a: __m128i, count: i32) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_srl_epi32(a, simd_arch::_mm_cvtsi32_si128(count))
    }
    #[cfg(target_arch = "aarch64")]
    {
        // NEON shifts right by a negative left-shift count
        __m128i(simd_arch::vshlq_u32(a.0, simd_arch::vdupq_n_s32(-count)))
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_sll_epi64_var(a: __m128i, count: i32) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_sll_epi64(a, simd_arch::_mm_cvtsi32_si128(count))
    }
    #[cfg(target_arch = "aarch64")]
    {
        __m128i::from_u64(simd_arch::vshlq_u64(
            a.as_u64(),
            simd_arch::vdupq_n_s64(count as i64),
        ))
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_srl_epi64_var(a: __m128i, count: i32) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_srl_epi64(a, simd_arch::_mm_cvtsi32_si128(count))
    }
    #[cfg(target_arch = "aarch64")]
    {
        __m128i::from_u64(simd_arch::vshlq_u64(
            a.as_u64(),
            simd_arch::vdupq_n_s64(-(count as i64)),
        ))
    }
}

/// Load 128-bit value from unaligned memory
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_loadu_si128(p: *const __m128i) -> __m128i {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_loadu_si128(p)
    }
    #[cfg(target_arch = "aarch64")]
    {
        // NEON loads are unaligned by default
        __m128i(simd_arch::vld1q_u32(p as *const u32))
    }
}

/// Store 128-bit value to unaligned memory
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn _mm_storeu_si128(p: *mut __m128i, a: __m128i) {
    #[cfg(target_arch = "x86_64")]
    {
        simd_arch::_mm_storeu_si128(p, a);
    }
    #[cfg(target_arch = "aarch64")]
    {
        simd_arch::vst1q_u32(p as *mut u32, a.0);
    }
}
