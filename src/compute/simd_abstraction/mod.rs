//! An abstraction layer for SIMD intrinsics.
//!
//! Bit compress/expand is nothing but lanewise shift, xor, and, or and
//! and-not over 32- or 64-bit lanes, so one generic kernel written against
//! [`SimdEngine`] runs on every register width:
//! - `SimdEngine128`: SSE2 on x86_64, NEON on aarch64 (4 x u32, 2 x u64)
//! - `SimdEngine256`: AVX2 on x86_64 (8 x u32, 4 x u64)
//! - `SimdEngine512`: AVX-512F on x86_64, behind the `avx512` feature
//!   (16 x u32, 8 x u64)
//!
//! ## Runtime SIMD Dispatch Pattern
//!
//! 1. **Detection** (once per process): `simd::detected_engine()`
//! 2. **Dispatch**: `compute::bit_permute_kernels` matches on the engine and
//!    calls a `#[target_feature]` entry point that inlines the generic
//!    kernel for that engine.
//! 3. **Fallback**: `SimdEngineType::Scalar` runs the portable word loop.

pub mod permute;
pub mod portable_intrinsics;
pub mod simd;
pub mod types;

#[cfg(test)]
mod tests;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
pub use types::__m128i;
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use portable_intrinsics::*;
#[cfg(target_arch = "x86_64")]
use types::simd_arch;

/// Trait abstracting over SIMD register widths for 32- and 64-bit lane work.
///
/// Lane counts are associated constants, so generic kernels unroll for each
/// width without runtime overhead.
pub trait SimdEngine: Sized {
    /// Number of 32-bit lanes (4 for SSE/NEON, 8 for AVX2, 16 for AVX-512)
    const WIDTH_32: usize;

    /// Number of 64-bit lanes (2 for SSE/NEON, 4 for AVX2, 8 for AVX-512)
    const WIDTH_64: usize;

    /// Register type (__m128i, __m256i or __m512i)
    type Vec: Copy + Clone;

    // ===== Creation =====

    unsafe fn set1_epi32(a: i32) -> Self::Vec;

    unsafe fn set1_epi64(a: i64) -> Self::Vec;

    // ===== Bitwise Operations =====

    unsafe fn and(a: Self::Vec, b: Self::Vec) -> Self::Vec;

    unsafe fn or(a: Self::Vec, b: Self::Vec) -> Self::Vec;

    unsafe fn xor(a: Self::Vec, b: Self::Vec) -> Self::Vec;

    /// `!a & b`
    unsafe fn andnot(a: Self::Vec, b: Self::Vec) -> Self::Vec;

    // ===== Shift Operations =====

    /// Shift every 32-bit lane left by `count` (`0..32`)
    unsafe fn sll_epi32(a: Self::Vec, count: i32) -> Self::Vec;

    /// Logical shift every 32-bit lane right by `count` (`0..32`)
    unsafe fn srl_epi32(a: Self::Vec, count: i32) -> Self::Vec;

    unsafe fn sll_epi64(a: Self::Vec, count: i32) -> Self::Vec;

    unsafe fn srl_epi64(a: Self::Vec, count: i32) -> Self::Vec;

    // ===== Memory Operations =====

    /// Load `WIDTH_32` words from unaligned memory
    unsafe fn loadu_u32(p: *const u32) -> Self::Vec;

    unsafe fn storeu_u32(p: *mut u32, a: Self::Vec);

    /// Load `WIDTH_64` words from unaligned memory
    unsafe fn loadu_u64(p: *const u64) -> Self::Vec;

    unsafe fn storeu_u64(p: *mut u64, a: Self::Vec);
}

// =============================================================================
// SimdEngine Implementations
// =============================================================================

/// 128-bit SIMD engine (SSE2 on x86_64, NEON on aarch64)
///
/// The baseline engine; available on every supported CPU.
pub struct SimdEngine128;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
#[allow(unsafe_op_in_unsafe_fn)]
impl SimdEngine for SimdEngine128 {
    const WIDTH_32: usize = 4;
    const WIDTH_64: usize = 2;

    type Vec = __m128i;

    #[inline(always)]
    unsafe fn set1_epi32(a: i32) -> Self::Vec {
        _mm_set1_epi32(a)
    }

    #[inline(always)]
    unsafe fn set1_epi64(a: i64) -> Self::Vec {
        _mm_set1_epi64x(a)
    }

    #[inline(always)]
    unsafe fn and(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        _mm_and_si128(a, b)
    }

    #[inline(always)]
    unsafe fn or(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        _mm_or_si128(a, b)
    }

    #[inline(always)]
    unsafe fn xor(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        _mm_xor_si128(a, b)
    }

    #[inline(always)]
    unsafe fn andnot(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        _mm_andnot_si128(a, b)
    }

    #[inline(always)]
    unsafe fn sll_epi32(a: Self::Vec, count: i32) -> Self::Vec {
        _mm_sll_epi32_var(a, count)
    }

    #[inline(always)]
    unsafe fn srl_epi32(a: Self::Vec, count: i32) -> Self::Vec {
        _mm_srl_epi32_var(a, count)
    }

    #[inline(always)]
    unsafe fn sll_epi64(a: Self::Vec, count: i32) -> Self::Vec {
        _mm_sll_epi64_var(a, count)
    }

    #[inline(always)]
    unsafe fn srl_epi64(a: Self::Vec, count: i32) -> Self::Vec {
        _mm_srl_epi64_var(a, count)
    }

    #[inline(always)]
    unsafe fn loadu_u32(p: *const u32) -> Self::Vec {
        _mm_loadu_si128(p as *const __m128i)
    }

    #[inline(always)]
    unsafe fn storeu_u32(p: *mut u32, a: Self::Vec) {
        _mm_storeu_si128(p as *mut __m128i, a)
    }

    #[inline(always)]
    unsafe fn loadu_u64(p: *const u64) -> Self::Vec {
        _mm_loadu_si128(p as *const __m128i)
    }

    #[inline(always)]
    unsafe fn storeu_u64(p: *mut u64, a: Self::Vec) {
        _mm_storeu_si128(p as *mut __m128i, a)
    }
}

// ============================================================================
// SimdEngine256: AVX2 Implementation
// ============================================================================

/// 256-bit SIMD engine (AVX2)
///
/// Requires AVX2 (Intel Haswell 2013+ or AMD Excavator 2015+).
#[cfg(target_arch = "x86_64")]
pub struct SimdEngine256;

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_op_in_unsafe_fn)]
impl SimdEngine for SimdEngine256 {
    const WIDTH_32: usize = 8;
    const WIDTH_64: usize = 4;

    type Vec = simd_arch::__m256i;

    #[target_feature(enable = "avx2")]
    unsafe fn set1_epi32(a: i32) -> Self::Vec {
        simd_arch::_mm256_set1_epi32(a)
    }

    #[target_feature(enable = "avx2")]
    unsafe fn set1_epi64(a: i64) -> Self::Vec {
        simd_arch::_mm256_set1_epi64x(a)
    }

    #[target_feature(enable = "avx2")]
    unsafe fn and(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        simd_arch::_mm256_and_si256(a, b)
    }

    #[target_feature(enable = "avx2")]
    unsafe fn or(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        simd_arch::_mm256_or_si256(a, b)
    }

    #[target_feature(enable = "avx2")]
    unsafe fn xor(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        simd_arch::_mm256_xor_si256(a, b)
    }

    #[target_feature(enable = "avx2")]
    unsafe fn andnot(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        simd_arch::_mm256_andnot_si256(a, b)
    }

    #[target_feature(enable = "avx2")]
    unsafe fn sll_epi32(a: Self::Vec, count: i32) -> Self::Vec {
        simd_arch::_mm256_sll_epi32(a, simd_arch::_mm_cvtsi32_si128(count))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn srl_epi32(a: Self::Vec, count: i32) -> Self::Vec {
        simd_arch::_mm256_srl_epi32(a, simd_arch::_mm_cvtsi32_si128(count))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn sll_epi64(a: Self::Vec, count: i32) -> Self::Vec {
        simd_arch::_mm256_sll_epi64(a, simd_arch::_mm_cvtsi32_si128(count))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn srl_epi64(a: Self::Vec, count: i32) -> Self::Vec {
        simd_arch::_mm256_srl_epi64(a, simd_arch::_mm_cvtsi32_si128(count))
    }

    #[target_feature(enable = "avx2")]
    unsafe fn loadu_u32(p: *const u32) -> Self::Vec {
        simd_arch::_mm256_loadu_si256(p as *const simd_arch::__m256i)
    }

    #[target_feature(enable = "avx2")]
    unsafe fn storeu_u32(p: *mut u32, a: Self::Vec) {
        simd_arch::_mm256_storeu_si256(p as *mut simd_arch::__m256i, a)
    }

    #[target_feature(enable = "avx2")]
    unsafe fn loadu_u64(p: *const u64) -> Self::Vec {
        simd_arch::_mm256_loadu_si256(p as *const simd_arch::__m256i)
    }

    #[target_feature(enable = "avx2")]
    unsafe fn storeu_u64(p: *mut u64, a: Self::Vec) {
        simd_arch::_mm256_storeu_si256(p as *mut simd_arch::__m256i, a)
    }
}

// ============================================================================
// SimdEngine512: AVX-512 Implementation
// ============================================================================

/// 512-bit SIMD engine (AVX-512F)
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub struct SimdEngine512;

#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
#[allow(unsafe_op_in_unsafe_fn)]
impl SimdEngine for SimdEngine512 {
    const WIDTH_32: usize = 16;
    const WIDTH_64: usize = 8;

    type Vec = simd_arch::__m512i;

    #[target_feature(enable = "avx512f")]
    unsafe fn set1_epi32(a: i32) -> Self::Vec {
        simd_arch::_mm512_set1_epi32(a)
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn set1_epi64(a: i64) -> Self::Vec {
        simd_arch::_mm512_set1_epi64(a)
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn and(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        simd_arch::_mm512_and_si512(a, b)
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn or(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        simd_arch::_mm512_or_si512(a, b)
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn xor(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        simd_arch::_mm512_xor_si512(a, b)
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn andnot(a: Self::Vec, b: Self::Vec) -> Self::Vec {
        simd_arch::_mm512_andnot_si512(a, b)
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn sll_epi32(a: Self::Vec, count: i32) -> Self::Vec {
        simd_arch::_mm512_sll_epi32(a, simd_arch::_mm_cvtsi32_si128(count))
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn srl_epi32(a: Self::Vec, count: i32) -> Self::Vec {
        simd_arch::_mm512_srl_epi32(a, simd_arch::_mm_cvtsi32_si128(count))
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn sll_epi64(a: Self::Vec, count: i32) -> Self::Vec {
        simd_arch::_mm512_sll_epi64(a, simd_arch::_mm_cvtsi32_si128(count))
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn srl_epi64(a: Self::Vec, count: i32) -> Self::Vec {
        simd_arch::_mm512_srl_epi64(a, simd_arch::_mm_cvtsi32_si128(count))
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn loadu_u32(p: *const u32) -> Self::Vec {
        simd_arch::_mm512_loadu_epi32(p as *const i32)
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn storeu_u32(p: *mut u32, a: Self::Vec) {
        simd_arch::_mm512_storeu_epi32(p as *mut i32, a)
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn loadu_u64(p: *const u64) -> Self::Vec {
        simd_arch::_mm512_loadu_epi64(p as *const i64)
    }

    #[target_feature(enable = "avx512f")]
    unsafe fn storeu_u64(p: *mut u64, a: Self::Vec) {
        simd_arch::_mm512_storeu_epi64(p as *mut i64, a)
    }
}
