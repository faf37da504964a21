//! Bulk bit compress/expand over slices.
//!
//! `out[k] = compress(input[k], masks[k])` (or `expand`) for whole slices,
//! dispatched to a [`PermuteBackend`]. The `par_` variants split slices
//! longer than the context's threshold into chunks on the rayon pool.

use rayon::prelude::*;

use super::simd_abstraction::permute::{
    compress_u32_slices, compress_u64_slices, expand_u32_slices, expand_u64_slices,
};
use super::simd_abstraction::simd::{has_bmi2, SimdEngineType};
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use super::simd_abstraction::SimdEngine128;
#[cfg(target_arch = "x86_64")]
use super::simd_abstraction::SimdEngine256;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
use super::simd_abstraction::SimdEngine512;
use super::{detect_optimal_backend, PermuteBackend, PermuteContext};
use crate::core::bit_permute::BitPermute;
use crate::defaults::PARALLEL_CHUNK;
use crate::error::{LaneError, Result};

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{_pdep_u32, _pdep_u64, _pext_u32, _pext_u64};

/// Direction of a bulk permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermuteOp {
    Compress,
    Expand,
}

fn check_lengths(input: usize, masks: usize, out: usize) -> Result<()> {
    if input != masks {
        return Err(LaneError::length_mismatch("mask slice", masks, input));
    }
    if input != out {
        return Err(LaneError::length_mismatch("output slice", out, input));
    }
    Ok(())
}

// ============================================================================
// Single-word hardware path
// ============================================================================

/// 32-bit compress using `PEXT` when available.
#[inline]
pub fn compress_u32_hw(x: u32, mask: u32) -> u32 {
    #[cfg(target_arch = "x86_64")]
    if has_bmi2() {
        return unsafe { pext32(x, mask) };
    }
    x.compress_bits(mask)
}

/// 32-bit expand using `PDEP` when available.
#[inline]
pub fn expand_u32_hw(x: u32, mask: u32) -> u32 {
    #[cfg(target_arch = "x86_64")]
    if has_bmi2() {
        return unsafe { pdep32(x, mask) };
    }
    x.expand_bits(mask)
}

/// 64-bit compress using `PEXT` when available.
#[inline]
pub fn compress_u64_hw(x: u64, mask: u64) -> u64 {
    #[cfg(target_arch = "x86_64")]
    if has_bmi2() {
        return unsafe { pext64(x, mask) };
    }
    x.compress_bits(mask)
}

/// 64-bit expand using `PDEP` when available.
#[inline]
pub fn expand_u64_hw(x: u64, mask: u64) -> u64 {
    #[cfg(target_arch = "x86_64")]
    if has_bmi2() {
        return unsafe { pdep64(x, mask) };
    }
    x.expand_bits(mask)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "bmi2")]
unsafe fn pext32(x: u32, mask: u32) -> u32 {
    _pext_u32(x, mask)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "bmi2")]
unsafe fn pdep32(x: u32, mask: u32) -> u32 {
    _pdep_u32(x, mask)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "bmi2")]
unsafe fn pext64(x: u64, mask: u64) -> u64 {
    _pext_u64(x, mask)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "bmi2")]
unsafe fn pdep64(x: u64, mask: u64) -> u64 {
    _pdep_u64(x, mask)
}

// ============================================================================
// Per-width dispatch
// ============================================================================

macro_rules! bulk_permute {
    (
        word: $word:ty,
        compress_slices: $compress_slices:ident,
        expand_slices: $expand_slices:ident,
        pext: $pext:ident,
        pdep: $pdep:ident,
        scalar: $scalar:ident,
        avx2: $avx2:ident,
        avx512: $avx512:ident,
        bmi2: $bmi2:ident,
        run: $run:ident,
        with: $with:ident,
        par: $par:ident,
        compress: $compress:ident,
        expand: $expand:ident,
        par_compress: $par_compress:ident,
        par_expand: $par_expand:ident $(,)?
    ) => {
        /// Reference loop: the word function applied element by element.
        pub fn $scalar(op: PermuteOp, input: &[$word], masks: &[$word], out: &mut [$word]) {
            for ((o, &x), &m) in out.iter_mut().zip(input).zip(masks) {
                *o = match op {
                    PermuteOp::Compress => x.compress_bits(m),
                    PermuteOp::Expand => x.expand_bits(m),
                };
            }
        }

        #[cfg(target_arch = "x86_64")]
        #[target_feature(enable = "avx2")]
        unsafe fn $avx2(op: PermuteOp, input: &[$word], masks: &[$word], out: &mut [$word]) {
            match op {
                PermuteOp::Compress => $compress_slices::<SimdEngine256>(input, masks, out),
                PermuteOp::Expand => $expand_slices::<SimdEngine256>(input, masks, out),
            }
        }

        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        #[target_feature(enable = "avx512f")]
        unsafe fn $avx512(op: PermuteOp, input: &[$word], masks: &[$word], out: &mut [$word]) {
            match op {
                PermuteOp::Compress => $compress_slices::<SimdEngine512>(input, masks, out),
                PermuteOp::Expand => $expand_slices::<SimdEngine512>(input, masks, out),
            }
        }

        #[cfg(target_arch = "x86_64")]
        #[target_feature(enable = "bmi2")]
        unsafe fn $bmi2(op: PermuteOp, input: &[$word], masks: &[$word], out: &mut [$word]) {
            for ((o, &x), &m) in out.iter_mut().zip(input).zip(masks) {
                *o = match op {
                    PermuteOp::Compress => $pext(x, m),
                    PermuteOp::Expand => $pdep(x, m),
                };
            }
        }

        // Lengths are already checked and the backend already resolved
        fn $run(backend: PermuteBackend, op: PermuteOp, input: &[$word], masks: &[$word], out: &mut [$word]) {
            match backend {
                PermuteBackend::Portable | PermuteBackend::CpuSimd(SimdEngineType::Scalar) => {
                    $scalar(op, input, masks, out)
                }
                #[cfg(target_arch = "x86_64")]
                PermuteBackend::Bmi2 => unsafe { $bmi2(op, input, masks, out) },
                #[cfg(not(target_arch = "x86_64"))]
                PermuteBackend::Bmi2 => $scalar(op, input, masks, out),
                #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
                PermuteBackend::CpuSimd(SimdEngineType::Engine128) => unsafe {
                    match op {
                        PermuteOp::Compress => $compress_slices::<SimdEngine128>(input, masks, out),
                        PermuteOp::Expand => $expand_slices::<SimdEngine128>(input, masks, out),
                    }
                },
                #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
                PermuteBackend::CpuSimd(SimdEngineType::Engine128) => $scalar(op, input, masks, out),
                #[cfg(target_arch = "x86_64")]
                PermuteBackend::CpuSimd(SimdEngineType::Engine256) => unsafe { $avx2(op, input, masks, out) },
                #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
                PermuteBackend::CpuSimd(SimdEngineType::Engine512) => unsafe { $avx512(op, input, masks, out) },
            }
        }

        /// Runs `op` over the slices on an explicit backend. Unsupported
        /// backends resolve through [`PermuteBackend::effective_backend`].
        pub fn $with(
            backend: PermuteBackend,
            op: PermuteOp,
            input: &[$word],
            masks: &[$word],
            out: &mut [$word],
        ) -> Result<()> {
            check_lengths(input.len(), masks.len(), out.len())?;
            $run(backend.effective_backend(), op, input, masks, out);
            Ok(())
        }

        /// Chunked rayon variant of the explicit-backend entry point.
        pub fn $par(
            ctx: &PermuteContext,
            op: PermuteOp,
            input: &[$word],
            masks: &[$word],
            out: &mut [$word],
        ) -> Result<()> {
            check_lengths(input.len(), masks.len(), out.len())?;
            let backend = ctx.effective_backend();
            if input.len() < ctx.parallel_threshold {
                $run(backend, op, input, masks, out);
                return Ok(());
            }
            log::debug!(
                "Parallel {:?} of {} words on {:?} in chunks of {}",
                op,
                input.len(),
                backend,
                PARALLEL_CHUNK
            );
            out.par_chunks_mut(PARALLEL_CHUNK)
                .zip(input.par_chunks(PARALLEL_CHUNK))
                .zip(masks.par_chunks(PARALLEL_CHUNK))
                .for_each(|((o, i), m)| $run(backend, op, i, m, o));
            Ok(())
        }

        /// Bulk compress on the detected backend.
        pub fn $compress(input: &[$word], masks: &[$word], out: &mut [$word]) -> Result<()> {
            $with(detect_optimal_backend(), PermuteOp::Compress, input, masks, out)
        }

        /// Bulk expand on the detected backend.
        pub fn $expand(input: &[$word], masks: &[$word], out: &mut [$word]) -> Result<()> {
            $with(detect_optimal_backend(), PermuteOp::Expand, input, masks, out)
        }

        pub fn $par_compress(input: &[$word], masks: &[$word], out: &mut [$word]) -> Result<()> {
            $par(&PermuteContext::default(), PermuteOp::Compress, input, masks, out)
        }

        pub fn $par_expand(input: &[$word], masks: &[$word], out: &mut [$word]) -> Result<()> {
            $par(&PermuteContext::default(), PermuteOp::Expand, input, masks, out)
        }
    };
}

bulk_permute! {
    word: u32,
    compress_slices: compress_u32_slices,
    expand_slices: expand_u32_slices,
    pext: _pext_u32,
    pdep: _pdep_u32,
    scalar: permute_u32_scalar,
    avx2: permute_u32_avx2,
    avx512: permute_u32_avx512,
    bmi2: permute_u32_bmi2,
    run: run_u32,
    with: permute_u32_with,
    par: par_permute_u32,
    compress: compress_bits_u32,
    expand: expand_bits_u32,
    par_compress: par_compress_bits_u32,
    par_expand: par_expand_bits_u32,
}

bulk_permute! {
    word: u64,
    compress_slices: compress_u64_slices,
    expand_slices: expand_u64_slices,
    pext: _pext_u64,
    pdep: _pdep_u64,
    scalar: permute_u64_scalar,
    avx2: permute_u64_avx2,
    avx512: permute_u64_avx512,
    bmi2: permute_u64_bmi2,
    run: run_u64,
    with: permute_u64_with,
    par: par_permute_u64,
    compress: compress_bits_u64,
    expand: expand_bits_u64,
    par_compress: par_compress_bits_u64,
    par_expand: par_expand_bits_u64,
}
