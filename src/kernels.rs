//! Array kernels built on the lane model.
//!
//! Each kernel walks its input in `N`-lane chunks and finishes the tail with
//! an index-in-range mask, so any lane width produces the same array as the
//! scalar loop next to it.

use crate::error::{LaneError, Result};
use crate::lanes::{BinaryOp, CompareOp, LaneElement, LaneMask, UnaryOp, Vector};

// ============================================================================
// Stream compaction
// ============================================================================

/// Appends `idx[i]` to `out` for every `i` with `a[i] != b[i]`, preserving
/// order, and returns the number of elements written.
///
/// `out` must have room for every mismatch; running out of room reports
/// `OutOfBounds` with the offending write position.
pub fn selective_store<E: LaneElement, const N: usize>(
    a: &[E],
    b: &[E],
    idx: &[E],
    out: &mut [E],
) -> Result<usize> {
    check_same_length(a.len(), b.len(), idx.len())?;
    let len = a.len();
    let bound = Vector::<E, N>::species().loop_bound(len);

    let mut count = 0;
    let mut i = 0;
    while i < bound {
        let av = Vector::<E, N>::from_array(a, i)?;
        let bv = Vector::<E, N>::from_array(b, i)?;
        let cv = Vector::<E, N>::from_array(idx, i)?;
        let mask = av.compare(CompareOp::Ne, &bv)?;
        count += cv.selective_into_array(out, count, &mask)?;
        i += N;
    }

    if i < len {
        let tail = LaneMask::<E, N>::index_in_range(i, len);
        let av = Vector::<E, N>::from_array_masked(a, i, &tail)?;
        let bv = Vector::<E, N>::from_array_masked(b, i, &tail)?;
        let cv = Vector::<E, N>::from_array_masked(idx, i, &tail)?;
        let mask = av.compare_masked(CompareOp::Ne, &bv, &tail)?;
        count += cv.selective_into_array(out, count, &mask)?;
    }
    Ok(count)
}

/// Scan-and-append reference for [`selective_store`].
pub fn selective_store_scalar<E: LaneElement>(a: &[E], b: &[E], idx: &[E], out: &mut [E]) -> Result<usize> {
    check_same_length(a.len(), b.len(), idx.len())?;
    let out_len = out.len();
    let mut count = 0;
    for i in 0..a.len() {
        if a[i] != b[i] {
            let slot = out
                .get_mut(count)
                .ok_or_else(|| LaneError::out_of_bounds(count, out_len))?;
            *slot = idx[i];
            count += 1;
        }
    }
    Ok(count)
}

fn check_same_length(a: usize, b: usize, idx: usize) -> Result<()> {
    if b != a {
        return Err(LaneError::length_mismatch("second input", b, a));
    }
    if idx != a {
        return Err(LaneError::length_mismatch("index array", idx, a));
    }
    Ok(())
}

// ============================================================================
// Lanewise bit permutation over arrays
// ============================================================================

fn binary_over_array<E: LaneElement, const N: usize>(
    op: BinaryOp,
    input: &[E],
    masks: &[E],
    out: &mut [E],
) -> Result<()> {
    if masks.len() != input.len() {
        return Err(LaneError::length_mismatch("mask array", masks.len(), input.len()));
    }
    if out.len() != input.len() {
        return Err(LaneError::length_mismatch("output array", out.len(), input.len()));
    }
    let len = input.len();
    let bound = Vector::<E, N>::species().loop_bound(len);

    let mut i = 0;
    while i < bound {
        let v = Vector::<E, N>::from_array(input, i)?;
        let m = Vector::<E, N>::from_array(masks, i)?;
        v.lanewise(op, &m)?.into_array(out, i)?;
        i += N;
    }

    if i < len {
        let tail = LaneMask::<E, N>::index_in_range(i, len);
        let v = Vector::<E, N>::from_array_masked(input, i, &tail)?;
        let m = Vector::<E, N>::from_array_masked(masks, i, &tail)?;
        v.lanewise_masked(op, &m, &tail)?.into_array_masked(out, i, &tail)?;
    } else if len == 0 {
        // Empty input still rejects element kinds without the operator
        Vector::<E, N>::zero().lanewise(op, &Vector::zero())?;
    }
    Ok(())
}

/// `out[k] = compress(input[k], masks[k])` computed `N` lanes at a time.
/// Only 32- and 64-bit integral lanes support bit compress.
pub fn compress_bits_lanewise<E: LaneElement, const N: usize>(
    input: &[E],
    masks: &[E],
    out: &mut [E],
) -> Result<()> {
    binary_over_array::<E, N>(BinaryOp::CompressBits, input, masks, out)
}

/// `out[k] = expand(input[k], masks[k])` computed `N` lanes at a time.
pub fn expand_bits_lanewise<E: LaneElement, const N: usize>(
    input: &[E],
    masks: &[E],
    out: &mut [E],
) -> Result<()> {
    binary_over_array::<E, N>(BinaryOp::ExpandBits, input, masks, out)
}

/// Per-element population count, returned as elements of the same kind.
pub fn popcount_lanewise<E: LaneElement, const N: usize>(input: &[E], out: &mut [E]) -> Result<()> {
    if out.len() != input.len() {
        return Err(LaneError::length_mismatch("output array", out.len(), input.len()));
    }
    let len = input.len();
    let bound = Vector::<E, N>::species().loop_bound(len);

    let mut i = 0;
    while i < bound {
        Vector::<E, N>::from_array(input, i)?
            .lanewise_unary(UnaryOp::BitCount)?
            .into_array(out, i)?;
        i += N;
    }
    if i < len {
        let tail = LaneMask::<E, N>::index_in_range(i, len);
        Vector::<E, N>::from_array_masked(input, i, &tail)?
            .lanewise_unary_masked(UnaryOp::BitCount, &tail)?
            .into_array_masked(out, i, &tail)?;
    }
    Ok(())
}

/// Total number of set bits across all elements.
pub fn popcount_total<E: LaneElement, const N: usize>(input: &[E]) -> Result<u64> {
    let len = input.len();
    let bound = Vector::<E, N>::species().loop_bound(len);
    let mut total = 0u64;

    let mut i = 0;
    while i < bound {
        let counts = Vector::<E, N>::from_array(input, i)?.lanewise_unary(UnaryOp::BitCount)?;
        total += counts.to_array().iter().map(|c| c.to_raw_bits()).sum::<u64>();
        i += N;
    }
    if i < len {
        let tail = LaneMask::<E, N>::index_in_range(i, len);
        let counts = Vector::<E, N>::from_array_masked(input, i, &tail)?
            .lanewise_unary_masked(UnaryOp::BitCount, &tail)?;
        total += counts.to_array().iter().map(|c| c.to_raw_bits()).sum::<u64>();
    }
    Ok(total)
}
