//! Fixed-width lane vectors.
//!
//! `Vector<E, N>` is `N` lanes of element type `E`. The pair must describe a
//! 64-, 128-, 256- or 512-bit register; any other combination is rejected
//! when the type is first used. Every operation returns a new vector.
//!
//! Lanewise operators apply [`LaneElement`] semantics lane by lane, so a
//! vector of any width computes exactly what a scalar loop over the same
//! elements computes.

use crate::error::{check_from_index_size, LaneError, Result};
use crate::lanes::element::LaneElement;
use crate::lanes::mask::LaneMask;
use crate::lanes::ops::{BinaryOp, CompareOp, ReductionOp, TernaryOp, TestOp, UnaryOp};
use crate::lanes::shuffle::Shuffle;
use crate::lanes::species::{shape_of, Species, VectorShape};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<E: LaneElement, const N: usize> {
    lanes: [E; N],
}

// Division by zero is reported by the element with lane 0
#[inline]
fn at_lane(err: LaneError, lane: usize) -> LaneError {
    match err {
        LaneError::DivisionByZero { .. } => LaneError::DivisionByZero { lane },
        other => other,
    }
}

impl<E: LaneElement, const N: usize> Vector<E, N> {
    const SHAPE: VectorShape = shape_of(E::BITS, N);

    /// Number of lanes.
    pub const LANES: usize = N;

    #[inline]
    pub fn from_lanes(lanes: [E; N]) -> Self {
        let _shape = Self::SHAPE;
        Vector { lanes }
    }

    pub fn species() -> &'static Species {
        Species::of(E::KIND, Self::SHAPE)
    }

    pub fn zero() -> Self {
        Self::from_lanes([E::default(); N])
    }

    pub fn broadcast(value: E) -> Self {
        Self::from_lanes([value; N])
    }

    /// `0, 1, 2, ..., N - 1`
    pub fn iota() -> Self {
        let mut lanes = [E::default(); N];
        for (i, lane) in lanes.iter_mut().enumerate() {
            *lane = E::from_lane_index(i as i64);
        }
        Self::from_lanes(lanes)
    }

    pub fn to_array(&self) -> [E; N] {
        self.lanes
    }

    pub fn as_array(&self) -> &[E; N] {
        &self.lanes
    }

    // ===== Memory =====

    /// Loads `N` contiguous elements starting at `offset`.
    pub fn from_array(a: &[E], offset: usize) -> Result<Self> {
        check_from_index_size(offset, N, a.len())?;
        let mut lanes = [E::default(); N];
        lanes.copy_from_slice(&a[offset..offset + N]);
        Ok(Self::from_lanes(lanes))
    }

    /// Loads only set lanes; clear lanes are zero and may lie outside `a`.
    pub fn from_array_masked(a: &[E], offset: usize, mask: &LaneMask<E, N>) -> Result<Self> {
        let mut lanes = [E::default(); N];
        for (i, lane) in lanes.iter_mut().enumerate() {
            if mask.is_set(i) {
                *lane = *a
                    .get(offset.saturating_add(i))
                    .ok_or_else(|| LaneError::out_of_bounds(offset.saturating_add(i), a.len()))?;
            }
        }
        Ok(Self::from_lanes(lanes))
    }

    pub fn into_array(&self, a: &mut [E], offset: usize) -> Result<()> {
        check_from_index_size(offset, N, a.len())?;
        a[offset..offset + N].copy_from_slice(&self.lanes);
        Ok(())
    }

    /// Stores only set lanes. Nothing is written if any set lane is out of range.
    pub fn into_array_masked(&self, a: &mut [E], offset: usize, mask: &LaneMask<E, N>) -> Result<()> {
        if let Some(last) = mask.last_true() {
            check_from_index_size(offset, last + 1, a.len())?;
        }
        for i in 0..N {
            if mask.is_set(i) {
                a[offset + i] = self.lanes[i];
            }
        }
        Ok(())
    }

    /// Gather: lane `i` is `a[offset + index_map[map_offset + i]]`.
    pub fn from_array_indexed(
        a: &[E],
        offset: usize,
        index_map: &[usize],
        map_offset: usize,
    ) -> Result<Self> {
        check_from_index_size(map_offset, N, index_map.len())?;
        let mut lanes = [E::default(); N];
        for (i, lane) in lanes.iter_mut().enumerate() {
            let index = offset.saturating_add(index_map[map_offset + i]);
            *lane = *a
                .get(index)
                .ok_or_else(|| LaneError::out_of_bounds(index, a.len()))?;
        }
        Ok(Self::from_lanes(lanes))
    }

    /// Scatter: lane `i` is stored to `a[offset + index_map[map_offset + i]]`.
    /// Later lanes win when indexes repeat. All indexes are validated first.
    pub fn into_array_indexed(
        &self,
        a: &mut [E],
        offset: usize,
        index_map: &[usize],
        map_offset: usize,
    ) -> Result<()> {
        check_from_index_size(map_offset, N, index_map.len())?;
        let targets = &index_map[map_offset..map_offset + N];
        for &t in targets {
            let index = offset.saturating_add(t);
            if index >= a.len() {
                return Err(LaneError::out_of_bounds(index, a.len()));
            }
        }
        for (i, &t) in targets.iter().enumerate() {
            a[offset + t] = self.lanes[i];
        }
        Ok(())
    }

    // ===== Lane access =====

    pub fn lane(&self, i: usize) -> Result<E> {
        self.lanes
            .get(i)
            .copied()
            .ok_or_else(|| LaneError::out_of_bounds(i, N))
    }

    pub fn with_lane(&self, i: usize, value: E) -> Result<Self> {
        if i >= N {
            return Err(LaneError::out_of_bounds(i, N));
        }
        let mut lanes = self.lanes;
        lanes[i] = value;
        Ok(Self::from_lanes(lanes))
    }

    /// Lanes set in `mask` come from `other`, the rest from `self`.
    pub fn blend(&self, other: &Self, mask: &LaneMask<E, N>) -> Self {
        let mut lanes = self.lanes;
        for (i, lane) in lanes.iter_mut().enumerate() {
            if mask.is_set(i) {
                *lane = other.lanes[i];
            }
        }
        Self::from_lanes(lanes)
    }

    // ===== Lanewise =====

    pub fn lanewise_unary(&self, op: UnaryOp) -> Result<Self> {
        self.lanewise_unary_masked(op, &LaneMask::all())
    }

    /// Clear lanes keep their value.
    pub fn lanewise_unary_masked(&self, op: UnaryOp, mask: &LaneMask<E, N>) -> Result<Self> {
        // Reject inapplicable operators even when no lane is selected
        E::unary(op, E::default())?;
        let mut lanes = self.lanes;
        for (i, lane) in lanes.iter_mut().enumerate() {
            if mask.is_set(i) {
                *lane = E::unary(op, *lane)?;
            }
        }
        Ok(Self::from_lanes(lanes))
    }

    pub fn lanewise(&self, op: BinaryOp, other: &Self) -> Result<Self> {
        self.lanewise_masked(op, other, &LaneMask::all())
    }

    /// Clear lanes keep the left operand; their right operand is never read,
    /// so a zero divisor in a clear lane is not an error.
    pub fn lanewise_masked(&self, op: BinaryOp, other: &Self, mask: &LaneMask<E, N>) -> Result<Self> {
        E::binary(op, E::default(), E::from_lane_index(1))?;
        let mut lanes = self.lanes;
        for (i, lane) in lanes.iter_mut().enumerate() {
            if mask.is_set(i) {
                *lane = E::binary(op, *lane, other.lanes[i]).map_err(|e| at_lane(e, i))?;
            }
        }
        Ok(Self::from_lanes(lanes))
    }

    pub fn lanewise_scalar(&self, op: BinaryOp, scalar: E) -> Result<Self> {
        self.lanewise(op, &Self::broadcast(scalar))
    }

    pub fn lanewise_scalar_masked(&self, op: BinaryOp, scalar: E, mask: &LaneMask<E, N>) -> Result<Self> {
        self.lanewise_masked(op, &Self::broadcast(scalar), mask)
    }

    pub fn lanewise_ternary(&self, op: TernaryOp, b: &Self, c: &Self) -> Result<Self> {
        self.lanewise_ternary_masked(op, b, c, &LaneMask::all())
    }

    pub fn lanewise_ternary_masked(
        &self,
        op: TernaryOp,
        b: &Self,
        c: &Self,
        mask: &LaneMask<E, N>,
    ) -> Result<Self> {
        E::ternary(op, E::default(), E::default(), E::default())?;
        let mut lanes = self.lanes;
        for (i, lane) in lanes.iter_mut().enumerate() {
            if mask.is_set(i) {
                *lane = E::ternary(op, *lane, b.lanes[i], c.lanes[i])?;
            }
        }
        Ok(Self::from_lanes(lanes))
    }

    // ===== Predicates =====

    pub fn compare(&self, op: CompareOp, other: &Self) -> Result<LaneMask<E, N>> {
        let mut bits = [false; N];
        E::compare(op, E::default(), E::default())?;
        for (i, b) in bits.iter_mut().enumerate() {
            *b = E::compare(op, self.lanes[i], other.lanes[i])?;
        }
        Ok(LaneMask::from_bits(bits))
    }

    pub fn compare_scalar(&self, op: CompareOp, scalar: E) -> Result<LaneMask<E, N>> {
        self.compare(op, &Self::broadcast(scalar))
    }

    /// Clear lanes of the result are false.
    pub fn compare_masked(&self, op: CompareOp, other: &Self, mask: &LaneMask<E, N>) -> Result<LaneMask<E, N>> {
        Ok(self.compare(op, other)?.and(mask))
    }

    pub fn test(&self, op: TestOp) -> Result<LaneMask<E, N>> {
        let mut bits = [false; N];
        E::test(op, E::default())?;
        for (i, b) in bits.iter_mut().enumerate() {
            *b = E::test(op, self.lanes[i])?;
        }
        Ok(LaneMask::from_bits(bits))
    }

    // ===== Compaction =====

    /// Set lanes packed to the front in their original order; the
    /// remaining `N - mask.true_count()` lanes are zero.
    pub fn compress(&self, mask: &LaneMask<E, N>) -> Self {
        let mut lanes = [E::default(); N];
        let mut j = 0;
        for i in 0..N {
            if mask.is_set(i) {
                lanes[j] = self.lanes[i];
                j += 1;
            }
        }
        Self::from_lanes(lanes)
    }

    /// Inverse of [`compress`](Self::compress): consecutive low lanes are
    /// placed into the set lanes; clear lanes are zero.
    pub fn expand(&self, mask: &LaneMask<E, N>) -> Self {
        let mut lanes = [E::default(); N];
        let mut j = 0;
        for (i, lane) in lanes.iter_mut().enumerate() {
            if mask.is_set(i) {
                *lane = self.lanes[j];
                j += 1;
            }
        }
        Self::from_lanes(lanes)
    }

    /// Writes the set lanes, in order, to `a[offset..]` and returns how many
    /// were written. This is the store half of stream compaction.
    pub fn selective_into_array(&self, a: &mut [E], offset: usize, mask: &LaneMask<E, N>) -> Result<usize> {
        let count = mask.true_count();
        check_from_index_size(offset, count, a.len())?;
        let packed = self.compress(mask);
        a[offset..offset + count].copy_from_slice(&packed.lanes[..count]);
        Ok(count)
    }

    // ===== Permutation =====

    /// Lane `i` becomes `self[shuffle[i]]`, exceptional indexes resolved by
    /// the shuffle's policy.
    pub fn rearrange(&self, shuffle: &Shuffle<E, N>) -> Result<Self> {
        self.rearrange_masked(shuffle, &LaneMask::all())
    }

    /// Clear destination lanes are zero. Exceptional indexes in clear lanes
    /// are ignored.
    pub fn rearrange_masked(&self, shuffle: &Shuffle<E, N>, mask: &LaneMask<E, N>) -> Result<Self> {
        let mut lanes = [E::default(); N];
        for (i, lane) in lanes.iter_mut().enumerate() {
            if !mask.is_set(i) {
                continue;
            }
            if let Some(j) = shuffle.resolve(i)? {
                *lane = self.lanes[j];
            }
        }
        Ok(Self::from_lanes(lanes))
    }

    /// Lane values read back as shuffle indexes.
    pub fn to_shuffle(&self) -> Shuffle<E, N> {
        Shuffle::from_op(|i| self.lanes[i].to_lane_index())
    }

    // ===== Reduction =====

    /// Folds all lanes with a pairwise tree: lane `i` with lane `i + N/2`,
    /// then halves again. Floating-point sums and products therefore follow
    /// tree order, not left-to-right order.
    pub fn reduce_lanes(&self, op: ReductionOp) -> Result<E> {
        self.reduce_lanes_masked(op, &LaneMask::all())
    }

    /// Clear lanes contribute the operator's identity.
    pub fn reduce_lanes_masked(&self, op: ReductionOp, mask: &LaneMask<E, N>) -> Result<E> {
        let identity = E::identity(op)?;
        let combine = op.binary_op();
        let mut buf = self.lanes;
        for (i, lane) in buf.iter_mut().enumerate() {
            if !mask.is_set(i) {
                *lane = identity;
            }
        }
        let mut width = N;
        while width > 1 {
            let half = width / 2;
            for i in 0..half {
                buf[i] = E::binary(combine, buf[i], buf[i + half])?;
            }
            width = half;
        }
        Ok(buf[0])
    }
}
