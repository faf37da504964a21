//! Lane permutations.
//!
//! A shuffle holds one source index per destination lane. Indexes outside
//! `[0, N)` are exceptional; how an exceptional index is resolved when the
//! shuffle is applied is the shuffle's [`ExceptionalIndex`] policy.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::defaults::DEFAULT_EXCEPTIONAL_INDEX;
use crate::error::{check_from_index_size, LaneError, Result};
use crate::lanes::element::LaneElement;
use crate::lanes::mask::LaneMask;
use crate::lanes::species::{shape_of, Species, VectorShape};
use crate::lanes::vector::Vector;

/// Resolution of a shuffle index outside `[0, N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExceptionalIndex {
    /// Reduce modulo the lane count (`rem_euclid`).
    #[default]
    Wrap,
    /// The destination lane becomes zero.
    Zero,
    /// Clamp into `[0, N - 1]`.
    Clamp,
    /// Applying the shuffle reports `OutOfBounds`.
    Fail,
}

impl ExceptionalIndex {
    pub fn name(self) -> &'static str {
        match self {
            ExceptionalIndex::Wrap => "wrap",
            ExceptionalIndex::Zero => "zero",
            ExceptionalIndex::Clamp => "clamp",
            ExceptionalIndex::Fail => "fail",
        }
    }
}

impl fmt::Display for ExceptionalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExceptionalIndex {
    type Err = LaneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "wrap" => Ok(ExceptionalIndex::Wrap),
            "zero" => Ok(ExceptionalIndex::Zero),
            "clamp" => Ok(ExceptionalIndex::Clamp),
            "fail" => Ok(ExceptionalIndex::Fail),
            other => Err(LaneError::InvalidArgument(format!(
                "unknown exceptional index policy '{}'",
                other
            ))),
        }
    }
}

/// Source lane indexes for every destination lane of `Vector<E, N>`.
pub struct Shuffle<E: LaneElement, const N: usize> {
    indexes: [i64; N],
    policy: ExceptionalIndex,
    _element: PhantomData<E>,
}

impl<E: LaneElement, const N: usize> Shuffle<E, N> {
    const SHAPE: VectorShape = shape_of(E::BITS, N);

    #[inline]
    fn from_indexes(indexes: [i64; N], policy: ExceptionalIndex) -> Self {
        let _shape = Self::SHAPE;
        Shuffle {
            indexes,
            policy,
            _element: PhantomData,
        }
    }

    pub fn species() -> &'static Species {
        Species::of(E::KIND, Self::SHAPE)
    }

    /// `start, start + step, start + 2 * step, ...`; with `wrap` every index is
    /// reduced into range, otherwise out-of-range indexes stay exceptional.
    pub fn iota(start: i64, step: i64, wrap: bool) -> Self {
        let mut indexes = [0i64; N];
        for (i, slot) in indexes.iter_mut().enumerate() {
            let index = start.wrapping_add(step.wrapping_mul(i as i64));
            *slot = if wrap {
                index.rem_euclid(N as i64)
            } else {
                index
            };
        }
        Self::from_indexes(indexes, DEFAULT_EXCEPTIONAL_INDEX)
    }

    pub fn identity() -> Self {
        Self::iota(0, 1, false)
    }

    pub fn from_values(values: &[i64]) -> Result<Self> {
        if values.len() != N {
            return Err(LaneError::length_mismatch("shuffle", values.len(), N));
        }
        let mut indexes = [0i64; N];
        indexes.copy_from_slice(values);
        Ok(Self::from_indexes(indexes, DEFAULT_EXCEPTIONAL_INDEX))
    }

    pub fn from_array(values: &[i64], offset: usize) -> Result<Self> {
        check_from_index_size(offset, N, values.len())?;
        Self::from_values(&values[offset..offset + N])
    }

    /// Destination lane `i` reads source lane `f(i)`.
    pub fn from_op(f: impl Fn(usize) -> i64) -> Self {
        let mut indexes = [0i64; N];
        for (i, slot) in indexes.iter_mut().enumerate() {
            *slot = f(i);
        }
        Self::from_indexes(indexes, DEFAULT_EXCEPTIONAL_INDEX)
    }

    pub fn with_policy(mut self, policy: ExceptionalIndex) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ExceptionalIndex {
        self.policy
    }

    pub fn to_array(&self) -> [i64; N] {
        self.indexes
    }

    pub fn lane_source(&self, lane: usize) -> Result<i64> {
        self.indexes
            .get(lane)
            .copied()
            .ok_or_else(|| LaneError::out_of_bounds(lane, N))
    }

    pub fn lane_is_valid(&self) -> LaneMask<E, N> {
        let mut bits = [false; N];
        for (i, b) in bits.iter_mut().enumerate() {
            *b = (0..N as i64).contains(&self.indexes[i]);
        }
        LaneMask::from_bits(bits)
    }

    /// Fails with `OutOfBounds` on the first exceptional index.
    pub fn check_index(&self) -> Result<Self> {
        for &index in self.indexes.iter() {
            if !(0..N as i64).contains(&index) {
                return Err(LaneError::out_of_bounds(index, N));
            }
        }
        Ok(*self)
    }

    pub fn wrap_indexes(&self) -> Self {
        let mut indexes = self.indexes;
        for index in indexes.iter_mut() {
            *index = index.rem_euclid(N as i64);
        }
        Self::from_indexes(indexes, self.policy)
    }

    /// Source lane for destination `lane` under this shuffle's policy;
    /// `None` means the destination lane is zero-filled.
    pub(crate) fn resolve(&self, lane: usize) -> Result<Option<usize>> {
        let index = self.indexes[lane];
        let n = N as i64;
        if (0..n).contains(&index) {
            return Ok(Some(index as usize));
        }
        match self.policy {
            ExceptionalIndex::Wrap => Ok(Some(index.rem_euclid(n) as usize)),
            ExceptionalIndex::Clamp => Ok(Some(index.clamp(0, n - 1) as usize)),
            ExceptionalIndex::Zero => Ok(None),
            ExceptionalIndex::Fail => Err(LaneError::out_of_bounds(index, N)),
        }
    }

    /// Composition: the result selects `self[other[i]]`, so rearranging by it
    /// equals rearranging by `self` and then by `other`.
    pub fn rearrange(&self, other: &Shuffle<E, N>) -> Result<Self> {
        let mut indexes = [0i64; N];
        let mut zero_filled = false;
        for (i, slot) in indexes.iter_mut().enumerate() {
            let source = match other.resolve(i)? {
                Some(j) => self.resolve(j)?,
                None => None,
            };
            *slot = match source {
                Some(j) => j as i64,
                None => {
                    zero_filled = true;
                    -1
                }
            };
        }
        let policy = if zero_filled {
            ExceptionalIndex::Zero
        } else {
            self.policy
        };
        Ok(Self::from_indexes(indexes, policy))
    }

    /// Reinterprets this shuffle for another species with the same lane count.
    pub fn cast<F: LaneElement, const M: usize>(&self) -> Result<Shuffle<F, M>> {
        Shuffle::<F, M>::from_values(&self.indexes)
            .map(|s| s.with_policy(self.policy))
            .map_err(|_| {
                LaneError::InvalidArgument(format!(
                    "cannot cast a shuffle of {} lanes to {}",
                    N,
                    Shuffle::<F, M>::species()
                ))
            })
    }

    /// Lane `i` holds the source index of lane `i`.
    pub fn to_vector(&self) -> Vector<E, N> {
        let mut lanes = [E::default(); N];
        for (i, lane) in lanes.iter_mut().enumerate() {
            *lane = E::from_lane_index(self.indexes[i]);
        }
        Vector::from_lanes(lanes)
    }
}

impl<E: LaneElement, const N: usize> Clone for Shuffle<E, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: LaneElement, const N: usize> Copy for Shuffle<E, N> {}

impl<E: LaneElement, const N: usize> PartialEq for Shuffle<E, N> {
    fn eq(&self, other: &Self) -> bool {
        self.indexes == other.indexes && self.policy == other.policy
    }
}

impl<E: LaneElement, const N: usize> Eq for Shuffle<E, N> {}

impl<E: LaneElement, const N: usize> fmt::Debug for Shuffle<E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shuffle{:?}({})", &self.indexes[..], self.policy)
    }
}
