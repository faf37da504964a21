//! Per-lane boolean masks.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::error::{check_from_index_size, LaneError, Result};
use crate::lanes::element::LaneElement;
use crate::lanes::species::{shape_of, Species, VectorShape};
use crate::lanes::vector::Vector;

/// One boolean per lane, tied to the species of `Vector<E, N>`.
pub struct LaneMask<E: LaneElement, const N: usize> {
    bits: [bool; N],
    _element: PhantomData<E>,
}

impl<E: LaneElement, const N: usize> LaneMask<E, N> {
    const SHAPE: VectorShape = shape_of(E::BITS, N);

    #[inline]
    pub(crate) fn from_bits(bits: [bool; N]) -> Self {
        let _shape = Self::SHAPE;
        LaneMask {
            bits,
            _element: PhantomData,
        }
    }

    pub fn species() -> &'static Species {
        Species::of(E::KIND, Self::SHAPE)
    }

    pub fn splat(value: bool) -> Self {
        Self::from_bits([value; N])
    }

    pub fn all() -> Self {
        Self::splat(true)
    }

    pub fn none() -> Self {
        Self::splat(false)
    }

    /// Builds a mask from exactly `N` booleans.
    pub fn from_values(values: &[bool]) -> Result<Self> {
        if values.len() != N {
            return Err(LaneError::length_mismatch("mask", values.len(), N));
        }
        let mut bits = [false; N];
        bits.copy_from_slice(values);
        Ok(Self::from_bits(bits))
    }

    pub fn from_array(values: &[bool], offset: usize) -> Result<Self> {
        check_from_index_size(offset, N, values.len())?;
        let mut bits = [false; N];
        bits.copy_from_slice(&values[offset..offset + N]);
        Ok(Self::from_bits(bits))
    }

    /// Lane `i` is set when bit `i` of `value` is set; lanes past 64 are clear.
    pub fn from_long(value: u64) -> Self {
        let mut bits = [false; N];
        for (i, b) in bits.iter_mut().enumerate().take(64) {
            *b = (value >> i) & 1 == 1;
        }
        Self::from_bits(bits)
    }

    /// Tail mask: lane `i` is set when `offset + i < limit`.
    pub fn index_in_range(offset: usize, limit: usize) -> Self {
        let mut bits = [false; N];
        for (i, b) in bits.iter_mut().enumerate() {
            *b = offset.saturating_add(i) < limit;
        }
        Self::from_bits(bits)
    }

    pub fn to_array(&self) -> [bool; N] {
        self.bits
    }

    pub fn lane_count(&self) -> usize {
        N
    }

    pub fn lane_is_set(&self, lane: usize) -> Result<bool> {
        self.bits
            .get(lane)
            .copied()
            .ok_or_else(|| LaneError::out_of_bounds(lane, N))
    }

    #[inline]
    pub(crate) fn is_set(&self, lane: usize) -> bool {
        self.bits[lane]
    }

    fn zip_with(&self, other: &Self, f: impl Fn(bool, bool) -> bool) -> Self {
        let mut bits = [false; N];
        for (i, b) in bits.iter_mut().enumerate() {
            *b = f(self.bits[i], other.bits[i]);
        }
        Self::from_bits(bits)
    }

    pub fn and(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a & b)
    }

    pub fn or(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a | b)
    }

    pub fn xor(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a ^ b)
    }

    /// `self & !other`
    pub fn and_not(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a & !b)
    }

    /// Lanes where both masks agree.
    pub fn lanewise_eq(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a == b)
    }

    pub fn not(&self) -> Self {
        let mut bits = self.bits;
        for b in bits.iter_mut() {
            *b = !*b;
        }
        Self::from_bits(bits)
    }

    pub fn true_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn first_true(&self) -> Option<usize> {
        self.bits.iter().position(|&b| b)
    }

    pub fn last_true(&self) -> Option<usize> {
        self.bits.iter().rposition(|&b| b)
    }

    pub fn any_true(&self) -> bool {
        self.bits.iter().any(|&b| b)
    }

    pub fn all_true(&self) -> bool {
        self.bits.iter().all(|&b| b)
    }

    /// Packs lane `i` into bit `i`. Fails for masks wider than 64 lanes.
    pub fn to_long(&self) -> Result<u64> {
        if N > 64 {
            return Err(LaneError::UnsupportedOperation(format!(
                "to_long on a mask of {} lanes",
                N
            )));
        }
        Ok(self
            .bits
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | ((b as u64) << i)))
    }

    /// The first `true_count()` lanes set, the rest clear.
    pub fn compress(&self) -> Self {
        let count = self.true_count();
        let mut bits = [false; N];
        for b in bits.iter_mut().take(count) {
            *b = true;
        }
        Self::from_bits(bits)
    }

    /// Reinterprets this mask for another species with the same lane count.
    pub fn cast<F: LaneElement, const M: usize>(&self) -> Result<LaneMask<F, M>> {
        LaneMask::<F, M>::from_values(&self.bits).map_err(|_| {
            LaneError::InvalidArgument(format!(
                "cannot cast a mask of {} lanes to {}",
                N,
                LaneMask::<F, M>::species()
            ))
        })
    }

    /// Set lanes become all-ones bit patterns, clear lanes zero.
    pub fn to_vector(&self) -> Vector<E, N> {
        let set = E::from_raw_bits(u64::MAX);
        let mut lanes = [E::default(); N];
        for (i, lane) in lanes.iter_mut().enumerate() {
            if self.bits[i] {
                *lane = set;
            }
        }
        Vector::from_lanes(lanes)
    }
}

impl<E: LaneElement, const N: usize> Clone for LaneMask<E, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: LaneElement, const N: usize> Copy for LaneMask<E, N> {}

impl<E: LaneElement, const N: usize> PartialEq for LaneMask<E, N> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<E: LaneElement, const N: usize> Eq for LaneMask<E, N> {}

impl<E: LaneElement, const N: usize> fmt::Debug for LaneMask<E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LaneMask[")?;
        for &b in self.bits.iter() {
            f.write_str(if b { "T" } else { "." })?;
        }
        f.write_str("]")
    }
}

impl<E: LaneElement, const N: usize> BitAnd for LaneMask<E, N> {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        LaneMask::and(&self, &rhs)
    }
}

impl<E: LaneElement, const N: usize> BitOr for LaneMask<E, N> {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        LaneMask::or(&self, &rhs)
    }
}

impl<E: LaneElement, const N: usize> BitXor for LaneMask<E, N> {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        LaneMask::xor(&self, &rhs)
    }
}

impl<E: LaneElement, const N: usize> Not for LaneMask<E, N> {
    type Output = Self;
    fn not(self) -> Self {
        LaneMask::not(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type M4 = LaneMask<i32, 4>;

    #[test]
    fn test_counts_and_positions() {
        let m = M4::from_values(&[false, true, false, true]).unwrap();
        assert_eq!(m.true_count(), 2);
        assert_eq!(m.first_true(), Some(1));
        assert_eq!(m.last_true(), Some(3));
        assert!(m.any_true());
        assert!(!m.all_true());
        assert_eq!(M4::none().first_true(), None);
        assert_eq!(M4::none().last_true(), None);
    }

    #[test]
    fn test_long_conversion() {
        let m = M4::from_long(0b1010);
        assert_eq!(m.to_array(), [false, true, false, true]);
        assert_eq!(m.to_long().unwrap(), 0b1010);
        // Bits past the lane count are dropped
        assert_eq!(M4::from_long(u64::MAX).to_long().unwrap(), 0b1111);
    }

    #[test]
    fn test_to_long_widest_mask() {
        // 512-bit byte species has 64 lanes, the widest that still fits
        assert_eq!(LaneMask::<i8, 64>::all().to_long().unwrap(), u64::MAX);
        assert!(LaneMask::<i8, 8>::all().to_long().is_ok());
    }

    #[test]
    fn test_logic() {
        let a = M4::from_long(0b0011);
        let b = M4::from_long(0b0101);
        assert_eq!((a & b).to_long().unwrap(), 0b0001);
        assert_eq!((a | b).to_long().unwrap(), 0b0111);
        assert_eq!((a ^ b).to_long().unwrap(), 0b0110);
        assert_eq!(a.and_not(&b).to_long().unwrap(), 0b0010);
        assert_eq!((!a).to_long().unwrap(), 0b1100);
        assert_eq!(a.lanewise_eq(&b).to_long().unwrap(), 0b1001);
    }

    #[test]
    fn test_compress_packs_low() {
        let m = M4::from_long(0b1010);
        assert_eq!(m.compress().to_long().unwrap(), 0b0011);
    }

    #[test]
    fn test_bounds_and_lengths() {
        assert!(matches!(
            M4::from_values(&[true; 3]),
            Err(LaneError::InvalidArgument(_))
        ));
        assert!(matches!(
            M4::from_array(&[true; 6], 3),
            Err(LaneError::OutOfBounds { .. })
        ));
        assert_eq!(M4::from_array(&[false, true, true, true, true, false], 1).unwrap(), M4::all());
        assert!(M4::all().lane_is_set(4).is_err());
    }

    #[test]
    fn test_cast_checks_lane_count() {
        let m = M4::from_long(0b0110);
        let f: LaneMask<f32, 4> = m.cast().unwrap();
        assert_eq!(f.to_long().unwrap(), 0b0110);
        let wide: Result<LaneMask<i64, 8>> = m.cast();
        assert!(matches!(wide, Err(LaneError::InvalidArgument(_))));
    }

    #[test]
    fn test_index_in_range() {
        assert_eq!(M4::index_in_range(8, 10).to_long().unwrap(), 0b0011);
        assert_eq!(M4::index_in_range(0, 10), M4::all());
    }

    #[test]
    fn test_to_vector() {
        let v = M4::from_long(0b0101).to_vector();
        assert_eq!(v.to_array(), [-1, 0, -1, 0]);
    }
}
