//! IEEE-754 binary16 lane element.
//!
//! A thin wrapper over [`half::f16`]. Arithmetic widens to `f32`, computes,
//! and narrows back with round-to-nearest-even; narrowing saturates to
//! ±infinity on overflow and keeps NaNs quiet. Lane equality compares bit
//! patterns, so NaN lanes equal themselves and `-0.0 != +0.0`.

use std::fmt;
use std::hash::{Hash, Hasher};

use half::f16;

/// A binary16 lane value.
#[derive(Clone, Copy, Default)]
#[repr(transparent)]
pub struct Halffloat(f16);

impl Halffloat {
    pub const SIZE: u32 = 16;
    pub const ZERO: Halffloat = Halffloat(f16::ZERO);
    pub const ONE: Halffloat = Halffloat(f16::ONE);
    pub const POSITIVE_INFINITY: Halffloat = Halffloat(f16::INFINITY);
    pub const NEGATIVE_INFINITY: Halffloat = Halffloat(f16::NEG_INFINITY);
    pub const NAN: Halffloat = Halffloat(f16::NAN);
    /// Largest finite value, 65504.
    pub const MAX_VALUE: Halffloat = Halffloat(f16::MAX);
    /// Smallest positive subnormal, 2^-24.
    pub const MIN_VALUE: Halffloat = Halffloat(f16::MIN_POSITIVE_SUBNORMAL);

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Halffloat(f16::from_bits(bits))
    }

    #[inline]
    pub const fn to_bits(self) -> u16 {
        self.0.to_bits()
    }

    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Halffloat(f16::from_f32(value))
    }

    /// Narrows an `f64` with a single rounding.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Halffloat(f16::from_f64(value))
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0.to_f32()
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64()
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        self.0.is_nan()
    }

    #[inline]
    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn is_sign_negative(self) -> bool {
        self.0.is_sign_negative()
    }

    /// `a * b + c` rounded once to binary16.
    ///
    /// The product of two binary16 values is exact in `f64`. The sum is
    /// rounded to odd in `f64` (exact error from TwoSum), which leaves enough
    /// guard bits for the final narrowing to round correctly.
    pub fn mul_add(self, b: Halffloat, c: Halffloat) -> Halffloat {
        let p = self.to_f64() * b.to_f64();
        let c = c.to_f64();
        let s = p + c;
        if !s.is_finite() {
            return Halffloat::from_f64(s);
        }
        let bv = s - p;
        let err = (p - (s - bv)) + (c - bv);
        if err == 0.0 || s.to_bits() & 1 == 1 {
            return Halffloat::from_f64(s);
        }
        // Step one ulp toward the exact sum; the result is odd
        let bits = if (err > 0.0) == (s > 0.0) {
            s.to_bits() + 1
        } else {
            s.to_bits() - 1
        };
        Halffloat::from_f64(f64::from_bits(bits))
    }
}

impl PartialEq for Halffloat {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Eq for Halffloat {}

impl Hash for Halffloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl fmt::Debug for Halffloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}h", self.to_f32())
    }
}

impl fmt::Display for Halffloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f16> for Halffloat {
    fn from(h: f16) -> Halffloat {
        Halffloat(h)
    }
}

impl From<Halffloat> for f16 {
    fn from(h: Halffloat) -> f16 {
        h.0
    }
}

impl From<Halffloat> for f32 {
    fn from(h: Halffloat) -> f32 {
        h.to_f32()
    }
}
