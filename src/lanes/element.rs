//! Element kinds and per-lane semantics.
//!
//! Each lane element type defines exactly what one lane of every operator
//! computes. Vectors are loops of these functions, so the scalar reference
//! path and the lanewise path share a single definition.

use std::fmt;

use crate::core::bit_permute::BitPermute;
use crate::error::{LaneError, Result};
use crate::lanes::float16::Halffloat;
use crate::lanes::ops::{BinaryOp, CompareOp, ReductionOp, TernaryOp, TestOp, UnaryOp};

/// Element kind of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Byte,
    Short,
    Int,
    Long,
    Halffloat,
    Float,
    Double,
}

impl ElementKind {
    pub const ALL: [ElementKind; 7] = [
        ElementKind::Byte,
        ElementKind::Short,
        ElementKind::Int,
        ElementKind::Long,
        ElementKind::Halffloat,
        ElementKind::Float,
        ElementKind::Double,
    ];

    /// Element width in bits.
    pub const fn bits(self) -> usize {
        match self {
            ElementKind::Byte => 8,
            ElementKind::Short | ElementKind::Halffloat => 16,
            ElementKind::Int | ElementKind::Float => 32,
            ElementKind::Long | ElementKind::Double => 64,
        }
    }

    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            ElementKind::Byte | ElementKind::Short | ElementKind::Int | ElementKind::Long
        )
    }

    pub const fn is_floating(self) -> bool {
        !self.is_integral()
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Byte => "byte",
            ElementKind::Short => "short",
            ElementKind::Int => "int",
            ElementKind::Long => "long",
            ElementKind::Halffloat => "halffloat",
            ElementKind::Float => "float",
            ElementKind::Double => "double",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A type that can occupy one lane of a [`Vector`](crate::lanes::Vector).
///
/// Sealed: implemented for `i8`, `i16`, `i32`, `i64`, [`Halffloat`], `f32`
/// and `f64`.
pub trait LaneElement:
    sealed::Sealed + Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static
{
    const KIND: ElementKind;
    const BITS: usize;

    /// Raw bit pattern, zero-extended.
    fn to_raw_bits(self) -> u64;

    /// Inverse of [`to_raw_bits`](Self::to_raw_bits); high bits are ignored.
    fn from_raw_bits(bits: u64) -> Self;

    /// Converts a lane index (iota, shuffle sources) into an element.
    fn from_lane_index(index: i64) -> Self;

    /// Converts an element into a lane index (vector to shuffle).
    fn to_lane_index(self) -> i64;

    fn unary(op: UnaryOp, a: Self) -> Result<Self>;

    /// A zero divisor reports `DivisionByZero` with lane 0; callers remap the lane.
    fn binary(op: BinaryOp, a: Self, b: Self) -> Result<Self>;

    fn ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Result<Self>;

    fn compare(op: CompareOp, a: Self, b: Self) -> Result<bool>;

    fn test(op: TestOp, a: Self) -> Result<bool>;

    /// Identity element of a reduction, used for unset lanes of masked folds.
    fn identity(op: ReductionOp) -> Result<Self>;
}

fn unsupported<T>(op: impl fmt::Display, kind: ElementKind) -> Result<T> {
    Err(LaneError::UnsupportedOperation(format!(
        "{} is not supported for {} lanes",
        op, kind
    )))
}

// Bit compress/expand exists only for 32- and 64-bit words.
trait LanePermute: Sized {
    fn lane_compress(a: Self, mask: Self) -> Option<Self>;
    fn lane_expand(a: Self, mask: Self) -> Option<Self>;
}

macro_rules! impl_lane_permute {
    (none: $($t:ty),*) => {
        $(
            impl LanePermute for $t {
                fn lane_compress(_: Self, _: Self) -> Option<Self> { None }
                fn lane_expand(_: Self, _: Self) -> Option<Self> { None }
            }
        )*
    };
    (words: $($t:ty),*) => {
        $(
            impl LanePermute for $t {
                #[inline]
                fn lane_compress(a: Self, mask: Self) -> Option<Self> {
                    Some(a.compress_bits(mask))
                }
                #[inline]
                fn lane_expand(a: Self, mask: Self) -> Option<Self> {
                    Some(a.expand_bits(mask))
                }
            }
        )*
    };
}

impl_lane_permute!(none: i8, i16);
impl_lane_permute!(words: i32, i64);

macro_rules! impl_integral_element {
    ($t:ty, $u:ty, $kind:ident) => {
        impl sealed::Sealed for $t {}

        impl LaneElement for $t {
            const KIND: ElementKind = ElementKind::$kind;
            const BITS: usize = <$t>::BITS as usize;

            #[inline]
            fn to_raw_bits(self) -> u64 {
                self as $u as u64
            }

            #[inline]
            fn from_raw_bits(bits: u64) -> Self {
                bits as $u as $t
            }

            #[inline]
            fn from_lane_index(index: i64) -> Self {
                index as $t
            }

            #[inline]
            fn to_lane_index(self) -> i64 {
                self as i64
            }

            #[inline]
            fn unary(op: UnaryOp, a: Self) -> Result<Self> {
                Ok(match op {
                    UnaryOp::Neg => a.wrapping_neg(),
                    UnaryOp::Abs => a.wrapping_abs(),
                    UnaryOp::Not => !a,
                    UnaryOp::BitCount => a.count_ones() as $t,
                    UnaryOp::TrailingZeros => a.trailing_zeros() as $t,
                    UnaryOp::LeadingZeros => a.leading_zeros() as $t,
                    UnaryOp::Reverse => a.reverse_bits(),
                    UnaryOp::ReverseBytes => a.swap_bytes(),
                    UnaryOp::Sqrt => return unsupported(op, Self::KIND),
                })
            }

            #[inline]
            fn binary(op: BinaryOp, a: Self, b: Self) -> Result<Self> {
                // Shift and rotate counts use only the low log2(BITS) bits
                let count = (b as u32) & (<$t>::BITS - 1);
                Ok(match op {
                    BinaryOp::Add => a.wrapping_add(b),
                    BinaryOp::Sub => a.wrapping_sub(b),
                    BinaryOp::Mul => a.wrapping_mul(b),
                    BinaryOp::Div => {
                        if b == 0 {
                            return Err(LaneError::DivisionByZero { lane: 0 });
                        }
                        a.wrapping_div(b)
                    }
                    BinaryOp::Min => a.min(b),
                    BinaryOp::Max => a.max(b),
                    BinaryOp::And => a & b,
                    BinaryOp::Or => a | b,
                    BinaryOp::Xor => a ^ b,
                    BinaryOp::AndNot => a & !b,
                    BinaryOp::Lshl => a.wrapping_shl(count),
                    BinaryOp::Ashr => a.wrapping_shr(count),
                    BinaryOp::Lshr => (a as $u).wrapping_shr(count) as $t,
                    BinaryOp::Rol => (a as $u).rotate_left(count) as $t,
                    BinaryOp::Ror => (a as $u).rotate_right(count) as $t,
                    BinaryOp::CompressBits => match <$t as LanePermute>::lane_compress(a, b) {
                        Some(r) => r,
                        None => return unsupported(op, Self::KIND),
                    },
                    BinaryOp::ExpandBits => match <$t as LanePermute>::lane_expand(a, b) {
                        Some(r) => r,
                        None => return unsupported(op, Self::KIND),
                    },
                })
            }

            #[inline]
            fn ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Result<Self> {
                match op {
                    TernaryOp::BitwiseBlend => Ok((a & !c) | (b & c)),
                    TernaryOp::Fma => unsupported(op, Self::KIND),
                }
            }

            #[inline]
            fn compare(op: CompareOp, a: Self, b: Self) -> Result<bool> {
                Ok(match op {
                    CompareOp::Eq => a == b,
                    CompareOp::Ne => a != b,
                    CompareOp::Lt => a < b,
                    CompareOp::Le => a <= b,
                    CompareOp::Gt => a > b,
                    CompareOp::Ge => a >= b,
                    CompareOp::UnsignedLt => (a as $u) < (b as $u),
                    CompareOp::UnsignedLe => (a as $u) <= (b as $u),
                    CompareOp::UnsignedGt => (a as $u) > (b as $u),
                    CompareOp::UnsignedGe => (a as $u) >= (b as $u),
                })
            }

            #[inline]
            fn test(op: TestOp, a: Self) -> Result<bool> {
                match op {
                    TestOp::IsDefault => Ok(a == 0),
                    TestOp::IsNegative => Ok(a < 0),
                    TestOp::IsFinite | TestOp::IsNan | TestOp::IsInfinite => {
                        unsupported(op, Self::KIND)
                    }
                }
            }

            #[inline]
            fn identity(op: ReductionOp) -> Result<Self> {
                Ok(match op {
                    ReductionOp::Add | ReductionOp::Or | ReductionOp::Xor => 0,
                    ReductionOp::Mul => 1,
                    ReductionOp::Min => <$t>::MAX,
                    ReductionOp::Max => <$t>::MIN,
                    ReductionOp::And => !0,
                })
            }
        }
    };
}

impl_integral_element!(i8, u8, Byte);
impl_integral_element!(i16, u16, Short);
impl_integral_element!(i32, u32, Int);
impl_integral_element!(i64, u64, Long);

macro_rules! impl_floating_element {
    ($t:ty, $u:ty, $kind:ident) => {
        impl sealed::Sealed for $t {}

        impl LaneElement for $t {
            const KIND: ElementKind = ElementKind::$kind;
            const BITS: usize = <$u>::BITS as usize;

            #[inline]
            fn to_raw_bits(self) -> u64 {
                self.to_bits() as u64
            }

            #[inline]
            fn from_raw_bits(bits: u64) -> Self {
                <$t>::from_bits(bits as $u)
            }

            #[inline]
            fn from_lane_index(index: i64) -> Self {
                index as $t
            }

            #[inline]
            fn to_lane_index(self) -> i64 {
                self as i64
            }

            #[inline]
            fn unary(op: UnaryOp, a: Self) -> Result<Self> {
                match op {
                    UnaryOp::Neg => Ok(-a),
                    UnaryOp::Abs => Ok(a.abs()),
                    UnaryOp::Sqrt => Ok(a.sqrt()),
                    _ => unsupported(op, Self::KIND),
                }
            }

            #[inline]
            fn binary(op: BinaryOp, a: Self, b: Self) -> Result<Self> {
                match op {
                    BinaryOp::Add => Ok(a + b),
                    BinaryOp::Sub => Ok(a - b),
                    BinaryOp::Mul => Ok(a * b),
                    BinaryOp::Div => Ok(a / b),
                    // NaN propagates; -0.0 orders below +0.0
                    BinaryOp::Min => Ok(if a.is_nan() || b.is_nan() {
                        <$t>::NAN
                    } else if a == b {
                        if a.is_sign_negative() { a } else { b }
                    } else if a < b {
                        a
                    } else {
                        b
                    }),
                    BinaryOp::Max => Ok(if a.is_nan() || b.is_nan() {
                        <$t>::NAN
                    } else if a == b {
                        if a.is_sign_positive() { a } else { b }
                    } else if a > b {
                        a
                    } else {
                        b
                    }),
                    _ => unsupported(op, Self::KIND),
                }
            }

            #[inline]
            fn ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Result<Self> {
                match op {
                    TernaryOp::Fma => Ok(a.mul_add(b, c)),
                    TernaryOp::BitwiseBlend => unsupported(op, Self::KIND),
                }
            }

            #[inline]
            fn compare(op: CompareOp, a: Self, b: Self) -> Result<bool> {
                match op {
                    CompareOp::Eq => Ok(a == b),
                    CompareOp::Ne => Ok(a != b),
                    CompareOp::Lt => Ok(a < b),
                    CompareOp::Le => Ok(a <= b),
                    CompareOp::Gt => Ok(a > b),
                    CompareOp::Ge => Ok(a >= b),
                    _ => unsupported(op, Self::KIND),
                }
            }

            #[inline]
            fn test(op: TestOp, a: Self) -> Result<bool> {
                Ok(match op {
                    TestOp::IsDefault => a.to_bits() == 0,
                    TestOp::IsNegative => a.is_sign_negative(),
                    TestOp::IsFinite => a.is_finite(),
                    TestOp::IsNan => a.is_nan(),
                    TestOp::IsInfinite => a.is_infinite(),
                })
            }

            #[inline]
            fn identity(op: ReductionOp) -> Result<Self> {
                match op {
                    ReductionOp::Add => Ok(0.0),
                    ReductionOp::Mul => Ok(1.0),
                    ReductionOp::Min => Ok(<$t>::INFINITY),
                    ReductionOp::Max => Ok(<$t>::NEG_INFINITY),
                    _ => unsupported(op, Self::KIND),
                }
            }
        }
    };
}

impl_floating_element!(f32, u32, Float);
impl_floating_element!(f64, u64, Double);

impl sealed::Sealed for Halffloat {}

impl LaneElement for Halffloat {
    const KIND: ElementKind = ElementKind::Halffloat;
    const BITS: usize = 16;

    #[inline]
    fn to_raw_bits(self) -> u64 {
        self.to_bits() as u64
    }

    #[inline]
    fn from_raw_bits(bits: u64) -> Self {
        Halffloat::from_bits(bits as u16)
    }

    #[inline]
    fn from_lane_index(index: i64) -> Self {
        Halffloat::from_f32(index as f32)
    }

    #[inline]
    fn to_lane_index(self) -> i64 {
        self.to_f32() as i64
    }

    fn unary(op: UnaryOp, a: Self) -> Result<Self> {
        match op {
            // Sign handling works on the bit pattern so NaN payloads survive
            UnaryOp::Neg => Ok(Halffloat::from_bits(a.to_bits() ^ 0x8000)),
            UnaryOp::Abs => Ok(Halffloat::from_bits(a.to_bits() & 0x7FFF)),
            _ => f32::unary(op, a.to_f32())
                .map(Halffloat::from_f32)
                .or_else(|_| unsupported(op, Self::KIND)),
        }
    }

    fn binary(op: BinaryOp, a: Self, b: Self) -> Result<Self> {
        f32::binary(op, a.to_f32(), b.to_f32())
            .map(Halffloat::from_f32)
            .or_else(|_| unsupported(op, Self::KIND))
    }

    fn ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Result<Self> {
        match op {
            TernaryOp::Fma => Ok(a.mul_add(b, c)),
            TernaryOp::BitwiseBlend => unsupported(op, Self::KIND),
        }
    }

    fn compare(op: CompareOp, a: Self, b: Self) -> Result<bool> {
        f32::compare(op, a.to_f32(), b.to_f32()).or_else(|_| unsupported(op, Self::KIND))
    }

    fn test(op: TestOp, a: Self) -> Result<bool> {
        Ok(match op {
            TestOp::IsDefault => a.to_bits() == 0,
            TestOp::IsNegative => a.is_sign_negative(),
            TestOp::IsFinite => a.is_finite(),
            TestOp::IsNan => a.is_nan(),
            TestOp::IsInfinite => a.is_infinite(),
        })
    }

    fn identity(op: ReductionOp) -> Result<Self> {
        f32::identity(op)
            .map(Halffloat::from_f32)
            .or_else(|_| unsupported(op, Self::KIND))
    }
}
