//! Lanewise operator tokens.
//!
//! Operators are plain values so that one `lanewise` entry point can serve
//! every element kind; applicability is checked against the element kind and
//! reported as `UnsupportedOperation`.

use std::fmt;

/// One-operand lanewise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Abs,
    /// Bitwise complement (integral kinds only)
    Not,
    /// Population count
    BitCount,
    TrailingZeros,
    LeadingZeros,
    /// Reverse the bit order
    Reverse,
    ReverseBytes,
    /// Square root (floating kinds only)
    Sqrt,
}

/// Two-operand lanewise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
    And,
    Or,
    Xor,
    /// `a & !b`
    AndNot,
    /// Logical shift left; count masked to the element width
    Lshl,
    /// Arithmetic shift right
    Ashr,
    /// Logical shift right
    Lshr,
    /// Rotate left
    Rol,
    /// Rotate right
    Ror,
    /// Per-lane bit compress: the left lane is the value, the right lane the mask
    CompressBits,
    /// Per-lane bit expand: the left lane is the value, the right lane the mask
    ExpandBits,
}

/// Three-operand lanewise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TernaryOp {
    /// `a * b + c` with a single rounding (floating kinds only). Half-float
    /// lanes compute in `f64` and round once to binary16.
    Fma,
    /// `(a & !c) | (b & c)` (integral kinds only)
    BitwiseBlend,
}

/// Lanewise comparisons producing a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    UnsignedLt,
    UnsignedLe,
    UnsignedGt,
    UnsignedGe,
}

/// Lanewise predicates producing a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestOp {
    /// All bits zero
    IsDefault,
    /// Sign bit set
    IsNegative,
    IsFinite,
    IsNan,
    IsInfinite,
}

/// Associative operators for folding all lanes into one scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReductionOp {
    Add,
    Mul,
    Min,
    Max,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    /// Operators that require an integral element kind.
    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Xor
                | BinaryOp::AndNot
                | BinaryOp::Lshl
                | BinaryOp::Ashr
                | BinaryOp::Lshr
                | BinaryOp::Rol
                | BinaryOp::Ror
                | BinaryOp::CompressBits
                | BinaryOp::ExpandBits
        )
    }
}

impl CompareOp {
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            CompareOp::UnsignedLt | CompareOp::UnsignedLe | CompareOp::UnsignedGt | CompareOp::UnsignedGe
        )
    }
}

impl ReductionOp {
    /// The binary operator the reduction folds with.
    pub fn binary_op(self) -> BinaryOp {
        match self {
            ReductionOp::Add => BinaryOp::Add,
            ReductionOp::Mul => BinaryOp::Mul,
            ReductionOp::Min => BinaryOp::Min,
            ReductionOp::Max => BinaryOp::Max,
            ReductionOp::And => BinaryOp::And,
            ReductionOp::Or => BinaryOp::Or,
            ReductionOp::Xor => BinaryOp::Xor,
        }
    }
}

macro_rules! impl_display_as_debug {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Debug::fmt(self, f)
                }
            }
        )*
    };
}

impl_display_as_debug!(UnaryOp, BinaryOp, TernaryOp, CompareOp, TestOp, ReductionOp);
