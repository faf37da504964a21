//! Lane-indexed vector, mask and shuffle model.
//!
//! ```text
//! Species  (element kind x shape, cached)
//!    │
//!    ├── Vector<E, N>     lanewise ops, compare, compress, rearrange, reduce
//!    ├── LaneMask<E, N>   per-lane booleans
//!    └── Shuffle<E, N>    per-lane source indexes + exceptional-index policy
//! ```
//!
//! The aliases below name every supported (element, lane count) pair.

pub mod element;
pub mod float16;
pub mod mask;
pub mod ops;
pub mod shuffle;
pub mod species;
pub mod vector;

pub use element::{ElementKind, LaneElement};
pub use float16::Halffloat;
pub use mask::LaneMask;
pub use ops::{BinaryOp, CompareOp, ReductionOp, TernaryOp, TestOp, UnaryOp};
pub use shuffle::{ExceptionalIndex, Shuffle};
pub use species::{Species, VectorShape};
pub use vector::Vector;

macro_rules! vector_aliases {
    ($($name:ident = $e:ty, $n:expr;)*) => {
        $(pub type $name = Vector<$e, $n>;)*
    };
}

vector_aliases! {
    ByteVector64 = i8, 8;
    ByteVector128 = i8, 16;
    ByteVector256 = i8, 32;
    ByteVector512 = i8, 64;
    ShortVector64 = i16, 4;
    ShortVector128 = i16, 8;
    ShortVector256 = i16, 16;
    ShortVector512 = i16, 32;
    IntVector64 = i32, 2;
    IntVector128 = i32, 4;
    IntVector256 = i32, 8;
    IntVector512 = i32, 16;
    LongVector64 = i64, 1;
    LongVector128 = i64, 2;
    LongVector256 = i64, 4;
    LongVector512 = i64, 8;
    HalffloatVector64 = Halffloat, 4;
    HalffloatVector128 = Halffloat, 8;
    HalffloatVector256 = Halffloat, 16;
    HalffloatVector512 = Halffloat, 32;
    FloatVector64 = f32, 2;
    FloatVector128 = f32, 4;
    FloatVector256 = f32, 8;
    FloatVector512 = f32, 16;
    DoubleVector64 = f64, 1;
    DoubleVector128 = f64, 2;
    DoubleVector256 = f64, 4;
    DoubleVector512 = f64, 8;
}
