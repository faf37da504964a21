//! Word-level algorithms with no dependencies on the lane model.

pub mod bit_permute;

pub use bit_permute::{compress_u32, compress_u64, expand_u32, expand_u64, BitPermute};
