// Enable unstable features for AVX-512 support (requires nightly Rust)
#![cfg_attr(feature = "avx512", feature(stdarch_x86_avx512))]
#![cfg_attr(feature = "avx512", feature(avx512_target_feature))]

pub mod compute; // Bulk compress/expand kernels and SIMD engines
pub mod core; // Word-level bit permutation
pub mod defaults;
pub mod error;
pub mod kernels; // Array kernels on the lane model (selective store, popcount)
pub mod lanes; // Vector, mask, shuffle, species
pub mod verify;
pub mod verify_opt;

pub use error::{LaneError, Result};
