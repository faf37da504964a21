// src/defaults.rs

use crate::lanes::shuffle::ExceptionalIndex;

// Verification Constants
pub const VERIFY_LENGTH: usize = 10_000;
pub const VERIFY_SEED: u64 = 0x5EED_CAFE_BABE;
pub const VERIFY_ROUNDS: usize = 4;
/// Probability that a generated stream-compaction pair differs.
pub const VERIFY_MISMATCH_RATE: f64 = 0.25;

// Bulk Kernel Constants
/// Slices shorter than this run on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 1 << 16;
/// Words per rayon task; a multiple of every engine's lane count.
pub const PARALLEL_CHUNK: usize = 1 << 12;

// Lane Model Constants
pub const DEFAULT_EXCEPTIONAL_INDEX: ExceptionalIndex = ExceptionalIndex::Wrap;

// Other Constants
pub const VERBOSITY: i32 = 3;
