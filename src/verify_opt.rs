use clap::Args;

use crate::compute::simd_abstraction::simd::SimdEngineType;
use crate::compute::{detect_optimal_backend, PermuteBackend};
use crate::defaults::{
    DEFAULT_EXCEPTIONAL_INDEX, PARALLEL_THRESHOLD, VERIFY_LENGTH, VERIFY_MISMATCH_RATE,
    VERIFY_ROUNDS, VERIFY_SEED,
};
use crate::lanes::ExceptionalIndex;

/// Options for a self-verification run.
#[derive(Debug, Clone)]
pub struct VerifyOpt {
    pub length: usize,            // Words per generated array
    pub seed: u64,                // Base RNG seed; round r uses seed + r
    pub rounds: usize,            // Independent random rounds
    pub mismatch_rate: f64,       // Fraction of differing pairs in stream-compaction data
    pub policy: ExceptionalIndex, // Shuffle policy for the rearrange checks
    pub backend: PermuteBackend,  // Backend checked against the scalar loop
    pub parallel_threshold: usize,
    pub threads: Option<usize>, // rayon pool size; None keeps the global default
}

impl Default for VerifyOpt {
    fn default() -> Self {
        VerifyOpt {
            length: VERIFY_LENGTH,
            seed: VERIFY_SEED,
            rounds: VERIFY_ROUNDS,
            mismatch_rate: VERIFY_MISMATCH_RATE,
            policy: DEFAULT_EXCEPTIONAL_INDEX,
            backend: detect_optimal_backend(),
            parallel_threshold: PARALLEL_THRESHOLD,
            threads: None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct VerifyCliOptions {
    /// Number of words in each random array
    #[arg(short = 'n', long, value_name = "INT", default_value_t = VERIFY_LENGTH)]
    pub length: usize,

    /// Base seed for the random generator
    #[arg(short = 's', long, value_name = "INT", default_value_t = VERIFY_SEED)]
    pub seed: u64,

    /// Number of independent rounds
    #[arg(short = 'r', long, value_name = "INT", default_value_t = VERIFY_ROUNDS)]
    pub rounds: usize,

    /// Fraction of mismatching pairs in the stream-compaction data
    #[arg(long, value_name = "FLOAT", default_value_t = VERIFY_MISMATCH_RATE)]
    pub mismatch_rate: f64,

    /// Exceptional shuffle index policy: wrap, zero, clamp or fail
    #[arg(long, value_name = "POLICY", default_value = "wrap")]
    pub policy: String,

    /// Bulk kernel backend: auto, scalar, sse, avx2, avx512, bmi2 or portable
    #[arg(short = 'b', long, value_name = "BACKEND", default_value = "auto")]
    pub backend: String,

    /// Slices at least this long are split across threads
    #[arg(long, value_name = "INT", default_value_t = PARALLEL_THRESHOLD)]
    pub parallel_threshold: usize,

    /// Number of threads (default: all available cores)
    #[arg(short = 't', long, value_name = "INT")]
    pub threads: Option<usize>,

    /// Verbose level: 1=error, 2=warning, 3=message, 4=debug, 5+=trace
    #[arg(short = 'v', long, value_name = "INT", default_value_t = 3)]
    pub verbosity: u8,
}

impl VerifyCliOptions {
    pub fn to_opt(&self) -> Result<VerifyOpt, String> {
        if !(0.0..=1.0).contains(&self.mismatch_rate) {
            return Err(format!("Mismatch rate must be within [0, 1]: {}", self.mismatch_rate));
        }
        let policy = self
            .policy
            .parse::<ExceptionalIndex>()
            .map_err(|e| e.to_string())?;
        Ok(VerifyOpt {
            length: self.length,
            seed: self.seed,
            rounds: self.rounds,
            mismatch_rate: self.mismatch_rate,
            policy,
            backend: parse_backend(&self.backend)?,
            parallel_threshold: self.parallel_threshold,
            threads: self.threads,
        })
    }
}

/// Parse a backend name as accepted on the command line
pub fn parse_backend(s: &str) -> Result<PermuteBackend, String> {
    match s.to_ascii_lowercase().as_str() {
        "auto" => Ok(detect_optimal_backend()),
        "scalar" => Ok(PermuteBackend::CpuSimd(SimdEngineType::Scalar)),
        "sse" | "neon" | "128" => Ok(PermuteBackend::CpuSimd(SimdEngineType::Engine128)),
        #[cfg(target_arch = "x86_64")]
        "avx2" | "256" => Ok(PermuteBackend::CpuSimd(SimdEngineType::Engine256)),
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        "avx512" | "512" => Ok(PermuteBackend::CpuSimd(SimdEngineType::Engine512)),
        "bmi2" => Ok(PermuteBackend::Bmi2),
        "portable" => Ok(PermuteBackend::Portable),
        _ => Err(format!("Unknown or unsupported backend: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!(parse_backend("auto").unwrap(), detect_optimal_backend());
        assert_eq!(
            parse_backend("Scalar").unwrap(),
            PermuteBackend::CpuSimd(SimdEngineType::Scalar)
        );
        assert_eq!(parse_backend("bmi2").unwrap(), PermuteBackend::Bmi2);
        assert!(parse_backend("mmx").is_err());
    }

    #[test]
    fn test_default_opt() {
        let opt = VerifyOpt::default();
        assert_eq!(opt.length, 10_000);
        assert_eq!(opt.policy, ExceptionalIndex::Wrap);
        assert!(opt.threads.is_none());
    }
}
