//! # Bit Permutation Compute Layer
//!
//! Routes bulk compress/expand work to the best available implementation.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        PermuteBackend                                │
//! │                                                                      │
//! │  • CpuSimd(SimdEngineType)  register-wide rounds (SSE2/NEON/AVX2/   │
//! │                             AVX-512), scalar words as fallback       │
//! │  • Bmi2                     PEXT/PDEP, one word per instruction      │
//! │  • Portable                 core::bit_permute word loop (oracle)     │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every backend produces bit-identical output; the portable loop is the
//! reference the others are tested against.

pub mod bit_permute_kernels;
pub mod simd_abstraction;

use simd_abstraction::simd::{
    available_engines, detected_engine, has_bmi2, simd_engine_description, SimdEngineType,
};

use crate::defaults::PARALLEL_THRESHOLD;

// ============================================================================
// BACKEND ENUM
// ============================================================================

/// Implementation used for bulk bit compress/expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermuteBackend {
    /// Register-wide parallel-prefix rounds on the given engine.
    CpuSimd(SimdEngineType),

    /// Hardware `PEXT`/`PDEP` (x86_64 BMI2).
    Bmi2,

    /// The word-at-a-time reference loop.
    Portable,
}

impl PermuteBackend {
    /// Resolves the requested backend to one the CPU can actually run.
    ///
    /// An unavailable SIMD engine falls back to the detected engine; BMI2
    /// without hardware support falls back to the portable loop.
    pub fn effective_backend(&self) -> PermuteBackend {
        match *self {
            PermuteBackend::CpuSimd(engine) => {
                if available_engines().contains(&engine) {
                    PermuteBackend::CpuSimd(engine)
                } else {
                    log::debug!(
                        "{:?} requested but not supported, falling back to {:?}",
                        engine,
                        detected_engine()
                    );
                    PermuteBackend::CpuSimd(detected_engine())
                }
            }
            PermuteBackend::Bmi2 => {
                if has_bmi2() {
                    PermuteBackend::Bmi2
                } else {
                    log::debug!("BMI2 backend requested but not supported, using portable loop");
                    PermuteBackend::Portable
                }
            }
            PermuteBackend::Portable => PermuteBackend::Portable,
        }
    }

    /// The SIMD engine if this backend resolves to one.
    pub fn simd_engine(&self) -> Option<SimdEngineType> {
        match self.effective_backend() {
            PermuteBackend::CpuSimd(engine) => Some(engine),
            _ => None,
        }
    }
}

// ============================================================================
// BACKEND DETECTION
// ============================================================================

/// The widest detected SIMD engine. BMI2 is opt-in only.
pub fn detect_optimal_backend() -> PermuteBackend {
    PermuteBackend::CpuSimd(detected_engine())
}

/// Returns a human-readable description of the backend.
pub fn backend_description(backend: PermuteBackend) -> &'static str {
    match backend {
        PermuteBackend::CpuSimd(engine) => simd_engine_description(engine),
        PermuteBackend::Bmi2 => "BMI2 (PEXT/PDEP, one word per instruction)",
        PermuteBackend::Portable => "Portable (parallel-prefix word loop)",
    }
}

// ============================================================================
// COMPUTE CONTEXT
// ============================================================================

/// Runtime context for bulk kernels.
#[derive(Debug, Clone)]
pub struct PermuteContext {
    /// Selected backend
    pub backend: PermuteBackend,

    /// Minimum slice length for splitting work across the rayon pool
    pub parallel_threshold: usize,
}

impl Default for PermuteContext {
    fn default() -> Self {
        Self {
            backend: detect_optimal_backend(),
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

impl PermuteContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(backend: PermuteBackend) -> Self {
        Self {
            backend,
            ..Default::default()
        }
    }

    pub fn effective_backend(&self) -> PermuteBackend {
        self.backend.effective_backend()
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
