//! Runtime SIMD engine detection.
//!
//! Detects the widest SIMD engine the CPU supports, once per process, and
//! provides human-readable descriptions and lane counts for it.

use lazy_static::lazy_static;

/// Available SIMD engine types based on CPU capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdEngineType {
    /// Portable word-at-a-time loop, no SIMD
    Scalar,
    /// 128-bit SIMD (SSE2/NEON)
    Engine128,
    /// 256-bit SIMD (AVX2) - x86_64 only
    #[cfg(target_arch = "x86_64")]
    Engine256,
    /// 512-bit SIMD (AVX-512F) - x86_64 only (requires avx512 feature flag)
    #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
    Engine512,
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1").unwrap_or(false)
}

/// Detects the optimal SIMD engine based on CPU features
///
/// Environment variable overrides for testing/debugging:
/// - `FERROUS_LANES_FORCE_SCALAR=1`: no SIMD engine at all
/// - `FERROUS_LANES_FORCE_SSE=1`: force the 128-bit engine (x86_64)
/// - `FERROUS_LANES_FORCE_AVX2=1`: force the 256-bit engine, skip AVX-512
pub fn detect_optimal_simd_engine() -> SimdEngineType {
    if env_flag("FERROUS_LANES_FORCE_SCALAR") {
        log::info!("FERROUS_LANES_FORCE_SCALAR=1: Using scalar bit permutation");
        return SimdEngineType::Scalar;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if env_flag("FERROUS_LANES_FORCE_SSE") {
            log::info!("FERROUS_LANES_FORCE_SSE=1: Using SSE (128-bit) engine");
            return SimdEngineType::Engine128;
        }

        #[cfg(feature = "avx512")]
        {
            let force_avx2 = env_flag("FERROUS_LANES_FORCE_AVX2");
            if !force_avx2 && is_x86_feature_detected!("avx512f") {
                return SimdEngineType::Engine512;
            }
            if force_avx2 {
                log::info!("FERROUS_LANES_FORCE_AVX2=1: Using AVX2 (256-bit) engine");
            }
        }

        if is_x86_feature_detected!("avx2") {
            return SimdEngineType::Engine256;
        }

        // SSE2 is part of the x86_64 baseline
        SimdEngineType::Engine128
    }

    #[cfg(target_arch = "aarch64")]
    {
        SimdEngineType::Engine128
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        SimdEngineType::Scalar
    }
}

lazy_static! {
    static ref DETECTED_ENGINE: SimdEngineType = {
        let engine = detect_optimal_simd_engine();
        log::debug!("Detected SIMD engine: {}", simd_engine_description(engine));
        engine
    };
    static ref HAS_BMI2: bool = detect_bmi2();
}

/// The engine chosen by [`detect_optimal_simd_engine`], probed once.
pub fn detected_engine() -> SimdEngineType {
    *DETECTED_ENGINE
}

fn detect_bmi2() -> bool {
    if env_flag("FERROUS_LANES_FORCE_SCALAR") {
        return false;
    }
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("bmi2")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// Whether `PEXT`/`PDEP` are available, probed once.
pub fn has_bmi2() -> bool {
    *HAS_BMI2
}

/// Every engine the current CPU can run, narrowest first.
pub fn available_engines() -> Vec<SimdEngineType> {
    let mut engines = vec![SimdEngineType::Scalar];
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    engines.push(SimdEngineType::Engine128);
    #[cfg(target_arch = "x86_64")]
    if is_x86_feature_detected!("avx2") {
        engines.push(SimdEngineType::Engine256);
    }
    #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
    if is_x86_feature_detected!("avx512f") {
        engines.push(SimdEngineType::Engine512);
    }
    engines
}

/// Returns a human-readable description of the SIMD engine
pub fn simd_engine_description(engine: SimdEngineType) -> &'static str {
    match engine {
        SimdEngineType::Scalar => "Scalar (64-bit words, no SIMD)",
        SimdEngineType::Engine128 => {
            #[cfg(target_arch = "x86_64")]
            {
                "SSE2 (128-bit, 4 x u32 / 2 x u64)"
            }
            #[cfg(not(target_arch = "x86_64"))]
            {
                "NEON (128-bit, 4 x u32 / 2 x u64)"
            }
        }
        #[cfg(target_arch = "x86_64")]
        SimdEngineType::Engine256 => "AVX2 (256-bit, 8 x u32 / 4 x u64)",
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        SimdEngineType::Engine512 => "AVX-512 (512-bit, 16 x u32 / 8 x u64)",
    }
}

/// Register width in bits for the engine (64 for the scalar word loop).
pub fn simd_engine_bits(engine: SimdEngineType) -> usize {
    match engine {
        SimdEngineType::Scalar => 64,
        SimdEngineType::Engine128 => 128,
        #[cfg(target_arch = "x86_64")]
        SimdEngineType::Engine256 => 256,
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        SimdEngineType::Engine512 => 512,
    }
}

/// Returns (32-bit lanes, 64-bit lanes) per register for the engine.
pub fn simd_lane_counts(engine: SimdEngineType) -> (usize, usize) {
    let bits = simd_engine_bits(engine);
    (bits / 32, bits / 64)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test runtime SIMD engine detection
    #[test]
    fn test_simd_engine_detection() {
        let engine = detect_optimal_simd_engine();
        let description = simd_engine_description(engine);

        println!("Detected SIMD engine: {:?}", engine);
        println!("Description: {}", description);

        if env_flag("FERROUS_LANES_FORCE_SCALAR") {
            assert_eq!(engine, SimdEngineType::Scalar);
            return;
        }

        #[cfg(target_arch = "x86_64")]
        {
            if env_flag("FERROUS_LANES_FORCE_SSE") {
                assert_eq!(engine, SimdEngineType::Engine128);
            } else if is_x86_feature_detected!("avx512f")
                && cfg!(feature = "avx512")
                && !env_flag("FERROUS_LANES_FORCE_AVX2")
            {
                assert_eq!(simd_engine_bits(engine), 512);
            } else if is_x86_feature_detected!("avx2") {
                assert_eq!(simd_engine_bits(engine), 256);
            } else {
                assert_eq!(engine, SimdEngineType::Engine128);
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            assert_eq!(engine, SimdEngineType::Engine128);
        }
    }

    #[test]
    fn test_detected_engine_is_available() {
        let engines = available_engines();
        assert_eq!(engines[0], SimdEngineType::Scalar);
        assert!(engines.contains(&detected_engine()));
    }

    #[test]
    fn test_lane_counts() {
        assert_eq!(simd_lane_counts(SimdEngineType::Scalar), (2, 1));
        assert_eq!(simd_lane_counts(SimdEngineType::Engine128), (4, 2));
    }
}
