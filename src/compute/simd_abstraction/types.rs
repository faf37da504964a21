//! SIMD type aliases and architecture bindings
//!
//! Lets the rest of `simd_abstraction` refer to `simd_arch` and `__m128i`
//! uniformly on x86_64 and aarch64.
//!
//! - On x86_64 `simd_arch` is `std::arch::x86_64` and `__m128i` is native.
//! - On aarch64 `simd_arch` is `std::arch::aarch64` and `__m128i` is a
//!   transparent wrapper over `uint32x4_t`. The helpers below reinterpret it
//!   as 64-bit lanes for the `epi64` shifts.

#[cfg(target_arch = "x86_64")]
pub(crate) use std::arch::x86_64 as simd_arch;

#[cfg(target_arch = "aarch64")]
pub(crate) use std::arch::aarch64 as simd_arch;

/// Type alias for `__m128i` on x86_64.
#[allow(non_camel_case_types)]
#[cfg(target_arch = "x86_64")]
pub type __m128i = simd_arch::__m128i;

/// Transparent `__m128i` wrapper on aarch64 (NEON), backed by `uint32x4_t`.
#[allow(non_camel_case_types)]
#[cfg(target_arch = "aarch64")]
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct __m128i(pub simd_arch::uint32x4_t);

#[cfg(target_arch = "aarch64")]
impl __m128i {
    /// View as unsigned 64-bit lanes.
    #[inline]
    pub fn as_u64(self) -> simd_arch::uint64x2_t {
        unsafe { simd_arch::vreinterpretq_u64_u32(self.0) }
    }

    /// Construct from unsigned 64-bit lanes by reinterpretation.
    #[inline]
    pub fn from_u64(v: simd_arch::uint64x2_t) -> Self {
        Self(unsafe { simd_arch::vreinterpretq_u32_u64(v) })
    }
}
