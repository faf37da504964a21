//! Shape and species registry.
//!
//! A species is the (element kind, shape) pair that fixes a vector's lane
//! count. All 28 species are built once, on first use, into a process-wide
//! table and handed out as `&'static Species`.

use std::fmt;

use lazy_static::lazy_static;

use crate::compute::simd_abstraction::simd::{detected_engine, SimdEngineType};
use crate::error::{LaneError, Result};
use crate::lanes::element::ElementKind;

/// Total register width of a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VectorShape {
    S64,
    S128,
    S256,
    S512,
}

impl VectorShape {
    pub const ALL: [VectorShape; 4] = [
        VectorShape::S64,
        VectorShape::S128,
        VectorShape::S256,
        VectorShape::S512,
    ];

    pub const fn bits(self) -> usize {
        match self {
            VectorShape::S64 => 64,
            VectorShape::S128 => 128,
            VectorShape::S256 => 256,
            VectorShape::S512 => 512,
        }
    }

    pub const fn for_bits(bits: usize) -> Option<VectorShape> {
        match bits {
            64 => Some(VectorShape::S64),
            128 => Some(VectorShape::S128),
            256 => Some(VectorShape::S256),
            512 => Some(VectorShape::S512),
            _ => None,
        }
    }

    /// Widest shape the detected SIMD engine executes natively.
    pub fn preferred() -> VectorShape {
        *PREFERRED_SHAPE
    }

    fn for_engine(engine: SimdEngineType) -> VectorShape {
        match engine {
            SimdEngineType::Scalar => VectorShape::S64,
            SimdEngineType::Engine128 => VectorShape::S128,
            #[cfg(target_arch = "x86_64")]
            SimdEngineType::Engine256 => VectorShape::S256,
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            SimdEngineType::Engine512 => VectorShape::S512,
        }
    }
}

impl fmt::Display for VectorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S_{}_BIT", self.bits())
    }
}

/// Shape of a vector of `lanes` elements of `element_bits` bits each.
///
/// Panics when the product is not a supported register width. Called from
/// associated consts so an invalid `Vector<E, N>` fails at compile time.
pub(crate) const fn shape_of(element_bits: usize, lanes: usize) -> VectorShape {
    match VectorShape::for_bits(element_bits * lanes) {
        Some(shape) => shape,
        None => panic!("lane count times element width must be 64, 128, 256 or 512 bits"),
    }
}

/// Immutable (element kind, shape) descriptor.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Species {
    kind: ElementKind,
    shape: VectorShape,
    lane_count: usize,
}

lazy_static! {
    static ref SPECIES_TABLE: Vec<Species> = {
        let mut table = Vec::with_capacity(ElementKind::ALL.len() * VectorShape::ALL.len());
        for kind in ElementKind::ALL {
            for shape in VectorShape::ALL {
                table.push(Species {
                    kind,
                    shape,
                    lane_count: shape.bits() / kind.bits(),
                });
            }
        }
        table
    };
    static ref PREFERRED_SHAPE: VectorShape = {
        let shape = VectorShape::for_engine(detected_engine());
        log::debug!("Preferred vector shape: {}", shape);
        shape
    };
}

impl Species {
    /// Canonical species for an element kind and shape.
    pub fn of(kind: ElementKind, shape: VectorShape) -> &'static Species {
        &SPECIES_TABLE[kind as usize * VectorShape::ALL.len() + shape as usize]
    }

    /// Species with the preferred shape for `kind`.
    pub fn preferred(kind: ElementKind) -> &'static Species {
        Species::of(kind, VectorShape::preferred())
    }

    pub fn for_lane_count(kind: ElementKind, lanes: usize) -> Result<&'static Species> {
        VectorShape::for_bits(kind.bits() * lanes)
            .map(|shape| Species::of(kind, shape))
            .ok_or_else(|| {
                LaneError::InvalidArgument(format!(
                    "no {} species with {} lanes",
                    kind, lanes
                ))
            })
    }

    pub fn all() -> &'static [Species] {
        &SPECIES_TABLE
    }

    pub fn element_kind(&self) -> ElementKind {
        self.kind
    }

    pub fn shape(&self) -> VectorShape {
        self.shape
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn element_bits(&self) -> usize {
        self.kind.bits()
    }

    pub fn vector_bits(&self) -> usize {
        self.shape.bits()
    }

    pub fn vector_bytes(&self) -> usize {
        self.shape.bits() / 8
    }

    /// Largest multiple of the lane count that is `<= length`.
    pub fn loop_bound(&self, length: usize) -> usize {
        length - length % self.lane_count
    }

    /// Lane bits of the tail mask: bit `i` is set when `offset + i < limit`.
    pub fn index_in_range(&self, offset: usize, limit: usize) -> u64 {
        let valid = limit.saturating_sub(offset).min(self.lane_count);
        if valid >= 64 {
            u64::MAX
        } else {
            (1u64 << valid) - 1
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Species[{}, {}, {}]", self.kind, self.lane_count, self.shape)
    }
}
