//! This module implements some domain-specific 4-momentum handling logic.

use crate::numeric::Float;
use nalgebra::SVector;
use prefix_num_ops::real::*;

/// 4-momentum dimension
pub const MOMENTUM_DIM: usize = 4;

/// Relativistic 4-momentum, stored as (px, py, pz, E)
pub type Momentum = SVector<Float, MOMENTUM_DIM>;

/// Convenience const for accessing the X coordinate of a 4-vector
pub const X: usize = 0;

/// Convenience const for accessing the Y coordinate of a 4-vector
pub const Y: usize = 1;

/// Convenience const for accessing the Z coordinate of a 4-vector
pub const Z: usize = 2;

/// Convenience const for accessing the E coordinate of a 4-vector
pub const E: usize = 3;

/// 4-momentum of a particle of a given mass, at rest in the lab frame
pub fn at_rest(mass: Float) -> Momentum {
    Momentum::new(0., 0., 0., mass)
}

/// Squared invariant mass, E² - |p|², which may be negative
pub fn mass_squared(p: &Momentum) -> Float {
    p[E] * p[E] - p.fixed_rows::<3>(X).norm_squared()
}

/// How the invariant mass of a space-like (unphysical) 4-vector is reported
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MassConvention {
    /// Square root of the negative radicand, i.e. NaN
    #[default]
    Nan,

    /// Minus the square root of the radicand's magnitude, -sqrt(|m²|)
    SignedRoot,
}
//
impl MassConvention {
    /// Invariant mass of a 4-momentum. Never clamps to zero.
    pub fn invariant_mass(self, p: &Momentum) -> Float {
        match self {
            Self::Nan => invariant_mass(p),
            Self::SignedRoot => {
                let m2 = mass_squared(p);
                if m2 < 0. {
                    -sqrt(-m2)
                } else {
                    sqrt(m2)
                }
            }
        }
    }

    /// Name of the convention, as used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            Self::Nan => "nan",
            Self::SignedRoot => "signed",
        }
    }
}
//
impl std::str::FromStr for MassConvention {
    type Err = eyre::Report;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.to_lowercase().as_str() {
            "nan" => Ok(Self::Nan),
            "signed" => Ok(Self::SignedRoot),
            other => Err(eyre::eyre!(
                "Unknown mass convention {:?} (expected \"nan\" or \"signed\")",
                other
            )),
        }
    }
}

/// Invariant mass, NaN for space-like 4-vectors
pub fn invariant_mass(p: &Momentum) -> Float {
    sqrt(mass_squared(p))
}
