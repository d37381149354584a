//! Missing mass reconstruction of a pair relative to a fixed target
//!
//! Subtracting the 4-momentum of a target particle at rest turns the invariant
//! mass of a pair into the mass of the particle that would have had to hit the
//! target to produce it. A massless target gives back the plain invariant mass
//! of the pair, so there is no separate code path for that case.

use crate::{
    momentum::{MassConvention, Momentum},
    numeric::Float,
};

/// Outcome of a missing mass reconstruction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reconstruction {
    /// daughter1 + daughter2 - target
    pub combined: Momentum,

    /// Invariant mass of `combined`, NaN or negative if unphysical
    pub mass: Float,
}

/// Reconstruct the missing mass of a pair of daughters with respect to a target
pub fn reconstruct(
    daughter1: &Momentum,
    daughter2: &Momentum,
    target: &Momentum,
    convention: MassConvention,
) -> Reconstruction {
    let combined = daughter1 + daughter2 - target;
    Reconstruction {
        combined,
        mass: convention.invariant_mass(&combined),
    }
}
