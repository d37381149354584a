//! This module defines the properties and storage of filtered events

use crate::{momentum::Momentum, numeric::Float};
use nalgebra::Vector3;
use std::fmt::Display;

/// Number of daughters in a pair candidate
pub const NUM_DAUGHTERS: usize = 2;

/// One of the two decay-vertex candidates a pair is built from
#[derive(Clone, Debug, PartialEq)]
pub struct Daughter {
    /// Index of this candidate in its upstream collection
    pub index: usize,

    /// 4-momentum of the candidate
    pub p4: Momentum,
}

/// Pair of decay-vertex candidates, as produced by the upstream vertex fit
///
/// Only the top-level 4-momentum is ever modified by the filter. Daughters
/// and vertex fit information are passed through untouched.
///
#[derive(Clone, Debug, PartialEq)]
pub struct PairCandidate {
    /// Combined 4-momentum of the pair
    p4: Momentum,

    /// Position of the fitted pair vertex
    pub vertex: Vector3<Float>,

    /// Chi-square of the vertex fit
    pub vertex_chi2: Float,

    /// Degrees of freedom of the vertex fit
    pub vertex_ndof: Float,

    /// The two daughters
    daughters: [Daughter; NUM_DAUGHTERS],
}
//
impl PairCandidate {
    /// Build a pair from its daughters, using their sum as the pair momentum
    pub fn new(
        vertex: Vector3<Float>,
        vertex_chi2: Float,
        vertex_ndof: Float,
        daughters: [Daughter; NUM_DAUGHTERS],
    ) -> Self {
        Self {
            p4: daughters[0].p4 + daughters[1].p4,
            vertex,
            vertex_chi2,
            vertex_ndof,
            daughters,
        }
    }

    /// Top-level 4-momentum of the pair
    pub fn p4(&self) -> &Momentum {
        &self.p4
    }

    /// Access one of the daughters
    pub fn daughter(&self, idx: usize) -> &Daughter {
        &self.daughters[idx]
    }

    /// Clone this pair, replacing only its top-level 4-momentum
    pub fn with_momentum(&self, p4: Momentum) -> Self {
        Self {
            p4,
            ..self.clone()
        }
    }
}

/// Identity of an event within the recorded data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventId {
    /// Run number
    pub run: u32,

    /// Luminosity block number
    pub lumi: u32,

    /// Event number
    pub event: u64,
}
//
impl Display for EventId {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "{}:{}:{}", self.run, self.lumi, self.event)
    }
}

/// Storage for one event's input to the filter
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Event identity
    pub id: EventId,

    /// Pair collection, or None if upstream did not provide it
    pub pairs: Option<Vec<PairCandidate>>,
}
//
impl Event {
    /// Build an event from its identity and pair collection
    pub fn new(id: EventId, pairs: Option<Vec<PairCandidate>>) -> Self {
        Self { id, pairs }
    }

    /// Access the pair collection, if it is available
    pub fn pairs(&self) -> Option<&[PairCandidate]> {
        self.pairs.as_deref()
    }
}
