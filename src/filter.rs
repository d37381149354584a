//! Event-level missing mass filter: pair selection followed by prescaling

use crate::{
    config::Configuration,
    event::{Event, PairCandidate},
    prescale::PrescaleGate,
    resacc::ResultsAccumulator,
    selection::{MassWindow, PairSelector},
};

/// What the filter decided for one event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOutcome {
    /// Pairs inside the mass window, with their missing 4-momentum
    pub retained: Vec<PairCandidate>,

    /// Truth that the event is kept
    pub accepted: bool,

    /// Number of pairs with an unphysical missing mass
    pub unphysical: usize,

    /// Truth that the event had no pair collection at all
    pub missing_input: bool,
}
//
impl FilterOutcome {
    /// Truth that the event was kept only as part of the prescaled sample
    pub fn prescaled(&self) -> bool {
        self.accepted && self.retained.is_empty()
    }
}

/// Missing mass filter, to be shared by every thread processing events
#[derive(Debug)]
pub struct MassFilter {
    /// Pair selection logic (stateless)
    selector: PairSelector,

    /// Prescaling of empty events (stateful)
    gate: PrescaleGate,

    /// Name of the pair collection, for diagnostics
    collection: String,
}
//
impl MassFilter {
    /// Setup the filter from the configuration
    pub fn new(cfg: &Configuration) -> Self {
        Self::from_parts(
            PairSelector::new(
                MassWindow::new(cfg.min_mass, cfg.max_mass),
                cfg.target_mass,
                cfg.mass_convention,
            ),
            PrescaleGate::new(cfg.prescale_false),
            cfg.collection.clone(),
        )
    }

    /// Assemble a filter from its components
    pub fn from_parts(selector: PairSelector, gate: PrescaleGate, collection: String) -> Self {
        tracing::debug!(
            window = ?selector.window,
            target_p4 = ?selector.target(),
            prescale = gate.factor(),
            "Mass filter set up"
        );
        Self {
            selector,
            gate,
            collection,
        }
    }

    /// Access the prescale gate
    pub fn gate(&self) -> &PrescaleGate {
        &self.gate
    }

    /// Filter one event's pair collection, which may be missing
    pub fn filter(&self, pairs: Option<&[PairCandidate]>) -> FilterOutcome {
        // A missing collection is not counted by the prescale gate
        let Some(pairs) = pairs else {
            tracing::warn!(collection = %self.collection, "Missing collection, skipping event");
            return FilterOutcome {
                missing_input: true,
                ..FilterOutcome::default()
            };
        };

        let selection = self.selector.select(pairs);
        let accepted = self.gate.admit(selection.retained.len());
        FilterOutcome {
            retained: selection.retained,
            accepted,
            unphysical: selection.unphysical,
            missing_input: false,
        }
    }

    /// Filter a batch of events and accumulate the outcomes
    pub fn filter_batch(&self, events: &[Event]) -> ResultsAccumulator {
        let mut results = ResultsAccumulator::new();
        for event in events {
            let _span = tracing::info_span!("event", id = %event.id).entered();
            let outcome = self.filter(event.pairs());
            results.integrate(event, outcome);
        }
        results
    }
}
