//! This module allows integrating filter results across processed events

use crate::{
    config::Configuration,
    event::{Event, EventId, PairCandidate},
    filter::FilterOutcome,
    numeric::Float,
    resfin::FinalResults,
};

/// Record of an event which was kept by the filter
#[derive(Clone, Debug, PartialEq)]
pub struct EventRecord {
    /// Identity of the event
    pub id: EventId,

    /// Pairs which passed the mass window, with their missing 4-momentum
    pub retained: Vec<PairCandidate>,

    /// Truth that the event was only kept as part of the prescaled sample
    pub prescaled: bool,
}

/// This struct will accumulate intermediary results while events are being
/// filtered, and ultimately compute the final results (see FinalResults).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultsAccumulator {
    /// Kept events, in processing order
    records: Vec<EventRecord>,

    /// Number of processed events
    events: usize,

    /// Number of kept events
    accepted: usize,

    /// Number of kept events without any selected pair
    prescaled: usize,

    /// Number of events whose pair collection was missing
    missing_input: usize,

    /// Number of pairs seen by the filter
    pairs: usize,

    /// Number of pairs inside the mass window
    retained_pairs: usize,

    /// Number of pairs with an unphysical missing mass
    unphysical_pairs: usize,
}
//
impl ResultsAccumulator {
    /// Prepare for results integration
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate the filter outcome of one event into the results
    pub fn integrate(&mut self, event: &Event, outcome: FilterOutcome) {
        self.events += 1;
        self.pairs += event.pairs().map_or(0, <[_]>::len);
        self.retained_pairs += outcome.retained.len();
        self.unphysical_pairs += outcome.unphysical;
        if outcome.missing_input {
            self.missing_input += 1;
        }
        if outcome.accepted {
            let prescaled = outcome.prescaled();
            self.accepted += 1;
            if prescaled {
                self.prescaled += 1;
            }
            self.records.push(EventRecord {
                id: event.id,
                retained: outcome.retained,
                prescaled,
            });
        }
    }

    /// Integrate results from another ResultsAccumulator, which covers events
    /// that come after the ones already integrated
    pub fn merge(&mut self, other: Self) {
        self.records.extend(other.records);
        self.events += other.events;
        self.accepted += other.accepted;
        self.prescaled += other.prescaled;
        self.missing_input += other.missing_input;
        self.pairs += other.pairs;
        self.retained_pairs += other.retained_pairs;
        self.unphysical_pairs += other.unphysical_pairs;
    }

    /// Number of events integrated so far
    pub fn num_events(&self) -> usize {
        self.events
    }

    /// Kept events integrated so far
    pub fn records(&self) -> &[EventRecord] {
        &self.records[..]
    }

    /// Turn integrated filter data into finalized results
    ///
    /// `empty_events` is the number of events which went through the prescale
    /// gate without a selected pair, as counted by the gate itself.
    ///
    pub fn finalize(self, cfg: &Configuration, empty_events: u64) -> FinalResults<'_> {
        // Fractions are undefined without a denominator, report them as zero
        let fraction = |num: usize, denom: usize| match denom {
            0 => 0.,
            d => num as Float / d as Float,
        };
        let acceptance = fraction(self.accepted, self.events);
        let pair_efficiency = fraction(self.retained_pairs, self.pairs);
        let prescale_fraction = fraction(self.prescaled, empty_events as usize);

        FinalResults {
            events: self.events,
            accepted: self.accepted,
            prescaled: self.prescaled,
            missing_input: self.missing_input,
            empty_events,
            pairs: self.pairs,
            retained_pairs: self.retained_pairs,
            unphysical_pairs: self.unphysical_pairs,
            acceptance,
            pair_efficiency,
            prescale_fraction,
            records: self.records,
            cfg,
        }
    }
}
