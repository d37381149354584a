//! This module contains everything that is needed to store and display the
//! final results of a filter run

use crate::{config::Configuration, numeric::Float, resacc::EventRecord};

use std::{fmt::Display, io::Write};

/// Final results of the filter run
pub struct FinalResults<'cfg> {
    /// Number of processed events
    pub events: usize,

    /// Number of kept events
    pub accepted: usize,

    /// Number of kept events without any selected pair
    pub prescaled: usize,

    /// Number of events whose pair collection was missing
    pub missing_input: usize,

    /// Number of events without selected pair seen by the prescale gate
    pub empty_events: u64,

    /// Number of pairs seen by the filter
    pub pairs: usize,

    /// Number of pairs inside the mass window
    pub retained_pairs: usize,

    /// Number of pairs with an unphysical missing mass
    pub unphysical_pairs: usize,

    /// Fraction of processed events which were kept
    pub acceptance: Float,

    /// Fraction of pairs which passed the mass window
    pub pair_efficiency: Float,

    /// Fraction of events without selected pair which were kept anyway
    pub prescale_fraction: Float,

    /// Kept events, in input order
    pub records: Vec<EventRecord>,

    /// Configuration of the run (for further derivation)
    pub cfg: &'cfg Configuration,
}
//
impl<'cfg> FinalResults<'cfg> {
    /// Write a human-readable summary of the run
    pub fn write_summary(&self, out: &mut impl Write) -> std::io::Result<()> {
        let cfg = self.cfg;
        write_entry(out, "Collection", &cfg.collection)?;
        write_entry(out, "Mass window (GeV)", format!("]{}, {}[", cfg.min_mass, cfg.max_mass))?;
        write_entry(out, "Target mass (GeV)", cfg.target_mass)?;
        write_entry(out, "Prescale of empty events", cfg.prescale_false)?;
        writeln!(out, " ---------------------------------------------")?;
        write_entry(out, "Events processed", self.events)?;
        write_entry(out, "... with missing collection", self.missing_input)?;
        write_entry(out, "... without selected pair", self.empty_events)?;
        write_entry(out, "Events kept", self.accepted)?;
        write_entry(out, "... by the prescale", self.prescaled)?;
        write_entry(out, "Acceptance", self.acceptance)?;
        write_entry(out, "Prescaled fraction", self.prescale_fraction)?;
        writeln!(out, " ---------------------------------------------")?;
        write_entry(out, "Pairs processed", self.pairs)?;
        write_entry(out, "... inside the mass window", self.retained_pairs)?;
        write_entry(out, "... with unphysical mass", self.unphysical_pairs)?;
        write_entry(out, "Pair efficiency", self.pair_efficiency)?;
        Ok(())
    }
}

/// Write one labeled value of the summary
pub fn write_entry(out: &mut impl Write, label: &str, value: impl Display) -> std::io::Result<()> {
    writeln!(out, " {:<32}: {}", label, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{momentum::MassConvention, resacc::ResultsAccumulator};

    fn configuration() -> Configuration {
        Configuration {
            input_file: "events.dat".into(),
            output_file: "skimmed.dat".into(),
            collection: "sParticles".to_owned(),
            min_mass: 1.,
            max_mass: 2.,
            target_mass: 0.,
            prescale_false: 2,
            mass_convention: MassConvention::Nan,
        }
    }

    #[test]
    fn empty_run_has_zero_fractions() {
        let cfg = configuration();
        let results = ResultsAccumulator::new().finalize(&cfg, 0);
        assert_eq!(results.events, 0);
        assert_eq!(results.acceptance, 0.);
        assert_eq!(results.pair_efficiency, 0.);
        assert_eq!(results.prescale_fraction, 0.);
    }

    #[test]
    fn summary_mentions_every_count() {
        let cfg = configuration();
        let mut results = ResultsAccumulator::new().finalize(&cfg, 4);
        results.events = 10;
        results.accepted = 7;
        results.prescaled = 2;
        results.acceptance = 0.7;
        let mut buffer = Vec::new();
        results.write_summary(&mut buffer).unwrap();
        let summary = String::from_utf8(buffer).unwrap();
        assert!(summary.contains("Events processed                : 10"));
        assert!(summary.contains("Events kept                     : 7"));
        assert!(summary.contains("... by the prescale             : 2"));
        assert!(summary.contains("... without selected pair       : 4"));
        assert!(summary.contains("Mass window (GeV)               : ]1, 2["));
        assert!(summary.contains("Acceptance                      : 0.7"));
    }
}
