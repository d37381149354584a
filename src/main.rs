//! smass_filter: missing mass skim of decay-vertex candidate pairs
//!
//!
//! # Introduction (for the physicist)
//!
//! This small program is one filtering stage of a data reduction chain. Each
//! event comes with a collection of pairs of decay-vertex candidates (say, a
//! Lambda and a K-short). For each pair, we compute the "missing mass" with
//! respect to a fixed target particle at rest, that is, the mass of the
//! incoming particle that would have had to hit the target to produce the
//! pair. A massless target gives back the plain invariant mass of the pair.
//!
//! Pairs inside a configured mass window are kept, with their 4-momentum
//! replaced by the missing 4-momentum. Events with at least one such pair are
//! kept, and one in every N events without any is kept as a control sample.
//!
//!
//! # Introduction (for the computer guy)
//!
//! The program follows a simple pipeline:
//!
//! * read in and check the configuration
//! * read in the events
//! * filter them, in batches which may run on several threads
//! * sum up what happened
//! * then display / store the result.
//!
//! The only shared mutable state is the prescale counter, which is an atomic
//! integer hidden inside the PrescaleGate.

#![warn(missing_docs)]

mod config;
mod event;
mod filter;
mod input;
mod momentum;
mod numeric;
mod output;
mod prescale;
mod reconstruct;
mod resacc;
mod resfin;
mod scheduling;
mod selection;

use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use crate::{config::Configuration, filter::MassFilter};

use std::time::Instant;

/// We'll use eyre's type-erased result type throughout the application
type Result<T> = eyre::Result<T>;

/// Default location of the configuration file
const DEFAULT_CONFIG: &str = "smass.cfg";

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    // ### LOGGING ###

    // Log level comes from RUST_LOG, with a sensible default.
    // Logs go to stderr, stdout is for the run summary.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ### CONFIGURATION READOUT ###

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_owned());
    let cfg = Configuration::load(&config_path).wrap_err("Failed to load the configuration")?;

    // ### INPUT READOUT ###

    let events = input::load_events(&cfg.input_file).wrap_err("Failed to load the events")?;
    tracing::info!(events = events.len(), "Events loaded");

    // ### FILTER EXECUTION ###

    // We start the clock after I/O, to avoid IO-induced timing fluctuations
    let saved_time = Instant::now();

    // The filter is shared by all batches, and so is its prescale counter
    let filter = MassFilter::new(&cfg);
    let results = scheduling::run_filter(&events, |batch| filter.filter_batch(batch));

    // Measure how much time has elapsed
    let elapsed_time = saved_time.elapsed();
    tracing::info!(
        events = results.num_events(),
        kept = results.records().len(),
        "Filtering done"
    );

    // ### RESULTS DISPLAY AND STORAGE ###

    let res_fin = results.finalize(&cfg, filter.gate().rejected_count());
    output::dump_results(&res_fin, elapsed_time).wrap_err("Failed to output the results")?;

    // ...and we're done
    Ok(())
}
