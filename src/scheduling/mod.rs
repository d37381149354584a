//! This module takes care of scheduling the filtering work, encapsulating use
//! of multiple threads and anything else that will come in the future

#[cfg(feature = "multi-threading")] mod multi_threading;
#[cfg(not(feature = "multi-threading"))] mod sequential;

use crate::{event::Event, resacc::ResultsAccumulator};

/// Size of the processed event batches
///
/// Events are grouped in batches of a certain size so that the scheduling
/// overhead of a batch is small with respect to the filtering work, while
/// keeping enough batches around to feed all CPU cores.
///
const EVENT_BATCH_SIZE: usize = 10_000;

/// Run the filter in the manner that was configured at build time.
///
/// Takes as parameters the events to be filtered, and a kernel that filters a
/// batch of events and returns the accumulated results for that batch.
///
/// Returns the results of all batches, merged in input order.
///
pub fn run_filter(
    events: &[Event],
    filter_events: impl Send + Sync + Fn(&[Event]) -> ResultsAccumulator,
) -> ResultsAccumulator {
    // Nothing to do, but the results are still well-defined
    if events.is_empty() {
        return ResultsAccumulator::new();
    }

    // ...in sequential mode
    #[cfg(not(feature = "multi-threading"))]
    {
        sequential::run_filter_impl(events, filter_events)
    }

    // ...in multi-threaded mode
    #[cfg(feature = "multi-threading")]
    {
        multi_threading::run_filter_impl(events, filter_events)
    }
}
