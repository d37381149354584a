//! Sequential back-end of the filter

use crate::{event::Event, resacc::ResultsAccumulator, scheduling::EVENT_BATCH_SIZE};

/// Filter events in sequential mode
///
/// We use batched logic even in sequential mode, so that the kernel sees the
/// same batches as in multi-threaded runs.
///
pub fn run_filter_impl(
    events: &[Event],
    filter_events: impl Send + Sync + Fn(&[Event]) -> ResultsAccumulator,
) -> ResultsAccumulator {
    // Some double-checking cannot hurt...
    assert!(!events.is_empty(), "Must filter at least one event");

    // Initialize the accumulator with the first batch of events
    let mut batches = events.chunks(EVENT_BATCH_SIZE);
    let mut accumulator = filter_events(batches.next().expect("Checked above"));

    // Filter and integrate the remaining batches (if any)
    for batch in batches {
        accumulator.merge(filter_events(batch));
    }

    // Return the final accumulated results
    accumulator
}
