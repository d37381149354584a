//! Multi-threaded back-end of the filter

use crate::{event::Event, resacc::ResultsAccumulator, scheduling::EVENT_BATCH_SIZE};

use std::sync::Mutex;

/// Filter events in multi-threaded mode
///
/// Each batch of events is filtered by a separate rayon task. The prescale
/// gate is shared by all tasks, so which empty events get kept depends on
/// thread scheduling, but how many of them get kept does not.
///
pub fn run_filter_impl(
    events: &[Event],
    filter_events: impl Send + Sync + Fn(&[Event]) -> ResultsAccumulator,
) -> ResultsAccumulator {
    // Some double-checking cannot hurt...
    assert!(!events.is_empty(), "Must filter at least one event");

    // We know in advance how many batches of events we will process
    let num_batches = (events.len() + EVENT_BATCH_SIZE - 1) / EVENT_BATCH_SIZE;
    let accumulator = OrderedAccumulator::new(num_batches);

    // This function is a synchronization scope: it will only return
    // once all inner tasks have been executed
    rayon::scope(|scope| {
        // For each batch of events, spawn a task which is responsible for
        // filtering them
        for (batch_id, batch) in events.chunks(EVENT_BATCH_SIZE).enumerate() {
            let accumulator_ref = &accumulator;
            let filter_events_ref = &filter_events;
            scope.spawn(move |_| {
                let result = filter_events_ref(batch);
                accumulator_ref.set_task_result(batch_id, result);
            });
        }
    });

    // Extract the results from the accumulator
    accumulator.get_merged_result()
}

/// Results accumulation mechanism which preserves the input event order
struct OrderedAccumulator {
    /// Storage for the intermediary filter results of parallel tasks
    results: Box<[Mutex<Option<ResultsAccumulator>>]>,
}
//
impl OrderedAccumulator {
    /// Set up results storage for N parallel tasks
    fn new(num_tasks: usize) -> Self {
        assert!(num_tasks > 0, "There should be at least one task");
        Self {
            results: (0..num_tasks)
                .map(|_| Mutex::new(None))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        }
    }

    /// Integrate the results of the n-th filtering task
    fn set_task_result(&self, task_id: usize, result: ResultsAccumulator) {
        let mut lock = self.results[task_id]
            .lock()
            .expect("Mutex data should be valid");
        assert!(lock.is_none(), "Tasks should not report results twice");
        *lock = Some(result);
    }

    /// Aggregate the results in batch order
    fn get_merged_result(self) -> ResultsAccumulator {
        // Start iterating over the task results
        let mut results_iter = self.results.into_vec().into_iter().map(|entry| {
            entry
                .into_inner()
                .expect("Mutex data should be valid")
                .expect("Result should be ready")
        });

        // Initialize results storage with the result of the first task
        let first_result = results_iter
            .next()
            .expect("There should be at least one task");

        // Merge the results of the other tasks
        results_iter.fold(first_result, |mut r1, r2| {
            r1.merge(r2);
            r1
        })
    }
}
