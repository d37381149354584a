//! Prescaling of events which have no selected pair
//!
//! Keeping every p-th empty event gives downstream analyses an evenly spaced
//! control sample without storing all of them.

use std::sync::atomic::{AtomicU64, Ordering};

/// Event-level admission policy, shared by all threads processing events
#[derive(Debug, Default)]
pub struct PrescaleGate {
    /// Prescale factor for empty events, 0 means "reject them all"
    factor: u32,

    /// Number of empty events seen so far
    rejected: AtomicU64,
}
//
impl PrescaleGate {
    /// Setup a gate which keeps one in `factor` empty events
    pub fn new(factor: u32) -> Self {
        Self {
            factor,
            rejected: AtomicU64::new(0),
        }
    }

    /// Prescale factor of this gate
    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Decide whether an event with `surviving` selected pairs is kept
    ///
    /// Events with survivors are always kept and do not affect the gate. Each
    /// empty event is numbered by a single atomic increment, which gives it a
    /// unique occurrence number even under concurrent use, and is kept iff that
    /// number is a multiple of the prescale factor.
    ///
    pub fn admit(&self, surviving: usize) -> bool {
        if surviving > 0 {
            return true;
        }
        let occurrence = self.rejected.fetch_add(1, Ordering::Relaxed) + 1;
        match self.factor {
            0 => false,
            p => occurrence % u64::from(p) == 0,
        }
    }

    /// Number of empty events seen so far (for reporting only)
    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_third_empty_event() {
        let gate = PrescaleGate::new(3);
        let verdicts = (0..10).map(|_| gate.admit(0)).collect::<Vec<_>>();
        let admitted = verdicts
            .iter()
            .enumerate()
            .filter(|(_, kept)| **kept)
            .map(|(idx, _)| idx + 1)
            .collect::<Vec<_>>();
        assert_eq!(admitted, vec![3, 6, 9]);
        assert_eq!(gate.rejected_count(), 10);
    }

    #[test]
    fn disabled_prescale_rejects_everything() {
        let gate = PrescaleGate::new(0);
        assert!((0..1000).all(|_| !gate.admit(0)));
        assert_eq!(gate.rejected_count(), 1000);
    }

    #[test]
    fn unit_prescale_keeps_everything() {
        let gate = PrescaleGate::new(1);
        assert!((0..100).all(|_| gate.admit(0)));
    }

    #[test]
    fn survivors_do_not_advance_counter() {
        let gate = PrescaleGate::new(2);
        assert!(gate.admit(3));
        assert!(!gate.admit(0));
        assert!(gate.admit(1));
        assert!(gate.admit(1));
        assert_eq!(gate.rejected_count(), 1);
        // Second empty event, whatever happened in between
        assert!(gate.admit(0));
        assert_eq!(gate.rejected_count(), 2);
    }

    #[test]
    fn concurrent_admissions_are_exact() {
        const THREADS: usize = 8;
        const EVENTS_PER_THREAD: usize = 10_000;
        let gate = PrescaleGate::new(7);
        let admitted = std::thread::scope(|scope| {
            let handles = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        (0..EVENTS_PER_THREAD)
                            .filter(|&i| gate.admit(i % 2))
                            .count()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .sum::<usize>()
        });

        // Half the events have survivors, the other half is prescaled
        let empty = THREADS * EVENTS_PER_THREAD / 2;
        assert_eq!(gate.rejected_count(), empty as u64);
        assert_eq!(admitted, empty + empty / 7);
    }
}
