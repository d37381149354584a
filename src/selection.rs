//! Mechanism to select the pairs of an event by their missing mass

use crate::{
    event::PairCandidate,
    momentum::{at_rest, MassConvention, Momentum},
    numeric::Float,
    reconstruct::reconstruct,
};

/// Open interval of accepted missing masses
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassWindow {
    /// Lower bound (excluded)
    pub min: Float,

    /// Upper bound (excluded)
    pub max: Float,
}
//
impl MassWindow {
    /// Setup a mass window
    pub fn new(min: Float, max: Float) -> Self {
        Self { min, max }
    }

    /// Truth that a mass is strictly inside the window. NaN never is.
    pub fn contains(&self, mass: Float) -> bool {
        mass > self.min && mass < self.max
    }
}

/// Pairs of an event that passed the mass window
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Retained pairs, with their momentum replaced by the reconstructed one
    pub retained: Vec<PairCandidate>,

    /// Number of input pairs which had an unphysical missing mass
    pub unphysical: usize,
}

/// Selector of pairs whose missing mass falls inside a window
#[derive(Clone, Debug)]
pub struct PairSelector {
    /// Accepted missing mass range
    pub window: MassWindow,

    /// Target particle, at rest
    target: Momentum,

    /// Convention for the mass of space-like 4-vectors
    convention: MassConvention,
}
//
impl PairSelector {
    /// Setup pair selection against a target of mass `target_mass`
    pub fn new(window: MassWindow, target_mass: Float, convention: MassConvention) -> Self {
        Self {
            window,
            target: at_rest(target_mass),
            convention,
        }
    }

    /// Target 4-momentum subtracted from every pair
    pub fn target(&self) -> &Momentum {
        &self.target
    }

    /// Select the pairs of an event, preserving their order
    pub fn select(&self, pairs: &[PairCandidate]) -> Selection {
        let mut selection = Selection::default();
        for pair in pairs {
            let rec = reconstruct(
                &pair.daughter(0).p4,
                &pair.daughter(1).p4,
                &self.target,
                self.convention,
            );

            // Catches both NaN and negative masses from the signed convention
            if !(rec.mass >= 0.) {
                tracing::debug!(mass = rec.mass, "Unphysical missing mass");
                selection.unphysical += 1;
            }

            if self.window.contains(rec.mass) {
                selection.retained.push(pair.with_momentum(rec.combined));
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event::tests::pair, momentum::invariant_mass};
    use approx::assert_relative_eq;

    /// Pair of two daughters at rest, whose invariant mass is m1 + m2
    fn pair_of_mass(m1: Float, m2: Float) -> PairCandidate {
        pair([0., 0., 0., m1], [0., 0., 0., m2])
    }

    /// Pair whose missing mass is unphysical against a massive target
    fn space_like_pair() -> PairCandidate {
        pair([1., 0., 0., 1.5], [0., 1., 0., 1.5])
    }

    #[test]
    fn window_is_strict() {
        let window = MassWindow::new(1., 2.);
        assert!(!window.contains(1.));
        assert!(!window.contains(2.));
        assert!(window.contains(1. + 1e-9));
        assert!(window.contains(2. - 1e-9));
        assert!(!window.contains(0.5));
        assert!(!window.contains(Float::NAN));
    }

    #[test]
    fn nan_fails_infinite_window() {
        let window = MassWindow::new(Float::NEG_INFINITY, Float::INFINITY);
        assert!(window.contains(-1e300));
        assert!(!window.contains(Float::NAN));
    }

    #[test]
    fn boundary_masses_are_excluded() {
        let selector = PairSelector::new(MassWindow::new(1., 2.), 0., MassConvention::Nan);
        let pairs = [
            pair_of_mass(0.5, 0.5),
            pair_of_mass(1., 1.),
            pair_of_mass(0.5, 0.5 + 1e-6),
        ];
        let selection = selector.select(&pairs);
        assert_eq!(selection.retained.len(), 1);
        assert_relative_eq!(
            invariant_mass(selection.retained[0].p4()),
            1. + 1e-6,
            epsilon = 1e-12
        );
    }

    #[test]
    fn selection_is_stable() {
        let selector = PairSelector::new(MassWindow::new(1., 2.), 0., MassConvention::Nan);
        let pairs = [
            pair_of_mass(0.8, 0.7),
            pair_of_mass(0.2, 0.2),
            pair_of_mass(0.6, 0.6),
            pair_of_mass(1.5, 1.5),
            pair_of_mass(0.6, 0.6),
        ];
        let selection = selector.select(&pairs);
        let expected = [&pairs[0], &pairs[2], &pairs[4]];
        assert_eq!(selection.retained.len(), expected.len());
        for (kept, input) in selection.retained.iter().zip(expected) {
            assert_eq!(kept.vertex, input.vertex);
            assert_eq!(kept.daughter(0), input.daughter(0));
            assert_eq!(kept.daughter(1), input.daughter(1));
        }
        assert_eq!(selection.unphysical, 0);
    }

    #[test]
    fn retained_pairs_carry_missing_momentum() {
        let selector = PairSelector::new(
            MassWindow::new(Float::NEG_INFINITY, Float::INFINITY),
            0.939565,
            MassConvention::Nan,
        );
        let input = pair([0.8, -0.3, 0.5, 1.4916], [-0.2, 0.6, 0.4, 0.8987]);
        let selection = selector.select(std::slice::from_ref(&input));
        assert_eq!(selection.retained.len(), 1);
        let kept = &selection.retained[0];
        assert_eq!(*kept.p4(), input.p4() - selector.target());
        assert_eq!(kept.daughter(0), input.daughter(0));
    }

    #[test]
    fn unphysical_pairs_are_dropped() {
        let window = MassWindow::new(Float::NEG_INFINITY, Float::INFINITY);
        let pairs = [space_like_pair(), pair_of_mass(2., 2.)];

        let selector = PairSelector::new(window, 2.5, MassConvention::Nan);
        let selection = selector.select(&pairs);
        assert_eq!(selection.retained.len(), 1);
        assert_eq!(selection.unphysical, 1);

        // A signed mass is a number, so an unbounded window keeps it
        let selector = PairSelector::new(window, 2.5, MassConvention::SignedRoot);
        let selection = selector.select(&pairs);
        assert_eq!(selection.retained.len(), 2);
        assert_eq!(selection.unphysical, 1);
    }

    #[test]
    fn signed_masses_fail_positive_windows() {
        let selector = PairSelector::new(MassWindow::new(0., 10.), 2.5, MassConvention::SignedRoot);
        let selection = selector.select(&[space_like_pair()]);
        assert!(selection.retained.is_empty());
        assert_eq!(selection.unphysical, 1);
    }
}
