//! ε-greedy action selection.

use rand::{Rng, seq::IndexedRandom};

use crate::{Result, error::Error, q_learning::q_table::QTable, state::StateKey};

/// Which branch of the ε-greedy policy produced a choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Exploit,
    Explore,
}

/// ε-greedy policy where ε is the probability of exploiting
///
/// Ties between equally valued best actions are broken uniformly at random,
/// so freshly registered states (all zeros) do not favour the first action
/// of the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Pick one candidate index for `state`.
    ///
    /// # Errors
    ///
    /// [`Error::NoAvailableAction`] if `candidates` is empty, and
    /// [`Error::UnknownState`] if `state` has no row.
    pub fn select<R: Rng>(
        &self,
        table: &QTable,
        state: &StateKey,
        candidates: &[usize],
        rng: &mut R,
    ) -> Result<(usize, SelectionMode)> {
        if candidates.is_empty() {
            return Err(Error::NoAvailableAction {
                state: state.to_string(),
            });
        }
        let row = table.row(state)?;

        if rng.random::<f64>() < self.epsilon {
            let best = candidates
                .iter()
                .map(|&index| row[index])
                .fold(f64::NEG_INFINITY, f64::max);
            let tied: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&index| row[index] == best)
                .collect();
            let choice = *tied.choose(rng).unwrap_or(&candidates[0]);
            Ok((choice, SelectionMode::Exploit))
        } else {
            let choice = *candidates.choose(rng).unwrap_or(&candidates[0]);
            Ok((choice, SelectionMode::Explore))
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::actions::ActionSet;

    fn table_with(values: &[(&str, f64)]) -> (QTable, StateKey) {
        let names: Vec<&str> = values.iter().map(|(name, _)| *name).collect();
        let mut table = QTable::new(ActionSet::new(names).unwrap());
        let state = StateKey::from((0, 0));
        table.ensure_state(&state);
        for (name, value) in values {
            table.set(&state, name, *value).unwrap();
        }
        (table, state)
    }

    #[test]
    fn test_full_exploitation_picks_best() {
        let (table, state) = table_with(&[("a", 0.1), ("b", 0.9), ("c", 0.3)]);
        let policy = EpsilonGreedy::new(1.0);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            let (choice, mode) = policy.select(&table, &state, &[0, 1, 2], &mut rng).unwrap();
            assert_eq!(choice, 1);
            assert_eq!(mode, SelectionMode::Exploit);
        }
    }

    #[test]
    fn test_exploitation_respects_candidates() {
        let (table, state) = table_with(&[("a", 0.1), ("b", 0.9), ("c", 0.3)]);
        let policy = EpsilonGreedy::new(1.0);
        let mut rng = StdRng::seed_from_u64(4);

        let (choice, _) = policy.select(&table, &state, &[0, 2], &mut rng).unwrap();
        assert_eq!(choice, 2);
    }

    #[test]
    fn test_zero_epsilon_always_explores() {
        let (table, state) = table_with(&[("a", 5.0), ("b", 0.0)]);
        let policy = EpsilonGreedy::new(0.0);
        let mut rng = StdRng::seed_from_u64(5);

        let mut seen_b = false;
        for _ in 0..200 {
            let (choice, mode) = policy.select(&table, &state, &[0, 1], &mut rng).unwrap();
            assert_eq!(mode, SelectionMode::Explore);
            seen_b |= choice == 1;
        }
        assert!(seen_b, "exploration should reach the low-valued action");
    }

    #[test]
    fn test_ties_are_broken_uniformly() {
        let (table, state) = table_with(&[("a", 0.5), ("b", 0.5)]);
        let policy = EpsilonGreedy::new(1.0);
        let mut rng = StdRng::seed_from_u64(6);

        let trials = 4000;
        let mut first = 0;
        for _ in 0..trials {
            let (choice, _) = policy.select(&table, &state, &[0, 1], &mut rng).unwrap();
            if choice == 0 {
                first += 1;
            }
        }
        let share = first as f64 / trials as f64;
        assert!((share - 0.5).abs() < 0.05, "share of first action: {share}");
    }

    #[test]
    fn test_empty_candidates_is_an_error() {
        let (table, state) = table_with(&[("a", 0.0)]);
        let policy = EpsilonGreedy::new(0.9);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            policy.select(&table, &state, &[], &mut rng),
            Err(Error::NoAvailableAction { .. })
        ));
    }
}
