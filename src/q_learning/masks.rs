//! Per-state action masks.
//!
//! Callers compute which actions are currently impossible (unaffordable,
//! capacity reached, ...) every time they visit a state. The registry keeps
//! the last such set per state so the same actions are left out both when
//! selecting at that state and when the state is bootstrapped from as a
//! next state. Masks never touch stored Q-values.

use std::collections::{BTreeSet, HashMap};

use crate::{
    actions::{Action, ActionSet},
    state::StateKey,
};

static NO_EXCLUSIONS: BTreeSet<Action> = BTreeSet::new();

/// Last known exclusion set per state
#[derive(Debug, Clone, Default)]
pub struct ActionMaskRegistry {
    exclusions: HashMap<StateKey, BTreeSet<Action>>,
}

impl ActionMaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the exclusion set of a state. Previous entries are not merged.
    pub fn set_exclusions<I>(&mut self, state: &StateKey, excluded: I)
    where
        I: IntoIterator<Item = Action>,
    {
        self.exclusions
            .insert(state.clone(), excluded.into_iter().collect());
    }

    /// Last exclusion set recorded for a state, empty if none was recorded
    pub fn exclusions_for(&self, state: &StateKey) -> &BTreeSet<Action> {
        self.exclusions.get(state).unwrap_or(&NO_EXCLUSIONS)
    }

    pub fn is_excluded(&self, state: &StateKey, action: &str) -> bool {
        self.exclusions_for(state).contains(action)
    }

    /// Vocabulary indices of the actions not excluded at `state`
    pub fn allowed_indices(&self, state: &StateKey, actions: &ActionSet) -> Vec<usize> {
        let excluded = self.exclusions_for(state);
        actions
            .iter()
            .enumerate()
            .filter(|(_, action)| !excluded.contains(*action))
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of states with a recorded exclusion set
    pub fn len(&self) -> usize {
        self.exclusions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exclusions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &BTreeSet<Action>)> {
        self.exclusions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions() -> ActionSet {
        ActionSet::new(["donothing", "trainscv", "buildsupply", "buildrefinery"]).unwrap()
    }

    #[test]
    fn test_absent_entry_means_nothing_excluded() {
        let registry = ActionMaskRegistry::new();
        let state = StateKey::from((0, 1));
        assert!(registry.exclusions_for(&state).is_empty());
        assert_eq!(registry.allowed_indices(&state, &actions()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_exclusions_are_overwritten() {
        let mut registry = ActionMaskRegistry::new();
        let state = StateKey::from((0, 1));

        registry.set_exclusions(&state, [Action::new("trainscv"), Action::new("buildsupply")]);
        assert_eq!(registry.allowed_indices(&state, &actions()), vec![0, 3]);

        registry.set_exclusions(&state, [Action::new("buildrefinery")]);
        assert!(!registry.is_excluded(&state, "trainscv"));
        assert!(registry.is_excluded(&state, "buildrefinery"));
        assert_eq!(registry.allowed_indices(&state, &actions()), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_set_clears_mask() {
        let mut registry = ActionMaskRegistry::new();
        let state = StateKey::from((2,));
        registry.set_exclusions(&state, [Action::new("trainscv")]);
        registry.set_exclusions(&state, []);
        assert!(registry.exclusions_for(&state).is_empty());
        assert_eq!(registry.len(), 1);
    }
}
