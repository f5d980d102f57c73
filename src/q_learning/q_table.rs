//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use crate::{
    Result,
    actions::{Action, ActionSet},
    error::Error,
    state::StateKey,
};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Rows are sparse in states and dense in actions: registering a state
/// creates a value for every action of the vocabulary, starting at zero.
/// Rows are never removed. Lookups are strict, reading or writing a state
/// that was never registered fails with [`Error::UnknownState`].
#[derive(Debug, Clone)]
pub struct QTable {
    actions: ActionSet,
    /// Q-values: state -> value per action, indexed like `actions`
    rows: HashMap<StateKey, Vec<f64>>,
    /// Registration order, used for exports
    order: Vec<StateKey>,
}

impl QTable {
    /// Create an empty Q-table over a fixed action vocabulary
    pub fn new(actions: ActionSet) -> Self {
        Self {
            actions,
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    /// Register a state with a zero row if it is not present yet.
    ///
    /// Returns `true` when a new row was created. Registering a known state
    /// leaves its values untouched.
    pub fn ensure_state(&mut self, state: &StateKey) -> bool {
        if self.rows.contains_key(state) {
            return false;
        }
        self.rows
            .insert(state.clone(), vec![0.0; self.actions.len()]);
        self.order.push(state.clone());
        true
    }

    pub fn contains(&self, state: &StateKey) -> bool {
        self.rows.contains_key(state)
    }

    /// All values of a registered state, in vocabulary order
    pub fn row(&self, state: &StateKey) -> Result<&[f64]> {
        self.rows
            .get(state)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownState {
                state: state.to_string(),
            })
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &StateKey, action: &str) -> Result<f64> {
        let index = self.actions.require(action)?;
        self.get_index(state, index)
    }

    /// Set Q-value for a state-action pair of a registered state
    pub fn set(&mut self, state: &StateKey, action: &str, value: f64) -> Result<()> {
        let index = self.actions.require(action)?;
        self.set_index(state, index, value)
    }

    pub(crate) fn get_index(&self, state: &StateKey, index: usize) -> Result<f64> {
        Ok(self.row(state)?[index])
    }

    pub(crate) fn set_index(&mut self, state: &StateKey, index: usize, value: f64) -> Result<()> {
        let row = self
            .rows
            .get_mut(state)
            .ok_or_else(|| Error::UnknownState {
                state: state.to_string(),
            })?;
        row[index] = value;
        Ok(())
    }

    /// Maximum Q-value over the allowed actions of a state
    ///
    /// Allowed actions outside the vocabulary are ignored. When no allowed
    /// action remains there is no future value to take, so the result is 0.
    pub fn best_value<'a, I>(&self, state: &StateKey, allowed: I) -> Result<f64>
    where
        I: IntoIterator<Item = &'a Action>,
    {
        let indices: Vec<usize> = allowed
            .into_iter()
            .filter_map(|action| self.actions.index_of(action.as_str()))
            .collect();
        self.best_value_index(state, &indices)
    }

    pub(crate) fn best_value_index(&self, state: &StateKey, allowed: &[usize]) -> Result<f64> {
        let row = self.row(state)?;
        if allowed.is_empty() {
            return Ok(0.0);
        }
        Ok(allowed
            .iter()
            .map(|&index| row[index])
            .fold(f64::NEG_INFINITY, f64::max))
    }

    /// Registered states in registration order
    pub fn states(&self) -> impl Iterator<Item = &StateKey> {
        self.order.iter()
    }

    /// Number of registered states
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert a full row, replacing any previous values. Used when restoring.
    pub(crate) fn insert_row(&mut self, state: StateKey, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.actions.len());
        if !self.rows.contains_key(&state) {
            self.order.push(state.clone());
        }
        self.rows.insert(state, values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> QTable {
        QTable::new(ActionSet::new(["donothing", "trainscv", "buildsupply"]).unwrap())
    }

    #[test]
    fn test_qtable_initialization() {
        let mut qtable = table();
        let state = StateKey::from((0, 12, 0, 0));
        assert!(qtable.ensure_state(&state));
        for action in ["donothing", "trainscv", "buildsupply"] {
            assert_eq!(qtable.get(&state, action).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_ensure_state_is_idempotent() {
        let mut qtable = table();
        let state = StateKey::from((1, 2));
        qtable.ensure_state(&state);
        qtable.set(&state, "trainscv", 1.5).unwrap();

        assert!(!qtable.ensure_state(&state));
        assert_eq!(qtable.get(&state, "trainscv").unwrap(), 1.5);
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let mut qtable = table();
        let state = StateKey::from((9, 9));
        assert!(matches!(
            qtable.get(&state, "donothing"),
            Err(Error::UnknownState { .. })
        ));
        assert!(matches!(
            qtable.set(&state, "donothing", 1.0),
            Err(Error::UnknownState { .. })
        ));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let mut qtable = table();
        let state = StateKey::from((0, 0));
        qtable.ensure_state(&state);
        assert!(matches!(
            qtable.get(&state, "attack"),
            Err(Error::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_best_value() {
        let mut qtable = table();
        let state = StateKey::from((0, 1));
        qtable.ensure_state(&state);
        qtable.set(&state, "donothing", 0.5).unwrap();
        qtable.set(&state, "trainscv", 1.5).unwrap();
        qtable.set(&state, "buildsupply", -0.8).unwrap();

        let all: Vec<Action> = qtable.actions().iter().cloned().collect();
        assert_eq!(qtable.best_value(&state, &all).unwrap(), 1.5);

        let some = [Action::new("donothing"), Action::new("buildsupply")];
        assert_eq!(qtable.best_value(&state, &some).unwrap(), 0.5);
    }

    #[test]
    fn test_best_value_of_nothing_is_zero() {
        let mut qtable = table();
        let state = StateKey::from((0, 1));
        qtable.ensure_state(&state);
        qtable.set(&state, "donothing", -3.0).unwrap();

        assert_eq!(qtable.best_value(&state, &[]).unwrap(), 0.0);
        let foreign = [Action::new("attack")];
        assert_eq!(qtable.best_value(&state, &foreign).unwrap(), 0.0);
    }

    #[test]
    fn test_states_keep_registration_order() {
        let mut qtable = table();
        let a = StateKey::from((3,));
        let b = StateKey::from((1,));
        let c = StateKey::from((2,));
        for state in [&a, &b, &c, &a] {
            qtable.ensure_state(state);
        }
        let order: Vec<&StateKey> = qtable.states().collect();
        assert_eq!(order, vec![&a, &b, &c]);
    }
}
