//! One-step temporal difference backup.

use crate::{
    Result,
    q_learning::{masks::ActionMaskRegistry, q_table::QTable},
    state::StateKey,
};

/// Result of a single learning call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LearnOutcome {
    /// Previous and next state were identical, nothing was learned
    Skipped,
    /// The Q-value of the previous state-action pair moved from `before` to `after`
    Updated { target: f64, before: f64, after: f64 },
}

/// TD(0) update rule
///
/// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
///
/// The maximum only runs over the actions not excluded at `s'`. A terminal
/// `s'` contributes no future value, so the target is the reward alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdUpdate {
    learning_rate: f64,
    discount_factor: f64,
}

impl TdUpdate {
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            learning_rate,
            discount_factor,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Apply one backup for the transition `state --action/reward--> next_state`.
    ///
    /// `state` must already be registered. `next_state` is registered on
    /// demand unless it is the terminal sentinel.
    pub fn apply(
        &self,
        table: &mut QTable,
        masks: &ActionMaskRegistry,
        state: &StateKey,
        action: usize,
        reward: f64,
        next_state: &StateKey,
    ) -> Result<LearnOutcome> {
        if state == next_state {
            return Ok(LearnOutcome::Skipped);
        }

        let predicted = table.get_index(state, action)?;

        let target = if next_state.is_terminal() {
            reward
        } else {
            table.ensure_state(next_state);
            let allowed = masks.allowed_indices(next_state, table.actions());
            reward + self.discount_factor * table.best_value_index(next_state, &allowed)?
        };

        let updated = predicted + self.learning_rate * (target - predicted);
        table.set_index(state, action, updated)?;

        Ok(LearnOutcome::Updated {
            target,
            before: predicted,
            after: updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, ActionSet};

    fn setup() -> (QTable, ActionMaskRegistry, StateKey, StateKey) {
        let mut table = QTable::new(ActionSet::new(["a", "b", "c"]).unwrap());
        let s = StateKey::from((0, 0));
        let next = StateKey::from((0, 1));
        table.ensure_state(&s);
        (table, ActionMaskRegistry::new(), s, next)
    }

    #[test]
    fn test_same_state_is_skipped() {
        let (mut table, masks, s, _) = setup();
        table.set(&s, "a", 0.7).unwrap();
        let update = TdUpdate::new(0.5, 0.9);

        let outcome = update.apply(&mut table, &masks, &s, 0, 10.0, &s).unwrap();
        assert_eq!(outcome, LearnOutcome::Skipped);
        assert_eq!(table.get(&s, "a").unwrap(), 0.7);
    }

    #[test]
    fn test_terminal_update_uses_reward_only() {
        let (mut table, masks, s, _) = setup();
        table.set(&s, "b", 0.2).unwrap();
        let update = TdUpdate::new(0.5, 0.9);

        update
            .apply(&mut table, &masks, &s, 1, 1.0, &StateKey::Terminal)
            .unwrap();
        assert_eq!(table.get(&s, "b").unwrap(), 0.2 + 0.5 * (1.0 - 0.2));
        assert!(!table.contains(&StateKey::Terminal));
    }

    #[test]
    fn test_bootstrap_registers_next_state() {
        let (mut table, masks, s, next) = setup();
        let update = TdUpdate::new(0.5, 0.9);

        update.apply(&mut table, &masks, &s, 0, 1.0, &next).unwrap();
        assert!(table.contains(&next));
        assert_eq!(table.get(&s, "a").unwrap(), 0.5);
    }

    #[test]
    fn test_bootstrap_skips_masked_actions() {
        let (mut table, mut masks, s, next) = setup();
        table.ensure_state(&next);
        table.set(&next, "a", 2.0).unwrap();
        table.set(&next, "b", 1.0).unwrap();
        masks.set_exclusions(&next, [Action::new("a")]);
        let update = TdUpdate::new(0.5, 0.9);

        update.apply(&mut table, &masks, &s, 2, 0.0, &next).unwrap();
        assert_eq!(table.get(&s, "c").unwrap(), 0.5 * 0.9 * 1.0);
        assert_eq!(table.get(&next, "a").unwrap(), 2.0);
    }

    #[test]
    fn test_unknown_previous_state_fails_without_side_effects() {
        let (mut table, masks, _, next) = setup();
        let update = TdUpdate::new(0.5, 0.9);
        let stranger = StateKey::from((7, 7));

        assert!(update.apply(&mut table, &masks, &stranger, 0, 1.0, &next).is_err());
        assert!(!table.contains(&next));
    }
}
