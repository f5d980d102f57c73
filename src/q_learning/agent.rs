//! Q-learning agent
//!
//! Owns the value table, the action mask registry and the random source,
//! and ties them together into the two calls a scripted agent makes every
//! decision step: [`QLearningAgent::choose_action`] and
//! [`QLearningAgent::learn`].

use std::collections::BTreeSet;

use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{
    Result,
    actions::{Action, ActionSet},
    config::QLearningConfig,
    error::Error,
    q_learning::{
        learning::{LearnOutcome, TdUpdate},
        masks::ActionMaskRegistry,
        policy::{EpsilonGreedy, SelectionMode},
        q_table::QTable,
    },
    state::StateKey,
};

/// Everything needed to rebuild an agent, without the live RNG.
#[derive(Debug, Clone)]
pub(crate) struct AgentState {
    pub config: QLearningConfig,
    pub q_table: QTable,
    pub masks: ActionMaskRegistry,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent with ε-greedy selection and action masking
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    config: QLearningConfig,
    q_table: QTable,
    masks: ActionMaskRegistry,
    policy: EpsilonGreedy,
    update: TdUpdate,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create an agent with an empty table over `actions`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a hyperparameter is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use athene::{ActionSet, QLearningAgent, QLearningConfig, StateKey};
    ///
    /// let actions = ActionSet::new(["donothing", "trainscv"])?;
    /// let mut agent = QLearningAgent::new(actions, QLearningConfig::default().with_seed(1))?;
    ///
    /// let state = StateKey::from((0, 12));
    /// let action = agent.choose_action(&state, None)?;
    /// agent.learn(&state, &action, 1.0, &StateKey::Terminal)?;
    /// # Ok::<(), athene::Error>(())
    /// ```
    pub fn new(actions: ActionSet, config: QLearningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_state(AgentState {
            config,
            q_table: QTable::new(actions),
            masks: ActionMaskRegistry::new(),
        }))
    }

    /// Agent with the default hyperparameters (α=0.01, γ=0.9, ε=0.9)
    pub fn with_defaults(actions: ActionSet) -> Self {
        Self::from_state(AgentState {
            config: QLearningConfig::default(),
            q_table: QTable::new(actions),
            masks: ActionMaskRegistry::new(),
        })
    }

    /// Reseed the random source for reproducible selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
        self
    }

    /// Choose an action for `state` with the ε-greedy policy.
    ///
    /// When `exclusions` is given it replaces the state's recorded mask
    /// before selection; otherwise every action is a candidate. The state is
    /// registered if it is new.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownAction`] if an exclusion is not in the vocabulary
    /// - [`Error::NoAvailableAction`] if the exclusions cover every action
    /// - [`Error::InvalidStateKey`] when asked to act in the terminal state
    pub fn choose_action(
        &mut self,
        state: &StateKey,
        exclusions: Option<&[Action]>,
    ) -> Result<Action> {
        if state.is_terminal() {
            return Err(Error::InvalidStateKey {
                input: state.to_string(),
                reason: "no action can be chosen in the terminal state".to_string(),
            });
        }
        if let Some(excluded) = exclusions {
            for action in excluded {
                self.q_table.actions().require(action.as_str())?;
            }
        }

        self.q_table.ensure_state(state);

        let candidates = match exclusions {
            Some(excluded) => {
                self.masks
                    .set_exclusions(state, excluded.iter().cloned());
                self.masks.allowed_indices(state, self.q_table.actions())
            }
            None => (0..self.q_table.actions().len()).collect(),
        };

        let (index, mode) = self
            .policy
            .select(&self.q_table, state, &candidates, &mut self.rng)?;
        let action = self.action_at(index)?;

        debug!(
            state = %state,
            action = %action,
            explored = matches!(mode, SelectionMode::Explore),
            candidates = candidates.len(),
            "selected action"
        );

        Ok(action)
    }

    /// Learn from the transition `state --action/reward--> next_state`.
    ///
    /// Identical states are skipped. A terminal `next_state` ends the
    /// episode: the reward becomes the target without bootstrapping.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownState`] if `state` was never registered and
    /// [`Error::UnknownAction`] if `action` is not in the vocabulary.
    pub fn learn(
        &mut self,
        state: &StateKey,
        action: &Action,
        reward: f64,
        next_state: &StateKey,
    ) -> Result<LearnOutcome> {
        let index = self.q_table.actions().require(action.as_str())?;
        let outcome = self.update.apply(
            &mut self.q_table,
            &self.masks,
            state,
            index,
            reward,
            next_state,
        )?;

        match outcome {
            LearnOutcome::Skipped => {
                debug!(state = %state, "state unchanged, nothing to learn");
            }
            LearnOutcome::Updated {
                target,
                before,
                after,
            } => {
                debug!(
                    state = %state,
                    action = %action,
                    next_state = %next_state,
                    reward,
                    target,
                    before,
                    after,
                    "updated Q-value"
                );
            }
        }

        Ok(outcome)
    }

    pub fn ensure_state(&mut self, state: &StateKey) -> bool {
        self.q_table.ensure_state(state)
    }

    pub fn get(&self, state: &StateKey, action: &str) -> Result<f64> {
        self.q_table.get(state, action)
    }

    pub fn set(&mut self, state: &StateKey, action: &str, value: f64) -> Result<()> {
        self.q_table.set(state, action, value)
    }

    pub fn best_value<'a, I>(&self, state: &StateKey, allowed: I) -> Result<f64>
    where
        I: IntoIterator<Item = &'a Action>,
    {
        self.q_table.best_value(state, allowed)
    }

    /// Record the exclusion set of a state without selecting.
    pub fn set_exclusions<I>(&mut self, state: &StateKey, excluded: I)
    where
        I: IntoIterator<Item = Action>,
    {
        self.masks.set_exclusions(state, excluded);
    }

    pub fn exclusions_for(&self, state: &StateKey) -> &BTreeSet<Action> {
        self.masks.exclusions_for(state)
    }

    /// Action with the highest stored value among the actions not excluded
    /// at `state`. Ties resolve to the earliest action of the vocabulary.
    pub fn greedy_action(&self, state: &StateKey) -> Result<Option<&Action>> {
        let row = self.q_table.row(state)?;
        let allowed = self.masks.allowed_indices(state, self.q_table.actions());
        let best = allowed
            .into_iter()
            .fold(None::<usize>, |best, index| match best {
                Some(current) if row[current] >= row[index] => Some(current),
                _ => Some(index),
            });
        Ok(best.and_then(|index| self.q_table.actions().get(index)))
    }

    pub fn actions(&self) -> &ActionSet {
        self.q_table.actions()
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn masks(&self) -> &ActionMaskRegistry {
        &self.masks
    }

    pub fn states(&self) -> impl Iterator<Item = &StateKey> {
        self.q_table.states()
    }

    /// Number of registered states
    pub fn state_count(&self) -> usize {
        self.q_table.len()
    }

    pub(crate) fn from_state(state: AgentState) -> Self {
        Self {
            policy: EpsilonGreedy::new(state.config.epsilon),
            update: TdUpdate::new(state.config.learning_rate, state.config.discount_factor),
            rng: build_rng(state.config.seed),
            config: state.config,
            q_table: state.q_table,
            masks: state.masks,
        }
    }

    fn action_at(&self, index: usize) -> Result<Action> {
        self.q_table
            .actions()
            .get(index)
            .cloned()
            .ok_or_else(|| Error::UnknownAction {
                action: format!("#{index}"),
            })
    }
}
