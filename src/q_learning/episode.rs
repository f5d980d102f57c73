//! Per-episode decision loop.
//!
//! A scripted agent observes a state, learns from the transition that led
//! to it, then selects the next action. At the end of the episode the last
//! action is backed up against the terminal state with the episode reward,
//! after which the table is typically persisted.

use std::path::Path;

use tracing::info;

use crate::{
    Result,
    actions::Action,
    ports::TableRepository,
    q_learning::{agent::QLearningAgent, learning::LearnOutcome},
    state::StateKey,
};

/// Tracks the previous state and action of the running episode
#[derive(Debug, Clone, Default)]
pub struct Episode {
    previous: Option<(StateKey, Action)>,
    steps: usize,
}

impl Episode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `state`, learn from the previous step with no reward, and
    /// select the next action.
    pub fn step(
        &mut self,
        agent: &mut QLearningAgent,
        state: StateKey,
        exclusions: Option<&[Action]>,
    ) -> Result<Action> {
        self.step_with_reward(agent, state, 0.0, exclusions)
    }

    /// Like [`Episode::step`], with an intermediate reward for the transition
    /// into `state`.
    pub fn step_with_reward(
        &mut self,
        agent: &mut QLearningAgent,
        state: StateKey,
        reward: f64,
        exclusions: Option<&[Action]>,
    ) -> Result<Action> {
        if let Some((previous_state, previous_action)) = &self.previous {
            agent.learn(previous_state, previous_action, reward, &state)?;
        }
        // The transition has been backed up; a failed selection must not replay it.
        self.previous = None;

        let action = agent.choose_action(&state, exclusions)?;
        self.previous = Some((state, action.clone()));
        self.steps += 1;
        Ok(action)
    }

    /// Back up the last action against the terminal state with the episode
    /// reward and clear the trajectory.
    ///
    /// Returns `None` if no action was taken during the episode.
    pub fn finish(
        &mut self,
        agent: &mut QLearningAgent,
        reward: f64,
    ) -> Result<Option<LearnOutcome>> {
        let Some((previous_state, previous_action)) = self.previous.take() else {
            return Ok(None);
        };
        let outcome = agent.learn(&previous_state, &previous_action, reward, &StateKey::Terminal)?;
        info!(steps = self.steps, reward, "episode finished");
        self.steps = 0;
        Ok(Some(outcome))
    }

    /// Finish the episode and persist the table at `location`.
    pub fn finish_and_save<R: TableRepository>(
        &mut self,
        agent: &mut QLearningAgent,
        reward: f64,
        repository: &R,
        location: &Path,
    ) -> Result<Option<LearnOutcome>> {
        let outcome = self.finish(agent, reward)?;
        repository.save(agent, location)?;
        Ok(outcome)
    }

    /// Previous state and action, if the episode has started
    pub fn previous(&self) -> Option<(&StateKey, &Action)> {
        self.previous
            .as_ref()
            .map(|(state, action)| (state, action))
    }

    /// Decisions taken so far in this episode
    pub fn steps(&self) -> usize {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{actions::ActionSet, config::QLearningConfig};

    fn agent() -> QLearningAgent {
        let actions = ActionSet::new(["donothing", "trainscv"]).unwrap();
        QLearningAgent::new(actions, QLearningConfig::new(0.5, 0.9, 0.9).with_seed(3)).unwrap()
    }

    #[test]
    fn test_first_step_only_selects() {
        let mut agent = agent();
        let mut episode = Episode::new();
        let state = StateKey::from((0, 1));

        let action = episode.step(&mut agent, state.clone(), None).unwrap();
        assert_eq!(episode.steps(), 1);
        assert_eq!(episode.previous(), Some((&state, &action)));
        for action in agent.actions() {
            assert_eq!(agent.get(&state, action.as_str()).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_finish_backs_up_terminal_reward() {
        let mut agent = agent();
        let mut episode = Episode::new();
        let state = StateKey::from((0, 1));

        let action = episode.step(&mut agent, state.clone(), None).unwrap();
        let outcome = episode.finish(&mut agent, 4.0).unwrap();

        assert!(matches!(outcome, Some(LearnOutcome::Updated { .. })));
        assert_eq!(agent.get(&state, action.as_str()).unwrap(), 2.0);
        assert!(episode.previous().is_none());
        assert_eq!(episode.steps(), 0);
    }

    #[test]
    fn test_finish_without_steps_is_noop() {
        let mut agent = agent();
        let mut episode = Episode::new();
        assert_eq!(episode.finish(&mut agent, 1.0).unwrap(), None);
    }

    #[test]
    fn test_intermediate_steps_learn_from_previous() {
        let mut agent = agent();
        let mut episode = Episode::new();
        let first = StateKey::from((0, 1));
        let second = StateKey::from((0, 2));

        let action = episode.step(&mut agent, first.clone(), None).unwrap();
        episode
            .step_with_reward(&mut agent, second.clone(), 1.0, None)
            .unwrap();

        assert_eq!(agent.get(&first, action.as_str()).unwrap(), 0.5);
        assert_eq!(episode.previous().map(|(state, _)| state), Some(&second));
    }

    #[test]
    fn test_failed_selection_does_not_replay_backup() {
        let mut agent = agent();
        let mut episode = Episode::new();
        let first = StateKey::from((0, 1));
        let blocked = StateKey::from((0, 2));
        let third = StateKey::from((0, 3));
        let everything: Vec<Action> = agent.actions().iter().cloned().collect();

        let action = episode.step(&mut agent, first.clone(), None).unwrap();
        let err = episode
            .step_with_reward(&mut agent, blocked, 1.0, Some(&everything))
            .unwrap_err();
        assert!(matches!(err, crate::Error::NoAvailableAction { .. }));
        assert_eq!(agent.get(&first, action.as_str()).unwrap(), 0.5);
        assert!(episode.previous().is_none());

        episode
            .step_with_reward(&mut agent, third, 1.0, None)
            .unwrap();
        assert_eq!(agent.get(&first, action.as_str()).unwrap(), 0.5);
    }
}
