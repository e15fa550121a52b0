//! Common test utilities for the flappy test suite.
//!
//! Provides a tiny deterministic environment so trainer-loop tests can
//! script rewards and terminate signals exactly.

use flappy::{
    Result,
    ports::{Environment, StepOutcome},
};

/// Two-state environment driven by a scripted tape of step outcomes.
///
/// The state toggles between 0 and 1 on every rewarded step; once the tape
/// runs out, every further step terminates. Actions taken are recorded for
/// assertions on policy behavior.
pub struct ScriptedEnvironment {
    outcomes: Vec<StepOutcome>,
    cursor: usize,
    state: i32,
    actions: Vec<u8>,
    pub actions_taken: Vec<u8>,
}

impl ScriptedEnvironment {
    pub fn new(outcomes: Vec<StepOutcome>) -> Self {
        Self {
            outcomes,
            cursor: 0,
            state: 0,
            actions: vec![0, 1],
            actions_taken: Vec::new(),
        }
    }

    /// Override the action set (e.g. empty, to test the no-decision path).
    pub fn with_actions(mut self, actions: Vec<u8>) -> Self {
        self.actions = actions;
        self
    }
}

impl Environment for ScriptedEnvironment {
    type State = i32;
    type Action = u8;

    fn actions(&self) -> Vec<u8> {
        self.actions.clone()
    }

    fn all_states(&self) -> Vec<i32> {
        vec![0, 1]
    }

    fn current_state(&self) -> i32 {
        self.state
    }

    fn advance(&mut self, action: u8) -> Result<StepOutcome> {
        self.actions_taken.push(action);
        let outcome = self
            .outcomes
            .get(self.cursor)
            .copied()
            .unwrap_or(StepOutcome::Terminate);
        self.cursor += 1;
        if let StepOutcome::Reward(_) = outcome {
            self.state = 1 - self.state;
        }
        Ok(outcome)
    }
}
