//! Environment port - abstraction over the game being learned
//!
//! The trainer interacts with the game exclusively through this trait. All
//! four operations are mandatory, so an incomplete adapter fails to compile
//! instead of failing at call time.

use std::{fmt, hash::Hash};

use crate::Result;

/// Outcome of advancing the environment by one action.
///
/// `Terminate` is a distinguished sentinel, structurally distinct from any
/// numeric reward: it tells the trainer to end the session immediately. No
/// learning update may be applied for the action that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Immediate scalar reward earned by the action
    Reward(f64),
    /// Request to end the training/evaluation session
    Terminate,
}

/// Environment trait - Interface consumed by the trainer
///
/// Implementors own all game-specific state; the trainer never mutates the
/// environment except through [`advance`](Environment::advance).
///
/// # State and action spaces
///
/// Both spaces must be finite. [`all_states`](Environment::all_states) is
/// called exactly once, before training starts, to initialize the Q-table
/// over the full cross product of states and actions. Every state that
/// [`current_state`](Environment::current_state) can ever return must be
/// contained in that enumeration - a state outside it surfaces later as a
/// fatal [`Error::UninitializedStateAction`](crate::Error) lookup.
pub trait Environment {
    type State: Clone + Eq + Hash + fmt::Debug;
    type Action: Copy + Eq + Hash + fmt::Debug;

    /// Available actions, identical on every call.
    fn actions(&self) -> Vec<Self::Action>;

    /// The complete, finite state space. Used once, at initialization.
    fn all_states(&self) -> Vec<Self::State>;

    /// The discretized observation of the current game situation.
    fn current_state(&self) -> Self::State;

    /// Perform one time step with the given action.
    fn advance(&mut self, action: Self::Action) -> Result<StepOutcome>;
}
