//! Headless Flappy Bird game and its environment adapter
//!
//! The game itself is plain arithmetic: a bird pulled down by gravity, a ring
//! of pipes scrolling towards it, collision and scoring checks. The trainer
//! never sees any of it directly - it talks to [`FlappyEnvironment`], which
//! discretizes the game into a finite state space and converts step outcomes
//! into rewards.

pub mod discretize;
pub mod environment;
pub mod mechanics;

pub use discretize::{Discretizer, FlappyState};
pub use environment::{EpisodeStats, FlappyEnvironment, RewardSchedule};
pub use mechanics::{EpisodeSummary, FlappyAction, FlappyGame, GameConfig, Pipe, StepStatus};
