//! Flappy Bird clone with a tabular Q-learning trainer
//!
//! This crate provides:
//! - A headless Flappy-Bird-style side-scroller with deterministic physics
//! - An epsilon-greedy Q-learning trainer with resumable training sessions
//! - MessagePack persistence for the learned Q-table behind a repository port
//! - A CLI for training and greedy evaluation

pub mod adapters;
pub mod cli;
pub mod error;
pub mod game;
pub mod ports;
pub mod q_learning;

pub use error::{Error, Result};
pub use game::{Discretizer, FlappyAction, FlappyEnvironment, FlappyGame, FlappyState, GameConfig};
pub use ports::{Environment, Observer, SessionRepository, StepOutcome};
pub use q_learning::{
    CancelToken, Hyperparameters, QKey, QTable, SavedSession, Trainer, TrainingReport,
};
