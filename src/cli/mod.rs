//! CLI infrastructure for the flappy trainer
//!
//! This module provides the command-line interface for training the agent
//! and letting a trained agent play.

pub mod commands;
pub mod output;
