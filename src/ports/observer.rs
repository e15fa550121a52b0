//! Observer port - abstraction for training observation and reporting
//!
//! Observers are notified of loop progress without having any effect on
//! learning. They can be composed to collect different kinds of data
//! (progress bars, metrics, ...).
//!
//! # Event Sequence
//!
//! 1. `on_training_start(starting_step)` - once, before the first iteration
//! 2. `on_step(step, reward)` - after every completed iteration
//! 3. `on_training_end(final_step)` - once, after the loop exits

use crate::Result;

/// Observer trait for monitoring a training or evaluation run
///
/// All methods default to no-ops, so implementors only override the events
/// they care about.
pub trait Observer: Send {
    /// Called before the first loop iteration.
    ///
    /// `starting_step` is the persistent step counter at entry - nonzero when
    /// resuming a previous session.
    fn on_training_start(&mut self, _starting_step: u64) -> Result<()> {
        Ok(())
    }

    /// Called after each completed iteration with the reward just earned.
    fn on_step(&mut self, _step: u64, _reward: f64) -> Result<()> {
        Ok(())
    }

    /// Called once after the loop exits, regardless of the exit reason.
    fn on_training_end(&mut self, _final_step: u64) -> Result<()> {
        Ok(())
    }
}
