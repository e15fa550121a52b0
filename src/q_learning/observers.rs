//! Observer implementations for training runs
//!
//! Observers allow composable progress reporting without coupling the
//! trainer loop to any specific output mechanism.

use indicatif::{ProgressBar, ProgressStyle};

use crate::{Error, Result, ports::Observer};

/// Progress bar observer - shows the running step counter
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    total_reward: f64,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            total_reward: 0.0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, starting_step: u64) -> Result<()> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] step {human_pos} ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?,
        );
        pb.set_position(starting_step);
        pb.set_message("reward +0");
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_step(&mut self, step: u64, reward: f64) -> Result<()> {
        self.total_reward += reward;
        if let Some(pb) = &self.progress_bar {
            pb.set_position(step);
            // refreshing the message every step would dominate the loop
            if step.is_multiple_of(1000) {
                pb.set_message(format!("reward {:+.0}", self.total_reward));
            }
        }
        Ok(())
    }

    fn on_training_end(&mut self, _final_step: u64) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("reward {:+.0}", self.total_reward));
        }
        Ok(())
    }
}

/// Metrics observer - accumulates run statistics
pub struct MetricsObserver {
    steps: u64,
    total_reward: f64,
    positive_events: u64,
    negative_events: u64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            steps: 0,
            total_reward: 0.0,
            positive_events: 0,
            negative_events: 0,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Steps that earned a strictly positive reward (e.g. pipe passes).
    pub fn positive_events(&self) -> u64 {
        self.positive_events
    }

    /// Steps that earned a strictly negative reward (e.g. collisions).
    pub fn negative_events(&self) -> u64 {
        self.negative_events
    }

    pub fn mean_reward(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.total_reward / self.steps as f64
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, _step: u64, reward: f64) -> Result<()> {
        self.steps += 1;
        self.total_reward += reward;
        if reward > 0.0 {
            self.positive_events += 1;
        } else if reward < 0.0 {
            self.negative_events += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_accumulate_rewards_and_events() {
        let mut metrics = MetricsObserver::new();
        metrics.on_step(1, 300.0).unwrap();
        metrics.on_step(2, 0.0).unwrap();
        metrics.on_step(3, -300.0).unwrap();
        metrics.on_step(4, 300.0).unwrap();

        assert_eq!(metrics.steps(), 4);
        assert_eq!(metrics.total_reward(), 300.0);
        assert_eq!(metrics.positive_events(), 2);
        assert_eq!(metrics.negative_events(), 1);
        assert_eq!(metrics.mean_reward(), 75.0);
    }
}
