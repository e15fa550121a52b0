//! Q-learning trainer loop
//!
//! The trainer owns the Q-table and step counter for the duration of a run
//! and drives the environment through its port. Two modes share one loop:
//! continuous training (epsilon-greedy, table updates, persisted on exit) and
//! greedy evaluation (epsilon forced to 0, strictly read-only).

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Environment, Observer, SessionRepository, StepOutcome},
    q_learning::{policy, q_table::QTable, serialization::SavedSession},
};

/// Q-learning hyperparameters, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Learning rate α, in (0, 1]
    pub alpha: f64,
    /// Discount factor γ, in [0, 1)
    pub gamma: f64,
    /// Exploration probability ε, in [0, 1]
    pub epsilon: f64,
}

impl Hyperparameters {
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::InvalidHyperparameter {
                name: "alpha",
                value: alpha,
                expected: "(0, 1]",
            });
        }
        if !(0.0..1.0).contains(&gamma) {
            return Err(Error::InvalidHyperparameter {
                name: "gamma",
                value: gamma,
                expected: "[0, 1)",
            });
        }
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::InvalidHyperparameter {
                name: "epsilon",
                value: epsilon,
                expected: "[0, 1]",
            });
        }
        Ok(Self {
            alpha,
            gamma,
            epsilon,
        })
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            alpha: 0.95,
            gamma: 0.4,
            epsilon: 0.5,
        }
    }
}

/// Cooperative cancellation signal.
///
/// The trainer polls the token once at the top of each loop iteration, never
/// preemptively, so an in-flight update always completes before the loop
/// exits and the persisted table is never torn. Clones share the flag; the
/// CLI hands one clone to its Ctrl-C handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Summary of a completed training or evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Iterations executed in this run
    pub steps_run: u64,
    /// Persistent step counter after the run (unchanged by evaluation)
    pub total_steps: u64,
    /// Sum of all rewards earned during the run
    pub total_reward: f64,
}

#[derive(Clone, Copy)]
enum Mode {
    Train,
    Evaluate,
}

/// Epsilon-greedy Q-learning trainer over an [`Environment`].
pub struct Trainer<E: Environment> {
    env: E,
    table: QTable<E::State, E::Action>,
    hyper: Hyperparameters,
    step_count: u64,
    rng: StdRng,
    cancel: CancelToken,
    observers: Vec<Box<dyn Observer>>,
    max_steps: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

impl<E: Environment> Trainer<E> {
    /// Create a trainer with a freshly initialized Q-table.
    ///
    /// The table covers the full cross product of the environment's declared
    /// state and action spaces, every entry at 0.0.
    pub fn new(env: E, hyper: Hyperparameters) -> Self {
        let table = QTable::initialize(&env.all_states(), &env.actions());
        Self {
            env,
            table,
            hyper,
            step_count: 0,
            rng: build_rng(None),
            cancel: CancelToken::new(),
            observers: Vec::new(),
            max_steps: None,
        }
    }

    /// Create a trainer from a previously persisted session.
    ///
    /// The session supplies the Q-table and step counter. The caller-supplied
    /// hyperparameters are authoritative; the values stored in the session
    /// are provenance only (see [`SavedSession::hyperparameters`]).
    ///
    /// # Errors
    ///
    /// Fails when the session format version is unsupported.
    pub fn from_session(
        env: E,
        session: SavedSession<E::State, E::Action>,
        hyper: Hyperparameters,
    ) -> Result<Self> {
        let (table, step_count, _stored) = session.into_parts()?;
        Ok(Self {
            env,
            table,
            hyper,
            step_count,
            rng: build_rng(None),
            cancel: CancelToken::new(),
            observers: Vec::new(),
            max_steps: None,
        })
    }

    /// Resume from the repository if a session exists at `path`, otherwise
    /// start fresh with a fully initialized Q-table.
    ///
    /// A present-but-unreadable session is a fatal error, never a silent
    /// fresh start - that would destroy training progress without signal.
    pub fn bootstrap<R>(env: E, hyper: Hyperparameters, repo: &R, path: &Path) -> Result<Self>
    where
        R: SessionRepository<E::State, E::Action>,
    {
        if repo.exists(path) {
            let session = repo.load(path)?;
            Self::from_session(env, session, hyper)
        } else {
            Ok(Self::new(env, hyper))
        }
    }

    /// Seed the policy RNG for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Register an observer for progress events.
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Bound the number of iterations for the next run.
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// A clone of the cancellation token polled by the loop.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn table(&self) -> &QTable<E::State, E::Action> {
        &self.table
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.hyper
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Run the training loop until cancellation, a terminate signal from the
    /// environment, or the optional step limit.
    ///
    /// The session (Q-table, step counter, hyperparameters) is persisted on
    /// every exit path, including cancellation - training state is never
    /// silently discarded.
    pub fn train<R>(&mut self, repo: &R, path: &Path) -> Result<TrainingReport>
    where
        R: SessionRepository<E::State, E::Action>,
    {
        let report = self.run_loop(Mode::Train)?;
        let session = SavedSession::new(self.step_count, self.hyper, self.table.clone());
        repo.save(&session, path)?;
        Ok(report)
    }

    /// Run the loop in evaluation mode: epsilon forced to 0 (pure greedy
    /// exploitation), no Q-table updates, nothing persisted.
    pub fn evaluate(&mut self) -> Result<TrainingReport> {
        self.run_loop(Mode::Evaluate)
    }

    fn run_loop(&mut self, mode: Mode) -> Result<TrainingReport> {
        let actions = self.env.actions();
        let epsilon = match mode {
            Mode::Train => self.hyper.epsilon,
            Mode::Evaluate => 0.0,
        };

        for observer in &mut self.observers {
            observer.on_training_start(self.step_count)?;
        }

        let mut steps_run: u64 = 0;
        let mut total_reward = 0.0;

        loop {
            // Cancellation is observed at iteration boundaries only, so the
            // previous iteration's update is always complete here.
            if self.cancel.is_cancelled() {
                break;
            }
            if let Some(limit) = self.max_steps
                && steps_run >= limit
            {
                break;
            }

            let state = self.env.current_state();
            let action = policy::choose(&self.table, &state, &actions, epsilon, &mut self.rng)?;

            let reward = match self.env.advance(action)? {
                // Terminate ends the session with no update for this action.
                StepOutcome::Terminate => break,
                StepOutcome::Reward(reward) => reward,
            };

            if let Mode::Train = mode {
                let next_state = self.env.current_state();
                let q = self.table.get(action, &state)?;
                let bootstrap = policy::argmax_with_ties(
                    &actions,
                    |a| self.table.get(a, &next_state),
                    &mut self.rng,
                )?
                .ok_or(Error::EmptyActionSet)?;

                self.table.set(
                    action,
                    state,
                    q + self.hyper.alpha * (reward + self.hyper.gamma * bootstrap.value - q),
                );
                self.step_count += 1;
            }

            steps_run += 1;
            total_reward += reward;

            let reported_step = match mode {
                Mode::Train => self.step_count,
                Mode::Evaluate => steps_run,
            };
            for observer in &mut self.observers {
                observer.on_step(reported_step, reward)?;
            }
        }

        let final_step = match mode {
            Mode::Train => self.step_count,
            Mode::Evaluate => steps_run,
        };
        for observer in &mut self.observers {
            observer.on_training_end(final_step)?;
        }

        Ok(TrainingReport {
            steps_run,
            total_steps: self.step_count,
            total_reward,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperparameters_validate_ranges() {
        assert!(Hyperparameters::new(0.5, 0.9, 0.1).is_ok());
        assert!(Hyperparameters::new(1.0, 0.0, 0.0).is_ok());
        assert!(Hyperparameters::new(0.5, 0.9, 1.0).is_ok());

        assert!(matches!(
            Hyperparameters::new(0.0, 0.9, 0.1),
            Err(Error::InvalidHyperparameter { name: "alpha", .. })
        ));
        assert!(matches!(
            Hyperparameters::new(0.5, 1.0, 0.1),
            Err(Error::InvalidHyperparameter { name: "gamma", .. })
        ));
        assert!(matches!(
            Hyperparameters::new(0.5, 0.9, 1.5),
            Err(Error::InvalidHyperparameter { name: "epsilon", .. })
        ));
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());

        clone.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }
}
