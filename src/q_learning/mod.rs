//! Tabular Q-learning
//!
//! This module implements off-policy temporal difference control over a
//! fully-enumerated discrete state space:
//!
//! Q(s,a) <- Q(s,a) + alpha * (r + gamma * max_a' Q(s',a') - Q(s,a))
//!
//! The table is initialized over the complete cross product of states and
//! actions before training starts, so every lookup during training is
//! guaranteed to hit - a miss means the environment's state enumeration is
//! wrong and is surfaced as a fatal error rather than papered over.
//!
//! ## Usage Example
//!
//! ```no_run
//! use flappy::adapters::MsgPackRepository;
//! use flappy::game::{Discretizer, FlappyEnvironment, FlappyGame, GameConfig};
//! use flappy::q_learning::{Hyperparameters, Trainer};
//! use std::path::Path;
//!
//! let game = FlappyGame::new(GameConfig::default());
//! let env = FlappyEnvironment::new(game, Discretizer::default());
//! let hyper = Hyperparameters::new(0.95, 0.4, 0.5)?;
//!
//! let repo = MsgPackRepository::new();
//! let path = Path::new("flappy-session.msgpack");
//! let mut trainer = Trainer::bootstrap(env, hyper, &repo, path)?.with_max_steps(100_000);
//! let report = trainer.train(&repo, path)?;
//! println!("trained {} steps", report.steps_run);
//! # Ok::<(), flappy::Error>(())
//! ```

pub mod observers;
pub mod policy;
pub mod q_table;
pub mod serialization;
pub mod trainer;

// Public re-exports
pub use observers::{MetricsObserver, ProgressObserver};
pub use q_table::{QKey, QTable};
pub use serialization::SavedSession;
pub use trainer::{CancelToken, Hyperparameters, Trainer, TrainingReport};
