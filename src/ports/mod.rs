//! Port traits - boundaries between the learning core and the outside world
//!
//! Following hexagonal architecture, these traits define what the trainer
//! needs from its collaborators without coupling it to any concrete game,
//! storage format, or reporting mechanism.

pub mod environment;
pub mod observer;
pub mod repository;

pub use environment::{Environment, StepOutcome};
pub use observer::Observer;
pub use repository::SessionRepository;
