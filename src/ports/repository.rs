//! Repository port for training session persistence.
//!
//! This module defines the trait boundary between the learning core and the
//! infrastructure layer for session storage and retrieval.

use std::{hash::Hash, path::Path};

use crate::{Result, q_learning::SavedSession};

/// Port for persisting and loading training sessions.
///
/// This trait abstracts the storage mechanism, allowing different
/// implementations (MessagePack files, in-memory stores for tests) without
/// coupling the trainer to a specific serialization format.
///
/// # Absence vs. corruption
///
/// [`exists`](SessionRepository::exists) distinguishes "no session yet"
/// (start fresh) from a present-but-unreadable session, which
/// [`load`](SessionRepository::load) surfaces as a fatal error. A broken save
/// file must never silently degrade into a fresh Q-table.
pub trait SessionRepository<S, A>
where
    S: Eq + Hash,
    A: Eq + Hash,
{
    /// Save a session to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or serialization fails.
    fn save(&self, session: &SavedSession<S, A>, path: &Path) -> Result<()>;

    /// Load a session from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the format is invalid or
    /// corrupted, or deserialization fails.
    fn load(&self, path: &Path) -> Result<SavedSession<S, A>>;

    /// Whether a session is stored at the given path.
    fn exists(&self, path: &Path) -> bool;
}
