//! Versioned on-disk record for training sessions.
//!
//! A session is one self-contained unit: the full Q-table, the monotonic step
//! counter, and the hyperparameters the run was started with. It round-trips
//! through MessagePack with f64 values preserved exactly.

use std::{fmt, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{q_table::QTable, trainer::Hyperparameters},
};

/// Serializable snapshot of a training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSession<S, A>
where
    S: Eq + Hash,
    A: Eq + Hash,
{
    version: u32,
    step_count: u64,
    hyperparameters: Hyperparameters,
    table: QTable<S, A>,
}

impl<S, A> SavedSession<S, A>
where
    S: Eq + Hash,
    A: Eq + Hash,
{
    pub const VERSION: u32 = 1;

    pub fn new(step_count: u64, hyperparameters: Hyperparameters, table: QTable<S, A>) -> Self {
        Self {
            version: Self::VERSION,
            step_count,
            hyperparameters,
            table,
        }
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Hyperparameters the persisted run was started with.
    ///
    /// These are provenance: a resumed trainer keeps the caller-supplied
    /// values and only restores the table and step counter.
    pub fn hyperparameters(&self) -> Hyperparameters {
        self.hyperparameters
    }

    /// Number of Q-values stored in the session.
    pub fn table_len(&self) -> usize
    where
        S: Clone + fmt::Debug,
        A: Copy + fmt::Debug,
    {
        self.table.len()
    }

    /// Decompose into (table, step counter, hyperparameters).
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedSessionVersion`] when the record was written by an
    /// incompatible format version.
    pub fn into_parts(self) -> Result<(QTable<S, A>, u64, Hyperparameters)> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedSessionVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        Ok((self.table, self.step_count, self.hyperparameters))
    }

    #[cfg(test)]
    pub(crate) fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> SavedSession<(i32, i32), u8> {
        let states = vec![(0, 0), (0, 1), (1, 0)];
        let actions = vec![0u8, 1u8];
        let mut table = QTable::initialize(&states, &actions);
        table.set(0, (0, 1), 1.5);
        table.set(1, (1, 0), -300.0);
        SavedSession::new(1234, Hyperparameters::default(), table)
    }

    #[test]
    fn messagepack_roundtrip_preserves_everything() {
        let session = sample_session();

        let bytes = rmp_serde::to_vec(&session).unwrap();
        let loaded: SavedSession<(i32, i32), u8> = rmp_serde::from_slice(&bytes).unwrap();

        assert_eq!(loaded, session);
        assert_eq!(loaded.step_count(), 1234);
        assert_eq!(loaded.table_len(), 6);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let session = sample_session().with_version(99);
        let err = session.into_parts().unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedSessionVersion {
                found: 99,
                expected: 1
            }
        ));
    }

    #[test]
    fn into_parts_returns_stored_state() {
        let (table, steps, hyper) = sample_session().into_parts().unwrap();
        assert_eq!(steps, 1234);
        assert_eq!(hyper, Hyperparameters::default());
        assert_eq!(table.get(1, &(1, 0)).unwrap(), -300.0);
    }
}
