//! Q-table with exhaustive initialization over the state-action cross product

use std::{collections::HashMap, fmt, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Composite lookup key pairing an action with a state.
///
/// An explicit value type with structural equality and a stable hash, instead
/// of an ad-hoc tuple, so differently-shaped discretizations cannot be mixed
/// up at the key level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QKey<S, A> {
    pub action: A,
    pub state: S,
}

/// Q-table mapping (action, state) pairs to value estimates
///
/// The table is created by [`QTable::initialize`] over the full cross product
/// of the declared state and action spaces, with every entry at 0.0. After
/// that, [`QTable::get`] treats a missing pair as a programmer error: it can
/// only happen when the state enumeration was incomplete or a state escaped
/// its discretization bounds, and silently defaulting would mask that bug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable<S, A>
where
    S: Eq + Hash,
    A: Eq + Hash,
{
    values: HashMap<QKey<S, A>, f64>,
}

impl<S, A> QTable<S, A>
where
    S: Clone + Eq + Hash + fmt::Debug,
    A: Copy + Eq + Hash + fmt::Debug,
{
    /// Create a Q-table holding 0.0 for every (action, state) combination.
    pub fn initialize(states: &[S], actions: &[A]) -> Self {
        let mut values = HashMap::with_capacity(states.len() * actions.len());
        for state in states {
            for &action in actions {
                values.insert(
                    QKey {
                        action,
                        state: state.clone(),
                    },
                    0.0,
                );
            }
        }
        Self { values }
    }

    /// Get the value estimate for a state-action pair.
    ///
    /// # Errors
    ///
    /// [`Error::UninitializedStateAction`] if the pair was never initialized.
    pub fn get(&self, action: A, state: &S) -> Result<f64> {
        self.values
            .get(&QKey {
                action,
                state: state.clone(),
            })
            .copied()
            .ok_or_else(|| Error::UninitializedStateAction {
                action: format!("{action:?}"),
                state: format!("{state:?}"),
            })
    }

    /// Set the value estimate for a state-action pair.
    pub fn set(&mut self, action: A, state: S, value: f64) {
        self.values.insert(QKey { action, state }, value);
    }

    /// Number of entries stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all entries.
    pub fn entries(&self) -> impl Iterator<Item = (&QKey<S, A>, f64)> {
        self.values.iter().map(|(key, &value)| (key, value))
    }
}
