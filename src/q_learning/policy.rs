//! Epsilon-greedy action selection with randomized tie-breaking

use std::{fmt, hash::Hash};

use rand::{Rng, rngs::StdRng, seq::IndexedRandom};

use crate::{Error, Result, q_learning::q_table::QTable};

/// Winner of an [`argmax_with_ties`] search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArgMax<T> {
    pub item: T,
    pub value: f64,
}

/// Find the maximum-valued item, breaking ties uniformly at random.
///
/// Returns `Ok(None)` for an empty candidate list, so "no candidates" is
/// distinguishable from any real winner. The random tie-break is deliberate:
/// always taking the first maximal item would bias action selection whenever
/// several actions are equally good, which is the common case early in
/// training when every value is still 0.0.
pub fn argmax_with_ties<T, F>(
    items: &[T],
    mut value_of: F,
    rng: &mut StdRng,
) -> Result<Option<ArgMax<T>>>
where
    T: Copy,
    F: FnMut(T) -> Result<f64>,
{
    let Some(&first) = items.first() else {
        return Ok(None);
    };

    let mut max_value = value_of(first)?;
    let mut ties = vec![first];
    for &item in &items[1..] {
        let value = value_of(item)?;
        if value > max_value {
            max_value = value;
            ties.clear();
            ties.push(item);
        } else if value == max_value {
            ties.push(item);
        }
    }

    let item = ties[rng.random_range(0..ties.len())];
    Ok(Some(ArgMax {
        item,
        value: max_value,
    }))
}

/// Epsilon-greedy action selection.
///
/// With probability `epsilon` an action is drawn uniformly at random from
/// `actions`; otherwise the highest-valued action for `state` is returned,
/// ties broken uniformly at random.
///
/// # Errors
///
/// [`Error::EmptyActionSet`] when `actions` is empty - a dummy action would
/// be silently wrong. Q-table lookup failures propagate unchanged.
pub fn choose<S, A>(
    table: &QTable<S, A>,
    state: &S,
    actions: &[A],
    epsilon: f64,
    rng: &mut StdRng,
) -> Result<A>
where
    S: Clone + Eq + Hash + fmt::Debug,
    A: Copy + Eq + Hash + fmt::Debug,
{
    if actions.is_empty() {
        return Err(Error::EmptyActionSet);
    }

    if rng.random::<f64>() < epsilon {
        // Explore: random action
        actions.choose(rng).copied().ok_or(Error::EmptyActionSet)
    } else {
        // Exploit: greedy action based on Q-values
        argmax_with_ties(actions, |action| table.get(action, state), rng)?
            .map(|winner| winner.item)
            .ok_or(Error::EmptyActionSet)
    }
}
