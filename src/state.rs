use std::ops::Index;

use indexmap::IndexMap;
#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// A per-variable numeric mapping produced by a flux or source evaluation.
///
/// Insertion order is preserved, so contributions iterate in a stable order.
pub type Contribution = IndexMap<String, f64>;

/// The physical state of a block: an insertion-ordered mapping from variable
/// name to value.
///
/// The variable set is normally fixed when the owning block is constructed,
/// and insertion order is the canonical iteration order for residual output.
/// Assigning to a new key after construction still inserts it; residual
/// accumulation picks up the enlarged variable set on the next call.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct State {
    values: IndexMap<String, f64>,
}

impl State {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `variable`, if present.
    #[must_use]
    pub fn get(&self, variable: &str) -> Option<f64> {
        self.values.get(variable).copied()
    }

    /// Assigns `value` to `variable`, inserting the variable if it is new.
    ///
    /// New variables are appended at the end of the iteration order.
    pub fn set(&mut self, variable: impl Into<String>, value: f64) {
        self.values.insert(variable.into(), value);
    }

    /// Returns `true` if `variable` is present.
    #[must_use]
    pub fn contains(&self, variable: &str) -> bool {
        self.values.contains_key(variable)
    }

    /// Iterates over variable names in insertion order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over `(variable, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns the number of state variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the state holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for State {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Index<&str> for State {
    type Output = f64;

    /// # Panics
    ///
    /// Panics if `variable` is not present; use [`State::get`] for a fallible
    /// lookup.
    fn index(&self, variable: &str) -> &Self::Output {
        &self.values[variable]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let state: State = [("T", 20.0), ("P", 101.3), ("rho", 997.0)]
            .into_iter()
            .collect();

        let variables: Vec<_> = state.variables().collect();
        assert_eq!(variables, ["T", "P", "rho"]);
    }

    #[test]
    fn set_updates_in_place_and_appends_new_keys() {
        let mut state: State = [("T", 20.0)].into_iter().collect();

        state.set("T", 10.0);
        state.set("P", 101.3);

        assert_eq!(state.get("T"), Some(10.0));
        assert!(state.contains("P"));
        let variables: Vec<_> = state.variables().collect();
        assert_eq!(variables, ["T", "P"]);
    }

    #[test]
    fn missing_variable_is_none() {
        let state = State::new();
        assert_eq!(state.get("T"), None);
        assert!(!state.contains("T"));
        assert!(state.is_empty());
    }
}
