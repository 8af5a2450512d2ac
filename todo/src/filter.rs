//! Filter mode and its selector.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use streamstore_runtime::{SharedCell, Subscription, Versioned};
use thiserror::Error;

use crate::types::Todo;

/// Which todos the filtered list shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every todo
    #[default]
    All,
    /// Only completed todos
    Done,
    /// Only todos still to do
    Pending,
}

impl Filter {
    /// Every filter mode, in display order
    pub const ALL_MODES: [Self; 3] = [Self::All, Self::Done, Self::Pending];

    /// Whether `todo` passes this filter
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Done => todo.done,
            Self::Pending => !todo.done,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Done => "done",
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that names no filter mode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown filter mode '{input}' (expected all, done or pending)")]
pub struct ParseFilterError {
    /// The rejected input
    pub input: String,
}

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_MODES
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseFilterError {
                input: s.to_string(),
            })
    }
}

/// Holds the current filter mode
///
/// Starts at [`Filter::All`]. Selecting the mode already in effect publishes
/// nothing.
#[derive(Debug)]
pub struct FilterSelector {
    mode: SharedCell<Filter>,
}

impl FilterSelector {
    /// Creates a selector set to [`Filter::All`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: SharedCell::new("filter", Filter::default()),
        }
    }

    /// Switch to `mode`; returns true if the mode changed
    pub fn select(&self, mode: Filter) -> bool {
        let changed = self.mode.publish(mode);
        if changed {
            tracing::debug!(%mode, "Filter selected");
        }
        changed
    }

    /// Current mode
    #[must_use]
    pub fn current(&self) -> Filter {
        self.mode.read(|mode| *mode)
    }

    /// Current mode with its version
    #[must_use]
    pub fn versioned(&self) -> Versioned<Filter> {
        self.mode.current()
    }

    /// Subscribe to mode changes
    #[must_use]
    pub fn subscribe(&self) -> Subscription<Filter> {
        self.mode.subscribe()
    }
}

impl Default for FilterSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use crate::types::TodoId;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!("DONE".parse::<Filter>().unwrap(), Filter::Done);
        assert_eq!(" Pending ".parse::<Filter>().unwrap(), Filter::Pending);
    }

    #[test]
    fn rejects_unknown_modes() {
        let err = "archived".parse::<Filter>().unwrap_err();
        assert_eq!(err.input, "archived");
        assert_eq!(
            err.to_string(),
            "Unknown filter mode 'archived' (expected all, done or pending)"
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for mode in Filter::ALL_MODES {
            assert_eq!(mode.to_string().parse::<Filter>().unwrap(), mode);
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Filter::Pending).unwrap(), "\"pending\"");
    }

    #[test]
    fn matches_by_done_flag() {
        let mut todo = Todo::new(TodoId::new(0));
        assert!(Filter::All.matches(&todo));
        assert!(Filter::Pending.matches(&todo));
        assert!(!Filter::Done.matches(&todo));

        todo.done = true;
        assert!(Filter::Done.matches(&todo));
        assert!(!Filter::Pending.matches(&todo));
    }

    #[test]
    fn selector_defaults_to_all() {
        let selector = FilterSelector::new();
        assert_eq!(selector.current(), Filter::All);
        assert_eq!(selector.versioned().version, 0);
    }

    #[test]
    fn reselecting_is_a_no_op() {
        let selector = FilterSelector::new();
        let subscription = selector.subscribe();

        assert!(!selector.select(Filter::All));
        assert!(!subscription.has_changed().unwrap());

        assert!(selector.select(Filter::Done));
        assert!(!selector.select(Filter::Done));
        assert_eq!(selector.versioned().version, 1);
        assert!(subscription.has_changed().unwrap());
    }
}
