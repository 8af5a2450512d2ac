//! Domain types for the todo store.
//!
//! A todo list is a collection of independent entities. Each one is created,
//! edited, toggled and finally deleted through events routed by its
//! [`TodoId`].

use serde::{Deserialize, Serialize};
use streamstore_core::environment::IdGenerator;
use streamstore_core::partition::Intent;
use streamstore_macros::Partitioned;

/// Unique identifier for a todo item
///
/// Identities are handed out in creation order and never reused, so
/// ordering by id is ordering by creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from a raw identity
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identity
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// What needs doing
    pub text: String,
    /// Whether the todo is completed
    pub done: bool,
}

impl Todo {
    /// Creates a blank, pending todo
    #[must_use]
    pub const fn new(id: TodoId) -> Self {
        Self {
            id,
            text: String::new(),
            done: false,
        }
    }
}

/// Requests accepted by the store, before identities are assigned
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoIntent {
    /// Create a todo with this text
    Create {
        /// Initial text
        text: String,
    },
    /// Replace the text of a todo
    Edit {
        /// Target todo
        id: TodoId,
        /// New text
        text: String,
    },
    /// Flip a todo between done and pending
    Toggle {
        /// Target todo
        id: TodoId,
    },
    /// Remove a todo for good
    Delete {
        /// Target todo
        id: TodoId,
    },
}

impl Intent for TodoIntent {
    type Event = TodoEvent;

    fn into_event(self, ids: &dyn IdGenerator) -> TodoEvent {
        match self {
            Self::Create { text } => TodoEvent::Create {
                id: TodoId::new(ids.next_id()),
                text,
            },
            Self::Edit { id, text } => TodoEvent::Edit { id, text },
            Self::Toggle { id } => TodoEvent::Toggle { id },
            Self::Delete { id } => TodoEvent::Delete { id },
        }
    }
}

/// Tagged events on the merged bus, each routed by its `id`
#[derive(Partitioned, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TodoEvent {
    /// Todo was created
    #[opens]
    Create {
        /// Freshly assigned identity
        #[key]
        id: TodoId,
        /// Initial text
        text: String,
    },

    /// Todo text was replaced
    Edit {
        /// Target todo
        #[key]
        id: TodoId,
        /// New text
        text: String,
    },

    /// Todo was toggled
    Toggle {
        /// Target todo
        #[key]
        id: TodoId,
    },

    /// Todo was deleted
    Delete {
        /// Target todo
        #[key]
        id: TodoId,
    },
}

/// Summary statistics over the materialized list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of todos
    pub total: usize,
    /// Number of done todos
    pub completed: usize,
    /// Number of pending todos
    pub uncompleted: usize,
    /// Share of done todos in whole percent, rounded half up
    pub percent_completed: u8,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use streamstore_core::environment::SequentialIdGenerator;
    use streamstore_core::partition::Partitioned;

    #[test]
    fn todo_id_display() {
        assert_eq!(TodoId::new(42).to_string(), "42");
    }

    #[test]
    fn todo_id_orders_by_creation() {
        assert!(TodoId::new(1) < TodoId::new(2));
        assert_eq!(TodoId::from(7).as_u64(), 7);
    }

    #[test]
    fn todo_new_is_blank_and_pending() {
        let todo = Todo::new(TodoId::new(3));
        assert_eq!(todo.id, TodoId::new(3));
        assert!(todo.text.is_empty());
        assert!(!todo.done);
    }

    #[test]
    fn create_intent_draws_an_id() {
        let ids = SequentialIdGenerator::starting_at(5);

        let first = TodoIntent::Create { text: "a".into() }.into_event(&ids);
        let second = TodoIntent::Create { text: "b".into() }.into_event(&ids);

        assert_eq!(first.partition_key(), TodoId::new(5));
        assert_eq!(second.partition_key(), TodoId::new(6));
        assert!(first.opens_partition());
    }

    #[test]
    fn targeted_intents_keep_their_id() {
        let ids = SequentialIdGenerator::new();
        let event = TodoIntent::Toggle { id: TodoId::new(9) }.into_event(&ids);

        assert_eq!(event, TodoEvent::Toggle { id: TodoId::new(9) });
        assert!(!event.opens_partition());
        assert_eq!(event.kind(), "toggle");
        // No identity was consumed.
        assert_eq!(ids.next_id(), 0);
    }

    #[test]
    fn event_serializes_tagged() {
        let event = TodoEvent::Edit {
            id: TodoId::new(1),
            text: "x".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({"type": "edit", "id": 1, "text": "x"}));
    }

    #[test]
    fn stats_serialize_camel_case() {
        let stats = Stats {
            total: 2,
            completed: 1,
            uncompleted: 1,
            percent_completed: 50,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"total": 2, "completed": 1, "uncompleted": 1, "percentCompleted": 50})
        );
    }
}
