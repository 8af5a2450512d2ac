//! Reducer logic for a single todo partition.
//!
//! Each live todo has its own partition state. The reducer only ever sees
//! events addressed to that todo; routing and lifecycle are handled by the
//! runtime.

use crate::types::{Todo, TodoEvent, TodoId};
use streamstore_core::{effect::Effect, partition::KeyedReducer, reducer::Reducer};

/// Environment dependencies for the todo reducer
///
/// Folding todo events needs nothing from the outside world; identities are
/// assigned on the bus before events reach the reducer.
#[derive(Clone, Debug, Default)]
pub struct TodoEnvironment;

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Reducer for one todo partition
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = Todo;
    type Action = TodoEvent;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        todo: &mut Self::State,
        event: Self::Action,
        _env: &Self::Environment,
    ) -> Effect {
        match event {
            TodoEvent::Create { text, .. } | TodoEvent::Edit { text, .. } => {
                todo.text = text;
                Effect::None
            },
            TodoEvent::Toggle { .. } => {
                todo.done = !todo.done;
                Effect::None
            },
            TodoEvent::Delete { .. } => Effect::Complete,
        }
    }
}

impl KeyedReducer for TodoReducer {
    fn seed(&self, id: &TodoId) -> Todo {
        Todo::new(*id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamstore_testing::{assertions, ReducerTest};

    const ID: TodoId = TodoId::new(0);

    fn seeded() -> Todo {
        TodoReducer::new().seed(&ID)
    }

    #[test]
    fn seed_is_blank_and_pending() {
        assert_eq!(seeded(), Todo::new(ID));
    }

    #[test]
    fn create_sets_text() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::new())
            .given_state(seeded())
            .when_action(TodoEvent::Create {
                id: ID,
                text: "buy milk".to_string(),
            })
            .then_state(|todo| {
                assert_eq!(todo.text, "buy milk");
                assert!(!todo.done);
            })
            .then_effects(assertions::assert_continues)
            .run();
    }

    #[test]
    fn edit_replaces_text_and_keeps_done() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::new())
            .given_state(Todo {
                id: ID,
                text: "old".to_string(),
                done: true,
            })
            .when_action(TodoEvent::Edit {
                id: ID,
                text: "new".to_string(),
            })
            .then_state(|todo| {
                assert_eq!(todo.text, "new");
                assert!(todo.done);
            })
            .then_effects(assertions::assert_continues)
            .run();
    }

    #[test]
    fn toggle_twice_restores_done() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::new())
            .given_state(seeded())
            .when_actions([TodoEvent::Toggle { id: ID }, TodoEvent::Toggle { id: ID }])
            .then_state(|todo| {
                assert!(!todo.done);
            })
            .then_effects(assertions::assert_continues)
            .run();
    }

    #[test]
    fn toggle_inverts_done() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::new())
            .given_state(seeded())
            .when_action(TodoEvent::Toggle { id: ID })
            .then_state(|todo| {
                assert!(todo.done);
            })
            .run();
    }

    #[test]
    fn delete_completes_the_partition() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::new())
            .given_state(seeded())
            .when_action(TodoEvent::Delete { id: ID })
            .then_effects(assertions::assert_completes)
            .run();
    }
}
