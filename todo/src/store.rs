//! The todo store facade.
//!
//! Wires the generic [`Store`] to the todo reducer, the filter selector and
//! the derived views. Every `submit_*` call finishes all downstream
//! recomputation before it returns.

use crate::filter::{Filter, FilterSelector};
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Stats, Todo, TodoEvent, TodoId, TodoIntent};
use crate::views::{FilterInput, FilteredView, ListView, StatsView};
use std::sync::Arc;
use streamstore_core::environment::IdGenerator;
use streamstore_runtime::{
    Change, EventTap, ProjectionCell, Snapshot, Store, StoreConfig, Subscription, Versioned,
};

/// How many times each view has been recomputed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Recomputations {
    /// Materialized list
    pub list: u64,
    /// Filtered list
    pub filtered: u64,
    /// Statistics
    pub stats: u64,
}

/// Reactive store for a todo list
///
/// # Example
///
/// ```
/// use todo_store::{Filter, TodoStore};
///
/// let mut store = TodoStore::new();
/// let Some(id) = store.submit_create("buy milk") else { unreachable!() };
/// store.submit_create("walk dog");
/// store.submit_toggle(id);
/// store.submit_select_filter(Filter::Pending);
///
/// assert_eq!(store.stats().completed, 1);
/// assert_eq!(store.filtered().len(), 1);
/// assert_eq!(store.filtered()[0].text, "walk dog");
/// ```
pub struct TodoStore {
    store: Store<TodoIntent, TodoReducer>,
    filter: FilterSelector,
    list: ProjectionCell<ListView>,
    /// List and mode the filtered and stats views last consumed
    input: FilterInput,
    filtered: ProjectionCell<FilteredView>,
    stats: ProjectionCell<StatsView>,
}

impl TodoStore {
    /// Creates an empty store with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Creates an empty store with custom configuration
    #[must_use]
    pub fn with_config(config: &StoreConfig) -> Self {
        Self::from_store(Store::with_config(
            TodoReducer::new(),
            TodoEnvironment::new(),
            config,
        ))
    }

    /// Creates an empty store drawing identities from `ids`
    #[must_use]
    pub fn with_id_generator(ids: Arc<dyn IdGenerator>, config: &StoreConfig) -> Self {
        Self::from_store(Store::with_id_generator(
            TodoReducer::new(),
            TodoEnvironment::new(),
            ids,
            config,
        ))
    }

    fn from_store(store: Store<TodoIntent, TodoReducer>) -> Self {
        let filter = FilterSelector::new();
        let list = store.state(|snapshot| ProjectionCell::new(ListView, snapshot));
        let input = FilterInput {
            list: list.current().value,
            filter: filter.current(),
        };
        let stats = ProjectionCell::new(StatsView, input.list.as_slice());
        let filtered = ProjectionCell::new(FilteredView, &input);

        Self {
            store,
            filter,
            list,
            input,
            filtered,
            stats,
        }
    }

    // ========== Inputs ==========

    /// Create a todo; empty text is ignored
    ///
    /// Returns the identity assigned to the new todo.
    pub fn submit_create(&mut self, text: impl Into<String>) -> Option<TodoId> {
        let text = text.into();
        if text.is_empty() {
            tracing::debug!("Ignoring create with empty text");
            return None;
        }
        let outcome = self.store.send(TodoIntent::Create { text });
        self.propagate(outcome.change);
        Some(outcome.key)
    }

    /// Replace the text of a todo
    pub fn submit_edit(&mut self, id: TodoId, text: impl Into<String>) -> Change {
        let text = text.into();
        self.submit(TodoIntent::Edit { id, text })
    }

    /// Flip a todo between done and pending
    pub fn submit_toggle(&mut self, id: TodoId) -> Change {
        self.submit(TodoIntent::Toggle { id })
    }

    /// Delete a todo; its identity is never reused
    pub fn submit_delete(&mut self, id: TodoId) -> Change {
        self.submit(TodoIntent::Delete { id })
    }

    /// Switch the filtered list to `mode`
    ///
    /// Returns false, publishing nothing, if `mode` is already selected.
    pub fn submit_select_filter(&mut self, mode: Filter) -> bool {
        if !self.filter.select(mode) {
            return false;
        }
        self.input.filter = mode;
        self.filtered.refresh(&self.input);
        true
    }

    fn submit(&mut self, intent: TodoIntent) -> Change {
        let outcome = self.store.send(intent);
        self.propagate(outcome.change);
        outcome.change
    }

    fn propagate(&mut self, change: Change) {
        if !change.is_visible() {
            return;
        }
        if !self.store.state(|snapshot| self.list.refresh(snapshot)) {
            return;
        }
        // Both views read the one list the list cell just published.
        self.input.list = self.list.current().value;
        self.stats.refresh(self.input.list.as_slice());
        self.filtered.refresh(&self.input);
    }

    // ========== Outputs ==========

    /// Todos passing the current filter
    #[must_use]
    pub fn filtered(&self) -> Arc<Vec<Todo>> {
        self.filtered.current().value
    }

    /// Subscribe to the filtered list
    #[must_use]
    pub fn subscribe_filtered(&self) -> Subscription<Vec<Todo>> {
        self.filtered.subscribe()
    }

    /// Current filter mode
    #[must_use]
    pub fn filter(&self) -> Filter {
        self.filter.current()
    }

    /// Subscribe to the filter mode
    #[must_use]
    pub fn subscribe_filter(&self) -> Subscription<Filter> {
        self.filter.subscribe()
    }

    /// Current statistics
    #[must_use]
    pub fn stats(&self) -> Stats {
        *self.stats.current()
    }

    /// Subscribe to statistics
    #[must_use]
    pub fn subscribe_stats(&self) -> Subscription<Stats> {
        self.stats.subscribe()
    }

    /// Every todo, in creation order
    #[must_use]
    pub fn todos(&self) -> Arc<Vec<Todo>> {
        self.list.current().value
    }

    /// Subscribe to the materialized list
    #[must_use]
    pub fn subscribe_todos(&self) -> Subscription<Vec<Todo>> {
        self.list.subscribe()
    }

    /// One todo by identity
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<Todo> {
        self.store.state(|snapshot| snapshot.get(&id).cloned())
    }

    /// Aggregate snapshot
    #[must_use]
    pub fn snapshot(&self) -> Versioned<Snapshot<TodoId, Todo>> {
        self.store.snapshot()
    }

    /// Subscribe to the aggregate snapshot
    #[must_use]
    pub fn subscribe_snapshot(&self) -> Subscription<Snapshot<TodoId, Todo>> {
        self.store.subscribe_snapshot()
    }

    /// Observe every event merged from now on
    #[must_use]
    pub fn subscribe_events(&self) -> EventTap<TodoEvent> {
        self.store.subscribe_events()
    }

    /// Number of events merged so far
    #[must_use]
    pub const fn events_published(&self) -> u64 {
        self.store.events_published()
    }

    /// How often each view has been recomputed
    #[must_use]
    pub fn recomputations(&self) -> Recomputations {
        Recomputations {
            list: self.list.recomputations(),
            filtered: self.filtered.recomputations(),
            stats: self.stats.recomputations(),
        }
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}
