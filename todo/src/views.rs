//! Derived views over the todo aggregate.
//!
//! ```text
//! snapshot ──► ListView ──► Arc<Vec<Todo>> ──┬──► StatsView
//!                                            └──► FilteredView ◄── filter
//! ```
//!
//! The list is computed once per snapshot change and its `Arc` is handed to
//! both downstream views, so every consumer sees the same materialization.

use crate::filter::Filter;
use crate::types::{Stats, Todo, TodoId};
use std::sync::Arc;
use streamstore_core::projection::Projection;
use streamstore_runtime::Snapshot;

/// Snapshot → list of todos in creation order
#[derive(Clone, Copy, Debug, Default)]
pub struct ListView;

impl Projection for ListView {
    type Input = Snapshot<TodoId, Todo>;
    type Output = Vec<Todo>;

    fn name(&self) -> &'static str {
        "list"
    }

    fn project(&self, snapshot: &Snapshot<TodoId, Todo>) -> Vec<Todo> {
        snapshot.values().cloned().collect()
    }
}

/// Inputs of the filtered list: the shared list and the mode in effect
#[derive(Clone, Debug)]
pub struct FilterInput {
    /// Materialized list, shared with every other consumer
    pub list: Arc<Vec<Todo>>,
    /// Mode to apply
    pub filter: Filter,
}

/// List + filter → todos passing the filter
#[derive(Clone, Copy, Debug, Default)]
pub struct FilteredView;

impl Projection for FilteredView {
    type Input = FilterInput;
    type Output = Vec<Todo>;

    fn name(&self) -> &'static str {
        "filtered"
    }

    fn project(&self, input: &FilterInput) -> Vec<Todo> {
        input
            .list
            .iter()
            .filter(|todo| input.filter.matches(todo))
            .cloned()
            .collect()
    }
}

/// List → summary statistics
#[derive(Clone, Copy, Debug, Default)]
pub struct StatsView;

impl Projection for StatsView {
    type Input = [Todo];
    type Output = Stats;

    fn name(&self) -> &'static str {
        "stats"
    }

    fn project(&self, list: &[Todo]) -> Stats {
        let total = list.len();
        let completed = list.iter().filter(|todo| todo.done).count();
        Stats {
            total,
            completed,
            uncompleted: total - completed,
            percent_completed: percent_rounded(completed, total),
        }
    }
}

/// `100 * part / whole` rounded half up, or 0 for an empty whole.
fn percent_rounded(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    // floor((100 * part / whole) + 1/2) without leaving integers
    let percent = (200 * part + whole) / (2 * whole);
    u8::try_from(percent).unwrap_or(100)
}
