//! Scripted demo for the todo store.
//!
//! Runs a short session against an in-memory store, printing each view as
//! JSON and, at the end, the Prometheus metrics collected along the way.
//!
//! ```bash
//! RUST_LOG=todo_store=debug cargo run -p todo-store -- pending
//! ```
//!
//! The optional argument picks the filter mode applied at the end.

use streamstore_runtime::metrics::MetricsExporter;
use todo_store::{Filter, StoreConfig, TodoStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_store=info,streamstore_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut exporter = MetricsExporter::new();
    exporter.install()?;

    let final_filter = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<Filter>()?,
        None => Filter::Done,
    };

    println!("=== Todo Store Demo ===\n");

    let mut store = TodoStore::with_config(&StoreConfig::default());
    let mut events = store.subscribe_events();

    println!(">>> Creating todos...");
    let milk = store.submit_create("buy milk");
    let docs = store.submit_create("write docs");
    let deploy = store.submit_create("deploy");
    store.submit_create("");
    tracing::info!(live = store.todos().len(), "Todos created");

    println!(">>> Completing 'buy milk', renaming 'write docs', dropping 'deploy'...");
    if let Some(id) = milk {
        store.submit_toggle(id);
    }
    if let Some(id) = docs {
        store.submit_edit(id, "write better docs");
    }
    if let Some(id) = deploy {
        store.submit_delete(id);
        // Deleted todos stay deleted.
        store.submit_toggle(id);
    }

    println!("\nTodos:\n{}", serde_json::to_string_pretty(&*store.todos())?);
    println!("\nStats:\n{}", serde_json::to_string_pretty(&store.stats())?);

    store.submit_select_filter(final_filter);
    println!(
        "\nFiltered ({final_filter}):\n{}",
        serde_json::to_string_pretty(&*store.filtered())?
    );

    println!("\nEvent log:");
    for envelope in events.drain()? {
        println!("  #{} {}", envelope.sequence, serde_json::to_string(&envelope.event)?);
    }

    if let Some(rendered) = exporter.render() {
        println!("\nMetrics:\n{rendered}");
    }

    println!("=== Demo Complete ===");
    Ok(())
}
