//! # Streamstore Testing
//!
//! Testing utilities and helpers for streamstore.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use streamstore_testing::{init_test_tracing, mocks::StepIdGenerator};
//! use std::sync::Arc;
//!
//! #[test]
//! fn test_ids_are_predictable() {
//!     init_test_tracing();
//!     let mut store = TodoStore::with_id_generator(
//!         Arc::new(StepIdGenerator::new(10, 5)),
//!         &StoreConfig::default(),
//!     );
//!     store.submit_create("buy milk");
//!     assert!(store.todos().iter().any(|t| t.id == TodoId::new(10)));
//! }
//! ```


/// Mock implementations of Environment traits
///
/// Mock implementations for testing.
pub mod mocks {
    use std::sync::atomic::{AtomicU64, Ordering};
    use streamstore_core::environment::IdGenerator;

    /// Id generator with a configurable origin and stride
    ///
    /// Makes identities recognizable in assertions (`10, 15, 20, ...`).
    ///
    /// # Example
    ///
    /// ```
    /// use streamstore_testing::mocks::StepIdGenerator;
    /// use streamstore_core::environment::IdGenerator;
    ///
    /// let ids = StepIdGenerator::new(10, 5);
    /// assert_eq!(ids.next_id(), 10);
    /// assert_eq!(ids.next_id(), 15);
    /// assert_eq!(ids.issued(), 2);
    /// ```
    #[derive(Debug)]
    pub struct StepIdGenerator {
        next: AtomicU64,
        step: u64,
        issued: AtomicU64,
    }

    impl StepIdGenerator {
        /// Create a generator yielding `first`, `first + step`, ...
        ///
        /// A zero `step` is raised to 1 so identities stay unique.
        #[must_use]
        pub const fn new(first: u64, step: u64) -> Self {
            Self {
                next: AtomicU64::new(first),
                step: if step == 0 { 1 } else { step },
                issued: AtomicU64::new(0),
            }
        }

        /// Number of identities handed out so far
        #[must_use]
        pub fn issued(&self) -> u64 {
            self.issued.load(Ordering::Relaxed)
        }
    }

    impl IdGenerator for StepIdGenerator {
        fn next_id(&self) -> u64 {
            self.issued.fetch_add(1, Ordering::Relaxed);
            self.next.fetch_add(self.step, Ordering::Relaxed)
        }
    }
}

/// Install a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; output goes through the test writer so it is captured
/// per test. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::StepIdGenerator;
pub use reducer_test::{assertions, ReducerTest};
