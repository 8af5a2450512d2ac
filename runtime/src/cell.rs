//! Shared value cells with retained last value.
//!
//! A [`SharedCell`] is the single owner of one store output (the aggregate
//! snapshot, a derived view, the filter mode). It keeps the latest value
//! together with a version number and broadcasts changes to any number of
//! [`Subscription`]s.
//!
//! # Guarantees
//!
//! - A subscription sees the current value immediately, never an unset state
//! - Every subscriber observes the same `Arc` for the same version, so a value
//!   is computed once and shared rather than recomputed per consumer
//! - Publishing a value equal to the current one is a no-op: no version bump,
//!   no wake-up
//!
//! Cells are backed by a tokio `watch` channel, so publishing never blocks
//! and subscriptions may be moved to other tasks and awaited there.

use crate::error::StoreError;
use futures::Stream;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::watch;

/// A published value and the version it was published at.
///
/// Version 0 is the initial value; each change increments it by one.
#[derive(Debug)]
pub struct Versioned<T> {
    /// Number of changes published before this value
    pub version: u64,
    /// The shared value
    pub value: Arc<T>,
}

impl<T> Versioned<T> {
    fn initial(value: T) -> Self {
        Self {
            version: 0,
            value: Arc::new(value),
        }
    }

    /// Returns true if both refer to the same published allocation.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl<T> Clone for Versioned<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> Deref for Versioned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Owner side of a shared output.
pub struct SharedCell<T> {
    name: &'static str,
    sender: watch::Sender<Versioned<T>>,
}

impl<T> SharedCell<T> {
    /// Create a cell holding `initial` at version 0.
    ///
    /// `name` identifies the cell in traces.
    #[must_use]
    pub fn new(name: &'static str, initial: T) -> Self {
        let (sender, _) = watch::channel(Versioned::initial(initial));
        Self { name, sender }
    }

    /// Current value and version
    #[must_use]
    pub fn current(&self) -> Versioned<T> {
        self.sender.borrow().clone()
    }

    /// Current version
    #[must_use]
    pub fn version(&self) -> u64 {
        self.sender.borrow().version
    }

    /// Read the current value through a closure without cloning the `Arc`.
    ///
    /// ```ignore
    /// let live = cell.read(|snapshot| snapshot.len());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.sender.borrow().value)
    }

    /// Subscribe to this cell.
    ///
    /// The current value counts as already seen: [`Subscription::changed`]
    /// resolves on the next publication.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish `value` if it differs from the current value.
    ///
    /// Returns true if a new version was published.
    pub fn publish(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        let published = self.sender.send_if_modified(|current| {
            if *current.value == value {
                return false;
            }
            current.version += 1;
            current.value = Arc::new(value);
            true
        });
        if published {
            tracing::trace!(cell = self.name, version = self.version(), "published");
        }
        published
    }

    /// Mutate the current value in place and publish it as a new version.
    ///
    /// The value is cloned first if any reader still holds the previous
    /// version, so readers never observe a partial update. Callers decide
    /// beforehand whether the mutation is a real change.
    pub fn update<F>(&self, f: F)
    where
        T: Clone,
        F: FnOnce(&mut T),
    {
        self.sender.send_modify(|current| {
            f(Arc::make_mut(&mut current.value));
            current.version += 1;
        });
        tracing::trace!(cell = self.name, version = self.version(), "published");
    }
}

impl<T> std::fmt::Debug for SharedCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCell")
            .field("name", &self.name)
            .field("version", &self.version())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Reader side of a shared output.
///
/// Cloning a subscription yields an independent reader that has seen the
/// same versions as the original.
pub struct Subscription<T> {
    receiver: watch::Receiver<Versioned<T>>,
}

impl<T> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
        }
    }
}

impl<T> Subscription<T> {
    /// Latest published value, available synchronously
    #[must_use]
    pub fn current(&self) -> Versioned<T> {
        self.receiver.borrow().clone()
    }

    /// Latest published value, marking it as seen
    pub fn mark_seen(&mut self) -> Versioned<T> {
        self.receiver.borrow_and_update().clone()
    }

    /// Whether a version newer than the last seen one has been published
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ChannelClosed`] if the owning store was dropped.
    pub fn has_changed(&self) -> Result<bool, StoreError> {
        self.receiver
            .has_changed()
            .map_err(|_| StoreError::ChannelClosed)
    }

    /// Wait for the next publication and return it.
    ///
    /// Intermediate versions published while the subscriber was not polling
    /// are skipped; the latest one is returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ChannelClosed`] if the owning store was dropped.
    pub async fn changed(&mut self) -> Result<Versioned<T>, StoreError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        Ok(self.mark_seen())
    }

    /// Turn the subscription into a stream that yields the current value
    /// first and then every later publication.
    ///
    /// The stream ends when the owning store is dropped.
    pub fn into_stream(self) -> impl Stream<Item = Versioned<T>> {
        futures::stream::unfold((self, true), |(mut subscription, first)| async move {
            if first {
                let current = subscription.mark_seen();
                return Some((current, (subscription, false)));
            }
            match subscription.changed().await {
                Ok(next) => Some((next, (subscription, false))),
                Err(_) => None,
            }
        })
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("version", &self.receiver.borrow().version)
            .finish()
    }
}
