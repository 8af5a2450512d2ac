//! Event bus: merges intents into one tagged, ordered event stream.
//!
//! Every input of a store funnels through [`EventBus::publish`]. Publishing
//! tags the intent (drawing a fresh identity for creations), stamps it with
//! a sequence number, and fans it out synchronously:
//!
//! - the returned [`Envelope`] goes straight to the partition router
//! - a copy goes to every [`EventTap`] (external observers such as loggers
//!   or test probes)
//!
//! Sequence numbers follow call order, so the merged stream preserves the
//! order in which intents were submitted regardless of their kind.

use crate::error::StoreError;
use std::sync::Arc;
use streamstore_core::environment::IdGenerator;
use streamstore_core::partition::Intent;
use tokio::sync::broadcast;

/// A tagged event and its position in the merged stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<E> {
    /// Zero-based position in the merged stream
    pub sequence: u64,
    /// The tagged event
    pub event: E,
}

/// The merge point for all intents of a store.
pub struct EventBus<I>
where
    I: Intent,
{
    ids: Arc<dyn IdGenerator>,
    tap: broadcast::Sender<Envelope<I::Event>>,
    next_sequence: u64,
}

impl<I> EventBus<I>
where
    I: Intent,
    I::Event: Clone,
{
    /// Create a bus drawing identities from `ids`.
    ///
    /// `tap_capacity` bounds how many events a slow tap may fall behind
    /// before it starts losing events; it is raised to 1 if zero.
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, tap_capacity: usize) -> Self {
        let (tap, _) = broadcast::channel(tap_capacity.max(1));
        Self {
            ids,
            tap,
            next_sequence: 0,
        }
    }

    /// Merge an intent into the stream and return the tagged event.
    pub fn publish(&mut self, intent: I) -> Envelope<I::Event> {
        let envelope = Envelope {
            sequence: self.next_sequence,
            event: intent.into_event(self.ids.as_ref()),
        };
        self.next_sequence += 1;

        // Having no taps is normal; the router is the only required consumer.
        let _ = self.tap.send(envelope.clone());

        envelope
    }

    /// Observe every event merged from now on.
    #[must_use]
    pub fn tap(&self) -> EventTap<I::Event> {
        EventTap {
            receiver: self.tap.subscribe(),
        }
    }

    /// Number of events merged so far
    #[must_use]
    pub const fn published(&self) -> u64 {
        self.next_sequence
    }
}

/// External observer of the merged event stream.
pub struct EventTap<E> {
    receiver: broadcast::Receiver<Envelope<E>>,
}

impl<E> EventTap<E>
where
    E: Clone,
{
    /// Take the next buffered event without waiting.
    ///
    /// Returns `Ok(None)` when the tap has caught up.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Lagged`]: the tap fell behind and events were dropped;
    ///   the next call resumes with the oldest retained event
    /// - [`StoreError::ChannelClosed`]: the store was dropped and the buffer is drained
    pub fn try_next(&mut self) -> Result<Option<Envelope<E>>, StoreError> {
        match self.receiver.try_recv() {
            Ok(envelope) => Ok(Some(envelope)),
            Err(broadcast::error::TryRecvError::Empty) => Ok(None),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event tap lagged");
                Err(StoreError::Lagged { skipped })
            },
            Err(broadcast::error::TryRecvError::Closed) => Err(StoreError::ChannelClosed),
        }
    }

    /// Wait for the next event.
    ///
    /// # Errors
    ///
    /// Same as [`EventTap::try_next`].
    pub async fn next(&mut self) -> Result<Envelope<E>, StoreError> {
        match self.receiver.recv().await {
            Ok(envelope) => Ok(envelope),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event tap lagged");
                Err(StoreError::Lagged { skipped })
            },
            Err(broadcast::error::RecvError::Closed) => Err(StoreError::ChannelClosed),
        }
    }

    /// Drain every buffered event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Lagged`] if events were lost before draining.
    pub fn drain(&mut self) -> Result<Vec<Envelope<E>>, StoreError> {
        let mut events = Vec::new();
        loop {
            match self.try_next() {
                Ok(Some(envelope)) => events.push(envelope),
                Ok(None) | Err(StoreError::ChannelClosed) => return Ok(events),
                Err(error) => return Err(error),
            }
        }
    }
}
