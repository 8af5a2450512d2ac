//! Integration tests for the store pipeline
//!
//! Drives a generic `Store` with a small session domain: sessions open,
//! receive heartbeats and close. Each session is one partition.

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use streamstore_core::effect::Effect;
use streamstore_core::environment::IdGenerator;
use streamstore_core::partition::{Intent, KeyedReducer, Partitioned};
use streamstore_core::projection::Projection;
use streamstore_core::reducer::Reducer;
use streamstore_runtime::{Change, ProjectionCell, Snapshot, Store, StoreConfig};
use streamstore_testing::{assertions, init_test_tracing, ReducerTest, StepIdGenerator};

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionEvent {
    Open { id: u64, user: String },
    Beat { id: u64 },
    Close { id: u64 },
}

impl Partitioned for SessionEvent {
    type Key = u64;

    fn partition_key(&self) -> u64 {
        match self {
            Self::Open { id, .. } | Self::Beat { id } | Self::Close { id } => *id,
        }
    }

    fn opens_partition(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open",
            Self::Beat { .. } => "beat",
            Self::Close { .. } => "close",
        }
    }
}

#[derive(Debug, Clone)]
enum SessionIntent {
    Open(String),
    Beat(u64),
    Close(u64),
}

impl Intent for SessionIntent {
    type Event = SessionEvent;

    fn into_event(self, ids: &dyn IdGenerator) -> SessionEvent {
        match self {
            Self::Open(user) => SessionEvent::Open {
                id: ids.next_id(),
                user,
            },
            Self::Beat(id) => SessionEvent::Beat { id },
            Self::Close(id) => SessionEvent::Close { id },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Session {
    user: String,
    beats: u32,
}

/// Caps heartbeats per session
struct SessionEnv {
    max_beats: u32,
}

struct SessionReducer;

impl Reducer for SessionReducer {
    type State = Session;
    type Action = SessionEvent;
    type Environment = SessionEnv;

    fn reduce(&self, session: &mut Session, event: SessionEvent, env: &SessionEnv) -> Effect {
        match event {
            SessionEvent::Open { user, .. } => {
                session.user = user;
                Effect::None
            },
            SessionEvent::Beat { .. } => {
                session.beats = (session.beats + 1).min(env.max_beats);
                Effect::None
            },
            SessionEvent::Close { .. } => Effect::Complete,
        }
    }
}

impl KeyedReducer for SessionReducer {
    fn seed(&self, _id: &u64) -> Session {
        Session::default()
    }
}

struct TotalBeats;

impl Projection for TotalBeats {
    type Input = Snapshot<u64, Session>;
    type Output = u32;

    fn name(&self) -> &'static str {
        "total_beats"
    }

    fn project(&self, snapshot: &Snapshot<u64, Session>) -> u32 {
        snapshot.values().map(|session| session.beats).sum()
    }
}

fn store(max_beats: u32) -> Store<SessionIntent, SessionReducer> {
    init_test_tracing();
    Store::new(SessionReducer, SessionEnv { max_beats })
}

#[test]
fn test_reducer_caps_beats() {
    ReducerTest::new(SessionReducer)
        .with_env(SessionEnv { max_beats: 2 })
        .given_state(Session::default())
        .when_actions([
            SessionEvent::Beat { id: 0 },
            SessionEvent::Beat { id: 0 },
            SessionEvent::Beat { id: 0 },
        ])
        .then_state(|session| {
            assert_eq!(session.beats, 2);
        })
        .then_effects(assertions::assert_continues)
        .run();
}

#[test]
fn test_full_lifecycle() {
    let mut store = store(10);

    let open = store.send(SessionIntent::Open("ada".into()));
    store.send(SessionIntent::Beat(open.key));
    store.send(SessionIntent::Beat(open.key));

    assert_eq!(
        store.state(|s| s.get(&open.key).cloned()),
        Some(Session {
            user: "ada".into(),
            beats: 2,
        })
    );

    let close = store.send(SessionIntent::Close(open.key));
    assert_eq!(close.change, Change::Closed);
    assert_eq!(store.live_partitions(), 0);
    assert!(store.snapshot().is_empty());
}

#[test]
fn test_capped_update_is_unchanged() {
    let mut store = store(1);
    let open = store.send(SessionIntent::Open("bob".into()));

    assert_eq!(store.send(SessionIntent::Beat(open.key)).change, Change::Updated);
    assert_eq!(store.send(SessionIntent::Beat(open.key)).change, Change::Unchanged);
    assert_eq!(store.snapshot().version, 2);
}

#[test]
fn test_closed_session_cannot_come_back() {
    let mut store = store(10);
    let open = store.send(SessionIntent::Open("cy".into()));
    store.send(SessionIntent::Close(open.key));

    assert_eq!(store.send(SessionIntent::Beat(open.key)).change, Change::Unrouted);
    assert_eq!(store.send(SessionIntent::Close(open.key)).change, Change::Unrouted);

    let reopened = store.send(SessionIntent::Open("cy".into()));
    assert_ne!(reopened.key, open.key);
}

#[test]
fn test_projection_follows_snapshot() {
    let mut store = store(10);
    let beats = store.state(|s| ProjectionCell::new(TotalBeats, s));

    let a = store.send(SessionIntent::Open("a".into())).key;
    let b = store.send(SessionIntent::Open("b".into())).key;
    for id in [a, b, b] {
        store.send(SessionIntent::Beat(id));
        store.state(|s| beats.refresh(s));
    }

    assert_eq!(*beats.current(), 3);
    assert_eq!(beats.current().version, 3);

    store.send(SessionIntent::Close(b));
    assert!(store.state(|s| beats.refresh(s)));
    assert_eq!(*beats.current(), 1);
}

#[test]
fn test_injected_id_generator() {
    let ids = Arc::new(StepIdGenerator::new(1000, 10));
    let mut store: Store<SessionIntent, SessionReducer> = Store::with_id_generator(
        SessionReducer,
        SessionEnv { max_beats: 1 },
        ids.clone(),
        &StoreConfig::default(),
    );

    let first = store.send(SessionIntent::Open("a".into()));
    let second = store.send(SessionIntent::Open("b".into()));

    assert_eq!((first.key, second.key), (1000, 1010));
    assert_eq!(ids.issued(), 2);
    assert_eq!(store.environment().max_beats, 1);
}

#[tokio::test]
async fn test_event_tap_on_another_task() {
    let mut store = store(10);
    let mut tap = store.subscribe_events();

    let reader = tokio::spawn(async move {
        let mut kinds = Vec::new();
        for _ in 0..3 {
            kinds.push(tap.next().await.unwrap().event.kind());
        }
        kinds
    });

    let open = store.send(SessionIntent::Open("a".into()));
    store.send(SessionIntent::Beat(open.key));
    store.send(SessionIntent::Close(open.key));

    assert_eq!(reader.await.unwrap(), vec!["open", "beat", "close"]);
}

fn intent_strategy() -> impl Strategy<Value = SessionIntent> {
    prop_oneof![
        "[a-z]{1,3}".prop_map(SessionIntent::Open),
        (0_u64..6).prop_map(SessionIntent::Beat),
        (0_u64..6).prop_map(SessionIntent::Close),
    ]
}

proptest! {
    #[test]
    fn snapshot_matches_live_partitions(
        intents in prop::collection::vec(intent_strategy(), 0..50)
    ) {
        let mut store = store(u32::MAX);
        let mut closed = Vec::new();
        let mut visible = 0_u64;

        for intent in intents {
            let outcome = store.send(intent);
            if outcome.change == Change::Closed {
                closed.push(outcome.key);
            }
            if outcome.change.is_visible() {
                visible += 1;
            }

            prop_assert_eq!(store.snapshot().len(), store.live_partitions());
            prop_assert_eq!(store.snapshot().version, visible);
        }

        let live: BTreeMap<u64, Session> = (*store.snapshot().value).clone();
        for id in closed {
            prop_assert!(!live.contains_key(&id));
        }
    }
}
