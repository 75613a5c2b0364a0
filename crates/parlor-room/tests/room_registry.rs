//! Integration tests for the shared room registry using a mock game.

use std::collections::HashSet;
use std::time::Duration;

use parlor_protocol::{GameKind, RoomId, RoomStatus, SessionToken, Slot};
use parlor_room::{
    GameEngine, MoveRejected, RoomConfig, RoomError, RoomRegistry,
    spawn_sweeper,
};
use parlor_session::IdSpace;
use serde::Serialize;
use tokio::task::JoinSet;

// =========================================================================
// Mock game: each seat taps a counter; first to five taps wins. Each
// player only sees their own count, spectators see the total.
// =========================================================================

struct Tally;

#[derive(Debug, Clone, Default)]
struct TallyState {
    taps: [u32; 2],
}

#[derive(Debug, Serialize, PartialEq)]
enum TallyView {
    Mine(u32),
    Total(u32),
}

impl GameEngine for Tally {
    const KIND: GameKind = GameKind::RockPaperScissor;
    type State = TallyState;
    type Move = ();
    type View = TallyView;

    fn initial_state() -> TallyState {
        TallyState::default()
    }

    fn apply_move(
        state: &TallyState,
        slot: Slot,
        _mv: (),
    ) -> Result<TallyState, MoveRejected> {
        let mut next = state.clone();
        next.taps[slot.index()] += 1;
        Ok(next)
    }

    fn is_terminal(state: &TallyState) -> bool {
        state.taps.iter().any(|t| *t >= 5)
    }

    fn view(state: &TallyState, viewer: Option<Slot>) -> TallyView {
        match viewer {
            Some(slot) => TallyView::Mine(state.taps[slot.index()]),
            None => TallyView::Total(state.taps.iter().sum()),
        }
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn tok(s: &str) -> SessionToken {
    SessionToken::new(s)
}

fn registry() -> RoomRegistry<Tally> {
    RoomRegistry::new(RoomConfig::for_tests())
}

// =========================================================================
// Room protocol
// =========================================================================

#[tokio::test]
async fn test_create_join_third_join_rejected() {
    let reg = registry();

    let ticket = reg.create(tok("alice")).await.unwrap();
    assert_eq!(ticket.status, RoomStatus::Waiting);
    let room_id = ticket.room_id;

    let joined = reg.join(&room_id, tok("bob")).await.unwrap();
    assert_eq!(joined.slot, Slot::Player2);
    assert_eq!(joined.status, RoomStatus::Active);

    let third = reg.join(&room_id, tok("carol")).await;
    assert!(matches!(third, Err(RoomError::RoomFull(_))));
}

#[tokio::test]
async fn test_resolve_slot_unknown_token_is_none() {
    let reg = registry();
    let room_id = reg.create(tok("alice")).await.unwrap().room_id;
    reg.join(&room_id, tok("bob")).await.unwrap();

    assert_eq!(reg.resolve_slot(&room_id, &tok("alice")).await, Some(Slot::Player1));
    assert_eq!(reg.resolve_slot(&room_id, &tok("bob")).await, Some(Slot::Player2));
    assert_eq!(reg.resolve_slot(&room_id, &tok("mallory")).await, None);
    assert_eq!(reg.resolve_slot(&RoomId::new("x"), &tok("alice")).await, None);
}

#[tokio::test]
async fn test_view_is_filtered_by_slot() {
    let reg = registry();
    let room_id = reg.create(tok("alice")).await.unwrap().room_id;
    reg.join(&room_id, tok("bob")).await.unwrap();

    reg.play(&room_id, &tok("alice"), ()).await.unwrap();
    reg.play(&room_id, &tok("alice"), ()).await.unwrap();
    reg.play(&room_id, &tok("bob"), ()).await.unwrap();

    let alice = reg.view(&room_id, &tok("alice")).await.unwrap();
    let bob = reg.view(&room_id, &tok("bob")).await.unwrap();
    let spectator = reg.view(&room_id, &tok("eve")).await.unwrap();

    assert_eq!(alice.game, TallyView::Mine(2));
    assert_eq!(bob.game, TallyView::Mine(1));
    assert_eq!(spectator.game, TallyView::Total(3));
    assert_eq!(spectator.slot, None);
}

#[tokio::test]
async fn test_play_to_the_end_marks_room_finished() {
    let reg = RoomRegistry::<Tally>::new(RoomConfig {
        finished_grace: Duration::from_secs(30),
        ..RoomConfig::for_tests()
    });
    let room_id = reg.create(tok("alice")).await.unwrap().room_id;
    reg.join(&room_id, tok("bob")).await.unwrap();

    let mut last = None;
    for _ in 0..5 {
        last = Some(reg.play(&room_id, &tok("bob"), ()).await.unwrap());
    }

    assert!(last.unwrap().finished);
    let room = reg.room(&room_id).await.unwrap();
    assert!(room.is_finished());
    assert!(room.expire() <= room.created() + Duration::from_secs(31));
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_fill_player2_exactly_once() {
    let reg = registry();
    let room_id = reg.create(tok("host")).await.unwrap().room_id;

    let mut set = JoinSet::new();
    for i in 0..32 {
        let reg = reg.clone();
        let room_id = room_id.clone();
        set.spawn(async move { reg.join(&room_id, tok(&format!("guest-{i}"))).await });
    }

    let mut seated = 0;
    let mut full = 0;
    while let Some(result) = set.join_next().await {
        match result.unwrap() {
            Ok(ticket) => {
                assert_eq!(ticket.slot, Slot::Player2);
                seated += 1;
            }
            Err(RoomError::RoomFull(_)) => full += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(seated, 1, "player2 must be filled exactly once");
    assert_eq!(full, 31);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_ids() {
    // A small space makes collisions between concurrent creators likely.
    let reg = RoomRegistry::<Tally>::new(RoomConfig {
        id_space: IdSpace::Decimal { upper: 256 },
        max_id_attempts: 10_000,
        ..RoomConfig::for_tests()
    });

    let mut set = JoinSet::new();
    for i in 0..128 {
        let reg = reg.clone();
        set.spawn(async move { reg.create(tok(&format!("host-{i}"))).await });
    }

    let mut ids = HashSet::new();
    while let Some(result) = set.join_next().await {
        let ticket = result.unwrap().unwrap();
        assert!(ids.insert(ticket.room_id), "duplicate room id issued");
    }

    assert_eq!(ids.len(), 128);
    assert_eq!(reg.len().await, 128);
    assert!(reg.is_consistent().await);
}

// =========================================================================
// Expiry
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_lazy_sweep_on_access_removes_expired_room() {
    let reg = RoomRegistry::<Tally>::new(RoomConfig {
        ttl: Duration::from_secs(5),
        ..RoomConfig::for_tests()
    });
    let room_id = reg.create(tok("alice")).await.unwrap().room_id;
    assert!(reg.exists(&room_id).await);

    tokio::time::advance(Duration::from_secs(5)).await;

    assert!(!reg.exists(&room_id).await);
    assert_eq!(reg.len().await, 0, "access should have swept the room");
    assert_eq!(reg.state_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_zero_ttl_room_is_swept_immediately() {
    let reg = RoomRegistry::<Tally>::new(RoomConfig {
        ttl: Duration::ZERO,
        ..RoomConfig::for_tests()
    });
    let room_id = reg.create(tok("alice")).await.unwrap().room_id;

    let swept = reg.sweep().await;

    assert_eq!(swept, vec![room_id.clone()]);
    assert!(!reg.exists(&room_id).await);
    assert!(reg.is_consistent().await);
}

#[tokio::test(start_paused = true)]
async fn test_expired_room_cannot_be_joined() {
    let reg = RoomRegistry::<Tally>::new(RoomConfig {
        ttl: Duration::from_secs(5),
        ..RoomConfig::for_tests()
    });
    let room_id = reg.create(tok("alice")).await.unwrap().room_id;

    tokio::time::advance(Duration::from_secs(6)).await;

    let result = reg.join(&room_id, tok("bob")).await;
    assert!(matches!(result, Err(RoomError::NotFound(_))));
}

/// Rooms live 5s; reads sweep at most once an hour.
fn throttled_registry() -> RoomRegistry<Tally> {
    RoomRegistry::new(RoomConfig {
        ttl: Duration::from_secs(5),
        sweep_throttle: Duration::from_secs(3600),
        ..RoomConfig::for_tests()
    })
}

#[tokio::test(start_paused = true)]
async fn test_create_sweeps_expired_rooms_despite_throttle() {
    let reg = throttled_registry();
    reg.create(tok("alice")).await.unwrap();

    tokio::time::advance(Duration::from_secs(5)).await;
    reg.create(tok("bob")).await.unwrap();

    assert_eq!(reg.len().await, 1);
    assert_eq!(reg.state_count().await, 1);
    assert!(reg.is_consistent().await);
}

#[tokio::test(start_paused = true)]
async fn test_join_sweeps_expired_rooms_despite_throttle() {
    let reg = throttled_registry();
    let stale = reg.create(tok("alice")).await.unwrap().room_id;

    tokio::time::advance(Duration::from_secs(5)).await;
    let result = reg.join(&stale, tok("bob")).await;

    assert!(matches!(result, Err(RoomError::NotFound(_))));
    assert_eq!(reg.len().await, 0);
    assert_eq!(reg.state_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_reads_hide_expired_room_before_it_is_swept() {
    let reg = throttled_registry();
    let room_id = reg.create(tok("alice")).await.unwrap().room_id;
    reg.join(&room_id, tok("bob")).await.unwrap();

    tokio::time::advance(Duration::from_secs(5)).await;

    assert!(!reg.exists(&room_id).await);
    assert_eq!(reg.resolve_slot(&room_id, &tok("alice")).await, None);
    assert!(matches!(
        reg.wait(&room_id, &tok("alice")).await,
        Err(RoomError::NotFound(_))
    ));
    assert!(matches!(
        reg.view(&room_id, &tok("bob")).await,
        Err(RoomError::NotFound(_))
    ));
    assert!(reg.room(&room_id).await.is_none());
    assert_eq!(reg.len().await, 1, "reads are throttled and leave it held");

    let played = reg.play(&room_id, &tok("alice"), ()).await;
    assert!(matches!(played, Err(RoomError::NotFound(_))));
    assert_eq!(reg.len().await, 0, "the write swept it");
}

#[tokio::test(start_paused = true)]
async fn test_background_sweeper_reclaims_rooms_without_access() {
    let reg = RoomRegistry::<Tally>::new(RoomConfig {
        ttl: Duration::from_secs(5),
        // Keep lazy sweeps out of the way.
        sweep_throttle: Duration::from_secs(3600),
        ..RoomConfig::default()
    });
    reg.create(tok("alice")).await.unwrap();
    reg.create(tok("bob")).await.unwrap();

    let sweeper = spawn_sweeper(reg.clone(), Duration::from_secs(1));
    tokio::time::sleep(Duration::from_secs(7)).await;

    assert_eq!(reg.len().await, 0);
    assert_eq!(reg.state_count().await, 0);
    assert!(!sweeper.is_finished());
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_abort_stops_task() {
    let reg = registry();
    let sweeper = spawn_sweeper(reg.clone(), Duration::from_secs(1));
    sweeper.abort();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(sweeper.is_finished());
}
