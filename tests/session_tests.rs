//! Session behavior: status transitions, autosave policy, clock and restore.

use std::{sync::Arc, time::Duration};

use minesweeper_engine::{
    Board, CellStatus, GameParams, GameSession, GameStatus, SessionEvent,
    storage::{BlobStore, FileStore, MemoryStore, SAVE_SLOT, StorageManager},
};
use tokio::time;

fn session_with(store: Arc<MemoryStore>) -> GameSession<Arc<MemoryStore>> {
    GameSession::new(StorageManager::new(store))
}

fn board(rows: usize, cols: usize, mines: &[(usize, usize)]) -> Board {
    Board::from_mines(rows, cols, mines).unwrap()
}

#[tokio::test(start_paused = true)]
async fn new_game_starts_playing_and_is_saved() {
    let store = Arc::new(MemoryStore::new());
    let session = session_with(store.clone());

    session
        .start_new_game(GameParams::new(9, 9, 10), "ana")
        .await
        .unwrap();

    let game = session.state().await.unwrap();
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.rows(), 9);
    assert_eq!(game.mine_count(), 10);
    assert_eq!(game.elapsed_seconds(), 0);
    assert_eq!(game.flags_placed(), 0);
    assert!(!game.debug_visible());
    assert!(store.contains(SAVE_SLOT));
}

#[tokio::test(start_paused = true)]
async fn invalid_parameters_are_rejected() {
    let session = session_with(Arc::new(MemoryStore::new()));

    assert!(session.start_new_game(GameParams::new(2, 2, 4), "ana").await.is_err());
    assert!(session.state().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn hitting_a_mine_loses_and_clears_the_save() {
    let store = Arc::new(MemoryStore::new());
    let session = session_with(store.clone());
    session
        .start_game_with_board(board(3, 3, &[(0, 0), (2, 2)]), "ana")
        .await;
    session.on_click(4).await;
    assert!(session.has_saved_game());

    session.on_click(0).await;

    let game = session.state().await.unwrap();
    assert_eq!(game.status(), GameStatus::Lost);
    assert!(game.cells()[0].is_revealed());
    assert!(game.cells()[8].is_revealed());
    assert_eq!(game.cells()[1].status, CellStatus::Hidden);
    assert!(!session.has_saved_game());

    // Nothing after the loss writes the slot again.
    session.on_long_click(1).await;
    session.on_click(1).await;
    session.suspend().await;
    assert!(!session.has_saved_game());
    assert_eq!(session.state().await.unwrap(), game);
}

#[tokio::test(start_paused = true)]
async fn winning_clears_the_save() {
    let session = session_with(Arc::new(MemoryStore::new()));
    session
        .start_game_with_board(board(3, 3, &[(2, 2)]), "ana")
        .await;
    session.on_long_click(8).await;
    assert!(session.has_saved_game());

    session.on_click(0).await;

    let game = session.state().await.unwrap();
    assert_eq!(game.status(), GameStatus::Won);
    assert_eq!(game.revealed_safe_count(), 8);
    assert!(!session.has_saved_game());

    time::sleep(Duration::from_secs(5)).await;
    assert_eq!(session.state().await.unwrap(), game);
}

#[tokio::test(start_paused = true)]
async fn mine_as_first_click_loses_and_clears_the_save() {
    let session = session_with(Arc::new(MemoryStore::new()));
    session
        .start_game_with_board(board(3, 3, &[(1, 1)]), "ana")
        .await;
    assert!(session.has_saved_game());

    session.on_click(4).await;

    let game = session.state().await.unwrap();
    assert_eq!(game.status(), GameStatus::Lost);
    assert!(game.cells()[4].is_revealed());
    assert_eq!(game.revealed_safe_count(), 0);
    assert!(!session.has_saved_game());
}

#[tokio::test(start_paused = true)]
async fn every_playing_action_is_autosaved() {
    let store = Arc::new(MemoryStore::new());
    let session = session_with(store.clone());
    let manager = StorageManager::new(store.clone());
    session
        .start_game_with_board(board(4, 4, &[(0, 0), (3, 3)]), "ana")
        .await;

    session.on_long_click(0).await;
    let saved = manager.load().unwrap();
    assert_eq!(saved.cells[0].status, CellStatus::Flagged);

    session.on_click(1).await;
    let saved = manager.load().unwrap();
    assert_eq!(saved.cells[1].status, CellStatus::Revealed);
    assert_eq!(saved, session.state().await.unwrap().to_snapshot());
}

#[tokio::test(start_paused = true)]
async fn ignored_intents_do_not_save() {
    let store = Arc::new(MemoryStore::new());
    let session = session_with(store.clone());
    session
        .start_game_with_board(board(3, 3, &[(0, 0)]), "ana")
        .await;
    session.on_long_click(0).await;
    store.remove(SAVE_SLOT).unwrap();

    session.on_click(0).await;
    session.toggle_debug_visibility().await;

    assert!(!store.contains(SAVE_SLOT));
    assert!(session.state().await.unwrap().debug_visible());
}

#[tokio::test(start_paused = true)]
async fn clock_counts_while_playing_and_freezes_on_loss() {
    let session = session_with(Arc::new(MemoryStore::new()));
    session
        .start_game_with_board(board(3, 3, &[(0, 0)]), "ana")
        .await;

    time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(session.state().await.unwrap().elapsed_seconds(), 2);

    session.on_click(0).await;
    time::sleep(Duration::from_secs(5)).await;

    let game = session.state().await.unwrap();
    assert_eq!(game.status(), GameStatus::Lost);
    assert_eq!(game.elapsed_seconds(), 2);
}

#[tokio::test(start_paused = true)]
async fn new_game_replaces_the_running_clock() {
    let session = session_with(Arc::new(MemoryStore::new()));
    session
        .start_game_with_board(board(3, 3, &[(0, 0)]), "ana")
        .await;
    time::sleep(Duration::from_millis(2500)).await;

    session
        .start_game_with_board(board(3, 3, &[(1, 1)]), "ben")
        .await;
    time::sleep(Duration::from_millis(1500)).await;

    let game = session.state().await.unwrap();
    assert_eq!(game.username(), "ben");
    assert_eq!(game.elapsed_seconds(), 1);
}

#[tokio::test(start_paused = true)]
async fn load_restores_flags_and_resumes_the_clock() {
    let store = Arc::new(MemoryStore::new());
    {
        let session = session_with(store.clone());
        session
            .start_game_with_board(board(4, 4, &[(0, 0), (3, 3)]), "ana")
            .await;
        time::sleep(Duration::from_millis(3500)).await;
        session.on_long_click(0).await;
        session.on_long_click(5).await;
        session.on_click(1).await;
        session.toggle_debug_visibility().await;
    }

    let session = session_with(store);
    assert!(session.load_session().await);

    let game = session.state().await.unwrap();
    assert_eq!(game.username(), "ana");
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.elapsed_seconds(), 3);
    assert_eq!(game.flags_placed(), 2);
    assert!(game.cells()[1].is_revealed());
    assert!(!game.debug_visible());

    time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(session.state().await.unwrap().elapsed_seconds(), 5);
}

#[tokio::test(start_paused = true)]
async fn suspend_keeps_the_exact_elapsed_time() {
    let store = Arc::new(MemoryStore::new());
    let session = session_with(store.clone());
    session
        .start_game_with_board(board(3, 3, &[(0, 0)]), "ana")
        .await;
    time::sleep(Duration::from_millis(4500)).await;

    session.suspend().await;
    time::sleep(Duration::from_secs(3)).await;

    assert_eq!(session.state().await.unwrap().elapsed_seconds(), 4);
    let saved = StorageManager::new(store).load().unwrap();
    assert_eq!(saved.elapsed_seconds, 4);
}

#[tokio::test(start_paused = true)]
async fn playing_after_suspend_restarts_the_clock() {
    let store = Arc::new(MemoryStore::new());
    let session = session_with(store.clone());
    session
        .start_game_with_board(board(4, 4, &[(0, 0), (3, 3)]), "ana")
        .await;
    time::sleep(Duration::from_millis(2500)).await;
    session.suspend().await;

    session.on_long_click(5).await;
    time::sleep(Duration::from_millis(10_500)).await;

    let game = session.state().await.unwrap();
    assert_eq!(game.status(), GameStatus::Playing);
    assert!(game.cells()[5].is_flagged());
    assert_eq!(game.elapsed_seconds(), 12);
}

#[tokio::test(start_paused = true)]
async fn reloading_over_a_running_clock_counts_once_per_second() {
    let session = session_with(Arc::new(MemoryStore::new()));
    session
        .start_game_with_board(board(4, 4, &[(0, 0), (3, 3)]), "ana")
        .await;
    time::sleep(Duration::from_millis(2500)).await;
    session.on_long_click(5).await;
    time::sleep(Duration::from_secs(1)).await;
    assert_eq!(session.state().await.unwrap().elapsed_seconds(), 3);

    assert!(session.load_session().await);
    assert_eq!(session.state().await.unwrap().elapsed_seconds(), 2);

    time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(session.state().await.unwrap().elapsed_seconds(), 5);
}

#[tokio::test(start_paused = true)]
async fn missing_or_corrupt_save_loads_nothing() {
    let store = Arc::new(MemoryStore::new());
    let session = session_with(store.clone());
    assert!(!session.load_session().await);

    store.put(SAVE_SLOT, "not json at all").unwrap();
    assert!(!session.load_session().await);

    let mut snapshot = {
        let other = session_with(Arc::new(MemoryStore::new()));
        other
            .start_game_with_board(board(3, 3, &[(0, 0)]), "ana")
            .await;
        other.state().await.unwrap().to_snapshot()
    };
    snapshot.cells.pop();
    store
        .put(SAVE_SLOT, &serde_json::to_string(&snapshot).unwrap())
        .unwrap();
    assert!(!session.load_session().await);
    assert!(session.state().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn events_describe_each_change() {
    let session = session_with(Arc::new(MemoryStore::new()));
    let mut events = session.subscribe_to_events().await;

    session
        .start_game_with_board(board(3, 3, &[(0, 0)]), "ana")
        .await;
    session.on_long_click(4).await;
    session.toggle_debug_visibility().await;
    time::sleep(Duration::from_millis(1500)).await;
    session.on_click(0).await;

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    assert_eq!(
        received,
        vec![
            SessionEvent::GameStarted {
                rows: 3,
                cols: 3,
                mines: 1
            },
            SessionEvent::BoardUpdated { changed: vec![4] },
            SessionEvent::DebugToggled { visible: true },
            SessionEvent::Tick { elapsed_seconds: 1 },
            SessionEvent::BoardUpdated { changed: vec![0] },
            SessionEvent::StatusChanged {
                status: GameStatus::Lost
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn file_backed_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let session = GameSession::new(StorageManager::new(FileStore::new(dir.path())));
        session
            .start_game_with_board(board(5, 5, &[(4, 4)]), "ana")
            .await;
        session.on_long_click(24).await;
    }

    let session = GameSession::new(StorageManager::new(FileStore::new(dir.path())));
    assert!(session.has_saved_game());
    assert!(session.load_session().await);
    assert_eq!(session.state().await.unwrap().flags_placed(), 1);

    session.on_click(0).await;
    assert_eq!(session.state().await.unwrap().status(), GameStatus::Won);
    assert!(!session.has_saved_game());
}
