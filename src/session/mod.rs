//! The player-facing game session.
//!
//! All state sits behind one async mutex; each public operation takes it
//! exactly once. The elapsed-time clock is a [`Ticker`] that checks the same
//! lock before every increment, so no tick can land after the game ends or
//! after the session moves on to another game.

mod state;

use std::{
    ops::ControlFlow,
    sync::{Arc, Weak},
    time::Duration,
};

use minesweeper_common::models::{GameParams, GameStatus};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, instrument, warn};

pub use state::{GameState, Transition};

use crate::{
    data::Board,
    error::Result,
    logic,
    storage::{BlobStore, StorageManager},
    ticker::Ticker,
};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Change notifications for whoever renders the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    GameStarted {
        rows: usize,
        cols: usize,
        mines: usize,
    },
    GameRestored {
        status: GameStatus,
        elapsed_seconds: u64,
    },
    /// Indices of every cell whose status changed.
    BoardUpdated { changed: Vec<usize> },
    StatusChanged { status: GameStatus },
    Tick { elapsed_seconds: u64 },
    DebugToggled { visible: bool },
}

struct Inner {
    game: Option<GameState>,
    /// Bumped whenever the running clock must stop counting.
    generation: u64,
    ticker: Option<Ticker>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl Inner {
    fn emit(&self, event: SessionEvent) {
        if let Some(ref sender) = self.events {
            let _ = sender.send(event);
        }
    }

    fn stop_ticker(&mut self) {
        self.generation += 1;
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn tick(&mut self, generation: u64) -> ControlFlow<()> {
        if self.generation != generation {
            return ControlFlow::Break(());
        }

        let Some(game) = self.game.as_mut() else {
            return ControlFlow::Break(());
        };
        if !game.tick() {
            return ControlFlow::Break(());
        }

        let elapsed_seconds = game.elapsed_seconds();
        self.emit(SessionEvent::Tick { elapsed_seconds });
        ControlFlow::Continue(())
    }
}

pub struct GameSession<B> {
    inner: Arc<Mutex<Inner>>,
    storage: StorageManager<B>,
    tick_period: Duration,
}

impl<B: BlobStore> GameSession<B> {
    pub fn new(storage: StorageManager<B>) -> Self {
        Self::with_tick_period(storage, DEFAULT_TICK_PERIOD)
    }

    pub fn with_tick_period(storage: StorageManager<B>, tick_period: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                game: None,
                generation: 0,
                ticker: None,
                events: None,
            })),
            storage,
            tick_period,
        }
    }

    /// Subscribe to session events. Replaces any previous subscriber.
    pub async fn subscribe_to_events(&self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.inner.lock().await.events = Some(sender);
        receiver
    }

    /// Current game, if any, as an owned copy.
    pub async fn state(&self) -> Option<GameState> {
        self.inner.lock().await.game.clone()
    }

    pub fn has_saved_game(&self) -> bool {
        self.storage.exists()
    }

    /// Generates a fresh board and starts playing it.
    #[instrument(level = "trace", skip(self, params))]
    pub async fn start_new_game(&self, params: impl Into<GameParams>, username: &str) -> Result<()> {
        let params = params.into();
        let board = logic::generate(&params)?;
        self.start_game_with_board(board, username).await;
        Ok(())
    }

    /// Starts playing a caller-built board.
    #[instrument(level = "trace", skip(self, board))]
    pub async fn start_game_with_board(&self, board: Board, username: &str) {
        let mut inner = self.inner.lock().await;
        inner.stop_ticker();

        info!(
            "Starting new game for {}: {}x{} with {} mines",
            username,
            board.rows(),
            board.cols(),
            board.mine_count()
        );

        let event = SessionEvent::GameStarted {
            rows: board.rows(),
            cols: board.cols(),
            mines: board.mine_count(),
        };
        inner.game = Some(GameState::new(board, username));
        self.autosave(&inner);
        self.start_ticker(&mut inner);
        inner.emit(event);
    }

    /// Restores the saved session. Returns false when there is nothing usable
    /// to restore; the current game is then left untouched.
    #[instrument(level = "trace", skip(self))]
    pub async fn load_session(&self) -> bool {
        let Some(snapshot) = self.storage.load() else {
            debug!("No saved session to load");
            return false;
        };

        let game = match GameState::from_snapshot(snapshot) {
            Ok(game) => game,
            Err(e) => {
                warn!("Ignoring saved session: {}", e);
                return false;
            }
        };

        let mut inner = self.inner.lock().await;
        inner.stop_ticker();

        info!(
            "Restored {} game for {} at {}s with {} flags",
            game.status(),
            game.username(),
            game.elapsed_seconds(),
            game.flags_placed()
        );

        let event = SessionEvent::GameRestored {
            status: game.status(),
            elapsed_seconds: game.elapsed_seconds(),
        };
        inner.game = Some(game);
        self.start_ticker(&mut inner);
        inner.emit(event);
        true
    }

    /// Reveal intent (tap).
    #[instrument(level = "trace", skip(self))]
    pub async fn on_click(&self, index: usize) {
        let mut inner = self.inner.lock().await;
        let Some(game) = inner.game.as_mut() else {
            debug!("Ignoring click without a game");
            return;
        };
        let transition = game.click(index);
        self.apply(&mut inner, transition);
    }

    /// Flag intent (long press).
    #[instrument(level = "trace", skip(self))]
    pub async fn on_long_click(&self, index: usize) {
        let mut inner = self.inner.lock().await;
        let Some(game) = inner.game.as_mut() else {
            debug!("Ignoring flag without a game");
            return;
        };
        let transition = game.long_click(index);
        self.apply(&mut inner, transition);
    }

    /// Shows or hides mine locations. No effect on rules or on the saved game.
    pub async fn toggle_debug_visibility(&self) {
        let mut inner = self.inner.lock().await;
        let Some(game) = inner.game.as_mut() else {
            return;
        };
        let visible = game.toggle_debug_visibility();
        debug!("Debug visibility now {}", visible);
        inner.emit(SessionEvent::DebugToggled { visible });
    }

    /// Stops the clock and writes the game as it stands, so the exact elapsed
    /// time survives the process going away. The next accepted intent starts
    /// the clock again.
    #[instrument(level = "trace", skip(self))]
    pub async fn suspend(&self) {
        let mut inner = self.inner.lock().await;
        inner.stop_ticker();
        self.autosave(&inner);
    }

    fn apply(&self, inner: &mut Inner, transition: Transition) {
        match transition {
            Transition::Ignored => {}
            Transition::Updated { changed } => {
                self.autosave(inner);
                if inner.ticker.is_none() {
                    debug!("Resuming clock after suspend");
                    self.start_ticker(inner);
                }
                inner.emit(SessionEvent::BoardUpdated { changed });
            }
            Transition::Finished { changed, status } => {
                inner.stop_ticker();
                if let Err(e) = self.storage.clear() {
                    warn!("Failed to clear finished session: {}", e);
                }
                inner.emit(SessionEvent::BoardUpdated { changed });
                inner.emit(SessionEvent::StatusChanged { status });
            }
        }
    }

    fn autosave(&self, inner: &Inner) {
        if let Some(ref game) = inner.game
            && game.is_playing()
            && let Err(e) = self.storage.save(&game.to_snapshot())
        {
            warn!("Failed to save session: {}", e);
        }
    }

    fn start_ticker(&self, inner: &mut Inner) {
        if !inner.game.as_ref().is_some_and(GameState::is_playing) {
            return;
        }

        let generation = inner.generation;
        let shared: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        inner.ticker = Some(Ticker::start(self.tick_period, move || {
            let shared = shared.clone();
            async move {
                let Some(shared) = shared.upgrade() else {
                    return ControlFlow::Break(());
                };
                let mut inner = shared.lock().await;
                inner.tick(generation)
            }
        }));
    }
}
