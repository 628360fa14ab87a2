use minesweeper_common::{
    SessionSnapshot,
    models::{Cell, GameStatus},
};
use tracing::{debug, info};

use crate::{
    data::Board,
    error::{GameError, Result},
    logic::{FlagOutcome, RevealOutcome},
};

/// What a player intent did to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    /// Board changed and the game is still being played.
    Updated { changed: Vec<usize> },
    /// Board changed and the game reached `status`.
    Finished {
        changed: Vec<usize>,
        status: GameStatus,
    },
}

/// One game: the board plus everything the player sees around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    status: GameStatus,
    username: String,
    flags_placed: usize,
    elapsed_seconds: u64,
    debug_visible: bool,
}

impl GameState {
    pub fn new(board: Board, username: impl Into<String>) -> Self {
        Self {
            board,
            status: GameStatus::Playing,
            username: username.into(),
            flags_placed: 0,
            elapsed_seconds: 0,
            debug_visible: false,
        }
    }

    /// Restores a persisted game. The flag count is rederived from the cells.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self> {
        let board = Board::from_cells(
            snapshot.rows,
            snapshot.cols,
            snapshot.mine_count,
            snapshot.cells,
        )?;

        if snapshot.status == GameStatus::Playing {
            if board.is_complete() {
                return Err(GameError::CorruptSnapshot(
                    "game in progress has every safe cell revealed".to_string(),
                ));
            }
            if board.cells().iter().any(|cell| cell.is_mine && cell.is_revealed()) {
                return Err(GameError::CorruptSnapshot(
                    "game in progress has a revealed mine".to_string(),
                ));
            }
        }

        let flags_placed = board.flagged_count();

        Ok(Self {
            board,
            status: snapshot.status,
            username: snapshot.username,
            flags_placed,
            elapsed_seconds: snapshot.elapsed_seconds,
            debug_visible: false,
        })
    }

    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            username: self.username.clone(),
            rows: self.board.rows(),
            cols: self.board.cols(),
            mine_count: self.board.mine_count(),
            status: self.status,
            elapsed_seconds: self.elapsed_seconds,
            cells: self.board.cells().to_vec(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cells(&self) -> &[Cell] {
        self.board.cells()
    }

    pub fn rows(&self) -> usize {
        self.board.rows()
    }

    pub fn cols(&self) -> usize {
        self.board.cols()
    }

    pub fn mine_count(&self) -> usize {
        self.board.mine_count()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn flags_placed(&self) -> usize {
        self.flags_placed
    }

    /// Mines minus flags; negative once the player over-flags.
    pub fn mines_left(&self) -> isize {
        self.board.mine_count() as isize - self.flags_placed as isize
    }

    pub fn revealed_safe_count(&self) -> usize {
        self.board.revealed_safe_count()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn debug_visible(&self) -> bool {
        self.debug_visible
    }

    pub fn toggle_debug_visibility(&mut self) -> bool {
        self.debug_visible = !self.debug_visible;
        self.debug_visible
    }

    /// Advances the clock by one second. Returns false once the game is over.
    pub fn tick(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.elapsed_seconds += 1;
        true
    }

    pub fn click(&mut self, index: usize) -> Transition {
        if !self.is_playing() {
            debug!("Ignoring click on finished game at {}", index);
            return Transition::Ignored;
        }

        let mut changed = Vec::new();
        match self.board.reveal_tracked(index, &mut changed) {
            RevealOutcome::Unchanged => {
                debug!("Ignoring click on cell {}", index);
                Transition::Ignored
            }
            RevealOutcome::HitMine => {
                self.board.reveal_all_mines(&mut changed);
                // Flagged mines were just revealed.
                self.flags_placed = self.board.flagged_count();
                self.status = GameStatus::Lost;
                info!(
                    "{} hit a mine at cell {} after {}s",
                    self.username, index, self.elapsed_seconds
                );
                Transition::Finished {
                    changed,
                    status: GameStatus::Lost,
                }
            }
            RevealOutcome::Revealed if self.board.is_complete() => {
                self.status = GameStatus::Won;
                info!(
                    "{} cleared the board in {}s",
                    self.username, self.elapsed_seconds
                );
                Transition::Finished {
                    changed,
                    status: GameStatus::Won,
                }
            }
            RevealOutcome::Revealed => {
                debug!("Revealed {} cells from cell {}", changed.len(), index);
                Transition::Updated { changed }
            }
        }
    }

    pub fn long_click(&mut self, index: usize) -> Transition {
        if !self.is_playing() {
            debug!("Ignoring flag on finished game at {}", index);
            return Transition::Ignored;
        }

        let outcome = self.board.toggle_flag(index);
        if outcome == FlagOutcome::InvalidTransition {
            debug!("Ignoring flag on cell {}", index);
            return Transition::Ignored;
        }

        self.flags_placed = self.flags_placed.saturating_add_signed(outcome.flag_delta());
        Transition::Updated {
            changed: vec![index],
        }
    }
}
