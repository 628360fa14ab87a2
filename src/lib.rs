pub mod config;
pub mod data;
pub mod error;
pub mod logic;
pub mod session;
pub mod storage;
pub mod ticker;

pub use data::Board;
pub use error::{GameError, StorageError};
pub use session::{GameSession, GameState, SessionEvent};

// Re-export common types for convenience
pub use minesweeper_common::{SessionSnapshot, models::*};
