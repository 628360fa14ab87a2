use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("board must have at least one row and one column, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("a board needs at least one mine")]
    NoMines,
    #[error("{mines} mines do not fit on a board of {cells} cells with a safe cell left")]
    TooManyMines { mines: usize, cells: usize },
    #[error("mine at ({row}, {col}) is outside the board")]
    InvalidCoords { row: usize, col: usize },
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
