use serde::{Deserialize, Serialize};

use crate::models::{Cell, GameStatus};

/// Everything needed to resume a session exactly. The flag count is not
/// stored; it is recomputed from `cells` on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub username: String,
    pub rows: usize,
    pub cols: usize,
    pub mine_count: usize,
    pub status: GameStatus,
    pub elapsed_seconds: u64,
    pub cells: Vec<Cell>,
}
