use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum CellStatus {
    #[default]
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "revealed")]
    Revealed,
    #[serde(rename = "flagged")]
    Flagged,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    #[serde(rename = "playing")]
    Playing,
    #[serde(rename = "won")]
    Won,
    #[serde(rename = "lost")]
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Playing => "playing",
            Self::Won => "won",
            Self::Lost => "lost",
        })
    }
}

/// One grid position. `row` and `col` never change once the board is built;
/// `neighbor_mines` is only meaningful when `is_mine` is false.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub is_mine: bool,
    pub status: CellStatus,
    pub neighbor_mines: u8,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            is_mine: false,
            status: CellStatus::Hidden,
            neighbor_mines: 0,
        }
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.status, CellStatus::Revealed)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.status, CellStatus::Flagged)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct GameParams {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
}

impl GameParams {
    pub const fn new(rows: usize, cols: usize, mines: usize) -> Self {
        Self { rows, cols, mines }
    }
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            rows: 9,
            cols: 9,
            mines: 10,
        }
    }
}

/// Board presets offered by the menu, plus a free-form custom size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Custom { rows: usize, cols: usize, mines: usize },
}

impl Difficulty {
    pub const fn params(self) -> GameParams {
        match self {
            Self::Easy => GameParams::new(10, 8, 10),
            Self::Normal => GameParams::new(16, 10, 25),
            Self::Hard => GameParams::new(24, 12, 50),
            Self::Custom { rows, cols, mines } => GameParams::new(rows, cols, mines),
        }
    }
}

impl From<Difficulty> for GameParams {
    fn from(value: Difficulty) -> Self {
        value.params()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown difficulty {0:?}, expected easy, normal, hard or ROWSxCOLSxMINES")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "easy" => return Ok(Self::Easy),
            "normal" => return Ok(Self::Normal),
            "hard" => return Ok(Self::Hard),
            _ => {}
        }

        let parts: Vec<usize> = lowered
            .split('x')
            .map(|part| part.parse::<usize>())
            .collect::<Result<_, _>>()
            .map_err(|_| ParseDifficultyError(s.to_string()))?;

        match parts.as_slice() {
            &[rows, cols, mines] => Ok(Self::Custom { rows, cols, mines }),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}
