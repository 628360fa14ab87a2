use minesweeper_common::models::GameParams;
use rand::Rng;
use tracing::{debug, instrument};

use crate::{
    data::Board,
    error::{GameError, Result},
};

pub fn validate_params(params: &GameParams) -> Result<usize> {
    if params.rows == 0 || params.cols == 0 {
        return Err(GameError::InvalidDimensions {
            rows: params.rows,
            cols: params.cols,
        });
    }

    let cells = params
        .rows
        .checked_mul(params.cols)
        .ok_or(GameError::InvalidDimensions {
            rows: params.rows,
            cols: params.cols,
        })?;

    if params.mines == 0 {
        return Err(GameError::NoMines);
    }
    if params.mines >= cells {
        return Err(GameError::TooManyMines {
            mines: params.mines,
            cells,
        });
    }

    Ok(cells)
}

/// Generates a board with uniformly random mine placement using the thread rng.
pub fn generate(params: &GameParams) -> Result<Board> {
    generate_with_rng(params, &mut rand::rng())
}

/// Picks `params.mines` distinct cells by rejection sampling. The first click
/// is not protected; any cell may hold a mine.
#[instrument(level = "trace", skip(rng))]
pub fn generate_with_rng<R: Rng + ?Sized>(params: &GameParams, rng: &mut R) -> Result<Board> {
    let cells = validate_params(params)?;
    let mut mask = vec![false; cells];

    let mut placed = 0;
    let mut draws = 0usize;
    while placed < params.mines {
        let index = rng.random_range(0..cells);
        draws += 1;
        if !mask[index] {
            mask[index] = true;
            placed += 1;
        }
    }

    debug!(
        "Placed {} mines on {}x{} after {} draws",
        placed, params.rows, params.cols, draws
    );

    Ok(Board::from_mine_mask(params.rows, params.cols, &mask))
}
