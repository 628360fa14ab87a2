use minesweeper_common::models::CellStatus;

use crate::data::Board;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The cell was flagged, already revealed, or out of range.
    Unchanged,
    Revealed,
    HitMine,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Flagged,
    Unflagged,
    InvalidTransition,
}

impl FlagOutcome {
    /// Change in the number of flags on the board caused by this outcome.
    pub const fn flag_delta(self) -> isize {
        match self {
            Self::Flagged => 1,
            Self::Unflagged => -1,
            Self::InvalidTransition => 0,
        }
    }
}

impl Board {
    pub fn reveal(&mut self, index: usize) -> RevealOutcome {
        let mut updates = Vec::new();
        self.reveal_tracked(index, &mut updates)
    }

    /// Reveals a hidden cell and, when it has no adjacent mines, the whole
    /// connected zero region plus its numbered border. Every index whose
    /// status changed is pushed to `updates`.
    pub fn reveal_tracked(&mut self, index: usize, updates: &mut Vec<usize>) -> RevealOutcome {
        let Some(cell) = self.cell_mut(index) else {
            return RevealOutcome::Unchanged;
        };
        if cell.status != CellStatus::Hidden {
            return RevealOutcome::Unchanged;
        }

        cell.status = CellStatus::Revealed;
        updates.push(index);

        if cell.is_mine {
            return RevealOutcome::HitMine;
        }
        if cell.neighbor_mines != 0 {
            return RevealOutcome::Revealed;
        }

        // Revealed status doubles as the visited set.
        let mut pending = vec![index];
        while let Some(current) = pending.pop() {
            for neighbor in self.neighbors(current) {
                let Some(cell) = self.cell_mut(neighbor) else {
                    continue;
                };
                if cell.status != CellStatus::Hidden || cell.is_mine {
                    continue;
                }

                cell.status = CellStatus::Revealed;
                updates.push(neighbor);

                if cell.neighbor_mines == 0 {
                    pending.push(neighbor);
                }
            }
        }

        RevealOutcome::Revealed
    }

    pub fn toggle_flag(&mut self, index: usize) -> FlagOutcome {
        let Some(cell) = self.cell_mut(index) else {
            return FlagOutcome::InvalidTransition;
        };

        match cell.status {
            CellStatus::Hidden => {
                cell.status = CellStatus::Flagged;
                FlagOutcome::Flagged
            }
            CellStatus::Flagged => {
                cell.status = CellStatus::Hidden;
                FlagOutcome::Unflagged
            }
            CellStatus::Revealed => FlagOutcome::InvalidTransition,
        }
    }

    /// Exposes every mine, including flagged ones. Safe cells are left alone.
    pub fn reveal_all_mines(&mut self, updates: &mut Vec<usize>) -> usize {
        let before = updates.len();

        for index in 0..self.len() {
            if let Some(cell) = self.cell_mut(index)
                && cell.is_mine
                && cell.status != CellStatus::Revealed
            {
                cell.status = CellStatus::Revealed;
                updates.push(index);
            }
        }

        updates.len() - before
    }
}
