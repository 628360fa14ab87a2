//! Value types shared between the minesweeper engine and anything that
//! stores or displays its state.

pub mod models;
pub mod snapshot;

pub use models::*;
pub use snapshot::SessionSnapshot;
