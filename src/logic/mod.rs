//! Rules that create and mutate a [`Board`](crate::data::Board): mine
//! placement, flood-fill reveal and flag toggling.

mod generate;
mod reveal;

pub use generate::{generate, generate_with_rng, validate_params};
pub use reveal::{FlagOutcome, RevealOutcome};
