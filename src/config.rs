use std::{env, path::PathBuf, time::Duration};

use tracing::info;

const DEFAULT_SAVE_DIR: &str = ".minesweeper";
const DEFAULT_TICK_MILLIS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the saved-session slot.
    pub save_dir: PathBuf,
    /// Period of the elapsed-time clock.
    pub tick_period: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            tick_period: Duration::from_millis(DEFAULT_TICK_MILLIS),
        }
    }
}

impl Config {
    /// Reads `MINESWEEPER_SAVE_DIR` and `MINESWEEPER_TICK_MILLIS`, keeping the
    /// default for anything missing or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let save_dir = lookup("MINESWEEPER_SAVE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SAVE_DIR.to_string());

        let tick_millis: u64 = lookup("MINESWEEPER_TICK_MILLIS")
            .unwrap_or_else(|| DEFAULT_TICK_MILLIS.to_string())
            .parse()
            .ok()
            .filter(|&millis| millis > 0)
            .unwrap_or(DEFAULT_TICK_MILLIS);

        let config = Self {
            save_dir: PathBuf::from(save_dir),
            tick_period: Duration::from_millis(tick_millis),
        };

        info!(
            "Loaded config: save dir {}, tick every {}ms",
            config.save_dir.display(),
            tick_millis
        );

        config
    }
}
