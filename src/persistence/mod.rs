//! Best-score persistence
//!
//! A tiny key/value surface: the game stores one integer, the best score,
//! under [`BEST_SCORE_KEY`](crate::consts::BEST_SCORE_KEY).
//! - [`MemoryStore`] for tests and throwaway sessions
//! - [`JsonFileStore`] for the native binary (temp file, then rename)

pub mod file;

pub use file::JsonFileStore;

use std::collections::BTreeMap;

use crate::consts::BEST_SCORE_KEY;
use crate::error::GameResult;

/// Integer key/value storage
pub trait BestScoreStore {
    fn get(&self, key: &str) -> GameResult<Option<u64>>;
    fn set(&mut self, key: &str, value: u64) -> GameResult<()>;
}

/// Stored best score, or 0 if unreadable
pub fn load_best<S: BestScoreStore + ?Sized>(store: &S) -> u64 {
    match store.get(BEST_SCORE_KEY) {
        Ok(best) => best.unwrap_or(0),
        Err(err) => {
            log::warn!("Failed to read best score: {}", err);
            0
        }
    }
}

/// Write `score` if it beats what is stored. Returns true if written.
pub fn save_best<S: BestScoreStore + ?Sized>(store: &mut S, score: u64) -> GameResult<bool> {
    let stored = store.get(BEST_SCORE_KEY)?.unwrap_or(0);
    if score <= stored {
        return Ok(false);
    }
    store.set(BEST_SCORE_KEY, score)?;
    log::info!("New best score saved: {}", score);
    Ok(true)
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestScoreStore for MemoryStore {
    fn get(&self, key: &str) -> GameResult<Option<u64>> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u64) -> GameResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
