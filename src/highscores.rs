//! Best-score persistence
//!
//! One decimal string per game in an injected key-value store. The value is
//! read once when a game is created and written only when it increases.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ArcadeError;

/// Key-value store holding best scores
pub trait ScoreStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), ArcadeError>;
}

/// In-process store. Clones share the same map, so a test can keep a handle
/// and inspect what a game wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry
    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Number of keys written so far
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), ArcadeError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Parse a stored best score. Anything that is not a finite, non-negative
/// number reads as 0; fractions truncate.
pub fn parse_best(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.trunc().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// Monotonic best score bound to one storage key
pub struct BestScore {
    key: &'static str,
    value: u32,
    store: Box<dyn ScoreStore>,
}

impl BestScore {
    /// Read the persisted value for `key`
    pub fn load(key: &'static str, store: Box<dyn ScoreStore>) -> Self {
        let value = parse_best(store.read(key).as_deref());
        log::debug!("{key}: best score {value}");
        Self { key, value, store }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Raise the best score to `candidate` if higher, persisting the change.
    ///
    /// Returns true when the value increased. A failed write is logged and
    /// the in-memory value is kept.
    pub fn observe(&mut self, candidate: u32) -> bool {
        if candidate <= self.value {
            return false;
        }
        self.value = candidate;
        if let Err(err) = self.store.write(self.key, &candidate.to_string()) {
            log::warn!("Failed to save {}: {err}", self.key);
        }
        true
    }
}

impl std::fmt::Debug for BestScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestScore")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Session score paired with the persisted best
#[derive(Debug)]
pub struct Scoreboard {
    pub score: u32,
    pub best: BestScore,
}

impl Scoreboard {
    pub fn new(best: BestScore) -> Self {
        Self { score: 0, best }
    }

    /// Zero the session score (start/restart)
    pub fn reset(&mut self) {
        self.score = 0;
    }

    /// Add points and fold them into the best score
    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.best.observe(self.score);
    }

    /// Final persistence attempt at the end of a run
    pub fn finalize(&mut self) {
        if self.best.observe(self.score) {
            log::info!("New best for {}: {}", self.best.key(), self.score);
        }
    }

    pub fn best(&self) -> u32 {
        self.best.value()
    }
}
