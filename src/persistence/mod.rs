//! Best-score persistence
//!
//! A single named key holds the best score as decimal text. Anything missing
//! or unreadable counts as zero; storage failures never reach the game.

use std::collections::HashMap;

/// Key/value text storage (LocalStorage on web, a map elsewhere)
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Parse a stored best score; missing or malformed text is 0
pub fn parse_best_score(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    match raw.trim().parse::<u64>() {
        Ok(score) => score,
        Err(_) => {
            log::warn!("Ignoring malformed best score {:?}", raw);
            0
        }
    }
}

/// Read the best score stored under `key`
pub fn load_best_score<S: ScoreStore + ?Sized>(store: &S, key: &str) -> u64 {
    let best = parse_best_score(store.get(key).as_deref());
    log::info!("Loaded best score {}", best);
    best
}

/// Write `score` under `key` as decimal text
pub fn save_best_score<S: ScoreStore + ?Sized>(store: &mut S, key: &str, score: u64) {
    store.set(key, &score.to_string());
    log::info!("Best score saved ({})", score);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(load_best_score(&store, "best"), 0);
    }

    #[test]
    fn test_malformed_is_zero() {
        assert_eq!(parse_best_score(Some("twelve")), 0);
        assert_eq!(parse_best_score(Some("-3")), 0);
        assert_eq!(parse_best_score(Some("")), 0);
        assert_eq!(parse_best_score(Some(" 41 ")), 41);
    }

    #[test]
    fn test_saved_as_decimal_text() {
        let mut store = MemoryStore::new();
        save_best_score(&mut store, "best", 12);
        assert_eq!(store.get("best").as_deref(), Some("12"));
        assert_eq!(load_best_score(&store, "best"), 12);
    }
}
