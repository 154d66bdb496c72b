//! `window.localStorage` as a score store

use crate::error::ArcadeError;
use crate::highscores::ScoreStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

impl ScoreStore for LocalStore {
    fn read(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), ArcadeError> {
        let storage =
            Self::storage().ok_or_else(|| ArcadeError::Storage("localStorage unavailable".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| ArcadeError::Storage(format!("{key}: {e:?}")))
    }
}
