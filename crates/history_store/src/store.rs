use crate::error::HistoryStoreError;
use crate::schema::{decode_history, encode_history};
use crate::storage::SessionStorage;

/// Fixed key the terminal history lives under.
pub const HISTORY_KEY: &str = "terminalHistory_v1";

/// Typed view of the history sequence persisted under one storage key.
pub struct HistoryLog<S> {
    storage: S,
    key: String,
}

impl<S: SessionStorage> HistoryLog<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: HISTORY_KEY.to_string(),
        }
    }

    /// Loads the persisted sequence. An absent key is an empty history, not an error.
    pub fn load(&self) -> Result<Vec<String>, HistoryStoreError> {
        match self.storage.get_item(&self.key)? {
            Some(raw) => decode_history(&self.key, &raw),
            None => Ok(Vec::new()),
        }
    }

    /// Rewrites the whole persisted sequence.
    pub fn save(&mut self, entries: &[String]) -> Result<(), HistoryStoreError> {
        let encoded = encode_history(&self.key, entries)?;
        self.storage.set_item(&self.key, &encoded)
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
