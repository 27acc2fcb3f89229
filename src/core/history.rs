//! Submitted-command history with a recall cursor.
//!
//! Invariant: `0 <= cursor <= entries.len()`, where `entries.len()` is the empty
//! draft past the newest entry. The in-memory sequence is authoritative; the
//! persisted copy is a best-effort mirror.

use history_store::{HistoryLog, SessionStorage};

pub struct History<S> {
    entries: Vec<String>,
    cursor: usize,
    log: HistoryLog<S>,
}

impl<S: SessionStorage> History<S> {
    /// Rehydrates from storage; missing or malformed data starts an empty history.
    pub fn hydrate(log: HistoryLog<S>) -> Self {
        let entries = match log.load() {
            Ok(entries) => entries,
            Err(error) => {
                tracing::debug!(%error, key = log.key(), "discarding persisted history");
                Vec::new()
            }
        };
        let cursor = entries.len();
        Self {
            entries,
            cursor,
            log,
        }
    }

    /// Appends the raw entry and mirrors the sequence to storage.
    ///
    /// Blank entries are ignored. Returns whether the entry was recorded.
    pub fn append(&mut self, entry: &str) -> bool {
        if entry.trim().is_empty() {
            return false;
        }

        self.entries.push(entry.to_string());
        self.cursor = self.entries.len();

        if let Err(error) = self.log.save(&self.entries) {
            tracing::warn!(%error, "history not persisted; keeping it in memory");
        }
        true
    }

    /// Steps back one entry, stopping at the oldest.
    pub fn recall_previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Steps forward one entry, stopping at the newest.
    pub fn recall_next(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1).min(self.entries.len() - 1);
        self.entries.get(self.cursor).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn log(&self) -> &HistoryLog<S> {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use history_store::{MemoryStorage, HISTORY_KEY};
    use pretty_assertions::assert_eq;

    fn empty_history() -> History<MemoryStorage> {
        History::hydrate(HistoryLog::new(MemoryStorage::new()))
    }

    #[test]
    fn recall_walks_back_then_forward() {
        let mut history = empty_history();
        for entry in ["a", "b", "c"] {
            assert!(history.append(entry));
        }

        assert_eq!(history.recall_previous(), Some("c"));
        assert_eq!(history.recall_previous(), Some("b"));
        assert_eq!(history.recall_previous(), Some("a"));
        assert_eq!(history.recall_next(), Some("b"));
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut history = empty_history();
        history.append("a");
        history.append("b");

        assert_eq!(history.recall_previous(), Some("b"));
        assert_eq!(history.recall_previous(), Some("a"));
        assert_eq!(history.recall_previous(), Some("a"));
        assert_eq!(history.cursor(), 0);

        assert_eq!(history.recall_next(), Some("b"));
        assert_eq!(history.recall_next(), Some("b"));
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn next_from_the_draft_position_lands_on_newest() {
        let mut history = empty_history();
        history.append("a");
        history.append("b");
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.recall_next(), Some("b"));
    }

    #[test]
    fn empty_history_recalls_nothing() {
        let mut history = empty_history();
        assert_eq!(history.recall_previous(), None);
        assert_eq!(history.recall_next(), None);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn append_ignores_blank_and_resets_cursor() {
        let mut history = empty_history();
        history.append("help");
        history.append("skills");
        history.recall_previous();
        history.recall_previous();
        assert_eq!(history.cursor(), 0);

        assert!(!history.append("   "));
        assert_eq!(history.cursor(), 0);

        assert!(history.append("help"));
        assert_eq!(history.cursor(), 3);
        assert_eq!(history.entries(), ["help", "skills", "help"]);
    }

    #[test]
    fn raw_entries_round_trip_through_storage() {
        let mut history = empty_history();
        history.append("  open   about ");
        let storage = history.log.storage().clone();

        let mut rehydrated = History::hydrate(HistoryLog::new(storage));
        assert_eq!(rehydrated.cursor(), 1);
        assert_eq!(rehydrated.recall_previous(), Some("  open   about "));
    }

    #[test]
    fn malformed_storage_hydrates_empty() {
        let mut storage = MemoryStorage::new();
        storage.insert_raw(HISTORY_KEY, r#"{"not":"an array"}"#);
        let history = History::hydrate(HistoryLog::new(storage));
        assert!(history.is_empty());
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn persistence_failure_keeps_memory_authoritative() {
        let mut history = History::hydrate(HistoryLog::new(MemoryStorage::with_quota(0)));
        assert!(history.append("help"));
        assert!(history.append("projects"));

        assert_eq!(history.entries(), ["help", "projects"]);
        assert_eq!(history.log().storage().raw(HISTORY_KEY), None);
        assert_eq!(history.recall_previous(), Some("projects"));
    }
}
