use crate::error::HistoryStoreError;

/// Encodes history entries as a JSON array of strings.
pub fn encode_history(key: &str, entries: &[String]) -> Result<String, HistoryStoreError> {
    serde_json::to_string(entries).map_err(|source| HistoryStoreError::encode(key, source))
}

/// Decodes a stored value; anything other than an array of strings is rejected.
pub fn decode_history(key: &str, raw: &str) -> Result<Vec<String>, HistoryStoreError> {
    serde_json::from_str::<Vec<String>>(raw).map_err(|source| HistoryStoreError::decode(key, source))
}
