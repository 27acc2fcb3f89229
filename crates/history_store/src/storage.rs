use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::HistoryStoreError;
use crate::paths::{current_uid, storage_file_name};

/// Key/value storage scoped to one session, in the shape of a browser's
/// `sessionStorage`.
pub trait SessionStorage {
    /// Returns the stored value, or `None` when the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, HistoryStoreError>;

    /// Replaces the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), HistoryStoreError>;
}

impl<S: SessionStorage + ?Sized> SessionStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, HistoryStoreError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), HistoryStoreError> {
        (**self).set_item(key, value)
    }
}

/// In-memory storage with an optional byte quota over all stored values.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose values may not exceed `quota` bytes in total.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Seeds a raw value, bypassing the quota.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(_, value)| value.len())
            .sum()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, HistoryStoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), HistoryStoreError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_excluding(key) + value.len();
            if needed > quota {
                return Err(HistoryStoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by one file per key inside a session directory.
///
/// The directory must be a real directory owned by the current user and not
/// writable by group or others. Reads and writes refuse anything else.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// The directory is created lazily on the first write, with mode 0700.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, HistoryStoreError> {
        if key.trim().is_empty() {
            return Err(HistoryStoreError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(storage_file_name(key)))
    }

    fn ensure_root(&self) -> Result<(), HistoryStoreError> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(&self.root).map_err(|source| {
            HistoryStoreError::io("creating session directory", &self.root, source)
        })?;
        verify_private_root(&self.root, current_uid())
    }
}

/// Rejects a session directory another user could have planted or can write into.
fn verify_private_root(root: &Path, expected_uid: Option<u32>) -> Result<(), HistoryStoreError> {
    let metadata = fs::symlink_metadata(root)
        .map_err(|source| HistoryStoreError::io("inspecting session directory", root, source))?;
    let unsafe_dir = |reason: &'static str| HistoryStoreError::UnsafeDirectory {
        path: root.to_path_buf(),
        reason,
    };

    if !metadata.is_dir() {
        return Err(unsafe_dir("not a directory"));
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if expected_uid.is_some_and(|uid| metadata.uid() != uid) {
            return Err(unsafe_dir("owned by another user"));
        }
        if metadata.mode() & 0o022 != 0 {
            return Err(unsafe_dir("writable by group or others"));
        }
    }
    #[cfg(not(unix))]
    let _ = expected_uid;
    Ok(())
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, HistoryStoreError> {
        let path = self.path_for(key)?;
        match verify_private_root(&self.root, current_uid()) {
            Err(HistoryStoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                return Ok(None);
            }
            result => result?,
        }

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(HistoryStoreError::io("reading storage file", &path, source));
            }
        };

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| HistoryStoreError::InvalidUtf8 {
                key: key.to_string(),
                path,
            })
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), HistoryStoreError> {
        let path = self.path_for(key)?;
        self.ensure_root()?;

        // Stage under a fresh exclusive name, then rename over the previous value.
        let mut staging = NamedTempFile::new_in(&self.root).map_err(|source| {
            HistoryStoreError::io("creating staging file", &self.root, source)
        })?;
        if let Err(source) = staging.write_all(value.as_bytes()) {
            return Err(HistoryStoreError::io("writing storage file", staging.path(), source));
        }
        staging
            .persist(&path)
            .map(drop)
            .map_err(|error| HistoryStoreError::io("replacing storage file", &path, error.error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_quota_counts_other_keys_but_not_the_replaced_value() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set_item("a", "12345").expect("fits");
        storage.set_item("a", "1234567890").expect("replacing a value frees its bytes");

        let error = storage.set_item("b", "x").expect_err("over quota");
        assert!(matches!(
            error,
            HistoryStoreError::QuotaExceeded {
                needed: 11,
                quota: 10,
                ..
            }
        ));
        assert_eq!(storage.raw("b"), None);
    }

    #[test]
    fn missing_key_reads_as_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("missing").expect("read"), None);
    }

    #[cfg(unix)]
    #[test]
    fn created_session_directory_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir should be created");
        let root = temp.path().join("session");
        let mut storage = FileStorage::new(&root);
        storage.set_item("k", "[]").expect("write");

        let mode = fs::metadata(&root).expect("root exists").permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[cfg(unix)]
    #[test]
    fn directory_of_another_user_is_refused() {
        use std::os::unix::fs::MetadataExt;

        let temp = tempfile::tempdir().expect("tempdir should be created");
        let owner = fs::metadata(temp.path()).expect("tempdir metadata").uid();

        verify_private_root(temp.path(), Some(owner)).expect("own directory is accepted");
        let error = verify_private_root(temp.path(), Some(owner.wrapping_add(1)))
            .expect_err("foreign owner");
        assert!(matches!(
            error,
            HistoryStoreError::UnsafeDirectory {
                reason: "owned by another user",
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn shared_writable_directory_is_refused_for_reads_and_writes() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir should be created");
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o777))
            .expect("chmod tempdir");
        let mut storage = FileStorage::new(temp.path());

        assert!(matches!(
            storage.get_item("k"),
            Err(HistoryStoreError::UnsafeDirectory { .. })
        ));
        assert!(matches!(
            storage.set_item("k", "[]"),
            Err(HistoryStoreError::UnsafeDirectory { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn planted_symlinks_are_replaced_not_followed() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let victim = temp.path().join("victim");
        fs::write(&victim, "precious").expect("victim written");
        let root = temp.path().join("session");
        let mut storage = FileStorage::new(&root);
        storage.set_item("k", "[]").expect("first write creates the root");

        let target = root.join(storage_file_name("k"));
        fs::remove_file(&target).expect("remove stored file");
        std::os::unix::fs::symlink(&victim, &target).expect("symlink planted");
        std::os::unix::fs::symlink(&victim, target.with_extension("json.tmp"))
            .expect("staging symlink planted");

        storage.set_item("k", r#"["help"]"#).expect("write");

        assert_eq!(fs::read_to_string(&victim).expect("victim readable"), "precious");
        assert_eq!(storage.get_item("k").expect("read"), Some(r#"["help"]"#.to_string()));
    }

    #[test]
    fn file_storage_rejects_blank_keys() {
        let mut storage = FileStorage::new(std::env::temp_dir());
        let error = storage.set_item("  ", "[]").expect_err("blank key");
        assert!(matches!(error, HistoryStoreError::InvalidKey { .. }));
    }
}
