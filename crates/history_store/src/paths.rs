use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

pub const SESSION_DIR_PREFIX: &str = "folio-term-session";

/// Directory holding the storage files of one session.
#[must_use]
pub fn session_dir(base: &Path, session_id: &str) -> PathBuf {
    base.join(format!("{SESSION_DIR_PREFIX}-{session_id}"))
}

/// Where session directories live: `XDG_RUNTIME_DIR` when set, else the temp dir.
#[must_use]
pub fn default_session_base() -> PathBuf {
    match std::env::var_os("XDG_RUNTIME_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::temp_dir(),
    }
}

/// Session directory under [`default_session_base`], keyed by the parent process.
///
/// Relaunching the shell from the same login shell reuses the directory, which is
/// the closest native analogue of a browser tab surviving a reload.
#[must_use]
pub fn default_session_dir() -> PathBuf {
    session_dir(&default_session_base(), &parent_session_id())
}

/// Removes session directories under `base` untouched for at least `max_age`.
///
/// Only directories owned by the current user are considered, and `keep` is
/// never removed. Entries that cannot be inspected or removed are skipped.
/// Returns how many directories were removed.
pub fn prune_stale_sessions(base: &Path, keep: &Path, max_age: Duration) -> usize {
    let Ok(entries) = fs::read_dir(base) else {
        return 0;
    };
    let prefix = format!("{SESSION_DIR_PREFIX}-");
    let now = SystemTime::now();

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path == keep || !entry.file_name().to_string_lossy().starts_with(&prefix) {
            continue;
        }
        let Ok(metadata) = fs::symlink_metadata(&path) else {
            continue;
        };
        if !metadata.is_dir() || !owned_by_current_user(&metadata) {
            continue;
        }
        let stale = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age >= max_age);
        if stale && fs::remove_dir_all(&path).is_ok() {
            removed += 1;
        }
    }
    removed
}

/// Effective uid of this process, where the platform has one.
pub(crate) fn current_uid() -> Option<u32> {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        Some(unsafe { libc::geteuid() })
    }
    #[cfg(not(unix))]
    {
        None
    }
}

fn owned_by_current_user(metadata: &fs::Metadata) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        current_uid() == Some(metadata.uid())
    }
    #[cfg(not(unix))]
    {
        let _ = metadata;
        true
    }
}

fn parent_session_id() -> String {
    #[cfg(unix)]
    {
        std::os::unix::process::parent_id().to_string()
    }
    #[cfg(not(unix))]
    {
        std::process::id().to_string()
    }
}

#[must_use]
fn sanitize_key_for_filename(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            ':' | '/' | '\\' | ' ' | '.' => '-',
            _ => c,
        })
        .collect()
}

#[must_use]
pub fn storage_file_name(key: &str) -> String {
    format!("{}.json", sanitize_key_for_filename(key))
}
