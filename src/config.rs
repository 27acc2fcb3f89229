//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TYPE_SPEED_MS: u64 = 28;
pub const DEFAULT_LINE_PAUSE_MS: u64 = 700;
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub reduced_motion: bool,
    pub type_speed: Duration,
    pub line_pause: Duration,
    pub history_dir: Option<PathBuf>,
    pub page_path: Option<PathBuf>,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
    /// Hand external links to the system opener instead of only reporting them.
    pub open_links: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            type_speed: Duration::from_millis(DEFAULT_TYPE_SPEED_MS),
            line_pause: Duration::from_millis(DEFAULT_LINE_PAUSE_MS),
            history_dir: None,
            page_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
            open_links: false,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            reduced_motion: env_flag("FOLIO_REDUCED_MOTION"),
            type_speed: env_millis("FOLIO_TYPE_SPEED_MS", DEFAULT_TYPE_SPEED_MS),
            line_pause: env_millis("FOLIO_LINE_PAUSE_MS", DEFAULT_LINE_PAUSE_MS),
            history_dir: env_string_opt("FOLIO_HISTORY_DIR").map(PathBuf::from),
            page_path: env_string_opt("FOLIO_PAGE").map(PathBuf::from),
            log_filter: env_string_opt("FOLIO_LOG")
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_file: env_string_opt("FOLIO_LOG_FILE").map(PathBuf::from),
            open_links: env_flag("FOLIO_OPEN_LINKS"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_millis(key: &str, default: u64) -> Duration {
    let millis = env_string_opt(key)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_millis(millis)
}
