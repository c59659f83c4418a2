//! Application configuration constants
//!
//! Central location for remote layout, file names and sync timing
//! used throughout the crate.

use std::time::Duration;

// ===== Remote Layout =====

/// Directory holding one JSON document per note in the remote repository
pub const NOTES_DIR: &str = "notes";

/// Suffix identifying note documents in a directory listing
pub const NOTE_FILE_SUFFIX: &str = ".json";

/// Branch used when the configuration does not name one
pub const DEFAULT_BRANCH: &str = "main";

/// Base URL of the public GitHub REST API
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Path appended to a Gitea endpoint to reach its GitHub-compatible API
pub const GITEA_API_SUFFIX: &str = "/api/v1";

/// User agent sent with every remote request (GitHub rejects requests without one)
pub const USER_AGENT: &str = concat!("notesync/", env!("CARGO_PKG_VERSION"));

/// Title used in change descriptions for notes without one
pub const UNTITLED_NOTE: &str = "Untitled";

// ===== Local Files =====

/// Storage configuration file inside the app data directory
pub const STORAGE_CONFIG_FILE: &str = "storage.json";

/// Local note cache file inside the app data directory
pub const NOTES_CACHE_FILE: &str = "notes.json";

// ===== Sync Timing =====

/// Interval of the background reconciliation while sync is enabled
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;

/// Shortest interval accepted for the background job.
/// The scheduler ticks at sub-second granularity, anything lower is noise.
pub const MIN_SYNC_INTERVAL_SECS: u64 = 5;

/// Default periodic sync interval
pub fn default_sync_interval() -> Duration {
    Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS)
}
