// JobBoard - util/constants.rs
//
// Single source of truth for all named constants, storage keys, limits,
// and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "JobBoard";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "JobBoard";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Storage keys
// =============================================================================

/// Full snapshot of every registered user record.
pub const KEY_AUTH_USERS: &str = "authUsers";

/// Snapshot of the signed-in user. Absent while logged out.
pub const KEY_CURRENT_USER: &str = "currentUser";

/// Listing last opened from the job list.
pub const KEY_SELECTED_JOB: &str = "selectedJob";

/// Remembered job-title/company search term.
pub const KEY_SEARCH_JOB: &str = "searchJob";

/// Remembered location search term.
pub const KEY_SEARCH_LOCATION: &str = "searchLocation";

/// Job catalogue including listings posted by employers.
pub const KEY_JOBS_DATABASE: &str = "jobsDatabase";

/// Dark-mode preference (`"true"` / `"false"`).
pub const KEY_DARK_MODE: &str = "darkMode";

/// Maximum length of a storage key. Keys map onto file names in
/// `FileStorage`, so this stays well under common filesystem limits.
pub const MAX_STORAGE_KEY_LEN: usize = 64;

/// File extension used by `FileStorage` for each key.
pub const STORAGE_FILE_EXTENSION: &str = "json";

/// Subdirectory of the platform data directory holding `FileStorage` files.
pub const STORAGE_DIR_NAME: &str = "storage";

// =============================================================================
// Accounts
// =============================================================================

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 1;

/// Maximum accepted email length (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Prefix identifying an Argon2 PHC hash string. Stored values without it
/// are treated as legacy plaintext passwords.
pub const ARGON2_PHC_PREFIX: &str = "$argon2";

// =============================================================================
// Job catalogue
// =============================================================================

/// `posted` label given to newly posted listings.
pub const JUST_POSTED_LABEL: &str = "Just now";

/// Multiplier applied to the leading salary figure (`$120k` -> 120_000).
pub const SALARY_UNIT: u64 = 1_000;

/// Background used for the avatar of employer-posted listings.
pub const DEFAULT_AVATAR_GRADIENT: &str = "linear-gradient(135deg, #4A90E2 0%, #357ABD 100%)";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Valid values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
