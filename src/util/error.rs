// JobBoard - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every failure the store can report is a named variant; callers decide
// how to present it to the user.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all JobBoard operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum JobBoardError {
    /// Profile store operation failed.
    Store(StoreError),

    /// Job catalogue operation failed.
    Job(JobError),

    /// Key-value storage failed outside of a store or catalogue call.
    Storage(StorageError),
}

impl fmt::Display for JobBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "{e}"),
            Self::Job(e) => write!(f, "{e}"),
            Self::Storage(e) => write!(f, "Storage error: {e}"),
        }
    }
}

impl std::error::Error for JobBoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Job(e) => Some(e),
            Self::Storage(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors reported by the profile store.
///
/// A failed call never leaves a partial mutation behind: the in-memory
/// state is exactly what it was before the call.
#[derive(Debug)]
pub enum StoreError {
    /// A record with this email already exists.
    DuplicateUser { email: String },

    /// No record matches both the email and the password.
    InvalidCredentials,

    /// The operation needs a signed-in user and there is none.
    NotAuthenticated,

    /// The session refers to a user id with no backing record.
    UserNotFound { id: u64 },

    /// Registration input was rejected before touching any record.
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },

    /// Persisting or rehydrating state failed.
    Storage(StorageError),

    /// Hashing or verifying a password failed.
    Password(PasswordError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateUser { email } => {
                write!(f, "User with email '{email}' already exists")
            }
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::NotAuthenticated => write!(f, "No user logged in"),
            Self::UserNotFound { id } => write!(f, "User {id} not found"),
            Self::InvalidInput { field, reason } => write!(f, "Invalid {field}: {reason}"),
            Self::Storage(e) => write!(f, "Storage error: {e}"),
            Self::Password(e) => write!(f, "Password error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            Self::Password(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<PasswordError> for StoreError {
    fn from(e: PasswordError) -> Self {
        Self::Password(e)
    }
}

impl From<StoreError> for JobBoardError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Password errors
// ---------------------------------------------------------------------------

/// Errors from the password hasher.
///
/// The underlying `argon2` error type is not `std::error::Error` in every
/// configuration, so its message is captured as text.
#[derive(Debug)]
pub enum PasswordError {
    /// Producing a hash failed.
    Hash { reason: String },

    /// The stored hash could not be parsed as a PHC string.
    MalformedHash { reason: String },
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash { reason } => write!(f, "failed to hash password: {reason}"),
            Self::MalformedHash { reason } => write!(f, "stored hash is malformed: {reason}"),
        }
    }
}

impl std::error::Error for PasswordError {}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors from a `KeyValueStorage` backend or from (de)serialising the
/// values kept in it.
#[derive(Debug)]
pub enum StorageError {
    /// Key is empty, too long, or contains characters outside `[A-Za-z0-9_-]`.
    InvalidKey { key: String },

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// Stored value for `key` could not be encoded or decoded as JSON.
    Json {
        key: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey { key } => write!(f, "invalid storage key '{key}'"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
            Self::Json { key, source } => write!(f, "malformed JSON under '{key}': {source}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidKey { .. } => None,
        }
    }
}

impl From<StorageError> for JobBoardError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Job catalogue errors
// ---------------------------------------------------------------------------

/// Errors related to the job catalogue.
#[derive(Debug)]
pub enum JobError {
    /// No listing with this id.
    NotFound { id: u64 },

    /// A required listing field was empty.
    MissingField { field: &'static str },

    /// Only employer accounts may post listings.
    NotEmployer,

    /// Every listing id up to `u64::MAX` is taken.
    IdsExhausted,

    /// Persisting the catalogue or its auxiliary keys failed.
    Storage(StorageError),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "Job {id} not found"),
            Self::MissingField { field } => {
                write!(f, "Please fill in all required fields (missing '{field}')")
            }
            Self::NotEmployer => write!(f, "Only employer accounts can post jobs"),
            Self::IdsExhausted => write!(f, "No job id is left to assign"),
            Self::Storage(e) => write!(f, "Storage error: {e}"),
        }
    }
}

impl std::error::Error for JobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for JobError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<JobError> for JobBoardError {
    fn from(e: JobError) -> Self {
        Self::Job(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for JobBoard results.
pub type Result<T> = std::result::Result<T, JobBoardError>;
