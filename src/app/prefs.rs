// JobBoard - app/prefs.rs
//
// Display preferences kept alongside the account data. Currently only the
// dark-mode toggle, stored as "true"/"false" under `darkMode`.

use crate::platform::storage::KeyValueStorage;
use crate::util::constants::KEY_DARK_MODE;
use crate::util::error::StorageError;

/// Stored dark-mode preference. Missing, unreadable, or unparseable
/// values read as light mode.
pub fn dark_mode<S: KeyValueStorage + ?Sized>(storage: &S) -> bool {
    dark_mode_or(storage, false)
}

/// Stored dark-mode preference, or `default` when none has been stored.
pub fn dark_mode_or<S: KeyValueStorage + ?Sized>(storage: &S, default: bool) -> bool {
    match storage.get_item(KEY_DARK_MODE) {
        Ok(Some(value)) => match value.trim() {
            "true" => true,
            "false" => false,
            other => {
                tracing::debug!(value = other, "Unrecognised darkMode value");
                false
            }
        },
        Ok(None) => default,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read darkMode preference");
            default
        }
    }
}

pub fn set_dark_mode<S: KeyValueStorage + ?Sized>(
    storage: &S,
    enabled: bool,
) -> Result<(), StorageError> {
    storage.set_item(KEY_DARK_MODE, if enabled { "true" } else { "false" })?;
    tracing::debug!(enabled, "Dark mode preference saved");
    Ok(())
}
