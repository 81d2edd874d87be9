// JobBoard - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for JobBoard data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/jobboard/ or %APPDATA%\JobBoard\config\)
    pub config_dir: PathBuf,

    /// Data directory (e.g. ~/.local/share/jobboard/)
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default directory for `FileStorage`.
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join(constants::STORAGE_DIR_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[storage]` section.
    pub storage: StorageSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[storage]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory holding the key files. Empty = platform default.
    pub dir: Option<String>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme used when no dark-mode preference has been stored yet.
    pub theme: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Storage directory override.
    pub storage_dir: Option<PathBuf>,

    /// Default theme before the user toggles dark mode.
    pub dark_mode_default: bool,

    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with a warning so the
/// application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(source) => {
            let msg = format!(
                "{}. Using defaults.",
                ConfigError::Io {
                    path: config_path.clone(),
                    source,
                }
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let (config, mut parse_warnings) = parse_config(&content, &config_path);
    warnings.append(&mut parse_warnings);
    (config, warnings)
}

/// Validate the text of a config file. `path` is used in messages only.
pub fn parse_config(content: &str, path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(source) => {
            let msg = format!(
                "{}. Using defaults.",
                ConfigError::TomlParse {
                    path: path.to_path_buf(),
                    source,
                }
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Storage: dir --
    if let Some(ref dir) = raw.storage.dir {
        if !dir.trim().is_empty() {
            config.storage_dir = Some(PathBuf::from(dir.trim()));
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode_default = true,
            "light" => config.dark_mode_default = false,
            other => {
                let err = ConfigError::ValueOutOfRange {
                    field: "ui.theme".to_string(),
                    value: other.to_string(),
                    expected: "\"dark\" or \"light\"".to_string(),
                };
                warnings.push(format!("{err}. Using default (light)."));
            }
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            let err = ConfigError::ValueOutOfRange {
                field: "logging.level".to_string(),
                value: level.clone(),
                expected: constants::VALID_LOG_LEVELS.join(", "),
            };
            warnings.push(format!(
                "{err}. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}
