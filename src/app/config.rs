// LogTally - app/config.rs
//
// logtally.toml loading with startup validation.
// Invalid values produce actionable warnings and fall back to defaults;
// only an explicitly requested config path fails the run.

use crate::util::constants;
use crate::util::error::ConfigError;
use std::path::{Path, PathBuf};

// =============================================================================
// TOML deserialisation structures (raw input)
// =============================================================================

/// Raw deserialisable shape of logtally.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[input]` section.
    pub input: InputSection,
    /// `[output]` section.
    pub output: OutputSection,
    /// `[preview]` section.
    pub preview: PreviewSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[input]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Access log file path.
    pub path: Option<String>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Export directory.
    pub directory: Option<String>,
}

/// `[preview]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PreviewSection {
    /// Rows shown in the top-pages and top-clients tables.
    pub rows: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Validated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Access log file to analyse.
    pub input_path: PathBuf,

    /// Directory for export artifacts, created if absent.
    pub output_dir: PathBuf,

    /// Rows shown in the top-pages and top-clients tables.
    pub preview_rows: usize,

    /// Logging level string (consumed before tracing is initialised).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(constants::DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            preview_rows: constants::DEFAULT_PREVIEW_ROWS,
            log_level: None,
        }
    }
}

/// Load and validate configuration.
///
/// With `explicit_path` set (the user passed --config), a missing or
/// unparseable file is a fatal error. Otherwise `logtally.toml` is looked
/// up in the working directory; absence means defaults, and read/parse
/// problems degrade to defaults with a warning.
pub fn load(explicit_path: Option<&Path>) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let (config_path, explicit) = match explicit_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(constants::CONFIG_FILE_NAME), false),
    };

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() && !explicit {
        return Ok((AppConfig::default(), warnings));
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) if explicit => {
            return Err(ConfigError::Io {
                path: config_path,
                source: e,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) if explicit => {
            return Err(ConfigError::TomlParse {
                path: config_path,
                source: e,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let mut config = AppConfig::default();

    if let Some(path) = raw.input.path {
        config.input_path = PathBuf::from(path);
    }

    if let Some(dir) = raw.output.directory {
        config.output_dir = PathBuf::from(dir);
    }

    // -- Preview: rows --
    if let Some(rows) = raw.preview.rows {
        if (constants::MIN_PREVIEW_ROWS..=constants::MAX_PREVIEW_ROWS).contains(&rows) {
            config.preview_rows = rows;
        } else {
            warnings.push(format!(
                "[preview] rows = {rows} is out of range ({}-{}). Using default ({}).",
                constants::MIN_PREVIEW_ROWS,
                constants::MAX_PREVIEW_ROWS,
                constants::DEFAULT_PREVIEW_ROWS,
            ));
        }
    }

    config.log_level = raw.logging.level;

    Ok((config, warnings))
}
