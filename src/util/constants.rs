// LogTally - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogTally";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input
// =============================================================================

/// Default access log path when none is given on the CLI or in config.
pub const DEFAULT_INPUT_PATH: &str = "data/web_logs.txt";

/// chrono format string for access log timestamps (`10/Oct/2023:13:55:36`).
/// The parse must consume the whole capture; a trailing timezone offset
/// fails the parse and leaves the record without a date.
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

// =============================================================================
// Output
// =============================================================================

/// Default export directory, created if absent.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Status code distribution export file name.
pub const CODES_EXPORT_FILE: &str = "codes_distribution.csv";

/// Full parsed dataset export file name.
pub const LOGS_EXPORT_FILE: &str = "logs_parsed.csv";

/// UTF-8 sanitised dataset export file name (relational bulk load).
pub const LOGS_UTF8_EXPORT_FILE: &str = "logs_parsed_utf8.csv";

/// Date column format in exports (`2023-10-10`).
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Suffix of the private shard directory a sink writes into before
/// publishing a single final file.
pub const SHARD_DIR_SUFFIX: &str = ".shards";

/// Shard file name prefix inside a shard directory.
pub const SHARD_FILE_PREFIX: &str = "part-";

/// Maximum number of records in a single export operation.
pub const MAX_EXPORT_RECORDS: usize = 5_000_000;

// =============================================================================
// Preview rendering
// =============================================================================

/// Default number of rows shown in the top-pages and top-clients tables.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Minimum user-configurable preview row count.
pub const MIN_PREVIEW_ROWS: usize = 1;

/// Maximum user-configurable preview row count.
pub const MAX_PREVIEW_ROWS: usize = 1_000;

/// Width of the key column in stdout tables. Longer keys are truncated
/// with an ellipsis so a pathological request path cannot wreck the layout.
pub const PREVIEW_KEY_WIDTH: usize = 48;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "logtally.toml";
