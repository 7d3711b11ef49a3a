// LogMerge - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogMerge";

/// Application identifier used for config directories.
pub const APP_ID: &str = "LogMerge";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input / output
// =============================================================================

/// Glob applied to file names in the input directory. Only matching regular
/// files contribute a sequence to the merge.
pub const DEFAULT_INCLUDE_PATTERN: &str = "*.log";

/// Maximum length of a user-supplied include pattern.
pub const MAX_INCLUDE_PATTERN_LENGTH: usize = 256;

/// Fixed name of the merged output file inside the output directory.
pub const OUTPUT_FILE_NAME: &str = "final_merge_logs.log";

/// Suffix appended to the output file name while it is being written.
/// The finished file is renamed over `OUTPUT_FILE_NAME`.
pub const TEMP_FILE_SUFFIX: &str = ".tmp";

// =============================================================================
// Parsing limits
// =============================================================================

/// Maximum number of malformed-line diagnostics kept per file.
/// Every malformed line is still logged and counted.
pub const MAX_PARSE_ERRORS_PER_FILE: usize = 1_000;

/// Lower bound for the configurable per-file diagnostic cap.
pub const MIN_PARSE_ERRORS_PER_FILE: usize = 1;

/// Upper bound for the configurable per-file diagnostic cap.
pub const ABSOLUTE_MAX_PARSE_ERRORS_PER_FILE: usize = 100_000;

// =============================================================================
// Merge
// =============================================================================

/// Default number of rayon worker threads. 0 means one per CPU core.
pub const DEFAULT_WORKER_THREADS: usize = 0;

/// Hard upper bound on worker threads (prevents configuration mistakes).
pub const MAX_WORKER_THREADS: usize = 256;

// =============================================================================
// Logging / config
// =============================================================================

/// Default tracing filter when neither RUST_LOG, --debug nor config apply.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Name of the optional configuration file in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
