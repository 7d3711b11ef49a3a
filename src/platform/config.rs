// LogMerge - platform/config.rs
//
// Platform configuration directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance. The file is optional; every setting has a
// default and CLI flags override whatever the file says.

use crate::app::pipeline::MergeConfig;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Default location of config.toml for this platform, if one can be resolved.
pub fn default_config_path() -> Option<PathBuf> {
    match ProjectDirs::from("", "", constants::APP_ID) {
        Some(dirs) => {
            let path = dirs.config_dir().join(constants::CONFIG_FILE_NAME);
            tracing::debug!(path = %path.display(), "Platform config path resolved");
            Some(path)
        }
        None => {
            tracing::debug!("Could not determine platform config directory");
            None
        }
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
    /// `[merge]` section.
    pub merge: MergeSection,
    /// `[parsing]` section.
    pub parsing: ParsingSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[merge]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct MergeSection {
    /// Glob selecting input files by name.
    pub include_pattern: Option<String>,
    /// Sort each file before merging.
    pub sort_inputs: Option<bool>,
    /// Load and merge on a worker pool.
    pub parallel: Option<bool>,
    /// Worker pool size (0 = auto).
    pub worker_threads: Option<usize>,
}

/// `[parsing]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ParsingSection {
    /// Malformed-line diagnostics kept per file.
    pub max_parse_errors_per_file: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub merge: MergeConfig,

    /// Logging level string (applied before tracing is initialised).
    pub log_level: Option<String>,
}

/// Load and validate config.toml at `path`.
///
/// Returns the validated config and a list of non-fatal warnings. A missing
/// file yields defaults with no warnings; an unreadable or unparseable file
/// yields defaults plus a warning. Out-of-range values fall back to their
/// defaults individually.
pub fn load_config(path: &Path) -> (AppConfig, Vec<String>) {
    if !path.exists() {
        return (AppConfig::default(), Vec::new());
    }

    let raw = match read_raw(path) {
        Ok(raw) => raw,
        Err(e) => return (AppConfig::default(), vec![format!("{e}. Using defaults.")]),
    };

    let (config, errors) = validate(raw);
    let warnings = errors
        .into_iter()
        .map(|e| format!("{e}. Using default."))
        .collect();
    (config, warnings)
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate each field against named constants, accumulating all errors.
fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut errors = Vec::new();

    // -- Merge: include_pattern --
    if let Some(pattern) = raw.merge.include_pattern {
        let valid = !pattern.is_empty()
            && pattern.len() <= constants::MAX_INCLUDE_PATTERN_LENGTH
            && glob::Pattern::new(&pattern).is_ok();
        if valid {
            config.merge.load.include_pattern = pattern;
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "merge.include_pattern".to_string(),
                value: pattern,
                expected: format!(
                    "a glob of 1-{} characters such as \"{}\"",
                    constants::MAX_INCLUDE_PATTERN_LENGTH,
                    constants::DEFAULT_INCLUDE_PATTERN
                ),
            });
        }
    }

    if let Some(sort) = raw.merge.sort_inputs {
        config.merge.load.sort_inputs = sort;
    }
    if let Some(parallel) = raw.merge.parallel {
        config.merge.parallel = parallel;
    }

    // -- Merge: worker_threads --
    if let Some(threads) = raw.merge.worker_threads {
        if threads <= constants::MAX_WORKER_THREADS {
            config.merge.worker_threads = threads;
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "merge.worker_threads".to_string(),
                value: threads.to_string(),
                expected: format!("0-{} (0 = one per CPU core)", constants::MAX_WORKER_THREADS),
            });
        }
    }

    // -- Parsing: max_parse_errors_per_file --
    if let Some(max) = raw.parsing.max_parse_errors_per_file {
        let range =
            constants::MIN_PARSE_ERRORS_PER_FILE..=constants::ABSOLUTE_MAX_PARSE_ERRORS_PER_FILE;
        if range.contains(&max) {
            config.merge.load.parse.max_parse_errors_per_file = max;
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "parsing.max_parse_errors_per_file".to_string(),
                value: max.to_string(),
                expected: format!("{}-{}", range.start(), range.end()),
            });
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "logging.level".to_string(),
                value: level,
                expected: "error, warn, info, debug or trace".to_string(),
            });
        }
    }

    (config, errors)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.merge.load.include_pattern, "*.log");
        assert!(!config.merge.parallel);
        assert!(!config.merge.load.sort_inputs);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_valid_file_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[merge]
include_pattern = "server*.log"
sort_inputs = true
parallel = true
worker_threads = 4

[parsing]
max_parse_errors_per_file = 10

[logging]
level = "DEBUG"

[future]
unknown = 1
"#,
        )
        .unwrap();

        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.merge.load.include_pattern, "server*.log");
        assert!(config.merge.load.sort_inputs);
        assert!(config.merge.parallel);
        assert_eq!(config.merge.worker_threads, 4);
        assert_eq!(config.merge.load.parse.max_parse_errors_per_file, 10);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back_individually() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[merge]
include_pattern = "["
worker_threads = 100000
sort_inputs = true

[parsing]
max_parse_errors_per_file = 0

[logging]
level = "loud"
"#,
        )
        .unwrap();

        let (config, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 4, "got: {warnings:?}");
        assert_eq!(config.merge.load.include_pattern, "*.log");
        assert_eq!(config.merge.worker_threads, 0);
        assert!(config.merge.load.sort_inputs);
        assert_eq!(
            config.merge.load.parse.max_parse_errors_per_file,
            constants::MAX_PARSE_ERRORS_PER_FILE
        );
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unparseable_file_gives_defaults_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[merge\nparallel = ").unwrap();

        let (config, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 1);
        assert!(!config.merge.parallel);
    }
}
