// LogMerge - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every error carries the path it concerns so fatal messages are actionable.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for a merge run.
/// Errors are categorised by the stage that produced them.
#[derive(Debug)]
pub enum LogMergeError {
    /// Enumerating the input directory failed.
    Discovery(DiscoveryError),

    /// A log file could not be read.
    Load(LoadError),

    /// The merged output could not be written.
    Write(WriteError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LogMergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Load(e) => write!(f, "Load error: {e}"),
            Self::Write(e) => write!(f, "Write error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LogMergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Discovery(e) => Some(e),
            Self::Load(e) => Some(e),
            Self::Write(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors raised while enumerating the input directory.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The input directory does not exist.
    RootNotFound { path: PathBuf },

    /// The input path exists but is not a directory.
    NotADirectory { path: PathBuf },

    /// The include pattern is not a valid glob.
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// The directory listing itself failed (permissions, I/O).
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Input folder '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Input folder '{}' is not a directory", path.display())
            }
            Self::InvalidPattern { pattern, source } => {
                write!(f, "Invalid include pattern '{pattern}': {source}")
            }
            Self::Traversal { path, source } => {
                write!(f, "Error listing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for LogMergeError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors related to log line parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The first token of a non-blank line is not an ISO-8601 timestamp.
    MalformedLine {
        file: PathBuf,
        line_number: u64,
        raw_line: String,
        reason: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine {
                file,
                line_number,
                raw_line,
                reason,
            } => write!(
                f,
                "'{}' line {line_number}: {reason}: {raw_line}",
                file.display()
            ),
        }
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Errors raised while reading a single log file.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be opened or read. Fatal for the whole run.
    Unreadable { path: PathBuf, source: io::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { path, source } => {
                write!(f, "Cannot read log file '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreadable { source, .. } => Some(source),
        }
    }
}

impl From<LoadError> for LogMergeError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

// ---------------------------------------------------------------------------
// Write errors
// ---------------------------------------------------------------------------

/// Errors raised while writing the merged output file.
#[derive(Debug)]
pub enum WriteError {
    /// The output directory does not exist (or is not a directory) at write time.
    OutputDirMissing { path: PathBuf },

    /// The temporary output file could not be created.
    Create { path: PathBuf, source: io::Error },

    /// Writing or flushing entries failed.
    Io { path: PathBuf, source: io::Error },

    /// The finished temporary file could not be renamed into place.
    Persist {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutputDirMissing { path } => {
                write!(f, "Output folder '{}' is not a directory", path.display())
            }
            Self::Create { path, source } => {
                write!(f, "Cannot create '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Failed writing '{}': {source}", path.display())
            }
            Self::Persist { from, to, source } => write!(
                f,
                "Cannot rename '{}' to '{}': {source}",
                from.display(),
                to.display()
            ),
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Create { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Persist { source, .. } => Some(source),
            Self::OutputDirMissing { .. } => None,
        }
    }
}

impl From<WriteError> for LogMergeError {
    fn from(e: WriteError) -> Self {
        Self::Write(e)
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

/// Convenience type alias for LogMerge results.
pub type Result<T> = std::result::Result<T, LogMergeError>;
