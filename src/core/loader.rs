// LogMerge - core/loader.rs
//
// Input enumeration and per-file loading.
//
// Enumeration is a single-level `walkdir` listing with no sorting, so files
// reach the merge scheduler in directory enumeration order. Only regular
// files whose name matches the include pattern (`*.log` by default)
// contribute a sequence.
//
// An unreadable file is fatal for the whole run: silently dropping one
// server's logs would produce a merged log that looks complete but is not.

use crate::core::model::{FileSummary, LogSequence};
use crate::core::parser::{self, ParseConfig};
use crate::util::error::{DiscoveryError, LoadError, ParseError};
use std::path::{Path, PathBuf};

/// Configuration for loading input files.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Glob matched against file names (not paths).
    pub include_pattern: String,

    /// Stable-sort each loaded sequence by timestamp before merging.
    ///
    /// Off by default: the merge is only correct for chronological inputs,
    /// and out-of-order files are reported rather than silently reordered.
    pub sort_inputs: bool,

    pub parse: ParseConfig,
}

impl Default for LoadConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            include_pattern: constants::DEFAULT_INCLUDE_PATTERN.to_string(),
            sort_inputs: false,
            parse: ParseConfig::default(),
        }
    }
}

/// One loaded input file.
#[derive(Debug)]
pub struct LoadedFile {
    pub path: PathBuf,

    /// Parsed entries: line order, or timestamp order when `sort_inputs` is set.
    pub entries: LogSequence,

    /// Malformed-line diagnostics kept for this file.
    pub errors: Vec<ParseError>,

    /// Total malformed lines skipped.
    pub malformed_lines: usize,

    /// Whether the file was chronological as read from disk.
    pub chronological: bool,
}

impl LoadedFile {
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            path: self.path.clone(),
            entry_count: self.entries.len(),
            malformed_count: self.malformed_lines,
            chronological: self.chronological,
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// List the log files directly inside `input_dir`, in enumeration order.
///
/// Subdirectories are not descended into. Symlinks are followed so a linked
/// log file is treated like a regular one.
///
/// # Fatal errors
/// `RootNotFound` / `NotADirectory` if `input_dir` is unusable,
/// `InvalidPattern` for a bad glob, `Traversal` if the folder itself cannot
/// be listed. An inaccessible entry whose name matches the pattern is still
/// returned, so reading it fails later as an unreadable file; any other
/// inaccessible entry is skipped.
pub fn discover_log_files(
    input_dir: &Path,
    include_pattern: &str,
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let pattern =
        glob::Pattern::new(include_pattern).map_err(|source| DiscoveryError::InvalidPattern {
            pattern: include_pattern.to_string(),
            source,
        })?;

    let meta = std::fs::metadata(input_dir).map_err(|_| DiscoveryError::RootNotFound {
        path: input_dir.to_path_buf(),
    })?;
    if !meta.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: input_dir.to_path_buf(),
        });
    }

    let walker = walkdir::WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true);

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            // Listing the root itself failed.
            Err(source) if source.depth() == 0 || source.path().is_none() => {
                return Err(DiscoveryError::Traversal {
                    path: input_dir.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                // Inaccessible entry. A matching name is still handed to the
                // loader so the failure surfaces as an unreadable log file.
                let Some(path) = e.path().map(Path::to_path_buf) else {
                    continue;
                };
                let matched = path
                    .file_name()
                    .is_some_and(|n| pattern.matches(&n.to_string_lossy()));
                if matched {
                    tracing::debug!(
                        file = %path.display(),
                        error = %e,
                        "Inaccessible log file"
                    );
                    files.push(path);
                } else {
                    tracing::debug!(
                        file = %path.display(),
                        error = %e,
                        "Ignoring inaccessible entry"
                    );
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !pattern.matches(&name) {
            tracing::debug!(file = %entry.path().display(), "Ignoring non-log file");
            continue;
        }

        files.push(entry.into_path());
    }

    tracing::debug!(
        dir = %input_dir.display(),
        files = files.len(),
        "Log file discovery complete"
    );

    Ok(files)
}

// =============================================================================
// Loading
// =============================================================================

/// Read and parse one log file.
///
/// Invalid UTF-8 is decoded lossily so a stray binary byte only affects the
/// line it appears on.
pub fn load_file(path: &Path, config: &LoadConfig) -> Result<LoadedFile, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let result = parser::parse_content(&content, path, &config.parse);
    let chronological = result.is_sorted();
    let mut entries = result.entries;

    if !chronological {
        if config.sort_inputs {
            tracing::info!(file = %path.display(), "Sorting out-of-order log file");
            entries.sort_by_key(|e| e.timestamp());
        } else {
            tracing::warn!(
                file = %path.display(),
                "Log file is not in chronological order; merged output will not be fully sorted"
            );
        }
    }

    Ok(LoadedFile {
        path: path.to_path_buf(),
        entries,
        errors: result.errors,
        malformed_lines: result.malformed_lines,
        chronological,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(files: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_discovers_only_log_files_at_top_level() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("server1.log"), "").unwrap();
        fs::write(root.join("server2.log"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("server3.log.gz"), "").unwrap();
        fs::create_dir(root.join("archive.log")).unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("deep.log"), "").unwrap();

        let files = discover_log_files(root, "*.log").unwrap();
        assert_eq!(names(&files), ["server1.log", "server2.log"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_entries_do_not_abort_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("good.log"), "").unwrap();
        std::os::unix::fs::symlink(root.join("gone"), root.join("notes.txt")).unwrap();
        std::os::unix::fs::symlink(root.join("gone"), root.join("broken.log")).unwrap();

        let files = discover_log_files(root, "*.log").unwrap();
        assert_eq!(names(&files), ["broken.log", "good.log"]);

        let broken = files.iter().find(|p| p.ends_with("broken.log")).unwrap();
        let result = load_file(broken, &LoadConfig::default());
        assert!(matches!(result, Err(LoadError::Unreadable { .. })));
    }

    #[test]
    fn test_empty_directory_yields_no_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_log_files(dir.path(), "*.log").unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_log_files(&dir.path().join("missing"), "*.log");
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }

    #[test]
    fn test_file_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("server1.log");
        fs::write(&file, "").unwrap();
        let result = discover_log_files(&file, "*.log");
        assert!(matches!(result, Err(DiscoveryError::NotADirectory { .. })));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_log_files(dir.path(), "[");
        assert!(matches!(result, Err(DiscoveryError::InvalidPattern { .. })));
    }

    #[test]
    fn test_load_file_keeps_line_order_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server1.log");
        fs::write(
            &path,
            "2025-07-09T10:05:00 late\ngarbage line\n\n2025-07-09T10:00:00 early\n",
        )
        .unwrap();

        let loaded = load_file(&path, &LoadConfig::default()).unwrap();
        let messages: Vec<_> = loaded.entries.iter().map(|e| e.message()).collect();
        assert_eq!(messages, ["late", "early"]);
        assert!(!loaded.chronological);
        assert_eq!(loaded.malformed_lines, 1);
        assert_eq!(loaded.errors.len(), 1);
    }

    #[test]
    fn test_load_file_sorts_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server1.log");
        fs::write(
            &path,
            "2025-07-09T10:05:00 late\n2025-07-09T10:00:00 early\n2025-07-09T10:00:00 early-too\n",
        )
        .unwrap();

        let config = LoadConfig {
            sort_inputs: true,
            ..LoadConfig::default()
        };
        let loaded = load_file(&path, &config).unwrap();
        let messages: Vec<_> = loaded.entries.iter().map(|e| e.message()).collect();
        assert_eq!(messages, ["early", "early-too", "late"]);
        assert!(!loaded.chronological);
        assert_eq!(loaded.summary().entry_count, 3);
    }

    #[test]
    fn test_load_file_lossy_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server1.log");
        fs::write(&path, b"2025-07-09T10:00:00 bad \xff byte\n").unwrap();

        let loaded = load_file(&path, &LoadConfig::default()).unwrap();
        assert_eq!(loaded.entries.len(), 1);
        assert!(loaded.entries[0].message().starts_with("bad"));
    }

    #[test]
    fn test_load_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_file(&dir.path().join("gone.log"), &LoadConfig::default());
        assert!(matches!(result, Err(LoadError::Unreadable { .. })));
    }
}
