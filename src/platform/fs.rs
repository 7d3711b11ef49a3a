// LogMerge - platform/fs.rs
//
// Directory resolution and preparation for the CLI layer.
// The pipeline itself only re-checks these invariants; this is where they
// are established.

use crate::util::error::{DiscoveryError, LogMergeError};
use std::io;
use std::path::{Path, PathBuf};

/// Make `path` absolute against the current working directory.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// The input folder must already exist and be a directory.
pub fn require_input_dir(path: &Path) -> Result<(), DiscoveryError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DiscoveryError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(_) => Err(DiscoveryError::RootNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Create the output folder if it does not exist yet.
///
/// Returns `true` if it was created. A path that exists but is not a
/// directory is an error.
pub fn ensure_output_dir(path: &Path) -> Result<bool, LogMergeError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(false),
        Ok(_) => Err(LogMergeError::Io {
            path: path.to_path_buf(),
            operation: "preparing output folder",
            source: io::Error::new(io::ErrorKind::AlreadyExists, "not a directory"),
        }),
        Err(_) => {
            std::fs::create_dir_all(path).map_err(|source| LogMergeError::Io {
                path: path.to_path_buf(),
                operation: "creating output folder",
                source,
            })?;
            tracing::info!(path = %path.display(), "Created output folder");
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize_relative() {
        let abs = absolutize(Path::new("logs")).unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("logs"));
    }

    #[test]
    fn test_require_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(require_input_dir(dir.path()).is_ok());

        let file = dir.path().join("a.log");
        std::fs::write(&file, "").unwrap();
        assert!(matches!(
            require_input_dir(&file),
            Err(DiscoveryError::NotADirectory { .. })
        ));
        assert!(matches!(
            require_input_dir(&dir.path().join("missing")),
            Err(DiscoveryError::RootNotFound { .. })
        ));
    }

    #[test]
    fn test_ensure_output_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("merged").join("today");
        assert!(ensure_output_dir(&out).unwrap());
        assert!(out.is_dir());
        assert!(!ensure_output_dir(&out).unwrap());
    }

    #[test]
    fn test_ensure_output_dir_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");
        std::fs::write(&file, "").unwrap();
        assert!(ensure_output_dir(&file).is_err());
    }
}
