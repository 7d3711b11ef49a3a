// LogMerge - core/writer.rs
//
// Serialisation of the merged sequence to `final_merge_logs.log`.
//
// Line format: `<timestamp> <message>\n`, timestamp in canonical ISO-8601.
// An empty message still gets the separating space, so the line reads
// `<timestamp> ` and re-parses to an entry with an empty message.
//
// The file is written next to its final location under a `.tmp` name and
// renamed over the target only once complete; a failed run never leaves a
// half-written output file behind.

use crate::core::model::LogEntry;
use crate::util::constants;
use crate::util::error::WriteError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write `entries` to any writer, one line each. Returns the line count.
pub fn write_entries<W: Write>(entries: &[LogEntry], writer: W) -> io::Result<usize> {
    let mut writer = BufWriter::new(writer);
    for entry in entries {
        writeln!(writer, "{} {}", entry.timestamp(), entry.message())?;
    }
    writer.flush()?;
    Ok(entries.len())
}

/// Path of the merged output file inside `output_dir`.
pub fn output_path(output_dir: &Path) -> PathBuf {
    output_dir.join(constants::OUTPUT_FILE_NAME)
}

/// Write the merged log into `output_dir`, replacing any previous output.
///
/// Returns the full path of the written file.
pub fn write_merged(entries: &[LogEntry], output_dir: &Path) -> Result<PathBuf, WriteError> {
    if !output_dir.is_dir() {
        return Err(WriteError::OutputDirMissing {
            path: output_dir.to_path_buf(),
        });
    }

    let final_path = output_path(output_dir);
    let tmp_path = output_dir.join(format!(
        "{}{}",
        constants::OUTPUT_FILE_NAME,
        constants::TEMP_FILE_SUFFIX
    ));

    let file = File::create(&tmp_path).map_err(|source| WriteError::Create {
        path: tmp_path.clone(),
        source,
    })?;

    // On any failure remove the temp file; a previous output stays untouched.
    let count = match write_entries(entries, file) {
        Ok(count) => count,
        Err(source) => {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(WriteError::Io {
                path: tmp_path,
                source,
            });
        }
    };

    if let Err(source) = std::fs::rename(&tmp_path, &final_path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(WriteError::Persist {
            from: tmp_path,
            to: final_path,
            source,
        });
    }

    tracing::info!(
        path = %final_path.display(),
        entries = count,
        "Merged log written"
    );
    Ok(final_path)
}

// =============================================================================
// Tests
// =============================================================================
