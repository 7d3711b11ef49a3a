// LogMerge - app/pipeline.rs
//
// Merge run orchestration: discover → load → merge → write.
//
// Architecture:
//   - `MergePipeline` owns the two directory handles and the validated
//     configuration; nothing is read from process-wide state.
//   - With `parallel` set, file loading and the pairwise merges of each
//     round run on a dedicated rayon pool. Results are collected in input
//     order, so the output is identical to a sequential run.
//   - Any I/O failure (unreadable input directory or file, unwritable
//     output) aborts the run; malformed lines never do.

use crate::core::loader::{self, LoadConfig, LoadedFile};
use crate::core::merge;
use crate::core::model::{LogSequence, MergeSummary};
use crate::core::writer;
use crate::util::constants;
use crate::util::error::{LoadError, LogMergeError, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Tunables for a merge run.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub load: LoadConfig,

    /// Load files and merge pairs on a rayon pool.
    pub parallel: bool,

    /// Pool size when `parallel` is set. 0 means one thread per CPU core.
    pub worker_threads: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            load: LoadConfig::default(),
            parallel: false,
            worker_threads: constants::DEFAULT_WORKER_THREADS,
        }
    }
}

/// A configured merge of one input directory into one output directory.
#[derive(Debug, Clone)]
pub struct MergePipeline {
    input_dir: PathBuf,
    output_dir: PathBuf,
    config: MergeConfig,
}

impl MergePipeline {
    /// Both directories are expected to exist already; `run` re-checks and
    /// fails rather than creating anything.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: MergeConfig,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            config,
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run the whole pipeline and write `final_merge_logs.log`.
    pub fn run(&self) -> Result<MergeSummary> {
        let started = Instant::now();

        tracing::info!(
            input = %self.input_dir.display(),
            output = %self.output_dir.display(),
            parallel = self.config.parallel,
            sort_inputs = self.config.load.sort_inputs,
            "Merge started"
        );

        let files = self.discover()?;

        let pool = if self.config.parallel {
            Some(self.build_pool()?)
        } else {
            None
        };

        let loaded = match &pool {
            Some(pool) => pool.install(|| self.load_parallel(&files))?,
            None => self.load_sequential(&files)?,
        };

        let mut summary = MergeSummary {
            files_merged: loaded.len(),
            ..MergeSummary::default()
        };
        let mut sequences: Vec<LogSequence> = Vec::with_capacity(loaded.len());
        for file in loaded {
            summary.malformed_lines += file.malformed_lines;
            if !file.chronological {
                summary.unsorted_files.push(file.path.clone());
            }
            summary.file_summaries.push(file.summary());
            sequences.push(file.entries);
        }

        let (merged, stats) = match &pool {
            Some(pool) => pool.install(|| merge::merge_all(sequences, true)),
            None => merge::merge_all(sequences, false),
        };
        summary.merge_rounds = stats.rounds;
        summary.total_entries = merged.len();

        summary.output_path = writer::write_merged(&merged, &self.output_dir)?;
        summary.duration = started.elapsed();

        tracing::info!(
            files = summary.files_merged,
            entries = summary.total_entries,
            malformed = summary.malformed_lines,
            unsorted = summary.unsorted_files.len(),
            rounds = summary.merge_rounds,
            duration_ms = summary.duration.as_millis() as u64,
            "Merge complete"
        );

        Ok(summary)
    }

    /// Log files in enumeration order, minus a previous merge output when the
    /// input and output directories are the same.
    fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut files =
            loader::discover_log_files(&self.input_dir, &self.config.load.include_pattern)?;

        let previous_output = writer::output_path(&self.output_dir);
        files.retain(|path| {
            let is_output = same_file(path, &previous_output);
            if is_output {
                tracing::info!(
                    file = %path.display(),
                    "Skipping previous merge output found in input folder"
                );
            }
            !is_output
        });

        if files.is_empty() {
            tracing::warn!(
                dir = %self.input_dir.display(),
                pattern = %self.config.load.include_pattern,
                "No log files found; output will be empty"
            );
        }
        Ok(files)
    }

    fn load_sequential(
        &self,
        files: &[PathBuf],
    ) -> std::result::Result<Vec<LoadedFile>, LoadError> {
        files
            .iter()
            .map(|path| loader::load_file(path, &self.config.load))
            .collect()
    }

    fn load_parallel(
        &self,
        files: &[PathBuf],
    ) -> std::result::Result<Vec<LoadedFile>, LoadError> {
        files
            .par_iter()
            .map(|path| loader::load_file(path, &self.config.load))
            .collect()
    }

    fn build_pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_threads)
            .thread_name(|idx| format!("logmerge-worker-{idx}"))
            .build()
            .map_err(|e| LogMergeError::Io {
                path: self.input_dir.clone(),
                operation: "starting worker pool",
                source: std::io::Error::other(e),
            })
    }
}

/// Whether two paths name the same file. Falls back to path equality when
/// either side cannot be canonicalised (e.g. the output does not exist yet).
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_run_merges_directory() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(
            input.path().join("a.log"),
            "2025-07-09T10:00:00 a0\n2025-07-09T10:04:00 a4\n",
        )
        .unwrap();
        fs::write(
            input.path().join("b.log"),
            "2025-07-09T10:02:00 b2\nnot a timestamp\n",
        )
        .unwrap();
        fs::write(input.path().join("ignored.txt"), "2025-07-09T09:00:00 x\n").unwrap();

        let pipeline = MergePipeline::new(input.path(), output.path(), MergeConfig::default());
        let summary = pipeline.run().unwrap();

        assert_eq!(summary.files_merged, 2);
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.malformed_lines, 1);
        assert_eq!(summary.merge_rounds, 1);
        assert!(summary.unsorted_files.is_empty());
        assert_eq!(
            fs::read_to_string(&summary.output_path).unwrap(),
            "2025-07-09T10:00:00 a0\n2025-07-09T10:02:00 b2\n2025-07-09T10:04:00 a4\n"
        );
    }

    #[test]
    fn test_run_skips_previous_output_in_shared_folder() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.log"), "2025-07-09T10:00:00 a\n").unwrap();

        let pipeline = MergePipeline::new(dir.path(), dir.path(), MergeConfig::default());
        pipeline.run().unwrap();
        let second = pipeline.run().unwrap();

        assert_eq!(second.files_merged, 1);
        assert_eq!(second.total_entries, 1);
    }

    #[test]
    fn test_run_reports_unsorted_files() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(
            input.path().join("a.log"),
            "2025-07-09T10:05:00 late\n2025-07-09T10:00:00 early\n",
        )
        .unwrap();

        let summary = MergePipeline::new(input.path(), output.path(), MergeConfig::default())
            .run()
            .unwrap();
        assert_eq!(summary.unsorted_files.len(), 1);
        assert!(!summary.file_summaries[0].chronological);
    }

    #[test]
    fn test_run_missing_output_dir_fails() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let missing = output.path().join("missing");

        let result = MergePipeline::new(input.path(), &missing, MergeConfig::default()).run();
        assert!(matches!(result, Err(LogMergeError::Write(_))));
    }

    #[test]
    fn test_run_missing_input_dir_fails() {
        let output = tempfile::tempdir().unwrap();
        let missing = output.path().join("missing");

        let result = MergePipeline::new(&missing, output.path(), MergeConfig::default()).run();
        assert!(matches!(result, Err(LogMergeError::Discovery(_))));
    }
}
