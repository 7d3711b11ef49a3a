// LogMerge - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing (prompting for folders that were not given)
// 2. config.toml loading and logging initialisation
// 3. Input/output folder validation and creation
// 4. Running the merge pipeline

use clap::Parser;
use logmerge::app::pipeline::MergePipeline;
use logmerge::platform;
use logmerge::util;
use logmerge::util::error::LogMergeError;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// LogMerge - merge per-server log files into one time-ordered log.
///
/// Every `.log` file in the input folder is parsed as
/// `<ISO-8601 timestamp> <message>` lines and merged into
/// `final_merge_logs.log` in the output folder.
#[derive(Parser, Debug)]
#[command(name = "logmerge", version, about)]
struct Cli {
    /// Folder containing the server log files (prompted for if omitted).
    #[arg(long = "input-folder", alias = "input_folder")]
    input_folder: Option<PathBuf>,

    /// Folder to write final_merge_logs.log into (prompted for if omitted).
    #[arg(long = "output-folder", alias = "output_folder")]
    output_folder: Option<PathBuf>,

    /// Path to a config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Sort each file by timestamp before merging.
    #[arg(long = "sort-inputs")]
    sort_inputs: bool,

    /// Load and merge files on a worker pool.
    #[arg(long = "parallel")]
    parallel: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(platform::config::default_config_path);
    let (mut app_config, config_warnings) = match &config_path {
        Some(path) => platform::config::load_config(path),
        None => Default::default(),
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::debug!(
        version = util::constants::APP_VERSION,
        config = ?config_path,
        "LogMerge starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    // CLI flags override config.toml.
    if cli.sort_inputs {
        app_config.merge.load.sort_inputs = true;
    }
    if cli.parallel {
        app_config.merge.parallel = true;
    }

    if let Err(e) = run(&cli, app_config) {
        tracing::error!(error = %e, "Merge failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, app_config: platform::config::AppConfig) -> util::error::Result<()> {
    let input = resolve_folder(
        cli.input_folder.as_ref(),
        "Enter the path to the input folder containing log files: ",
    )?;
    let output = resolve_folder(
        cli.output_folder.as_ref(),
        "Enter the path to the output folder to save merged logs: ",
    )?;

    platform::fs::require_input_dir(&input)?;
    if platform::fs::ensure_output_dir(&output)? {
        println!("Output folder '{}' did not exist and was created.", output.display());
    }

    println!("Input folder:  {}", input.display());
    println!("Output folder: {}", output.display());
    println!("Reading and merging log files...");

    let summary = MergePipeline::new(input, output, app_config.merge).run()?;

    if !summary.unsorted_files.is_empty() {
        println!(
            "Warning: {} file(s) were not in chronological order.",
            summary.unsorted_files.len()
        );
    }
    println!(
        "Merged {} entries from {} file(s) ({} malformed line(s) skipped).",
        summary.total_entries, summary.files_merged, summary.malformed_lines
    );
    println!("Merged logs written to {}", summary.output_path.display());
    Ok(())
}

/// Use the CLI value if given, otherwise prompt on stdin; then make it absolute.
fn resolve_folder(arg: Option<&PathBuf>, prompt: &str) -> util::error::Result<PathBuf> {
    let raw = match arg {
        Some(path) => path.clone(),
        None => PathBuf::from(prompt_line(prompt).map_err(|source| LogMergeError::Io {
            path: PathBuf::from("<stdin>"),
            operation: "reading folder path",
            source,
        })?),
    };
    if raw.as_os_str().is_empty() {
        return Err(LogMergeError::Io {
            path: raw,
            operation: "resolving folder path",
            source: io::Error::new(io::ErrorKind::InvalidInput, "no folder path given"),
        });
    }
    platform::fs::absolutize(&raw).map_err(|source| LogMergeError::Io {
        path: raw,
        operation: "resolving folder path",
        source,
    })
}

fn prompt_line(prompt: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
