use clap::{Parser, Subcommand};
use console::style;
use metaclean::config::Config;
use metaclean::directory::{self, CleanupEvent, DirectorySummary};
use metaclean::error::InspectError;
use metaclean::inspector;
use metaclean::report;
use metaclean::stripper::{self, StripOptions};
use metaclean::{logging, ui, worker};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use tracing::debug;

type CliResult = Result<ExitCode, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "metaclean")]
#[command(about = "Remove embedded metadata from images, documents and media files")]
#[command(version)]
struct Cli {
    /// Show per-file progress and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to metaclean/config.toml in the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Strip metadata from a file or every supported file in a directory
    Remove {
        path: PathBuf,

        /// Output file, or output directory when `path` is a directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace the source file instead of writing a copy
        #[arg(long)]
        overwrite: bool,

        /// Show the current metadata before removing it
        #[arg(long)]
        show_metadata: bool,

        /// Do not ask for confirmation (asked after --show-metadata and for directories)
        #[arg(short, long)]
        yes: bool,

        /// Carry the EXIF block over to re-encoded images
        #[arg(long)]
        keep_exif: bool,

        /// Only process the top level of a directory
        #[arg(long)]
        no_recursive: bool,
    },
    /// Show the metadata of a file
    Info {
        path: PathBuf,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported file formats
    Formats,
    /// List files in a directory that carry metadata
    Scan {
        dir: PathBuf,

        /// Only look at the top level of the directory
        #[arg(long)]
        no_recursive: bool,

        /// Write the results to a .csv or .json file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            ui::print_error(&error.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult {
    let config = Config::load(cli.config.as_deref())?;
    debug!(?config, "effective config");

    match cli.command {
        Command::Remove {
            path,
            output,
            overwrite,
            show_metadata,
            yes,
            keep_exif,
            no_recursive,
        } => {
            let mut options = config.strip_options(cli.verbose);
            options.keep_exif |= keep_exif;
            let request = RemoveRequest {
                output,
                overwrite,
                yes,
                options,
            };

            if !path.exists() {
                ui::print_error(&format!("File not found: {}", path.display()));
                return Ok(ExitCode::FAILURE);
            }
            if path.is_dir() {
                remove_directory(path, config.recursive && !no_recursive, request)
            } else {
                remove_file(&path, show_metadata, request)
            }
        }
        Command::Info { path, json } => info(&path, json),
        Command::Formats => {
            ui::render_formats();
            Ok(ExitCode::SUCCESS)
        }
        Command::Scan {
            dir,
            no_recursive,
            export,
        } => scan(&dir, config.recursive && !no_recursive, export.as_deref()),
    }
}

struct RemoveRequest {
    output: Option<PathBuf>,
    overwrite: bool,
    yes: bool,
    options: StripOptions,
}

fn remove_file(path: &Path, show_metadata: bool, request: RemoveRequest) -> CliResult {
    // Only a metadata preview asks before going ahead.
    if show_metadata {
        match inspector::get_metadata(path) {
            Ok(metadata) => ui::render_image_metadata(path, &metadata),
            Err(error) => println!("{}", style(error).dim()),
        }
        println!();
    }

    if show_metadata && !request.yes {
        let action = if request.overwrite {
            "Overwrite"
        } else {
            "Remove metadata from"
        };
        if !ui::confirm(&format!("{action} {}?", path.display()))? {
            println!("{}", style("Cancelled.").dim());
            return Ok(ExitCode::SUCCESS);
        }
    }

    let result = stripper::remove_metadata(
        path,
        request.output.as_deref(),
        request.overwrite,
        &request.options,
    );
    ui::render_removal_result(&result);

    if !result.success {
        return Ok(ExitCode::FAILURE);
    }

    if request.options.verbose {
        let output = PathBuf::from(&result.message);
        if let Ok(metadata) = inspector::get_metadata(&output) {
            ui::render_image_metadata(&output, &metadata);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn remove_directory(root: PathBuf, recursive: bool, request: RemoveRequest) -> CliResult {
    if let Some(output) = &request.output
        && output.exists()
        && !output.is_dir()
    {
        ui::print_error(&format!(
            "Output must be a directory when processing a directory: {}",
            output.display()
        ));
        return Ok(ExitCode::FAILURE);
    }

    if !request.yes {
        let prompt = if request.overwrite {
            format!("Overwrite every supported file in {}?", root.display())
        } else {
            format!("Remove metadata from every supported file in {}?", root.display())
        };
        if !ui::confirm(&prompt)? {
            println!("{}", style("Cancelled.").dim());
            return Ok(ExitCode::SUCCESS);
        }
    }

    let verbose = request.options.verbose;
    let (sender, events) = mpsc::channel::<CleanupEvent>();
    let outcome = worker::run_in_background(move || {
        directory::process_directory(
            &root,
            recursive,
            request.output.as_deref(),
            request.overwrite,
            &request.options,
            Some(&sender),
        )
    });

    let mut progress = ui::CleanupProgress::new(verbose);
    for event in events {
        progress.handle(&event);
    }

    let summary: DirectorySummary = match outcome.recv() {
        Ok(result) => result?,
        Err(_) => return Err("directory processing stopped unexpectedly".into()),
    };

    println!(
        "Processing complete. {} files processed, {} errors.",
        summary.processed, summary.errors
    );
    Ok(if summary.errors == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn info(path: &Path, json: bool) -> CliResult {
    if !path.exists() {
        ui::print_error(&format!("File not found: {}", path.display()));
        return Ok(ExitCode::FAILURE);
    }
    if path.is_dir() {
        ui::print_error("Please specify a file, not a directory");
        return Ok(ExitCode::FAILURE);
    }

    let details = report::file_details(path)?;
    let metadata = match inspector::get_metadata(path) {
        Ok(metadata) => Some(metadata),
        Err(InspectError::Unavailable(_)) => None,
        Err(error) => {
            ui::print_error(&error.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        let value = serde_json::json!({
            "file": details,
            "metadata": metadata,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(ExitCode::SUCCESS);
    }

    match &metadata {
        Some(metadata) => ui::render_image_metadata(path, metadata),
        None => println!(
            "{}",
            style(format!(
                "No embedded image metadata can be read from {}",
                path.display()
            ))
            .dim()
        ),
    }
    ui::render_file_details(&details);
    Ok(ExitCode::SUCCESS)
}

fn scan(dir: &Path, recursive: bool, export: Option<&Path>) -> CliResult {
    let hits = directory::scan_directory(dir, recursive)?;

    ui::render_scan_hits(dir, &hits);

    if let Some(export_path) = export {
        let format = report::export_scan(&hits, export_path)?;
        ui::print_success(&format!(
            "Report written to {} ({format:?})",
            export_path.display()
        ));
    }
    Ok(ExitCode::SUCCESS)
}
