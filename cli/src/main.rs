//! swarmset CLI - drone-swarm telemetry conversion tool
//!
//! Turns an XLSX telemetry export into the dataset JSON (or TypeScript
//! module) consumed by the swarm visualization front end.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use swarmset::render::{JsonFormat, ModuleOptions};

/// Drone-swarm telemetry workbooks to normalized visualization datasets
#[derive(Parser)]
#[command(
    name = "swarmset",
    version,
    about = "Build drone-swarm visualization datasets from telemetry workbooks",
    long_about = "swarmset - Drone-swarm telemetry dataset builder.\n\n\
                  Reads the first worksheet of an XLSX telemetry export, normalizes\n\
                  positions into a 0-100 footprint and writes JSON or a TypeScript module."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a workbook to dataset JSON
    Json {
        /// Input workbook path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Convert a workbook to an importable TypeScript module
    #[command(visible_alias = "ts")]
    Module {
        /// Input workbook path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name of the exported constant
        #[arg(long, default_value = "excelDataset")]
        export_name: String,

        /// Type the parsed dataset is asserted as
        #[arg(long, default_value = "DroneSwarmDataset")]
        type_name: String,

        /// Module the type is imported from
        #[arg(long, default_value = "@/types/drone")]
        type_import: String,

        /// Do not emit the type import line
        #[arg(long, conflicts_with = "type_import")]
        no_type_import: bool,

        /// Embed compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show a summary of the dataset a workbook produces
    Info {
        /// Input workbook path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Json {
            input,
            output,
            compact,
        } => {
            let pb = create_spinner("Reading workbook...");

            let dataset = swarmset::build_dataset_from_file(&input)?;
            pb.set_message("Rendering to JSON...");

            let json = swarmset::render::to_json(&dataset, json_format(compact))?;

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Wrote {} records to {}",
                    "✓".green().bold(),
                    dataset.len(),
                    path.display()
                );
            }
        }

        Commands::Module {
            input,
            output,
            export_name,
            type_name,
            type_import,
            no_type_import,
            compact,
        } => {
            let pb = create_spinner("Reading workbook...");

            let dataset = swarmset::build_dataset_from_file(&input)?;
            pb.set_message("Rendering TypeScript module...");

            let mut options = ModuleOptions::new()
                .with_export_name(export_name)
                .with_type_name(type_name)
                .with_json_format(json_format(compact));
            options = if no_type_import {
                options.without_type_import()
            } else {
                options.with_type_import(type_import)
            };

            let module = swarmset::render::to_typescript_module(&dataset, &options)?;

            pb.finish_and_clear();
            write_output(output.as_ref(), &module)?;

            if let Some(path) = output {
                println!(
                    "{} Wrote {} records to {}",
                    "✓".green().bold(),
                    dataset.len(),
                    path.display()
                );
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing workbook...");

            let dataset = swarmset::build_dataset_from_file(&input)?;

            pb.finish_and_clear();
            print_info(&input, &dataset);
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn print_info(input: &std::path::Path, dataset: &swarmset::Dataset) {
    let meta = &dataset.metadata;

    println!("{}", "Dataset Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );
    println!("{}: {}", "Records".bold(), dataset.len());
    println!("{}: {}", "Drones".bold(), meta.total_drones);
    println!("{}: {}", "Time points".bold(), meta.total_time_points);
    if let (Some(first), Some(last)) = (
        dataset.time_point_labels.first(),
        dataset.time_point_labels.last(),
    ) {
        println!("{}: {} .. {}", "Timeline".bold(), first, last);
    }

    let bb = &meta.bounding_box;
    println!(
        "{}: ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
        "Bounds".bold(),
        bb.min.x,
        bb.min.y,
        bb.min.z,
        bb.max.x,
        bb.max.y,
        bb.max.z
    );

    for (title, counts) in [
        ("Swarms", &meta.swarm_counts),
        ("Tasks", &meta.task_counts),
        ("States", &meta.state_counts),
    ] {
        println!("\n{}", title.cyan().bold());
        println!("{}", "─".repeat(40));
        if counts.is_empty() {
            println!("{}", "(none)".dimmed());
        }
        for (key, count) in counts {
            println!("{}: {}", key.bold(), count);
        }
    }
}

fn print_version() {
    println!("{} {}", "swarmset".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Drone-swarm telemetry workbooks to visualization datasets");
    println!();
    println!("Input: XLSX (first worksheet)");
    println!("Output: JSON, TypeScript module");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_module_defaults() {
        let cli = Cli::try_parse_from(["swarmset", "module", "telemetry.xlsx"]).unwrap();
        match cli.command {
            Commands::Module {
                export_name,
                type_import,
                no_type_import,
                ..
            } => {
                assert_eq!(export_name, "excelDataset");
                assert_eq!(type_import, "@/types/drone");
                assert!(!no_type_import);
            }
            _ => panic!("expected module command"),
        }
    }
}
