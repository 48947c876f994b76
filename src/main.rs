use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use contignado::filter::ContigFilter;
use contignado::params;
use contignado::report::FilterReport;
use contignado::Assembly;

pub fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .header(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .literal(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
}

#[derive(Parser)]
#[command(author, version, about, long_about = None, styles=get_styles())]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, required = false, default_value = "2")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Count contigs passing a minimum length threshold
    Filter {
        /// Assembly in FASTA format
        #[arg(short, long)]
        assembly: PathBuf,

        /// Minimum contig length
        #[arg(long, allow_hyphen_values = true)]
        min_length: String,

        /// Path for counts output in JSON
        #[arg(short, long, required = false)]
        stats: Option<PathBuf>,
    },

    /// Write contigs within a minimum and maximum length to a new assembly
    FilterMax {
        /// Assembly in FASTA format
        #[arg(short, long)]
        assembly: PathBuf,

        /// Minimum contig length
        #[arg(long, allow_hyphen_values = true)]
        min_length: String,

        /// Maximum contig length
        #[arg(long, allow_hyphen_values = true)]
        max_length: String,

        /// Output file name
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path for report output in JSON
        #[arg(short, long, required = false)]
        report: Option<PathBuf>,
    },
}

fn validate_fasta_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Assembly file does not exist: {}",
            path.display()
        ));
    }
    Ok(())
}

fn assembly_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("assembly")
        .to_string()
}

fn write_json_file(path: &Path, json: &str) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    colog::init();

    let cli = Cli::parse();
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    log::set_max_level(log_level);

    match &cli.command {
        Commands::Filter {
            assembly,
            min_length,
            stats,
        } => {
            // Threshold validation runs before any file access
            let min_length =
                params::parse_min_length(&serde_json::Value::String(min_length.clone()))?;

            validate_fasta_file(assembly)?;
            let source = Assembly::from_fasta(assembly_name(assembly), assembly)?;

            let filter = ContigFilter::new(Some(min_length), None);
            let counts = filter.count(&source.summaries());
            debug!("{}", filter.stats());

            let json = serde_json::to_string_pretty(&counts)
                .context("Failed to serialize counts")?;
            println!("{}", json);

            if let Some(stats_path) = stats {
                write_json_file(stats_path, &json)?;
                info!("Successfully wrote counts to {}", stats_path.display());
            }
        }

        Commands::FilterMax {
            assembly,
            min_length,
            max_length,
            output,
            report,
        } => {
            let (min_length, max_length) = params::parse_min_max_lengths(
                &serde_json::Value::String(min_length.clone()),
                &serde_json::Value::String(max_length.clone()),
            )?;

            validate_fasta_file(assembly)?;
            let source = Assembly::from_fasta(assembly_name(assembly), assembly)?;

            let filter = ContigFilter::new(Some(min_length), Some(max_length));
            debug!("Filter settings:\n{}", filter);

            let output_name = format!("{}.filtered", source.name());
            let (filtered, counts) = filter.partition(&source, &output_name);

            // Determine output file
            let outfile = match output {
                Some(output) => output.clone(),
                None => {
                    let mut output = assembly.clone();
                    output.set_extension("filtered.fasta");
                    output
                }
            };

            filtered
                .to_fasta(&outfile)
                .context("Failed to write filtered assembly")?;

            let run_report = FilterReport::new(
                "local",
                assembly.display().to_string(),
                outfile.display().to_string(),
                &output_name,
                counts,
            );
            println!("{}", run_report.render());

            if let Some(report_path) = report {
                let json = serde_json::to_string_pretty(&run_report)
                    .context("Failed to serialize report")?;
                write_json_file(report_path, &json)?;
                info!("Successfully wrote report to {}", report_path.display());
            }

            info!("Successfully wrote filtered assembly");
        }
    }

    Ok(())
}
