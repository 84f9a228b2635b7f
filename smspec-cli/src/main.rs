//! Summary Reader CLI Application
//!
//! Command-line front end for the smspec-reader library:
//! - Open a specification file and its data files
//! - List keywords, wells, groups, regions, aquifers or dates
//! - Select vectors by keyword and entity name and export them
//!   as aligned text, CSV or JSON

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use smspec_reader::Dataset;
use std::fs;
use std::path::PathBuf;

mod config;
mod report;

use config::{AppConfig, OutputFormat};

/// Summary Reader - Read simulation summary files
#[derive(Parser, Debug)]
#[command(name = "smspec-cli")]
#[command(about = "Read reservoir simulation summary files (SMSPEC + UNSMRY/Snnnn)", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the .SMSPEC specification file
    #[arg(value_name = "SMSPEC")]
    spec: Option<PathBuf>,

    /// Keyword(s) to select (can be repeated)
    #[arg(short, long = "keyword", value_name = "KEYWORD")]
    keywords: Vec<String>,

    /// Well/group name(s) to select (can be repeated)
    #[arg(short, long = "name", value_name = "NAME")]
    names: Vec<String>,

    /// List distinct values instead of selecting
    #[arg(short, long, value_enum)]
    list: Option<ListKind>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListKind {
    Keywords,
    Wells,
    Groups,
    Regions,
    Aquifers,
    Dates,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Summary Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using reader library v{}", smspec_reader::VERSION);

    let config = merge_config(&args)?;
    let Some(spec) = config.input.spec.clone() else {
        bail!("No specification file given (pass SMSPEC or set [input] spec in the config file)");
    };

    let dataset = Dataset::open_with_config(&spec, &config.reader)
        .with_context(|| format!("Failed to read summary data from {:?}", spec))?;

    let format = config.output.format;
    let rendered = if let Some(kind) = args.list {
        list(&dataset, kind, format)?
    } else if !config.selection.keywords.is_empty() || !config.selection.names.is_empty() {
        let table = dataset.select(
            config.selection.keywords.as_slice(),
            config.selection.names.as_slice(),
        )?;
        if table.num_columns() == 0 {
            log::warn!("No vectors match the selection");
        }
        report::render_table(&table, format)?
    } else {
        report::render_summary(&dataset.summary(), format)?
    };

    match &config.output.file {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            log::info!("Output written to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Load the config file (if any) and apply command-line overrides
fn merge_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(spec) = &args.spec {
        config.input.spec = Some(spec.clone());
    }
    if !args.keywords.is_empty() {
        config.selection.keywords = args.keywords.clone();
    }
    if !args.names.is_empty() {
        config.selection.names = args.names.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(output) = &args.output {
        config.output.file = Some(output.clone());
    }

    Ok(config)
}

fn list(dataset: &Dataset, kind: ListKind, format: OutputFormat) -> Result<String> {
    let (title, items): (&str, Vec<String>) = match kind {
        ListKind::Keywords => ("Keywords", dataset.all_keywords().into_iter().collect()),
        ListKind::Wells => ("Wells", dataset.all_wells().into_iter().collect()),
        ListKind::Groups => ("Groups", dataset.all_groups().into_iter().collect()),
        ListKind::Regions => ("Regions", dataset.all_regions().into_iter().collect()),
        ListKind::Aquifers => ("Aquifers", dataset.all_aquifers().into_iter().collect()),
        ListKind::Dates => (
            "Dates",
            dataset
                .all_dates()?
                .iter()
                .map(|d| d.to_string())
                .collect(),
        ),
    };
    report::render_list(title, &items, format)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "smspec-cli",
            "CASE.SMSPEC",
            "-k",
            "WOPR",
            "-k",
            "WWCT",
            "-n",
            "PROD1",
            "--format",
            "json",
        ]);
        let config = merge_config(&args).unwrap();
        assert_eq!(config.input.spec, Some(PathBuf::from("CASE.SMSPEC")));
        assert_eq!(config.selection.keywords, vec!["WOPR", "WWCT"]);
        assert_eq!(config.selection.names, vec!["PROD1"]);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_list_kind_parsing() {
        let args = Args::parse_from(["smspec-cli", "CASE.SMSPEC", "--list", "wells"]);
        assert_eq!(args.list, Some(ListKind::Wells));
    }
}
