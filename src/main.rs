use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{error, info};

use arsenal_scanner::aggregate;
use arsenal_scanner::loadouts;
use arsenal_scanner::output::{self, ArsenalWriter, PresetReport};
use arsenal_scanner::utils::write_atomic;
use arsenal_scanner::{ExclusionSet, ExtractorConfig, ScanConfig, run_batch};

/// Arma 3 arsenal tooling: class extraction and preset generation
#[derive(Parser)]
#[command(name = "arsenal", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract arsenal item classes from a config file or directory
    Extract(ExtractArgs),
    /// Generate arsenal box scripts from unit data folders
    Arsenal(ArsenalArgs),
    /// Deduplicate and sort every JSON data file in place
    Sort {
        /// Folder holding the unit data folders
        #[arg(long, default_value = "data_arsenal")]
        data: PathBuf,
    },
    /// Generate default loadouts from per-unit loadout files
    Loadouts {
        /// Folder holding one folder of loadout files per unit
        #[arg(long, default_value = "data_loadouts")]
        data: PathBuf,

        /// Output SQF file
        #[arg(short, long, default_value = "output/loadouts.sqf")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct ExtractArgs {
    /// Config file or directory to scan
    path: PathBuf,

    /// Write the JSON array to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only report classes declared after this section header
    #[arg(long, default_value = parser_cfg::DEFAULT_SECTION)]
    section: String,

    /// Report classes from the whole document
    #[arg(long, conflicts_with = "section")]
    whole_file: bool,

    /// Additional class names to exclude
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// Start from an empty exclusion set
    #[arg(long)]
    no_default_exclusions: bool,

    /// Property that marks a class as reportable
    #[arg(long, default_value = parser_cfg::DEFAULT_PROPERTY)]
    property: String,

    /// Required value of the property
    #[arg(long, default_value_t = parser_cfg::DEFAULT_PROPERTY_VALUE)]
    value: i64,

    /// Keep each class once and sort case-insensitively
    #[arg(long)]
    unique: bool,

    /// Only scan the top level of a directory
    #[arg(long)]
    no_recursive: bool,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<usize>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct UnitSelection {
    /// Unit folder under the data folder
    #[arg(short, long)]
    unit: Option<String>,

    /// Process every unit folder, then the combined preset
    #[arg(short, long)]
    all: bool,
}

#[derive(Args)]
struct ArsenalArgs {
    #[command(flatten)]
    selection: UnitSelection,

    /// Skip the duplicate report
    #[arg(long)]
    no_check: bool,

    /// Folder holding the unit data folders
    #[arg(long, default_value = "data_arsenal")]
    data: PathBuf,

    /// Folder receiving the generated scripts
    #[arg(long, default_value = "output")]
    out: PathBuf,
}

impl ExtractArgs {
    fn scan_config(&self) -> ScanConfig {
        let mut exclusions = if self.no_default_exclusions {
            ExclusionSet::new()
        } else {
            ExclusionSet::default()
        };
        exclusions.extend(self.exclude.iter().cloned());

        let defaults = ScanConfig::default();
        ScanConfig {
            max_threads: self.threads.unwrap_or(defaults.max_threads),
            recursive: !self.no_recursive,
            extractor: ExtractorConfig {
                section: (!self.whole_file).then(|| self.section.clone()),
                property: self.property.clone(),
                value: self.value,
                exclusions,
            },
            ..defaults
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => run_extract(&args),
        Commands::Arsenal(args) => run_arsenal(&args),
        Commands::Sort { data } => run_sort(&data),
        Commands::Loadouts { data, out } => run_loadouts(&data, &out),
    }
}

fn run_extract(args: &ExtractArgs) -> Result<()> {
    let report = run_batch(&args.path, args.scan_config(), args.unique)?;
    let rendered = aggregate::render_pretty(&report.classes)?;

    match &args.output {
        Some(path) => {
            write_atomic(path, &rendered)?;
            info!("Wrote {} classes to {}", report.classes.len(), path.display());
        }
        None => print!("{}", rendered),
    }

    eprintln!("{}", report.stats);
    Ok(())
}

fn print_preset(report: &PresetReport, check: bool) {
    if check {
        if report.duplicates.is_empty() {
            println!("No duplicates found.");
        } else {
            println!("\nDuplicate items found:");
            for item in &report.duplicates {
                println!("{}", item);
            }
        }
    }
    println!("Data written to file: {}", report.artifacts.init_path.display());
    println!("Data written to file: {}", report.artifacts.exec_path.display());
}

fn run_arsenal(args: &ArsenalArgs) -> Result<()> {
    let check = !args.no_check;
    let writer = ArsenalWriter::new(&args.out, output::today())?;

    if args.selection.all {
        for report in writer.generate_all(&args.data, check)? {
            // The combined preset never carries a duplicate report.
            print_preset(&report, check && report.unit != output::ALL_UNITS);
        }
    } else if let Some(unit) = &args.selection.unit {
        let report = writer.generate_unit(&args.data, unit, check)?;
        print_preset(&report, check);
    }

    Ok(())
}

fn run_sort(data: &Path) -> Result<()> {
    let started = Instant::now();
    let stats = aggregate::normalize_data_folder(data).inspect_err(|e| {
        error!("Failed to scan {}: {:#}", data.display(), e);
    })?;

    println!(
        "Processed {} files ({} updated, {} skipped, {} failed) in {}ms",
        stats.processed,
        stats.changed,
        stats.skipped,
        stats.failed,
        started.elapsed().as_millis()
    );
    Ok(())
}

fn run_loadouts(data: &Path, out: &Path) -> Result<()> {
    let report = loadouts::generate_loadouts(data, out, &output::today())?;
    println!("Wrote {} loadouts to {}", report.written, report.output.display());
    Ok(())
}
