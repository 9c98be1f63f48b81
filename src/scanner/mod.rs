
mod collector;
mod scanner;

use std::path::Path;

use anyhow::Result;
use log::info;

use crate::aggregate;
use crate::types::{ExtractionStats, FileExtraction, ScanConfig};

pub use collector::collect_config_files;
pub use scanner::{extract_files, scan_with_config};

/// Batch extractor over a config file or a directory of config files
pub struct ConfigScanner<'a> {
    /// File or directory to scan
    input: &'a Path,
    /// Configuration options
    config: ScanConfig,
}

impl<'a> ConfigScanner<'a> {
    /// Create a new scanner with default configuration
    pub fn new(input: &'a Path) -> Self {
        Self {
            input,
            config: ScanConfig::default(),
        }
    }

    /// Create a new scanner with custom configuration
    pub fn with_config(input: &'a Path, config: ScanConfig) -> Self {
        Self { input, config }
    }

    /// Scan the input and return per-file results
    pub fn scan(&self) -> Result<Vec<FileExtraction>> {
        scanner::scan_with_config(self.input, &self.config)
    }
}

/// Output of a batch run: merged classes and counters
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub classes: Vec<String>,
    pub stats: ExtractionStats,
    pub files: Vec<FileExtraction>,
}

/// Merge per-file results in file order.
///
/// With `unique` set, exact duplicates are dropped and the list is sorted
/// case-insensitively; otherwise every occurrence is kept.
pub fn merge_results(results: &[FileExtraction], unique: bool) -> Vec<String> {
    let merged: Vec<String> = results
        .iter()
        .flat_map(|result| result.classes().iter().cloned())
        .collect();

    if unique {
        aggregate::sort_case_insensitive(aggregate::remove_duplicates(merged))
    } else {
        merged
    }
}

/// Scan `input`, merge the results, and log the summary
pub fn run_batch(input: &Path, config: ScanConfig, unique: bool) -> Result<BatchReport> {
    let files = ConfigScanner::with_config(input, config).scan()?;
    let stats = ExtractionStats::from_results(&files);
    let classes = merge_results(&files, unique);

    info!("{}", stats);
    Ok(BatchReport { classes, stats, files })
}
