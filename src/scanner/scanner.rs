use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use parser_cfg::Extractor;
use rayon::prelude::*;

use super::collector;
use crate::types::{FileExtraction, FileOutcome, ScanConfig};

/// Extract classes from every config file under `input`
pub fn scan_with_config(input: &Path, config: &ScanConfig) -> Result<Vec<FileExtraction>> {
    info!("Scanning for config files in {}", input.display());
    debug!("Configuration: {:?}", config);

    let files = collector::collect_config_files(input, config)?;
    if files.is_empty() {
        warn!("No config files found in {}", input.display());
        return Ok(Vec::new());
    }
    info!("Found {} config files", files.len());

    let extractor = Extractor::new(config.extractor.clone())
        .context("Invalid extractor configuration")?;
    extract_files(&files, &extractor, config.max_threads)
}

/// Run the extractor over `files` in parallel, one file per task.
///
/// Results keep the order of `files`. Read failures are recorded per file.
pub fn extract_files(
    files: &[PathBuf],
    extractor: &Extractor,
    threads: usize,
) -> Result<Vec<FileExtraction>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .context("Failed to build thread pool")?;

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
        .progress_chars("#>-"));
    progress.set_message("Extracting classes");

    let results: Vec<FileExtraction> = pool.install(|| {
        files
            .par_iter()
            .progress_with(progress.clone())
            .map(|path| extract_single_file(extractor, path))
            .collect()
    });

    progress.finish_with_message(format!("Extracted {} files", files.len()));
    Ok(results)
}

fn extract_single_file(extractor: &Extractor, path: &Path) -> FileExtraction {
    let outcome = match extractor.extract_file(path) {
        Ok(classes) => {
            debug!("Found {} classes in {}", classes.len(), path.display());
            FileOutcome::Extracted(classes)
        }
        Err(e) => {
            warn!("Failed to extract {}: {}", path.display(), e);
            FileOutcome::Failed { reason: e.to_string() }
        }
    };

    FileExtraction {
        path: path.to_path_buf(),
        outcome,
    }
}
