use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use log::debug;

use crate::types::ScanConfig;
use crate::utils::find_files_by_extension;

/// Collect the config files to extract from `input`.
///
/// A file path is taken as-is regardless of its extension; a directory is
/// walked for files with one of the configured extensions.
pub fn collect_config_files(input: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    if !input.is_dir() {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    }

    if let Err(e) = std::fs::read_dir(input) {
        return Err(anyhow!("Input directory is not readable: {} - {}", input.display(), e));
    }

    let files = find_files_by_extension(input, &config.file_extensions, config.recursive);
    for file in &files {
        debug!("Found config file: {}", file.display());
    }

    Ok(files)
}
