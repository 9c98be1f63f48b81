//! Merging, deduplication and sorting of JSON class arrays
//!
//! Deduplication is exact-match while sorting and duplicate reports fold
//! case, so `ItemA` and `itema` both survive a merge and end up adjacent.

mod types;

pub use types::*;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, error, warn};
use serde_json::Value;

use crate::types::{NormalizeOutcome, NormalizeStats};
use crate::utils::{list_subdirectories, write_atomic};

/// Parse a JSON array, converting every element to a string
pub fn parse_json_array(text: &str) -> Result<Vec<String>> {
    let parsed: Value = serde_json::from_str(text).context("Invalid JSON")?;
    match parsed {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect()),
        other => Err(anyhow!("Expected JSON array but got {}", json_type_name(&other))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read a JSON array from disk
pub fn load_json_array(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_json_array(&text).with_context(|| format!("Invalid data in {}", path.display()))
}

fn is_data_file_name(name: &str) -> bool {
    name.contains(".json")
}

fn has_json_extension(name: &str) -> bool {
    name.to_lowercase().ends_with(".json")
}

fn files_in(dir: &Path, accept: fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let accepted = path
            .file_name()
            .map(|name| accept(&name.to_string_lossy()))
            .unwrap_or(false);
        if accepted && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Data files in `dir`: any file whose name contains `.json`, sorted by name
pub fn json_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    files_in(dir, is_data_file_name)
}

/// `*.json` files (any case) in `dir` and in its immediate subdirectories
pub fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = files_in(dir, has_json_extension)?;
    for subdir in list_subdirectories(dir)? {
        files.extend(files_in(&subdir, has_json_extension)?);
    }
    Ok(files)
}

/// Merge every JSON array in `dir`; unreadable or malformed files are
/// reported and skipped
pub fn load_and_combine(dir: &Path) -> Result<CombinedData> {
    let mut combined = CombinedData::default();

    for path in json_files_in(dir)? {
        match load_json_array(&path) {
            Ok(values) => {
                debug!("Loaded {} values from {}", values.len(), path.display());
                combined.values.extend(values);
                combined.files += 1;
            }
            Err(e) => {
                error!("Error loading {}: {:#}", path.display(), e);
                combined.failures.push(LoadFailure {
                    path,
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    Ok(combined)
}

/// Merge the data of every unit folder under `root`
pub fn load_all_units_data(root: &Path) -> Result<CombinedData> {
    let mut combined = CombinedData::default();
    for unit_dir in list_subdirectories(root)? {
        combined.extend(load_and_combine(&unit_dir)?);
    }
    Ok(combined)
}

/// Drop exact duplicates, keeping the first occurrence
pub fn remove_duplicates(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Number of exact occurrences of each value
pub fn count_occurrences(values: &[String]) -> HashMap<&str, usize> {
    values.iter().fold(HashMap::new(), |mut counts, value| {
        *counts.entry(value.as_str()).or_insert(0) += 1;
        counts
    })
}

/// Values occurring more than once, sorted case-insensitively
pub fn find_duplicates(values: &[String]) -> Vec<String> {
    let duplicates = count_occurrences(values)
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(value, _)| value.to_string())
        .collect();
    sort_case_insensitive(duplicates)
}

/// Every repeat of an earlier value, in input order.
///
/// A value seen three times is listed twice.
pub fn repeated_occurrences(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|value| !seen.insert(value.as_str()))
        .cloned()
        .collect()
}

/// Stable sort ignoring case
pub fn sort_case_insensitive(mut values: Vec<String>) -> Vec<String> {
    values.sort_by_cached_key(|value| value.to_lowercase());
    values
}

/// Deduplicate and sort in one pass, as written to data files
pub fn dedupe_and_sort(values: Vec<String>) -> Vec<String> {
    sort_case_insensitive(remove_duplicates(values))
}

/// Pretty JSON with two-space indentation and a trailing newline
pub fn render_pretty(values: &[String]) -> Result<String> {
    let mut text = serde_json::to_string_pretty(values)?;
    text.push('\n');
    Ok(text)
}

/// Rewrite a JSON data file deduplicated and sorted, only when that changes it
pub fn normalize_json_file(path: &Path) -> NormalizeOutcome {
    if !path.exists() {
        return NormalizeOutcome::Skipped;
    }

    let original = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return NormalizeOutcome::Failed { reason: e.to_string() },
    };

    let values = match parse_json_array(&original) {
        Ok(values) => values,
        Err(e) => return NormalizeOutcome::Failed { reason: format!("{:#}", e) },
    };

    let duplicates = find_duplicates(&values);
    if !duplicates.is_empty() {
        warn!("[duplicates] {}: {} duplicate values found", path.display(), duplicates.len());
        for duplicate in &duplicates {
            warn!("  - {}", duplicate);
        }
    }

    let next = match render_pretty(&dedupe_and_sort(values)) {
        Ok(text) => text,
        Err(e) => return NormalizeOutcome::Failed { reason: e.to_string() },
    };

    if next == original {
        return NormalizeOutcome::Unchanged;
    }

    match write_atomic(path, &next) {
        Ok(()) => NormalizeOutcome::Changed,
        Err(e) => NormalizeOutcome::Failed { reason: format!("{:#}", e) },
    }
}

/// Normalize every JSON data file in `dir` and one level below
pub fn normalize_data_folder(dir: &Path) -> Result<NormalizeStats> {
    let mut stats = NormalizeStats::default();
    for path in collect_json_files(dir)? {
        let outcome = normalize_json_file(&path);
        if let NormalizeOutcome::Failed { reason } = &outcome {
            error!("[failed] {}: {}", path.display(), reason);
        }
        stats.record(&outcome);
    }
    Ok(stats)
}
