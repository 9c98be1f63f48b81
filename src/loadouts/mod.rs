//! Default ACE arsenal loadouts from per-unit JSON files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{error, info};
use serde_json::Value;

use crate::utils::{list_subdirectories, write_atomic};

/// A loadout file found under a unit folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadoutFile {
    pub unit: String,
    pub loadout: String,
    pub path: PathBuf,
}

impl LoadoutFile {
    /// Display name shown in the arsenal, e.g. `[1st Platoon] Rifleman AT`
    pub fn display_name(&self) -> String {
        format!("[{}] {}", self.unit.replace('_', " "), self.loadout.replace('_', " "))
    }
}

#[derive(Debug, Clone)]
pub struct LoadoutReport {
    pub output: PathBuf,
    pub written: usize,
    pub failed: Vec<PathBuf>,
}

/// `<unit>/<loadout>.json` files under `base_dir`, sorted by unit then loadout
pub fn find_loadout_files(base_dir: &Path) -> Result<Vec<LoadoutFile>> {
    let mut found = Vec::new();
    for unit_dir in list_subdirectories(base_dir)? {
        let unit = match unit_dir.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&unit_dir)
            .with_context(|| format!("Failed to read directory {}", unit_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let Some(stem) = path.file_stem() else {
                continue;
            };
            let loadout = stem.to_string_lossy().into_owned();
            found.push(LoadoutFile {
                unit: unit.clone(),
                loadout,
                path,
            });
        }
    }
    Ok(found)
}

/// One `addDefaultLoadout` call with the loadout array inlined as compact JSON
pub fn render_loadout_line(file: &LoadoutFile) -> Result<String> {
    let text = std::fs::read_to_string(&file.path)
        .with_context(|| format!("Failed to read {}", file.path.display()))?;
    let loadout: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", file.path.display()))?;
    if !loadout.is_array() {
        return Err(anyhow!("Invalid loadout array in {}", file.path.display()));
    }

    Ok(format!(
        "[{}, {}, true] call ace_arsenal_fnc_addDefaultLoadout;",
        serde_json::to_string(&file.display_name())?,
        serde_json::to_string(&loadout)?
    ))
}

/// Write every loadout under `base_dir` into a single SQF file
pub fn generate_loadouts(base_dir: &Path, output: &Path, date: &str) -> Result<LoadoutReport> {
    let mut lines = vec![format!("\"Last Updated: {date}\";")];
    let mut failed = Vec::new();

    for file in find_loadout_files(base_dir)? {
        match render_loadout_line(&file) {
            Ok(line) => lines.push(line),
            Err(e) => {
                error!("{:#}", e);
                failed.push(file.path);
            }
        }
    }

    let mut content = lines.join("\n");
    content.push('\n');
    write_atomic(output, &content)?;

    let written = lines.len() - 1;
    info!("Wrote {} loadouts to {}", written, output.display());
    Ok(LoadoutReport {
        output: output.to_path_buf(),
        written,
        failed,
    })
}
