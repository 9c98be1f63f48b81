use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            extensions.iter().any(|allowed| *allowed == ext)
        })
        .unwrap_or(false)
}

/// Find all files with one of the given extensions, sorted by path
pub fn find_files_by_extension(dir: &Path, extensions: &[String], recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Immediate subdirectories of `dir`, sorted by name
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Create a directory if it doesn't exist
pub fn create_dir_if_not_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }

    Ok(())
}

/// Write `content` to `path` through a temporary file in the same directory.
///
/// The target is either left untouched or replaced with the full content.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_dir_if_not_exists(dir)?;

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
    temp.flush()?;
    temp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_files_by_extension() -> Result<()> {
        let dir = tempdir()?;
        std::fs::create_dir_all(dir.path().join("addons/gear"))?;
        std::fs::write(dir.path().join("config.cpp"), "")?;
        std::fs::write(dir.path().join("addons/gear/CfgWeapons.HPP"), "")?;
        std::fs::write(dir.path().join("addons/gear/readme.txt"), "")?;

        let all = find_files_by_extension(dir.path(), &exts(&["cpp", "hpp"]), true);
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|p| p.ends_with("CfgWeapons.HPP")));

        let top = find_files_by_extension(dir.path(), &exts(&["cpp", "hpp"]), false);
        assert_eq!(top, vec![dir.path().join("config.cpp")]);
        Ok(())
    }

    #[test]
    fn test_list_subdirectories() -> Result<()> {
        let dir = tempdir()?;
        std::fs::create_dir_all(dir.path().join("b_unit"))?;
        std::fs::create_dir_all(dir.path().join("a_unit"))?;
        std::fs::write(dir.path().join("file.json"), "[]")?;

        let dirs = list_subdirectories(dir.path())?;
        assert_eq!(dirs, vec![dir.path().join("a_unit"), dir.path().join("b_unit")]);
        Ok(())
    }

    #[test]
    fn test_write_atomic_replaces_content() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("output").join("arsenal_all.sqf");

        write_atomic(&target, "first")?;
        write_atomic(&target, "second")?;

        assert_eq!(std::fs::read_to_string(&target)?, "second");
        let leftovers = std::fs::read_dir(target.parent().unwrap())?.count();
        assert_eq!(leftovers, 1);
        Ok(())
    }

    #[test]
    fn test_write_atomic_into_file_parent_fails() -> Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory")?;

        assert!(write_atomic(&blocker.join("out.sqf"), "data").is_err());
        assert_eq!(std::fs::read_to_string(&blocker)?, "not a directory");
        Ok(())
    }
}
