use std::fmt;
use std::path::PathBuf;

use parser_cfg::ExtractorConfig;

/// Default file extensions scanned for class definitions
pub const DEFAULT_EXTENSIONS: &[&str] = &["cpp", "hpp"];

/// Configuration for a batch extraction run
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum number of threads to use for extraction
    pub max_threads: usize,
    /// Whether to walk into subdirectories
    pub recursive: bool,
    /// File extensions to include (lowercase, without dot)
    pub file_extensions: Vec<String>,
    /// Extraction parameters applied to every file
    pub extractor: ExtractorConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_threads: num_cpus::get(),
            recursive: true,
            file_extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            extractor: ExtractorConfig::default(),
        }
    }
}

/// Result of extracting a single config file
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Class names found, in first-seen order
    Extracted(Vec<String>),
    /// The file could not be read
    Failed { reason: String },
}

impl FileExtraction {
    pub fn classes(&self) -> &[String] {
        match &self.outcome {
            FileOutcome::Extracted(classes) => classes,
            FileOutcome::Failed { .. } => &[],
        }
    }
}

/// Summary of a batch extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Number of files found
    pub total: usize,
    /// Number of files read and scanned
    pub processed: usize,
    /// Number of classes found across all files
    pub classes: usize,
    /// Number of files that could not be read
    pub failed: usize,
}

impl ExtractionStats {
    pub fn from_results(results: &[FileExtraction]) -> Self {
        results.iter().fold(
            Self {
                total: results.len(),
                ..Default::default()
            },
            |mut stats, result| {
                match &result.outcome {
                    FileOutcome::Extracted(classes) => {
                        stats.processed += 1;
                        stats.classes += classes.len();
                    }
                    FileOutcome::Failed { .. } => stats.failed += 1,
                }
                stats
            },
        )
    }
}

impl fmt::Display for ExtractionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} of {} files, found {} classes, {} failed",
            self.processed, self.total, self.classes, self.failed
        )
    }
}

/// Outcome of rewriting a JSON data file in sorted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// File content changed and was rewritten
    Changed,
    /// File was already sorted and deduplicated
    Unchanged,
    /// File disappeared before it could be read
    Skipped,
    /// File could not be parsed or written
    Failed { reason: String },
}

impl fmt::Display for NormalizeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeOutcome::Changed => write!(f, "Changed"),
            NormalizeOutcome::Unchanged => write!(f, "Unchanged"),
            NormalizeOutcome::Skipped => write!(f, "Skipped"),
            NormalizeOutcome::Failed { reason } => write!(f, "Failed: {}", reason),
        }
    }
}

/// Counters for a normalization run over a data folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub processed: usize,
    pub changed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl NormalizeStats {
    pub fn record(&mut self, outcome: &NormalizeOutcome) {
        match outcome {
            NormalizeOutcome::Changed => {
                self.processed += 1;
                self.changed += 1;
            }
            NormalizeOutcome::Unchanged => self.processed += 1,
            NormalizeOutcome::Skipped => self.skipped += 1,
            NormalizeOutcome::Failed { .. } => self.failed += 1,
        }
    }
}
