use std::path::PathBuf;

/// A data file that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Values merged from every JSON array in a folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedData {
    /// Values in file order, then array order
    pub values: Vec<String>,
    /// Number of files merged into `values`
    pub files: usize,
    pub failures: Vec<LoadFailure>,
}

impl CombinedData {
    pub fn extend(&mut self, other: CombinedData) {
        self.values.extend(other.values);
        self.files += other.files;
        self.failures.extend(other.failures);
    }
}
