pub mod aggregate;
pub mod loadouts;
pub mod output;
pub mod scanner;
pub mod types;
pub mod utils;

pub use types::{
    ExtractionStats,
    FileExtraction,
    FileOutcome,
    NormalizeOutcome,
    NormalizeStats,
    ScanConfig,
};

pub use scanner::{
    BatchReport,
    ConfigScanner,
    merge_results,
    run_batch,
};

pub use output::{ArsenalWriter, PresetReport};

pub use parser_cfg::{
    ExclusionSet,
    Extractor,
    ExtractorConfig,
    extract,
};
