use crate::report::SortKey;
use crate::utils::config::DEFAULT_TOP_GROUPS;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Event log to analyze
    pub input: PathBuf,

    /// Output path for the JSON report
    pub output_json: Option<PathBuf>,

    /// Ordering of groups and goroutines
    pub sort_key: SortKey,

    /// Number of goroutine groups kept in the report and summary
    pub top_groups: usize,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trace.json"),
            output_json: Some(PathBuf::from("goroutines.json")),
            sort_key: SortKey::default(),
            top_groups: DEFAULT_TOP_GROUPS,
            print_summary: false,
        }
    }
}

/// What an inspect command looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectTarget {
    /// Goroutines started at this pc
    Group { pc: u64, sort_key: SortKey },
    /// Goroutines related to this one through unblocks
    Related { goroutine: u64 },
    /// Regions of this goroutine
    Regions { goroutine: u64 },
}

/// Arguments for the inspect commands
#[derive(Debug, Clone)]
pub struct InspectArgs {
    pub input: PathBuf,
    pub target: InspectTarget,
}
