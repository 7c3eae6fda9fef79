pub mod file_walker;
pub mod matcher;
pub mod search;

pub use file_walker::SuffixFilter;
pub use matcher::{is_fuzzy_present, similarity_ratio, FuzzyMatcher};
pub use search::{
    ConfigurationError, FileRegions, MatchOccurrence, ReportEntry, SearchPart, SearchRequest,
};
