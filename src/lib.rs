// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{
    is_fuzzy_present, similarity_ratio, ConfigurationError, FileRegions, FuzzyMatcher,
    MatchOccurrence, ReportEntry, SearchPart, SearchRequest, SuffixFilter,
};
pub use application::{run_scan, Config, ScanOutcome};
pub use infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};
pub use presentation::{format_entry, ReportWriter, SearchSummary};
