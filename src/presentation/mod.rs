pub mod display;
pub mod report;

pub use display::{format_duration, SearchSummary};
pub use report::{format_entry, ReportWriter};
