pub mod error_logging;
pub mod logging;

pub use error_logging::{ErrorLogger, ErrorType};
pub use logging::{Logger, LoggerTrait};
