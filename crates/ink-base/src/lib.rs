pub mod logging;
pub mod viewport;

pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger};
pub use viewport::{ViewportError, ViewportSpec};

// Re-export log crate so downstream crates can use ink_base::log::*
pub use log;
