pub mod lines;
pub mod progress_logger;
