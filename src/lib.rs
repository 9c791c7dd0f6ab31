// Library exports for reuse by other applications
pub mod annotation;
pub mod archive;
pub mod cli;
pub mod config_file;
pub mod processing;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use annotation::{Annotation, Annotator};
pub use archive::ArchivePackager;
pub use cli::OutputFormat;
pub use processing::{ItemReport, ItemStatus, ProcessingConfig, ProcessingEngine};
pub use report::JsonMessage;
