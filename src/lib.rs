// Main library entry point for droidarch.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod ports;

pub use application::{Diagnostic, ExtractUsecase, ExtractionReport};
pub use config::ExtractorConfig;
pub use error::{ArchError, Result};
