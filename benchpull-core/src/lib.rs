//! benchpull Core Library
//!
//! Acquisition-and-verification pipeline for the Geekbench CPU benchmark:
//! architecture resolution, workspace preparation, streamed download,
//! SHA-256 verification, archive extraction, benchmark execution and
//! result reporting.

pub mod arch;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod types;
pub mod verify;
pub mod workspace;

// Re-export commonly used types
pub use arch::{Architecture, ArchitectureProfile, ProfileTable};
pub use config::{BenchmarkConfig, ConfigLoader, SourceChoice};
pub use error::{
    ExecutionError, ExtractionError, FetchError, HardValidationError, IntegrityError,
    PipelineError, PipelineResult,
};
pub use pipeline::{Pipeline, PipelineEvent, PipelineOutcome};
pub use types::{BenchmarkVersion, HttpUrl, Sha256Digest};
pub use workspace::Workspace;
