// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for benchpull.
//!
//! Every pipeline stage has its own explicit error enum, folded into
//! [`PipelineError`] through `#[from]`. All of them are fatal: the pipeline
//! never catches and retries, it returns to the single top-level handler.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the acquisition-and-verification pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Architecture Errors - Raised Before Any Resource Is Acquired
    // =========================================================================
    #[error("Unsupported architecture: {machine} (supported: x86_64, aarch64, riscv64)")]
    UnsupportedArchitecture { machine: String },

    // =========================================================================
    // Stage Errors
    // =========================================================================
    #[error("Network error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} ({path}) - {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {context} - {source}")]
    Serialization {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("System call failed: {syscall} - {message}")]
    Syscall {
        syscall: &'static str,
        message: String,
    },
}

impl PipelineError {
    /// Wrap an I/O error with the step and path that produced it.
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

/// Hard validation errors reject a configuration before the pipeline starts.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Missing required field: {field} in {context}")]
    MissingRequiredField {
        field: &'static str,
        context: String,
    },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid SHA-256 digest for {field}: {value}")]
    InvalidDigest { field: &'static str, value: String },

    #[error("Invalid URL for {field}: {value} - {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Network errors while fetching a remote resource. No retry, no fallback.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {reason}")]
    Client { reason: String },

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Reading response body from {url} failed: {reason}")]
    Body { url: String, reason: String },

    #[error("Writing download to {path} failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Integrity errors. A mismatch blocks extraction and execution.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("SHA-256 checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Failed to read {path} for hashing: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Archive extraction errors. No partial tree survives a failure.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed or unsupported archive {path}: {reason}")]
    Unpack { path: PathBuf, reason: String },

    #[error("Failed to move extracted entry {path} into place: {source}")]
    Promote {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Benchmark execution errors. An abnormal exit status is not one of these.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Benchmark executable not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to spawn {path}: {reason}")]
    SpawnFailed { path: PathBuf, reason: String },

    #[error("Failed waiting for benchmark process {pid}: {reason}")]
    Wait { pid: u32, reason: String },

    #[error("Failed to create result file {path}: {source}")]
    ResultFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;
