// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Result reporting.
//!
//! Persists a JSON run summary, optionally downloads the result-presentation
//! page, and reads back the captured benchmark output.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::arch::{Architecture, ArchitectureProfile};
use crate::error::{PipelineError, PipelineResult};
use crate::fetch::{FetchedArtifact, Fetcher};
use crate::runner::RunRecord;
use crate::types::{HttpUrl, Sha256Digest};
use crate::workspace::Workspace;

/// Machine-readable record of one pipeline run, written to `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub architecture: Architecture,
    pub benchmark_version: String,
    pub archive: String,
    pub sha256: Sha256Digest,
    pub exit_code: Option<i32>,
    pub success: bool,
    pub elapsed_secs: f64,
    pub result_file: PathBuf,
}

impl RunSummary {
    pub fn new(
        started_at: DateTime<Utc>,
        profile: &ArchitectureProfile,
        benchmark_version: &str,
        digest: &Sha256Digest,
        record: &RunRecord,
    ) -> Self {
        Self {
            started_at,
            architecture: profile.architecture,
            benchmark_version: benchmark_version.to_string(),
            archive: profile.archive_filename.clone(),
            sha256: digest.clone(),
            exit_code: record.exit_code,
            success: record.success,
            elapsed_secs: record.elapsed.as_secs_f64(),
            result_file: record.result_path.clone(),
        }
    }

    /// Write the summary as pretty JSON to the workspace.
    pub fn write(&self, workspace: &Workspace) -> PipelineResult<PathBuf> {
        let path = workspace.summary_path();
        let file =
            File::create(&path).map_err(|e| PipelineError::io("creating run summary", &path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            PipelineError::Serialization {
                context: "writing run summary",
                source: e,
            }
        })?;
        Ok(path)
    }

    /// Load a previously written summary.
    pub fn load(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PipelineError::io("opening run summary", path, e))?;
        serde_json::from_reader(file).map_err(|e| PipelineError::Serialization {
            context: "parsing run summary",
            source: e,
        })
    }
}

/// Download the result-presentation page to `result.html`.
///
/// Unlike the archive this page is not integrity-checked: there is no
/// published digest for it, and nothing from it is executed. It runs after
/// the benchmark, so a failed download is logged and yields `None` instead
/// of discarding a finished run.
pub async fn fetch_result_page(
    fetcher: &Fetcher,
    url: &HttpUrl,
    workspace: &Workspace,
) -> Option<FetchedArtifact> {
    tracing::warn!(url = %url, "Result page is fetched without integrity verification");
    match fetcher.fetch_url(url.as_str(), &workspace.report_path()).await {
        Ok(artifact) => Some(artifact),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Result page unavailable, continuing");
            None
        }
    }
}

/// Read the captured benchmark output, `None` if no result file exists.
pub fn read_result_text(workspace: &Workspace) -> PipelineResult<Option<String>> {
    let path = workspace.result_path();
    match std::fs::read(&path) {
        // Benchmark output is not guaranteed to be UTF-8.
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PipelineError::io("reading result file", &path, e)),
    }
}
