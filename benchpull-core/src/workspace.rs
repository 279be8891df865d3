// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Workspace manager.
//!
//! One scratch directory per run. Preparing it destroys whatever a previous
//! run left behind, so a stale archive can never pass for a freshly verified
//! one. The directory is left in place after the run for inspection.

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};

/// Captured benchmark stdout.
pub const RESULT_FILE: &str = "result.txt";
/// Downloaded result-presentation page.
pub const REPORT_FILE: &str = "result.html";
/// Machine-readable run summary.
pub const SUMMARY_FILE: &str = "summary.json";
/// Private staging area used while unpacking.
pub const STAGING_DIR: &str = ".extract-staging";

/// A prepared, initially empty scratch directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Recursively delete anything at `path`, then create an empty directory.
    ///
    /// Not safe to run concurrently against the same path.
    pub fn prepare(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let root = path.as_ref().to_path_buf();

        match std::fs::symlink_metadata(&root) {
            Ok(meta) if meta.is_dir() => {
                tracing::debug!(path = %root.display(), "Removing stale workspace");
                std::fs::remove_dir_all(&root)
                    .map_err(|e| PipelineError::io("removing stale workspace", &root, e))?;
            }
            Ok(_) => {
                // A file or symlink squatting on the workspace path.
                std::fs::remove_file(&root)
                    .map_err(|e| PipelineError::io("removing file at workspace path", &root, e))?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(PipelineError::io("inspecting workspace path", &root, e)),
        }

        std::fs::create_dir_all(&root)
            .map_err(|e| PipelineError::io("creating workspace", &root, e))?;

        tracing::info!(path = %root.display(), "Workspace prepared");

        Ok(Self { root })
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where a downloaded archive lands.
    pub fn archive_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    pub fn result_path(&self) -> PathBuf {
        self.root.join(RESULT_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORT_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join(SUMMARY_FILE)
    }

    pub fn staging_path(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }
}
