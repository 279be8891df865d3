// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Pipeline driver.
//!
//! Runs resolve → prepare → fetch → verify → extract → run → report strictly
//! in order. Each stage finishes before the next starts and any error is
//! returned to the caller untouched; nothing below `main` exits the process.

use std::path::PathBuf;

use chrono::Utc;

use crate::arch::{host_machine, ArchitectureProfile, ProfileTable};
use crate::config::BenchmarkConfig;
use crate::error::PipelineResult;
use crate::extract::Extractor;
use crate::fetch::{FetchedArtifact, Fetcher};
use crate::report::{fetch_result_page, read_result_text, RunSummary};
use crate::runner::{format_elapsed, BenchmarkRunner, RunRecord};
use crate::verify::{IntegrityVerifier, VerificationResult};
use crate::workspace::Workspace;

/// Operator-facing progress notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A fact worth showing (architecture, verified checksum, timings).
    Info(String),
    /// A stage is starting.
    Progress(String),
}

/// Everything one successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub profile: ArchitectureProfile,
    pub workspace: Workspace,
    pub artifact: FetchedArtifact,
    pub verification: VerificationResult,
    pub extracted: Vec<PathBuf>,
    pub run: RunRecord,
    pub summary_path: PathBuf,
    pub report_page: Option<FetchedArtifact>,
    pub result_text: Option<String>,
}

/// The acquisition-and-verification pipeline bound to one configuration.
pub struct Pipeline {
    config: BenchmarkConfig,
    table: ProfileTable,
}

impl Pipeline {
    pub fn new(config: BenchmarkConfig) -> PipelineResult<Self> {
        let table = ProfileTable::from_config(&config)?;
        Ok(Self { config, table })
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn table(&self) -> &ProfileTable {
        &self.table
    }

    /// Run against the detected host architecture.
    pub async fn run<F>(&self, observer: F) -> PipelineResult<PipelineOutcome>
    where
        F: FnMut(PipelineEvent),
    {
        let machine = host_machine()?;
        self.run_on(&machine, observer).await
    }

    /// Run as if the host reported `machine`.
    ///
    /// Verification, extraction and the benchmark itself run inline on the
    /// calling task; only the downloads await.
    pub async fn run_on<F>(&self, machine: &str, mut observer: F) -> PipelineResult<PipelineOutcome>
    where
        F: FnMut(PipelineEvent),
    {
        // 1. Resolve before touching disk or network.
        let profile = self.table.resolve(machine)?;
        observer(PipelineEvent::Info(format!(
            "Architecture: {}",
            profile.architecture
        )));
        tracing::info!(
            machine = %machine,
            architecture = %profile.architecture,
            archive = %profile.archive_filename,
            "Resolved architecture profile"
        );

        // 2. Fresh workspace.
        let workspace = Workspace::prepare(&self.config.workspace_dir)?;

        // 3. Download.
        let fetcher = Fetcher::new(&self.config.network)?;
        observer(PipelineEvent::Progress("Downloading Geekbench...".to_string()));
        let artifact = fetcher
            .fetch(
                self.config.source.base_url(),
                &profile.archive_filename,
                &workspace.archive_path(&profile.archive_filename),
            )
            .await?;

        // 4. Verify. A mismatch ends the run here.
        observer(PipelineEvent::Progress(
            "Verifying SHA-256 checksum...".to_string(),
        ));
        let verification = IntegrityVerifier::verify(&artifact.path, &profile.expected_sha256)?;
        observer(PipelineEvent::Info("SHA-256 checksum is valid.".to_string()));

        // 5. Extract.
        observer(PipelineEvent::Progress("Extracting tarball...".to_string()));
        let extracted =
            Extractor::extract(&artifact.path, workspace.root(), &workspace.staging_path())?;

        // 6. Run.
        let executable = workspace
            .root()
            .join(profile.executable_relpath(self.table.version()));
        observer(PipelineEvent::Progress("Running Geekbench test...".to_string()));
        let started_at = Utc::now();
        let run = BenchmarkRunner::run(&executable, &workspace.result_path())?;
        observer(PipelineEvent::Info(format!(
            "Test completed in {}.",
            format_elapsed(run.elapsed)
        )));
        if !run.success {
            observer(PipelineEvent::Info(format!(
                "Benchmark exited abnormally (exit code: {}); output kept.",
                run.exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".to_string())
            )));
        }

        // 7. Report.
        let summary = RunSummary::new(
            started_at,
            &profile,
            self.table.version().as_str(),
            &verification.digest,
            &run,
        );
        let summary_path = summary.write(&workspace)?;

        let report_page = if self.config.report.fetch_page {
            let page = fetch_result_page(&fetcher, &self.config.report.page_url, &workspace).await;
            match &page {
                Some(page) => observer(PipelineEvent::Info(format!(
                    "Test result saved to {}",
                    page.path.display()
                ))),
                None => observer(PipelineEvent::Info(format!(
                    "Result page {} could not be downloaded",
                    self.config.report.page_url
                ))),
            }
            page
        } else {
            None
        };

        let result_text = read_result_text(&workspace)?;

        Ok(PipelineOutcome {
            profile,
            workspace,
            artifact,
            verification,
            extracted,
            run,
            summary_path,
            report_page,
            result_text,
        })
    }
}
