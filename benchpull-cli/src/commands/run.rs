// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `benchpull run` command - the full acquisition-and-verification pipeline.

use std::path::Path;

use benchpull_core::{ConfigLoader, Pipeline, PipelineOutcome, PipelineResult};

use crate::console;

pub async fn execute(config_path: Option<&Path>) -> PipelineResult<()> {
    console::banner();

    // Load and validate configuration - fail fast on invalid config
    let config = ConfigLoader::load_or_default(config_path)?;
    tracing::info!(
        workspace = %config.workspace_dir.display(),
        source = %config.source.base_url(),
        version = %config.benchmark.version,
        "Configuration loaded"
    );

    let pipeline = Pipeline::new(config)?;
    let outcome = pipeline.run(console::render_event).await?;

    output_summary(&outcome);
    Ok(())
}

fn output_summary(outcome: &PipelineOutcome) {
    match &outcome.result_text {
        Some(text) => {
            console::progress("Geekbench Test Result:");
            println!("{}", text);
        }
        None => console::fatal("Result file not found!"),
    }

    println!();
    println!("Workspace:  {}", outcome.workspace.root().display());
    println!("Archive:    {} ({} bytes)", outcome.artifact.path.display(), outcome.artifact.bytes);
    println!("SHA-256:    {}", outcome.verification.digest);
    println!("Summary:    {}", outcome.summary_path.display());
    if let Some(page) = &outcome.report_page {
        println!("Report:     {} (unverified)", page.path.display());
    }
}
