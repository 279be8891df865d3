// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `benchpull validate` command - Validate configuration file.

use std::path::Path;

use benchpull_core::{Architecture, ConfigLoader, PipelineResult, ProfileTable};

pub fn execute(file: &Path) -> PipelineResult<()> {
    tracing::info!(file = %file.display(), "Validating configuration");

    let config = ConfigLoader::load_file(file)?;
    let table = ProfileTable::from_config(&config)?;

    println!("✓ Configuration is valid");
    println!();
    println!("Benchmark:");
    println!("  Version:            {}", config.benchmark.version);
    println!("Source:");
    println!("  Primary:            {}", config.source.primary);
    match &config.source.mirror {
        Some(mirror) => println!("  Mirror:             {}", mirror),
        None => println!("  Mirror:             (none)"),
    }
    println!("  In use:             {}", config.source.base_url());
    println!("Network:");
    println!(
        "  Connect Timeout:    {}s",
        config.network.connect_timeout.as_secs()
    );
    println!(
        "  Request Timeout:    {}s",
        config.network.request_timeout.as_secs()
    );
    println!("Workspace:            {}", config.workspace_dir.display());
    println!("Report:");
    println!("  Fetch Page:         {}", config.report.fetch_page);
    println!("  Page URL:           {}", config.report.page_url);
    println!();
    println!("Archives:");
    for architecture in Architecture::ALL {
        let profile = table.profile(architecture)?;
        let marker = if config.benchmark.checksums.contains_key(&architecture) {
            " (override)"
        } else {
            ""
        };
        println!(
            "  - {:<8} {}  sha256 {}{}",
            architecture, profile.archive_filename, profile.expected_sha256, marker
        );
    }
    Ok(())
}
