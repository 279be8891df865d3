// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `benchpull resolve` command - show what a run would download.
//!
//! Touches neither the filesystem nor the network.

use std::path::Path;

use benchpull_core::arch::host_machine;
use benchpull_core::{ConfigLoader, PipelineResult, ProfileTable};

pub fn execute(config_path: Option<&Path>, arch: Option<&str>) -> PipelineResult<()> {
    let config = ConfigLoader::load_or_default(config_path)?;
    let table = ProfileTable::from_config(&config)?;

    let machine = match arch {
        Some(arch) => arch.to_string(),
        None => host_machine()?,
    };
    let profile = table.resolve(&machine)?;

    println!("Machine:      {}", machine);
    println!("Architecture: {}", profile.architecture);
    println!("Version:      {}", table.version());
    println!("Archive:      {}", profile.archive_filename);
    println!("SHA-256:      {}", profile.expected_sha256);
    println!(
        "Download URL: {}",
        config.source.base_url().join(&profile.archive_filename)
    );
    println!(
        "Executable:   {}",
        config
            .workspace_dir
            .join(profile.executable_relpath(table.version()))
            .display()
    );
    Ok(())
}
