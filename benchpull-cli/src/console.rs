// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Colored operator output.
//!
//! Cyan for information, yellow for a stage in progress, red for the fatal
//! line that ends a failed run.

use crossterm::style::Stylize;

use benchpull_core::PipelineEvent;

pub fn info(text: &str) {
    println!("{}", text.cyan());
}

pub fn progress(text: &str) {
    println!("{}", text.yellow());
}

pub fn fatal(text: &str) {
    eprintln!("{}", text.red());
}

/// Render a pipeline event.
pub fn render_event(event: PipelineEvent) {
    match event {
        PipelineEvent::Info(text) => info(&text),
        PipelineEvent::Progress(text) => progress(&text),
    }
}

pub fn banner() {
    println!("# ## ## ## ## ## ## ## ## ## ## ## ## ## ## ## #");
    println!("#            Geekbench Test Script            #");
    println!("#{:^45}#", concat!("benchpull v", env!("CARGO_PKG_VERSION")));
    println!("# ## ## ## ## ## ## ## ## ## ## ## ## ## ## ## #");
    println!();
}
