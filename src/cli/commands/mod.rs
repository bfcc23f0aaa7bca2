//! CLI command implementations.

pub mod import;
pub mod index;
pub mod movies;
pub mod shows;

use crate::core::{Library, RebuildStats};
use crate::models::config::Config;
use crate::services::images::HttpImageFetcher;
use crate::services::providers::ModuleRegistry;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;

/// Build a library from the configuration. The index starts empty.
pub fn open_library(config: &Config) -> Result<Library> {
    let providers = ModuleRegistry::with_builtin()
        .resolve(&config.modules)
        .context("Failed to resolve configured modules")?;
    let images = HttpImageFetcher::from_config(&config.images)
        .context("Failed to create HTTP client")?;

    Ok(Library::new(config.library.clone(), providers, Arc::new(images)))
}

/// Rebuild the index behind a spinner.
pub async fn rebuild_with_spinner(library: &Library) -> Result<RebuildStats> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Indexing library...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = library.rebuild_index().await;
    pb.finish_and_clear();

    result.context("Failed to build the library index")
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
