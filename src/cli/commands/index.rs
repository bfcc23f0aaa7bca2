//! Index command implementation.

use super::{print_json, rebuild_with_spinner};
use crate::cli::args::IndexAction;
use crate::core::{Library, RebuildStats};
use anyhow::Result;
use colored::Colorize;

/// Execute index subcommand.
pub async fn execute_index(action: IndexAction, library: &Library, json: bool) -> Result<()> {
    match action {
        IndexAction::Rebuild => rebuild(library, json).await,
        IndexAction::Verify => verify(library, json).await,
    }
}

async fn rebuild(library: &Library, json: bool) -> Result<()> {
    let stats = rebuild_with_spinner(library).await?;
    if json {
        return print_json(&stats);
    }

    println!("{}", "[INDEX] Complete!".bold().green());
    print_stats(library, &stats);
    Ok(())
}

async fn verify(library: &Library, json: bool) -> Result<()> {
    let stats = rebuild_with_spinner(library).await?;
    let report = library.verify_index();

    if json {
        return print_json(&report);
    }

    print_stats(library, &stats);
    if report.is_empty() {
        println!("{}", "[VERIFY] Every file is in its canonical place".bold().green());
        return Ok(());
    }

    println!(
        "{}",
        format!("[VERIFY] {} problems", report.len()).bold().yellow()
    );
    for id in &report.missing_movies {
        println!("  {} movie {} is missing", "-".red(), id);
    }
    for (show_id, season, episode) in &report.missing_episodes {
        println!("  {} episode {} S{:02}E{:02} is missing", "-".red(), show_id, season, episode);
    }
    for id in &report.misplaced_movies {
        println!("  {} movie {} is outside its movie directory", "!".yellow(), id);
    }
    for (show_id, season, episode) in &report.misplaced_episodes {
        println!(
            "  {} episode {} S{:02}E{:02} is outside its season directory",
            "!".yellow(),
            show_id,
            season,
            episode
        );
    }
    Ok(())
}

fn print_stats(library: &Library, stats: &RebuildStats) {
    let config = library.config();
    println!(
        "  Movies: {} indexed, {} skipped ({})",
        stats.movies.indexed,
        stats.movies.skipped,
        config.movie_dir.display()
    );
    println!(
        "  Episodes: {} indexed, {} skipped ({})",
        stats.shows.indexed,
        stats.shows.skipped,
        config.show_dir.display()
    );
}
