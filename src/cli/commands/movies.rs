//! Movies command implementation.

use super::{print_json, rebuild_with_spinner};
use crate::cli::args::MoviesAction;
use crate::core::Library;
use anyhow::{Context, Result};
use colored::Colorize;

/// Execute movies subcommand.
pub async fn execute_movies(action: MoviesAction, library: &Library, json: bool) -> Result<()> {
    rebuild_with_spinner(library).await?;

    match action {
        MoviesAction::List => list(library, json),
        MoviesAction::Show { id } => show(library, &id, json),
        MoviesAction::Delete { id } => delete(library, &id),
    }
}

fn list(library: &Library, json: bool) -> Result<()> {
    let movies = library.movies();
    if json {
        return print_json(&movies);
    }

    println!("{}", format!("Movies ({})", movies.len()).bold().cyan());
    println!("{}", "=".repeat(50));
    for movie in &movies {
        let quality = movie.quality.map(|q| q.to_string()).unwrap_or_default();
        println!(
            "  {:<12} {} ({}) {}",
            movie.id.dimmed(),
            movie.title,
            movie.year,
            quality.green()
        );
    }
    Ok(())
}

fn show(library: &Library, id: &str, json: bool) -> Result<()> {
    let movie = library
        .get_movie(id)
        .with_context(|| format!("Failed to load movie {}", id))?;
    if json {
        return print_json(&movie);
    }

    println!("{}", format!("{} ({})", movie.title, movie.year).bold().cyan());
    println!("  {} {}", "IMDB:".bold(), movie.imdb_id);
    if let Some(path) = &movie.path {
        println!("  {} {}", "Path:".bold(), path.display());
    }
    if let Some(quality) = movie.metadata.quality {
        println!("  {} {}", "Quality:".bold(), quality);
    }
    if let Some(date_added) = movie.metadata.date_added {
        println!("  {} {}", "Added:".bold(), date_added.format("%Y-%m-%d %H:%M"));
    }
    if !movie.genres.is_empty() {
        println!("  {} {}", "Genres:".bold(), movie.genres.join(", "));
    }
    if !movie.plot.is_empty() {
        println!();
        println!("  {}", movie.plot);
    }
    Ok(())
}

fn delete(library: &Library, id: &str) -> Result<()> {
    library
        .delete_movie(id)
        .with_context(|| format!("Failed to delete movie {}", id))?;
    println!("{} {}", "[DELETED]".bold().red(), id);
    Ok(())
}
