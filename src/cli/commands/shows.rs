//! Shows command implementation.

use super::{print_json, rebuild_with_spinner};
use crate::cli::args::ShowsAction;
use crate::core::Library;
use anyhow::{Context, Result};
use colored::Colorize;

/// Execute shows subcommand.
pub async fn execute_shows(action: ShowsAction, library: &Library, json: bool) -> Result<()> {
    rebuild_with_spinner(library).await?;

    match action {
        ShowsAction::List => list(library, json),
        ShowsAction::Show { id } => show(library, &id, json),
        ShowsAction::Season { id, season } => show_season(library, &id, season, json),
        ShowsAction::Episode { id, season, episode } => {
            show_episode(library, &id, season, episode, json)
        }
        ShowsAction::Delete { id, season, episode } => delete(library, &id, season, episode),
    }
}

fn list(library: &Library, json: bool) -> Result<()> {
    let shows = library.shows();
    if json {
        return print_json(&shows);
    }

    println!("{}", format!("TV Shows ({})", shows.len()).bold().cyan());
    println!("{}", "=".repeat(50));
    for show in &shows {
        println!(
            "  {:<12} {} - {} seasons, {} episodes",
            show.id.dimmed(),
            show.title,
            show.seasons.len(),
            show.episode_count()
        );
    }
    Ok(())
}

fn show(library: &Library, id: &str, json: bool) -> Result<()> {
    let show = library
        .get_show(id)
        .with_context(|| format!("Failed to load show {}", id))?;
    let indexed = library.get_indexed_show(id)?;
    if json {
        return print_json(&show);
    }

    println!("{}", show.title.bold().cyan());
    println!("  {} {}", "IMDB:".bold(), show.imdb_id);
    println!("  {} {}", "Path:".bold(), indexed.path.display());
    if show.year > 0 {
        println!("  {} {}", "Year:".bold(), show.year);
    }
    for season in indexed.seasons.values() {
        println!(
            "  {} {}: {} episodes",
            "Season".bold(),
            season.season,
            season.episodes.len()
        );
    }
    Ok(())
}

fn show_season(library: &Library, id: &str, season: u32, json: bool) -> Result<()> {
    let indexed = library
        .get_indexed_season(id, season)
        .with_context(|| format!("Failed to load season {} of show {}", season, id))?;
    if json {
        return print_json(&indexed);
    }

    println!("{}", format!("{} - Season {}", id, season).bold().cyan());
    for episode in indexed.episodes.values() {
        let quality = episode.quality.map(|q| q.to_string()).unwrap_or_default();
        println!(
            "  E{:02} {} {}",
            episode.episode,
            episode.title,
            quality.green()
        );
    }
    Ok(())
}

fn show_episode(library: &Library, id: &str, season: u32, episode: u32, json: bool) -> Result<()> {
    let ep = library
        .get_episode(id, season, episode)
        .with_context(|| format!("Failed to load episode {} S{:02}E{:02}", id, season, episode))?;
    if json {
        return print_json(&ep);
    }

    println!(
        "{}",
        format!("{} S{:02}E{:02} {}", ep.show_title, ep.season, ep.episode, ep.title)
            .bold()
            .cyan()
    );
    if let Some(path) = &ep.path {
        println!("  {} {}", "Path:".bold(), path.display());
    }
    if !ep.aired.is_empty() {
        println!("  {} {}", "Aired:".bold(), ep.aired);
    }
    if let Some(quality) = ep.metadata.quality {
        println!("  {} {}", "Quality:".bold(), quality);
    }
    Ok(())
}

fn delete(library: &Library, id: &str, season: u32, episode: u32) -> Result<()> {
    library
        .delete_show_episode(id, season, episode)
        .with_context(|| format!("Failed to delete episode {} S{:02}E{:02}", id, season, episode))?;
    println!(
        "{} {} S{:02}E{:02}",
        "[DELETED]".bold().red(),
        id,
        season,
        episode
    );

    if library.get_indexed_show(id).is_err() {
        println!("  Show {} has no episodes left and was removed", id);
    }
    Ok(())
}
