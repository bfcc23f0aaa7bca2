//! Import command implementation.

use super::{print_json, rebuild_with_spinner};
use crate::cli::args::{ImportEpisodeArgs, ImportMovieArgs, ImportType};
use crate::core::Library;
use crate::models::media::{Media, Movie, Quality, Show, ShowEpisode, Video, VideoMetadata};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// Execute import subcommand.
pub async fn execute_import(media_type: ImportType, library: &Library, json: bool) -> Result<()> {
    rebuild_with_spinner(library).await?;

    let video = match media_type {
        ImportType::Movie(args) => Video::Movie(movie_from_args(args, library).await?),
        ImportType::Episode(args) => Video::Episode(episode_from_args(args)?),
    };

    let source = video.path().map(Path::to_path_buf);
    let video = library.add(video).await.with_context(|| match &source {
        Some(path) => format!("Failed to import {}", path.display()),
        None => "Failed to import video".to_string(),
    })?;

    if let Err(e) = library.providers().notify(&video).await {
        tracing::warn!("Notification failed: {}", e);
    }

    if json {
        return print_json(&video);
    }

    println!("{} {}", "[IMPORTED]".bold().green(), video.id());
    if let Some(path) = video.path() {
        println!("  {} {}", "Path:".bold(), path.display());
    }
    Ok(())
}

fn metadata(quality: Option<String>, release_group: Option<String>, path: &Path) -> Result<VideoMetadata> {
    let quality = quality.map(|q| q.parse::<Quality>()).transpose()?;
    Ok(VideoMetadata {
        quality,
        release_group: release_group.unwrap_or_default(),
        container: crate::utils::fs::get_extension(path).unwrap_or_default(),
        ..Default::default()
    })
}

async fn movie_from_args(args: ImportMovieArgs, library: &Library) -> Result<Movie> {
    let mut movie = Movie {
        imdb_id: args.imdb_id,
        title: args.title,
        year: args.year,
        fanart: args.fanart.unwrap_or_default(),
        thumb: args.thumb.unwrap_or_default(),
        metadata: metadata(args.quality, args.release_group, &args.path)?,
        path: Some(args.path),
        ..Default::default()
    };

    // Fill what the command line left out; explicit values win.
    let mut details = movie.clone();
    match library.providers().movie_details(&mut details).await {
        Ok(()) => {
            if movie.fanart.is_empty() {
                movie.fanart = details.fanart;
            }
            if movie.thumb.is_empty() {
                movie.thumb = details.thumb;
            }
            if movie.year == 0 {
                movie.year = details.year;
            }
            movie.tmdb_id = details.tmdb_id;
            movie.original_title = details.original_title;
            movie.sort_title = details.sort_title;
            movie.plot = details.plot;
            movie.tagline = details.tagline;
            movie.rating = details.rating;
            movie.votes = details.votes;
            movie.runtime = details.runtime;
            movie.genres = details.genres;
        }
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => tracing::debug!("No details for movie {}: {}", movie.imdb_id, e),
    }

    Ok(movie)
}

fn episode_from_args(args: ImportEpisodeArgs) -> Result<ShowEpisode> {
    let has_show_artwork =
        args.show_fanart.is_some() || args.show_poster.is_some() || args.show_banner.is_some();
    let show = has_show_artwork.then(|| {
        Box::new(Show {
            imdb_id: args.show_id.clone(),
            title: args.show_title.clone(),
            fanart: args.show_fanart.unwrap_or_default(),
            poster: args.show_poster.unwrap_or_default(),
            banner: args.show_banner.unwrap_or_default(),
            ..Default::default()
        })
    });

    Ok(ShowEpisode {
        show_imdb_id: args.show_id,
        show_title: args.show_title,
        season: args.season,
        episode: args.episode,
        title: args.title.unwrap_or_default(),
        metadata: metadata(args.quality, args.release_group, &args.path)?,
        path: Some(args.path),
        show,
        ..Default::default()
    })
}
