//! Library directory scanner.
//!
//! Walks the movie and show roots and repopulates the indexes from the
//! sidecars found next to each video file. A video whose sidecar cannot be
//! read is logged and skipped; only an unreadable root aborts a scan.

use crate::core::movie_index::MovieIndex;
use crate::core::show_index::ShowIndex;
use crate::core::sidecar;
use crate::generators::filename;
use crate::models::config::LibraryConfig;
use crate::models::media::Show;
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use walkdir::WalkDir;

/// Result of scanning one storage root.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Videos added to the index.
    pub indexed: usize,
    /// Videos or show directories skipped because of unreadable sidecars.
    pub skipped: usize,
}

fn check_root(root: &Path) -> Result<()> {
    let metadata = std::fs::metadata(root)?;
    if !metadata.is_dir() {
        return Err(Error::other(format!("not a directory: {}", root.display())));
    }
    Ok(())
}

/// Index every movie under the movie root.
pub fn scan_movies(config: &LibraryConfig, index: &MovieIndex) -> Result<ScanStats> {
    let start = Instant::now();
    let root = config.movie_dir.as_path();
    check_root(root)?;

    let mut stats = ScanStats::default();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("Failed to walk {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !config.is_video_file(entry.path()) {
            continue;
        }

        match sidecar::read_movie(entry.path()).and_then(|movie| index.add(&movie)) {
            Ok(()) => stats.indexed += 1,
            Err(e) => {
                tracing::error!("Failed to read movie NFO for {}: {}", entry.path().display(), e);
                stats.skipped += 1;
            }
        }
    }

    tracing::info!(
        "Movie index built in {:?}: {} indexed, {} skipped",
        start.elapsed(),
        stats.indexed,
        stats.skipped
    );
    Ok(stats)
}

/// Index every show directly under the show root.
///
/// Only the first level of directories is treated as shows; each show's
/// subtree is then walked separately for episodes.
pub fn scan_shows(config: &LibraryConfig, index: &ShowIndex) -> Result<ScanStats> {
    let start = Instant::now();
    let root = config.show_dir.as_path();
    check_root(root)?;

    let mut stats = ScanStats::default();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("Failed to walk {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let show_dir = entry.path();
        let show = match sidecar::read_show(&filename::show_nfo_path(show_dir)) {
            Ok(show) => show,
            Err(e) => {
                tracing::error!("Failed to read tv show NFO in {}: {}", show_dir.display(), e);
                stats.skipped += 1;
                continue;
            }
        };

        scan_episodes(config, &show, show_dir, index, &mut stats);
    }

    tracing::info!(
        "Show index built in {:?}: {} episodes indexed, {} skipped",
        start.elapsed(),
        stats.indexed,
        stats.skipped
    );
    Ok(stats)
}

fn scan_episodes(
    config: &LibraryConfig,
    show: &Show,
    show_dir: &Path,
    index: &ShowIndex,
    stats: &mut ScanStats,
) {
    for entry in WalkDir::new(show_dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("Failed to walk {}: {}", show_dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !config.is_video_file(entry.path()) {
            continue;
        }

        let result = sidecar::read_episode(entry.path()).and_then(|mut episode| {
            episode.show_imdb_id = show.imdb_id.clone();
            if episode.show_title.is_empty() {
                episode.show_title = show.title.clone();
            }
            index.add(show_dir, &episode)
        });

        match result {
            Ok(()) => stats.indexed += 1,
            Err(e) => {
                tracing::error!(
                    "Failed to read episode NFO for {}: {}",
                    entry.path().display(),
                    e
                );
                stats.skipped += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::{Movie, ShowEpisode};
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> LibraryConfig {
        let config = LibraryConfig::new(dir.path().join("movies"), dir.path().join("shows"));
        fs::create_dir_all(&config.movie_dir).unwrap();
        fs::create_dir_all(&config.show_dir).unwrap();
        config
    }

    #[test]
    fn test_scan_movies_skips_unreadable() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let good = config.movie_dir.join("Foo (2020)/foo.mkv");
        fs::create_dir_all(good.parent().unwrap()).unwrap();
        fs::write(&good, b"video").unwrap();
        let movie = Movie {
            imdb_id: "tt001".to_string(),
            title: "Foo".to_string(),
            year: 2020,
            path: Some(good.clone()),
            ..Default::default()
        };
        sidecar::write_movie(&movie).unwrap();

        // no sidecar
        let orphan = config.movie_dir.join("Bar/bar.mp4");
        fs::create_dir_all(orphan.parent().unwrap()).unwrap();
        fs::write(&orphan, b"video").unwrap();

        // not a video
        fs::write(config.movie_dir.join("Foo (2020)/notes.txt"), b"x").unwrap();

        let index = MovieIndex::new();
        let stats = scan_movies(&config, &index).unwrap();

        assert_eq!(stats, ScanStats { indexed: 1, skipped: 1 });
        assert_eq!(index.movie_path("tt001").unwrap(), good);
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().unwrap();
        let config = LibraryConfig::new(dir.path().join("nope"), dir.path().join("nope"));

        assert!(matches!(scan_movies(&config, &MovieIndex::new()), Err(Error::Io(_))));
        assert!(matches!(scan_shows(&config, &ShowIndex::new()), Err(Error::Io(_))));
    }

    #[test]
    fn test_scan_shows_uses_show_id() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let show_dir = config.show_dir.join("The Wire");
        fs::create_dir_all(show_dir.join("Season 1")).unwrap();
        let show = Show {
            imdb_id: "tt0306414".to_string(),
            title: "The Wire".to_string(),
            ..Default::default()
        };
        sidecar::write_show(&show_dir, &show).unwrap();

        let video = show_dir.join("Season 1/s01e01.mkv");
        fs::write(&video, b"video").unwrap();
        let episode = ShowEpisode {
            show_imdb_id: "wrong".to_string(),
            season: 1,
            episode: 1,
            path: Some(video.clone()),
            ..Default::default()
        };
        sidecar::write_episode(&episode).unwrap();

        // show directory without tvshow.nfo
        fs::create_dir_all(config.show_dir.join("Unknown/Season 1")).unwrap();

        let index = ShowIndex::new();
        let stats = scan_shows(&config, &index).unwrap();

        assert_eq!(stats, ScanStats { indexed: 1, skipped: 1 });
        assert!(index.has_episode("tt0306414", 1, 1));
        assert_eq!(index.episode_path("tt0306414", 1, 1).unwrap(), video);
        assert_eq!(index.indexed_show("tt0306414").unwrap().title, "The Wire");
        assert!(!index.has_show("wrong"));
    }
}
