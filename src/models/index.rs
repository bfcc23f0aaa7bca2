//! Read models returned by the in-memory library indexes.

use crate::models::media::Quality;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A movie entry in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedMovie {
    /// IMDB ID
    pub id: String,
    /// Canonical path of the video file
    pub path: PathBuf,
    pub title: String,
    /// Release year, 0 when unknown
    pub year: u32,
    pub quality: Option<Quality>,
}

/// A TV show entry in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedShow {
    /// IMDB ID
    pub id: String,
    /// Show directory
    pub path: PathBuf,
    pub title: String,
    /// Seasons by number
    pub seasons: BTreeMap<u32, IndexedSeason>,
}

impl IndexedShow {
    /// Total number of indexed episodes across all seasons.
    pub fn episode_count(&self) -> usize {
        self.seasons.values().map(|s| s.episodes.len()).sum()
    }
}

/// A season entry in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedSeason {
    pub season: u32,
    /// Season directory
    pub path: PathBuf,
    /// Episodes by number
    pub episodes: BTreeMap<u32, IndexedEpisode>,
}

/// An episode entry in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedEpisode {
    pub episode: u32,
    /// Canonical path of the video file
    pub path: PathBuf,
    pub title: String,
    pub quality: Option<Quality>,
}

/// Outcome of checking the index against the storage roots.
///
/// Missing entries disappear on the next rebuild. Misplaced ones survive it,
/// since the scan indexes a video wherever its sidecar is found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexReport {
    /// Movie IDs whose video file is gone
    pub missing_movies: Vec<String>,
    /// `(show id, season, episode)` triples whose video file is gone
    pub missing_episodes: Vec<(String, u32, u32)>,
    /// Movie IDs whose file is outside `<Title> (<Year>)`
    pub misplaced_movies: Vec<String>,
    /// Episodes whose file is outside their `Season N` directory
    pub misplaced_episodes: Vec<(String, u32, u32)>,
}

impl IndexReport {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.missing_movies.len()
            + self.missing_episodes.len()
            + self.misplaced_movies.len()
            + self.misplaced_episodes.len()
    }
}
