//! In-memory show index: show → season → episode.
//!
//! A season entry exists only while it holds at least one episode, and a show
//! entry only while it holds at least one season. Removing the last episode
//! of a season prunes the season (and the show, if that was its last season)
//! under the same write lock.

use crate::generators::folder;
use crate::models::index::{IndexedEpisode, IndexedSeason, IndexedShow};
use crate::models::media::ShowEpisode;
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Nested ID listing: show ID → season → episode numbers.
pub type ShowIds = BTreeMap<String, BTreeMap<u32, Vec<u32>>>;

/// Concurrency-safe show index.
#[derive(Debug, Default)]
pub struct ShowIndex {
    shows: RwLock<HashMap<String, IndexedShow>>,
}

fn season_key(show_id: &str, season: u32) -> String {
    format!("{} season {}", show_id, season)
}

fn episode_key(show_id: &str, season: u32, episode: u32) -> String {
    format!("{} S{:02}E{:02}", show_id, season, episode)
}

impl ShowIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, IndexedShow>> {
        self.shows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, IndexedShow>> {
        self.shows.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite an episode, creating its season and show entries
    /// as needed. `show_dir` is the directory holding the show.
    pub fn add(&self, show_dir: &Path, episode: &ShowEpisode) -> Result<()> {
        let path = episode.path.clone().ok_or(Error::MissingFilePath)?;
        let entry = IndexedEpisode {
            episode: episode.episode,
            path,
            title: episode.title.clone(),
            quality: episode.metadata.quality,
        };

        let mut shows = self.write();
        let show = shows
            .entry(episode.show_imdb_id.clone())
            .or_insert_with(|| IndexedShow {
                id: episode.show_imdb_id.clone(),
                path: show_dir.to_path_buf(),
                title: String::new(),
                seasons: BTreeMap::new(),
            });
        show.path = show_dir.to_path_buf();
        if !episode.show_title.is_empty() {
            show.title = episode.show_title.clone();
        }

        let season = show
            .seasons
            .entry(episode.season)
            .or_insert_with(|| IndexedSeason {
                season: episode.season,
                path: show_dir.join(folder::generate_season_folder(episode.season)),
                episodes: BTreeMap::new(),
            });
        season.episodes.insert(episode.episode, entry);

        Ok(())
    }

    pub fn has_show(&self, show_id: &str) -> bool {
        self.read().contains_key(show_id)
    }

    pub fn has_season(&self, show_id: &str, season: u32) -> bool {
        self.read()
            .get(show_id)
            .is_some_and(|show| show.seasons.contains_key(&season))
    }

    pub fn has_episode(&self, show_id: &str, season: u32, episode: u32) -> bool {
        self.read()
            .get(show_id)
            .and_then(|show| show.seasons.get(&season))
            .is_some_and(|s| s.episodes.contains_key(&episode))
    }

    /// Remove an episode, pruning its season and show if they become empty.
    pub fn remove_episode(&self, show_id: &str, season: u32, episode: u32) -> Result<()> {
        let mut shows = self.write();
        let not_found = || Error::NotFound(episode_key(show_id, season, episode));

        let show = shows.get_mut(show_id).ok_or_else(not_found)?;
        let entry = show.seasons.get_mut(&season).ok_or_else(not_found)?;
        entry.episodes.remove(&episode).ok_or_else(not_found)?;

        if entry.episodes.is_empty() {
            show.seasons.remove(&season);
        }
        if show.seasons.is_empty() {
            shows.remove(show_id);
        }
        Ok(())
    }

    /// Whether a season has no episodes. An absent season counts as empty.
    pub fn is_season_empty(&self, show_id: &str, season: u32) -> bool {
        self.read()
            .get(show_id)
            .and_then(|show| show.seasons.get(&season))
            .map_or(true, |s| s.episodes.is_empty())
    }

    /// Whether a show has no seasons. An absent show counts as empty.
    pub fn is_show_empty(&self, show_id: &str) -> bool {
        self.read()
            .get(show_id)
            .map_or(true, |show| show.seasons.is_empty())
    }

    /// Remove an empty season entry. Removing an absent season is a no-op.
    pub fn remove_season(&self, show_id: &str, season: u32) -> Result<()> {
        let mut shows = self.write();
        let Some(show) = shows.get_mut(show_id) else {
            return Ok(());
        };
        match show.seasons.get(&season) {
            Some(s) if !s.episodes.is_empty() => Err(Error::SeasonNotEmpty {
                show_id: show_id.to_string(),
                season,
            }),
            Some(_) => {
                show.seasons.remove(&season);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Remove an empty show entry. Removing an absent show is a no-op.
    pub fn remove_show(&self, show_id: &str) -> Result<()> {
        let mut shows = self.write();
        match shows.get(show_id) {
            Some(show) if !show.seasons.is_empty() => {
                Err(Error::ShowNotEmpty(show_id.to_string()))
            }
            Some(_) => {
                shows.remove(show_id);
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn episode_path(&self, show_id: &str, season: u32, episode: u32) -> Result<PathBuf> {
        self.read()
            .get(show_id)
            .and_then(|show| show.seasons.get(&season))
            .and_then(|s| s.episodes.get(&episode))
            .map(|e| e.path.clone())
            .ok_or_else(|| Error::NotFound(episode_key(show_id, season, episode)))
    }

    /// Directory of an indexed season.
    pub fn season_path(&self, show_id: &str, season: u32) -> Result<PathBuf> {
        self.read()
            .get(show_id)
            .and_then(|show| show.seasons.get(&season))
            .map(|s| s.path.clone())
            .ok_or_else(|| Error::NotFound(season_key(show_id, season)))
    }

    /// Directory of an indexed show.
    pub fn show_path(&self, show_id: &str) -> Result<PathBuf> {
        self.read()
            .get(show_id)
            .map(|show| show.path.clone())
            .ok_or_else(|| Error::NotFound(show_id.to_string()))
    }

    /// Nested listing of every indexed episode.
    pub fn ids(&self) -> ShowIds {
        self.read()
            .iter()
            .map(|(id, show)| {
                let seasons = show
                    .seasons
                    .iter()
                    .map(|(n, s)| (*n, s.episodes.keys().copied().collect()))
                    .collect();
                (id.clone(), seasons)
            })
            .collect()
    }

    pub fn indexed_show(&self, show_id: &str) -> Result<IndexedShow> {
        self.read()
            .get(show_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(show_id.to_string()))
    }

    pub fn indexed_season(&self, show_id: &str, season: u32) -> Result<IndexedSeason> {
        self.read()
            .get(show_id)
            .and_then(|show| show.seasons.get(&season))
            .cloned()
            .ok_or_else(|| Error::NotFound(season_key(show_id, season)))
    }

    /// Every indexed show, sorted by ID.
    pub fn shows(&self) -> Vec<IndexedShow> {
        let mut shows: Vec<IndexedShow> = self.read().values().cloned().collect();
        shows.sort_by(|a, b| a.id.cmp(&b.id));
        shows
    }

    /// Number of indexed shows.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}
