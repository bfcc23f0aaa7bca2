//! In-memory movie index.
//!
//! Maps a movie ID to the canonical location of its video file plus a few
//! summary fields, so existence checks and listings never touch the disk.

use crate::models::index::IndexedMovie;
use crate::models::media::Movie;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Concurrency-safe movie index.
#[derive(Debug, Default)]
pub struct MovieIndex {
    movies: RwLock<HashMap<String, IndexedMovie>>,
}

impl MovieIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, IndexedMovie>> {
        self.movies.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, IndexedMovie>> {
        self.movies.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite the entry for a movie.
    pub fn add(&self, movie: &Movie) -> Result<()> {
        let path = movie.path.clone().ok_or(Error::MissingFilePath)?;
        let entry = IndexedMovie {
            id: movie.imdb_id.clone(),
            path,
            title: movie.title.clone(),
            year: movie.year,
            quality: movie.metadata.quality,
        };

        self.write().insert(entry.id.clone(), entry);
        Ok(())
    }

    /// Remove a movie entry.
    pub fn remove(&self, id: &str) -> Result<()> {
        self.write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    pub fn has(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Path of the indexed video file.
    pub fn movie_path(&self, id: &str) -> Result<PathBuf> {
        self.read()
            .get(id)
            .map(|m| m.path.clone())
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Result<IndexedMovie> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// All movie IDs, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of every entry, sorted by ID.
    pub fn entries(&self) -> Vec<IndexedMovie> {
        let mut entries: Vec<IndexedMovie> = self.read().values().cloned().collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

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
