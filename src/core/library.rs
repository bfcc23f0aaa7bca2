//! Library orchestration.
//!
//! The [`Library`] owns the two indexes and keeps them in agreement with the
//! storage roots. Live mutations always touch the filesystem first and the
//! index second, so a failed filesystem step never leaves an index entry
//! pointing at a file that is not there.
//!
//! Rebuilds and live mutations must not run at the same time; callers
//! serialize them.

use crate::core::movie_index::MovieIndex;
use crate::core::scanner::{self, ScanStats};
use crate::core::show_index::{ShowIds, ShowIndex};
use crate::core::sidecar;
use crate::generators::{filename, folder};
use crate::models::config::LibraryConfig;
use crate::models::index::{IndexedMovie, IndexedSeason, IndexReport, IndexedShow};
use crate::models::media::{Media, Movie, Show, ShowEpisode, ShowSeason, Video};
use crate::services::images::ImageFetcher;
use crate::services::providers::Providers;
use crate::utils::fs as fs_utils;
use crate::{Error, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome of a full index rebuild.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RebuildStats {
    pub movies: ScanStats,
    pub shows: ScanStats,
}

/// Movie and show library rooted at two storage directories.
pub struct Library {
    config: LibraryConfig,
    movie_index: Arc<MovieIndex>,
    show_index: Arc<ShowIndex>,
    providers: Providers,
    images: Arc<dyn ImageFetcher>,
}

impl Library {
    /// Create a library with empty indexes. Call [`Library::rebuild_index`]
    /// to load what is already on disk.
    pub fn new(config: LibraryConfig, providers: Providers, images: Arc<dyn ImageFetcher>) -> Self {
        Self {
            config,
            movie_index: Arc::new(MovieIndex::new()),
            show_index: Arc::new(ShowIndex::new()),
            providers,
            images,
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    /// Store a video in the library and return it with its final path.
    pub async fn add(&self, video: Video) -> Result<Video> {
        match video {
            Video::Movie(mut movie) => {
                self.add_movie(&mut movie).await?;
                Ok(Video::Movie(movie))
            }
            Video::Episode(mut episode) => {
                self.add_show_episode(&mut episode).await?;
                Ok(Video::Episode(episode))
            }
        }
    }

    /// Move a movie into `<movie root>/<Title> (<Year>)/`, write its sidecar,
    /// index it and download its artwork. `movie.path` is updated to the new
    /// location.
    pub async fn add_movie(&self, movie: &mut Movie) -> Result<()> {
        let source = movie.path.clone().ok_or(Error::MissingFilePath)?;
        if movie.imdb_id.is_empty() {
            return Err(Error::MissingMovieId);
        }
        if movie.title.is_empty() {
            return Err(Error::MissingMovieTitle);
        }
        for (kind, url) in movie.image_urls() {
            if url.is_empty() {
                return Err(Error::MissingImageUrl(format!("movie {}", kind)));
            }
        }
        let dest_dir = folder::movie_dir(&self.config.movie_dir, &movie.title, movie.year)?;

        let old_dir = if self.movie_index.has(&movie.imdb_id) {
            self.supersede_movie(&movie.imdb_id, &source, &dest_dir)?
        } else {
            None
        };

        if source.parent() != Some(dest_dir.as_path()) {
            if !source.starts_with(&dest_dir) {
                fs_utils::remove_dir_all_if_exists(&dest_dir)?;
            }
            fs::create_dir_all(&dest_dir)?;
            movie.path = Some(relocate(&source, &dest_dir)?);
        } else {
            tracing::debug!("Movie already organized: {}", source.display());
        }

        if let Some(old_dir) = old_dir {
            fs_utils::remove_dir_all_if_exists(&old_dir)?;
            tracing::info!("Removed movie directory {}", old_dir.display());
        }

        movie.metadata.date_added.get_or_insert_with(Utc::now);
        sidecar::write_movie(movie)?;
        self.movie_index.add(movie)?;

        let video_path = movie.path.clone().ok_or(Error::MissingFilePath)?;
        let fanart_path = filename::movie_fanart_path(&video_path);
        let thumb_path = filename::movie_thumb_path(&video_path);
        futures::try_join!(
            self.images.download(&movie.fanart, &fanart_path),
            self.images.download(&movie.thumb, &thumb_path),
        )?;

        tracing::info!("Added movie {} to {}", movie.imdb_id, video_path.display());
        Ok(())
    }

    /// Drop the indexed copy of a movie that is about to be replaced.
    ///
    /// When the incoming file sits inside the old movie directory, that
    /// directory can only go once the file has moved out; it is returned so
    /// the caller removes it after the move.
    fn supersede_movie(&self, id: &str, source: &Path, dest_dir: &Path) -> Result<Option<PathBuf>> {
        let old_path = self.movie_index.movie_path(id)?;

        match old_path.parent() {
            Some(old_dir) if source.starts_with(old_dir) => {
                if old_path != source {
                    fs_utils::remove_file_if_exists(&old_path)?;
                    fs_utils::remove_file_if_exists(&filename::nfo_path(&old_path))?;
                    self.movie_index.remove(id)?;
                    tracing::info!("Replaced movie file {}", old_path.display());
                }

                let keep = old_dir == self.config.movie_dir || dest_dir.starts_with(old_dir);
                Ok((!keep).then(|| old_dir.to_path_buf()))
            }
            _ => {
                self.delete_movie(id)?;
                Ok(None)
            }
        }
    }

    /// Move an episode into `<show root>/<Show title>/Season <N>/`, creating
    /// the show directory with its sidecar and artwork the first time an
    /// episode of the show arrives. `episode.path` is updated to the new
    /// location.
    pub async fn add_show_episode(&self, episode: &mut ShowEpisode) -> Result<()> {
        let source = episode.path.clone().ok_or(Error::MissingFilePath)?;
        if episode.show_imdb_id.is_empty() {
            return Err(Error::MissingShowId);
        }
        if episode.show_title.is_empty() {
            return Err(Error::MissingShowTitle);
        }
        let show_dir = folder::show_dir(&self.config.show_dir, &episode.show_title)?;
        let season_dir = folder::season_dir(&self.config.show_dir, &episode.show_title, episode.season)?;

        if !filename::show_nfo_path(&show_dir).exists() {
            self.add_show(episode, &show_dir).await?;
        }

        if self
            .show_index
            .has_episode(&episode.show_imdb_id, episode.season, episode.episode)
        {
            self.supersede_episode(episode, &source)?;
        }

        if source.parent() != Some(season_dir.as_path()) {
            fs::create_dir_all(&season_dir)?;
            episode.path = Some(relocate(&source, &season_dir)?);
        } else {
            tracing::debug!("Episode already organized: {}", source.display());
        }

        episode.metadata.date_added.get_or_insert_with(Utc::now);
        sidecar::write_episode(episode)?;
        self.show_index.add(&show_dir, episode)?;

        tracing::info!(
            "Added episode {} S{:02}E{:02} to {}",
            episode.show_imdb_id,
            episode.season,
            episode.episode,
            season_dir.display()
        );
        Ok(())
    }

    /// Remove the files and index entry of an episode that is about to be
    /// replaced. Its season is not cascaded since the new file fills it.
    fn supersede_episode(&self, episode: &ShowEpisode, source: &Path) -> Result<()> {
        let (show_id, season, number) = (&episode.show_imdb_id, episode.season, episode.episode);
        let old_path = self.show_index.episode_path(show_id, season, number)?;
        if old_path == source {
            return Ok(());
        }

        remove_episode_files(&old_path)?;
        self.show_index.remove_episode(show_id, season, number)?;
        tracing::info!("Replaced episode file {}", old_path.display());
        Ok(())
    }

    /// Create the show directory with `tvshow.nfo` and its artwork.
    async fn add_show(&self, episode: &mut ShowEpisode, show_dir: &Path) -> Result<()> {
        let mut show = match episode.show.take() {
            Some(show) => *show,
            None => {
                let mut show = Show::from_episode(episode);
                if let Err(e) = self.providers.show_details(&mut show).await {
                    if e.is_fatal() {
                        return Err(e.into());
                    }
                    tracing::warn!("Failed to get details for show {}: {}", show.imdb_id, e);
                }
                show
            }
        };
        if show.imdb_id.is_empty() {
            show.imdb_id = episode.show_imdb_id.clone();
        }

        let downloads: Vec<(String, PathBuf)> = show
            .image_urls()
            .into_iter()
            .map(|(kind, url)| {
                if url.is_empty() {
                    Err(Error::MissingImageUrl(format!("show {}", kind)))
                } else {
                    Ok((url.to_string(), filename::show_artwork_path(show_dir, kind)))
                }
            })
            .collect::<Result<_>>()?;

        fs::create_dir_all(show_dir)?;
        sidecar::write_show(show_dir, &show)?;
        futures::future::try_join_all(
            downloads
                .iter()
                .map(|(url, dest)| self.images.download(url, dest)),
        )
        .await?;

        tracing::info!("Added show {} in {}", show.imdb_id, show_dir.display());
        Ok(())
    }

    /// Delete a video from disk and from the index.
    pub fn delete(&self, video: &Video) -> Result<()> {
        match video {
            Video::Movie(movie) => self.delete_movie(&movie.imdb_id),
            Video::Episode(ep) => self.delete_show_episode(&ep.show_imdb_id, ep.season, ep.episode),
        }
    }

    /// Delete a movie directory and its index entry.
    pub fn delete_movie(&self, id: &str) -> Result<()> {
        let path = self.movie_index.movie_path(id)?;

        match path.parent() {
            Some(dir) if dir != self.config.movie_dir => {
                fs_utils::remove_dir_all_if_exists(dir)?;
                tracing::info!("Removed movie directory {}", dir.display());
            }
            // Never remove the storage root itself.
            _ => {
                fs_utils::remove_file_if_exists(&path)?;
                fs_utils::remove_file_if_exists(&filename::nfo_path(&path))?;
                tracing::info!("Removed movie file {}", path.display());
            }
        }

        self.movie_index.remove(id)
    }

    /// Delete an episode, then its season if now empty, then its show if now
    /// empty.
    pub fn delete_show_episode(&self, show_id: &str, season: u32, episode: u32) -> Result<()> {
        let path = self.show_index.episode_path(show_id, season, episode)?;
        let season_dir = self.show_index.season_path(show_id, season)?;
        let show_dir = self.show_index.show_path(show_id)?;

        remove_episode_files(&path)?;
        self.show_index.remove_episode(show_id, season, episode)?;
        tracing::info!("Removed episode file {}", path.display());

        if self.show_index.is_season_empty(show_id, season) {
            fs_utils::remove_dir_all_if_exists(&season_dir)?;
            self.show_index.remove_season(show_id, season)?;
            tracing::info!("Removed season directory {}", season_dir.display());
        }

        if self.show_index.is_show_empty(show_id) {
            fs_utils::remove_dir_all_if_exists(&show_dir)?;
            self.show_index.remove_show(show_id)?;
            tracing::info!("Removed show directory {}", show_dir.display());
        }

        Ok(())
    }

    pub fn movie_ids(&self) -> Vec<String> {
        self.movie_index.ids()
    }

    pub fn show_ids(&self) -> ShowIds {
        self.show_index.ids()
    }

    pub fn movies(&self) -> Vec<IndexedMovie> {
        self.movie_index.entries()
    }

    pub fn shows(&self) -> Vec<IndexedShow> {
        self.show_index.shows()
    }

    pub fn has_video(&self, video: &Video) -> bool {
        match video {
            Video::Movie(movie) => self.has_movie(&movie.imdb_id),
            Video::Episode(ep) => self.has_show_episode(&ep.show_imdb_id, ep.season, ep.episode),
        }
    }

    pub fn has_movie(&self, id: &str) -> bool {
        self.movie_index.has(id)
    }

    pub fn has_show_episode(&self, show_id: &str, season: u32, episode: u32) -> bool {
        self.show_index.has_episode(show_id, season, episode)
    }

    /// Read a movie back from its sidecar.
    pub fn get_movie(&self, id: &str) -> Result<Movie> {
        let path = self.movie_index.movie_path(id)?;
        sidecar::read_movie(&path)
    }

    /// Read an episode back from its sidecar.
    pub fn get_episode(&self, show_id: &str, season: u32, episode: u32) -> Result<ShowEpisode> {
        let path = self.show_index.episode_path(show_id, season, episode)?;
        let mut ep = sidecar::read_episode(&path)?;
        ep.show_imdb_id = show_id.to_string();
        Ok(ep)
    }

    /// Read a show back from its `tvshow.nfo`.
    pub fn get_show(&self, id: &str) -> Result<Show> {
        let show_dir = self.show_index.show_path(id)?;
        sidecar::read_show(&filename::show_nfo_path(&show_dir))
    }

    pub fn get_indexed_show(&self, id: &str) -> Result<IndexedShow> {
        self.show_index.indexed_show(id)
    }

    pub fn get_season(&self, show_id: &str, season: u32) -> Result<ShowSeason> {
        self.show_index.season_path(show_id, season)?;
        Ok(ShowSeason {
            show_imdb_id: show_id.to_string(),
            season,
        })
    }

    pub fn get_indexed_season(&self, show_id: &str, season: u32) -> Result<IndexedSeason> {
        self.show_index.indexed_season(show_id, season)
    }

    /// Clear both indexes and scan the two storage roots concurrently.
    ///
    /// Returns the first worker error, if any. Unreadable sidecars are
    /// skipped, not errors.
    pub async fn rebuild_index(&self) -> Result<RebuildStats> {
        let (tx, mut rx) = mpsc::channel::<Error>(2);

        self.movie_index.clear();
        let movie_worker = {
            let config = self.config.clone();
            let index = Arc::clone(&self.movie_index);
            let tx = tx.clone();
            tokio::task::spawn_blocking(move || {
                scanner::scan_movies(&config, &index).unwrap_or_else(|e| {
                    let _ = tx.try_send(e);
                    ScanStats::default()
                })
            })
        };

        self.show_index.clear();
        let show_worker = {
            let config = self.config.clone();
            let index = Arc::clone(&self.show_index);
            let tx = tx.clone();
            tokio::task::spawn_blocking(move || {
                scanner::scan_shows(&config, &index).unwrap_or_else(|e| {
                    let _ = tx.try_send(e);
                    ScanStats::default()
                })
            })
        };
        drop(tx);

        let (movies, shows) = tokio::join!(movie_worker, show_worker);
        let stats = RebuildStats {
            movies: movies?,
            shows: shows?,
        };

        if let Some(err) = rx.recv().await {
            return Err(err);
        }
        Ok(stats)
    }

    /// Check every index entry against the disk: files that are gone and
    /// files that do not sit in their canonical directory.
    pub fn verify_index(&self) -> IndexReport {
        let mut report = IndexReport::default();

        for movie in self.movie_index.entries() {
            if !movie.path.exists() {
                tracing::warn!("Missing movie file {}: {}", movie.id, movie.path.display());
                report.missing_movies.push(movie.id);
                continue;
            }
            let canonical = folder::movie_dir(&self.config.movie_dir, &movie.title, movie.year).ok();
            if movie.path.parent() != canonical.as_deref() {
                tracing::warn!("Misplaced movie {}: {}", movie.id, movie.path.display());
                report.misplaced_movies.push(movie.id);
            }
        }

        for show in self.show_index.shows() {
            for season in show.seasons.values() {
                for ep in season.episodes.values() {
                    let key = (show.id.clone(), season.season, ep.episode);
                    if !ep.path.exists() {
                        tracing::warn!("Missing episode file {}: {}", show.id, ep.path.display());
                        report.missing_episodes.push(key);
                    } else if ep.path.parent() != Some(season.path.as_path()) {
                        tracing::warn!("Misplaced episode {}: {}", show.id, ep.path.display());
                        report.misplaced_episodes.push(key);
                    }
                }
            }
        }

        report
    }
}

/// Move a file into `dest_dir`, keeping its name, and leave a symlink at the
/// old location. Returns the new path.
fn relocate(source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or(Error::MissingFilePath)?;
    let dest = dest_dir.join(file_name);

    fs_utils::move_file(source, &dest)?;
    tracing::debug!("Moved {} to {}", source.display(), dest.display());

    if let Err(e) = fs_utils::symlink(&dest, source) {
        tracing::warn!("Failed to link {} to {}: {}", source.display(), dest.display(), e);
    }
    Ok(dest)
}

/// Remove an episode file with its sidecars. Missing files are ignored.
fn remove_episode_files(video_path: &Path) -> Result<()> {
    fs_utils::remove_file_if_exists(video_path)?;
    for sidecar_path in filename::episode_sidecar_paths(video_path) {
        fs_utils::remove_file_if_exists(&sidecar_path)?;
    }
    Ok(())
}
