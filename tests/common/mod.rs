//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use media_library::core::Library;
use media_library::models::config::LibraryConfig;
use media_library::models::media::{Movie, Show, ShowEpisode};
use media_library::services::images::ImageFetcher;
use media_library::services::providers::{Detailer, ProviderError, Providers};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Image fetcher that writes a placeholder file and records every call.
#[derive(Default)]
pub struct FakeImages {
    pub calls: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeImages {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageFetcher for FakeImages {
    async fn download(&self, url: &str, dest: &Path) -> media_library::Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, b"image")?;
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        Ok(())
    }
}

/// Detailer that fills show artwork, or fails the way it was told to.
pub struct FakeDetailer {
    pub fatal: bool,
}

#[async_trait]
impl Detailer for FakeDetailer {
    fn name(&self) -> &str {
        "fake"
    }

    async fn show_details(&self, show: &mut Show) -> Result<(), ProviderError> {
        if self.fatal {
            return Err(ProviderError::Fatal {
                module: "fake".to_string(),
                message: "quota exceeded".to_string(),
            });
        }
        show.year = 2002;
        show.fanart = "http://img/show-fanart.jpg".to_string();
        show.poster = "http://img/show-poster.jpg".to_string();
        show.banner = "http://img/show-banner.jpg".to_string();
        Ok(())
    }
}

/// Temporary library with empty movie and show roots.
pub struct TestLibrary {
    pub dir: TempDir,
    pub images: Arc<FakeImages>,
    pub library: Library,
}

impl TestLibrary {
    pub fn new() -> Self {
        Self::with_providers(Providers::none())
    }

    pub fn with_providers(providers: Providers) -> Self {
        let dir = TempDir::new().unwrap();
        let config = LibraryConfig::new(dir.path().join("movies"), dir.path().join("shows"));
        fs::create_dir_all(&config.movie_dir).unwrap();
        fs::create_dir_all(&config.show_dir).unwrap();
        fs::create_dir_all(dir.path().join("incoming")).unwrap();

        let images = Arc::new(FakeImages::default());
        let library = Library::new(config, providers, images.clone());
        Self { dir, images, library }
    }

    /// A second library over the same roots, with empty indexes.
    pub fn reopen(&self) -> Library {
        Library::new(
            self.library.config().clone(),
            Providers::none(),
            Arc::new(FakeImages::default()),
        )
    }

    pub fn movie_root(&self) -> PathBuf {
        self.library.config().movie_dir.clone()
    }

    pub fn show_root(&self) -> PathBuf {
        self.library.config().show_dir.clone()
    }

    /// Create a video file in the incoming directory.
    pub fn incoming(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join("incoming").join(name);
        fs::write(&path, b"video").unwrap();
        path
    }
}

pub fn movie(id: &str, title: &str, year: u32, path: &Path) -> Movie {
    Movie {
        imdb_id: id.to_string(),
        title: title.to_string(),
        year,
        fanart: "http://img/fanart.jpg".to_string(),
        thumb: "http://img/poster.jpg".to_string(),
        path: Some(path.to_path_buf()),
        ..Default::default()
    }
}

pub fn show(id: &str, title: &str) -> Show {
    Show {
        imdb_id: id.to_string(),
        title: title.to_string(),
        fanart: "http://img/show-fanart.jpg".to_string(),
        poster: "http://img/show-poster.jpg".to_string(),
        banner: "http://img/show-banner.jpg".to_string(),
        ..Default::default()
    }
}

/// Episode of "The Wire" carrying its show details.
pub fn episode(season: u32, number: u32, path: &Path) -> ShowEpisode {
    ShowEpisode {
        show_imdb_id: "tt100".to_string(),
        show_title: "The Wire".to_string(),
        season,
        episode: number,
        title: format!("Episode {}", number),
        path: Some(path.to_path_buf()),
        show: Some(Box::new(show("tt100", "The Wire"))),
        ..Default::default()
    }
}
