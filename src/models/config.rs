//! Configuration model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default recognized video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "m4v", "ts", "m2ts", "flv", "webm", "mpg", "mpeg",
];

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library storage configuration.
    pub library: LibraryConfig,
    /// Artwork download configuration.
    pub images: ImageConfig,
    /// Provider modules to enable.
    pub modules: ModulesConfig,
}

/// Library storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Movie storage root.
    pub movie_dir: PathBuf,
    /// Show storage root.
    pub show_dir: PathBuf,
    /// Recognized video file extensions, without the leading dot.
    pub video_extensions: Vec<String>,
}

/// Artwork download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
}

/// Names of the registered modules to use, in priority order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    pub detailers: Vec<String>,
    pub torrenters: Vec<String>,
    pub notifiers: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let base = dirs::video_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            movie_dir: base.join("Movies"),
            show_dir: base.join("Shows"),
            video_extensions: VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl LibraryConfig {
    /// Config with the given roots and the default extensions.
    pub fn new(movie_dir: impl Into<PathBuf>, show_dir: impl Into<PathBuf>) -> Self {
        Self {
            movie_dir: movie_dir.into(),
            show_dir: show_dir.into(),
            ..Default::default()
        }
    }

    /// Check if a file is a video file based on the configured extensions.
    pub fn is_video_file(&self, path: &Path) -> bool {
        crate::utils::fs::get_extension(path)
            .map(|ext| {
                self.video_extensions
                    .iter()
                    .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self { timeout: 30 }
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("media_library")
}

/// Load configuration from an explicit file, or from the default location.
///
/// An explicit path must exist and parse. The default location is optional and
/// falls back to [`Config::default`] when absent.
pub fn load_config(path: Option<&Path>) -> crate::Result<Config> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default_path = dirs_config_path().join("config.toml");
            if !default_path.exists() {
                return Ok(Config::default());
            }
            default_path
        }
    };

    let content = std::fs::read_to_string(&config_path)?;
    let config = toml::from_str(&content)?;
    tracing::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}
