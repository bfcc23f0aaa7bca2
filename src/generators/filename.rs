//! Sidecar and artwork file name generator.
//!
//! Every path here is derived from the location of a video file or of a show
//! directory; nothing touches the filesystem.

use std::path::{Path, PathBuf};

/// Name of the show-level sidecar inside a show directory.
pub const SHOW_NFO_FILENAME: &str = "tvshow.nfo";

/// Extensions of the sidecars that live next to an episode file.
pub const EPISODE_SIDECAR_EXTENSIONS: &[&str] = &["nfo", "srt"];

/// Sidecar path of a video: `<file-without-ext>.nfo`.
pub fn nfo_path(video_path: &Path) -> PathBuf {
    video_path.with_extension("nfo")
}

/// Sidecar files that belong to an episode, in removal order.
pub fn episode_sidecar_paths(video_path: &Path) -> Vec<PathBuf> {
    EPISODE_SIDECAR_EXTENSIONS
        .iter()
        .map(|ext| video_path.with_extension(ext))
        .collect()
}

/// Show sidecar path: `<show dir>/tvshow.nfo`.
pub fn show_nfo_path(show_dir: &Path) -> PathBuf {
    show_dir.join(SHOW_NFO_FILENAME)
}

/// Movie fanart path, next to the movie file.
pub fn movie_fanart_path(video_path: &Path) -> PathBuf {
    sibling(video_path, "fanart.jpg")
}

/// Movie poster path, next to the movie file.
pub fn movie_thumb_path(video_path: &Path) -> PathBuf {
    sibling(video_path, "poster.jpg")
}

/// Show artwork path: `<show dir>/<kind>.jpg` (fanart, poster or banner).
pub fn show_artwork_path(show_dir: &Path, kind: &str) -> PathBuf {
    show_dir.join(format!("{}.jpg", kind))
}

fn sibling(video_path: &Path, name: &str) -> PathBuf {
    video_path
        .parent()
        .map(|dir| dir.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}
