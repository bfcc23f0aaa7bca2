//! Media-related data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Video type enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    Movie,
    Show,
    Episode,
}

impl std::fmt::Display for VideoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoType::Movie => write!(f, "movie"),
            VideoType::Show => write!(f, "show"),
            VideoType::Episode => write!(f, "episode"),
        }
    }
}

/// Quality of a video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "480p")]
    Q480p,
    #[serde(rename = "720p")]
    Q720p,
    #[serde(rename = "1080p")]
    Q1080p,
    #[serde(rename = "3D")]
    Q3D,
}

impl Quality {
    /// String form used in sidecars and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Q480p => "480p",
            Quality::Q720p => "720p",
            Quality::Q1080p => "1080p",
            Quality::Q3D => "3D",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "480p" => Ok(Quality::Q480p),
            "720p" => Ok(Quality::Q720p),
            "1080p" => Ok(Quality::Q1080p),
            "3D" => Ok(Quality::Q3D),
            other => Err(crate::Error::InvalidQuality(other.to_string())),
        }
    }
}

/// A candidate source for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Torrent {
    pub quality: Quality,
    pub url: String,
}

/// Library-internal technical metadata stored in the sidecar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// When the file entered the library.
    pub date_added: Option<DateTime<Utc>>,
    pub quality: Option<Quality>,
    /// Release group (e.g., "YTS.AM").
    pub release_group: String,
    pub audio_codec: String,
    pub video_codec: String,
    /// Container format (e.g., "mkv", "mp4").
    pub container: String,
}

/// Common accessors shared by every indexed entity.
pub trait Media {
    fn video_type(&self) -> VideoType;

    /// Canonical identifier (an IMDB id for movies and shows).
    fn id(&self) -> &str;

    /// Location of the video file, if the entity has one.
    fn path(&self) -> Option<&Path>;

    /// Artwork URLs as `(name, url)` pairs, empty URLs included.
    fn image_urls(&self) -> Vec<(&'static str, &str)>;
}

/// A single film.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub imdb_id: String,
    pub tmdb_id: u64,
    pub title: String,
    pub original_title: String,
    pub sort_title: String,
    /// Release year, 0 when unknown.
    pub year: u32,
    pub plot: String,
    pub tagline: String,
    pub rating: f32,
    pub votes: u32,
    /// Runtime in minutes.
    pub runtime: u32,
    pub genres: Vec<String>,
    /// Poster URL.
    pub thumb: String,
    pub fanart: String,
    pub path: Option<PathBuf>,
    pub metadata: VideoMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub torrents: Vec<Torrent>,
}

impl Movie {
    pub fn new(imdb_id: impl Into<String>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            ..Default::default()
        }
    }
}

impl Media for Movie {
    fn video_type(&self) -> VideoType {
        VideoType::Movie
    }

    fn id(&self) -> &str {
        &self.imdb_id
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn image_urls(&self) -> Vec<(&'static str, &str)> {
        vec![("fanart", self.fanart.as_str()), ("thumb", self.thumb.as_str())]
    }
}

/// A TV series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub imdb_id: String,
    pub tvdb_id: u64,
    pub title: String,
    /// First air year, 0 when unknown.
    pub year: u32,
    pub plot: String,
    pub rating: f32,
    pub genres: Vec<String>,
    pub fanart: String,
    pub poster: String,
    pub banner: String,
}

impl Show {
    /// Minimal show built from the identifying fields of one of its episodes.
    pub fn from_episode(episode: &ShowEpisode) -> Self {
        Self {
            imdb_id: episode.show_imdb_id.clone(),
            title: episode.show_title.clone(),
            ..Default::default()
        }
    }
}

impl Media for Show {
    fn video_type(&self) -> VideoType {
        VideoType::Show
    }

    fn id(&self) -> &str {
        &self.imdb_id
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    fn image_urls(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("fanart", self.fanart.as_str()),
            ("poster", self.poster.as_str()),
            ("banner", self.banner.as_str()),
        ]
    }
}

/// A season of a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSeason {
    pub show_imdb_id: String,
    pub season: u32,
}

/// A single episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowEpisode {
    pub show_imdb_id: String,
    pub show_title: String,
    pub season: u32,
    pub episode: u32,
    pub title: String,
    pub plot: String,
    /// Air date (YYYY-MM-DD).
    pub aired: String,
    pub runtime: u32,
    pub rating: f32,
    pub thumb: String,
    pub path: Option<PathBuf>,
    pub metadata: VideoMetadata,
    /// Show details carried along by the ingestion request, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<Box<Show>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub torrents: Vec<Torrent>,
}

impl Media for ShowEpisode {
    fn video_type(&self) -> VideoType {
        VideoType::Episode
    }

    fn id(&self) -> &str {
        &self.show_imdb_id
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn image_urls(&self) -> Vec<(&'static str, &str)> {
        vec![("thumb", self.thumb.as_str())]
    }
}

/// A video the library can store: the closed set of indexable kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Video {
    Movie(Movie),
    Episode(ShowEpisode),
}

impl Video {
    fn as_media(&self) -> &dyn Media {
        match self {
            Video::Movie(m) => m,
            Video::Episode(e) => e,
        }
    }
}

impl Media for Video {
    fn video_type(&self) -> VideoType {
        self.as_media().video_type()
    }

    fn id(&self) -> &str {
        self.as_media().id()
    }

    fn path(&self) -> Option<&Path> {
        self.as_media().path()
    }

    fn image_urls(&self) -> Vec<(&'static str, &str)> {
        self.as_media().image_urls()
    }
}

impl From<Movie> for Video {
    fn from(movie: Movie) -> Self {
        Video::Movie(movie)
    }
}

impl From<ShowEpisode> for Video {
    fn from(episode: ShowEpisode) -> Self {
        Video::Episode(episode)
    }
}
