//! NFO sidecar reading and writing.
//!
//! Documents are produced by [`crate::generators::nfo`] and read back with
//! `quick-xml`'s serde support. An empty document reads as a zero-valued
//! entity; reading a sidecar from disk additionally requires an identifier.

use crate::generators::{filename, nfo};
use crate::models::media::{Movie, Quality, Show, ShowEpisode, VideoMetadata};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LibraryNfo {
    date_added: String,
    quality: String,
    release_group: String,
    audio_codec: String,
    video_codec: String,
    container: String,
}

impl LibraryNfo {
    fn into_metadata(self) -> Result<VideoMetadata> {
        let date_added = match self.date_added.trim() {
            "" => None,
            s => Some(
                DateTime::parse_from_rfc3339(s)
                    .map_err(|e| Error::ParseError(format!("invalid date_added {:?}: {}", s, e)))?
                    .with_timezone(&Utc),
            ),
        };
        let quality = match self.quality.trim() {
            "" => None,
            s => Some(s.parse::<Quality>()?),
        };

        Ok(VideoMetadata {
            date_added,
            quality,
            release_group: self.release_group,
            audio_codec: self.audio_codec,
            video_codec: self.video_codec,
            container: self.container,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MovieNfo {
    library: LibraryNfo,
    id: String,
    title: String,
    originaltitle: String,
    sorttitle: String,
    year: u32,
    plot: String,
    tagline: String,
    rating: f32,
    votes: u32,
    runtime: u32,
    tmdbid: u64,
    thumb: String,
    customfanart: String,
    genre: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShowNfo {
    id: String,
    title: String,
    year: u32,
    plot: String,
    rating: f32,
    tvdbid: u64,
    fanart: String,
    poster: String,
    banner: String,
    genre: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EpisodeNfo {
    library: LibraryNfo,
    showimdbid: String,
    showtitle: String,
    season: u32,
    episode: u32,
    title: String,
    aired: String,
    plot: String,
    runtime: u32,
    rating: f32,
    thumb: String,
}

/// Deserialize a document, treating blank content as an empty document.
fn from_str<T>(content: &str) -> Result<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(quick_xml::de::from_str(content)?)
}

/// Parse movie NFO content.
pub fn parse_movie(content: &str) -> Result<Movie> {
    let doc: MovieNfo = from_str(content)?;
    Ok(Movie {
        imdb_id: doc.id,
        tmdb_id: doc.tmdbid,
        title: doc.title,
        original_title: doc.originaltitle,
        sort_title: doc.sorttitle,
        year: doc.year,
        plot: doc.plot,
        tagline: doc.tagline,
        rating: doc.rating,
        votes: doc.votes,
        runtime: doc.runtime,
        genres: doc.genre,
        thumb: doc.thumb,
        fanart: doc.customfanart,
        path: None,
        metadata: doc.library.into_metadata()?,
        torrents: Vec::new(),
    })
}

/// Parse tvshow NFO content.
pub fn parse_show(content: &str) -> Result<Show> {
    let doc: ShowNfo = from_str(content)?;
    Ok(Show {
        imdb_id: doc.id,
        tvdb_id: doc.tvdbid,
        title: doc.title,
        year: doc.year,
        plot: doc.plot,
        rating: doc.rating,
        genres: doc.genre,
        fanart: doc.fanart,
        poster: doc.poster,
        banner: doc.banner,
    })
}

/// Parse episode NFO content.
pub fn parse_episode(content: &str) -> Result<ShowEpisode> {
    let doc: EpisodeNfo = from_str(content)?;
    Ok(ShowEpisode {
        show_imdb_id: doc.showimdbid,
        show_title: doc.showtitle,
        season: doc.season,
        episode: doc.episode,
        title: doc.title,
        aired: doc.aired,
        plot: doc.plot,
        runtime: doc.runtime,
        rating: doc.rating,
        thumb: doc.thumb,
        path: None,
        metadata: doc.library.into_metadata()?,
        show: None,
        torrents: Vec::new(),
    })
}

/// Rebuild a movie from the sidecar next to its video file.
pub fn read_movie(video_path: &Path) -> Result<Movie> {
    let nfo_path = filename::nfo_path(video_path);
    let mut movie = parse_movie(&fs::read_to_string(&nfo_path)?)?;
    if movie.imdb_id.is_empty() {
        return Err(Error::ParseError(format!(
            "no movie id in {}",
            nfo_path.display()
        )));
    }
    movie.path = Some(video_path.to_path_buf());
    Ok(movie)
}

/// Read a show from its `tvshow.nfo`.
pub fn read_show(nfo_path: &Path) -> Result<Show> {
    let show = parse_show(&fs::read_to_string(nfo_path)?)?;
    if show.imdb_id.is_empty() {
        return Err(Error::ParseError(format!(
            "no show id in {}",
            nfo_path.display()
        )));
    }
    Ok(show)
}

/// Rebuild an episode from the sidecar next to its video file.
pub fn read_episode(video_path: &Path) -> Result<ShowEpisode> {
    let nfo_path = filename::nfo_path(video_path);
    let mut episode = parse_episode(&fs::read_to_string(&nfo_path)?)?;
    episode.path = Some(video_path.to_path_buf());
    Ok(episode)
}

/// Write the movie sidecar next to its video file.
pub fn write_movie(movie: &Movie) -> Result<()> {
    let video_path = movie.path.as_deref().ok_or(Error::MissingFilePath)?;
    fs::write(filename::nfo_path(video_path), nfo::generate_movie_nfo(movie))?;
    Ok(())
}

/// Write `tvshow.nfo` into a show directory.
pub fn write_show(show_dir: &Path, show: &Show) -> Result<()> {
    fs::write(filename::show_nfo_path(show_dir), nfo::generate_tvshow_nfo(show))?;
    Ok(())
}

/// Write the episode sidecar next to its video file.
pub fn write_episode(episode: &ShowEpisode) -> Result<()> {
    let video_path = episode.path.as_deref().ok_or(Error::MissingFilePath)?;
    fs::write(filename::nfo_path(video_path), nfo::generate_episode_nfo(episode))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    const MOVIE_NFO: &str = r#"<movie>
  <library>
    <date_added>2019-05-07T12:00:00Z</date_added>
    <quality>720p</quality>
    <release_group>YTS.AM</release_group>
    <audio_codec>Dolby Digital Plus</audio_codec>
    <video_codec>H.264</video_codec>
    <container>mp4</container>
  </library>
  <id>tt2562232</id>
  <originaltitle>Birdman</originaltitle>
  <plot>Awesome plot</plot>
  <rating>7.7</rating>
  <runtime>119</runtime>
  <sorttitle>Birdman</sorttitle>
  <tagline>or (The Unexpected Virtue of Ignorance)</tagline>
  <thumb>https://image.tmdb.org/t/p/original/rSZs93P0LLxqlVEbI001UKoeCQC.jpg</thumb>
  <customfanart>https://image.tmdb.org/t/p/original/AsJVim0Hk3KbQPbfjyijfjqmaoZ.jpg</customfanart>
  <title>Birdman</title>
  <tmdbid>194662</tmdbid>
  <votes>747</votes>
  <year>2014</year>
  <genre>horror</genre>
  <genre>action</genre>
</movie>"#;

    #[test]
    fn test_parse_movie_nfo() {
        let movie = parse_movie(MOVIE_NFO).unwrap();

        assert_eq!(movie.imdb_id, "tt2562232");
        assert_eq!(movie.title, "Birdman");
        assert_eq!(movie.year, 2014);
        assert_eq!(movie.tmdb_id, 194662);
        assert_eq!(movie.votes, 747);
        assert_eq!(movie.runtime, 119);
        assert!((movie.rating - 7.7).abs() < f32::EPSILON);
        assert_eq!(movie.genres, vec!["horror".to_string(), "action".to_string()]);
        assert_eq!(movie.metadata.quality, Some(Quality::Q720p));
        assert_eq!(movie.metadata.release_group, "YTS.AM");
        assert_eq!(
            movie.metadata.date_added,
            Some(Utc.with_ymd_and_hms(2019, 5, 7, 12, 0, 0).unwrap())
        );
        assert!(movie.fanart.ends_with("AsJVim0Hk3KbQPbfjyijfjqmaoZ.jpg"));
    }

    #[test]
    fn test_parse_empty_movie_nfo() {
        let movie = parse_movie("<movie></movie>").unwrap();
        assert_eq!(movie, Movie::default());

        let movie = parse_movie("").unwrap();
        assert_eq!(movie, Movie::default());
    }

    #[test]
    fn test_parse_invalid_quality() {
        let content = "<movie><library><quality>4K</quality></library></movie>";
        assert!(matches!(parse_movie(content), Err(Error::InvalidQuality(_))));
    }

    #[test]
    fn test_parse_malformed_nfo() {
        assert!(matches!(
            parse_movie("<movie><year>not a year</year></movie>"),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn test_written_movie_reads_back() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("birdman.mkv");
        let movie = Movie {
            imdb_id: "tt2562232".to_string(),
            title: "Birdman & Co".to_string(),
            year: 2014,
            rating: 7.75,
            genres: vec!["drama".to_string()],
            path: Some(video.clone()),
            metadata: VideoMetadata {
                date_added: Some(Utc.with_ymd_and_hms(2019, 5, 7, 12, 0, 0).unwrap()),
                quality: Some(Quality::Q1080p),
                container: "mkv".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        write_movie(&movie).unwrap();
        let read = read_movie(&video).unwrap();

        assert_eq!(read, movie);
    }

    #[test]
    fn test_read_movie_requires_id() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("unknown.mkv");
        fs::write(dir.path().join("unknown.nfo"), "<movie><title>X</title></movie>").unwrap();

        assert!(matches!(read_movie(&video), Err(Error::ParseError(_))));
    }

    #[test]
    fn test_read_movie_without_nfo() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_movie(&dir.path().join("missing.mkv")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_show_and_episode_nfo() {
        let dir = TempDir::new().unwrap();
        let show = Show {
            imdb_id: "tt0903747".to_string(),
            title: "Breaking Bad".to_string(),
            year: 2008,
            fanart: "http://img/fanart.jpg".to_string(),
            poster: "http://img/poster.jpg".to_string(),
            banner: "http://img/banner.jpg".to_string(),
            ..Default::default()
        };
        write_show(dir.path(), &show).unwrap();
        assert_eq!(read_show(&filename::show_nfo_path(dir.path())).unwrap(), show);

        let video = dir.path().join("s01e01.mkv");
        let episode = ShowEpisode {
            show_imdb_id: "tt0903747".to_string(),
            show_title: "Breaking Bad".to_string(),
            season: 1,
            episode: 1,
            title: "Pilot".to_string(),
            aired: "2008-01-20".to_string(),
            path: Some(video.clone()),
            ..Default::default()
        };
        write_episode(&episode).unwrap();
        assert_eq!(read_episode(&video).unwrap(), episode);
    }
}
