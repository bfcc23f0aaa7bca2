//! NFO file generator (Kodi compatible).
//!
//! Every document starts with a `<library>` block holding the fields the
//! library owns (date added, quality, release group, codecs, container),
//! followed by the descriptive fields that come from metadata providers.

use crate::models::media::{Movie, Show, ShowEpisode, VideoMetadata};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

/// Generate movie NFO content.
pub fn generate_movie_nfo(movie: &Movie) -> String {
    let mut nfo = String::new();

    nfo.push_str(XML_DECLARATION);
    nfo.push_str("<movie>\n");
    push_library_block(&mut nfo, &movie.metadata);

    push_tag(&mut nfo, "id", &movie.imdb_id);
    push_tag(&mut nfo, "title", &movie.title);
    push_tag(&mut nfo, "originaltitle", &movie.original_title);
    push_tag(&mut nfo, "sorttitle", &movie.sort_title);
    nfo.push_str(&format!("  <year>{}</year>\n", movie.year));
    push_tag(&mut nfo, "plot", &movie.plot);
    push_tag(&mut nfo, "tagline", &movie.tagline);
    nfo.push_str(&format!("  <rating>{}</rating>\n", movie.rating));
    nfo.push_str(&format!("  <votes>{}</votes>\n", movie.votes));
    nfo.push_str(&format!("  <runtime>{}</runtime>\n", movie.runtime));
    nfo.push_str(&format!("  <tmdbid>{}</tmdbid>\n", movie.tmdb_id));
    push_tag(&mut nfo, "thumb", &movie.thumb);
    push_tag(&mut nfo, "customfanart", &movie.fanart);

    for genre in &movie.genres {
        push_tag(&mut nfo, "genre", genre);
    }

    nfo.push_str("</movie>\n");
    nfo
}

/// Generate TV show NFO content.
pub fn generate_tvshow_nfo(show: &Show) -> String {
    let mut nfo = String::new();

    nfo.push_str(XML_DECLARATION);
    nfo.push_str("<tvshow>\n");

    push_tag(&mut nfo, "id", &show.imdb_id);
    push_tag(&mut nfo, "title", &show.title);
    nfo.push_str(&format!("  <year>{}</year>\n", show.year));
    push_tag(&mut nfo, "plot", &show.plot);
    nfo.push_str(&format!("  <rating>{}</rating>\n", show.rating));
    nfo.push_str(&format!("  <tvdbid>{}</tvdbid>\n", show.tvdb_id));
    push_tag(&mut nfo, "fanart", &show.fanart);
    push_tag(&mut nfo, "poster", &show.poster);
    push_tag(&mut nfo, "banner", &show.banner);

    for genre in &show.genres {
        push_tag(&mut nfo, "genre", genre);
    }

    nfo.push_str("</tvshow>\n");
    nfo
}

/// Generate episode NFO content.
pub fn generate_episode_nfo(episode: &ShowEpisode) -> String {
    let mut nfo = String::new();

    nfo.push_str(XML_DECLARATION);
    nfo.push_str("<episodedetails>\n");
    push_library_block(&mut nfo, &episode.metadata);

    push_tag(&mut nfo, "showimdbid", &episode.show_imdb_id);
    push_tag(&mut nfo, "showtitle", &episode.show_title);
    nfo.push_str(&format!("  <season>{}</season>\n", episode.season));
    nfo.push_str(&format!("  <episode>{}</episode>\n", episode.episode));
    push_tag(&mut nfo, "title", &episode.title);
    push_tag(&mut nfo, "aired", &episode.aired);
    push_tag(&mut nfo, "plot", &episode.plot);
    nfo.push_str(&format!("  <runtime>{}</runtime>\n", episode.runtime));
    nfo.push_str(&format!("  <rating>{}</rating>\n", episode.rating));
    push_tag(&mut nfo, "thumb", &episode.thumb);

    nfo.push_str("</episodedetails>\n");
    nfo
}

fn push_library_block(nfo: &mut String, metadata: &VideoMetadata) {
    nfo.push_str("  <library>\n");
    if let Some(date_added) = metadata.date_added {
        nfo.push_str(&format!(
            "    <date_added>{}</date_added>\n",
            date_added.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ));
    }
    if let Some(quality) = metadata.quality {
        nfo.push_str(&format!("    <quality>{}</quality>\n", quality));
    }
    for (tag, value) in [
        ("release_group", &metadata.release_group),
        ("audio_codec", &metadata.audio_codec),
        ("video_codec", &metadata.video_codec),
        ("container", &metadata.container),
    ] {
        if !value.is_empty() {
            nfo.push_str(&format!("    <{tag}>{}</{tag}>\n", escape_xml(value)));
        }
    }
    nfo.push_str("  </library>\n");
}

/// Push a text element, skipping empty values.
fn push_tag(nfo: &mut String, tag: &str, value: &str) {
    if !value.is_empty() {
        nfo.push_str(&format!("  <{tag}>{}</{tag}>\n", escape_xml(value)));
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
