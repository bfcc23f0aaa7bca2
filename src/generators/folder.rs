//! Folder name generator.

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Generate movie folder name.
///
/// Format: `${title} (${year})`, or just `${title}` when the year is unknown.
pub fn generate_movie_folder(title: &str, year: u32) -> String {
    let title = sanitize_filename(title);
    if year == 0 {
        title
    } else {
        format!("{} ({})", title, year)
    }
}

/// Generate TV show folder name.
pub fn generate_show_folder(show_title: &str) -> String {
    sanitize_filename(show_title)
}

/// Generate season folder name.
///
/// Format: `Season ${seasonNr}`
pub fn generate_season_folder(season_number: u32) -> String {
    format!("Season {}", season_number)
}

/// Canonical directory of a movie under the movie root.
pub fn movie_dir(movie_root: &Path, title: &str, year: u32) -> Result<PathBuf> {
    child_dir(movie_root, generate_movie_folder(title, year))
}

/// Canonical directory of a show under the show root.
pub fn show_dir(show_root: &Path, show_title: &str) -> Result<PathBuf> {
    child_dir(show_root, generate_show_folder(show_title))
}

/// Canonical directory of a season under the show root.
pub fn season_dir(show_root: &Path, show_title: &str, season_number: u32) -> Result<PathBuf> {
    Ok(show_dir(show_root, show_title)?.join(generate_season_folder(season_number)))
}

/// Join `name` onto `root`, refusing anything that is not exactly one new
/// directory level below it.
fn child_dir(root: &Path, name: String) -> Result<PathBuf> {
    let blank = name
        .trim_matches(|c: char| c == '.' || c.is_whitespace())
        .is_empty();
    let mut components = Path::new(&name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !blank => Ok(root.join(&name)),
        _ => Err(Error::InvalidFolderName(name)),
    }
}

/// Sanitize a string for use in filenames.
fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
