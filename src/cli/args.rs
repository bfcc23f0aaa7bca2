//! Command line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Media Library - Organize and catalog your movies and TV shows
#[derive(Parser, Debug)]
#[command(name = "media-library")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild or check the library index
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },

    /// Browse and delete movies
    Movies {
        #[command(subcommand)]
        action: MoviesAction,
    },

    /// Browse and delete TV show episodes
    Shows {
        #[command(subcommand)]
        action: ShowsAction,
    },

    /// Move a video file into the library
    Import {
        #[command(subcommand)]
        media_type: ImportType,
    },
}

#[derive(Subcommand, Debug)]
pub enum IndexAction {
    /// Rebuild the index from the storage roots
    Rebuild,

    /// Rebuild, then report videos outside their canonical directories
    Verify,
}

#[derive(Subcommand, Debug)]
pub enum MoviesAction {
    /// List indexed movies
    List,

    /// Show a movie's details
    Show {
        /// IMDB ID
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Delete a movie and its directory
    Delete {
        /// IMDB ID
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShowsAction {
    /// List indexed shows
    List,

    /// Show a TV show's details
    Show {
        /// Show IMDB ID
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List the episodes of a season
    Season {
        /// Show IMDB ID
        #[arg(value_name = "ID")]
        id: String,

        #[arg(value_name = "SEASON")]
        season: u32,
    },

    /// Show an episode's details
    Episode {
        /// Show IMDB ID
        #[arg(value_name = "ID")]
        id: String,

        #[arg(value_name = "SEASON")]
        season: u32,

        #[arg(value_name = "EPISODE")]
        episode: u32,
    },

    /// Delete an episode, and its season and show once empty
    Delete {
        /// Show IMDB ID
        #[arg(value_name = "ID")]
        id: String,

        #[arg(value_name = "SEASON")]
        season: u32,

        #[arg(value_name = "EPISODE")]
        episode: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImportType {
    /// Import a movie file
    Movie(ImportMovieArgs),

    /// Import a TV show episode file
    Episode(ImportEpisodeArgs),
}

#[derive(Args, Debug)]
pub struct ImportMovieArgs {
    /// Video file to import
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// IMDB ID
    #[arg(long)]
    pub imdb_id: String,

    /// Movie title
    #[arg(short = 't', long)]
    pub title: String,

    /// Release year
    #[arg(short = 'y', long, default_value_t = 0)]
    pub year: u32,

    /// Fanart image URL
    #[arg(long)]
    pub fanart: Option<String>,

    /// Poster image URL
    #[arg(long)]
    pub thumb: Option<String>,

    /// Quality: 480p, 720p, 1080p or 3D
    #[arg(short = 'q', long)]
    pub quality: Option<String>,

    /// Release group
    #[arg(long)]
    pub release_group: Option<String>,
}

#[derive(Args, Debug)]
pub struct ImportEpisodeArgs {
    /// Video file to import
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Show IMDB ID
    #[arg(long)]
    pub show_id: String,

    /// Show title
    #[arg(long)]
    pub show_title: String,

    #[arg(short = 's', long)]
    pub season: u32,

    #[arg(short = 'e', long)]
    pub episode: u32,

    /// Episode title
    #[arg(short = 't', long)]
    pub title: Option<String>,

    /// Quality: 480p, 720p, 1080p or 3D
    #[arg(short = 'q', long)]
    pub quality: Option<String>,

    /// Release group
    #[arg(long)]
    pub release_group: Option<String>,

    /// Show fanart URL, used the first time the show is imported
    #[arg(long)]
    pub show_fanart: Option<String>,

    /// Show poster URL, used the first time the show is imported
    #[arg(long)]
    pub show_poster: Option<String>,

    /// Show banner URL, used the first time the show is imported
    #[arg(long)]
    pub show_banner: Option<String>,
}
