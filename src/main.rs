//! Media Library CLI
//!
//! A command-line tool for organizing and browsing a movie and TV show library.

use clap::Parser;
use media_library::cli::{
    args::{Cli, Commands},
    commands::{self, import, index, movies, shows},
};
use media_library::models::config::load_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let library = commands::open_library(&config)?;

    // Run the appropriate command
    match cli.command {
        Commands::Index { action } => {
            index::execute_index(action, &library, cli.json).await?;
        }

        Commands::Movies { action } => {
            movies::execute_movies(action, &library, cli.json).await?;
        }

        Commands::Shows { action } => {
            shows::execute_shows(action, &library, cli.json).await?;
        }

        Commands::Import { media_type } => {
            import::execute_import(media_type, &library, cli.json).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("media_library=debug")
    } else {
        EnvFilter::new("media_library=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
