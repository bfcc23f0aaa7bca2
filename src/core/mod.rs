//! Core business logic modules.

pub mod library;
pub mod movie_index;
pub mod scanner;
pub mod show_index;
pub mod sidecar;

pub use library::{Library, RebuildStats};
