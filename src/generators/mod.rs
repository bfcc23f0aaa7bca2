//! Generators for folder names, file names and NFO content.

pub mod filename;
pub mod folder;
pub mod nfo;
