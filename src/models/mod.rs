//! Data models.

pub mod config;
pub mod index;
pub mod media;
