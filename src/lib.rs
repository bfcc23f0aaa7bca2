//! Media Library
//!
//! Organizes movies and TV shows into a canonical directory layout with NFO
//! sidecars, and keeps an in-memory index of what is stored.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
