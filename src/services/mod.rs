//! External services: artwork downloads and provider modules.

pub mod images;
pub mod providers;
