//! Pluggable provider modules.
//!
//! A module implements one or more capabilities: fetching details
//! ([`Detailer`]), finding torrents ([`Torrenter`]) or announcing new videos
//! ([`Notifier`]). Modules are registered by name in a [`ModuleRegistry`] and
//! the names listed in the configuration are resolved into a [`Providers`]
//! bundle that the library and the CLI call through.

use crate::models::config::ModulesConfig;
use crate::models::media::{Media, Movie, Show, ShowEpisode, Torrent, Video};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error returned by a single provider module.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The module cannot continue; callers must stop.
    #[error("{module}: fatal error: {message}")]
    Fatal { module: String, message: String },

    #[error("{module}: not found")]
    NotFound { module: String },

    #[error("operation not supported by this module")]
    Unsupported,

    #[error("{module}: request failed: {message}")]
    Request { module: String, message: String },

    #[error("no {0} module configured")]
    NoModule(&'static str),
}

impl ProviderError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProviderError::Fatal { .. })
    }
}

/// Errors collected from every module tried for one call.
#[derive(Debug, Default)]
pub struct ProviderErrors(pub Vec<ProviderError>);

impl ProviderErrors {
    /// Whether any module returned a fatal error.
    pub fn is_fatal(&self) -> bool {
        self.0.iter().any(ProviderError::is_fatal)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, err: ProviderError) {
        self.0.push(err);
    }
}

impl fmt::Display for ProviderErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ProviderErrors {}

impl From<ProviderError> for ProviderErrors {
    fn from(err: ProviderError) -> Self {
        ProviderErrors(vec![err])
    }
}

/// Fills in descriptive fields of an entity.
#[async_trait]
pub trait Detailer: Send + Sync {
    fn name(&self) -> &str;

    async fn movie_details(&self, _movie: &mut Movie) -> std::result::Result<(), ProviderError> {
        Err(ProviderError::Unsupported)
    }

    async fn show_details(&self, _show: &mut Show) -> std::result::Result<(), ProviderError> {
        Err(ProviderError::Unsupported)
    }

    async fn episode_details(
        &self,
        _episode: &mut ShowEpisode,
    ) -> std::result::Result<(), ProviderError> {
        Err(ProviderError::Unsupported)
    }
}

/// Finds candidate sources for a video.
#[async_trait]
pub trait Torrenter: Send + Sync {
    fn name(&self) -> &str;

    async fn movie_torrents(&self, _movie: &Movie) -> std::result::Result<Vec<Torrent>, ProviderError> {
        Err(ProviderError::Unsupported)
    }

    async fn episode_torrents(
        &self,
        _episode: &ShowEpisode,
    ) -> std::result::Result<Vec<Torrent>, ProviderError> {
        Err(ProviderError::Unsupported)
    }
}

/// Announces a video that entered the library.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, video: &Video) -> std::result::Result<(), ProviderError>;
}

/// Notifier that writes a log line for every new video.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, video: &Video) -> std::result::Result<(), ProviderError> {
        match video {
            Video::Movie(movie) => {
                tracing::info!("New movie: {} ({}) [{}]", movie.title, movie.year, movie.imdb_id)
            }
            Video::Episode(ep) => tracing::info!(
                "New episode: {} S{:02}E{:02} [{}]",
                ep.show_title,
                ep.season,
                ep.episode,
                ep.show_imdb_id
            ),
        }
        Ok(())
    }
}

/// Modules resolved from the configuration, in priority order.
#[derive(Clone, Default)]
pub struct Providers {
    detailers: Vec<Arc<dyn Detailer>>,
    torrenters: Vec<Arc<dyn Torrenter>>,
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl fmt::Debug for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Providers")
            .field("detailers", &self.detailers.iter().map(|m| m.name()).collect::<Vec<_>>())
            .field("torrenters", &self.torrenters.iter().map(|m| m.name()).collect::<Vec<_>>())
            .field("notifiers", &self.notifiers.iter().map(|m| m.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl Providers {
    /// Bundle with no modules at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_detailer(mut self, module: Arc<dyn Detailer>) -> Self {
        self.detailers.push(module);
        self
    }

    pub fn with_torrenter(mut self, module: Arc<dyn Torrenter>) -> Self {
        self.torrenters.push(module);
        self
    }

    pub fn with_notifier(mut self, module: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(module);
        self
    }

    /// Ask each detailer in turn until one succeeds.
    pub async fn movie_details(&self, movie: &mut Movie) -> std::result::Result<(), ProviderErrors> {
        if self.detailers.is_empty() {
            return Err(ProviderError::NoModule("detailer").into());
        }

        let mut errors = ProviderErrors::default();
        for detailer in &self.detailers {
            match detailer.movie_details(movie).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!("{} could not detail movie {}: {}", detailer.name(), movie.id(), e);
                    errors.push(e);
                }
            }
        }
        Err(errors)
    }

    /// Ask each detailer in turn until one succeeds.
    pub async fn show_details(&self, show: &mut Show) -> std::result::Result<(), ProviderErrors> {
        if self.detailers.is_empty() {
            return Err(ProviderError::NoModule("detailer").into());
        }

        let mut errors = ProviderErrors::default();
        for detailer in &self.detailers {
            match detailer.show_details(show).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!("{} could not detail show {}: {}", detailer.name(), show.id(), e);
                    errors.push(e);
                }
            }
        }
        Err(errors)
    }

    /// Ask each detailer in turn until one succeeds.
    pub async fn episode_details(
        &self,
        episode: &mut ShowEpisode,
    ) -> std::result::Result<(), ProviderErrors> {
        if self.detailers.is_empty() {
            return Err(ProviderError::NoModule("detailer").into());
        }

        let mut errors = ProviderErrors::default();
        for detailer in &self.detailers {
            match detailer.episode_details(episode).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!(
                        "{} could not detail episode {} S{:02}E{:02}: {}",
                        detailer.name(),
                        episode.show_imdb_id,
                        episode.season,
                        episode.episode,
                        e
                    );
                    errors.push(e);
                }
            }
        }
        Err(errors)
    }

    /// Collect torrents from every torrenter.
    ///
    /// Fails only when no torrent was found and at least one module failed.
    pub async fn movie_torrents(&self, movie: &Movie) -> std::result::Result<Vec<Torrent>, ProviderErrors> {
        if self.torrenters.is_empty() {
            return Err(ProviderError::NoModule("torrenter").into());
        }

        let mut torrents = Vec::new();
        let mut errors = ProviderErrors::default();
        for torrenter in &self.torrenters {
            match torrenter.movie_torrents(movie).await {
                Ok(found) => torrents.extend(found),
                Err(e) => errors.push(e),
            }
        }

        if torrents.is_empty() && !errors.is_empty() {
            return Err(errors);
        }
        Ok(torrents)
    }

    /// Collect torrents from every torrenter.
    pub async fn episode_torrents(
        &self,
        episode: &ShowEpisode,
    ) -> std::result::Result<Vec<Torrent>, ProviderErrors> {
        if self.torrenters.is_empty() {
            return Err(ProviderError::NoModule("torrenter").into());
        }

        let mut torrents = Vec::new();
        let mut errors = ProviderErrors::default();
        for torrenter in &self.torrenters {
            match torrenter.episode_torrents(episode).await {
                Ok(found) => torrents.extend(found),
                Err(e) => errors.push(e),
            }
        }

        if torrents.is_empty() && !errors.is_empty() {
            return Err(errors);
        }
        Ok(torrents)
    }

    /// Notify every notifier. Having no notifier is not an error.
    pub async fn notify(&self, video: &Video) -> std::result::Result<(), ProviderErrors> {
        let mut errors = ProviderErrors::default();
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(video).await {
                tracing::warn!("{} failed to notify: {}", notifier.name(), e);
                errors.push(e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Named modules available to the configuration.
#[derive(Default)]
pub struct ModuleRegistry {
    detailers: HashMap<String, Arc<dyn Detailer>>,
    torrenters: HashMap<String, Arc<dyn Torrenter>>,
    notifiers: HashMap<String, Arc<dyn Notifier>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the modules shipped with the crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.notifiers.insert("log".to_string(), Arc::new(LogNotifier));
        registry
    }

    pub fn register_detailer(&mut self, module: Arc<dyn Detailer>) -> Result<()> {
        register(&mut self.detailers, "detailer", module.name().to_string(), module)
    }

    pub fn register_torrenter(&mut self, module: Arc<dyn Torrenter>) -> Result<()> {
        register(&mut self.torrenters, "torrenter", module.name().to_string(), module)
    }

    pub fn register_notifier(&mut self, module: Arc<dyn Notifier>) -> Result<()> {
        register(&mut self.notifiers, "notifier", module.name().to_string(), module)
    }

    /// Resolve the configured module names, keeping their order.
    pub fn resolve(&self, config: &ModulesConfig) -> Result<Providers> {
        Ok(Providers {
            detailers: lookup(&self.detailers, "detailer", &config.detailers)?,
            torrenters: lookup(&self.torrenters, "torrenter", &config.torrenters)?,
            notifiers: lookup(&self.notifiers, "notifier", &config.notifiers)?,
        })
    }
}

fn register<T: ?Sized>(
    modules: &mut HashMap<String, Arc<T>>,
    kind: &'static str,
    name: String,
    module: Arc<T>,
) -> Result<()> {
    if modules.contains_key(&name) {
        return Err(Error::ModuleAlreadyRegistered { kind, name });
    }
    tracing::debug!("Registered {} module {:?}", kind, name);
    modules.insert(name, module);
    Ok(())
}

fn lookup<T: ?Sized>(
    modules: &HashMap<String, Arc<T>>,
    kind: &'static str,
    names: &[String],
) -> Result<Vec<Arc<T>>> {
    names
        .iter()
        .map(|name| {
            modules.get(name).cloned().ok_or_else(|| Error::ModuleNotFound {
                kind,
                name: name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::Quality;

    struct Static {
        name: &'static str,
        fail: Option<fn() -> ProviderError>,
    }

    #[async_trait]
    impl Detailer for Static {
        fn name(&self) -> &str {
            self.name
        }

        async fn movie_details(&self, movie: &mut Movie) -> std::result::Result<(), ProviderError> {
            if let Some(fail) = self.fail {
                return Err(fail());
            }
            movie.title = format!("from {}", self.name);
            Ok(())
        }
    }

    /// Torrenter returning a fixed list, or an error when told to.
    struct Seeds {
        name: &'static str,
        found: Vec<Torrent>,
        fail: Option<fn() -> ProviderError>,
    }

    #[async_trait]
    impl Torrenter for Seeds {
        fn name(&self) -> &str {
            self.name
        }

        async fn movie_torrents(&self, _movie: &Movie) -> std::result::Result<Vec<Torrent>, ProviderError> {
            match self.fail {
                Some(fail) => Err(fail()),
                None => Ok(self.found.clone()),
            }
        }
    }

    fn torrent(quality: Quality, url: &str) -> Torrent {
        Torrent {
            quality,
            url: url.to_string(),
        }
    }

    fn not_found() -> ProviderError {
        ProviderError::NotFound { module: "a".to_string() }
    }

    fn fatal() -> ProviderError {
        ProviderError::Fatal {
            module: "a".to_string(),
            message: "banned".to_string(),
        }
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = ModuleRegistry::new();
        registry
            .register_detailer(Arc::new(Static { name: "tmdb", fail: None }))
            .unwrap();

        let err = registry
            .register_detailer(Arc::new(Static { name: "tmdb", fail: None }))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ModuleAlreadyRegistered { kind: "detailer", ref name } if name == "tmdb"
        ));
    }

    #[test]
    fn test_resolve_unknown_module() {
        let registry = ModuleRegistry::with_builtin();
        let config = ModulesConfig {
            notifiers: vec!["log".to_string(), "pushover".to_string()],
            ..Default::default()
        };

        assert!(matches!(
            registry.resolve(&config),
            Err(Error::ModuleNotFound { kind: "notifier", ref name }) if name == "pushover"
        ));
    }

    #[tokio::test]
    async fn test_first_successful_detailer_wins() {
        let providers = Providers::none()
            .with_detailer(Arc::new(Static { name: "a", fail: Some(not_found) }))
            .with_detailer(Arc::new(Static { name: "b", fail: None }))
            .with_detailer(Arc::new(Static { name: "c", fail: None }));

        let mut movie = Movie::new("tt001");
        providers.movie_details(&mut movie).await.unwrap();
        assert_eq!(movie.title, "from b");
    }

    #[tokio::test]
    async fn test_detail_errors_are_classified() {
        let mut movie = Movie::new("tt001");

        let err = Providers::none().movie_details(&mut movie).await.unwrap_err();
        assert!(!err.is_fatal());

        let providers = Providers::none()
            .with_detailer(Arc::new(Static { name: "a", fail: Some(not_found) }))
            .with_detailer(Arc::new(Static { name: "b", fail: Some(fatal) }));
        let err = providers.movie_details(&mut movie).await.unwrap_err();
        assert_eq!(err.0.len(), 2);
        assert!(err.is_fatal());

        // default trait method
        let mut show = Show::default();
        let err = providers.show_details(&mut show).await.unwrap_err();
        assert!(err.0.iter().all(|e| matches!(e, ProviderError::Unsupported)));
    }

    #[tokio::test]
    async fn test_notify_without_notifiers() {
        let video = Video::from(Movie::new("tt001"));
        assert!(Providers::none().notify(&video).await.is_ok());

        let providers = ModuleRegistry::with_builtin()
            .resolve(&ModulesConfig {
                notifiers: vec!["log".to_string()],
                ..Default::default()
            })
            .unwrap();
        assert!(providers.notify(&video).await.is_ok());
    }

    #[tokio::test]
    async fn test_torrents_are_collected_across_modules() {
        let providers = Providers::none()
            .with_torrenter(Arc::new(Seeds {
                name: "a",
                found: vec![torrent(Quality::Q720p, "magnet:a")],
                fail: None,
            }))
            .with_torrenter(Arc::new(Seeds {
                name: "b",
                found: Vec::new(),
                fail: Some(not_found),
            }))
            .with_torrenter(Arc::new(Seeds {
                name: "c",
                found: vec![torrent(Quality::Q1080p, "magnet:c")],
                fail: None,
            }));

        let torrents = providers.movie_torrents(&Movie::new("tt001")).await.unwrap();
        assert_eq!(
            torrents,
            vec![torrent(Quality::Q720p, "magnet:a"), torrent(Quality::Q1080p, "magnet:c")]
        );
    }

    #[tokio::test]
    async fn test_torrents_fail_only_when_nothing_found() {
        let movie = Movie::new("tt001");

        let err = Providers::none().movie_torrents(&movie).await.unwrap_err();
        assert!(matches!(err.0.as_slice(), [ProviderError::NoModule("torrenter")]));

        // an empty answer is not a failure
        let quiet = Providers::none().with_torrenter(Arc::new(Seeds {
            name: "a",
            found: Vec::new(),
            fail: None,
        }));
        assert!(quiet.movie_torrents(&movie).await.unwrap().is_empty());

        let failing = quiet.with_torrenter(Arc::new(Seeds {
            name: "b",
            found: Vec::new(),
            fail: Some(fatal),
        }));
        let err = failing.movie_torrents(&movie).await.unwrap_err();
        assert!(err.is_fatal());

        // default trait method
        let episode = ShowEpisode::default();
        let err = failing.episode_torrents(&episode).await.unwrap_err();
        assert!(err.0.iter().any(|e| matches!(e, ProviderError::Unsupported)));
    }

    #[tokio::test]
    async fn test_registered_torrenter_resolves() {
        let mut registry = ModuleRegistry::new();
        registry
            .register_torrenter(Arc::new(Seeds {
                name: "yts",
                found: vec![torrent(Quality::Q720p, "magnet:yts")],
                fail: None,
            }))
            .unwrap();

        let providers = registry
            .resolve(&ModulesConfig {
                torrenters: vec!["yts".to_string()],
                ..Default::default()
            })
            .unwrap();
        let torrents = providers.movie_torrents(&Movie::new("tt001")).await.unwrap();
        assert_eq!(torrents.len(), 1);
    }

    #[tokio::test]
    async fn test_episode_details_fall_through() {
        let providers = Providers::none()
            .with_detailer(Arc::new(Static { name: "a", fail: None }));

        let mut episode = ShowEpisode::default();
        let err = providers.episode_details(&mut episode).await.unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(err.0.len(), 1);
    }
}
