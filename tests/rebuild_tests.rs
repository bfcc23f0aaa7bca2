//! Integration tests for index rebuild and verification.

mod common;

use common::{episode, movie, TestLibrary};
use media_library::models::config::LibraryConfig;
use media_library::Error;
use std::fs;

async fn populated() -> TestLibrary {
    let t = TestLibrary::new();

    let mut foo = movie("tt001", "Foo", 2020, &t.incoming("foo.mkv"));
    t.library.add_movie(&mut foo).await.unwrap();
    let mut bar = movie("tt002", "Bar", 1999, &t.incoming("bar.mp4"));
    t.library.add_movie(&mut bar).await.unwrap();

    for (season, number) in [(1, 1), (1, 2), (2, 1)] {
        let name = format!("s{:02}e{:02}.mkv", season, number);
        let mut ep = episode(season, number, &t.incoming(&name));
        t.library.add_show_episode(&mut ep).await.unwrap();
    }

    t
}

#[tokio::test]
async fn test_rebuild_restores_index() {
    let t = populated().await;
    let library = t.reopen();
    assert!(library.movie_ids().is_empty());

    let stats = library.rebuild_index().await.unwrap();

    assert_eq!(stats.movies.indexed, 2);
    assert_eq!(stats.shows.indexed, 3);
    assert_eq!(library.movie_ids(), t.library.movie_ids());
    assert_eq!(library.show_ids(), t.library.show_ids());
    assert_eq!(library.movies(), t.library.movies());
    assert_eq!(library.get_show("tt100").unwrap().title, "The Wire");
}

#[tokio::test]
async fn test_rebuild_is_idempotent() {
    let t = populated().await;

    t.library.rebuild_index().await.unwrap();
    let movies = t.library.movies();
    let shows = t.library.shows();

    t.library.rebuild_index().await.unwrap();
    assert_eq!(t.library.movies(), movies);
    assert_eq!(t.library.shows(), shows);
}

#[tokio::test]
async fn test_rebuild_drops_removed_files() {
    let t = populated().await;
    fs::remove_dir_all(t.movie_root().join("Bar (1999)")).unwrap();

    t.library.rebuild_index().await.unwrap();

    assert_eq!(t.library.movie_ids(), vec!["tt001"]);
}

#[tokio::test]
async fn test_rebuild_skips_corrupt_sidecars() {
    let t = populated().await;
    fs::write(t.movie_root().join("Foo (2020)").join("foo.nfo"), "<movie><year>abc</year>").unwrap();
    fs::write(
        t.show_root().join("The Wire").join("Season 1").join("s01e02.nfo"),
        "<episodedetails><library><quality>4K</quality></library></episodedetails>",
    )
    .unwrap();

    let stats = t.library.rebuild_index().await.unwrap();

    assert_eq!(stats.movies.skipped, 1);
    assert_eq!(stats.shows.skipped, 1);
    assert_eq!(t.library.movie_ids(), vec!["tt002"]);
    assert!(t.library.has_show_episode("tt100", 1, 1));
    assert!(!t.library.has_show_episode("tt100", 1, 2));
}

#[tokio::test]
async fn test_rebuild_skips_show_without_sidecar() {
    let t = populated().await;
    let stray = t.show_root().join("Stray").join("Season 1");
    fs::create_dir_all(&stray).unwrap();
    fs::write(stray.join("s01e01.mkv"), b"video").unwrap();

    let stats = t.library.rebuild_index().await.unwrap();

    assert_eq!(stats.shows.indexed, 3);
    assert_eq!(stats.shows.skipped, 1);
    assert_eq!(t.library.show_ids().len(), 1);
}

#[tokio::test]
async fn test_rebuild_missing_root_fails() {
    let t = TestLibrary::new();
    let config = LibraryConfig::new(
        t.dir.path().join("missing-movies"),
        t.show_root(),
    );
    let library = media_library::core::Library::new(
        config,
        media_library::services::providers::Providers::none(),
        t.images.clone(),
    );

    let err = library.rebuild_index().await.unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[tokio::test]
async fn test_verify_index_reports_missing_files() {
    let t = populated().await;
    assert!(t.library.verify_index().is_empty());

    fs::remove_file(t.movie_root().join("Foo (2020)").join("foo.mkv")).unwrap();
    fs::remove_file(t.show_root().join("The Wire").join("Season 2").join("s02e01.mkv")).unwrap();

    let report = t.library.verify_index();
    assert_eq!(report.missing_movies, vec!["tt001".to_string()]);
    assert_eq!(report.missing_episodes, vec![("tt100".to_string(), 2, 1)]);
    assert!(report.misplaced_movies.is_empty());

    t.library.rebuild_index().await.unwrap();
    assert!(t.library.verify_index().is_empty());
    assert!(!t.library.has_show_episode("tt100", 2, 1));
}

#[tokio::test]
async fn test_verify_index_reports_misplaced_files() {
    let t = populated().await;

    // movie moved by hand into another folder, episode into the wrong season
    fs::rename(t.movie_root().join("Bar (1999)"), t.movie_root().join("Bar")).unwrap();
    let show_dir = t.show_root().join("The Wire");
    for name in ["s01e02.mkv", "s01e02.nfo"] {
        fs::rename(show_dir.join("Season 1").join(name), show_dir.join("Season 2").join(name)).unwrap();
    }

    t.library.rebuild_index().await.unwrap();
    assert!(t.library.has_movie("tt002"));
    assert!(t.library.has_show_episode("tt100", 1, 2));

    let report = t.library.verify_index();
    assert!(report.missing_movies.is_empty());
    assert!(report.missing_episodes.is_empty());
    assert_eq!(report.misplaced_movies, vec!["tt002".to_string()]);
    assert_eq!(report.misplaced_episodes, vec![("tt100".to_string(), 1, 2)]);
    assert_eq!(report.len(), 2);
}
