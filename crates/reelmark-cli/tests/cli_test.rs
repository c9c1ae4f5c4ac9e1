#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::{PredicateBooleanExt, predicate};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a command with a clean environment rooted at `dir`.
fn reelmark(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("reelmark");
    cmd.env("RUST_LOG", "info")
        .env_remove("TMDB_API_TOKEN")
        .env_remove("TMDB_API_KEY")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .arg("--dir")
        .arg(dir);
    cmd
}

/// Points the config in `dir` at the mock server.
fn write_config(dir: &Path, server: &MockServer) {
    let config = format!("[tmdb]\nbase_url = \"{}/3/\"\n", server.uri());
    std::fs::write(dir.join("config.toml"), config).unwrap();
}

async fn mount_json(server: &MockServer, url_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_fight_club(server: &MockServer) {
    mount_json(
        server,
        "/3/movie/550",
        include_str!("../../../fixtures/tmdb/movie_details_550.json"),
    )
    .await;
    mount_json(
        server,
        "/3/movie/550/videos",
        include_str!("../../../fixtures/tmdb/movie_videos_550.json"),
    )
    .await;
}

#[test]
fn test_help_lists_commands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelmark");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watchlist"))
        .stdout(predicate::str::contains("top-rated"));
}

#[test]
fn test_missing_credentials() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    reelmark(dir.path())
        .arg("trending")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "TMDB_API_TOKEN or TMDB_API_KEY environment variable is required",
        ));
}

#[test]
fn test_details_requires_media() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    reelmark(dir.path())
        .args(["details", "--id", "550"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--media"));
}

#[test]
fn test_config_init_and_show() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    reelmark(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    // Assert
    assert!(dir.path().join("config.toml").exists());
    reelmark(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debounce_ms = 500"))
        .stdout(predicate::str::contains("items_to_fetch = 180"));
}

#[test]
fn test_invalid_config_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[genres]\ngrid_size = -1\n").unwrap();

    // Act & Assert
    reelmark(dir.path())
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn test_empty_watchlist() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    reelmark(dir.path())
        .args(["watchlist", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Watch list is empty"));
    reelmark(dir.path())
        .args(["watchlist", "contains", "--id", "550", "--media", "movie"])
        .assert()
        .success()
        .stdout(predicate::str::contains("movie/550: no"));
    assert!(dir.path().join("reelmark.db").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_without_fetch() {
    // Arrange
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);

    // Act & Assert
    reelmark(dir.path())
        .env("TMDB_API_KEY", "test-key")
        .args(["search", "--query", " a "])
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"));
    reelmark(dir.path())
        .env("TMDB_API_KEY", "test-key")
        .args(["search", "--query", "dune", "--limit", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_prints_capped_results() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/multi"))
        .and(query_param("query", "dune"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/tmdb/search_multi.json"
        )))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);

    // Act & Assert
    reelmark(dir.path())
        .env("TMDB_API_KEY", "test-key")
        .args(["search", "--query", "  dune ", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("movie/438631"))
        .stdout(predicate::str::contains("tv/90228").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_trending_filters_by_media() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/trending/all/day"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/tmdb/trending_all_day.json"
        )))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);

    // Act & Assert
    reelmark(dir.path())
        .env("TMDB_API_KEY", "test-key")
        .args(["trending", "--media", "tv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tv/100088"))
        .stdout(predicate::str::contains("The Last of Us"))
        .stdout(predicate::str::contains("Dune").not())
        .stdout(predicate::str::contains("Total: 1 items"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_details_prints_trailer_and_money() {
    // Arrange
    let server = MockServer::start().await;
    mount_fight_club(&server).await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);

    // Act & Assert
    reelmark(dir.path())
        .env("TMDB_API_TOKEN", "test-token")
        .args(["details", "--id", "550", "--media", "movie"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fight Club (1999)"))
        .stdout(predicate::str::contains("Runtime: 2h 19m"))
        .stdout(predicate::str::contains("Budget: $63,000,000"))
        .stdout(predicate::str::contains(
            "Trailer: https://www.youtube.com/watch?v=O-b2VfmmbyA",
        ))
        .stdout(predicate::str::contains(
            "https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_details_http_error_fails() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"status_code":34,"status_message":"The resource you requested could not be found.","success":false}"#,
        ))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);

    // Act & Assert
    reelmark(dir.path())
        .env("TMDB_API_KEY", "test-key")
        .args(["details", "--id", "1", "--media", "tv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("details for tv/1 are unavailable"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watchlist_add_list_remove() {
    // Arrange
    let server = MockServer::start().await;
    mount_fight_club(&server).await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);

    // Act & Assert
    reelmark(dir.path())
        .env("TMDB_API_KEY", "test-key")
        .args(["watchlist", "add", "--id", "550", "--media", "movie"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added to your watch list: Fight Club"));

    reelmark(dir.path())
        .env("TMDB_API_KEY", "test-key")
        .args(["watchlist", "add", "--id", "550", "--media", "movie"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already in your watch list"));

    reelmark(dir.path())
        .args(["watchlist", "contains", "--id", "550", "--media", "tv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tv/550: no"));

    reelmark(dir.path())
        .args(["watchlist", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("movie/550"))
        .stdout(predicate::str::contains("Total: 1 items"));

    reelmark(dir.path())
        .args(["watchlist", "remove", "--id", "550", "--media", "movie"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed from your watch list"));

    reelmark(dir.path())
        .args(["watchlist", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Watch list is empty"));
}
