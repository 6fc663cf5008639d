//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and run full
//! harvests end-to-end into temporary output directories.

use page_harvester::config::{CrawlConfig, CrawlSettings};
use page_harvester::crawler::{harvest, CrawlEngine, HttpFetcher, RoundRobinSelector};
use page_harvester::state::PageState;
use page_harvester::storage::PageMetadataRecord;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `output` with no politeness delay
fn create_test_config(base_url: &str, output: &Path) -> CrawlSettings {
    let mut settings = CrawlSettings::new(base_url);
    settings.crawl.delay_seconds = 0.0;
    settings.crawl.request_timeout_seconds = 5.0;
    settings.output.directory = output.display().to_string();
    settings.user_agent.pool = vec!["HarvestTest/1.0".to_string()];
    settings
}

fn engine_for(settings: CrawlSettings) -> CrawlEngine<HttpFetcher> {
    let config = CrawlConfig::from_settings(settings).expect("Invalid test config");
    let fetcher = HttpFetcher::with_selector(&config, Box::new(RoundRobinSelector::new()))
        .expect("Failed to build fetcher");
    CrawlEngine::with_fetcher(config, fetcher)
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn read_metadata(output: &Path) -> BTreeMap<String, PageMetadataRecord> {
    let raw = std::fs::read_to_string(output.join("metadata.json"))
        .expect("metadata.json was not written");
    serde_json::from_str(&raw).expect("metadata.json is not valid")
}

#[tokio::test]
async fn test_full_harvest_mirrors_site() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><head><title>Home</title><link rel="stylesheet" href="/static/site.css"></head><body>
            <a href="/about">About</a>
            <a href="{}/blog/first-post">First</a>
            <a href="docs/">Docs</a>
            </body></html>"#,
            base
        ),
    )
    .await;
    mount_html(&server, "/about", "<html><body>About us</body></html>".into()).await;
    mount_html(
        &server,
        "/blog/first-post",
        r#"<html><body><a href="../about">back</a></body></html>"#.into(),
    )
    .await;
    mount_html(&server, "/docs/", "<html><body>Docs index</body></html>".into()).await;
    Mock::given(method("GET"))
        .and(path("/static/site.css"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("body { color: black; }")
                .insert_header("content-type", "text/css"),
        )
        .mount(&server)
        .await;

    let mut engine = engine_for(create_test_config(&format!("{}/", base), output.path()));
    let report = engine.run().await.expect("Harvest failed");

    assert_eq!(report.downloaded, 5, "failures: {:?}", report.failures);
    assert_eq!(report.failed(), 0);

    let root = output.path();
    assert!(root.join("index.html").is_file());
    assert!(root.join("about.html").is_file());
    assert!(root.join("blog").join("first-post.html").is_file());
    assert!(root.join("docs").join("index.html").is_file());
    assert!(root.join("static").join("site.css").is_file());

    let about = std::fs::read_to_string(root.join("about.html")).unwrap();
    assert!(about.contains("About us"));

    let metadata = read_metadata(root);
    assert_eq!(metadata.len(), 5);

    let record = metadata
        .get(&format!("{}/about", base))
        .expect("missing record for /about");
    assert_eq!(record.original_url, format!("{}/about", base));
    assert_eq!(record.status_code, 200);
    assert_eq!(record.content_type, "text/html; charset=utf-8");
    assert_eq!(
        Path::new(&record.local_path),
        root.join("about.html").as_path()
    );

    let css = metadata
        .get(&format!("{}/static/site.css", base))
        .expect("missing record for stylesheet");
    assert_eq!(css.content_type, "text/css");
}

#[tokio::test]
async fn test_off_domain_links_never_fetched() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // Same host, different port: a different network location
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("external"))
        .expect(0)
        .mount(&other)
        .await;

    mount_html(
        &server,
        "/",
        format!(
            r#"<a href="{}/external">elsewhere</a><a href="https://example.org/">far away</a><a href="/local">local</a>"#,
            other.uri()
        ),
    )
    .await;
    mount_html(&server, "/local", "<p>local page</p>".into()).await;

    let mut engine = engine_for(create_test_config(&server.uri(), output.path()));
    let report = engine.run().await.expect("Harvest failed");

    assert_eq!(report.downloaded, 2);
    assert_eq!(report.visited, 2);
    assert!(!engine
        .state()
        .is_visited(&format!("{}/external", other.uri())));
}

#[tokio::test]
async fn test_self_links_download_once() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r##"<a href="#">top</a><a href="/">home</a><a href="./">here</a><a href="/loop">loop</a>"##,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<a href="/loop">again</a><a href="/">home</a>"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine_for(create_test_config(&server.uri(), output.path()));
    let report = engine.run().await.expect("Harvest failed");

    assert_eq!(report.downloaded, 2);
    assert_eq!(report.failed(), 0);
}

#[tokio::test]
async fn test_timeout_recorded_and_not_descended() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/",
        r#"<a href="/broken">broken</a><a href="/fine">fine</a>"#.into(),
    )
    .await;
    mount_html(&server, "/fine", "<p>fine</p>".into()).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/hidden">hidden</a>"#)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hidden"))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = create_test_config(&server.uri(), output.path());
    settings.crawl.request_timeout_seconds = 0.3;
    let mut engine = engine_for(settings);
    let report = engine.run().await.expect("Harvest failed");

    let broken = format!("{}/broken", server.uri());
    let reason = report.failures.get(&broken).expect("timeout not recorded");
    assert!(reason.contains("timed out"), "unexpected reason: {}", reason);
    assert_eq!(engine.state().state_of(&broken), PageState::Failed);

    assert_eq!(report.downloaded, 2);
    assert!(!output.path().join("broken.html").exists());
    assert!(!read_metadata(output.path()).contains_key(&broken));
}

#[tokio::test]
async fn test_error_status_recorded_as_failure() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_html(&server, "/", r#"<a href="/missing">gone</a>"#.into()).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine_for(create_test_config(&server.uri(), output.path()));
    let report = engine.run().await.expect("Harvest failed");

    let missing = format!("{}/missing", server.uri());
    assert_eq!(report.downloaded, 1);
    assert_eq!(report.failed(), 1);
    assert!(report.failures[&missing].contains("404"));
}

#[tokio::test]
async fn test_flat_mode_uses_hashed_names() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_html(&server, "/", r#"<a href="/deep/nested/page">deep</a>"#.into()).await;
    mount_html(&server, "/deep/nested/page", "<p>deep</p>".into()).await;

    let mut settings = create_test_config(&server.uri(), output.path());
    settings.crawl.preserve_structure = false;
    let mut engine = engine_for(settings);
    let report = engine.run().await.expect("Harvest failed");
    assert_eq!(report.downloaded, 2);

    let deep_url = format!("{}/deep/nested/page", server.uri());
    let expected = format!("{}.html", &hex::encode(Sha256::digest(deep_url.as_bytes()))[..16]);
    assert!(output.path().join(&expected).is_file());
    assert!(!output.path().join("deep").exists());

    let metadata = read_metadata(output.path());
    assert_eq!(
        Path::new(&metadata[&deep_url].local_path),
        output.path().join(&expected).as_path()
    );
}

#[tokio::test]
async fn test_base_path_is_stripped() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/docs/",
        r#"<a href="guide">guide</a><a href="/about">about</a>"#.into(),
    )
    .await;
    mount_html(&server, "/docs/guide", "<p>guide</p>".into()).await;
    mount_html(&server, "/about", "<p>about</p>".into()).await;

    let mut engine = engine_for(create_test_config(
        &format!("{}/docs/", server.uri()),
        output.path(),
    ));
    engine.run().await.expect("Harvest failed");

    assert!(output.path().join("index.html").is_file());
    assert!(output.path().join("guide.html").is_file());
    assert!(output.path().join("about.html").is_file());
}

#[tokio::test]
async fn test_metadata_and_failures_partition_visited_set() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/",
        r#"<a href="/a">a</a><a href="/b">b</a><a href="/err">err</a>"#.into(),
    )
    .await;
    mount_html(&server, "/a", r#"<a href="/b">b</a><a href="/">home</a>"#.into()).await;
    mount_html(&server, "/b", "<p>b</p>".into()).await;
    Mock::given(method("GET"))
        .and(path("/err"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut engine = engine_for(create_test_config(&server.uri(), output.path()));
    let report = engine.run().await.expect("Harvest failed");

    let metadata = read_metadata(output.path());
    let mut covered: Vec<&String> = metadata.keys().chain(report.failures.keys()).collect();
    covered.sort();
    covered.dedup();

    let mut visited: Vec<&str> = engine.state().visited_urls().collect();
    visited.sort();

    assert_eq!(covered.len(), metadata.len() + report.failures.len());
    assert_eq!(
        covered.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        visited
    );

    for record in metadata.values() {
        assert!(Path::new(&record.local_path).is_file());
    }
}

#[tokio::test]
async fn test_politeness_delay_applied() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_html(&server, "/", r#"<a href="/next">next</a>"#.into()).await;
    mount_html(&server, "/next", "<p>next</p>".into()).await;

    let mut settings = create_test_config(&server.uri(), output.path());
    settings.crawl.delay_seconds = 0.2;
    let mut engine = engine_for(settings);

    let started = std::time::Instant::now();
    let report = engine.run().await.expect("Harvest failed");

    assert_eq!(report.downloaded, 2);
    assert!(started.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_harvest_entry_point() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_html(&server, "/", r#"<a href="/page">page</a>"#.into()).await;
    mount_html(&server, "/page", "<p>page</p>".into()).await;

    let config = CrawlConfig::from_settings(create_test_config(&server.uri(), output.path()))
        .expect("Invalid test config");
    let report = harvest(config).await.expect("Harvest failed");

    assert_eq!(report.downloaded, 2);
    assert!(output.path().join("page.html").is_file());
    assert_eq!(read_metadata(output.path()).len(), 2);
}
