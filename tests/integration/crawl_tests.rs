//! Integration tests for the sweep pipeline
//!
//! These tests use wiremock to serve a small site with a sitemap hierarchy and
//! run the full walk-then-scrape cycle end-to-end over HTTP.

use seo_sweep::config::Config;
use seo_sweep::crawler::{run_sweep, Coordinator, PageResult};
use seo_sweep::output::write_results;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts and a fast rate limit
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.concurrency = 4;
    config.crawler.walk_budget_secs = 30;
    config.http.timeout_secs = 5;
    config.http.rate_limit_interval_ms = 1;
    config
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn sitemap_index(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

async fn mount_body(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts an index listing two sitemaps with three pages each
///
/// Returns the six page URLs.
async fn mount_two_level_site(server: &MockServer) -> Vec<String> {
    let base = server.uri();

    mount_body(
        server,
        "/sitemap_index.xml",
        200,
        sitemap_index(&[
            format!("{}/sitemap-posts.xml", base),
            format!("{}/sitemap-pages.xml", base),
        ]),
    )
    .await;

    let posts: Vec<String> = (1..=3).map(|i| format!("{}/posts/{}", base, i)).collect();
    let pages: Vec<String> = (1..=3).map(|i| format!("{}/pages/{}", base, i)).collect();

    mount_body(server, "/sitemap-posts.xml", 200, urlset(&posts)).await;
    mount_body(server, "/sitemap-pages.xml", 200, urlset(&pages)).await;

    for url in posts.iter().chain(pages.iter()) {
        let route = url.trim_start_matches(&base).to_string();
        mount_body(
            server,
            &route,
            200,
            format!(
                r#"<html><head><title>Title {route}</title><meta name="description" content="About {route}"></head><body><h1>Heading {route}</h1></body></html>"#
            ),
        )
        .await;
    }

    posts.into_iter().chain(pages).collect()
}

fn url_set(results: &[PageResult]) -> HashSet<String> {
    results.iter().map(|r| r.url.clone()).collect()
}

#[tokio::test]
async fn test_full_sweep_two_level_index() {
    let server = MockServer::start().await;
    let expected = mount_two_level_site(&server).await;

    let coordinator = Coordinator::new(create_test_config()).expect("Failed to create coordinator");
    let results = coordinator
        .run(&format!("{}/sitemap_index.xml", server.uri()))
        .await;

    assert_eq!(results.len(), 6, "Expected 6 results, got {:?}", results);
    assert!(results.iter().all(|r| r.status_code == 200));
    assert_eq!(url_set(&results), expected.into_iter().collect());
    assert!(results.iter().all(|r| r.title.is_empty()));
}

#[tokio::test]
async fn test_seo_sweep_extracts_metadata() {
    let server = MockServer::start().await;
    mount_two_level_site(&server).await;

    let mut config = create_test_config();
    config.output.seo = true;

    let results = run_sweep(config, &format!("{}/sitemap_index.xml", server.uri()))
        .await
        .expect("Sweep failed");

    assert_eq!(results.len(), 6);
    let post = results
        .iter()
        .find(|r| r.url.ends_with("/posts/2"))
        .expect("Missing /posts/2");
    assert_eq!(post.title, "Title /posts/2");
    assert_eq!(post.h1, "Heading /posts/2");
    assert_eq!(post.meta_description, "About /posts/2");
}

#[tokio::test]
async fn test_error_statuses_are_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_body(
        &server,
        "/sitemap.xml",
        200,
        urlset(&[
            format!("{}/ok", base),
            format!("{}/gone", base),
            format!("{}/broken", base),
        ]),
    )
    .await;
    mount_body(&server, "/ok", 200, "<html></html>".to_string()).await;
    mount_body(&server, "/broken", 500, "<html></html>".to_string()).await;
    // /gone is not mounted and answers 404

    let coordinator = Coordinator::new(create_test_config()).expect("Failed to create coordinator");
    let results = coordinator.run(&format!("{}/sitemap.xml", base)).await;

    assert_eq!(results.len(), 3);
    let status_of = |suffix: &str| {
        results
            .iter()
            .find(|r| r.url.ends_with(suffix))
            .map(|r| r.status_code)
    };
    assert_eq!(status_of("/ok"), Some(200));
    assert_eq!(status_of("/gone"), Some(404));
    assert_eq!(status_of("/broken"), Some(500));
}

#[tokio::test]
async fn test_cyclic_sitemaps_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/index.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_index(&[
            format!("{}/child.xml", base),
            format!("{}/child.xml", base),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/child.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[
            format!("{}/index.xml", base),
            format!("{}/leaf", base),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/leaf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config()).expect("Failed to create coordinator");
    let results = coordinator.run(&format!("{}/index.xml", base)).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, format!("{}/leaf", base));

    server.verify().await;
}

#[tokio::test]
async fn test_requests_respect_rate_limit() {
    let server = MockServer::start().await;
    mount_two_level_site(&server).await;

    let mut config = create_test_config();
    config.http.rate_limit_interval_ms = 50;

    let start = Instant::now();
    let results = run_sweep(config, &format!("{}/sitemap_index.xml", server.uri()))
        .await
        .expect("Sweep failed");

    // 1 index + 2 sitemaps + 6 pages = 9 admissions, 8 intervals apart
    assert_eq!(results.len(), 6);
    assert!(
        start.elapsed() >= Duration::from_millis(400),
        "Sweep finished in {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_walk_budget_returns_partial_results() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_body(
        &server,
        "/index.xml",
        200,
        urlset(&[format!("{}/slow.xml", base), format!("{}/fast", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(urlset(&[format!("{}/late", base)]))
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&server)
        .await;
    mount_body(&server, "/fast", 200, "<html></html>".to_string()).await;

    let mut config = create_test_config();
    config.crawler.walk_budget_secs = 1;

    let start = Instant::now();
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let results = coordinator.run(&format!("{}/index.xml", base)).await;

    assert!(start.elapsed() < Duration::from_secs(4));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, format!("{}/fast", base));
}

#[tokio::test]
async fn test_results_written_to_file() {
    let server = MockServer::start().await;
    mount_two_level_site(&server).await;

    let results = run_sweep(
        create_test_config(),
        &format!("{}/sitemap_index.xml", server.uri()),
    )
    .await
    .expect("Sweep failed");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("Scraped_Site.txt");
    let written = write_results(&output, &results, false).expect("Failed to write results");

    assert_eq!(written, 6);
    let content = std::fs::read_to_string(&output).expect("Failed to read results");
    assert_eq!(content.lines().count(), 6);
    assert!(content
        .lines()
        .all(|line| line.starts_with("URL: ") && line.ends_with(", Status Code: 200")));
}
