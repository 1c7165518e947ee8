//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use resource_crawler::config::{Config, CrawlerConfig, OutputConfig};
use resource_crawler::crawler::Coordinator;
use resource_crawler::mime::MimeTaxonomy;
use resource_crawler::output::{CsvSink, MemorySink};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server
fn create_test_config(base_url: &str, content_types: &[&str], crawler: CrawlerConfig) -> Config {
    Config {
        start_urls: vec![base_url.to_string()],
        content_types: content_types.iter().map(|s| s.to_string()).collect(),
        crawler: CrawlerConfig {
            request_timeout: 5,
            ..crawler
        },
        output: OutputConfig {
            csv_path: "unused.csv".to_string(),
        },
        ..Config::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

fn pdf() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf")
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn coordinator(config: &Config) -> Coordinator {
    Coordinator::new(config, Arc::new(MimeTaxonomy::standard())).expect("coordinator")
}

#[tokio::test]
async fn test_head_probe_reports_size_to_csv() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/",
        html(r#"<a href="/files/report">Report</a><a href="/about">About</a>"#),
    )
    .await;
    mount_get(&mock_server, "/about", html("No links here")).await;
    mount_get(&mock_server, "/files/report", pdf()).await;

    Mock::given(method("HEAD"))
        .and(path("/files/report"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", "2048")
                .set_body_raw(vec![0u8; 2048], "application/pdf"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&mock_server)
        .await;

    let crawler = CrawlerConfig {
        optimize: false,
        ..CrawlerConfig::default()
    };
    let config = create_test_config(&base_url, &[".pdf"], crawler);

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("resources.csv");
    let mut sink = CsvSink::create(&csv_path).unwrap();

    let summary = coordinator(&config).run(&mut sink).await.unwrap();
    assert_eq!(summary.resources_found, 1);
    assert_eq!(summary.total_bytes, 2048);
    assert_eq!(summary.pages_failed, 0);

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "url,mimetype,size,referrer");
    assert_eq!(
        lines[1],
        format!(
            "{}/files/report,application/pdf,2.00KB,{}/",
            base_url, base_url
        )
    );
}

#[tokio::test]
async fn test_external_links_reported_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/",
        html(
            r#"<a href="http://other.invalid/doc.pdf">External doc</a>
               <a href="http://other.invalid/page.html">External page</a>
               <a href="/local">Local</a>"#,
        ),
    )
    .await;
    mount_get(&mock_server, "/local", html(r#"<a href="/local.pdf">PDF</a>"#)).await;
    mount_get(&mock_server, "/local.pdf", pdf()).await;

    let config = create_test_config(&base_url, &["pdf"], CrawlerConfig::default());
    let mut sink = MemorySink::new();
    let summary = coordinator(&config).run(&mut sink).await.unwrap();

    assert_eq!(
        sink.urls(),
        vec![
            "http://other.invalid/doc.pdf".to_string(),
            format!("{}/local.pdf", base_url)
        ]
    );
    assert_eq!(sink.records[0].referrer, format!("{}/", base_url));
    assert_eq!(sink.records[1].referrer, format!("{}/local", base_url));

    // A followed external link would have failed to fetch
    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.pages_parsed, 3);
}

#[tokio::test]
async fn test_sitemap_pages_crawled() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(&mock_server, "/", html("Nothing linked")).await;
    mount_get(
        &mock_server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
                <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                    <url><loc>{}/</loc></url>
                    <url><loc>{}/hidden</loc></url>
                </urlset>"#,
                base_url, base_url
            ),
            "application/xml",
        ),
    )
    .await;
    mount_get(&mock_server, "/hidden", html(r#"<a href="/hidden.pdf">PDF</a>"#)).await;
    mount_get(&mock_server, "/hidden.pdf", pdf()).await;

    let crawler = CrawlerConfig {
        include_sitemap: true,
        ..CrawlerConfig::default()
    };
    let config = create_test_config(&base_url, &["application/pdf"], crawler);
    let mut sink = MemorySink::new();
    let summary = coordinator(&config).run(&mut sink).await.unwrap();

    assert_eq!(sink.urls(), vec![format!("{}/hidden.pdf", base_url)]);
    assert_eq!(sink.records[0].referrer, format!("{}/hidden", base_url));
    assert_eq!(summary.pages_failed, 0);
}

#[tokio::test]
async fn test_no_follow_only_inspects_start_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/",
        html(r#"<a href="/next">Next</a><img src="/logo.png"><a href="/a.pdf">A</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html(r#"<a href="/b.pdf">B</a>"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = CrawlerConfig {
        follow: false,
        ..CrawlerConfig::default()
    };
    let config = create_test_config(&base_url, &["image", ".pdf"], crawler);
    let mut sink = MemorySink::new();
    let summary = coordinator(&config).run(&mut sink).await.unwrap();

    assert_eq!(
        sink.urls(),
        vec![
            format!("{}/logo.png", base_url),
            format!("{}/a.pdf", base_url)
        ]
    );
    assert_eq!(sink.records[0].mimetype, "image/png");
    assert_eq!(summary.pages_parsed, 1);
}

#[tokio::test]
async fn test_resource_reported_once_across_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/",
        html(r#"<a href="/one">One</a><a href="/two">Two</a><a href="/shared.pdf">S</a>"#),
    )
    .await;
    mount_get(&mock_server, "/one", html(r#"<a href="/shared.pdf">S</a>"#)).await;
    mount_get(
        &mock_server,
        "/two",
        html(r#"<a href="shared.pdf">S</a><a href="/one">back</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/shared.pdf"))
        .respond_with(pdf())
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &[".pdf"], CrawlerConfig::default());
    let mut sink = MemorySink::new();
    let summary = coordinator(&config).run(&mut sink).await.unwrap();

    assert_eq!(sink.urls(), vec![format!("{}/shared.pdf", base_url)]);
    assert_eq!(summary.resources_found, 1);
    assert_eq!(summary.pages_parsed, 4);
    assert!(sink.finished);
}
