//! End-to-end crawls of mock websites

use crate::common::*;
use site_corpus::config::CrawlerConfig;
use site_corpus::crawler::crawl;
use site_corpus::CorpusError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_crawl_keeps_readable_page_and_skips_unreachable() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[format!("{}/", base), format!("{}/gone", base)]),
    )
    .await;
    mount_html(&server, "/", article_page("Acme Bakery", 6)).await;
    mount_status(&server, "/gone", 404).await;

    let report = scraper(crawler_config()).run(&base, 20).await;

    assert_eq!(report.targets, vec![root(&server), format!("{}/gone", base)]);
    assert_eq!(report.pages.len(), 1);

    let page = &report.pages[0];
    assert_eq!(page.url, root(&server));
    assert_eq!(page.title.as_deref(), Some("Acme Bakery"));
    assert!(page.text_chars() >= 200);
    assert!(page.text.contains("Paragraph 0 explains what Acme Bakery offers"));
    assert!(!page.text.contains("Copyright footer text"));
}

#[tokio::test]
async fn test_crawl_without_sitemap_scrapes_homepage() {
    let server = MockServer::start().await;
    mount_html(&server, "/", article_page("Corner Shop", 5)).await;

    let report = scraper(crawler_config()).run(&server.uri(), 20).await;

    assert_eq!(report.targets, vec![root(&server)]);
    assert_eq!(report.pages.len(), 1);
}

#[tokio::test]
async fn test_crawl_of_short_pages_yields_no_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[format!("{}/contact", base)]),
    )
    .await;
    mount_html(&server, "/", short_page("Home")).await;
    mount_html(&server, "/contact", short_page("Contact")).await;

    let report = scraper(crawler_config()).run(&base, 20).await;

    assert_eq!(report.targets.len(), 2);
    assert!(report.pages.is_empty());
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_run_checked_reports_empty_crawl() {
    let server = MockServer::start().await;
    mount_html(&server, "/", short_page("Home")).await;

    let result = scraper(crawler_config())
        .run_checked(&server.uri(), 20)
        .await;

    match result {
        Err(CorpusError::NoPagesScraped { targets }) => {
            assert_eq!(targets, vec![root(&server)]);
        }
        other => panic!("expected NoPagesScraped, got {:?}", other),
    }
}

#[tokio::test]
async fn test_repeated_crawls_are_identical() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[format!("{}/about", base), format!("{}/services", base)]),
    )
    .await;
    mount_html(&server, "/", article_page("Home", 4)).await;
    mount_html(&server, "/about", article_page("About", 4)).await;
    mount_html(&server, "/services", short_page("Services")).await;

    let scraper = scraper(crawler_config());
    let first = scraper.run(&base, 20).await;
    let second = scraper.run(&base, 20).await;

    assert_eq!(first, second);
    assert_eq!(first.pages.len(), 2);
}

#[tokio::test]
async fn test_concurrent_crawl_preserves_target_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    let locs: Vec<String> = (1..=4).map(|i| format!("{}/page-{}", base, i)).collect();
    mount_xml(&server, "/sitemap.xml", urlset(&locs)).await;
    mount_html(&server, "/", article_page("Home", 4)).await;

    // Earlier pages answer more slowly
    for i in 1..=4u64 {
        Mock::given(method("GET"))
            .and(path(format!("/page-{}", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(article_page(&format!("Page {}", i), 4))
                    .insert_header("content-type", "text/html")
                    .set_delay(Duration::from_millis(400 - i * 80)),
            )
            .mount(&server)
            .await;
    }

    let config = CrawlerConfig {
        concurrency: 4,
        ..crawler_config()
    };
    let report = scraper(config).run(&base, 20).await;

    let urls: Vec<&str> = report.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(urls, report.targets.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(report.pages.len(), 5);
}

#[tokio::test]
async fn test_slow_page_times_out_and_is_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(&server, "/sitemap.xml", urlset(&[format!("{}/slow", base)])).await;
    mount_html(&server, "/", article_page("Home", 4)).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_page("Slow", 4))
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        page_timeout_secs: 1,
        ..crawler_config()
    };
    let report = scraper(config).run(&base, 20).await;

    assert_eq!(report.targets.len(), 2);
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].url, root(&server));
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(&server, "/sitemap.xml", urlset(&[format!("{}/old", base)])).await;
    mount_html(&server, "/", short_page("Home")).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", base).as_str()),
        )
        .mount(&server)
        .await;
    mount_html(&server, "/new", article_page("Moved", 4)).await;

    let report = scraper(crawler_config()).run(&base, 20).await;

    assert_eq!(report.pages.len(), 1);
    // Pages keep the URL they were discovered under
    assert_eq!(report.pages[0].url, format!("{}/old", base));
    assert_eq!(report.pages[0].title.as_deref(), Some("Moved"));
}

#[tokio::test]
async fn test_crawl_from_config() {
    let server = MockServer::start().await;
    mount_html(&server, "/", article_page("Configured", 4)).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("corpus.db");
    let config = test_config(db_path.to_str().unwrap());

    let report = crawl(&config, &server.uri()).await.unwrap();

    assert_eq!(report.targets, vec![root(&server)]);
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].title.as_deref(), Some("Configured"));
}
