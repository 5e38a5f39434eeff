//! Sitemap discovery against mock websites

use crate::common::*;
use site_corpus::config::CrawlerConfig;
use wiremock::MockServer;

/// Paths the mock server was asked for, in order
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_urlset_keeps_same_origin_homepage_first() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/about", base),
            "https://elsewhere.example/page".to_string(),
            format!("{}/", base),
            format!("{}/pricing", base),
            format!("{}/about", base),
        ]),
    )
    .await;

    let targets = scraper(crawler_config()).discover(&base, 20).await;

    assert_eq!(
        targets,
        vec![
            root(&server),
            format!("{}/about", base),
            format!("{}/pricing", base),
        ]
    );
}

#[tokio::test]
async fn test_urlset_truncated_to_max_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    let locs: Vec<String> = (0..10).map(|i| format!("{}/p{}", base, i)).collect();
    mount_xml(&server, "/sitemap.xml", urlset(&locs)).await;

    let targets = scraper(crawler_config()).discover(&base, 3).await;

    assert_eq!(
        targets,
        vec![root(&server), format!("{}/p0", base), format!("{}/p1", base)]
    );
}

#[tokio::test]
async fn test_missing_sitemap_falls_back_to_homepage() {
    let server = MockServer::start().await;
    mount_status(&server, "/sitemap.xml", 404).await;

    let targets = scraper(crawler_config()).discover(&server.uri(), 20).await;

    assert_eq!(targets, vec![root(&server)]);
}

#[tokio::test]
async fn test_malformed_sitemap_falls_back_to_homepage() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_xml(
        &server,
        "/sitemap.xml",
        format!("<urlset><url><loc>{}/about</loc></url><url><loc>", base),
    )
    .await;

    let targets = scraper(crawler_config()).discover(&base, 20).await;

    assert_eq!(targets, vec![root(&server)]);
}

#[tokio::test]
async fn test_html_sitemap_falls_back_to_homepage() {
    let server = MockServer::start().await;
    mount_html(&server, "/sitemap.xml", short_page("Not a sitemap")).await;

    let targets = scraper(crawler_config()).discover(&server.uri(), 20).await;

    assert_eq!(targets, vec![root(&server)]);
}

#[tokio::test]
async fn test_unreachable_site_falls_back_to_homepage() {
    // Nothing listens on the discard port
    let targets = scraper(crawler_config())
        .discover("http://127.0.0.1:9", 20)
        .await;

    assert_eq!(targets, vec!["http://127.0.0.1:9/".to_string()]);
}

#[tokio::test]
async fn test_index_skips_failing_child() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap-pages.xml", base),
            format!("{}/sitemap-broken.xml", base),
            format!("{}/sitemap-posts.xml", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-pages.xml",
        urlset(&[format!("{}/about", base)]),
    )
    .await;
    mount_status(&server, "/sitemap-broken.xml", 500).await;
    mount_xml(
        &server,
        "/sitemap-posts.xml",
        urlset(&[format!("{}/blog/first", base)]),
    )
    .await;

    let targets = scraper(crawler_config()).discover(&base, 20).await;

    assert_eq!(
        targets,
        vec![
            root(&server),
            format!("{}/about", base),
            format!("{}/blog/first", base),
        ]
    );
}

#[tokio::test]
async fn test_index_visits_at_most_configured_children() {
    let server = MockServer::start().await;
    let base = server.uri();

    let children: Vec<String> = (1..=7)
        .map(|i| format!("{}/sitemap-{}.xml", base, i))
        .collect();
    mount_xml(&server, "/sitemap.xml", sitemap_index(&children)).await;
    for i in 1..=7 {
        mount_xml(
            &server,
            &format!("/sitemap-{}.xml", i),
            urlset(&[format!("{}/page-{}", base, i)]),
        )
        .await;
    }

    let targets = scraper(crawler_config()).discover(&base, 20).await;

    assert_eq!(targets.len(), 6);
    assert!(targets.contains(&format!("{}/page-5", base)));
    assert!(!targets.contains(&format!("{}/page-6", base)));

    let paths = requested_paths(&server).await;
    assert!(!paths.contains(&"/sitemap-6.xml".to_string()));
    assert!(!paths.contains(&"/sitemap-7.xml".to_string()));
}

#[tokio::test]
async fn test_index_stops_once_budget_is_met() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap-a.xml", base),
            format!("{}/sitemap-b.xml", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-a.xml",
        urlset(&[
            format!("{}/a1", base),
            format!("{}/a2", base),
            format!("{}/a3", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-b.xml",
        urlset(&[format!("{}/b1", base)]),
    )
    .await;

    let targets = scraper(crawler_config()).discover(&base, 3).await;

    assert_eq!(
        targets,
        vec![root(&server), format!("{}/a1", base), format!("{}/a2", base)]
    );
    assert!(!requested_paths(&server)
        .await
        .contains(&"/sitemap-b.xml".to_string()));
}

#[tokio::test]
async fn test_child_limit_is_configurable() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap-1.xml", base),
            format!("{}/sitemap-2.xml", base),
        ]),
    )
    .await;
    mount_xml(&server, "/sitemap-1.xml", urlset(&[format!("{}/one", base)])).await;
    mount_xml(&server, "/sitemap-2.xml", urlset(&[format!("{}/two", base)])).await;

    let config = CrawlerConfig {
        max_child_sitemaps: 1,
        ..crawler_config()
    };
    let targets = scraper(config).discover(&base, 20).await;

    assert_eq!(targets, vec![root(&server), format!("{}/one", base)]);
}
