//! Shared fixtures for the integration tests

use site_corpus::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use site_corpus::crawler::Fetcher;
use site_corpus::Scraper;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

/// Crawl settings with short timeouts
pub fn crawler_config() -> CrawlerConfig {
    CrawlerConfig {
        sitemap_timeout_secs: 2,
        page_timeout_secs: 2,
        ..CrawlerConfig::default()
    }
}

pub fn test_config(db_path: &str) -> Config {
    Config {
        crawler: crawler_config(),
        user_agent: user_agent(),
        output: OutputConfig {
            database_path: db_path.to_string(),
        },
        summarizer: None,
    }
}

pub fn scraper(config: CrawlerConfig) -> Scraper {
    Scraper::new(
        Fetcher::from_config(&user_agent()).expect("Failed to build client"),
        config,
    )
}

/// An HTML page whose main content is `paragraphs` copies of a long sentence
pub fn article_page(title: &str, paragraphs: usize) -> String {
    let body: String = (0..paragraphs)
        .map(|i| {
            format!(
                "<p>Paragraph {} explains what {} offers, how it works, and why customers come back.</p>\n",
                i, title
            )
        })
        .collect();

    format!(
        r#"<html><head><title>{title}</title></head><body>
        <nav><a href="/">Home</a> <a href="/about">About</a></nav>
        <main><h1>{title}</h1>
        {body}</main>
        <footer>Copyright footer text</footer>
        </body></html>"#,
        title = title,
        body = body
    )
}

/// A page with almost no text
pub fn short_page(title: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><main><p>Coming soon.</p></main></body></html>",
        title
    )
}

pub fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("  <url><loc>{}</loc></url>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>",
        entries
    )
}

pub fn sitemap_index(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("  <sitemap><loc>{}</loc></sitemap>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</sitemapindex>",
        entries
    )
}

/// Mounts a GET responder returning `body` with the given content type
pub async fn mount_body(server: &MockServer, route: &str, content_type: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", content_type),
        )
        .mount(server)
        .await;
}

pub async fn mount_html(server: &MockServer, route: &str, body: String) {
    mount_body(server, route, "text/html; charset=utf-8", body).await;
}

pub async fn mount_xml(server: &MockServer, route: &str, body: String) {
    mount_body(server, route, "application/xml", body).await;
}

pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Root URL of a mock server in normalized form
pub fn root(server: &MockServer) -> String {
    format!("{}/", server.uri())
}
