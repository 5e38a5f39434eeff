//! Ingest pipeline: crawl, store and summarize

use crate::common::*;
use async_trait::async_trait;
use site_corpus::config::SummarizerConfig;
use site_corpus::ingest::{ingest_website, IngestRequest, SUMMARY_TITLE};
use site_corpus::storage::{open_storage, DocumentStore, RunStatus, SqliteStorage};
use site_corpus::summarize::{
    HttpSummarizer, SummarizeError, Summarizer, Summary, SummaryRequest,
};
use site_corpus::CorpusError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StaticSummarizer;

#[async_trait]
impl Summarizer for StaticSummarizer {
    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<Summary, SummarizeError> {
        Summary::from_raw(&format!(
            r#"{{"business": "{}", "pages": {}}}"#,
            request.business_name,
            request.pages.len()
        ))
    }
}

struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _request: SummaryRequest<'_>) -> Result<Summary, SummarizeError> {
        Err(SummarizeError::Status(503))
    }
}

fn request(website: &str) -> IngestRequest {
    IngestRequest {
        owner_id: "agent-1".to_string(),
        business_name: "Acme Bakery".to_string(),
        website: website.to_string(),
        max_pages: 20,
    }
}

/// A site with one readable page and one broken link
async fn bakery_site() -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[format!("{}/menu", base), format!("{}/gone", base)]),
    )
    .await;
    mount_html(&server, "/", article_page("Acme Bakery", 5)).await;
    mount_html(&server, "/menu", article_page("Menu", 5)).await;
    mount_status(&server, "/gone", 404).await;
    server
}

#[tokio::test]
async fn test_ingest_stores_pages_and_summary() {
    let site = bakery_site().await;
    let mut store = SqliteStorage::new_in_memory().unwrap();

    let outcome = ingest_website(
        &scraper(crawler_config()),
        &mut store,
        Some(&StaticSummarizer),
        &request(&site.uri()),
    )
    .await
    .unwrap();

    assert_eq!(outcome.targets.len(), 3);
    assert_eq!(outcome.pages_stored, 2);
    assert!(outcome.summary_stored);
    assert!(outcome.summary_error.is_none());
    assert_eq!(outcome.scraped_pages[1].url, format!("{}/menu", site.uri()));
    assert_eq!(outcome.scraped_pages[1].title.as_deref(), Some("Menu"));

    let documents = store.list_documents("agent-1").unwrap();
    assert_eq!(documents.len(), 3);
    assert_eq!(
        documents[0].title,
        format!("Acme Bakery ({})", root(&site))
    );
    assert_eq!(documents[2].title, SUMMARY_TITLE);

    let summary: serde_json::Value = serde_json::from_str(&documents[2].text).unwrap();
    assert_eq!(summary["business"], "Acme Bakery");
    assert_eq!(summary["pages"], 2);

    let run = store.get_run(outcome.run_id).unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.targets_count, 3);
    assert_eq!(run.pages_count, 2);
}

#[tokio::test]
async fn test_summarizer_failure_is_not_fatal() {
    let site = bakery_site().await;
    let mut store = SqliteStorage::new_in_memory().unwrap();

    let outcome = ingest_website(
        &scraper(crawler_config()),
        &mut store,
        Some(&FailingSummarizer),
        &request(&site.uri()),
    )
    .await
    .unwrap();

    assert_eq!(outcome.pages_stored, 2);
    assert!(!outcome.summary_stored);
    assert!(outcome.summary_error.unwrap().contains("503"));
    assert_eq!(store.count_documents("agent-1").unwrap(), 2);
}

#[tokio::test]
async fn test_ingest_without_summarizer() {
    let site = bakery_site().await;
    let mut store = SqliteStorage::new_in_memory().unwrap();

    let outcome = ingest_website(
        &scraper(crawler_config()),
        &mut store,
        None,
        &request(&site.uri()),
    )
    .await
    .unwrap();

    assert!(!outcome.summary_stored);
    assert!(outcome.summary_error.is_none());
    assert_eq!(store.count_documents("agent-1").unwrap(), 2);
}

#[tokio::test]
async fn test_empty_crawl_stores_nothing() {
    let site = MockServer::start().await;
    mount_html(&site, "/", short_page("Home")).await;
    let mut store = SqliteStorage::new_in_memory().unwrap();

    let result = ingest_website(
        &scraper(crawler_config()),
        &mut store,
        Some(&StaticSummarizer),
        &request(&site.uri()),
    )
    .await;

    match result {
        Err(CorpusError::NoPagesScraped { targets }) => {
            assert_eq!(targets, vec![root(&site)]);
        }
        other => panic!("expected NoPagesScraped, got {:?}", other),
    }

    assert_eq!(store.count_documents("agent-1").unwrap(), 0);
    let run = store.get_latest_run("agent-1").unwrap().unwrap();
    assert_eq!(run.status, RunStatus::NoPages);
    assert_eq!(run.targets_count, 1);
}

#[tokio::test]
async fn test_documents_persist_on_disk() {
    let site = bakery_site().await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("corpus.db");

    {
        let mut store = open_storage(&db_path).unwrap();
        ingest_website(
            &scraper(crawler_config()),
            &mut store,
            None,
            &request(&site.uri()),
        )
        .await
        .unwrap();
    }

    let store = open_storage(&db_path).unwrap();
    assert_eq!(store.count_documents("agent-1").unwrap(), 2);
    assert_eq!(store.count_documents("agent-2").unwrap(), 0);
}

fn summarizer_config(endpoint: String) -> SummarizerConfig {
    SummarizerConfig {
        endpoint,
        api_key_env: "UNUSED".to_string(),
        timeout_secs: 5,
        max_pages: 12,
        max_payload_chars: 120_000,
    }
}

#[tokio::test]
async fn test_http_summarizer_round_trip() {
    let site = bakery_site().await;
    let service = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"name": "Acme Bakery", "services": ["bread"]}"#)
                .insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(&service)
        .await;

    let summarizer = HttpSummarizer::new(
        summarizer_config(format!("{}/summarize", service.uri())),
        "test-key".to_string(),
    )
    .unwrap();
    let mut store = SqliteStorage::new_in_memory().unwrap();

    let outcome = ingest_website(
        &scraper(crawler_config()),
        &mut store,
        Some(&summarizer),
        &request(&site.uri()),
    )
    .await
    .unwrap();

    assert!(outcome.summary_stored, "{:?}", outcome.summary_error);

    let requests = service.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["business_name"], "Acme Bakery");
    assert_eq!(body["website"], site.uri());
    let content = body["content"].as_str().unwrap();
    assert!(content.starts_with(&format!("URL: {}\nTITLE: Acme Bakery\nCONTENT:\n", root(&site))));
    assert!(content.contains("\n\n---\n\nURL: "));

    let documents = store.list_documents("agent-1").unwrap();
    let summary = documents.last().unwrap();
    assert_eq!(summary.title, SUMMARY_TITLE);
    assert!(summary.text.contains("\"services\""));
}

#[tokio::test]
async fn test_http_summarizer_error_status() {
    let site = bakery_site().await;
    let service = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&service)
        .await;

    let summarizer = HttpSummarizer::new(
        summarizer_config(format!("{}/summarize", service.uri())),
        "test-key".to_string(),
    )
    .unwrap();
    let mut store = SqliteStorage::new_in_memory().unwrap();

    let outcome = ingest_website(
        &scraper(crawler_config()),
        &mut store,
        Some(&summarizer),
        &request(&site.uri()),
    )
    .await
    .unwrap();

    assert!(!outcome.summary_stored);
    assert_eq!(
        outcome.summary_error.as_deref(),
        Some("Summarizer returned HTTP 500")
    );
    assert_eq!(store.count_documents("agent-1").unwrap(), 2);
}

#[tokio::test]
async fn test_http_summarizer_rejects_non_json() {
    let site = bakery_site().await;
    let service = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Sure! Here is a summary."))
        .mount(&service)
        .await;

    let summarizer = HttpSummarizer::new(
        summarizer_config(format!("{}/summarize", service.uri())),
        "test-key".to_string(),
    )
    .unwrap();
    let mut store = SqliteStorage::new_in_memory().unwrap();

    let outcome = ingest_website(
        &scraper(crawler_config()),
        &mut store,
        Some(&summarizer),
        &request(&site.uri()),
    )
    .await
    .unwrap();

    assert!(!outcome.summary_stored);
    assert!(outcome
        .summary_error
        .unwrap()
        .starts_with("Summarizer response was not valid JSON"));
}
