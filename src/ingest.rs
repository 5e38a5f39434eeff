//! Website ingestion
//!
//! Crawls a business website, stores every scraped page as a document for
//! the business, and optionally stores a structured summary alongside.
//! Only an empty crawl or a failure to store the pages stops the pipeline;
//! summarization problems are reported in the outcome instead.

use crate::crawler::{ScrapedPage, Scraper};
use crate::storage::{DocumentKind, DocumentRecord, DocumentStore, RunStatus};
use crate::summarize::{Summarizer, SummaryRequest};
use crate::{CorpusError, UrlError};
use serde::Serialize;

/// Title of the stored summary document
pub const SUMMARY_TITLE: &str = "Website summary (JSON)";

/// What to ingest and for whom
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Owner under which documents are stored
    pub owner_id: String,
    pub business_name: String,
    pub website: String,
    pub max_pages: usize,
}

/// Short description of a stored page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageOverview {
    pub url: String,
    pub title: Option<String>,
    pub text_chars: usize,
}

impl From<&ScrapedPage> for PageOverview {
    fn from(page: &ScrapedPage) -> Self {
        Self {
            url: page.url.clone(),
            title: page.title.clone(),
            text_chars: page.text_chars(),
        }
    }
}

/// Result of a successful ingest
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub run_id: i64,
    pub pages_stored: usize,
    pub summary_stored: bool,
    pub summary_error: Option<String>,
    pub targets: Vec<String>,
    pub scraped_pages: Vec<PageOverview>,
}

/// Crawls, stores and summarizes a business website
///
/// # Flow
///
/// 1. Reject a blank website
/// 2. Record a run and crawl up to `request.max_pages` pages
/// 3. Fail with `NoPagesScraped` when nothing usable was found
/// 4. Store every page as a document (all or nothing)
/// 5. Summarize and store the summary, if a summarizer is given
///
/// # Returns
///
/// * `Ok(IngestOutcome)` - Pages stored; summary outcome included
/// * `Err(CorpusError::Url)` - Blank website
/// * `Err(CorpusError::NoPagesScraped)` - Crawl produced no usable page
/// * `Err(CorpusError::Storage)` - Pages could not be stored
pub async fn ingest_website<S>(
    scraper: &Scraper,
    store: &mut S,
    summarizer: Option<&dyn Summarizer>,
    request: &IngestRequest,
) -> Result<IngestOutcome, CorpusError>
where
    S: DocumentStore + ?Sized,
{
    let website = request.website.trim();
    if website.is_empty() {
        return Err(UrlError::InvalidUrl {
            input: request.website.clone(),
            reason: "business has no website to scrape".to_string(),
        }
        .into());
    }

    tracing::info!(
        "Ingesting {} for owner {} (max {} pages)",
        website,
        request.owner_id,
        request.max_pages
    );
    let run_id = store.create_run(&request.owner_id, website)?;

    let report = scraper.run(website, request.max_pages).await;
    let targets_count = report.targets.len() as u64;

    if report.is_empty() {
        store.finish_run(run_id, RunStatus::NoPages, targets_count, 0)?;
        return Err(CorpusError::NoPagesScraped {
            targets: report.targets,
        });
    }

    let documents: Vec<DocumentRecord> = report
        .pages
        .iter()
        .map(|page| DocumentRecord::from_page(&request.owner_id, page))
        .collect();

    if let Err(e) = store.insert_documents(&documents) {
        if let Err(finish_error) =
            store.finish_run(run_id, RunStatus::Failed, targets_count, 0)
        {
            tracing::warn!("Could not mark run {} as failed: {}", run_id, finish_error);
        }
        return Err(e.into());
    }

    let mut summary_stored = false;
    let mut summary_error = None;
    if let Some(summarizer) = summarizer {
        let summary_request = SummaryRequest {
            business_name: &request.business_name,
            website,
            pages: &report.pages,
        };
        match store_summary(store, summarizer, summary_request, &request.owner_id).await {
            Ok(()) => summary_stored = true,
            Err(error) => {
                tracing::warn!("Summary not stored for {}: {}", website, error);
                summary_error = Some(error);
            }
        }
    } else {
        tracing::debug!("No summarizer configured; skipping summary");
    }

    store.finish_run(
        run_id,
        RunStatus::Completed,
        targets_count,
        report.pages.len() as u64,
    )?;

    Ok(IngestOutcome {
        run_id,
        pages_stored: documents.len(),
        summary_stored,
        summary_error,
        scraped_pages: report.pages.iter().map(PageOverview::from).collect(),
        targets: report.targets,
    })
}

/// Summarizes and stores the result; the error is reported as a message
async fn store_summary<S>(
    store: &mut S,
    summarizer: &dyn Summarizer,
    request: SummaryRequest<'_>,
    owner_id: &str,
) -> Result<(), String>
where
    S: DocumentStore + ?Sized,
{
    let summary = match summarizer.summarize(request).await {
        Ok(summary) => summary,
        Err(e) => return Err(e.to_string()),
    };

    let text = match summary.to_pretty_json() {
        Ok(text) => text,
        Err(e) => return Err(e.to_string()),
    };

    let record = DocumentRecord {
        owner_id: owner_id.to_string(),
        kind: DocumentKind::Document,
        title: SUMMARY_TITLE.to_string(),
        text,
    };

    store
        .insert_documents(&[record])
        .map(|_| ())
        .map_err(|e| e.to_string())
}
