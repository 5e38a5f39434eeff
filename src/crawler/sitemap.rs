//! Sitemap discovery
//!
//! Finds the pages worth scraping by reading `/sitemap.xml`. Both flat
//! `<urlset>` sitemaps and `<sitemapindex>` documents (a sitemap of sitemaps)
//! are understood. Discovery never fails: any problem with the sitemap leaves
//! the homepage as the only target.

use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::url::{same_origin, sitemap_url};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that make a sitemap unusable
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Sitemap fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Malformed sitemap XML: {0}")]
    Xml(String),

    #[error("Unrecognized sitemap root element <{0}>")]
    UnrecognizedRoot(String),

    #[error("Sitemap document has no root element")]
    Empty,
}

/// A parsed sitemap document
///
/// Entry lists are always vectors, whether the XML held one entry or many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page locations
    UrlSet(Vec<String>),
    /// `<sitemapindex>`: child sitemap locations
    Index(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
struct UrlSetXml {
    #[serde(rename = "url", default)]
    entries: Vec<LocXml>,
}

#[derive(Debug, Default, Deserialize)]
struct SitemapIndexXml {
    #[serde(rename = "sitemap", default)]
    entries: Vec<LocXml>,
}

#[derive(Debug, Default, Deserialize)]
struct LocXml {
    #[serde(default)]
    loc: Option<String>,
}

fn locs(entries: Vec<LocXml>) -> Vec<String> {
    entries
        .into_iter()
        .filter_map(|entry| entry.loc)
        .map(|loc| loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Parses sitemap XML into a [`SitemapDocument`]
///
/// Attributes (namespaces, schema locations) are ignored, as are per-entry
/// fields other than `<loc>`.
///
/// # Errors
///
/// * `SitemapError::Empty` - No root element
/// * `SitemapError::UnrecognizedRoot` - Root is neither `urlset` nor `sitemapindex`
/// * `SitemapError::Xml` - The document is not well-formed
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, SitemapError> {
    match root_element_name(xml)?.as_str() {
        "urlset" => {
            let parsed: UrlSetXml =
                quick_xml::de::from_str(xml).map_err(|e| SitemapError::Xml(e.to_string()))?;
            Ok(SitemapDocument::UrlSet(locs(parsed.entries)))
        }
        "sitemapindex" => {
            let parsed: SitemapIndexXml =
                quick_xml::de::from_str(xml).map_err(|e| SitemapError::Xml(e.to_string()))?;
            Ok(SitemapDocument::Index(locs(parsed.entries)))
        }
        other => Err(SitemapError::UnrecognizedRoot(other.to_string())),
    }
}

/// Checks the document is well-formed and returns its root's local name
fn root_element_name(xml: &str) -> Result<String, SitemapError> {
    let mut reader = Reader::from_str(xml);
    let mut root = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                if root.is_none() {
                    root = Some(lowercase_name(element.local_name().as_ref()));
                }
                depth += 1;
            }
            Ok(Event::Empty(element)) => {
                if root.is_none() {
                    root = Some(lowercase_name(element.local_name().as_ref()));
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(SitemapError::Xml(e.to_string())),
        }
    }

    if depth > 0 {
        return Err(SitemapError::Xml(
            "unexpected end of document".to_string(),
        ));
    }

    root.ok_or(SitemapError::Empty)
}

fn lowercase_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_ascii_lowercase()
}

/// Builds the final target list from sitemap candidates
///
/// Candidates that do not parse or are not same-origin with `root` are
/// dropped; filtering stops once `max_pages` URLs are accepted. The homepage
/// is prepended, duplicates are removed keeping first occurrence, and the
/// list is cut to `max_pages`.
pub fn assemble_targets(root: &Url, candidates: &[String], max_pages: usize) -> Vec<String> {
    let max_pages = max_pages.max(1);

    let mut filtered = Vec::new();
    for candidate in candidates {
        match Url::parse(candidate.trim()) {
            Ok(parsed) if same_origin(&parsed, root) => filtered.push(parsed.to_string()),
            Ok(_) => tracing::trace!("Skipping cross-origin sitemap entry {}", candidate),
            Err(e) => tracing::trace!("Skipping unparsable sitemap entry {}: {}", candidate, e),
        }
        if filtered.len() >= max_pages {
            break;
        }
    }

    let mut seen = HashSet::new();
    std::iter::once(root.to_string())
        .chain(filtered)
        .filter(|url| seen.insert(url.clone()))
        .take(max_pages)
        .collect()
}

/// Discovers crawl targets from a site's sitemap
#[derive(Debug, Clone)]
pub struct SitemapDiscoverer {
    fetcher: Fetcher,
    timeout: Duration,
    max_child_sitemaps: usize,
}

impl SitemapDiscoverer {
    /// Creates a discoverer
    ///
    /// # Arguments
    ///
    /// * `fetcher` - HTTP fetcher shared with the rest of the crawl
    /// * `timeout` - Deadline for each sitemap request
    /// * `max_child_sitemaps` - How many children of a sitemap index are visited
    pub fn new(fetcher: Fetcher, timeout: Duration, max_child_sitemaps: usize) -> Self {
        Self {
            fetcher,
            timeout,
            max_child_sitemaps,
        }
    }

    /// Returns up to `max_pages` same-origin URLs, homepage first
    ///
    /// On any sitemap failure the result is exactly `[root]`.
    pub async fn discover(&self, root: &Url, max_pages: usize) -> Vec<String> {
        let max_pages = max_pages.max(1);

        match self.collect_candidates(root, max_pages).await {
            Ok(candidates) => {
                tracing::debug!(
                    "Sitemap for {} listed {} candidate URLs",
                    root,
                    candidates.len()
                );
                assemble_targets(root, &candidates, max_pages)
            }
            Err(e) => {
                tracing::info!("Sitemap unavailable for {} ({}), using homepage only", root, e);
                vec![root.to_string()]
            }
        }
    }

    /// Fetches the root sitemap and gathers candidate page locations
    async fn collect_candidates(
        &self,
        root: &Url,
        max_pages: usize,
    ) -> Result<Vec<String>, SitemapError> {
        let location = sitemap_url(root);
        tracing::debug!("Fetching sitemap {}", location);

        let xml = self.fetcher.fetch_text(location.as_str(), self.timeout).await?;

        match parse_sitemap(&xml)? {
            SitemapDocument::UrlSet(urls) => Ok(urls),
            SitemapDocument::Index(children) => Ok(self.collect_from_index(&children, max_pages).await),
        }
    }

    /// Visits child sitemaps in order until enough candidates are gathered
    ///
    /// A failing child is skipped. Nested indexes are not followed.
    async fn collect_from_index(&self, children: &[String], max_pages: usize) -> Vec<String> {
        let mut urls = Vec::new();

        for child in children.iter().take(self.max_child_sitemaps) {
            match self.fetch_child(child).await {
                Ok(SitemapDocument::UrlSet(child_urls)) => {
                    for url in child_urls {
                        urls.push(url);
                        if urls.len() >= max_pages {
                            break;
                        }
                    }
                }
                Ok(SitemapDocument::Index(_)) => {
                    tracing::debug!("Ignoring nested sitemap index {}", child);
                }
                Err(e) => {
                    tracing::warn!("Skipping child sitemap {}: {}", child, e);
                }
            }

            if urls.len() >= max_pages {
                break;
            }
        }

        urls
    }

    async fn fetch_child(&self, location: &str) -> Result<SitemapDocument, SitemapError> {
        let xml = self.fetcher.fetch_text(location, self.timeout).await?;
        parse_sitemap(&xml)
    }
}
