//! Readable-text extraction
//!
//! Turns fetched HTML into a title and plain text. A readability-style pass
//! looks for the main content and leaves navigation, ads and other page
//! chrome behind; when it finds nothing, the whole body text is used with
//! scripts and styles removed.

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;
use url::Url;

/// Title and normalized text of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: Option<String>,
    pub text: String,
}

/// Elements whose contents are never readable text
const SCRIPT_TAGS: &[&str] = &["script", "style", "noscript"];

/// Elements dropped by the main-content pass in addition to [`SCRIPT_TAGS`]
const CHROME_TAGS: &[&str] = &[
    "template", "iframe", "svg", "canvas", "nav", "header", "footer", "aside", "form", "button",
    "select", "dialog",
];

/// ARIA roles marking page chrome
const CHROME_ROLES: &[&str] = &[
    "navigation",
    "banner",
    "contentinfo",
    "complementary",
    "search",
    "menu",
    "menubar",
    "dialog",
    "alert",
];

/// Fragments of `class`/`id` values marking boilerplate
const BOILERPLATE_HINTS: &[&str] = &[
    "nav",
    "menu",
    "footer",
    "sidebar",
    "cookie",
    "consent",
    "banner",
    "advert",
    "sponsor",
    "promo",
    "share",
    "social",
    "comment",
    "breadcrumb",
    "popup",
    "modal",
    "newsletter",
    "subscribe",
];

/// Whole `class`/`id` tokens marking ads
const AD_TOKENS: &[&str] = &["ad", "ads", "adsbygoogle"];

/// Containers that are never discarded on class/id hints alone
const PROTECTED_TAGS: &[&str] = &["html", "body", "main", "article"];

/// Elements that end a line of text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tbody", "td", "th", "thead", "tr", "ul",
];

/// Paragraphs shorter than this do not vote for a content container
const MIN_PARAGRAPH_CHARS: usize = 25;

static NBSP: LazyLock<Regex> = LazyLock::new(|| Regex::new("\u{a0}").expect("valid regex"));
static TRAILING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+\n").expect("valid regex"));
static EXTRA_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Normalizes extracted text
///
/// 1. Non-breaking spaces become regular spaces
/// 2. Spaces and tabs before a newline are removed
/// 3. Three or more consecutive newlines collapse to two
/// 4. Leading and trailing whitespace is trimmed
///
/// # Examples
///
/// ```
/// use site_corpus::crawler::normalize_text;
///
/// assert_eq!(normalize_text("  a\u{a0}b  \n\n\n\nc "), "a b\n\nc");
/// ```
pub fn normalize_text(input: &str) -> String {
    let text = NBSP.replace_all(input, " ");
    let text = TRAILING_SPACE.replace_all(&text, "\n");
    let text = EXTRA_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Extracts the title and readable text from an HTML page
///
/// # Arguments
///
/// * `html` - The page HTML
/// * `page_url` - Where the page was fetched from; in-page anchors are
///   resolved against it so they are not mistaken for navigation
///
/// # Returns
///
/// The main-content text when the readability pass finds some, otherwise the
/// body text without `<script>`, `<style>` and `<noscript>` contents. Either
/// way the text is normalized with [`normalize_text`].
///
/// # Example
///
/// ```
/// use site_corpus::crawler::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title>Home</title></head>
///     <body><nav>Menu</nav><article><p>Welcome to our space.</p></article></body></html>"#;
/// let page = extract(html, &Url::parse("https://example.com/").unwrap());
/// assert_eq!(page.title.as_deref(), Some("Home"));
/// assert_eq!(page.text, "Welcome to our space.");
/// ```
pub fn extract(html: &str, page_url: &Url) -> ExtractedText {
    let document = Html::parse_document(html);
    let document_title = document_title(&document);

    match readable_content(&document, page_url) {
        Some(text) => ExtractedText {
            title: meta_title(&document).or(document_title),
            text,
        },
        None => {
            tracing::trace!("No main content found in {}, using body text", page_url);
            ExtractedText {
                title: document_title,
                text: body_text(&document),
            }
        }
    }
}

/// Readability-style pass; `None` when no main content can be identified
fn readable_content(document: &Html, page_url: &Url) -> Option<String> {
    let container = landmark_container(document).or_else(|| scored_container(document, page_url))?;

    let mut raw = String::new();
    collect_text(container, &is_chrome, &mut raw);
    let text = normalize_text(&raw);

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Whole-body fallback with scripts and styles stripped
fn body_text(document: &Html) -> String {
    let root = selector("body")
        .and_then(|body| document.select(&body).next())
        .unwrap_or_else(|| document.root_element());

    let mut raw = String::new();
    collect_text(root, &is_script, &mut raw);
    normalize_text(&raw)
}

/// Main content landmark
///
/// The first `<main>` or `[role=main]` element with text wins. Otherwise the
/// top-level `<article>` elements with text are used: a single one directly,
/// several (a listing of cards or posts) through their closest common
/// ancestor.
fn landmark_container(document: &Html) -> Option<ElementRef<'_>> {
    for query in ["main", "[role=main]"] {
        let Some(sel) = selector(query) else {
            continue;
        };

        if let Some(element) = document
            .select(&sel)
            .find(|element| !has_chrome_ancestor(*element) && has_text(*element))
        {
            return Some(element);
        }
    }

    let sel = selector("article")?;
    let articles: Vec<ElementRef<'_>> = document
        .select(&sel)
        .filter(|article| {
            !has_chrome_ancestor(*article)
                && !article
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|ancestor| ancestor.value().name() == "article")
                && has_text(*article)
        })
        .collect();

    match articles.as_slice() {
        [] => None,
        [single] => Some(*single),
        several => common_ancestor(several),
    }
}

fn has_text(element: ElementRef<'_>) -> bool {
    let mut raw = String::new();
    collect_text(element, &is_chrome, &mut raw);
    !raw.trim().is_empty()
}

/// Closest element containing every one of `elements`
fn common_ancestor<'a>(elements: &[ElementRef<'a>]) -> Option<ElementRef<'a>> {
    let (first, rest) = elements.split_first()?;

    first
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|candidate| {
            rest.iter().all(|element| {
                element
                    .ancestors()
                    .any(|ancestor| ancestor.id() == candidate.id())
            })
        })
}

/// Container with the highest paragraph score
///
/// Each paragraph of at least [`MIN_PARAGRAPH_CHARS`] characters scores one
/// point, one per comma, and one per hundred characters (at most three). The
/// parent receives the full score and the grandparent half of it. Totals are
/// then scaled down by the container's link density.
fn scored_container<'a>(document: &'a Html, page_url: &Url) -> Option<ElementRef<'a>> {
    let paragraphs = selector("p, pre, blockquote")?;
    let mut scores = Vec::new();

    for paragraph in document.select(&paragraphs) {
        if has_chrome_ancestor(paragraph) {
            continue;
        }

        let mut raw = String::new();
        collect_text(paragraph, &is_chrome, &mut raw);
        let text = normalize_text(&raw);
        let length = text.chars().count();
        if length < MIN_PARAGRAPH_CHARS {
            continue;
        }

        let score = 1.0 + text.matches(',').count() as f64 + (length / 100).min(3) as f64;

        let mut ancestors = paragraph.ancestors().filter_map(ElementRef::wrap);
        if let Some(parent) = ancestors.next() {
            add_score(&mut scores, parent, score);
            if let Some(grandparent) = ancestors.next() {
                add_score(&mut scores, grandparent, score / 2.0);
            }
        }
    }

    let mut best: Option<(ElementRef<'a>, f64)> = None;
    for (element, score) in scores {
        let adjusted = score * (1.0 - link_density(element, page_url));
        if adjusted > 0.0 && best.map_or(true, |(_, top)| adjusted > top) {
            best = Some((element, adjusted));
        }
    }

    best.map(|(element, _)| element)
}

fn add_score<'a>(scores: &mut Vec<(ElementRef<'a>, f64)>, element: ElementRef<'a>, score: f64) {
    match scores.iter_mut().find(|(existing, _)| existing.id() == element.id()) {
        Some((_, total)) => *total += score,
        None => scores.push((element, score)),
    }
}

/// Share of a container's text that sits inside outbound links
fn link_density(element: ElementRef<'_>, page_url: &Url) -> f64 {
    let mut all = String::new();
    collect_text(element, &is_chrome, &mut all);
    let total = all.trim().chars().count();
    if total == 0 {
        return 1.0;
    }

    let Some(anchors) = selector("a") else {
        return 0.0;
    };

    let linked: usize = element
        .select(&anchors)
        .filter(|anchor| !is_in_page_anchor(*anchor, page_url))
        .map(|anchor| anchor.text().collect::<String>().trim().chars().count())
        .sum();

    (linked as f64 / total as f64).min(1.0)
}

/// True for links that only jump within the page itself
fn is_in_page_anchor(anchor: ElementRef<'_>, page_url: &Url) -> bool {
    let Some(href) = anchor.value().attr("href") else {
        return true;
    };

    match page_url.join(href.trim()) {
        Ok(mut target) => {
            let mut base = page_url.clone();
            target.set_fragment(None);
            base.set_fragment(None);
            target == base
        }
        Err(_) => false,
    }
}

fn has_chrome_ancestor(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_chrome(&ancestor))
}

fn is_script(element: &ElementRef<'_>) -> bool {
    SCRIPT_TAGS.contains(&element.value().name())
}

/// True for elements the main-content pass discards
fn is_chrome(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    let name = value.name();

    if SCRIPT_TAGS.contains(&name) || CHROME_TAGS.contains(&name) {
        return true;
    }

    if value.attr("hidden").is_some() || value.attr("aria-hidden") == Some("true") {
        return true;
    }

    if let Some(role) = value.attr("role") {
        if CHROME_ROLES.contains(&role.trim().to_ascii_lowercase().as_str()) {
            return true;
        }
    }

    if PROTECTED_TAGS.contains(&name) {
        return false;
    }

    let id = value.id().into_iter();
    value
        .classes()
        .chain(id)
        .map(str::to_ascii_lowercase)
        .any(|token| {
            AD_TOKENS.contains(&token.as_str())
                || BOILERPLATE_HINTS.iter().any(|hint| token.contains(hint))
        })
}

/// Pending work while walking a subtree
enum Step<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
    LineBreak,
}

/// Appends the text under `element`, skipping subtrees matched by `skip`
///
/// Block-level elements and `<br>` contribute line breaks. The walk uses an
/// explicit stack, so nesting depth is bounded by memory, not the call stack.
fn collect_text(element: ElementRef<'_>, skip: &dyn Fn(&ElementRef<'_>) -> bool, out: &mut String) {
    let mut stack = Vec::new();
    push_children(element, &mut stack);

    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) => out.push_str(text),
            Step::LineBreak => out.push('\n'),
            Step::Element(child) => {
                if skip(&child) {
                    continue;
                }

                let name = child.value().name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }

                if BLOCK_TAGS.contains(&name) {
                    out.push('\n');
                    stack.push(Step::LineBreak);
                }
                push_children(child, &mut stack);
            }
        }
    }
}

/// Pushes children in reverse so they pop in document order
fn push_children<'a>(element: ElementRef<'a>, stack: &mut Vec<Step<'a>>) {
    for child in element.children().rev() {
        match child.value() {
            Node::Text(text) => stack.push(Step::Text(&**text)),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    stack.push(Step::Element(child));
                }
            }
            _ => {}
        }
    }
}

fn document_title(document: &Html) -> Option<String> {
    let title = selector("title")?;

    document
        .select(&title)
        .next()
        .map(|element| element.text().collect::<String>())
        .and_then(clean_title)
}

fn meta_title(document: &Html) -> Option<String> {
    let meta = selector(r#"meta[property="og:title"]"#)?;

    document
        .select(&meta)
        .next()
        .and_then(|element| element.value().attr("content"))
        .and_then(|content| clean_title(content.to_string()))
}

fn clean_title(raw: String) -> Option<String> {
    let title = normalize_text(&raw.split_whitespace().collect::<Vec<_>>().join(" "));
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn selector(query: &str) -> Option<Selector> {
    Selector::parse(query).ok()
}
