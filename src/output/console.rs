//! Console rendering of scrape reports and ingest outcomes

use crate::crawler::ScrapeReport;
use crate::ingest::IngestOutcome;
use serde::Serialize;

/// Pretty JSON for any serializable result
pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Formats a scrape report for humans
pub fn format_report(report: &ScrapeReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Discovered URLs ({}):\n", report.targets.len()));
    for target in &report.targets {
        out.push_str(&format!("  - {}\n", target));
    }

    out.push_str(&format!(
        "\nScraped pages ({}, {} characters):\n",
        report.pages.len(),
        report.total_chars()
    ));
    for page in &report.pages {
        out.push_str(&format!(
            "  - {} | {} | {} chars\n",
            page.url,
            page.title.as_deref().unwrap_or("(untitled)"),
            page.text_chars()
        ));
    }

    out
}

/// Prints a scrape report to stdout
pub fn print_report(report: &ScrapeReport) {
    print!("{}", format_report(report));
}

/// Formats an ingest outcome for humans
pub fn format_outcome(outcome: &IngestOutcome) -> String {
    let mut out = String::new();

    out.push_str(&format!("Run: {}\n", outcome.run_id));
    out.push_str(&format!(
        "Pages stored: {} of {} discovered URLs\n",
        outcome.pages_stored,
        outcome.targets.len()
    ));

    match (&outcome.summary_error, outcome.summary_stored) {
        (_, true) => out.push_str("Summary: stored\n"),
        (Some(error), false) => out.push_str(&format!("Summary: failed ({})\n", error)),
        (None, false) => out.push_str("Summary: skipped\n"),
    }

    out.push_str("\nPages:\n");
    for page in &outcome.scraped_pages {
        out.push_str(&format!(
            "  - {} | {} | {} chars\n",
            page.url,
            page.title.as_deref().unwrap_or("(untitled)"),
            page.text_chars
        ));
    }

    out
}

/// Prints an ingest outcome to stdout
pub fn print_outcome(outcome: &IngestOutcome) {
    print!("{}", format_outcome(outcome));
}
