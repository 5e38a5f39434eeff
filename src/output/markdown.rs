//! Markdown export of a stored corpus
//!
//! This module renders every document stored for an owner into a single
//! human-readable markdown file, one section per document.

use crate::output::OutputResult;
use crate::storage::{DocumentStore, StoredDocument};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the corpus stored for an owner as markdown
///
/// # Arguments
///
/// * `store` - The storage backend holding the documents
/// * `owner_id` - Owner whose documents to export
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(usize)` - Number of documents written
/// * `Err(OutputError)` - Failed to read documents or write the file
pub fn generate_markdown_corpus(
    store: &dyn DocumentStore,
    owner_id: &str,
    output_path: &Path,
) -> OutputResult<usize> {
    let documents = store.list_documents(owner_id)?;
    let markdown = format_markdown_corpus(owner_id, &documents);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(documents.len())
}

/// Formats stored documents as markdown
pub fn format_markdown_corpus(owner_id: &str, documents: &[StoredDocument]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Website Corpus: {}\n\n", owner_id));
    md.push_str(&format!("- **Documents**: {}\n", documents.len()));
    md.push_str(&format!(
        "- **Total Characters**: {}\n\n",
        documents
            .iter()
            .map(|d| d.text.chars().count())
            .sum::<usize>()
    ));

    if documents.is_empty() {
        md.push_str("_No documents stored._\n");
        return md;
    }

    md.push_str("## Contents\n\n");
    md.push_str("| # | Title | Characters |\n");
    md.push_str("|---|-------|------------|\n");
    for (index, document) in documents.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            index + 1,
            document.title.replace('|', "\\|"),
            document.text.chars().count()
        ));
    }
    md.push('\n');

    for document in documents {
        md.push_str(&format!("## {}\n\n", document.title));
        md.push_str(&format!("_Stored {}_\n\n", document.created_at));
        md.push_str(document.text.trim_end());
        md.push_str("\n\n");
    }

    md
}
