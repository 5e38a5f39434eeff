//! URL handling module for Site-Corpus
//!
//! This module turns free-form, business-supplied website strings into
//! canonical absolute URLs and answers origin questions about them.

mod normalize;
mod origin;

// Re-export main functions
pub use normalize::normalize_root_url;
pub use origin::{same_origin, sitemap_url};
