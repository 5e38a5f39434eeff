//! Integration tests for Site-Corpus
//!
//! These tests use wiremock to stand up mock websites and drive the
//! discovery, crawl and ingest pipeline end-to-end.

mod common;
mod crawl_tests;
mod ingest_tests;
mod sitemap_tests;
