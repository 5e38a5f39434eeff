//! Site-Corpus main entry point
//!
//! This is the command-line interface for the Site-Corpus website ingester.

use clap::Parser;
use site_corpus::config::{load_config_with_hash, Config};
use site_corpus::ingest::{ingest_website, IngestRequest};
use site_corpus::output::{
    generate_markdown_corpus, load_statistics, print_outcome, print_statistics, to_json,
};
use site_corpus::storage::open_storage;
use site_corpus::summarize::{HttpSummarizer, Summarizer};
use site_corpus::{normalize_root_url, CorpusError, Scraper};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Corpus: turns a business website into a stored text corpus
///
/// Site-Corpus discovers a bounded set of pages from the site's sitemap,
/// extracts their readable text, stores each page as a document and
/// optionally asks a summarization service for a structured overview.
#[derive(Parser, Debug)]
#[command(name = "site-corpus")]
#[command(version = "1.0.0")]
#[command(about = "Scrape a business website into a text corpus", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Website to scrape, with or without a scheme
    #[arg(
        value_name = "WEBSITE",
        required_unless_present_any = ["stats", "export_markdown"]
    )]
    website: Option<String>,

    /// Business name passed to the summarizer (defaults to the website host)
    #[arg(long)]
    business_name: Option<String>,

    /// Owner under which documents are stored
    #[arg(long, default_value = "default")]
    owner_id: String,

    /// Override the configured page budget
    #[arg(long)]
    max_pages: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching pages
    #[arg(long, conflicts_with_all = ["stats", "export_markdown"])]
    dry_run: bool,

    /// Show statistics for the owner's stored corpus and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_markdown"])]
    stats: bool,

    /// Write the owner's stored corpus as markdown and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats"])]
    export_markdown: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.stats {
        return handle_stats(&config, &cli.owner_id);
    }
    if let Some(path) = &cli.export_markdown {
        return handle_export_markdown(&config, &cli.owner_id, path);
    }

    let website = cli.website.clone().unwrap_or_default();
    let max_pages = cli.max_pages.unwrap_or(config.crawler.max_pages);

    if cli.dry_run {
        handle_dry_run(&config, &website, max_pages).await
    } else {
        handle_ingest(&config, &cli, website, max_pages).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_corpus=info,warn"),
            1 => EnvFilter::new("site_corpus=debug,info"),
            2 => EnvFilter::new("site_corpus=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be scraped
async fn handle_dry_run(
    config: &Config,
    website: &str,
    max_pages: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Site-Corpus Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages: {}", max_pages);
    println!("  Sitemap timeout: {}s", config.crawler.sitemap_timeout_secs);
    println!("  Page timeout: {}s", config.crawler.page_timeout_secs);
    println!("  Max child sitemaps: {}", config.crawler.max_child_sitemaps);
    println!("  Minimum text: {} chars", config.crawler.min_text_chars);
    println!("  Concurrency: {}", config.crawler.concurrency);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    match &config.summarizer {
        Some(summarizer) => {
            println!("\nSummarizer:");
            println!("  Endpoint: {}", summarizer.endpoint);
            println!("  API key variable: {}", summarizer.api_key_env);
        }
        None => println!("\nSummarizer: not configured"),
    }

    let scraper = Scraper::from_config(config)?;
    let targets = scraper.discover(website, max_pages).await;

    println!("\nDiscovered URLs ({}):", targets.len());
    for target in &targets {
        println!("  - {}", target);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} URLs", targets.len());

    Ok(())
}

/// Handles the --stats mode: shows what is stored for the owner
fn handle_stats(config: &Config, owner_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage, owner_id)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-markdown mode: writes the owner's corpus to a file
fn handle_export_markdown(
    config: &Config,
    owner_id: &str,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = open_storage(Path::new(&config.output.database_path))?;

    tracing::info!("Exporting documents for {}...", owner_id);
    let written = generate_markdown_corpus(&storage, owner_id, path)?;

    println!("✓ {} documents exported to: {}", written, path.display());

    Ok(())
}

/// Handles the main ingest operation
async fn handle_ingest(
    config: &Config,
    cli: &Cli,
    website: String,
    max_pages: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let scraper = Scraper::from_config(config)?;
    let mut storage = open_storage(Path::new(&config.output.database_path))?;

    let summarizer = match &config.summarizer {
        Some(summarizer_config) => match HttpSummarizer::from_config(summarizer_config) {
            Ok(summarizer) => Some(summarizer),
            Err(e) => {
                tracing::warn!("Summarizer disabled: {}", e);
                None
            }
        },
        None => None,
    };

    let business_name = cli
        .business_name
        .clone()
        .unwrap_or_else(|| default_business_name(&website));

    let request = IngestRequest {
        owner_id: cli.owner_id.clone(),
        business_name,
        website,
        max_pages,
    };

    let result = ingest_website(
        &scraper,
        &mut storage,
        summarizer.as_ref().map(|s| s as &dyn Summarizer),
        &request,
    )
    .await;

    match result {
        Ok(outcome) => {
            tracing::info!("Ingest completed: {} pages stored", outcome.pages_stored);
            if cli.json {
                println!("{}", to_json(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
            Ok(())
        }
        Err(CorpusError::NoPagesScraped { targets }) => {
            tracing::error!(
                "No pages could be scraped from {} ({} URLs discovered)",
                request.website,
                targets.len()
            );
            for target in &targets {
                tracing::error!("  tried: {}", target);
            }
            Err(CorpusError::NoPagesScraped { targets }.into())
        }
        Err(e) => {
            tracing::error!("Ingest failed: {}", e);
            Err(e.into())
        }
    }
}

/// The website host, or the raw input when it cannot be parsed
fn default_business_name(website: &str) -> String {
    normalize_root_url(website)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| website.trim().to_string())
}
