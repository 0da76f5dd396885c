use std::path::PathBuf;

use clap::{Parser, Subcommand};

use newsdesk::config::Config;
use newsdesk::db::Repository;
use newsdesk::error::{AppError, Result};
use newsdesk::ingest::{NaverClient, NewsCollector};
use newsdesk::models::{CrawlStatus, FilterStatus};
use newsdesk::services::{run_url_filter, UrlFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and schema if missing
    Init,

    /// Collect article URLs from the Naver news search API
    Collect {
        /// Search keyword
        #[arg(short, long)]
        query: Option<String>,

        /// Maximum number of search results to page through
        #[arg(short, long)]
        total: Option<usize>,
    },

    /// Apply the domain blocklist to pending articles
    FilterUrls {
        /// Blocklist file, one domain per line
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Skip queued articles that used up their crawl attempts
    SkipExhausted {
        #[arg(short, long)]
        max_attempts: Option<u32>,
    },

    /// Show row counts per pipeline status
    Stats,

    /// Print accepted articles as JSON lines
    Export {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List accepted rows whose crawled content belongs to another article
    Audit,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let db_path = cli.db.unwrap_or_else(|| config.db_path.clone());
    let repository = Repository::new(&db_path).await?;

    match cli.command {
        Commands::Init => {
            println!("Database ready at {}", db_path);
        }

        Commands::Collect { query, total } => {
            let (client_id, client_secret) = config.naver_credentials()?;
            let client = NaverClient::new(client_id, client_secret)?;
            let collector = NewsCollector::new(
                client,
                config.request_interval(),
                config.recent_window_days,
            );
            let query = query.unwrap_or_else(|| config.search_query.clone());
            let total = total.unwrap_or(config.collect_total);

            let report = collector.collect(&repository, &query, total).await?;
            println!(
                "Fetched {} results over {} pages, inserted {}",
                report.fetched, report.pages, report.inserted
            );
        }

        Commands::FilterUrls { file } => {
            let path = file.or_else(|| config.url_filter_file.clone()).ok_or_else(|| {
                AppError::Config("no URL filter file given (--file or url_filter_file)".to_string())
            })?;
            let filter = UrlFilter::from_file(&path)?;

            let report = run_url_filter(&repository, &filter).await?;
            println!(
                "URL filter {}: {} rejected, {} queued for crawling",
                filter.version(),
                report.rejected,
                report.passed
            );
        }

        Commands::SkipExhausted { max_attempts } => {
            let max_attempts = max_attempts.unwrap_or(config.max_crawl_attempts);
            let skipped = repository.skip_exhausted(max_attempts).await?;
            println!("Skipped {} articles with {}+ attempts", skipped, max_attempts);
        }

        Commands::Stats => {
            let stats = repository.stats().await?;
            println!("naver_news");
            for status in CrawlStatus::ALL {
                println!("  {:<14} {:>8}", status, stats.crawl_count(status));
            }
            println!("crawled_news");
            for status in FilterStatus::ALL {
                println!("  {:<14} {:>8}", status, stats.filter_count(status));
            }
            println!("filtered_news    {:>8}", stats.accepted);
        }

        Commands::Export { limit } => {
            for row in repository.list_full_filtered(limit).await? {
                println!("{}", serde_json::to_string(&row)?);
            }
        }

        Commands::Audit => {
            let mismatched = repository.mismatched_filtered_news().await?;
            if mismatched.is_empty() {
                println!("No mismatched acceptances");
            }
            for row in mismatched {
                tracing::warn!(
                    "filtered_news {} points at crawled_news {} of article {} instead of {}",
                    row.filtered_news_id,
                    row.crawled_news_id,
                    row.crawled_news_owner,
                    row.news_id
                );
                println!("{}", serde_json::to_string(&row)?);
            }
        }
    }

    Ok(())
}
