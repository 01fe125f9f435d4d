use crate::error::Result;
use crate::graphml::GraphData;
use indicatif::{ProgressBar, ProgressStyle};
use sitemesh_scanner::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use sitemesh_scanner::{CrawlOutcome, Crawler, HttpFetcher, ProgressCallback};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub seeds: Vec<String>,
    pub max_depth: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub show_progress: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            max_depth: sitemesh_scanner::crawler::DEFAULT_MAX_DEPTH,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            show_progress: false,
        }
    }
}

/// Execute a crawl from all seeds at once and return the domain graph
/// together with page counters.
pub async fn execute_crawl(options: CrawlOptions) -> Result<CrawlOutcome> {
    let CrawlOptions {
        seeds,
        max_depth,
        timeout_secs,
        user_agent,
        show_progress,
    } = options;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Starting crawl...");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed = Arc::new(AtomicUsize::new(0));
    let callback: ProgressCallback = match progress_bar.clone() {
        Some(pb) => {
            let processed = processed.clone();
            Arc::new(move |url: String| {
                let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                pb.set_message(format!("Crawling... {} URLs ({})", count, url));
            })
        }
        None => {
            let processed = processed.clone();
            Arc::new(move |_url: String| {
                processed.fetch_add(1, Ordering::Relaxed);
            })
        }
    };

    let fetcher = HttpFetcher::with_options(timeout_secs, &user_agent)?;
    let crawler = Crawler::with_fetcher(fetcher)
        .with_max_depth(max_depth)
        .with_progress_callback(callback);

    debug!(
        "Crawling {} seed(s) to depth {} with a {}s timeout",
        seeds.len(),
        max_depth,
        timeout_secs
    );

    let result = crawler.crawl(&seeds).await;

    if let Some(pb) = &progress_bar {
        match &result {
            Ok(outcome) => pb.finish_with_message(format!(
                "Crawl complete! {} URLs visited, {} domains",
                processed.load(Ordering::Relaxed),
                outcome.domain_count()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    Ok(result?)
}

/// Converts the crawl's domain graph into the node/edge form stored on disk.
pub fn outcome_to_graph(outcome: &CrawlOutcome) -> GraphData {
    GraphData::from(outcome.graph.clone())
}
