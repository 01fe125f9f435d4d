use crate::barrier::TaskBarrier;
use crate::error::{Result, ScanError};
use crate::fetch::{HttpFetcher, PageFetcher, extract_links};
use crate::graph::DomainGraph;
use crate::normalize::domain_of;
use crate::result::CrawlOutcome;
use crate::visited::VisitedSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Breadth-first link crawler. Every discovered link becomes its own tokio
/// task; [`Crawler::crawl`] returns once the whole task tree has drained.
pub struct Crawler<F: PageFetcher = HttpFetcher> {
    fetcher: Arc<F>,
    max_depth: usize,
    progress_callback: Option<ProgressCallback>,
}

/// State shared by all tasks of one crawl run.
struct CrawlContext<F: PageFetcher> {
    fetcher: Arc<F>,
    visited: VisitedSet,
    graph: DomainGraph,
    barrier: TaskBarrier,
    max_depth: usize,
    progress_callback: Option<ProgressCallback>,
    pages_fetched: AtomicUsize,
    pages_failed: AtomicUsize,
}

impl Crawler<HttpFetcher> {
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }
}

impl<F: PageFetcher> Crawler<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            max_depth: DEFAULT_MAX_DEPTH,
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawls outward from `seeds` and returns the host graph once no task
    /// is left in flight. Seeds that are not absolute URLs are skipped.
    pub async fn crawl<I, S>(&self, seeds: I) -> Result<CrawlOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeds: Vec<Url> = seeds
            .into_iter()
            .filter_map(|seed| match parse_seed(seed.as_ref()) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("Skipping seed: {}", e);
                    None
                }
            })
            .collect();

        if seeds.is_empty() {
            return Err(ScanError::NoSeeds);
        }

        info!(
            "Starting crawl of {} seed(s) with max depth {}",
            seeds.len(),
            self.max_depth
        );

        let ctx = Arc::new(CrawlContext {
            fetcher: self.fetcher.clone(),
            visited: VisitedSet::new(),
            graph: DomainGraph::new(),
            barrier: TaskBarrier::new(),
            max_depth: self.max_depth,
            progress_callback: self.progress_callback.clone(),
            pages_fetched: AtomicUsize::new(0),
            pages_failed: AtomicUsize::new(0),
        });

        for seed in seeds {
            spawn_task(ctx.clone(), seed, 0);
        }

        ctx.barrier.wait().await;

        let outcome = CrawlOutcome {
            graph: ctx.graph.snapshot(),
            pages_fetched: ctx.pages_fetched.load(Ordering::SeqCst),
            pages_failed: ctx.pages_failed.load(Ordering::SeqCst),
            urls_visited: ctx.visited.len(),
        };

        info!(
            "Crawl complete. Fetched {} pages ({} failed), {} domains, {} links",
            outcome.pages_fetched,
            outcome.pages_failed,
            outcome.domain_count(),
            outcome.link_count()
        );

        Ok(outcome)
    }
}

fn parse_seed(seed: &str) -> Result<Url> {
    Url::parse(seed.trim()).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed, e)))
}

/// Registers a ticket for `url` and only then spawns its task, so the
/// barrier cannot drain between the two.
fn spawn_task<F: PageFetcher>(ctx: Arc<CrawlContext<F>>, url: Url, depth: usize) {
    let ticket = ctx.barrier.register();
    tokio::spawn(async move {
        let _ticket = ticket;
        ctx.visit(url, depth).await;
    });
}

impl<F: PageFetcher> CrawlContext<F> {
    async fn visit(self: Arc<Self>, url: Url, depth: usize) {
        // Depth goes first so a too-deep sighting does not claim the URL
        if depth > self.max_depth {
            debug!("Too deep ({}): {}", depth, url);
            return;
        }
        if !self.visited.mark(url.as_str()) {
            debug!("Already visited: {}", url);
            return;
        }

        if let Some(ref callback) = self.progress_callback {
            callback(url.to_string());
        }
        debug!("Crawling: {}", url);

        match self.fetch_links(&url).await {
            Ok(links) => {
                self.pages_fetched.fetch_add(1, Ordering::SeqCst);
                self.record_links(&url, links, depth);
            }
            Err(e) => {
                self.pages_failed.fetch_add(1, Ordering::SeqCst);
                debug!("Dropping {}: {}", url, e);
            }
        }
    }

    async fn fetch_links(&self, url: &Url) -> Result<Vec<Url>> {
        let body = self.fetcher.fetch(url).await?;
        Ok(extract_links(&body, url))
    }

    /// One edge `host(page) -> host(link)` and one child task per link.
    fn record_links(self: &Arc<Self>, page: &Url, links: Vec<Url>, depth: usize) {
        let Some(from) = domain_of(page) else {
            return;
        };

        debug!("Found {} links on {}", links.len(), page);
        for link in links {
            let Some(to) = domain_of(&link) else {
                continue;
            };
            self.graph.add_edge(&from, &to);
            spawn_task(self.clone(), link, depth + 1);
        }
    }
}
