pub mod barrier;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod normalize;
pub mod result;
pub mod visited;

pub use barrier::{TaskBarrier, Ticket};
pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use fetch::{HttpFetcher, PageFetcher};
pub use graph::{DomainGraph, GraphSnapshot};
pub use normalize::{domain_of, normalize_url};
pub use result::CrawlOutcome;
pub use visited::VisitedSet;
