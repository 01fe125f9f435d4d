use crate::graph::GraphSnapshot;
use serde::{Deserialize, Serialize};

/// What a finished crawl leaves behind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlOutcome {
    pub graph: GraphSnapshot,
    /// Pages whose body was fetched and scanned for links
    pub pages_fetched: usize,
    /// Pages that were attempted but failed (network, status, content type)
    pub pages_failed: usize,
    /// Distinct normalized URLs claimed by a task
    pub urls_visited: usize,
}

impl CrawlOutcome {
    pub fn domain_count(&self) -> usize {
        self.graph.vertices.len()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edges.len()
    }
}
