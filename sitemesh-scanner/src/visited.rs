use crate::normalize::normalize_url;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of normalized URLs shared by every crawl task.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes `url` and inserts it. Returns `true` only for the caller
    /// that added it first.
    pub fn mark(&self, url: &str) -> bool {
        let normalized = normalize_url(url);
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalized)
    }

    pub fn contains(&self, url: &str) -> bool {
        let normalized = normalize_url(url);
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&normalized)
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_mark_dedups_equivalent_urls() {
        let visited = VisitedSet::new();
        assert!(visited.mark("https://www.example.com/docs/"));
        assert!(!visited.mark("https://example.com/docs"));
        assert!(!visited.mark("https://example.com/docs?page=2#top"));
        assert!(visited.mark("https://example.com/docs/other"));
        assert_eq!(visited.len(), 2);
        assert!(visited.contains("https://www.example.com/docs"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_mark_has_single_winner() {
        let visited = Arc::new(VisitedSet::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..64 {
            let visited = visited.clone();
            let winners = winners.clone();
            handles.push(tokio::spawn(async move {
                // Mix of spellings that all normalize to the same key
                let url = if i % 2 == 0 {
                    "https://www.example.com/race/"
                } else {
                    "https://example.com/race"
                };
                if visited.mark(url) {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }

        for result in futures::future::join_all(handles).await {
            result.unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(visited.len(), 1);
    }
}
