use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Insert-only directed graph of domain identifiers, shared by all crawl
/// tasks. Self-loops are kept, parallel edges are not.
#[derive(Debug, Default)]
pub struct DomainGraph {
    inner: Mutex<GraphState>,
}

#[derive(Debug, Default)]
struct GraphState {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

/// Point-in-time copy of a [`DomainGraph`], in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub vertices: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl GraphState {
    fn vertex(&mut self, id: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(id) {
            return *idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.index.insert(id.to_string(), idx);
        idx
    }
}

impl DomainGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&self, id: &str) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.vertex(id);
    }

    /// Adds `from -> to`, inserting either endpoint if missing. Endpoints and
    /// edge land under the same lock, so snapshots never see a dangling edge.
    pub fn add_edge(&self, from: &str, to: &str) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let a = state.vertex(from);
        let b = state.vertex(to);
        state.graph.update_edge(a, b, ());
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let graph = &state.graph;

        let vertices = graph.node_weights().cloned().collect();
        let edges = graph
            .edge_references()
            .map(|e| (graph[e.source()].clone(), graph[e.target()].clone()))
            .collect();

        GraphSnapshot { vertices, edges }
    }

    pub fn vertex_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .graph
            .node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .graph
            .edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_inserts_are_idempotent() {
        let graph = DomainGraph::new();
        graph.add_vertex("a.com");
        graph.add_vertex("a.com");
        graph.add_edge("a.com", "b.com");
        graph.add_edge("a.com", "b.com");
        graph.add_edge("b.com", "a.com");

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_self_loops_are_recorded() {
        let graph = DomainGraph::new();
        graph.add_edge("a.com", "a.com");

        let snapshot = graph.snapshot();
        assert_eq!(snapshot.vertices, vec!["a.com".to_string()]);
        assert_eq!(
            snapshot.edges,
            vec![("a.com".to_string(), "a.com".to_string())]
        );
    }

    #[test]
    fn test_snapshot_keeps_discovery_order() {
        let graph = DomainGraph::new();
        graph.add_edge("c.com", "a.com");
        graph.add_vertex("b.com");
        graph.add_edge("a.com", "b.com");

        let snapshot = graph.snapshot();
        assert_eq!(snapshot.vertices, vec!["c.com", "a.com", "b.com"]);
        assert_eq!(
            snapshot.edges,
            vec![
                ("c.com".to_string(), "a.com".to_string()),
                ("a.com".to_string(), "b.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_concurrent_inserts_never_tear_edges() {
        let graph = Arc::new(DomainGraph::new());

        let writers: Vec<_> = (0..8)
            .map(|t| {
                let graph = graph.clone();
                std::thread::spawn(move || {
                    for i in 0..200 {
                        graph.add_edge(&format!("site{}.com", t), &format!("site{}.com", i % 50));
                    }
                })
            })
            .collect();

        // Snapshot while writers are still going
        for _ in 0..20 {
            let snapshot = graph.snapshot();
            let vertices: HashSet<_> = snapshot.vertices.iter().collect();
            for (from, to) in &snapshot.edges {
                assert!(vertices.contains(from), "edge source {} missing", from);
                assert!(vertices.contains(to), "edge target {} missing", to);
            }
        }

        for writer in writers {
            writer.join().unwrap();
        }

        let snapshot = graph.snapshot();
        assert_eq!(snapshot.vertices.len(), 50);
        assert_eq!(snapshot.edges.len(), 8 * 50);
    }
}
