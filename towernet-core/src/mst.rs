use crate::network::{Network, NetworkEdge};
use petgraph::graph::EdgeIndex;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::{debug, info};

/// Minimum spanning forest of a [`Network`].
///
/// Holds edge ids into the network it was extracted from; it owns no nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanningTree {
    edges: Vec<usize>,
    total_weight: f64,
    node_count: usize,
    component_count: usize,
}

impl SpanningTree {
    pub fn edge_ids(&self) -> &[usize] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    pub fn contains(&self, edge: EdgeIndex) -> bool {
        self.edges.contains(&edge.index())
    }

    /// Resolve the tree's edges against the network they came from.
    pub fn edges<'a>(&'a self, network: &'a Network) -> impl Iterator<Item = NetworkEdge> + 'a {
        self.edges
            .iter()
            .filter_map(|&id| network.edge(EdgeIndex::new(id)))
    }
}

/// Kruskal's algorithm over the network's edge list.
///
/// Edges are taken in ascending weight; equal weights fall back to edge id so
/// the result is deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanningTreeExtractor;

impl SpanningTreeExtractor {
    pub fn new() -> Self {
        SpanningTreeExtractor
    }

    pub fn extract(&self, network: &Network) -> SpanningTree {
        let graph = network.graph();
        let node_count = graph.node_count();

        let mut candidates: Vec<(f64, usize, usize, usize)> = graph
            .edge_references()
            .map(|e| (*e.weight(), e.id().index(), e.source().index(), e.target().index()))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut forest = UnionFind::<usize>::new(node_count);
        let mut edges = Vec::with_capacity(node_count.saturating_sub(1));
        let mut total_weight = 0.0;

        for (weight, id, source, target) in candidates {
            if forest.union(source, target) {
                edges.push(id);
                total_weight += weight;
            } else {
                debug!("Skipping edge {} ({} - {}): would close a cycle", id, source, target);
            }
        }

        // Every accepted union merges two components
        let component_count = node_count - edges.len();

        info!(
            "Spanning forest: {} edges over {} nodes in {} components, total weight {:.6}",
            edges.len(),
            node_count,
            component_count,
            total_weight
        );

        SpanningTree {
            edges,
            total_weight,
            node_count,
            component_count,
        }
    }
}

pub fn extract(network: &Network) -> SpanningTree {
    SpanningTreeExtractor::new().extract(network)
}
