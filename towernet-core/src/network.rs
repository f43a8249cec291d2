use crate::error::{NetworkError, Result};
use crate::geo::GeoPoint;
use crate::model::{Measurement, ReferenceNode};
use crate::nearest::{Assignment, SearchStrategy, assign_all};
use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A vertex of the signal network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetworkNode {
    Reference {
        index: usize,
        position: GeoPoint,
        rated_ceiling: i32,
    },
    Measurement {
        index: usize,
        position: GeoPoint,
        signal_strength: f64,
    },
}

impl NetworkNode {
    pub fn position(&self) -> GeoPoint {
        match self {
            NetworkNode::Reference { position, .. } => *position,
            NetworkNode::Measurement { position, .. } => *position,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, NetworkNode::Reference { .. })
    }

    pub fn label(&self) -> String {
        match self {
            NetworkNode::Reference { index, .. } => format!("Tower_{}", index),
            NetworkNode::Measurement { index, .. } => format!("Signal_{}", index),
        }
    }
}

impl From<&ReferenceNode> for NetworkNode {
    fn from(r: &ReferenceNode) -> Self {
        NetworkNode::Reference {
            index: r.index,
            position: r.position,
            rated_ceiling: r.rated_ceiling,
        }
    }
}

impl From<&Measurement> for NetworkNode {
    fn from(m: &Measurement) -> Self {
        NetworkNode::Measurement {
            index: m.index,
            position: m.position,
            signal_strength: m.signal_strength,
        }
    }
}

/// An undirected weighted edge, by graph node id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub id: usize,
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Undirected graph of towers and measurements.
///
/// Reference nodes occupy node ids `0..reference_count`, measurement nodes
/// follow in input order. Every measurement is linked to its nearest
/// reference node; extra links can be added with [`Network::connect`].
#[derive(Debug, Clone)]
pub struct Network {
    graph: UnGraph<NetworkNode, f64>,
    reference_count: usize,
    measurement_count: usize,
    assignments: Vec<Assignment>,
}

impl Network {
    pub fn graph(&self) -> &UnGraph<NetworkNode, f64> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn reference_count(&self) -> usize {
        self.reference_count
    }

    pub fn measurement_count(&self) -> usize {
        self.measurement_count
    }

    pub fn reference_node(&self, index: usize) -> Option<NodeIndex> {
        (index < self.reference_count).then(|| NodeIndex::new(index))
    }

    pub fn measurement_node(&self, index: usize) -> Option<NodeIndex> {
        (index < self.measurement_count).then(|| NodeIndex::new(self.reference_count + index))
    }

    pub fn node(&self, id: NodeIndex) -> Option<&NetworkNode> {
        self.graph.node_weight(id)
    }

    /// Position of any node, for drawing.
    pub fn position(&self, id: NodeIndex) -> Option<GeoPoint> {
        self.node(id).map(NetworkNode::position)
    }

    /// Nearest-reference assignment of every measurement, in measurement order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn assignment(&self, measurement: usize) -> Option<&Assignment> {
        self.assignments.get(measurement)
    }

    pub fn edges(&self) -> impl Iterator<Item = NetworkEdge> + '_ {
        self.graph.edge_references().map(|e| NetworkEdge {
            id: e.id().index(),
            source: e.source().index(),
            target: e.target().index(),
            weight: *e.weight(),
        })
    }

    pub fn edge(&self, id: EdgeIndex) -> Option<NetworkEdge> {
        let (source, target) = self.graph.edge_endpoints(id)?;
        let weight = *self.graph.edge_weight(id)?;
        Some(NetworkEdge {
            id: id.index(),
            source: source.index(),
            target: target.index(),
            weight,
        })
    }

    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Add an extra link between two existing nodes, such as tower backhaul.
    pub fn connect(&mut self, a: NodeIndex, b: NodeIndex, weight: f64) -> Result<EdgeIndex> {
        let count = self.graph.node_count();
        for node in [a, b] {
            if node.index() >= count {
                return Err(NetworkError::UnknownNode(node.index()));
            }
        }
        if a == b {
            return Err(NetworkError::SelfLoop(a.index()));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(NetworkError::InvalidWeight(weight));
        }
        if self.graph.find_edge(a, b).is_some() {
            return Err(NetworkError::DuplicateEdge(a.index(), b.index()));
        }

        Ok(self.graph.add_edge(a, b, weight))
    }
}

/// Builds a [`Network`] from towers and measurements.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkBuilder {
    strategy: SearchStrategy,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn build(&self, references: &[ReferenceNode], measurements: &[Measurement]) -> Result<Network> {
        if references.is_empty() {
            return Err(NetworkError::EmptyReferenceSet);
        }
        let positions = references
            .iter()
            .map(|r| r.position)
            .chain(measurements.iter().map(|m| m.position));
        for position in positions {
            if !position.is_finite() {
                return Err(NetworkError::NonFiniteCoordinate {
                    longitude: position.longitude,
                    latitude: position.latitude,
                });
            }
        }
        if measurements.is_empty() {
            warn!("No measurements supplied; network will contain towers only");
        }

        let mut graph =
            UnGraph::with_capacity(references.len() + measurements.len(), measurements.len());

        for reference in references {
            graph.add_node(NetworkNode::from(reference));
        }
        for measurement in measurements {
            graph.add_node(NetworkNode::from(measurement));
        }

        let assignments = assign_all(measurements, references, self.strategy)?;

        let mut collisions = 0usize;
        for (i, assignment) in assignments.iter().enumerate() {
            if assignment.distance == 0.0 {
                collisions += 1;
            }
            graph.add_edge(
                NodeIndex::new(references.len() + i),
                NodeIndex::new(assignment.reference),
                assignment.distance,
            );
        }
        if collisions > 0 {
            warn!("{} measurements share exact coordinates with a tower", collisions);
        }

        info!(
            "Built network: {} towers, {} measurements, {} edges ({} search)",
            references.len(),
            measurements.len(),
            graph.edge_count(),
            self.strategy.as_str()
        );

        Ok(Network {
            graph,
            reference_count: references.len(),
            measurement_count: measurements.len(),
            assignments,
        })
    }
}

/// Build a network with the default linear search.
pub fn build(references: &[ReferenceNode], measurements: &[Measurement]) -> Result<Network> {
    NetworkBuilder::new().build(references, measurements)
}
