use crate::error::{NetworkError, Result};
use crate::geo::{GeoPoint, distance};
use crate::model::{Measurement, ReferenceNode};
use crate::spatial::SpatialIndex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of a nearest-node lookup: the slot of the winning reference node in
/// the input sequence and its distance from the query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub reference: usize,
    pub distance: f64,
}

/// Backend used to answer nearest-reference queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Scan every reference node for every query
    #[default]
    Linear,
    /// Query an R-tree built once over the reference nodes
    RTree,
}

impl SearchStrategy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" | "scan" => Some(SearchStrategy::Linear),
            "rtree" | "r-tree" | "index" => Some(SearchStrategy::RTree),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Linear => "linear",
            SearchStrategy::RTree => "rtree",
        }
    }
}

/// Anything that can answer "which reference node is closest to this point".
///
/// Implementations must return the exact minimum distance and, among equally
/// distant nodes, the one that comes first in input order. Reference nodes
/// with non-finite coordinates never win; a non-finite query point is an
/// error.
pub trait NearestSearch {
    fn nearest(&self, point: &GeoPoint) -> Result<Assignment>;
}

/// Brute-force search over a borrowed reference slice.
pub struct LinearScan<'a> {
    references: &'a [ReferenceNode],
}

impl<'a> LinearScan<'a> {
    pub fn new(references: &'a [ReferenceNode]) -> Self {
        Self { references }
    }
}

impl NearestSearch for LinearScan<'_> {
    fn nearest(&self, point: &GeoPoint) -> Result<Assignment> {
        if !point.is_finite() {
            return Err(NetworkError::NonFiniteCoordinate {
                longitude: point.longitude,
                latitude: point.latitude,
            });
        }

        let mut best: Option<Assignment> = None;

        for (slot, reference) in self.references.iter().enumerate() {
            if !reference.position.is_finite() {
                continue;
            }
            let d = distance(point, &reference.position);
            // Strict comparison keeps the earliest node on ties
            if best.is_none_or(|b| d < b.distance) {
                best = Some(Assignment {
                    reference: slot,
                    distance: d,
                });
            }
        }

        best.ok_or(NetworkError::EmptyReferenceSet)
    }
}

/// Find the reference node closest to `measurement`.
pub fn assign(measurement: &Measurement, references: &[ReferenceNode]) -> Result<Assignment> {
    let assignment = LinearScan::new(references).nearest(&measurement.position)?;
    if let Some(tower) = references.get(assignment.reference) {
        debug!(
            "{} -> {} ({:.6})",
            measurement.label(),
            tower.label(),
            assignment.distance
        );
    }
    Ok(assignment)
}

/// Assign every measurement in order, using the chosen backend.
///
/// The returned vector is indexed by measurement position, whatever backend
/// answered the queries.
pub fn assign_all(
    measurements: &[Measurement],
    references: &[ReferenceNode],
    strategy: SearchStrategy,
) -> Result<Vec<Assignment>> {
    if references.is_empty() {
        return Err(NetworkError::EmptyReferenceSet);
    }

    let search: Box<dyn NearestSearch + '_> = match strategy {
        SearchStrategy::Linear => Box::new(LinearScan::new(references)),
        SearchStrategy::RTree => Box::new(SpatialIndex::new(references)),
    };

    measurements
        .iter()
        .map(|m| search.nearest(&m.position))
        .collect()
}
