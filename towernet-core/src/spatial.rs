use crate::error::{NetworkError, Result};
use crate::geo::{GeoPoint, distance};
use crate::model::ReferenceNode;
use crate::nearest::{Assignment, NearestSearch};
use rstar::RTree;
use rstar::primitives::GeomWithData;

/// A tower position tagged with its slot in the input sequence.
type IndexedTower = GeomWithData<[f64; 2], usize>;

/// R-tree over reference node positions.
///
/// Answers exactly what [`crate::nearest::LinearScan`] answers, including the
/// first-in-input-order tie-break. Towers with non-finite coordinates are
/// left out of the index, as the linear scan skips them.
pub struct SpatialIndex {
    tree: RTree<IndexedTower>,
}

impl SpatialIndex {
    pub fn new(references: &[ReferenceNode]) -> Self {
        let towers: Vec<IndexedTower> = references
            .iter()
            .enumerate()
            .filter(|(_, r)| r.position.is_finite())
            .map(|(slot, r)| {
                GeomWithData::new([r.position.longitude, r.position.latitude], slot)
            })
            .collect();

        SpatialIndex {
            tree: RTree::bulk_load(towers),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl NearestSearch for SpatialIndex {
    fn nearest(&self, point: &GeoPoint) -> Result<Assignment> {
        if !point.is_finite() {
            return Err(NetworkError::NonFiniteCoordinate {
                longitude: point.longitude,
                latitude: point.latitude,
            });
        }

        let mut best: Option<Assignment> = None;

        // Candidates arrive in ascending squared distance; keep reading while
        // they tie with the best planar distance so the lowest slot wins
        for (tower, _) in self
            .tree
            .nearest_neighbor_iter_with_distance_2(&[point.longitude, point.latitude])
        {
            let [longitude, latitude] = *tower.geom();
            let d = distance(point, &GeoPoint::new(longitude, latitude));
            match best {
                None => {
                    best = Some(Assignment {
                        reference: tower.data,
                        distance: d,
                    })
                }
                Some(b) if d == b.distance => {
                    if tower.data < b.reference {
                        best = Some(Assignment {
                            reference: tower.data,
                            distance: d,
                        });
                    }
                }
                Some(_) => break,
            }
        }

        best.ok_or(NetworkError::EmptyReferenceSet)
    }
}
