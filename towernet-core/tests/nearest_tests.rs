// Tests for nearest-tower assignment

use towernet_core::nearest::{LinearScan, NearestSearch, assign_all};
use towernet_core::spatial::SpatialIndex;
use towernet_core::{
    GeoPoint, Measurement, NetworkError, ReferenceNode, SearchStrategy, assign, distance,
};

fn towers() -> Vec<ReferenceNode> {
    vec![
        ReferenceNode::new(0, GeoPoint::new(0.0, 0.0), -100),
        ReferenceNode::new(1, GeoPoint::new(10.0, 0.0), -90),
    ]
}

fn reading(index: usize, lon: f64, lat: f64, strength: f64) -> Measurement {
    Measurement::new(index, GeoPoint::new(lon, lat), strength)
}

// ============================================================================
// Distance Tests
// ============================================================================

#[test]
fn test_distance_is_planar_euclidean() {
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(3.0, 4.0);
    assert_eq!(distance(&a, &b), 5.0);
    assert_eq!(a.distance(&b), 5.0);
}

#[test]
fn test_distance_symmetric_and_zero_on_self() {
    let a = GeoPoint::new(106.15, -6.12);
    let b = GeoPoint::new(105.98, -6.45);
    assert_eq!(distance(&a, &b), distance(&b, &a));
    assert_eq!(distance(&a, &a), 0.0);
}

// ============================================================================
// Linear Assignment Tests
// ============================================================================

#[test]
fn test_assign_scenario() {
    let m = reading(0, 1.0, 0.0, -95.0);
    let a = assign(&m, &towers()).unwrap();
    assert_eq!(a.reference, 0);
    assert_eq!(a.distance, 1.0);
}

#[test]
fn test_assign_is_deterministic() {
    let refs = towers();
    let m = reading(0, 6.3, 2.1, -80.0);
    let first = assign(&m, &refs).unwrap();
    for _ in 0..10 {
        assert_eq!(assign(&m, &refs).unwrap(), first);
    }
}

#[test]
fn test_assign_tie_prefers_lower_index() {
    let m = reading(0, 5.0, 0.0, -95.0);
    let a = assign(&m, &towers()).unwrap();
    assert_eq!(a.reference, 0);
    assert_eq!(a.distance, 5.0);

    // Same geometry, reversed input order
    let reversed = vec![
        ReferenceNode::new(0, GeoPoint::new(10.0, 0.0), -90),
        ReferenceNode::new(1, GeoPoint::new(0.0, 0.0), -100),
    ];
    let a = assign(&m, &reversed).unwrap();
    assert_eq!(a.reference, 0);
}

#[test]
fn test_assign_empty_reference_set() {
    for m in [reading(0, 0.0, 0.0, -90.0), reading(1, 100.0, -5.0, -50.0)] {
        let result = assign(&m, &[]);
        assert_eq!(result, Err(NetworkError::EmptyReferenceSet));
    }
}

#[test]
fn test_assign_exact_collision_has_zero_distance() {
    let m = reading(0, 10.0, 0.0, -70.0);
    let a = assign(&m, &towers()).unwrap();
    assert_eq!(a.reference, 1);
    assert_eq!(a.distance, 0.0);
}

#[test]
fn test_assign_returns_true_minimum() {
    let refs: Vec<ReferenceNode> = (0..20)
        .map(|i| {
            let x = (i as f64 * 1.7) % 9.0;
            let y = (i as f64 * 3.1) % 7.0;
            ReferenceNode::new(i, GeoPoint::new(x, y), -100)
        })
        .collect();
    let m = reading(0, 4.2, 3.3, -90.0);
    let a = assign(&m, &refs).unwrap();

    let expected = refs
        .iter()
        .map(|r| distance(&r.position, &m.position))
        .fold(f64::INFINITY, f64::min);
    assert_eq!(a.distance, expected);
    assert!(a.reference < refs.len());
}

// ============================================================================
// Backend Equivalence Tests
// ============================================================================

#[test]
fn test_assign_all_empty_references() {
    let ms = vec![reading(0, 1.0, 1.0, -90.0)];
    for strategy in [SearchStrategy::Linear, SearchStrategy::RTree] {
        assert_eq!(
            assign_all(&ms, &[], strategy),
            Err(NetworkError::EmptyReferenceSet)
        );
    }
}

#[test]
fn test_assign_all_preserves_measurement_order() {
    let refs = towers();
    let ms = vec![
        reading(0, 9.0, 0.0, -80.0),
        reading(1, 1.0, 0.0, -80.0),
        reading(2, 8.0, 1.0, -80.0),
    ];
    let result = assign_all(&ms, &refs, SearchStrategy::RTree).unwrap();
    let picked: Vec<usize> = result.iter().map(|a| a.reference).collect();
    assert_eq!(picked, vec![1, 0, 1]);
}

#[test]
fn test_rtree_matches_linear_scan() {
    let refs: Vec<ReferenceNode> = (0..50)
        .map(|i| {
            let x = ((i * 37) % 101) as f64 / 10.0;
            let y = ((i * 53) % 89) as f64 / 10.0;
            ReferenceNode::new(i, GeoPoint::new(x, y), -100)
        })
        .collect();
    let ms: Vec<Measurement> = (0..200)
        .map(|i| {
            let x = ((i * 17) % 113) as f64 / 11.0;
            let y = ((i * 29) % 97) as f64 / 11.0;
            reading(i, x, y, -90.0)
        })
        .collect();

    let linear = assign_all(&ms, &refs, SearchStrategy::Linear).unwrap();
    let indexed = assign_all(&ms, &refs, SearchStrategy::RTree).unwrap();
    assert_eq!(linear, indexed);
}

#[test]
fn test_rtree_tie_break_matches_linear() {
    // Four towers on a square; the centre is equidistant from all of them
    let refs = vec![
        ReferenceNode::new(0, GeoPoint::new(2.0, 2.0), -100),
        ReferenceNode::new(1, GeoPoint::new(0.0, 0.0), -100),
        ReferenceNode::new(2, GeoPoint::new(2.0, 0.0), -100),
        ReferenceNode::new(3, GeoPoint::new(0.0, 2.0), -100),
    ];
    let centre = GeoPoint::new(1.0, 1.0);

    let linear = LinearScan::new(&refs).nearest(&centre).unwrap();
    let indexed = SpatialIndex::new(&refs).nearest(&centre).unwrap();
    assert_eq!(linear.reference, 0);
    assert_eq!(indexed, linear);
}

#[test]
fn test_search_strategy_from_str() {
    assert_eq!(SearchStrategy::from_str("linear"), Some(SearchStrategy::Linear));
    assert_eq!(SearchStrategy::from_str("RTREE"), Some(SearchStrategy::RTree));
    assert_eq!(SearchStrategy::from_str("r-tree"), Some(SearchStrategy::RTree));
    assert_eq!(SearchStrategy::from_str("kdtree"), None);
    assert_eq!(SearchStrategy::default(), SearchStrategy::Linear);
}

// ============================================================================
// Non-finite Coordinate Tests
// ============================================================================

#[test]
fn test_nan_tower_never_wins() {
    let refs = vec![
        ReferenceNode::new(0, GeoPoint::new(f64::NAN, 0.0), -100),
        ReferenceNode::new(1, GeoPoint::new(0.0, 0.0), -100),
        ReferenceNode::new(2, GeoPoint::new(5.0, 0.0), -100),
    ];
    let ms = vec![reading(0, 1.0, 0.0, -90.0)];

    let linear = assign_all(&ms, &refs, SearchStrategy::Linear).unwrap();
    let indexed = assign_all(&ms, &refs, SearchStrategy::RTree).unwrap();
    assert_eq!(linear[0].reference, 1);
    assert_eq!(linear[0].distance, 1.0);
    assert_eq!(linear, indexed);
}

#[test]
fn test_only_non_finite_towers() {
    let refs = vec![ReferenceNode::new(0, GeoPoint::new(f64::NAN, f64::NAN), -100)];
    let m = reading(0, 1.0, 0.0, -90.0);
    assert_eq!(assign(&m, &refs), Err(NetworkError::EmptyReferenceSet));
    assert_eq!(
        SpatialIndex::new(&refs).nearest(&m.position),
        Err(NetworkError::EmptyReferenceSet)
    );
}

#[test]
fn test_non_finite_query_is_rejected() {
    let refs = towers();
    let m = reading(0, f64::NAN, 0.0, -90.0);
    for strategy in [SearchStrategy::Linear, SearchStrategy::RTree] {
        assert!(matches!(
            assign_all(&[m], &refs, strategy),
            Err(NetworkError::NonFiniteCoordinate { .. })
        ));
    }
}
