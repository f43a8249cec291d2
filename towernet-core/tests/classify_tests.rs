// Tests for signal classification and the analysis pipeline

use towernet_core::classify::classify;
use towernet_core::{
    AnalysisOptions, ClassifierThresholds, DEFAULT_MEDIUM_MARGIN, GeoPoint, Measurement,
    NetworkError, ReferenceNode, SearchStrategy, SignalClass, SignalClassifier,
    parse_rated_ceiling, run_analysis,
};

fn tower(ceiling: i32) -> ReferenceNode {
    ReferenceNode::new(0, GeoPoint::new(0.0, 0.0), ceiling)
}

fn reading(strength: f64) -> Measurement {
    Measurement::new(0, GeoPoint::new(1.0, 0.0), strength)
}

// ============================================================================
// Threshold Tests
// ============================================================================

#[test]
fn test_classification_boundaries() {
    let t = tower(-100);
    assert_eq!(classify(&reading(-100.0), &t), SignalClass::Weak);
    assert_eq!(classify(&reading(-99.0), &t), SignalClass::Medium);
    assert_eq!(classify(&reading(-84.0), &t), SignalClass::Medium);
    assert_eq!(classify(&reading(-83.0), &t), SignalClass::Strong);
}

#[test]
fn test_classification_far_below_and_above() {
    let t = tower(-100);
    assert_eq!(classify(&reading(-140.0), &t), SignalClass::Weak);
    assert_eq!(classify(&reading(-30.0), &t), SignalClass::Strong);
    assert_eq!(classify(&reading(-99.5), &t), SignalClass::Medium);
    assert_eq!(classify(&reading(-83.5), &t), SignalClass::Strong);
}

#[test]
fn test_default_margin() {
    assert_eq!(DEFAULT_MEDIUM_MARGIN, 16.0);
    assert_eq!(ClassifierThresholds::default().medium_margin, 16.0);
    assert_eq!(
        SignalClassifier::default().thresholds(),
        ClassifierThresholds::default()
    );
}

#[test]
fn test_custom_margin() {
    let classifier = SignalClassifier::with_margin(5.0);
    let t = tower(-100);
    assert_eq!(classifier.classify(&reading(-95.0), &t), SignalClass::Medium);
    assert_eq!(classifier.classify(&reading(-94.0), &t), SignalClass::Strong);

    // Zero margin leaves no Medium band
    let classifier = SignalClassifier::with_margin(0.0);
    assert_eq!(classifier.classify(&reading(-100.0), &t), SignalClass::Weak);
    assert_eq!(classifier.classify(&reading(-99.0), &t), SignalClass::Strong);
}

#[test]
fn test_signal_class_display() {
    assert_eq!(SignalClass::Strong.to_string(), "strong");
    assert_eq!(SignalClass::Medium.as_str(), "medium");
    assert_eq!(SignalClass::Weak.to_string(), "weak");
}

// ============================================================================
// Rated Ceiling Parsing Tests
// ============================================================================

#[test]
fn test_parse_rated_ceiling() {
    assert_eq!(parse_rated_ceiling("-100 dBm"), Ok(-100));
    assert_eq!(parse_rated_ceiling("-95dBm"), Ok(-95));
    assert_eq!(parse_rated_ceiling("  -80  "), Ok(-80));
}

#[test]
fn test_parse_rated_ceiling_invalid() {
    assert_eq!(
        parse_rated_ceiling("strong"),
        Err(NetworkError::InvalidCeiling("strong".to_string()))
    );
    assert!(parse_rated_ceiling("").is_err());
    assert!(parse_rated_ceiling("-100 mW").is_err());
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[test]
fn test_pipeline_scenario() {
    let refs = ReferenceNode::zip(&[(0.0, 0.0), (10.0, 0.0)], &[-100, -90]).unwrap();
    let ms = vec![Measurement::new(0, GeoPoint::new(1.0, 0.0), -95.0)];

    let analysis = run_analysis(&refs, &ms, AnalysisOptions::default(), None).unwrap();
    assert_eq!(analysis.classifications.len(), 1);

    let c = analysis.classifications[0];
    assert_eq!(c.reference, 0);
    assert_eq!(c.distance, 1.0);
    assert_eq!(c.ceiling, -100);
    assert_eq!(c.class, SignalClass::Medium);
    assert_eq!(analysis.tree.edge_count(), 1);
}

#[test]
fn test_pipeline_class_counts_and_coverage() {
    let refs = ReferenceNode::zip(&[(0.0, 0.0), (10.0, 0.0), (50.0, 50.0)], &[-100, -90, -95])
        .unwrap();
    let ms = vec![
        Measurement::new(0, GeoPoint::new(1.0, 0.0), -101.0),
        Measurement::new(1, GeoPoint::new(3.0, 0.0), -70.0),
        Measurement::new(2, GeoPoint::new(9.0, 0.0), -85.0),
    ];
    let options = AnalysisOptions {
        thresholds: ClassifierThresholds::default(),
        strategy: SearchStrategy::RTree,
    };

    let analysis = run_analysis(&refs, &ms, options, None).unwrap();
    let counts = analysis.class_counts();
    assert_eq!(counts.weak, 1);
    assert_eq!(counts.strong, 1);
    assert_eq!(counts.medium, 1);
    assert_eq!(counts.total(), 3);

    let coverage = analysis.coverage(&refs);
    assert_eq!(coverage.len(), 3);
    assert_eq!(coverage[0].assigned, 2);
    assert_eq!(coverage[0].mean_distance, Some(2.0));
    assert_eq!(coverage[0].max_distance, Some(3.0));
    assert_eq!(coverage[1].assigned, 1);
    assert_eq!(coverage[1].classes.medium, 1);
    assert_eq!(coverage[2].assigned, 0);
    assert_eq!(coverage[2].mean_distance, None);
}

#[test]
fn test_pipeline_reports_progress() {
    use std::sync::{Arc, Mutex};
    use towernet_core::analysis::AnalysisProgressCallback;

    let refs = ReferenceNode::zip(&[(0.0, 0.0)], &[-100]).unwrap();
    let ms = vec![Measurement::new(0, GeoPoint::new(1.0, 0.0), -95.0)];
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    let callback: AnalysisProgressCallback =
        Arc::new(move |msg: String| sink.lock().unwrap().push(msg));

    run_analysis(&refs, &ms, AnalysisOptions::default(), Some(callback)).unwrap();

    let messages = messages.lock().unwrap();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].contains("Assigning 1 measurements to 1 towers"));
}

#[test]
fn test_pipeline_empty_references() {
    let ms = vec![Measurement::new(0, GeoPoint::new(1.0, 0.0), -95.0)];
    let result = run_analysis(&[], &ms, AnalysisOptions::default(), None);
    assert!(matches!(result, Err(NetworkError::EmptyReferenceSet)));
}
