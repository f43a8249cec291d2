use crate::classify::{ClassifierThresholds, SignalClass, SignalClassifier};
use crate::error::Result;
use crate::model::{Measurement, ReferenceNode};
use crate::mst::{SpanningTree, SpanningTreeExtractor};
use crate::nearest::SearchStrategy;
use crate::network::{Network, NetworkBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Options for configuring an analysis run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub thresholds: ClassifierThresholds,
    pub strategy: SearchStrategy,
}

/// Callback for reporting pipeline progress
pub type AnalysisProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Label of a single measurement together with what it was judged against.
///
/// `slot` and `reference` are positions in the input sequences;
/// `measurement` is the caller's own id for the reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub slot: usize,
    pub measurement: usize,
    pub reference: usize,
    pub distance: f64,
    pub observed: f64,
    pub ceiling: i32,
    pub class: SignalClass,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub strong: usize,
    pub medium: usize,
    pub weak: usize,
}

impl ClassCounts {
    pub fn record(&mut self, class: SignalClass) {
        match class {
            SignalClass::Strong => self.strong += 1,
            SignalClass::Medium => self.medium += 1,
            SignalClass::Weak => self.weak += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.strong + self.medium + self.weak
    }
}

/// Per-tower summary of the measurements assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerCoverage {
    pub reference: usize,
    pub label: String,
    pub rated_ceiling: i32,
    pub assigned: usize,
    pub mean_distance: Option<f64>,
    pub max_distance: Option<f64>,
    pub classes: ClassCounts,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct NetworkAnalysis {
    pub network: Network,
    pub tree: SpanningTree,
    pub classifications: Vec<Classification>,
    pub options: AnalysisOptions,
}

impl NetworkAnalysis {
    pub fn class_counts(&self) -> ClassCounts {
        let mut counts = ClassCounts::default();
        for c in &self.classifications {
            counts.record(c.class);
        }
        counts
    }

    pub fn coverage(&self, references: &[ReferenceNode]) -> Vec<TowerCoverage> {
        let mut coverage: Vec<TowerCoverage> = references
            .iter()
            .enumerate()
            .map(|(slot, r)| TowerCoverage {
                reference: slot,
                label: r.label(),
                rated_ceiling: r.rated_ceiling,
                assigned: 0,
                mean_distance: None,
                max_distance: None,
                classes: ClassCounts::default(),
            })
            .collect();

        let mut distance_sums = vec![0.0; references.len()];
        for c in &self.classifications {
            let Some(entry) = coverage.get_mut(c.reference) else {
                continue;
            };
            entry.assigned += 1;
            entry.classes.record(c.class);
            entry.max_distance = Some(entry.max_distance.map_or(c.distance, |m| m.max(c.distance)));
            distance_sums[c.reference] += c.distance;
        }

        for (entry, sum) in coverage.iter_mut().zip(distance_sums) {
            if entry.assigned > 0 {
                entry.mean_distance = Some(sum / entry.assigned as f64);
            }
        }

        coverage
    }
}

/// Classify every measurement against the tower it was assigned to.
pub fn classify_measurements(
    network: &Network,
    references: &[ReferenceNode],
    measurements: &[Measurement],
    classifier: &SignalClassifier,
) -> Vec<Classification> {
    measurements
        .iter()
        .zip(network.assignments())
        .enumerate()
        .filter_map(|(slot, (m, a))| {
            let reference = references.get(a.reference)?;
            Some(Classification {
                slot,
                measurement: m.index,
                reference: a.reference,
                distance: a.distance,
                observed: m.signal_strength,
                ceiling: reference.rated_ceiling,
                class: classifier.classify(m, reference),
            })
        })
        .collect()
}

/// Run the whole pipeline: build the network, extract its spanning forest and
/// classify every measurement.
pub fn run_analysis(
    references: &[ReferenceNode],
    measurements: &[Measurement],
    options: AnalysisOptions,
    progress_callback: Option<AnalysisProgressCallback>,
) -> Result<NetworkAnalysis> {
    let report = |msg: String| {
        if let Some(ref callback) = progress_callback {
            callback(msg);
        }
    };

    report(format!(
        "Assigning {} measurements to {} towers...",
        measurements.len(),
        references.len()
    ));
    let network = NetworkBuilder::new()
        .with_strategy(options.strategy)
        .build(references, measurements)?;

    report("Extracting spanning tree...".to_string());
    let tree = SpanningTreeExtractor::new().extract(&network);

    report("Classifying measurements...".to_string());
    let classifier = SignalClassifier::new(options.thresholds);
    let classifications = classify_measurements(&network, references, measurements, &classifier);

    let analysis = NetworkAnalysis {
        network,
        tree,
        classifications,
        options,
    };

    let counts = analysis.class_counts();
    info!(
        "Classified {} measurements: {} strong, {} medium, {} weak",
        counts.total(),
        counts.strong,
        counts.medium,
        counts.weak
    );

    Ok(analysis)
}
