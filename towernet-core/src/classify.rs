use crate::model::{Measurement, ReferenceNode};
use serde::{Deserialize, Serialize};

/// Width of the Medium band above a tower's rated ceiling, in dBm.
pub const DEFAULT_MEDIUM_MARGIN: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalClass {
    Strong,
    Medium,
    Weak,
}

impl SignalClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalClass::Strong => "strong",
            SignalClass::Medium => "medium",
            SignalClass::Weak => "weak",
        }
    }
}

impl std::fmt::Display for SignalClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierThresholds {
    pub medium_margin: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            medium_margin: DEFAULT_MEDIUM_MARGIN,
        }
    }
}

/// Labels readings against the rated ceiling of their tower.
///
/// `observed <= ceiling` is Weak, `observed <= ceiling + margin` is Medium,
/// anything above is Strong.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalClassifier {
    thresholds: ClassifierThresholds,
}

impl SignalClassifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn with_margin(medium_margin: f64) -> Self {
        Self::new(ClassifierThresholds { medium_margin })
    }

    pub fn thresholds(&self) -> ClassifierThresholds {
        self.thresholds
    }

    pub fn classify_value(&self, observed: f64, ceiling: i32) -> SignalClass {
        let ceiling = f64::from(ceiling);
        if observed <= ceiling {
            SignalClass::Weak
        } else if observed <= ceiling + self.thresholds.medium_margin {
            SignalClass::Medium
        } else {
            SignalClass::Strong
        }
    }

    pub fn classify(&self, measurement: &Measurement, nearest: &ReferenceNode) -> SignalClass {
        self.classify_value(measurement.signal_strength, nearest.rated_ceiling)
    }
}

/// Classify with the default margin.
pub fn classify(measurement: &Measurement, nearest: &ReferenceNode) -> SignalClass {
    SignalClassifier::default().classify(measurement, nearest)
}
