use crate::error::{NetworkError, Result};
use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// An infrastructure node (tower) with its rated signal ceiling in dBm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceNode {
    pub index: usize,
    pub position: GeoPoint,
    pub rated_ceiling: i32,
}

impl ReferenceNode {
    pub fn new(index: usize, position: GeoPoint, rated_ceiling: i32) -> Self {
        Self {
            index,
            position,
            rated_ceiling,
        }
    }

    /// Build combined records from separately sourced coordinate and ceiling
    /// lists. Both lists must have the same length.
    pub fn zip(coordinates: &[(f64, f64)], ceilings: &[i32]) -> Result<Vec<ReferenceNode>> {
        if coordinates.len() != ceilings.len() {
            return Err(NetworkError::MisalignedInput {
                coordinates: coordinates.len(),
                ceilings: ceilings.len(),
            });
        }

        Ok(coordinates
            .iter()
            .zip(ceilings)
            .enumerate()
            .map(|(index, (&coord, &ceiling))| ReferenceNode::new(index, coord.into(), ceiling))
            .collect())
    }

    pub fn label(&self) -> String {
        format!("Tower_{}", self.index)
    }
}

/// An observed signal reading at a position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub index: usize,
    pub position: GeoPoint,
    pub signal_strength: f64,
}

impl Measurement {
    pub fn new(index: usize, position: GeoPoint, signal_strength: f64) -> Self {
        Self {
            index,
            position,
            signal_strength,
        }
    }

    pub fn label(&self) -> String {
        format!("Signal_{}", self.index)
    }
}

/// Parse a rated ceiling such as `"-100 dBm"` or `"-95"`.
pub fn parse_rated_ceiling(raw: &str) -> Result<i32> {
    let trimmed = raw.trim();
    let number = trimmed
        .strip_suffix("dBm")
        .or_else(|| trimmed.strip_suffix("dbm"))
        .unwrap_or(trimmed)
        .trim();

    number
        .parse::<i32>()
        .map_err(|_| NetworkError::InvalidCeiling(raw.to_string()))
}
