//! Observation and action made of a flat `f32` vector.
use crate::{error::RrlsError, Act, Obs};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Observation as a flat vector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayObs(pub Vec<f32>);

impl Obs for ArrayObs {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<f32>> for ArrayObs {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}

/// Continuous action as a flat vector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContinuousAct(pub Vec<f32>);

impl Act for ContinuousAct {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<f32>> for ContinuousAct {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}

impl ContinuousAct {
    /// Returns `(1 - alpha) * self + alpha * other`, element-wise.
    pub fn blend(&self, other: &ContinuousAct, alpha: f32) -> Result<ContinuousAct> {
        if self.len() != other.len() {
            return Err(RrlsError::DimensionMismatch {
                what: "blended actions".to_string(),
                expected: self.len(),
                got: other.len(),
            }
            .into());
        }
        Ok(Self(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| (1.0 - alpha) * a + alpha * b)
                .collect(),
        ))
    }
}
