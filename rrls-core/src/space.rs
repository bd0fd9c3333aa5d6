//! Action spaces.
use crate::error::RrlsError;
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A box in `R^n`, the product of closed intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    low: Vec<f32>,
    high: Vec<f32>,
}

impl BoxSpace {
    /// Constructs a box from its lower and upper corners.
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Result<Self> {
        if low.len() != high.len() {
            return Err(RrlsError::DimensionMismatch {
                what: "box corners".to_string(),
                expected: low.len(),
                got: high.len(),
            }
            .into());
        }
        Ok(Self { low, high })
    }

    /// Constructs the box `[low, high]^dim`.
    pub fn uniform(dim: usize, low: f32, high: f32) -> Self {
        Self {
            low: vec![low; dim],
            high: vec![high; dim],
        }
    }

    /// Dimension of the box.
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    /// Lower corner.
    pub fn low(&self) -> &[f32] {
        &self.low
    }

    /// Upper corner.
    pub fn high(&self) -> &[f32] {
        &self.high
    }

    /// Returns `true` if `x` lies in the box.
    pub fn contains(&self, x: &[f32]) -> bool {
        x.len() == self.dim()
            && x
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(x, (l, h))| l <= x && x <= h)
    }

    /// Samples a point uniformly from the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f32> {
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(l, h)| if l < h { rng.gen_range(*l..=*h) } else { *l })
            .collect()
    }
}

/// The action space of a two-player environment: the agent's and the adversary's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSpace {
    /// Space of the agent's action.
    pub agent: BoxSpace,

    /// Space of the adversary's action.
    pub adversary: BoxSpace,
}

impl PairSpace {
    /// Constructs the pair.
    pub fn new(agent: BoxSpace, adversary: BoxSpace) -> Self {
        Self { agent, adversary }
    }

    /// Samples both actions uniformly.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<f32>, Vec<f32>) {
        (self.agent.sample(rng), self.adversary.sample(rng))
    }
}
