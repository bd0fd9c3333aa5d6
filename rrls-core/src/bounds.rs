//! Bounds of physical parameters.
use crate::{error::RrlsError, ParamUpdate};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maps a normalized value `v` in `[-1, 1]` to the interval `[low, high]`.
///
/// The map is `low + (v + 1) * (high - low) / 2`, thus `-1` goes to `low`,
/// `0` to the midpoint and `1` to `high`. Values outside of `[-1, 1]` are
/// extrapolated, not clamped.
#[inline]
pub fn denormalize(v: f64, low: f64, high: f64) -> f64 {
    low + (v + 1.0) * (high - low) / 2.0
}

/// The closed interval of values of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamBound {
    /// Name of the parameter.
    pub name: String,

    /// Lower end, inclusive.
    pub low: f64,

    /// Upper end, inclusive.
    pub high: f64,
}

impl ParamBound {
    /// Constructs a bound.
    pub fn new(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self {
            name: name.into(),
            low,
            high,
        }
    }

    /// See [`denormalize`].
    pub fn denormalize(&self, v: f64) -> f64 {
        denormalize(v, self.low, self.high)
    }

    /// Midpoint of the interval.
    pub fn midpoint(&self) -> f64 {
        self.denormalize(0.0)
    }
}

/// An ordered mapping from parameter names to closed intervals.
///
/// The order of insertion is kept; it defines the layout of the adversarial action
/// and the iteration order of evaluation meshes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamBounds(Vec<ParamBound>);

impl ParamBounds {
    /// Creates empty bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates bounds from `(name, low, high)` triples.
    pub fn from_slice(s: &[(&str, f64, f64)]) -> Self {
        Self(
            s.iter()
                .map(|(name, low, high)| ParamBound::new(*name, *low, *high))
                .collect(),
        )
    }

    /// Adds a bound. An existing bound of the same name is replaced in place.
    pub fn with(mut self, name: impl Into<String>, low: f64, high: f64) -> Self {
        let bound = ParamBound::new(name, low, high);
        match self.0.iter_mut().find(|b| b.name == bound.name) {
            Some(b) => *b = bound,
            None => self.0.push(bound),
        }
        self
    }

    /// Returns the bound of `name`.
    pub fn get(&self, name: &str) -> Option<&ParamBound> {
        self.0.iter().find(|b| b.name == name)
    }

    /// Returns an iterator over the bounds.
    pub fn iter(&self) -> std::slice::Iter<'_, ParamBound> {
        self.0.iter()
    }

    /// Returns an iterator over the parameter names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|b| b.name.as_str())
    }

    /// The number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there is no parameter.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every parameter in `self` is also in `other`.
    pub fn is_subset_of(&self, other: &ParamBounds) -> bool {
        let names: HashSet<_> = other.names().collect();
        self.names().all(|n| names.contains(n))
    }

    /// Checks that every interval is finite with `low <= high` and that names are unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for b in self.0.iter() {
            if !(b.low.is_finite() && b.high.is_finite() && b.low <= b.high) {
                return Err(RrlsError::InvalidBounds {
                    name: b.name.clone(),
                    low: b.low,
                    high: b.high,
                }
                .into());
            }
            if !seen.insert(b.name.as_str()) {
                return Err(RrlsError::InvalidBounds {
                    name: format!("{} (duplicated)", b.name),
                    low: b.low,
                    high: b.high,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Maps a normalized vector, one component per parameter in order, to parameter values.
    pub fn denormalize(&self, v: &[f32]) -> Result<ParamUpdate> {
        if v.len() != self.len() {
            return Err(RrlsError::DimensionMismatch {
                what: "normalized parameter vector".to_string(),
                expected: self.len(),
                got: v.len(),
            }
            .into());
        }
        Ok(self
            .0
            .iter()
            .zip(v.iter())
            .map(|(b, v)| (b.name.clone(), b.denormalize(*v as f64)))
            .collect())
    }
}

impl<'a> IntoIterator for &'a ParamBounds {
    type Item = &'a ParamBound;
    type IntoIter = std::slice::Iter<'a, ParamBound>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_denormalize_end_points() {
        let (low, high) = (0.1, 3.0);
        assert_eq!(denormalize(-1.0, low, high), low);
        assert!((denormalize(1.0, low, high) - high).abs() < 1e-12);
        assert!((denormalize(0.0, low, high) - (low + high) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_denormalize_is_monotone() {
        let (low, high) = (1.0, 31.0);
        let values: Vec<f64> = (0..=200)
            .map(|i| denormalize(-1.0 + i as f64 / 100.0, low, high))
            .collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_denormalize_vector_follows_insertion_order() -> Result<()> {
        let bounds = ParamBounds::new()
            .with("torsomass", 0.1, 7.0)
            .with("worldfriction", 0.1, 4.0);
        let update = bounds.denormalize(&[-1.0, 1.0])?;
        assert_eq!(update.get("torsomass"), Some(0.1));
        assert!((update.get("worldfriction").unwrap() - 4.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_denormalize_rejects_wrong_length() {
        let bounds = ParamBounds::from_slice(&[("polemass", 1.0, 31.0)]);
        assert!(bounds.denormalize(&[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(ParamBounds::from_slice(&[("a", 0.0, 1.0), ("b", 2.0, 2.0)])
            .validate()
            .is_ok());
        assert!(ParamBounds::from_slice(&[("a", 1.0, 0.0)]).validate().is_err());
        assert!(ParamBounds::from_slice(&[("a", 0.0, f64::NAN)])
            .validate()
            .is_err());
    }

    #[test]
    fn test_subset() {
        let one = ParamBounds::from_slice(&[("torsomass", 0.1, 16.0)]);
        let two = one.clone().with("rightfootmass", 0.1, 8.0);
        assert!(one.is_subset_of(&two));
        assert!(!two.is_subset_of(&one));
    }
}
