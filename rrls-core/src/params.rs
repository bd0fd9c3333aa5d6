//! Parameter sets and partial updates.
use crate::{
    error::RrlsError,
    record::{Record, RecordValue},
    Info,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap};

/// The full set of physical parameters of an environment.
///
/// Entries keep the order in which the environment declares its parameters.
/// An unset entry (`None`) means the simulator uses its nominal value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamSet(Vec<(String, Option<f64>)>);

impl ParamSet {
    /// Creates a set with all the given parameters unset.
    pub fn unset<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self(names.into_iter().map(|n| (n.to_string(), None)).collect())
    }

    /// Returns `Some(value)` if `name` is a parameter of the set.
    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Returns the value of `name`, `None` if it is unset or unknown.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).flatten()
    }

    /// Returns `true` if `name` is a parameter of the set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    /// Sets the value of a parameter.
    pub fn set(&mut self, name: &str, value: Option<f64>) -> Result<()> {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                *v = value;
                Ok(())
            }
            None => Err(RrlsError::UnknownParameter(name.to_string()).into()),
        }
    }

    /// Returns an iterator over the names of the parameters.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// The number of parameters in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set has no parameter.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the set entries having a value.
    pub fn to_update(&self) -> ParamUpdate {
        self.0
            .iter()
            .filter_map(|(n, v)| v.map(|v| (n.clone(), v)))
            .collect()
    }

    /// Converts the set entries having a value into scalar records.
    ///
    /// Unset parameters are not written.
    pub fn to_record(&self) -> Record {
        let mut record = Record::empty();
        for (name, value) in self.iter() {
            if let Some(v) = value {
                record.insert(name, RecordValue::Scalar(v as f32));
            }
        }
        record
    }
}

impl Info for ParamSet {}

/// A partial assignment of parameter values.
///
/// Parameters not in the update keep their current value when applied
/// with [`merge`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamUpdate(BTreeMap<String, f64>);

impl ParamUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to the update.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Inserts a value into the update.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// Returns the value of `name` in the update.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Returns an iterator over the names and values in the update.
    pub fn iter(&self) -> btree_map::Iter<'_, String, f64> {
        self.0.iter()
    }

    /// Returns an iterator over the names in the update.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// The number of values in the update.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the update has no value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the update into scalar records.
    pub fn to_record(&self) -> Record {
        let mut record = Record::empty();
        for (name, v) in self.iter() {
            record.insert(name.as_str(), RecordValue::Scalar(*v as f32));
        }
        record
    }
}

impl FromIterator<(String, f64)> for ParamUpdate {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ParamUpdate {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

/// Merges a partial update into a parameter set.
///
/// For every parameter of `previous`, the value in `overrides` wins; without an
/// override the previous value is kept; an unset previous value falls back to the
/// value in `defaults`. The result has the parameters of `previous` in the same order.
///
/// Names in `overrides` unknown to `previous` are rejected with
/// [`RrlsError::UnknownParameter`].
pub fn merge(
    previous: &ParamSet,
    overrides: &ParamUpdate,
    defaults: &ParamSet,
) -> Result<ParamSet> {
    if let Some(name) = overrides.names().find(|n| !previous.contains(n)) {
        return Err(RrlsError::UnknownParameter(name.to_string()).into());
    }

    Ok(ParamSet(
        previous
            .iter()
            .map(|(name, prev)| {
                let v = overrides
                    .get(name)
                    .or(prev)
                    .or_else(|| defaults.value(name));
                (name.to_string(), v)
            })
            .collect(),
    ))
}
