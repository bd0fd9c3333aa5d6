//! The `info` channel of environments.
//!
//! Every call to [`Env::step`](crate::Env::step) and [`Env::reset`](crate::Env::reset)
//! returns a [`Record`]. Environments write their current physical parameters into it
//! and wrappers add their own entries, e.g., the adversarial reward, so that a logger
//! can tell which physical configuration produced a transition.
//!
//! ```rust
//! use rrls_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("torsomass", 2.5);
//! record.insert("adversarial_reward", RecordValue::Scalar(1.0));
//! record.insert("agent action", RecordValue::Array1(vec![0.1, -0.3]));
//! assert_eq!(record.get_scalar("torsomass").unwrap(), 2.5);
//! ```
use crate::error::RrlsError;
use std::collections::{btree_map, BTreeMap};

/// A value of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A parameter, a reward.
    Scalar(f32),

    /// An action.
    Array1(Vec<f32>),
}

/// String-keyed values, sorted by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(BTreeMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a record with a single scalar.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        let mut record = Self::empty();
        record.insert(name, RecordValue::Scalar(value));
        record
    }

    /// Inserts a value, replacing the previous one of the key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Iterates over the entries in the order of the keys.
    pub fn iter(&self) -> btree_map::Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Value of the key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Moves the entries of `record` into this one. Entries of `record` win on
    /// duplicated keys.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Scalar value of the key.
    pub fn get_scalar(&self, k: &str) -> Result<f32, RrlsError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(RrlsError::RecordValueTypeError("Scalar".to_string())),
            None => Err(RrlsError::RecordKeyError(k.to_string())),
        }
    }

    /// Array value of the key.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, RrlsError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(RrlsError::RecordValueTypeError("Array1".to_string())),
            None => Err(RrlsError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns `true` if the record has no entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Destination of records.
pub trait Recorder {
    /// Writes a record.
    fn write(&mut self, record: Record);
}

/// Keeps records in memory, e.g., the steps of an evaluation run.
#[derive(Debug, Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
}

impl BufferedRecorder {
    /// Constructs an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over the records in the order they were written.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.buf.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}
