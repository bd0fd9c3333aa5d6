//! Configuration of [`RobustEnv`](crate::RobustEnv).
use crate::Task;
use anyhow::Result;
use rrls_core::ParamUpdate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`RobustEnv`](crate::RobustEnv).
///
/// `C` is the configuration of the [`Simulator`](crate::Simulator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobustEnvConfig<C> {
    /// Task.
    pub task: Task,

    /// Parameters given at construction.
    ///
    /// They are the fallback of parameters left unset by later updates.
    pub params: ParamUpdate,

    /// Episodes are truncated after this number of steps.
    pub max_steps: Option<usize>,

    /// Configuration of the simulator.
    pub sim: C,
}

impl<C: Default> Default for RobustEnvConfig<C> {
    fn default() -> Self {
        Self {
            task: Task::HalfCheetah,
            params: ParamUpdate::new(),
            max_steps: Some(1000),
            sim: C::default(),
        }
    }
}

impl<C: Default> RobustEnvConfig<C> {
    /// Creates a configuration of `task` with default values.
    pub fn new(task: Task) -> Self {
        Self::default().task(task)
    }
}

impl<C> RobustEnvConfig<C> {
    /// Sets the task.
    pub fn task(mut self, v: Task) -> Self {
        self.task = v;
        self
    }

    /// Sets the parameters given at construction.
    pub fn params(mut self, v: ParamUpdate) -> Self {
        self.params = v;
        self
    }

    /// Sets a single parameter given at construction.
    pub fn param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Sets the maximum number of steps of an episode.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the configuration of the simulator.
    pub fn sim(mut self, v: C) -> Self {
        self.sim = v;
        self
    }
}

impl<C: Serialize + DeserializeOwned> RobustEnvConfig<C> {
    /// Constructs [`RobustEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RobustEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
