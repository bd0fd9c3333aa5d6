//! Interface to the physics simulator running a task.
use crate::{PhysicsModel, Task};
use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Outcome of a simulator step.
#[derive(Debug, Clone, PartialEq)]
pub struct SimStep {
    /// Observation after the step.
    pub obs: Vec<f32>,

    /// Reward of the task.
    pub reward: f32,

    /// The task reached a terminal state.
    pub is_terminated: bool,
}

/// A physics simulator running one of the [`Task`]s.
///
/// The simulator owns the dynamics, the reward and the termination condition of the
/// task. [`RobustEnv`](crate::RobustEnv) only writes parameter values into the arrays
/// exposed by [`Simulator::model_mut`] and drives episodes.
pub trait Simulator {
    /// Configuration.
    type Config: Clone + Default + Serialize + DeserializeOwned;

    /// Builds a simulator for `task`.
    fn build(task: Task, config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Arrays of the model.
    fn model(&self) -> &PhysicsModel;

    /// Mutable arrays of the model.
    ///
    /// Changes take effect from the next call of [`Simulator::step`].
    fn model_mut(&mut self) -> &mut PhysicsModel;

    /// Resets the state of the simulation and returns the initial observation.
    ///
    /// With `seed`, the random number generator of the simulator is reseeded first.
    fn reset(&mut self, seed: Option<u64>) -> Result<Vec<f32>>;

    /// Advances the simulation with a control input.
    fn step(&mut self, action: &[f32]) -> Result<SimStep>;

    /// Dimension of the control input.
    fn action_dim(&self) -> usize;
}
