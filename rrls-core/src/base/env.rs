//! Environment.
use super::{Act, Info, Obs, Step};
use crate::{record::Record, ParamUpdate};
use anyhow::Result;

/// Represents an environment, typically an MDP.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Performes an environment step.
    ///
    /// The returned [`Record`] is the `info` channel of the step. Errors of the
    /// underlying simulator are returned as they are.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Resets the environment.
    ///
    /// `seed` reseeds the random number generator of the environment.
    /// Parameters in `options` are applied before the physical reset, so that
    /// the episode begins under the new physics.
    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ParamUpdate>,
    ) -> Result<(Self::Obs, Record)>;

    /// Performes an environment step and reset the environment if an episode ends.
    ///
    /// The initial observation of the next episode is stored in [`Step::init_obs`].
    fn step_with_reset(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized,
    {
        let (mut step, record) = self.step(a)?;
        if step.is_done() {
            let (init_obs, _) = self.reset(None, None)?;
            step.init_obs = Some(init_obs);
        }
        Ok((step, record))
    }

    /// Resets the environment with a given index.
    ///
    /// The index is used as a random seed, which is useful for evaluation of a
    /// trained agent on reproducible episodes.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        let (obs, _) = self.reset(Some(ix as u64), None)?;
        Ok(obs)
    }
}
