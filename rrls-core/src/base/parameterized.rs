//! Environments with modifiable physical parameters.
use super::Env;
use crate::{error::RrlsError, BoxSpace, ParamBounds, ParamSet, ParamUpdate};
use anyhow::Result;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// An environment whose physical parameters can be read, set and applied.
///
/// Values flow from a wrapper into the simulator as shown below:
///
/// ```mermaid
/// graph LR
///     W[Wrapper] -->|ParamUpdate| S[set_params]
///     S -->|merge| P[ParamSet]
///     P --> C[change_params]
///     C -->|mass, friction, force| M[Simulator model]
///     P -->|get_params| I[info]
/// ```
///
/// Whether a given set of bounds is compatible with an environment is checked by
/// [`check_bounds`].
///
/// Parameter values are never validated against any bounds: out-of-range masses or
/// frictions are passed straight to the simulator and may produce non-physical
/// dynamics.
pub trait ParameterizedEnv: Env {
    /// Returns the current full parameter set, including unset entries.
    fn get_params(&self) -> ParamSet;

    /// Records the values in `update` and realizes them in the simulator.
    ///
    /// Parameters missing in `update` keep their previous value.
    /// Names not recognized by the environment are rejected with
    /// [`RrlsError::UnknownParameter`] and leave the environment untouched.
    fn set_params(&mut self, update: &ParamUpdate) -> Result<()>;

    /// Replaces the whole parameter set and realizes it in the simulator.
    ///
    /// Unlike [`ParameterizedEnv::set_params`], an unset entry in `params` brings
    /// the corresponding physical quantity back to its nominal value.
    fn restore_params(&mut self, params: &ParamSet) -> Result<()>;

    /// Pushes the recorded parameter set into the simulator.
    ///
    /// [`ParameterizedEnv::set_params`] already calls this method; calling it again
    /// is idempotent. With no parameter set, it is a no-op.
    fn change_params(&mut self) -> Result<()>;

    /// Action space of the environment.
    fn action_space(&self) -> BoxSpace;

    /// Names of the parameters recognized by the environment.
    fn param_names(&self) -> Vec<String> {
        self.get_params().names().map(String::from).collect()
    }
}

/// Checks that `bounds` is well formed and that every parameter in it is
/// recognized by `env`.
///
/// Wrappers call this function when they are constructed.
pub fn check_bounds<E: ParameterizedEnv>(env: &E, bounds: &ParamBounds) -> Result<()> {
    bounds.validate()?;
    let params = env.get_params();
    for name in bounds.names() {
        if !params.contains(name) {
            return Err(RrlsError::UnknownParameter(name.to_string()).into());
        }
    }
    Ok(())
}
