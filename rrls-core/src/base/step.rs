use super::Env;

/// Typed information attached to a [`Step`].
///
/// Unlike the [`Record`](crate::record::Record) returned along with the step, it is
/// meant to be consumed by code, e.g., the parameter set of the environment.
pub trait Info {}

impl Info for () {}

/// Outcome of [`Env::step`].
pub struct Step<E: Env> {
    /// Observation after the step.
    pub obs: E::Obs,

    /// Action that produced the step.
    pub act: E::Act,

    /// Reward of the agent.
    pub reward: f32,

    /// The episode reached a terminal state.
    pub is_terminated: bool,

    /// The episode was cut, e.g., by a step limit.
    pub is_truncated: bool,

    /// Information of the environment.
    pub info: E::Info,

    /// First observation of the next episode, set by [`Env::step_with_reset`].
    pub init_obs: Option<E::Obs>,
}

impl<E: Env> Step<E> {
    /// Constructs a step, without `init_obs`.
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        info: E::Info,
    ) -> Self {
        Self {
            obs,
            act,
            reward,
            is_terminated,
            is_truncated,
            info,
            init_obs: None,
        }
    }

    /// The episode is over, terminated or truncated.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
