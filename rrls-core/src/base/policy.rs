use super::Env;

/// Maps observations of `E` to actions.
///
/// For the two-player environments of the suite, the action holds the moves of both
/// the agent and the adversary.
pub trait Policy<E: Env> {
    /// Action for `obs`.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;
}
