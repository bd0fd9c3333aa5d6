use rrls_core::Act;

/// Action of a two-player environment.
///
/// The agent's action drives the task; the adversary's action perturbs either the
/// physical parameters or the agent's action, depending on the wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct PairAct<A, B> {
    /// Action of the agent.
    pub agent: A,

    /// Action of the adversary.
    pub adversary: B,
}

impl<A, B> PairAct<A, B> {
    /// Constructs the pair.
    pub fn new(agent: A, adversary: B) -> Self {
        Self { agent, adversary }
    }
}

impl<A: Act, B: Act> Act for PairAct<A, B> {
    fn len(&self) -> usize {
        self.agent.len() + self.adversary.len()
    }
}
