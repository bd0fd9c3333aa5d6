#![warn(missing_docs)]
//! Wrappers turning a parameterized environment into a robust reinforcement learning
//! problem.
//!
//! * [`DynamicAdversarial`] lets an adversary choose the physical parameters at every
//!   step, within bounds.
//! * [`DomainRandomization`] draws new physical parameters before every episode.
//! * [`ProbabilisticActionRobust`] blends the agent's action with an adversary's.
//!
//! An environment is wrapped by at most one of them. The first two require
//! [`ParameterizedEnv`](rrls_core::ParameterizedEnv) and check the bounds against the
//! parameters of the environment when constructed.
mod adversarial;
mod domain_randomization;
mod pair;
mod probabilistic_action_robust;

pub use adversarial::{DynamicAdversarial, DynamicAdversarialConfig, DynamicAdversarialInfo};
pub use domain_randomization::{
    DomainRandomization, DomainRandomizationConfig, ParamSampler, UniformSampler,
    UniformSamplerConfig,
};
pub use pair::PairAct;
pub use probabilistic_action_robust::{
    ActionRobustInfo, ProbabilisticActionRobust, ProbabilisticActionRobustConfig,
};
