#![warn(missing_docs)]
//! Robust reinforcement learning suite.
//!
//! Locomotion tasks whose body masses, frictions and external forces can be changed
//! while an agent learns, combined with wrappers that turn them into robust learning
//! problems:
//!
//! * [`rrls_envs`]: the tasks, their parameters and bounds,
//!   see [`RobustEnv`](rrls_envs::RobustEnv).
//! * [`rrls_wrappers`]: adversarial, domain randomization and action-robust wrappers.
//! * [`evaluate`]: evaluation of a policy over a mesh of parameters.
//! * [`registry`]: identifiers of the registered environments.
//!
//! ```no_run
//! use anyhow::Result;
//! use rrls::{registry::{EnvConfig, EnvSpec}, AdversarialEnv};
//! use rrls_core::{ContinuousAct, Env};
//! use rrls_envs::{ToySim, ToySimConfig};
//! use rrls_wrappers::PairAct;
//!
//! fn main() -> Result<()> {
//!     let spec: EnvSpec = "rrls:robust-hopper-adversarial-1d".parse()?;
//!     let EnvConfig::Adversarial(config) = spec.config(ToySimConfig::default())? else {
//!         unreachable!()
//!     };
//!     let mut env = AdversarialEnv::<ToySim>::build(&config, 42)?;
//!     env.reset(None, None)?;
//!     let act = PairAct::new(ContinuousAct(vec![0.0; 3]), ContinuousAct(vec![-1.0]));
//!     let (step, _) = env.step(&act)?;
//!     println!("{:?}", step.info.params);
//!     Ok(())
//! }
//! ```
pub mod evaluate;
pub mod registry;

use rrls_envs::RobustEnv;
use rrls_wrappers::{DomainRandomization, DynamicAdversarial, ProbabilisticActionRobust};

/// A task under [`DynamicAdversarial`].
pub type AdversarialEnv<S> = DynamicAdversarial<RobustEnv<S>>;

/// A task under [`DomainRandomization`] with uniform sampling.
pub type DomainRandomizedEnv<S> = DomainRandomization<RobustEnv<S>>;

/// A task under [`ProbabilisticActionRobust`].
pub type ActionRobustEnv<S> = ProbabilisticActionRobust<RobustEnv<S>>;

pub use evaluate::{
    evaluation_set, generate_evaluation_set, mesh_grid, MeshEvaluator, EVALUATION_MESH_DIM,
};
pub use registry::{EnvConfig, EnvSpec, Variant};
