#![warn(missing_docs)]
//! Locomotion tasks with modifiable physical parameters.
//!
//! [`RobustEnv`] runs a [`Task`] on a [`Simulator`] and implements
//! [`ParameterizedEnv`](rrls_core::ParameterizedEnv): body masses, floor frictions and
//! external forces listed in [`Task::targets`] can be read and changed at any time.
//! [`params_bound`] gives the bounds of the parameters used for adversarial
//! perturbation, domain randomization and evaluation.
//!
//! ```no_run
//! use anyhow::Result;
//! use rrls_core::{Env, ParamUpdate, ParameterizedEnv};
//! use rrls_envs::{RobustEnv, RobustEnvConfig, Task, ToySim, ToySimConfig};
//!
//! fn main() -> Result<()> {
//!     let config = RobustEnvConfig::<ToySimConfig>::new(Task::Hopper).param("torsomass", 2.0);
//!     let mut env = RobustEnv::<ToySim>::build(&config, 42)?;
//!     env.set_params(&ParamUpdate::new().with("worldfriction", 0.5))?;
//!     let (_obs, info) = env.reset(Some(0), None)?;
//!     assert_eq!(info.get_scalar("worldfriction")?, 0.5);
//!     Ok(())
//! }
//! ```
mod bounds;
mod config;
mod env;
mod model;
mod simulator;
pub mod task;
mod toy;

pub use bounds::{dims, params_bound, Dim};
pub use config::RobustEnvConfig;
pub use env::RobustEnv;
pub use model::PhysicsModel;
pub use simulator::{SimStep, Simulator};
pub use task::Task;
pub use toy::{ToySim, ToySimConfig};
