#![warn(missing_docs)]
//! Core traits and types of the robust reinforcement learning suite.
//!
//! This crate defines the contract shared by every environment and wrapper:
//!
//! * [`Env`], [`Step`], [`Obs`], [`Act`], [`Info`] and [`Policy`] describe episodic
//!   interaction with an environment.
//! * [`ParameterizedEnv`] extends [`Env`] with named, scalar physical parameters that
//!   can be read, set and realized into the simulator.
//! * [`ParamSet`], [`ParamUpdate`] and [`ParamBounds`] hold parameter values and the
//!   intervals used for normalization and sampling.
//! * [`record`] provides the string-keyed `info` channel returned by every step.
pub mod error;
pub mod record;
pub mod util;

mod array;
pub use array::{ArrayObs, ContinuousAct};

mod base;
pub use base::{check_bounds, Act, Env, Info, Obs, ParameterizedEnv, Policy, Step};

mod bounds;
pub use bounds::{denormalize, ParamBound, ParamBounds};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod params;
pub use params::{merge, ParamSet, ParamUpdate};

mod space;
pub use space::{BoxSpace, PairSpace};

pub mod dummy;
