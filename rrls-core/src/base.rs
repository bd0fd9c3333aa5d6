//! Core functionalities.
mod env;
mod parameterized;
mod policy;
mod step;
pub use env::Env;
pub use parameterized::{check_bounds, ParameterizedEnv};
pub use policy::Policy;
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
///
/// Vectorized environments are not supported, an object of this trait
/// holds the observation of a single environment.
pub trait Obs: Clone + Debug {
    /// Returns the number of elements in the observation.
    fn len(&self) -> usize;

    /// Returns `true` if the observation has no element.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An action of an environment.
pub trait Act: Clone + Debug {
    /// Returns the number of elements in the action.
    fn len(&self) -> usize;

    /// Returns `true` if the action has no element.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
