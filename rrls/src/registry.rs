//! Identifiers of the registered environments.
//!
//! Every environment of the suite is a [`Task`], optionally wrapped, and is named by an
//! id:
//!
//! * `rrls:robust-<task>` for the task itself,
//! * `rrls:robust-<task>-adversarial-<dim>` for [`DynamicAdversarial`],
//! * `rrls:robust-<task>-domain-randomization-<dim>` for [`DomainRandomization`],
//! * `rrls:probabilistic-action-robust-<task>` for [`ProbabilisticActionRobust`],
//!
//! where `<dim>` names the bounds of the parameters, see [`Dim`].
//!
//! [`DynamicAdversarial`]: rrls_wrappers::DynamicAdversarial
//! [`DomainRandomization`]: rrls_wrappers::DomainRandomization
//! [`ProbabilisticActionRobust`]: rrls_wrappers::ProbabilisticActionRobust
use anyhow::Result;
use rrls_core::{error::RrlsError, ParamBounds};
use rrls_envs::{dims, params_bound, Dim, RobustEnvConfig, Task};
use rrls_wrappers::{
    DomainRandomizationConfig, DynamicAdversarialConfig, ProbabilisticActionRobustConfig,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::Path,
    str::FromStr,
};

const NAMESPACE: &str = "rrls:";

/// Maximum number of steps of an episode of a registered environment.
pub const MAX_EPISODE_STEPS: usize = 1000;

/// Weight of the adversary's action of the registered action-robust environments.
pub const ACTION_ROBUST_ALPHA: f32 = 0.1;

/// Wrapper of a registered environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// [`DynamicAdversarial`](rrls_wrappers::DynamicAdversarial) over the bounds.
    Adversarial(Dim),

    /// [`DomainRandomization`](rrls_wrappers::DomainRandomization) over the bounds.
    DomainRandomization(Dim),

    /// [`ProbabilisticActionRobust`](rrls_wrappers::ProbabilisticActionRobust).
    ProbabilisticActionRobust,
}

/// A registered environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvSpec {
    /// The task.
    pub task: Task,

    /// The wrapper, if any.
    pub variant: Option<Variant>,
}

impl EnvSpec {
    /// Constructs the id of an environment.
    ///
    /// It is not checked that the environment is registered, see [`EnvSpec::all`].
    pub fn new(task: Task, variant: Option<Variant>) -> Self {
        Self { task, variant }
    }

    /// Every registered environment.
    pub fn all() -> Vec<EnvSpec> {
        Task::ALL
            .into_iter()
            .flat_map(|task| {
                let base = std::iter::once(Self::new(task, None));
                let adversarial = dims(task).map(move |dim| {
                    Self::new(task, Some(Variant::Adversarial(dim)))
                });
                let randomized = dims(task).map(move |dim| {
                    Self::new(task, Some(Variant::DomainRandomization(dim)))
                });
                let action_robust =
                    std::iter::once(Self::new(task, Some(Variant::ProbabilisticActionRobust)));
                base.chain(adversarial).chain(randomized).chain(action_robust)
            })
            .collect()
    }

    /// Bounds of the parameters perturbed by the wrapper.
    ///
    /// Returns `None` if the environment has no such bounds.
    pub fn bounds(&self) -> Result<Option<ParamBounds>> {
        match self.variant {
            Some(Variant::Adversarial(dim)) | Some(Variant::DomainRandomization(dim)) => {
                Ok(Some(params_bound(self.task, dim)?))
            }
            _ => Ok(None),
        }
    }

    /// Configuration of the environment, the simulator being configured with `sim`.
    ///
    /// Episodes are truncated at [`MAX_EPISODE_STEPS`].
    pub fn config<C: Default>(&self, sim: C) -> Result<EnvConfig<C>> {
        let env = RobustEnvConfig::new(self.task)
            .max_steps(Some(MAX_EPISODE_STEPS))
            .sim(sim);
        let config = match self.variant {
            None => EnvConfig::Robust(env),
            Some(Variant::Adversarial(dim)) => EnvConfig::Adversarial(
                DynamicAdversarialConfig::new(env, params_bound(self.task, dim)?),
            ),
            Some(Variant::DomainRandomization(dim)) => EnvConfig::DomainRandomization(
                DomainRandomizationConfig::new(env, params_bound(self.task, dim)?),
            ),
            Some(Variant::ProbabilisticActionRobust) => EnvConfig::ProbabilisticActionRobust(
                ProbabilisticActionRobustConfig::new(env).alpha(ACTION_ROBUST_ALPHA),
            ),
        };
        Ok(config)
    }
}

impl fmt::Display for EnvSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            None => write!(f, "{}robust-{}", NAMESPACE, self.task),
            Some(Variant::Adversarial(dim)) => {
                write!(f, "{}robust-{}-adversarial-{}", NAMESPACE, self.task, dim)
            }
            Some(Variant::DomainRandomization(dim)) => write!(
                f,
                "{}robust-{}-domain-randomization-{}",
                NAMESPACE, self.task, dim
            ),
            Some(Variant::ProbabilisticActionRobust) => {
                write!(f, "{}probabilistic-action-robust-{}", NAMESPACE, self.task)
            }
        }
    }
}

impl FromStr for EnvSpec {
    type Err = anyhow::Error;

    /// Parses an id.
    ///
    /// It fails with [`RrlsError::UnknownEnvId`] if the id is not registered.
    fn from_str(id: &str) -> Result<Self> {
        let unknown = || anyhow::Error::from(RrlsError::UnknownEnvId(id.to_string()));
        let task = |s: &str| s.parse::<Task>().map_err(|_| unknown());
        let dim = |s: &str| s.parse::<Dim>().map_err(|_| unknown());

        let name = id.strip_prefix(NAMESPACE).ok_or_else(unknown)?;
        let spec = if let Some(rest) = name.strip_prefix("probabilistic-action-robust-") {
            Self::new(task(rest)?, Some(Variant::ProbabilisticActionRobust))
        } else {
            let rest = name.strip_prefix("robust-").ok_or_else(unknown)?;
            match rest.split_once('-') {
                None => Self::new(task(rest)?, None),
                Some((t, rest)) => {
                    let variant = if let Some(d) = rest.strip_prefix("adversarial-") {
                        Variant::Adversarial(dim(d)?)
                    } else if let Some(d) = rest.strip_prefix("domain-randomization-") {
                        Variant::DomainRandomization(dim(d)?)
                    } else {
                        return Err(unknown());
                    };
                    Self::new(task(t)?, Some(variant))
                }
            }
        };

        // e.g., no three-dimensional bounds for the inverted pendulum
        spec.bounds().map_err(|_| unknown())?;
        Ok(spec)
    }
}

/// Configuration of a registered environment.
///
/// Each variant is the configuration of the corresponding wrapper over
/// [`RobustEnv`](rrls_envs::RobustEnv), built with [`Env::build`](rrls_core::Env::build).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnvConfig<C> {
    /// The task itself.
    Robust(RobustEnvConfig<C>),

    /// The task under [`DynamicAdversarial`](rrls_wrappers::DynamicAdversarial).
    Adversarial(DynamicAdversarialConfig<RobustEnvConfig<C>>),

    /// The task under [`DomainRandomization`](rrls_wrappers::DomainRandomization).
    DomainRandomization(DomainRandomizationConfig<RobustEnvConfig<C>>),

    /// The task under [`ProbabilisticActionRobust`](rrls_wrappers::ProbabilisticActionRobust).
    ProbabilisticActionRobust(ProbabilisticActionRobustConfig<RobustEnvConfig<C>>),
}

impl<C> EnvConfig<C> {
    /// Configuration of the task, without wrapper.
    pub fn base(&self) -> &RobustEnvConfig<C> {
        match self {
            Self::Robust(c) => c,
            Self::Adversarial(c) => &c.env,
            Self::DomainRandomization(c) => &c.env,
            Self::ProbabilisticActionRobust(c) => &c.env,
        }
    }
}

impl<C: Serialize + DeserializeOwned> EnvConfig<C> {
    /// Constructs [`EnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`EnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
