//! Two-player game over the physical parameters of an environment.
use crate::PairAct;
use anyhow::Result;
use log::{debug, info, trace};
use rrls_core::{
    check_bounds,
    record::{Record, RecordValue},
    BoxSpace, ContinuousAct, Env, Info, PairSpace, ParamBounds, ParamSet, ParamUpdate,
    ParameterizedEnv, Step,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`DynamicAdversarial`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicAdversarialConfig<C> {
    /// Configuration of the wrapped environment.
    pub env: C,

    /// Bounds of the parameters controlled by the adversary.
    pub params_bound: ParamBounds,
}

impl<C> DynamicAdversarialConfig<C> {
    /// Constructs the configuration.
    pub fn new(env: C, params_bound: ParamBounds) -> Self {
        Self { env, params_bound }
    }

    /// Sets the configuration of the wrapped environment.
    pub fn env(mut self, v: C) -> Self {
        self.env = v;
        self
    }

    /// Sets the bounds of the parameters controlled by the adversary.
    pub fn params_bound(mut self, v: ParamBounds) -> Self {
        self.params_bound = v;
        self
    }
}

impl<C: Serialize + DeserializeOwned> DynamicAdversarialConfig<C> {
    /// Constructs [`DynamicAdversarialConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DynamicAdversarialConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Information of a step of [`DynamicAdversarial`].
#[derive(Debug, Clone)]
pub struct DynamicAdversarialInfo<I> {
    /// Parameter values set by the adversary for this step.
    pub params: ParamUpdate,

    /// Reward of the adversary, the negated reward of the agent.
    pub adversarial_reward: f32,

    /// Information of the wrapped environment.
    pub inner: I,
}

impl<I: Info> Info for DynamicAdversarialInfo<I> {}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Turns an environment into a zero-sum game between the agent and an adversary
/// choosing the physical parameters at every step.
///
/// The action is a [`PairAct`]: the agent's action and a vector in `[-1, 1]` with one
/// component per parameter of the bounds, in their order. At every step the
/// adversary's vector is mapped onto the bounds with [`ParamBounds::denormalize`], set
/// to the environment, and the environment is stepped with the agent's action only.
///
/// ```mermaid
/// graph LR
///     A[PairAct] -->|agent| S[Env::step]
///     A -->|adversary| D[denormalize]
///     D -->|ParamUpdate| P[set_params]
///     P --> S
///     S -->|reward| R[reward, -reward]
/// ```
///
/// The reward is the agent's. The adversary's reward, its negation, is given in
/// [`DynamicAdversarialInfo`] and as `"adversarial_reward"` in the [`Record`], together
/// with the parameter values of the step.
///
/// On reset, the parameters of the environment are restored to those it had when
/// wrapped.
#[derive(Debug, Clone)]
pub struct DynamicAdversarial<E: ParameterizedEnv> {
    env: E,
    params_bound: ParamBounds,
    default_params: ParamSet,
}

impl<E: ParameterizedEnv> DynamicAdversarial<E> {
    /// Wraps `env`.
    ///
    /// It fails if `params_bound` is malformed or names a parameter unknown to `env`.
    pub fn new(env: E, params_bound: ParamBounds) -> Result<Self> {
        check_bounds(&env, &params_bound)?;
        let default_params = env.get_params();
        info!(
            "Wrap environment with DynamicAdversarial over {:?}",
            params_bound.names().collect::<Vec<_>>()
        );
        Ok(Self {
            env,
            params_bound,
            default_params,
        })
    }

    /// Action space: the agent's and a box `[-1, 1]` of the dimension of the bounds.
    pub fn action_space(&self) -> PairSpace {
        PairSpace::new(
            self.env.action_space(),
            BoxSpace::uniform(self.params_bound.len(), -1.0, 1.0),
        )
    }

    /// Bounds of the parameters controlled by the adversary.
    pub fn params_bound(&self) -> &ParamBounds {
        &self.params_bound
    }

    /// Parameters restored on every reset.
    pub fn default_params(&self) -> &ParamSet {
        &self.default_params
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Consumes the wrapper and returns the wrapped environment.
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: ParameterizedEnv> Env for DynamicAdversarial<E> {
    type Config = DynamicAdversarialConfig<E::Config>;
    type Obs = E::Obs;
    type Act = PairAct<E::Act, ContinuousAct>;
    type Info = DynamicAdversarialInfo<E::Info>;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let env = E::build(&config.env, seed)?;
        Self::new(env, config.params_bound.clone())
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        trace!("DynamicAdversarial::step()");
        let params = self.params_bound.denormalize(&a.adversary.0)?;
        debug!("Adversarial parameters: {:?}", params);
        self.env.set_params(&params)?;

        let (step, mut record) = self.env.step(&a.agent)?;
        let adversarial_reward = -step.reward;
        record.merge_inplace(params.to_record());
        record.insert("adversarial_reward", RecordValue::Scalar(adversarial_reward));

        let info = DynamicAdversarialInfo {
            params,
            adversarial_reward,
            inner: step.info,
        };
        let step = Step::new(
            step.obs,
            a.clone(),
            step.reward,
            step.is_terminated,
            step.is_truncated,
            info,
        );
        Ok((step, record))
    }

    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ParamUpdate>,
    ) -> Result<(Self::Obs, Record)> {
        trace!("DynamicAdversarial::reset()");
        self.env.restore_params(&self.default_params)?;
        self.env.reset(seed, options)
    }
}
