//! Mixing of the agent's action with an adversary's action.
use crate::PairAct;
use anyhow::Result;
use log::{info, trace};
use rrls_core::{
    error::RrlsError,
    record::{Record, RecordValue},
    ContinuousAct, Env, Info, PairSpace, ParamSet, ParamUpdate, ParameterizedEnv, Step,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ProbabilisticActionRobust`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilisticActionRobustConfig<C> {
    /// Configuration of the wrapped environment.
    pub env: C,

    /// Weight of the adversary's action, in `[0, 1]`.
    pub alpha: f32,
}

impl<C: Default> Default for ProbabilisticActionRobustConfig<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C> ProbabilisticActionRobustConfig<C> {
    /// Constructs the configuration with `alpha = 0.15`.
    pub fn new(env: C) -> Self {
        Self { env, alpha: 0.15 }
    }

    /// Sets the configuration of the wrapped environment.
    pub fn env(mut self, v: C) -> Self {
        self.env = v;
        self
    }

    /// Sets the weight of the adversary's action.
    pub fn alpha(mut self, v: f32) -> Self {
        self.alpha = v;
        self
    }
}

impl<C: Serialize + DeserializeOwned> ProbabilisticActionRobustConfig<C> {
    /// Constructs [`ProbabilisticActionRobustConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ProbabilisticActionRobustConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Information of a step of [`ProbabilisticActionRobust`].
#[derive(Debug, Clone)]
pub struct ActionRobustInfo<I> {
    /// Action proposed by the agent.
    pub agent_act: ContinuousAct,

    /// Action proposed by the adversary.
    pub adversary_act: ContinuousAct,

    /// Reward of the adversary, the negated reward of the agent.
    pub adversarial_reward: f32,

    /// Information of the wrapped environment.
    pub inner: I,
}

impl<I: Info> Info for ActionRobustInfo<I> {}

/// Blends the agent's action with an adversary's action at every step.
///
/// The environment is stepped with `(1 - alpha) * agent + alpha * adversary`. With
/// `alpha = 0` the wrapper behaves as the wrapped environment; with `alpha = 1` the
/// adversary has full control.
///
/// The reward is the one of the blended action. Both proposed actions and the
/// adversary's reward are given in [`ActionRobustInfo`] and in the [`Record`], as
/// `"agent action"`, `"adversarial action"` and `"adversarial_reward"`.
#[derive(Debug, Clone)]
pub struct ProbabilisticActionRobust<E: Env<Act = ContinuousAct>> {
    env: E,
    alpha: f32,
}

impl<E: Env<Act = ContinuousAct>> ProbabilisticActionRobust<E> {
    /// Wraps `env`.
    ///
    /// It fails with [`RrlsError::InvalidAlpha`] if `alpha` is not in `[0, 1]`.
    pub fn new(env: E, alpha: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(RrlsError::InvalidAlpha(alpha).into());
        }
        info!("Wrap environment with ProbabilisticActionRobust, alpha = {}", alpha);
        Ok(Self { env, alpha })
    }

    /// Weight of the adversary's action.
    pub fn alpha(&self) -> f32 {
        self.alpha
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

impl<E> ProbabilisticActionRobust<E>
where
    E: ParameterizedEnv<Act = ContinuousAct>,
{
    /// Action space: the action space of the environment, for both players.
    pub fn action_space(&self) -> PairSpace {
        let space = self.env.action_space();
        PairSpace::new(space.clone(), space)
    }

    /// Parameters of the wrapped environment.
    pub fn get_params(&self) -> ParamSet {
        self.env.get_params()
    }

    /// Sets parameters of the wrapped environment, see [`ParameterizedEnv::set_params`].
    pub fn set_params(&mut self, update: &ParamUpdate) -> Result<()> {
        self.env.set_params(update)
    }
}

impl<E: Env<Act = ContinuousAct>> Env for ProbabilisticActionRobust<E> {
    type Config = ProbabilisticActionRobustConfig<E::Config>;
    type Obs = E::Obs;
    type Act = PairAct<ContinuousAct, ContinuousAct>;
    type Info = ActionRobustInfo<E::Info>;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let env = E::build(&config.env, seed)?;
        Self::new(env, config.alpha)
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        trace!("ProbabilisticActionRobust::step()");
        let blended = a.agent.blend(&a.adversary, self.alpha)?;
        let (step, mut record) = self.env.step(&blended)?;

        let adversarial_reward = -step.reward;
        record.insert("agent action", RecordValue::Array1(a.agent.0.clone()));
        record.insert("adversarial action", RecordValue::Array1(a.adversary.0.clone()));
        record.insert("adversarial_reward", RecordValue::Scalar(adversarial_reward));

        let info = ActionRobustInfo {
            agent_act: a.agent.clone(),
            adversary_act: a.adversary.clone(),
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
        trace!("ProbabilisticActionRobust::reset()");
        self.env.reset(seed, options)
    }
}
