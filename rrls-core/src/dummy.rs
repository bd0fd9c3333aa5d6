//! This module is used for tests.
//!
//! [`DummyParamEnv`] is a one-dimensional cart carrying a payload. Its three
//! parameters (`mass_a`, `mass_b` and `friction`) change the dynamics, so
//! wrappers can be tested without a simulator.
use crate::{
    merge,
    record::Record,
    ArrayObs, BoxSpace, ContinuousAct, Env, ParamSet, ParamUpdate, ParameterizedEnv, Step,
};
use anyhow::{anyhow, Result};
use log::trace;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const NAMES: [&str; 3] = ["mass_a", "mass_b", "friction"];
const NOMINAL: [f64; 3] = [1.0, 0.5, 0.1];
const DT: f64 = 0.05;

/// Configuration of [`DummyParamEnv`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DummyParamEnvConfig {
    /// Episode length.
    pub max_steps: usize,

    /// Parameters given at construction.
    pub params: ParamUpdate,

    /// If set, [`Env::step`] fails at this step of an episode.
    pub fail_at_step: Option<usize>,
}

impl Default for DummyParamEnvConfig {
    fn default() -> Self {
        Self {
            max_steps: 50,
            params: ParamUpdate::new(),
            fail_at_step: None,
        }
    }
}

impl DummyParamEnvConfig {
    /// Sets the episode length.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the parameters given at construction.
    pub fn params(mut self, v: ParamUpdate) -> Self {
        self.params = v;
        self
    }

    /// Makes [`Env::step`] fail at the given step.
    pub fn fail_at_step(mut self, v: usize) -> Self {
        self.fail_at_step = Some(v);
        self
    }
}

/// A cart with a payload, pushed by a two-dimensional action.
#[derive(Debug, Clone)]
pub struct DummyParamEnv {
    config: DummyParamEnvConfig,
    params: ParamSet,
    defaults: ParamSet,
    physical: [f64; 3],
    n_realized: usize,
    pos: f64,
    vel: f64,
    count_steps: usize,
    rng: SmallRng,
}

impl DummyParamEnv {
    /// The physical values used by the dynamics: `mass_a`, `mass_b` and `friction`.
    pub fn physical(&self) -> [f64; 3] {
        self.physical
    }

    /// How many times parameters have been pushed into the dynamics.
    pub fn n_realized(&self) -> usize {
        self.n_realized
    }

    fn obs(&self) -> ArrayObs {
        ArrayObs(vec![self.pos as f32, self.vel as f32])
    }
}

impl Env for DummyParamEnv {
    type Config = DummyParamEnvConfig;
    type Obs = ArrayObs;
    type Act = ContinuousAct;
    type Info = ParamSet;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let unset = ParamSet::unset(NAMES);
        let defaults = merge(&unset, &config.params, &unset)?;
        let mut env = Self {
            config: config.clone(),
            params: defaults.clone(),
            defaults,
            physical: NOMINAL,
            n_realized: 0,
            pos: 0.0,
            vel: 0.0,
            count_steps: 0,
            rng: SmallRng::seed_from_u64(seed as u64),
        };
        env.change_params()?;
        Ok(env)
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        trace!("DummyParamEnv::step()");
        if a.0.len() != 2 {
            return Err(anyhow!("DummyParamEnv expects 2-dimensional actions"));
        }
        if self.config.fail_at_step == Some(self.count_steps) {
            return Err(anyhow!("dynamics diverged at step {}", self.count_steps));
        }

        let [mass_a, mass_b, friction] = self.physical;
        let force = a.0[0] as f64 + 0.5 * a.0[1] as f64;
        let acc = (force - friction * self.vel) / (mass_a + mass_b);
        self.vel += DT * acc;
        self.pos += DT * self.vel;
        self.count_steps += 1;

        let ctrl_cost: f32 = a.0.iter().map(|x| x * x).sum();
        let reward = self.pos as f32 - 0.01 * ctrl_cost;
        let is_terminated = self.pos.abs() > 10.0;
        let is_truncated = self.count_steps >= self.config.max_steps;

        let step = Step::new(
            self.obs(),
            a.clone(),
            reward,
            is_terminated,
            is_truncated,
            self.params.clone(),
        );
        Ok((step, self.params.to_record()))
    }

    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ParamUpdate>,
    ) -> Result<(Self::Obs, Record)> {
        trace!("DummyParamEnv::reset()");
        if let Some(options) = options {
            self.set_params(options)?;
        }
        if let Some(seed) = seed {
            self.rng = SmallRng::seed_from_u64(seed);
        }
        self.pos = self.rng.gen_range(-0.05..0.05);
        self.vel = 0.0;
        self.count_steps = 0;
        Ok((self.obs(), self.params.to_record()))
    }
}

impl ParameterizedEnv for DummyParamEnv {
    fn get_params(&self) -> ParamSet {
        self.params.clone()
    }

    fn set_params(&mut self, update: &ParamUpdate) -> Result<()> {
        self.params = merge(&self.params, update, &self.defaults)?;
        self.change_params()
    }

    fn restore_params(&mut self, params: &ParamSet) -> Result<()> {
        let mut next = ParamSet::unset(NAMES);
        for (name, value) in params.iter() {
            next.set(name, value)?;
        }
        self.params = next;
        self.change_params()
    }

    fn change_params(&mut self) -> Result<()> {
        for (i, name) in NAMES.iter().enumerate() {
            self.physical[i] = self.params.value(name).unwrap_or(NOMINAL[i]);
        }
        self.n_realized += 1;
        Ok(())
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::uniform(2, -1.0, 1.0)
    }
}
