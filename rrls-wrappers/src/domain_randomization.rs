//! Resampling of the physical parameters at every episode.
use anyhow::Result;
use log::{debug, info, trace};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rrls_core::{
    check_bounds, record::Record, Env, ParamBounds, ParamUpdate, ParameterizedEnv, Step,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Draws parameter values from bounds.
///
/// This is the strategy used by [`DomainRandomization`] at every reset. Implement it
/// to sample from a distribution other than the default [`UniformSampler`].
pub trait ParamSampler {
    /// Configuration.
    type Config: Clone + Default + Serialize + DeserializeOwned;

    /// Builds the sampler.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Draws a value for every parameter of `bounds`.
    fn sample(&mut self, bounds: &ParamBounds) -> ParamUpdate;

    /// Reseeds the sampler. Samplers without randomness ignore it.
    fn reseed(&mut self, _seed: u64) {}
}

/// Configuration of [`UniformSampler`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UniformSamplerConfig {}

/// Draws every parameter independently and uniformly over its interval.
#[derive(Debug, Clone)]
pub struct UniformSampler {
    rng: SmallRng,
}

impl UniformSampler {
    /// Constructs the sampler with a random seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl ParamSampler for UniformSampler {
    type Config = UniformSamplerConfig;

    fn build(_config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self::new(seed as u64))
    }

    fn sample(&mut self, bounds: &ParamBounds) -> ParamUpdate {
        bounds
            .iter()
            .map(|b| (b.name.clone(), self.rng.gen_range(b.low..=b.high)))
            .collect()
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }
}

/// Configuration of [`DomainRandomization`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRandomizationConfig<C, SC = UniformSamplerConfig> {
    /// Configuration of the wrapped environment.
    pub env: C,

    /// Bounds of the sampled parameters.
    pub params_bound: ParamBounds,

    /// Configuration of the sampler.
    pub sampler: SC,
}

impl<C, SC: Default> DomainRandomizationConfig<C, SC> {
    /// Constructs the configuration with the default sampler configuration.
    pub fn new(env: C, params_bound: ParamBounds) -> Self {
        Self {
            env,
            params_bound,
            sampler: SC::default(),
        }
    }
}

impl<C, SC> DomainRandomizationConfig<C, SC> {
    /// Sets the configuration of the wrapped environment.
    pub fn env(mut self, v: C) -> Self {
        self.env = v;
        self
    }

    /// Sets the bounds of the sampled parameters.
    pub fn params_bound(mut self, v: ParamBounds) -> Self {
        self.params_bound = v;
        self
    }

    /// Sets the configuration of the sampler.
    pub fn sampler(mut self, v: SC) -> Self {
        self.sampler = v;
        self
    }
}

impl<C, SC> DomainRandomizationConfig<C, SC>
where
    C: Serialize + DeserializeOwned,
    SC: Serialize + DeserializeOwned,
{
    /// Constructs [`DomainRandomizationConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DomainRandomizationConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Draws new physical parameters before every episode.
///
/// On reset, parameter values are drawn from the bounds with the [`ParamSampler`] and
/// set to the environment before it is reset, so that each episode runs under its own
/// physics. A reset seed also reseeds the sampler, hence resets with the same seed
/// draw the same parameters. Steps are passed through unchanged.
#[derive(Debug, Clone)]
pub struct DomainRandomization<E: ParameterizedEnv, S: ParamSampler = UniformSampler> {
    env: E,
    params_bound: ParamBounds,
    sampler: S,
}

impl<E: ParameterizedEnv, S: ParamSampler> DomainRandomization<E, S> {
    /// Wraps `env`.
    ///
    /// It fails if `params_bound` is malformed or names a parameter unknown to `env`.
    pub fn new(env: E, params_bound: ParamBounds, sampler: S) -> Result<Self> {
        check_bounds(&env, &params_bound)?;
        info!(
            "Wrap environment with DomainRandomization over {:?}",
            params_bound.names().collect::<Vec<_>>()
        );
        Ok(Self {
            env,
            params_bound,
            sampler,
        })
    }

    /// Bounds of the sampled parameters.
    pub fn params_bound(&self) -> &ParamBounds {
        &self.params_bound
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

impl<E: ParameterizedEnv, S: ParamSampler> Env for DomainRandomization<E, S> {
    type Config = DomainRandomizationConfig<E::Config, S::Config>;
    type Obs = E::Obs;
    type Act = E::Act;
    type Info = E::Info;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let env = E::build(&config.env, seed)?;
        let sampler = S::build(&config.sampler, seed)?;
        Self::new(env, config.params_bound.clone(), sampler)
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        trace!("DomainRandomization::step()");
        let (step, record) = self.env.step(a)?;
        let step = Step::new(
            step.obs,
            step.act,
            step.reward,
            step.is_terminated,
            step.is_truncated,
            step.info,
        );
        Ok((step, record))
    }

    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ParamUpdate>,
    ) -> Result<(Self::Obs, Record)> {
        trace!("DomainRandomization::reset()");
        if let Some(seed) = seed {
            self.sampler.reseed(seed);
        }
        let params = self.sampler.sample(&self.params_bound);
        debug!("Sampled parameters: {:?}", params);
        self.env.set_params(&params)?;

        self.env.reset(seed, options)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rrls_core::{
        dummy::{DummyParamEnv, DummyParamEnvConfig},
        ContinuousAct,
    };
    use tempdir::TempDir;
    use test_log::test;

    type RandomizedEnv = DomainRandomization<DummyParamEnv>;

    #[test]
    fn test_uniform_sampler_in_bounds() {
        let bounds =
            ParamBounds::from_slice(&[("a", 0.1, 3.0), ("b", -2.0, -1.0), ("c", 5.0, 5.0)]);
        let mut sampler = UniformSampler::new(42);
        for _ in 0..1000 {
            let params = sampler.sample(&bounds);
            assert_eq!(params.len(), 3);
            for b in bounds.iter() {
                let v = params.get(&b.name).unwrap();
                assert!(b.low <= v && v <= b.high);
            }
        }
    }

    #[test]
    fn test_params_are_resampled_on_reset_only() -> Result<()> {
        let bounds = ParamBounds::from_slice(&[("mass_a", 1.0, 31.0)]);
        let config = DomainRandomizationConfig::new(DummyParamEnvConfig::default(), bounds);
        let mut env = RandomizedEnv::build(&config, 0)?;

        let (_, record) = env.reset(None, None)?;
        let first = env.inner().get_params().value("mass_a");
        assert_eq!(first.map(|v| v as f32), Some(record.get_scalar("mass_a")?));
        for _ in 0..5 {
            env.step(&ContinuousAct(vec![1.0, 0.0]))?;
            assert_eq!(env.inner().get_params().value("mass_a"), first);
        }

        env.reset(None, None)?;
        assert_ne!(env.inner().get_params().value("mass_a"), first);
        Ok(())
    }

    #[test]
    fn test_reset_seed_reproduces_the_draw() -> Result<()> {
        let bounds = ParamBounds::from_slice(&[("mass_a", 1.0, 31.0), ("friction", 0.0, 1.0)]);
        let config = DomainRandomizationConfig::new(DummyParamEnvConfig::default(), bounds);
        let mut env = RandomizedEnv::build(&config, 0)?;

        let (obs, _) = env.reset(Some(3), None)?;
        let params = env.inner().get_params();
        env.reset(None, None)?;
        assert_ne!(env.inner().get_params(), params);

        let mut other = RandomizedEnv::build(&config, 99)?;
        for env in [&mut env, &mut other] {
            assert_eq!(env.reset_with_index(3)?, obs);
            assert_eq!(env.inner().get_params(), params);
        }
        Ok(())
    }

    #[test]
    fn test_uniform_mean() -> Result<()> {
        let bounds = ParamBounds::from_slice(&[("mass_a", 1.0, 31.0)]);
        let config = DomainRandomizationConfig::new(DummyParamEnvConfig::default(), bounds);
        let mut env = RandomizedEnv::build(&config, 7)?;

        let mut sum = 0.0;
        for _ in 0..100 {
            env.reset(None, None)?;
            sum += env.inner().physical()[0];
        }
        let mean = sum / 100.0;
        assert!((mean - 16.0).abs() < 3.0, "mean = {}", mean);
        Ok(())
    }

    /// Always returns the midpoints of the intervals.
    struct MidpointSampler;

    impl ParamSampler for MidpointSampler {
        type Config = ();

        fn build(_config: &(), _seed: i64) -> Result<Self> {
            Ok(Self)
        }

        fn sample(&mut self, bounds: &ParamBounds) -> ParamUpdate {
            bounds.iter().map(|b| (b.name.clone(), b.midpoint())).collect()
        }
    }

    #[test]
    fn test_custom_sampler() -> Result<()> {
        let bounds = ParamBounds::from_slice(&[("mass_b", 1.0, 3.0), ("friction", 0.0, 1.0)]);
        let env = DummyParamEnv::build(&DummyParamEnvConfig::default(), 0)?;
        let mut env = DomainRandomization::new(env, bounds, MidpointSampler)?;
        env.reset(Some(0), None)?;
        assert_eq!(env.inner().physical(), [1.0, 2.0, 0.5]);
        Ok(())
    }

    #[test]
    fn test_serde_domain_randomization_config() -> Result<()> {
        let bounds = ParamBounds::from_slice(&[("mass_a", 1.0, 31.0)]);
        let config: DomainRandomizationConfig<_> =
            DomainRandomizationConfig::new(DummyParamEnvConfig::default().max_steps(20), bounds);
        let dir = TempDir::new("domain_randomization_config")?;
        let path = dir.path().join("domain_randomization_config.yaml");
        config.save(&path)?;
        let config_ = DomainRandomizationConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
