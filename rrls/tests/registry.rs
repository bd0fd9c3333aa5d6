use anyhow::Result;
use rrls::{
    registry::{EnvConfig, EnvSpec, MAX_EPISODE_STEPS},
    ActionRobustEnv, AdversarialEnv, DomainRandomizedEnv,
};
use rrls_core::{ContinuousAct, Env, ParameterizedEnv};
use rrls_envs::{RobustEnv, ToySim, ToySimConfig};
use rrls_wrappers::PairAct;
use test_log::test;

fn zeros(n: usize) -> ContinuousAct {
    ContinuousAct(vec![0.0; n])
}

/// Builds the environment of `spec`, resets it and runs a step.
fn build_and_step(spec: &EnvSpec) -> Result<()> {
    match spec.config(ToySimConfig::default())? {
        EnvConfig::Robust(config) => {
            let mut env = RobustEnv::<ToySim>::build(&config, 0)?;
            env.reset(None, None)?;
            env.step(&zeros(env.action_space().dim()))?;
        }
        EnvConfig::Adversarial(config) => {
            let mut env = AdversarialEnv::<ToySim>::build(&config, 0)?;
            env.reset(None, None)?;
            let space = env.action_space();
            let (_, record) = env.step(&PairAct::new(
                zeros(space.agent.dim()),
                zeros(space.adversary.dim()),
            ))?;
            for b in env.params_bound().iter() {
                assert_eq!(record.get_scalar(&b.name)?, b.midpoint() as f32);
            }
        }
        EnvConfig::DomainRandomization(config) => {
            let mut env = DomainRandomizedEnv::<ToySim>::build(&config, 0)?;
            env.reset(None, None)?;
            let params = env.inner().get_params();
            for b in env.params_bound().iter() {
                let v = params.value(&b.name).unwrap();
                assert!(b.low <= v && v <= b.high);
            }
            env.step(&zeros(env.inner().action_space().dim()))?;
        }
        EnvConfig::ProbabilisticActionRobust(config) => {
            let mut env = ActionRobustEnv::<ToySim>::build(&config, 0)?;
            env.reset(None, None)?;
            let dim = env.inner().action_space().dim();
            env.step(&PairAct::new(zeros(dim), zeros(dim)))?;
        }
    }
    Ok(())
}

#[test]
fn test_every_registered_env_runs() -> Result<()> {
    for spec in EnvSpec::all() {
        build_and_step(&spec)?;
    }
    Ok(())
}

#[test]
fn test_registered_envs_are_truncated() -> Result<()> {
    let spec: EnvSpec = "rrls:robust-invertedpendulum".parse()?;
    let config = match spec.config(ToySimConfig::default().reset_noise_scale(0.0))? {
        EnvConfig::Robust(config) => config,
        c => panic!("unexpected configuration: {:?}", c),
    };
    assert_eq!(config.max_steps, Some(MAX_EPISODE_STEPS));

    // the pole stays upright without noise and control
    let mut env = RobustEnv::<ToySim>::build(&config, 0)?;
    env.reset(None, None)?;
    for i in 1..=MAX_EPISODE_STEPS {
        let (step, _) = env.step(&zeros(1))?;
        assert!(!step.is_terminated);
        assert_eq!(step.is_truncated, i == MAX_EPISODE_STEPS);
    }
    Ok(())
}
