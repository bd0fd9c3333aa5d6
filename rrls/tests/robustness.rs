use anyhow::Result;
use rrls::{generate_evaluation_set, ActionRobustEnv, AdversarialEnv, DomainRandomizedEnv};
use rrls_core::{
    check_bounds, denormalize,
    dummy::{DummyParamEnv, DummyParamEnvConfig},
    ArrayObs, ContinuousAct, Env, ParamBounds, ParamUpdate, ParameterizedEnv,
};
use rrls_envs::{dims, params_bound, Dim, RobustEnv, RobustEnvConfig, Task, ToySim, ToySimConfig};
use rrls_wrappers::{
    DomainRandomizationConfig, DynamicAdversarial, DynamicAdversarialConfig, PairAct,
    ProbabilisticActionRobustConfig,
};
use test_log::test;

type Act = PairAct<ContinuousAct, ContinuousAct>;

fn uniform(n: usize) -> ContinuousAct {
    ContinuousAct((0..n).map(|_| 2. * fastrand::f32() - 1.).collect())
}

fn task_config(task: Task) -> RobustEnvConfig<ToySimConfig> {
    RobustEnvConfig::new(task).max_steps(Some(200))
}

#[test]
fn test_denormalization_is_affine() {
    for (low, high) in [(0.1, 3.0), (-5.0, 5.0), (1.0, 31.0), (2.0, 2.0)] {
        assert_eq!(denormalize(-1.0, low, high), low);
        assert_eq!(denormalize(1.0, low, high), high);
        assert!((denormalize(0.0, low, high) - (low + high) / 2.0).abs() < 1e-12);

        let values = (0..=100)
            .map(|i| denormalize(-1.0 + 0.02 * i as f64, low, high))
            .collect::<Vec<_>>();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_adversarial_reset_restores_default_params() -> Result<()> {
    fastrand::seed(42);
    let config = DynamicAdversarialConfig::new(
        task_config(Task::Hopper).param("torsomass", 2.0),
        params_bound(Task::Hopper, Dim::Three)?,
    );
    let mut env = AdversarialEnv::<ToySim>::build(&config, 0)?;
    let defaults = env.inner().get_params();
    let model = env.inner().model().clone();
    assert_eq!(defaults.value("torsomass"), Some(2.0));
    assert_eq!(defaults.get("thighmass"), Some(None));

    for episode in 0..3 {
        env.reset(None, None)?;
        assert_eq!(env.inner().get_params(), defaults);
        assert_eq!(env.inner().model(), &model);

        for _ in 0..(10 + episode * 7) {
            let (step, _) = env.step(&PairAct::new(uniform(3), uniform(3)))?;
            assert_ne!(env.inner().get_params(), defaults);
            if step.is_done() {
                break;
            }
        }
    }
    env.reset(Some(5), None)?;
    assert_eq!(env.inner().get_params(), defaults);
    assert_eq!(env.inner().model(), &model);
    Ok(())
}

#[test]
fn test_mesh_over_a_single_parameter() -> Result<()> {
    let bounds = ParamBounds::from_slice(&[("mass_a", 0.1, 3.0)]);
    let factory = |p: &ParamUpdate| {
        DummyParamEnv::build(&DummyParamEnvConfig::default().params(p.clone()), 0)
    };
    let envs = generate_evaluation_set(factory, &bounds, 10)?;
    assert_eq!(envs.len(), 10);
    for (i, env) in envs.iter().enumerate() {
        let v = env.get_params().value("mass_a").unwrap();
        assert!((v - (0.1 + 0.29 * i as f64)).abs() < 1e-9);
        assert!(v < 3.0);
        assert_eq!(env.physical()[0], v);
    }
    Ok(())
}

#[test]
fn test_domain_randomization_mean() -> Result<()> {
    let config = DomainRandomizationConfig::new(
        task_config(Task::InvertedPendulum),
        params_bound(Task::InvertedPendulum, Dim::One)?,
    );
    let mut env = DomainRandomizedEnv::<ToySim>::build(&config, 123)?;

    let mut sum = 0.0;
    for _ in 0..100 {
        let (_, record) = env.reset(None, None)?;
        let v = env.inner().get_params().value("polemass").unwrap();
        assert!((1.0..=31.0).contains(&v));
        assert_eq!(record.get_scalar("polemass")?, v as f32);
        assert_eq!(env.inner().model().body_mass[2], v);
        sum += v;
    }
    let mean = sum / 100.0;
    assert!((mean - 16.0).abs() < 3.0, "mean = {}", mean);
    Ok(())
}

/// Observations of an episode run from the current state of `env`.
fn run<E, F>(env: &mut E, acts: &[Act], f: F) -> Result<Vec<Vec<f32>>>
where
    E: Env<Obs = ArrayObs>,
    F: Fn(&Act) -> E::Act,
{
    let mut obs = vec![];
    for a in acts {
        let (step, _) = env.step(&f(a))?;
        let done = step.is_done();
        obs.push(step.obs.0);
        if done {
            break;
        }
    }
    Ok(obs)
}

fn trajectory<E, F>(env: &mut E, acts: &[Act], f: F) -> Result<Vec<Vec<f32>>>
where
    E: Env<Obs = ArrayObs>,
    F: Fn(&Act) -> E::Act,
{
    env.reset(Some(3), None)?;
    run(env, acts, f)
}

#[test]
fn test_action_robust_boundaries() -> Result<()> {
    fastrand::seed(7);
    let acts = (0..50)
        .map(|_| PairAct::new(uniform(6), uniform(6)))
        .collect::<Vec<_>>();
    let base = task_config(Task::HalfCheetah);

    let mut env = RobustEnv::<ToySim>::build(&base, 1)?;
    let agent = trajectory(&mut env, &acts, |a| a.agent.clone())?;
    let adversary = trajectory(&mut env, &acts, |a| a.adversary.clone())?;
    assert_ne!(agent, adversary);

    for (alpha, expected) in [(0.0, agent), (1.0, adversary)] {
        let config = ProbabilisticActionRobustConfig::new(base.clone()).alpha(alpha);
        let mut env = ActionRobustEnv::<ToySim>::build(&config, 1)?;
        assert_eq!(trajectory(&mut env, &acts, |a| a.clone())?, expected);
    }
    Ok(())
}

#[test]
fn test_clone_is_isolated() -> Result<()> {
    fastrand::seed(11);
    let acts = (0..40)
        .map(|_| PairAct::new(uniform(6), uniform(3)))
        .collect::<Vec<_>>();
    let config = DynamicAdversarialConfig::new(
        task_config(Task::Walker2d),
        params_bound(Task::Walker2d, Dim::Three)?,
    );

    let mut fresh = AdversarialEnv::<ToySim>::build(&config, 0)?;
    let expected = trajectory(&mut fresh, &acts, |a| a.clone())?;

    let mut env = AdversarialEnv::<ToySim>::build(&config, 0)?;
    env.reset(Some(3), None)?;
    let mut copy = env.clone();
    for _ in 0..30 {
        let (step, _) = copy.step(&PairAct::new(uniform(6), uniform(3)))?;
        if step.is_done() {
            copy.reset(None, None)?;
        }
    }
    assert_eq!(run(&mut env, &acts, |a| a.clone())?, expected);
    Ok(())
}

#[test]
fn test_adversary_sets_mass_a_to_its_lower_bound() -> Result<()> {
    let env = DummyParamEnv::build(&DummyParamEnvConfig::default(), 0)?;
    let bounds = ParamBounds::from_slice(&[("mass_a", 0.1, 3.0)]);
    let mut env = DynamicAdversarial::new(env, bounds)?;
    env.reset(None, None)?;

    let a = PairAct::new(ContinuousAct(vec![0.5, 0.0]), ContinuousAct(vec![-1.0]));
    let (step, record) = env.step(&a)?;
    assert_eq!(record.get_scalar("mass_a")?, 0.1);
    assert_eq!(step.info.params.get("mass_a"), Some(0.1));
    assert_eq!(env.inner().physical()[0], 0.1);
    assert_eq!(record.get_scalar("adversarial_reward")?, -step.reward);
    assert_eq!(step.info.adversarial_reward, -step.reward);
    Ok(())
}

#[test]
fn test_bounds_are_nested_and_known() -> Result<()> {
    let sim_config = ToySimConfig::default();
    for task in Task::ALL {
        let env = RobustEnv::<ToySim>::build(&task_config(task).sim(sim_config.clone()), 0)?;
        let mut previous: Option<ParamBounds> = None;
        for dim in [Dim::One, Dim::Two, Dim::Three] {
            let bounds = match params_bound(task, dim) {
                Ok(bounds) => bounds,
                Err(_) => {
                    assert_eq!((task, dim), (Task::InvertedPendulum, Dim::Three));
                    continue;
                }
            };
            assert_eq!(bounds.len(), dim as usize + 1);
            check_bounds(&env, &bounds)?;
            if let Some(previous) = previous {
                assert!(previous.is_subset_of(&bounds), "{} {}", task, dim);
            }
            previous = Some(bounds);
        }
        check_bounds(&env, &params_bound(task, Dim::Rarl)?)?;
    }
    Ok(())
}

#[test]
fn test_every_bound_endpoint_changes_the_dynamics() -> Result<()> {
    for task in Task::ALL {
        let mut env = RobustEnv::<ToySim>::build(&task_config(task).max_steps(Some(50)), 0)?;
        let act = ContinuousAct(vec![1.0; env.action_space().dim()]);
        for dim in dims(task) {
            for b in params_bound(task, dim)?.iter() {
                for value in [b.low, b.high] {
                    env.reset(Some(0), None)?;
                    loop {
                        let mut perturbed = env.clone();
                        perturbed.set_params(&ParamUpdate::new().with(b.name.as_str(), value))?;
                        let (expected, _) = perturbed.step(&act)?;
                        let (step, _) = env.step(&act)?;
                        assert_ne!(
                            step.obs, expected.obs,
                            "{} {} {}={}",
                            task, dim, b.name, value
                        );
                        if step.is_done() {
                            break;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
