use anyhow::{bail, Result};
use clap::Parser;
use rrls::{
    registry::{EnvConfig, EnvSpec},
    DomainRandomizedEnv,
};
use rrls_core::{ArrayObs, ContinuousAct, Env as _, Policy};
use rrls_envs::{ToySim, ToySimConfig};

type Env = DomainRandomizedEnv<ToySim>;

struct RandomPolicy;

impl Policy<Env> for RandomPolicy {
    fn sample(&mut self, _: &ArrayObs) -> ContinuousAct {
        ContinuousAct(vec![2. * fastrand::f32() - 1.])
    }
}

/// Run a random agent on the inverted pendulum with masses drawn at every episode
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Registered id of the environment
    #[arg(long, default_value = "rrls:robust-invertedpendulum-domain-randomization-2d")]
    env: String,

    /// Number of episodes
    #[arg(long, default_value_t = 100)]
    n_episodes: usize,

    /// Maximum number of steps of an episode
    #[arg(long, default_value_t = 200)]
    max_steps: usize,
}

/// Returns the mean of each randomized parameter and the mean episode length.
fn run(args: &Args) -> Result<(Vec<(String, f32)>, f32)> {
    let spec: EnvSpec = args.env.parse()?;
    let mut config = match spec.config(ToySimConfig::default())? {
        EnvConfig::DomainRandomization(config) => config,
        _ => bail!("{} is not randomized", spec),
    };
    config.env = config.env.max_steps(Some(args.max_steps));

    let mut env = Env::build(&config, 42)?;
    let names = env.params_bound().names().map(String::from).collect::<Vec<_>>();
    let mut sums = vec![0f32; names.len()];
    let mut policy = RandomPolicy;
    let mut n_steps = 0;

    for _ in 0..args.n_episodes {
        let (mut obs, record) = env.reset(None, None)?;
        for (sum, name) in sums.iter_mut().zip(names.iter()) {
            *sum += record.get_scalar(name)?;
        }
        loop {
            let (step, _) = env.step(&policy.sample(&obs))?;
            n_steps += 1;
            if step.is_done() {
                break;
            }
            obs = step.obs;
        }
    }

    let n = args.n_episodes.max(1) as f32;
    let means = names
        .into_iter()
        .zip(sums)
        .map(|(name, sum)| (name, sum / n))
        .collect();
    Ok((means, n_steps as f32 / n))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    fastrand::seed(42);

    let args = Args::parse();
    let (means, length) = run(&args)?;
    for (name, mean) in means {
        println!("{}: mean {:.3}", name, mean);
    }
    println!("Mean episode length: {:.1}", length);

    Ok(())
}

#[test]
fn test_domain_randomization_pendulum() -> Result<()> {
    fastrand::seed(42);

    let args = Args {
        env: "rrls:robust-invertedpendulum-domain-randomization-1d".to_string(),
        n_episodes: 100,
        max_steps: 5,
    };
    let (means, _) = run(&args)?;
    assert_eq!(means.len(), 1);
    assert_eq!(means[0].0, "polemass");
    assert!((means[0].1 - 16.0).abs() < 3.0);
    Ok(())
}
