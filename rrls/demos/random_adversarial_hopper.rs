use anyhow::{bail, Result};
use clap::Parser;
use rrls::{
    registry::{EnvConfig, EnvSpec, Variant},
    AdversarialEnv,
};
use rrls_core::{
    record::BufferedRecorder, util::eval_with_recorder, ArrayObs, ContinuousAct, Env as _, Policy,
};
use rrls_envs::{Dim, Task, ToySim, ToySimConfig};
use rrls_wrappers::PairAct;

type Env = AdversarialEnv<ToySim>;

/// Uniform actions in `[-1, 1]` for both players.
struct RandomPolicy {
    dim_agent: usize,
    dim_adversary: usize,
}

fn uniform(n: usize) -> ContinuousAct {
    ContinuousAct((0..n).map(|_| 2. * fastrand::f32() - 1.).collect())
}

impl Policy<Env> for RandomPolicy {
    fn sample(&mut self, _: &ArrayObs) -> PairAct<ContinuousAct, ContinuousAct> {
        PairAct::new(uniform(self.dim_agent), uniform(self.dim_adversary))
    }
}

/// Run a random agent against a random adversary on the hopper task
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Bounds of the adversary (1d, 2d, 3d, rarl)
    #[arg(long, default_value = "1d")]
    dim: String,

    /// Number of episodes
    #[arg(long, default_value_t = 3)]
    n_episodes: usize,

    /// Maximum number of steps of an episode
    #[arg(long, default_value_t = 1000)]
    max_steps: usize,

    /// Random seed of the environment
    #[arg(long, default_value_t = 42)]
    seed: i64,
}

fn run(args: &Args) -> Result<Vec<f32>> {
    let dim: Dim = args.dim.parse()?;
    let spec = EnvSpec::new(Task::Hopper, Some(Variant::Adversarial(dim)));
    let mut config = match spec.config(ToySimConfig::default())? {
        EnvConfig::Adversarial(config) => config,
        config => bail!("unexpected configuration of {}: {:?}", spec, config),
    };
    config.env = config.env.max_steps(Some(args.max_steps));

    let mut env = Env::build(&config, args.seed)?;
    let space = env.action_space();
    let mut policy = RandomPolicy {
        dim_agent: space.agent.dim(),
        dim_adversary: space.adversary.dim(),
    };
    let mut recorder = BufferedRecorder::new();
    let returns = eval_with_recorder(&mut env, &mut policy, args.n_episodes, &mut recorder)?;

    for b in env.params_bound().iter() {
        let values = recorder
            .iter()
            .map(|r| r.get_scalar(&b.name))
            .collect::<Result<Vec<_>, _>>()?;
        let mean = values.iter().sum::<f32>() / values.len().max(1) as f32;
        println!(
            "{}: mean {:.3} over {} steps, bounds [{}, {}]",
            b.name,
            mean,
            values.len(),
            b.low,
            b.high
        );
    }
    Ok(returns)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    fastrand::seed(42);

    let args = Args::parse();
    let returns = run(&args)?;
    println!("Returns against the {} adversary: {:?}", args.dim, returns);

    Ok(())
}

#[test]
fn test_random_adversarial_hopper() -> Result<()> {
    fastrand::seed(42);

    for dim in ["1d", "3d", "rarl"] {
        let args = Args {
            dim: dim.to_string(),
            n_episodes: 2,
            max_steps: 20,
            seed: 0,
        };
        assert_eq!(run(&args)?.len(), 2);
    }
    Ok(())
}
