use anyhow::Result;
use clap::Parser;
use rrls::{generate_evaluation_set, MeshEvaluator, EVALUATION_MESH_DIM};
use rrls_core::{
    ArrayObs, ContinuousAct, Env as _, Evaluator as _, ParamUpdate, ParameterizedEnv as _,
    Policy,
};
use rrls_envs::{params_bound, Dim, RobustEnv, RobustEnvConfig, Task, ToySim, ToySimConfig};

type Env = RobustEnv<ToySim>;

struct RandomPolicy {
    dim_act: usize,
}

impl Policy<Env> for RandomPolicy {
    fn sample(&mut self, _: &ArrayObs) -> ContinuousAct {
        ContinuousAct((0..self.dim_act).map(|_| 2. * fastrand::f32() - 1.).collect())
    }
}

/// Evaluate a random agent on a mesh of the parameters of a task
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Task (halfcheetah, ant, hopper, humanoidstandup, invertedpendulum, walker)
    #[arg(long, default_value = "invertedpendulum")]
    task: String,

    /// Bounds of the mesh (1d, 2d, 3d, rarl)
    #[arg(long, default_value = "1d")]
    dim: String,

    /// Number of grid points per parameter
    #[arg(long, default_value_t = EVALUATION_MESH_DIM)]
    nb_mesh_dim: usize,

    /// Number of episodes per environment
    #[arg(long, default_value_t = 1)]
    n_episodes: usize,

    /// Maximum number of steps of an episode
    #[arg(long, default_value_t = 1000)]
    max_steps: usize,
}

/// Returns the parameters and the return of every environment of the mesh.
fn run(args: &Args) -> Result<Vec<(ParamUpdate, f32)>> {
    let task: Task = args.task.parse()?;
    let bounds = params_bound(task, args.dim.parse::<Dim>()?)?;
    let factory = |params: &ParamUpdate| {
        let config = RobustEnvConfig::<ToySimConfig>::new(task)
            .params(params.clone())
            .max_steps(Some(args.max_steps));
        Env::build(&config, 0)
    };
    let envs = generate_evaluation_set(factory, &bounds, args.nb_mesh_dim)?;
    let points = envs
        .iter()
        .map(|env| env.get_params().to_update())
        .collect::<Vec<_>>();
    let dim_act = envs.first().map_or(0, |env| env.action_space().dim());

    let mut evaluator = MeshEvaluator::new(envs, args.n_episodes)?;
    let record = evaluator.evaluate(&mut RandomPolicy { dim_act })?;
    println!(
        "Mean return {:.3}, worst return {:.3}",
        record.get_scalar("Episode return")?,
        record.get_scalar("Worst episode return")?
    );

    let returns = record.get_array1("Episode return per env")?;
    Ok(points.into_iter().zip(returns).collect())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    fastrand::seed(42);

    let args = Args::parse();
    for (params, r) in run(&args)? {
        let params = params
            .iter()
            .map(|(name, v)| format!("{} = {:.3}", name, v))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}: {:.3}", params, r);
    }

    Ok(())
}

#[test]
fn test_evaluate_mesh() -> Result<()> {
    fastrand::seed(42);

    let args = Args {
        task: "hopper".to_string(),
        dim: "2d".to_string(),
        nb_mesh_dim: 3,
        n_episodes: 1,
        max_steps: 10,
    };
    let results = run(&args)?;
    assert_eq!(results.len(), 9);
    assert_eq!(results[0].0.get("worldfriction"), Some(0.1));
    assert_eq!(results[0].0.get("torsomass"), Some(0.1));
    assert!(results.iter().all(|(p, _)| p.get("worldfriction").unwrap() < 3.0));
    Ok(())
}
