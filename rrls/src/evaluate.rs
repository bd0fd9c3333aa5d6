//! Evaluation of policies over a mesh of physical parameters.
//!
//! Robustness is assessed offline by running a policy on a battery of environments
//! whose parameters cover the bounds of a task on a regular grid. The battery is built
//! once, each environment owning its own simulator.
use anyhow::Result;
use itertools::Itertools;
use log::info;
use rrls_core::{
    error::RrlsError,
    record::{Record, RecordValue},
    DefaultEvaluator, Env, Evaluator, ParamBounds, ParamUpdate, Policy,
};
use rrls_envs::{params_bound, Dim, RobustEnv, RobustEnvConfig, Simulator, Task};

/// Number of grid points per parameter of the named evaluation sets.
pub const EVALUATION_MESH_DIM: usize = 10;

/// Grid points of a single interval: `low, low + step, ...`, strictly below `high`.
fn axis(low: f64, high: f64, nb_mesh_dim: usize) -> Vec<f64> {
    let step = (high - low) / nb_mesh_dim as f64;
    (0..nb_mesh_dim).map(|i| low + i as f64 * step).collect()
}

/// Parameter values of the mesh over `bounds`.
///
/// Each interval `[low, high]` is split into `nb_mesh_dim` points
/// `low + i * (high - low) / nb_mesh_dim`, `i = 0, ..., nb_mesh_dim - 1`; `high` is never
/// reached. The mesh is the Cartesian product of these axes in lexicographic order,
/// following the order of the parameters in `bounds`, so that it has
/// `nb_mesh_dim.pow(bounds.len())` points. Empty bounds give a single empty update.
///
/// It fails with [`RrlsError::InvalidMesh`] if `nb_mesh_dim` is zero or an interval is
/// empty, and with [`RrlsError::InvalidBounds`] if an interval is malformed.
pub fn mesh_grid(bounds: &ParamBounds, nb_mesh_dim: usize) -> Result<Vec<ParamUpdate>> {
    if nb_mesh_dim == 0 {
        return Err(RrlsError::InvalidMesh("nb_mesh_dim must be positive".to_string()).into());
    }
    bounds.validate()?;
    if bounds.is_empty() {
        return Ok(vec![ParamUpdate::new()]);
    }
    if let Some(b) = bounds.iter().find(|b| b.low == b.high) {
        return Err(RrlsError::InvalidMesh(format!(
            "interval of {} is empty: [{}, {}[",
            b.name, b.low, b.high
        ))
        .into());
    }

    let points = bounds
        .iter()
        .map(|b| axis(b.low, b.high, nb_mesh_dim))
        .multi_cartesian_product()
        .map(|values| bounds.names().zip(values).collect::<ParamUpdate>())
        .collect();
    Ok(points)
}

/// Builds one environment per point of the mesh over `bounds`.
///
/// `factory` receives the parameter values of a point and returns an environment
/// constructed with them. Environments are returned in the order of [`mesh_grid`].
pub fn generate_evaluation_set<E, F>(
    mut factory: F,
    bounds: &ParamBounds,
    nb_mesh_dim: usize,
) -> Result<Vec<E>>
where
    F: FnMut(&ParamUpdate) -> Result<E>,
{
    let points = mesh_grid(bounds, nb_mesh_dim)?;
    info!(
        "Generate evaluation set of {} environments over {:?}",
        points.len(),
        bounds.names().collect::<Vec<_>>()
    );
    points.iter().map(|p| factory(p)).collect()
}

/// Named evaluation set of a task.
///
/// It is the mesh of [`EVALUATION_MESH_DIM`] points per parameter over the bounds
/// `dim` of `task`, each environment being a [`RobustEnv`] constructed with the values
/// of its point.
pub fn evaluation_set<S: Simulator>(
    task: Task,
    dim: Dim,
    sim_config: &S::Config,
) -> Result<Vec<RobustEnv<S>>> {
    let bounds = params_bound(task, dim)?;
    let factory = |params: &ParamUpdate| {
        let config = RobustEnvConfig::new(task)
            .params(params.clone())
            .sim(sim_config.clone());
        RobustEnv::<S>::build(&config, 0)
    };
    generate_evaluation_set(factory, &bounds, EVALUATION_MESH_DIM)
}

/// Evaluates a policy on every environment of an evaluation set.
///
/// Each environment runs `n_episodes` episodes with [`DefaultEvaluator`]. The returned
/// [`Record`] has the mean return over all environments as `"Episode return"`, the
/// lowest one as `"Worst episode return"`, and the return of each environment, in the
/// order of the set, as `"Episode return per env"`.
pub struct MeshEvaluator<E: Env> {
    evaluators: Vec<DefaultEvaluator<E>>,
}

impl<E: Env> MeshEvaluator<E> {
    /// Constructs the evaluator on an evaluation set.
    ///
    /// It fails with [`RrlsError::InvalidMesh`] if `envs` is empty.
    pub fn new(envs: Vec<E>, n_episodes: usize) -> Result<Self> {
        if envs.is_empty() {
            return Err(RrlsError::InvalidMesh("empty evaluation set".to_string()).into());
        }
        let evaluators = envs
            .into_iter()
            .map(|env| DefaultEvaluator::from_env(env, n_episodes))
            .collect();
        Ok(Self { evaluators })
    }
}

impl<E: Env> Evaluator<E> for MeshEvaluator<E> {
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>,
    {
        let returns = self
            .evaluators
            .iter_mut()
            .map(|e| e.evaluate(policy)?.get_scalar("Episode return").map_err(Into::into))
            .collect::<Result<Vec<f32>>>()?;

        let mean = returns.iter().sum::<f32>() / returns.len() as f32;
        let worst = returns.iter().copied().fold(f32::INFINITY, f32::min);
        info!(
            "Evaluated {} environments, mean return = {}, worst return = {}",
            returns.len(),
            mean,
            worst
        );

        let mut record = Record::from_scalar("Episode return", mean);
        record.insert("Worst episode return", RecordValue::Scalar(worst));
        record.insert("Episode return per env", RecordValue::Array1(returns));
        Ok(record)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rrls_core::{ArrayObs, ContinuousAct, ParameterizedEnv};
    use rrls_envs::{ToySim, ToySimConfig};
    use test_log::test;

    #[test]
    fn test_mesh_is_half_open() -> Result<()> {
        let bounds = ParamBounds::from_slice(&[("polemass", 0.1, 3.0)]);
        let points = mesh_grid(&bounds, 10)?;
        assert_eq!(points.len(), 10);
        for (i, p) in points.iter().enumerate() {
            let v = p.get("polemass").unwrap();
            assert!((v - (0.1 + 0.29 * i as f64)).abs() < 1e-9);
            assert!(v < 3.0);
        }
        Ok(())
    }

    #[test]
    fn test_mesh_is_lexicographic() -> Result<()> {
        let bounds = ParamBounds::from_slice(&[("b", 0.0, 2.0), ("a", 10.0, 13.0)]);
        let points = mesh_grid(&bounds, 2)?;
        let values = points
            .iter()
            .map(|p| (p.get("b").unwrap(), p.get("a").unwrap()))
            .collect::<Vec<_>>();
        assert_eq!(values, vec![(0.0, 10.0), (0.0, 11.5), (1.0, 10.0), (1.0, 11.5)]);
        Ok(())
    }

    #[test]
    fn test_mesh_cardinality() -> Result<()> {
        let bounds = params_bound(Task::HalfCheetah, Dim::Three)?;
        assert_eq!(mesh_grid(&bounds, 4)?.len(), 64);
        assert_eq!(mesh_grid(&ParamBounds::new(), 4)?, vec![ParamUpdate::new()]);
        Ok(())
    }

    #[test]
    fn test_invalid_mesh() {
        let bounds = ParamBounds::from_slice(&[("a", 1.0, 1.0)]);
        for (bounds, nb) in [(bounds, 3), (ParamBounds::from_slice(&[("a", 0.0, 1.0)]), 0)] {
            let err = mesh_grid(&bounds, nb).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<RrlsError>(),
                Some(RrlsError::InvalidMesh(_))
            ));
        }
    }

    #[test]
    fn test_factory_receives_every_point() -> Result<()> {
        let bounds = ParamBounds::from_slice(&[("x", 0.0, 1.0), ("y", 0.0, 1.0)]);
        let mut calls = 0;
        let set = generate_evaluation_set(
            |p| {
                calls += 1;
                Ok(p.clone())
            },
            &bounds,
            3,
        )?;
        assert_eq!(calls, 9);
        assert_eq!(set, mesh_grid(&bounds, 3)?);
        Ok(())
    }

    #[test]
    fn test_factory_errors_propagate() {
        let bounds = ParamBounds::from_slice(&[("x", 0.0, 1.0)]);
        let res: Result<Vec<()>> =
            generate_evaluation_set(|_| Err(anyhow::anyhow!("broken factory")), &bounds, 2);
        assert_eq!(res.unwrap_err().to_string(), "broken factory");
    }

    #[test]
    fn test_evaluation_set() -> Result<()> {
        let sim_config = ToySimConfig::default();
        let set = evaluation_set::<ToySim>(Task::InvertedPendulum, Dim::Two, &sim_config)?;
        assert_eq!(set.len(), 100);
        assert_eq!(set[0].get_params().value("polemass"), Some(1.0));
        assert_eq!(set[0].get_params().value("cartmass"), Some(1.0));
        assert_eq!(set[1].get_params().value("cartmass"), Some(2.0));
        assert_eq!(set[10].get_params().value("polemass"), Some(4.0));
        assert_eq!(set[1].model().body_mass[2], 1.0);
        assert_eq!(set[10].model().body_mass[2], 4.0);
        Ok(())
    }

    #[test]
    fn test_mesh_evaluator_needs_an_env() {
        let err = MeshEvaluator::<RobustEnv<ToySim>>::new(vec![], 1).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<RrlsError>(),
            Some(RrlsError::InvalidMesh(_))
        ));
    }

    struct ZeroPolicy(usize);

    impl Policy<RobustEnv<ToySim>> for ZeroPolicy {
        fn sample(&mut self, _: &ArrayObs) -> ContinuousAct {
            ContinuousAct(vec![0.0; self.0])
        }
    }

    #[test]
    fn test_mesh_evaluator() -> Result<()> {
        let bounds = params_bound(Task::InvertedPendulum, Dim::One)?;
        let factory = |p: &ParamUpdate| {
            let config = RobustEnvConfig::<ToySimConfig>::new(Task::InvertedPendulum)
                .params(p.clone())
                .max_steps(Some(20));
            RobustEnv::<ToySim>::build(&config, 0)
        };
        let envs = generate_evaluation_set(factory, &bounds, 3)?;
        let mut evaluator = MeshEvaluator::new(envs, 2)?;

        let record = evaluator.evaluate(&mut ZeroPolicy(1))?;
        let returns = record.get_array1("Episode return per env")?;
        assert_eq!(returns.len(), 3);
        let mean = returns.iter().sum::<f32>() / 3.0;
        assert!((record.get_scalar("Episode return")? - mean).abs() < 1e-4);
        let worst = record.get_scalar("Worst episode return")?;
        assert!(returns.iter().all(|r| worst <= *r));
        Ok(())
    }
}
