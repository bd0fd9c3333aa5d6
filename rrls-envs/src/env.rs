//! Locomotion environment with modifiable physical parameters.
use crate::{PhysicsModel, RobustEnvConfig, Simulator, Task};
use anyhow::Result;
use log::{debug, info, trace};
use rrls_core::{
    merge, record::Record, ArrayObs, BoxSpace, ContinuousAct, Env, ParamSet, ParamUpdate,
    ParameterizedEnv, Step,
};

/// A [`Task`] run by a [`Simulator`] whose masses, frictions and applied forces can
/// be changed between and within episodes.
///
/// The parameters of the task are listed in [`Task::targets`]. An unset parameter
/// leaves the corresponding quantity at the value the simulator had when the
/// environment was built. Both [`Env::step`] and [`Env::reset`] return the current
/// parameters, as [`Step::info`] and in the returned [`Record`].
///
/// Cloning the environment clones the simulator; the clone shares no state with the
/// original.
#[derive(Debug, Clone)]
pub struct RobustEnv<S: Simulator> {
    task: Task,
    sim: S,
    nominal: PhysicsModel,
    params: ParamSet,
    defaults: ParamSet,
    max_steps: Option<usize>,
    count_steps: usize,
}

impl<S: Simulator> RobustEnv<S> {
    /// Task of the environment.
    pub fn task(&self) -> Task {
        self.task
    }

    /// The simulator.
    pub fn sim(&self) -> &S {
        &self.sim
    }

    /// Arrays of the simulator model as currently realized.
    pub fn model(&self) -> &PhysicsModel {
        self.sim.model()
    }

    /// Arrays of the simulator model when the environment was built.
    pub fn nominal_model(&self) -> &PhysicsModel {
        &self.nominal
    }
}

impl<S: Simulator> Env for RobustEnv<S> {
    type Config = RobustEnvConfig<S::Config>;
    type Obs = ArrayObs;
    type Act = ContinuousAct;
    type Info = ParamSet;

    /// Constructs [`RobustEnv`].
    ///
    /// It fails with [`RrlsError::IncompatibleModel`] if the model of the simulator
    /// lacks a body or a geometry targeted by a parameter of the task, and with
    /// [`RrlsError::UnknownParameter`] if `config.params` has a name the task does not
    /// define.
    ///
    /// [`RrlsError::IncompatibleModel`]: rrls_core::error::RrlsError::IncompatibleModel
    /// [`RrlsError::UnknownParameter`]: rrls_core::error::RrlsError::UnknownParameter
    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let task = config.task;
        let sim = S::build(task, &config.sim, seed)?;
        for (name, target) in task.targets() {
            sim.model().check(name, target)?;
        }

        let schema = ParamSet::unset(task.param_names());
        let defaults = merge(&schema, &config.params, &schema)?;
        let nominal = sim.model().clone();
        info!("Build RobustEnv for {} with seed {}", task, seed);

        let mut env = Self {
            task,
            sim,
            nominal,
            params: defaults.clone(),
            defaults,
            max_steps: config.max_steps,
            count_steps: 0,
        };
        env.change_params()?;
        Ok(env)
    }

    /// Runs a step of the simulator.
    ///
    /// The episode is truncated when the number of steps reaches `max_steps`.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        trace!("RobustEnv::step()");
        let sim_step = self.sim.step(&a.0)?;
        self.count_steps += 1;
        let is_truncated = self
            .max_steps
            .map_or(false, |max_steps| self.count_steps >= max_steps);

        let step = Step::new(
            ArrayObs(sim_step.obs),
            a.clone(),
            sim_step.reward,
            sim_step.is_terminated,
            is_truncated,
            self.params.clone(),
        );
        Ok((step, self.params.to_record()))
    }

    /// Resets the environment.
    ///
    /// Parameters in `options` are set before the simulator is reset.
    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ParamUpdate>,
    ) -> Result<(Self::Obs, Record)> {
        trace!("RobustEnv::reset()");
        if let Some(options) = options {
            self.set_params(options)?;
        }
        let obs = self.sim.reset(seed)?;
        self.count_steps = 0;
        Ok((ArrayObs(obs), self.params.to_record()))
    }
}

impl<S: Simulator> ParameterizedEnv for RobustEnv<S> {
    fn get_params(&self) -> ParamSet {
        self.params.clone()
    }

    fn set_params(&mut self, update: &ParamUpdate) -> Result<()> {
        self.params = merge(&self.params, update, &self.defaults)?;
        self.change_params()
    }

    fn restore_params(&mut self, params: &ParamSet) -> Result<()> {
        let mut next = ParamSet::unset(self.task.param_names());
        for (name, value) in params.iter() {
            next.set(name, value)?;
        }
        self.params = next;
        self.change_params()
    }

    fn change_params(&mut self) -> Result<()> {
        let model = self.sim.model_mut();
        for (name, target) in self.task.targets() {
            match self.params.value(name) {
                Some(v) => model.set(target, v),
                None => model.copy_from(&self.nominal, target),
            }
        }
        debug!("Realized parameters of {}: {:?}", self.task, self.params);
        Ok(())
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::uniform(self.sim.action_dim(), -1.0, 1.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{task::Target, SimStep, ToySim, ToySimConfig};
    use rrls_core::error::RrlsError;
    use test_log::test;

    type ToyEnv = RobustEnv<ToySim>;

    fn config(task: Task) -> RobustEnvConfig<ToySimConfig> {
        RobustEnvConfig::new(task)
    }

    #[test]
    fn test_constructor_params_are_realized() -> Result<()> {
        let config = config(Task::Hopper)
            .param("worldfriction", 2.0)
            .param("thighmass", 0.5);
        let env = ToyEnv::build(&config, 0)?;
        assert_eq!(env.model().geom_friction[0][0], 2.0);
        assert_eq!(env.model().body_mass[2], 0.5);
        assert_eq!(env.model().body_mass[1], env.nominal_model().body_mass[1]);

        let params = env.get_params();
        assert_eq!(params.value("thighmass"), Some(0.5));
        assert_eq!(params.get("torsomass"), Some(None));
        assert_eq!(params.len(), Task::Hopper.targets().len());
        Ok(())
    }

    #[test]
    fn test_friction_of_all_geoms() -> Result<()> {
        let mut env = ToyEnv::build(&config(Task::HalfCheetah), 0)?;
        env.set_params(&ParamUpdate::new().with("worldfriction", 1.5))?;
        assert!(env.model().geom_friction.iter().all(|f| f[0] == 1.5));
        Ok(())
    }

    #[test]
    fn test_forces() -> Result<()> {
        let mut env = ToyEnv::build(&config(Task::Ant), 0)?;
        env.set_params(&ParamUpdate::new().with("torsoforce_y", -2.0))?;
        assert_eq!(env.model().xfrc_applied[1][1], -2.0);

        env.restore_params(&ParamSet::unset(Task::Ant.param_names()))?;
        assert_eq!(env.model(), env.nominal_model());
        Ok(())
    }

    #[test]
    fn test_unset_falls_back_to_constructor_params() -> Result<()> {
        let config = config(Task::Walker2d).param("torsomass", 4.0);
        let mut env = ToyEnv::build(&config, 0)?;
        let mut params = env.get_params();
        params.set("torsomass", None)?;
        env.restore_params(&params)?;
        assert_eq!(
            env.model().get(&Target::BodyMass(1)),
            env.nominal_model().get(&Target::BodyMass(1))
        );

        env.set_params(&ParamUpdate::new().with("footmass", 1.0))?;
        assert_eq!(env.get_params().value("torsomass"), Some(4.0));
        assert_eq!(env.get_params().value("footmass"), Some(1.0));
        Ok(())
    }

    #[test]
    fn test_reset_with_options() -> Result<()> {
        let mut env = ToyEnv::build(&config(Task::InvertedPendulum), 0)?;
        let options = ParamUpdate::new().with("polemass", 20.0);
        let (_, record) = env.reset(Some(0), Some(&options))?;
        assert_eq!(record.get_scalar("polemass")?, 20.0);
        assert!(record.get("cartmass").is_none());
        assert_eq!(env.model().body_mass[2], 20.0);

        let (step, record) = env.step(&ContinuousAct(vec![0.0]))?;
        assert_eq!(step.info.value("polemass"), Some(20.0));
        assert_eq!(record.get_scalar("polemass")?, 20.0);
        Ok(())
    }

    #[test]
    fn test_unknown_parameter() -> Result<()> {
        let config = config(Task::Hopper).param("wingmass", 1.0);
        let err = ToyEnv::build(&config, 0).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RrlsError>(),
            Some(&RrlsError::UnknownParameter("wingmass".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_max_steps() -> Result<()> {
        let config = config(Task::HalfCheetah).max_steps(Some(3));
        let mut env = ToyEnv::build(&config, 0)?;
        env.reset(Some(0), None)?;
        let act = ContinuousAct(vec![0.0; 6]);
        let mut n = 0;
        loop {
            let (step, _) = env.step(&act)?;
            n += 1;
            if step.is_done() {
                assert!(step.is_truncated);
                break;
            }
        }
        assert_eq!(n, 3);
        Ok(())
    }

    #[test]
    fn test_clone_is_independent() -> Result<()> {
        let mut env = ToyEnv::build(&config(Task::Hopper), 0)?;
        env.reset(Some(1), None)?;
        let mut copy = env.clone();
        let act = ContinuousAct(vec![0.3, -0.2, 0.9]);

        copy.set_params(&ParamUpdate::new().with("torsomass", 0.2))?;
        for _ in 0..5 {
            copy.step(&act)?;
        }
        assert_eq!(env.get_params().get("torsomass"), Some(None));

        let mut reference = ToyEnv::build(&config(Task::Hopper), 0)?;
        reference.reset(Some(1), None)?;
        for _ in 0..5 {
            let (a, _) = env.step(&act)?;
            let (b, _) = reference.step(&act)?;
            assert_eq!(a.obs, b.obs);
        }
        Ok(())
    }

    /// A simulator whose model has a single body.
    #[derive(Debug)]
    struct OneBodySim(PhysicsModel);

    impl Simulator for OneBodySim {
        type Config = ();

        fn build(_task: Task, _config: &(), _seed: i64) -> Result<Self> {
            Ok(Self(PhysicsModel {
                body_mass: vec![0.0, 1.0],
                geom_friction: vec![[1.0, 0.0, 0.0]],
                xfrc_applied: vec![[0.0; 6]; 2],
            }))
        }

        fn model(&self) -> &PhysicsModel {
            &self.0
        }

        fn model_mut(&mut self) -> &mut PhysicsModel {
            &mut self.0
        }

        fn reset(&mut self, _seed: Option<u64>) -> Result<Vec<f32>> {
            Ok(vec![0.0])
        }

        fn step(&mut self, _action: &[f32]) -> Result<SimStep> {
            Ok(SimStep {
                obs: vec![0.0],
                reward: 0.0,
                is_terminated: false,
            })
        }

        fn action_dim(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_incompatible_model() {
        let config = RobustEnvConfig::<()>::new(Task::Hopper);
        let err = RobustEnv::<OneBodySim>::build(&config, 0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RrlsError>(),
            Some(RrlsError::IncompatibleModel { .. })
        ));
    }
}
