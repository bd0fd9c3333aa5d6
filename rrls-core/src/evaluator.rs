//! Evaluation of a [`Policy`] on an environment.
use crate::{record::Record, Env, Policy};
use anyhow::Result;
use log::info;

/// Runs a [`Policy`] and summarizes its performance in a [`Record`].
pub trait Evaluator<E: Env> {
    /// Evaluates `policy`.
    ///
    /// The returned record has at least the mean return as `"Episode return"`.
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>;
}

/// Mean return over a fixed number of episodes.
///
/// Episode `i` is started with [`Env::reset_with_index`], so that two evaluations of
/// the same policy see the same initial states.
///
/// ```ignore
/// let config = RobustEnvConfig::<ToySimConfig>::new(Task::Hopper);
/// let mut evaluator = DefaultEvaluator::<RobustEnv<ToySim>>::new(&config, 42, 10)?;
/// let record = evaluator.evaluate(&mut policy)?;
/// println!("Mean return: {}", record.get_scalar("Episode return")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    env: E,
}

impl<E: Env> DefaultEvaluator<E> {
    /// Builds the environment and the evaluator.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self>
    where
        E: Sized,
    {
        Ok(Self::from_env(E::build(config, seed)?, n_episodes))
    }

    /// Constructs the evaluator on an already built environment.
    pub fn from_env(env: E, n_episodes: usize) -> Self {
        Self { n_episodes, env }
    }

    /// The environment used for evaluation.
    pub fn env(&self) -> &E {
        &self.env
    }
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    /// Errors of the environment are returned as they are.
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>,
    {
        let mut r_total = 0f32;

        for ix in 0..self.n_episodes {
            let mut obs = self.env.reset_with_index(ix)?;
            loop {
                let (step, _) = self.env.step(&policy.sample(&obs))?;
                r_total += step.reward;
                if step.is_done() {
                    break;
                }
                obs = step.obs;
            }
        }

        let r_mean = r_total / self.n_episodes.max(1) as f32;
        info!("Evaluated {} episodes, mean return = {}", self.n_episodes, r_mean);
        Ok(Record::from_scalar("Episode return", r_mean))
    }
}
