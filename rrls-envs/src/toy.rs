//! A deterministic point-mass simulator.
//!
//! [`ToySim`] is not a physics engine. It moves a chain of point masses, one per body
//! of the task, connected by damped springs, pulled by gravity onto a frictional floor
//! and pushed by the control input and the externally applied forces. Floor friction
//! grows with the normal load, so vertical forces matter even for bodies at rest. It is enough to
//! make observations depend on every mass, friction and force parameter, so that
//! environments and wrappers can be run and tested without an external simulator.
use crate::{PhysicsModel, SimStep, Simulator, Task};
use anyhow::Result;
use log::trace;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rrls_core::error::RrlsError;
use serde::{Deserialize, Serialize};

const GRAVITY: f64 = 9.81;
const STIFFNESS: f64 = 50.0;
const DAMPING: f64 = 0.5;
const GEAR: f64 = 20.0;
const FRICTION_RATE: f64 = 5.0;
const LINK: f64 = 0.1;
const CTRL_COST_WEIGHT: f32 = 0.1;

/// Configuration of [`ToySim`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToySimConfig {
    /// Time step of the integrator.
    pub dt: f64,

    /// Number of integration steps per control step.
    pub frame_skip: usize,

    /// Scale of the uniform noise added to the initial state.
    pub reset_noise_scale: f64,
}

impl Default for ToySimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            frame_skip: 5,
            reset_noise_scale: 0.005,
        }
    }
}

impl ToySimConfig {
    /// Sets the time step of the integrator.
    pub fn dt(mut self, v: f64) -> Self {
        self.dt = v;
        self
    }

    /// Sets the number of integration steps per control step.
    pub fn frame_skip(mut self, v: usize) -> Self {
        self.frame_skip = v;
        self
    }

    /// Sets the scale of the noise of the initial state.
    pub fn reset_noise_scale(mut self, v: f64) -> Self {
        self.reset_noise_scale = v;
        self
    }
}

/// Nominal body masses, floor friction and action dimension of a task.
fn layout(task: Task) -> (&'static [f64], f64, usize) {
    match task {
        Task::HalfCheetah => (&[0.0, 6.25, 1.54, 1.58, 1.07, 1.43, 1.18, 0.85], 0.4, 6),
        Task::Ant => (
            &[
                0.0, 0.33, 0.04, 0.06, 0.06, 0.04, 0.06, 0.06, 0.04, 0.06, 0.06, 0.04, 0.06, 0.06,
            ],
            1.0,
            8,
        ),
        Task::Hopper => (&[0.0, 3.53, 3.93, 2.71, 5.09], 1.0, 3),
        Task::HumanoidStandup => (
            &[
                0.0, 8.91, 2.26, 6.62, 4.75, 2.76, 1.77, 4.75, 2.76, 1.77, 1.66, 1.23, 1.66, 1.23,
            ],
            1.0,
            17,
        ),
        Task::InvertedPendulum => (&[0.0, 10.47, 5.02], 1.0, 1),
        Task::Walker2d => (&[0.0, 3.53, 3.93, 2.71, 2.94, 3.93, 2.71, 2.94], 0.9, 6),
    }
}

/// A chain of point masses standing in for the bodies of a task.
#[derive(Debug, Clone)]
pub struct ToySim {
    task: Task,
    config: ToySimConfig,
    model: PhysicsModel,
    pos: Vec<[f64; 3]>,
    vel: Vec<[f64; 3]>,
    action_dim: usize,
    rng: SmallRng,
}

impl ToySim {
    fn n_bodies(&self) -> usize {
        self.model.body_mass.len()
    }

    fn obs(&self) -> Vec<f32> {
        let root_x = self.pos[1][0];
        let pos = self
            .pos
            .iter()
            .skip(1)
            .flat_map(|p| [p[0] - root_x, p[1], p[2]]);
        let vel = self.vel.iter().skip(1).flat_map(|v| *v);
        pos.chain(vel).map(|x| x as f32).collect()
    }

    fn integrate(&mut self, action: &[f32]) {
        let n = self.n_bodies();
        let dt = self.config.dt;
        let mut force = vec![[0.0f64; 3]; n];

        for (i, f) in force.iter_mut().enumerate().skip(1) {
            f[2] -= self.model.body_mass[i] * GRAVITY;
            for (k, fk) in f.iter_mut().enumerate() {
                *fk += self.model.xfrc_applied[i][k];
            }
        }

        for (j, a) in action.iter().enumerate() {
            let i = 1 + j % (n - 1);
            force[i][0] += GEAR * a.clamp(-1.0, 1.0) as f64;
        }

        for i in 2..n {
            for k in 0..3 {
                let rest = if k == 0 { LINK } else { 0.0 };
                let f = STIFFNESS * (self.pos[i - 1][k] - self.pos[i][k] - rest)
                    + DAMPING * (self.vel[i - 1][k] - self.vel[i][k]);
                force[i][k] += f;
                force[i - 1][k] -= f;
            }
        }

        let floor = self.model.geom_friction[0][0];
        for i in 1..n {
            let m = self.model.body_mass[i];
            // the body leaves the floor when the net vertical force is upward
            let load = (-force[i][2]).max(0.0) / (m * GRAVITY);
            for k in 0..3 {
                self.vel[i][k] += force[i][k] / m * dt;
                self.pos[i][k] += self.vel[i][k] * dt;
            }
            if self.pos[i][2] <= 0.0 {
                self.pos[i][2] = 0.0;
                self.vel[i][2] = self.vel[i][2].max(0.0);
                let mu = floor * self.model.geom_friction[i][0];
                let decay = 1.0 / (1.0 + mu * FRICTION_RATE * load * dt);
                self.vel[i][0] *= decay;
                self.vel[i][1] *= decay;
            }
        }
    }
}

impl Simulator for ToySim {
    type Config = ToySimConfig;

    fn build(task: Task, config: &Self::Config, seed: i64) -> Result<Self> {
        let (masses, floor, action_dim) = layout(task);
        let n = masses.len();
        let mut geom_friction = vec![[1.0, 0.005, 0.0001]; n];
        geom_friction[0][0] = floor;

        let mut sim = Self {
            task,
            config: config.clone(),
            model: PhysicsModel {
                body_mass: masses.to_vec(),
                geom_friction,
                xfrc_applied: vec![[0.0; 6]; n],
            },
            pos: vec![[0.0; 3]; n],
            vel: vec![[0.0; 3]; n],
            action_dim,
            rng: SmallRng::seed_from_u64(seed as u64),
        };
        sim.reset(None)?;
        Ok(sim)
    }

    fn model(&self) -> &PhysicsModel {
        &self.model
    }

    fn model_mut(&mut self) -> &mut PhysicsModel {
        &mut self.model
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<Vec<f32>> {
        if let Some(seed) = seed {
            self.rng = SmallRng::seed_from_u64(seed);
        }
        let scale = self.config.reset_noise_scale;
        for i in 0..self.n_bodies() {
            let x = if i == 0 { 0.0 } else { -LINK * (i - 1) as f64 };
            self.pos[i] = [x, 0.0, 0.0];
            self.vel[i] = [0.0; 3];
            if i > 0 && scale > 0.0 {
                for k in 0..3 {
                    self.pos[i][k] += self.rng.gen_range(-scale..=scale);
                    self.vel[i][k] += self.rng.gen_range(-scale..=scale);
                }
            }
        }
        Ok(self.obs())
    }

    fn step(&mut self, action: &[f32]) -> Result<SimStep> {
        if action.len() != self.action_dim {
            return Err(RrlsError::DimensionMismatch {
                what: format!("action of {}", self.task),
                expected: self.action_dim,
                got: action.len(),
            }
            .into());
        }
        trace!("ToySim::step()");

        let x_before = self.pos[1][0];
        for _ in 0..self.config.frame_skip {
            self.integrate(action);
        }
        let elapsed = self.config.dt * self.config.frame_skip.max(1) as f64;
        let forward_velocity = ((self.pos[1][0] - x_before) / elapsed) as f32;
        let ctrl_cost = CTRL_COST_WEIGHT * action.iter().map(|a| a * a).sum::<f32>();

        let obs = self.obs();
        let diverged = !obs.iter().all(|x| x.is_finite() && x.abs() < 1e3);
        let (reward, is_terminated) = match self.task {
            Task::InvertedPendulum => {
                let tilt = self.pos[2][0] - self.pos[1][0] + LINK;
                (1.0, diverged || tilt.abs() > 0.2)
            }
            Task::HumanoidStandup => (self.pos[1][2] as f32 - ctrl_cost, diverged),
            _ => (forward_velocity - ctrl_cost, diverged),
        };

        Ok(SimStep {
            obs,
            reward,
            is_terminated,
        })
    }

    fn action_dim(&self) -> usize {
        self.action_dim
    }
}
