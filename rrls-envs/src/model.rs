//! Mutable physical state of a simulator.
use crate::task::{Geoms, Target};
use anyhow::Result;
use rrls_core::error::RrlsError;
use serde::{Deserialize, Serialize};

/// Arrays of a simulator model that parameters write to.
///
/// Rows are indexed by body or geometry id, following the usual layout of
/// articulated-body simulators where body `0` is the world.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicsModel {
    /// Mass of each body.
    pub body_mass: Vec<f64>,

    /// Sliding, torsional and rolling friction of each geometry.
    pub geom_friction: Vec<[f64; 3]>,

    /// External force and torque applied to each body.
    pub xfrc_applied: Vec<[f64; 6]>,
}

impl PhysicsModel {
    /// Checks that `target` refers to an existing row.
    pub fn check(&self, name: &str, target: &Target) -> Result<()> {
        let (what, ix, len) = match target {
            Target::BodyMass(ix) => ("body_mass", *ix, self.body_mass.len()),
            Target::GeomFriction(Geoms::All) => ("geom_friction", 0, self.geom_friction.len()),
            Target::GeomFriction(Geoms::Index(ix)) => {
                ("geom_friction", *ix, self.geom_friction.len())
            }
            Target::BodyForce { body, .. } => ("xfrc_applied", *body, self.xfrc_applied.len()),
        };
        if ix >= len {
            return Err(RrlsError::IncompatibleModel {
                param: name.to_string(),
                reason: format!("{} has {} rows, index {} required", what, len, ix),
            }
            .into());
        }
        Ok(())
    }

    /// Reads the value at `target`.
    ///
    /// For [`Geoms::All`], the sliding friction of the first geometry is returned.
    pub fn get(&self, target: &Target) -> Option<f64> {
        match target {
            Target::BodyMass(ix) => self.body_mass.get(*ix).copied(),
            Target::GeomFriction(Geoms::All) => self.geom_friction.first().map(|f| f[0]),
            Target::GeomFriction(Geoms::Index(ix)) => self.geom_friction.get(*ix).map(|f| f[0]),
            Target::BodyForce { body, axis } => {
                self.xfrc_applied.get(*body).map(|f| f[axis.column()])
            }
        }
    }

    /// Writes `value` at `target`.
    ///
    /// Rows out of range are ignored; [`PhysicsModel::check`] is expected to have
    /// been called on every target beforehand.
    pub fn set(&mut self, target: &Target, value: f64) {
        match target {
            Target::BodyMass(ix) => {
                if let Some(m) = self.body_mass.get_mut(*ix) {
                    *m = value;
                }
            }
            Target::GeomFriction(Geoms::All) => {
                for f in self.geom_friction.iter_mut() {
                    f[0] = value;
                }
            }
            Target::GeomFriction(Geoms::Index(ix)) => {
                if let Some(f) = self.geom_friction.get_mut(*ix) {
                    f[0] = value;
                }
            }
            Target::BodyForce { body, axis } => {
                if let Some(f) = self.xfrc_applied.get_mut(*body) {
                    f[axis.column()] = value;
                }
            }
        }
    }

    /// Copies the value at `target` from `other`.
    ///
    /// It is used to bring a quantity back to its nominal value.
    pub fn copy_from(&mut self, other: &PhysicsModel, target: &Target) {
        match target {
            Target::GeomFriction(Geoms::All) => {
                for (f, g) in self.geom_friction.iter_mut().zip(other.geom_friction.iter()) {
                    f[0] = g[0];
                }
            }
            _ => {
                if let Some(v) = other.get(target) {
                    self.set(target, v);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::task::Axis;

    fn model() -> PhysicsModel {
        PhysicsModel {
            body_mass: vec![0.0, 1.0, 2.0],
            geom_friction: vec![[0.4, 0.1, 0.1], [0.9, 0.1, 0.1]],
            xfrc_applied: vec![[0.0; 6]; 3],
        }
    }

    #[test]
    fn test_set_and_copy_from() {
        let nominal = model();
        let mut m = model();
        m.set(&Target::GeomFriction(Geoms::All), 2.5);
        assert_eq!(m.geom_friction[0][0], 2.5);
        assert_eq!(m.geom_friction[1][0], 2.5);
        assert_eq!(m.geom_friction[1][1], 0.1);

        m.copy_from(&nominal, &Target::GeomFriction(Geoms::All));
        assert_eq!(m, nominal);

        let force = Target::BodyForce {
            body: 2,
            axis: Axis::Z,
        };
        m.set(&force, -1.5);
        assert_eq!(m.xfrc_applied[2], [0.0, 0.0, -1.5, 0.0, 0.0, 0.0]);
        assert_eq!(m.get(&force), Some(-1.5));
    }

    #[test]
    fn test_check() {
        let m = model();
        assert!(m.check("torsomass", &Target::BodyMass(2)).is_ok());
        let err = m.check("footmass", &Target::BodyMass(4)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RrlsError>(),
            Some(RrlsError::IncompatibleModel { .. })
        ));
    }
}
