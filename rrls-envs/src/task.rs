//! Locomotion tasks and the physical quantity behind each of their parameters.
use anyhow::Result;
use rrls_core::error::RrlsError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Component of a force applied to a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal, along the direction of locomotion.
    X,
    /// Horizontal, lateral.
    Y,
    /// Vertical.
    Z,
}

impl Axis {
    /// Column of the axis in a row of applied forces.
    pub fn column(&self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Geometries whose sliding friction a parameter overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geoms {
    /// Every geometry of the model.
    All,
    /// A single geometry, typically the floor.
    Index(usize),
}

/// Where the value of a parameter goes in the simulator model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Mass of a body.
    BodyMass(usize),
    /// Sliding friction of geometries.
    GeomFriction(Geoms),
    /// External force applied to a body.
    BodyForce {
        /// Index of the body.
        body: usize,
        /// Component of the force.
        axis: Axis,
    },
}

/// A named parameter and its target.
pub type ParamTarget = (&'static str, Target);

use Axis::{X, Y, Z};
use Target::{BodyForce, BodyMass, GeomFriction};

const HALF_CHEETAH: &[ParamTarget] = &[
    ("worldfriction", GeomFriction(Geoms::All)),
    ("torsomass", BodyMass(1)),
    ("backthighmass", BodyMass(2)),
    ("backshinmass", BodyMass(3)),
    ("backfootmass", BodyMass(4)),
    ("forwardthighmass", BodyMass(5)),
    ("forwardshinmass", BodyMass(6)),
    ("forwardfootmass", BodyMass(7)),
    ("torsoforce_x", BodyForce { body: 1, axis: X }),
    ("torsoforce_z", BodyForce { body: 1, axis: Z }),
    ("backfootforce_x", BodyForce { body: 4, axis: X }),
    ("backfootforce_z", BodyForce { body: 4, axis: Z }),
    ("forwardfootforce_x", BodyForce { body: 7, axis: X }),
    ("forwardfootforce_z", BodyForce { body: 7, axis: Z }),
];

const ANT: &[ParamTarget] = &[
    ("torsomass", BodyMass(1)),
    ("frontleftlegmass", BodyMass(2)),
    ("frontleftlegauxmass", BodyMass(3)),
    ("frontleftleganklemass", BodyMass(4)),
    ("frontrightlegmass", BodyMass(5)),
    ("frontrightlegauxmass", BodyMass(6)),
    ("frontrightleganklemass", BodyMass(7)),
    ("backleftlegmass", BodyMass(8)),
    ("backleftlegauxmass", BodyMass(9)),
    ("backleftleganklemass", BodyMass(10)),
    ("backrightlegmass", BodyMass(11)),
    ("backrightlegauxmass", BodyMass(12)),
    ("backrightleganklemass", BodyMass(13)),
    ("torsoforce_x", BodyForce { body: 1, axis: X }),
    ("torsoforce_y", BodyForce { body: 1, axis: Y }),
    ("torsoforce_z", BodyForce { body: 1, axis: Z }),
];

const HOPPER: &[ParamTarget] = &[
    ("worldfriction", GeomFriction(Geoms::Index(0))),
    ("torsomass", BodyMass(1)),
    ("thighmass", BodyMass(2)),
    ("legmass", BodyMass(3)),
    ("footmass", BodyMass(4)),
    ("footforce_x", BodyForce { body: 4, axis: X }),
    ("footforce_z", BodyForce { body: 4, axis: Z }),
];

const HUMANOID_STANDUP: &[ParamTarget] = &[
    ("torsomass", BodyMass(1)),
    ("lwaistmass", BodyMass(2)),
    ("pelvismass", BodyMass(3)),
    ("rightthighmass", BodyMass(4)),
    ("rightshinmass", BodyMass(5)),
    ("rightfootmass", BodyMass(6)),
    ("leftthighmass", BodyMass(7)),
    ("leftshinmass", BodyMass(8)),
    ("leftfootmass", BodyMass(9)),
    ("rightupperarmmass", BodyMass(10)),
    ("rightlowerarmmass", BodyMass(11)),
    ("leftupperarmmass", BodyMass(12)),
    ("leftlowerarmmass", BodyMass(13)),
    ("torsoforce_x", BodyForce { body: 1, axis: X }),
    ("torsoforce_y", BodyForce { body: 1, axis: Y }),
    ("torsoforce_z", BodyForce { body: 1, axis: Z }),
];

const INVERTED_PENDULUM: &[ParamTarget] = &[
    ("polemass", BodyMass(2)),
    ("cartmass", BodyMass(1)),
    ("poleforce_x", BodyForce { body: 2, axis: X }),
    ("poleforce_y", BodyForce { body: 2, axis: Y }),
];

const WALKER: &[ParamTarget] = &[
    ("worldfriction", GeomFriction(Geoms::Index(0))),
    ("torsomass", BodyMass(1)),
    ("thighmass", BodyMass(2)),
    ("legmass", BodyMass(3)),
    ("footmass", BodyMass(4)),
    ("leftthighmass", BodyMass(5)),
    ("leftlegmass", BodyMass(6)),
    ("leftfootmass", BodyMass(7)),
    ("footforce_x", BodyForce { body: 4, axis: X }),
    ("footforce_z", BodyForce { body: 4, axis: Z }),
    ("leftfootforce_x", BodyForce { body: 7, axis: X }),
    ("leftfootforce_z", BodyForce { body: 7, axis: Z }),
];

/// Locomotion tasks of the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    /// Planar cheetah running forward.
    HalfCheetah,
    /// Four-legged ant walking forward.
    Ant,
    /// One-legged hopper.
    Hopper,
    /// Humanoid standing up from the ground.
    HumanoidStandup,
    /// Pole balanced on a cart.
    InvertedPendulum,
    /// Planar biped walking forward.
    Walker2d,
}

impl Task {
    /// Every task, in registration order.
    pub const ALL: [Task; 6] = [
        Task::HalfCheetah,
        Task::Ant,
        Task::Hopper,
        Task::HumanoidStandup,
        Task::InvertedPendulum,
        Task::Walker2d,
    ];

    /// Name of the task used in environment ids.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HalfCheetah => "halfcheetah",
            Self::Ant => "ant",
            Self::Hopper => "hopper",
            Self::HumanoidStandup => "humanoidstandup",
            Self::InvertedPendulum => "invertedpendulum",
            Self::Walker2d => "walker",
        }
    }

    /// Parameters of the task and where they go in the simulator model.
    ///
    /// The order of this table is the order of [`rrls_core::ParamSet`]s of the task.
    pub fn targets(&self) -> &'static [ParamTarget] {
        match self {
            Self::HalfCheetah => HALF_CHEETAH,
            Self::Ant => ANT,
            Self::Hopper => HOPPER,
            Self::HumanoidStandup => HUMANOID_STANDUP,
            Self::InvertedPendulum => INVERTED_PENDULUM,
            Self::Walker2d => WALKER,
        }
    }

    /// Names of the parameters of the task.
    pub fn param_names(&self) -> impl Iterator<Item = &'static str> {
        self.targets().iter().map(|(name, _)| *name)
    }

    /// Target of a parameter.
    pub fn target(&self, name: &str) -> Option<Target> {
        self.targets()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, t)| *t)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Task::ALL
            .iter()
            .find(|t| t.name() == s)
            .copied()
            .ok_or_else(|| RrlsError::UnknownEnvId(s.to_string()).into())
    }
}
