//! Bounds of the parameters of each task.
//!
//! Every task defines nested variants: the parameters of [`Dim::One`] are a subset of
//! those of [`Dim::Two`], which are a subset of those of [`Dim::Three`]. The
//! [`Dim::Rarl`] variant bounds the external forces applied to the bodies that
//! adversaries usually perturb in robust adversarial reinforcement learning.
use crate::Task;
use anyhow::Result;
use rrls_core::{error::RrlsError, ParamBounds};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Variant of the bounds of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dim {
    /// A single parameter.
    #[serde(rename = "1d")]
    One,
    /// Two parameters.
    #[serde(rename = "2d")]
    Two,
    /// Three parameters.
    #[serde(rename = "3d")]
    Three,
    /// External forces.
    #[serde(rename = "rarl")]
    Rarl,
}

impl Dim {
    /// Every variant.
    pub const ALL: [Dim; 4] = [Dim::One, Dim::Two, Dim::Three, Dim::Rarl];

    /// Name of the variant used in environment ids.
    pub fn name(&self) -> &'static str {
        match self {
            Self::One => "1d",
            Self::Two => "2d",
            Self::Three => "3d",
            Self::Rarl => "rarl",
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dim {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Dim::ALL
            .iter()
            .find(|d| d.name() == s)
            .copied()
            .ok_or_else(|| RrlsError::UnknownEnvId(s.to_string()).into())
    }
}

type Table = &'static [(&'static str, f64, f64)];

fn table(task: Task, dim: Dim) -> Option<Table> {
    use Dim::*;
    use Task::*;

    let t: Table = match (task, dim) {
        (HalfCheetah, One) => &[("worldfriction", 0.1, 3.0)],
        (HalfCheetah, Two) => &[("worldfriction", 0.1, 4.0), ("torsomass", 0.1, 7.0)],
        (HalfCheetah, Three) => &[
            ("worldfriction", 0.1, 4.0),
            ("torsomass", 0.1, 7.0),
            ("backthighmass", 0.1, 3.0),
        ],
        (HalfCheetah, Rarl) => &[
            ("torsoforce_x", -5.0, 5.0),
            ("torsoforce_z", -5.0, 5.0),
            ("backfootforce_x", -5.0, 5.0),
            ("backfootforce_z", -5.0, 5.0),
            ("forwardfootforce_x", -5.0, 5.0),
            ("forwardfootforce_z", -5.0, 5.0),
        ],

        (Ant, One) => &[("torsomass", 0.1, 3.0)],
        (Ant, Two) => &[("torsomass", 0.1, 3.0), ("frontleftlegmass", 0.01, 3.0)],
        (Ant, Three) => &[
            ("torsomass", 0.1, 3.0),
            ("frontleftlegmass", 0.01, 3.0),
            ("frontrightlegmass", 0.01, 3.0),
        ],
        (Ant, Rarl) => &[
            ("torsoforce_x", -3.0, 3.0),
            ("torsoforce_y", -3.0, 3.0),
            ("torsoforce_z", -3.0, 3.0),
        ],

        (Hopper, One) => &[("worldfriction", 0.1, 3.0)],
        (Hopper, Two) => &[("worldfriction", 0.1, 3.0), ("torsomass", 0.1, 3.0)],
        (Hopper, Three) => &[
            ("worldfriction", 0.1, 3.0),
            ("torsomass", 0.1, 3.0),
            ("thighmass", 0.1, 4.0),
        ],
        (Hopper, Rarl) => &[("footforce_x", -3.0, 3.0), ("footforce_z", -3.0, 3.0)],

        (HumanoidStandup, One) => &[("torsomass", 0.1, 16.0)],
        (HumanoidStandup, Two) => &[("torsomass", 0.1, 16.0), ("rightfootmass", 0.1, 8.0)],
        (HumanoidStandup, Three) => &[
            ("torsomass", 0.1, 16.0),
            ("leftthighmass", 0.1, 5.0),
            ("rightfootmass", 0.1, 8.0),
        ],
        (HumanoidStandup, Rarl) => &[
            ("torsoforce_x", -5.0, 5.0),
            ("torsoforce_y", -5.0, 5.0),
            ("torsoforce_z", -5.0, 5.0),
        ],

        (InvertedPendulum, One) => &[("polemass", 1.0, 31.0)],
        (InvertedPendulum, Two) => &[("polemass", 1.0, 31.0), ("cartmass", 1.0, 11.0)],
        (InvertedPendulum, Three) => return None,
        (InvertedPendulum, Rarl) => &[("poleforce_x", -3.0, 3.0), ("poleforce_y", -3.0, 3.0)],

        (Walker2d, One) => &[("worldfriction", 0.1, 4.0)],
        (Walker2d, Two) => &[("worldfriction", 0.1, 4.0), ("torsomass", 0.1, 5.0)],
        (Walker2d, Three) => &[
            ("worldfriction", 0.1, 4.0),
            ("torsomass", 0.1, 5.0),
            ("thighmass", 0.1, 6.0),
        ],
        (Walker2d, Rarl) => &[
            ("footforce_x", -5.0, 5.0),
            ("footforce_z", -5.0, 5.0),
            ("leftfootforce_x", -5.0, 5.0),
            ("leftfootforce_z", -5.0, 5.0),
        ],
    };
    Some(t)
}

/// Returns the bounds of `task` for the variant `dim`.
///
/// Returns [`RrlsError::UnsupportedDim`] if the task does not define the variant,
/// e.g., three-dimensional bounds for the inverted pendulum.
pub fn params_bound(task: Task, dim: Dim) -> Result<ParamBounds> {
    table(task, dim)
        .map(ParamBounds::from_slice)
        .ok_or_else(|| {
            RrlsError::UnsupportedDim {
                task: task.to_string(),
                dim: dim.to_string(),
            }
            .into()
        })
}

/// Variants defined for `task`.
pub fn dims(task: Task) -> impl Iterator<Item = Dim> {
    Dim::ALL
        .into_iter()
        .filter(move |dim| table(task, *dim).is_some())
}
