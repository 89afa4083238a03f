//! Move targets with optional per-axis coordinates.

use gmcode_core::Vector;
use serde::{Deserialize, Serialize};

/// Target of a move where only some axes may be given
///
/// Each axis is an `Option`: `None` means "stay where the tool is" and
/// `Some(value)` means "go to value".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
}

impl Target {
    /// Create an empty target (all axes None)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x_only(x: f64) -> Self {
        Self {
            x: Some(x),
            ..Default::default()
        }
    }

    pub fn y_only(y: f64) -> Self {
        Self {
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn z_only(z: f64) -> Self {
        Self {
            z: Some(z),
            ..Default::default()
        }
    }

    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// Fill the missing axes from `current`.
    pub fn resolve(&self, current: Vector) -> Vector {
        Vector::new(
            self.x.unwrap_or(current.x),
            self.y.unwrap_or(current.y),
            self.z.unwrap_or(current.z),
        )
    }

    /// Check if no axis is set
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }
}

impl From<Vector> for Target {
    fn from(v: Vector) -> Self {
        Self::xyz(v.x, v.y, v.z)
    }
}

/// A circular (or helical) move around an absolute centre in the XY plane
///
/// The end point defaults to the current position, which makes
/// `ArcMove::around(i, j)` a full circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcMove {
    #[serde(default)]
    pub end: Target,
    /// Absolute X of the arc centre
    pub i: Option<f64>,
    /// Absolute Y of the arc centre
    pub j: Option<f64>,
    #[serde(default = "default_clockwise")]
    pub clockwise: bool,
    #[serde(default = "default_turns")]
    pub turns: u32,
}

fn default_clockwise() -> bool {
    true
}

fn default_turns() -> u32 {
    1
}

impl Default for ArcMove {
    fn default() -> Self {
        Self {
            end: Target::default(),
            i: None,
            j: None,
            clockwise: default_clockwise(),
            turns: default_turns(),
        }
    }
}

impl ArcMove {
    /// Clockwise single turn around (`i`, `j`) ending where it starts.
    pub fn around(i: f64, j: f64) -> Self {
        Self {
            i: Some(i),
            j: Some(j),
            ..Default::default()
        }
    }

    pub fn to(mut self, end: impl Into<Target>) -> Self {
        self.end = end.into();
        self
    }

    pub fn cw(mut self, clockwise: bool) -> Self {
        self.clockwise = clockwise;
        self
    }

    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = turns;
        self
    }
}
