//! Modal machine states: working plane and path-following mode.

use gmcode_core::MachineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Working plane for arc moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plane {
    /// G17
    XY,
    /// G18
    ZX,
    /// G19
    YZ,
}

impl Plane {
    /// Plane-select G-code word
    pub fn code(&self) -> &'static str {
        match self {
            Self::XY => "G17",
            Self::ZX => "G18",
            Self::YZ => "G19",
        }
    }

    /// Canonical axis-pair name
    pub fn name(&self) -> &'static str {
        match self {
            Self::XY => "XY",
            Self::ZX => "ZX",
            Self::YZ => "YZ",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Plane {
    type Err = MachineError;

    /// Accepts either axis order or the G-code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "XY" | "YX" | "G17" => Ok(Self::XY),
            "ZX" | "XZ" | "G18" => Ok(Self::ZX),
            "YZ" | "ZY" | "G19" => Ok(Self::YZ),
            _ => Err(MachineError::InvalidPlane(s.to_string())),
        }
    }
}

/// Path-following (blending) mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PathMode {
    /// G61.1: stop exactly at every programmed point
    ExactStop,
    /// G61: follow the programmed path exactly, without full stops
    ExactPath,
    /// G64: blend consecutive moves
    Blend {
        /// Path tolerance `P`
        #[serde(default)]
        p: Option<f64>,
        /// Naive CAM tolerance `Q`, only emitted together with `P`
        #[serde(default)]
        q: Option<f64>,
    },
}

impl PathMode {
    /// Blend with both tolerances set.
    pub fn blend_within(p: f64, q: f64) -> Self {
        Self::Blend {
            p: Some(p),
            q: Some(q),
        }
    }

    /// Render the command, formatting numbers with `format`.
    pub(crate) fn command(&self, format: impl Fn(f64) -> String) -> String {
        match self {
            Self::ExactStop => "G61.1".to_string(),
            Self::ExactPath => "G61".to_string(),
            Self::Blend { p: None, .. } => "G64".to_string(),
            Self::Blend { p: Some(p), q: None } => format!("G64 P{}", format(*p)),
            Self::Blend {
                p: Some(p),
                q: Some(q),
            } => format!("G64 P{} Q{}", format(*p), format(*q)),
        }
    }
}

impl Default for PathMode {
    fn default() -> Self {
        Self::Blend { p: None, q: None }
    }
}
