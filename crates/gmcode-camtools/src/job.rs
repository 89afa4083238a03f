//! Job documents: a machine configuration plus an ordered list of
//! operations, stored as TOML or JSON.

use gmcode_core::{ConfigError, Result, Vector};
use gmcode_machine::{ArcMove, Machine, MachineConfig, PathMode, Target};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::{helical_entry, rect_in, spiral};

fn default_true() -> bool {
    true
}

/// A single step of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Comment {
        text: String,
    },
    Feedrate {
        value: f64,
    },
    /// `G0`
    Rapid(Target),
    /// `G1`
    Linear(Target),
    Arc(ArcMove),
    Toolchange {
        tool: u32,
    },
    /// Plane by name or code, e.g. `"XY"` or `"G18"`
    Plane {
        plane: String,
    },
    PathMode {
        mode: PathMode,
    },
    Dwell {
        seconds: f64,
    },
    Pause,
    Spiral {
        centre: Vector,
        radius_end: f64,
        depth_of_cut: f64,
        #[serde(default = "default_true")]
        clockwise: bool,
    },
    HelicalEntry {
        centre: Vector,
        final_height: f64,
        depth_of_cut: f64,
        #[serde(default = "default_true")]
        clockwise: bool,
    },
    RectIn {
        #[serde(default)]
        centre: Vector,
        width_of_cut: f64,
        #[serde(default = "default_true")]
        clockwise: bool,
    },
}

impl Operation {
    /// Operation name as written in job files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Comment { .. } => "comment",
            Self::Feedrate { .. } => "feedrate",
            Self::Rapid(_) => "rapid",
            Self::Linear(_) => "linear",
            Self::Arc(_) => "arc",
            Self::Toolchange { .. } => "toolchange",
            Self::Plane { .. } => "plane",
            Self::PathMode { .. } => "path_mode",
            Self::Dwell { .. } => "dwell",
            Self::Pause => "pause",
            Self::Spiral { .. } => "spiral",
            Self::HelicalEntry { .. } => "helical_entry",
            Self::RectIn { .. } => "rect_in",
        }
    }

    /// Apply this operation to `m`.
    pub fn apply<W: Write>(&self, m: &mut Machine<W>) -> Result<()> {
        match self {
            Self::Comment { text } => m.comment(text)?,
            Self::Feedrate { value } => m.feedrate(*value)?,
            Self::Rapid(target) => m.g0(*target)?,
            Self::Linear(target) => m.g1(*target)?,
            Self::Arc(arc) => m.arc(*arc)?,
            Self::Toolchange { tool } => m.toolchange(*tool)?,
            Self::Plane { plane } => m.plane(plane)?,
            Self::PathMode { mode } => m.path_mode(*mode)?,
            Self::Dwell { seconds } => m.dwell(*seconds)?,
            Self::Pause => m.pause()?,
            Self::Spiral {
                centre,
                radius_end,
                depth_of_cut,
                clockwise,
            } => spiral(m, *centre, *radius_end, *depth_of_cut, *clockwise)?,
            Self::HelicalEntry {
                centre,
                final_height,
                depth_of_cut,
                clockwise,
            } => helical_entry(m, *centre, *final_height, *depth_of_cut, *clockwise)?,
            Self::RectIn {
                centre,
                width_of_cut,
                clockwise,
            } => rect_in(m, *centre, *width_of_cut, *clockwise)?,
        }
        Ok(())
    }
}

/// A complete program description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub machine: MachineConfig,
    /// Load the configured initial tool in the preamble
    #[serde(default = "default_true")]
    pub toolchange: bool,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Job {
    /// Parse a TOML job document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let job: Self = toml::from_str(content).map_err(ConfigError::from)?;
        job.machine.validate()?;
        Ok(job)
    }

    /// Parse a JSON job document.
    pub fn from_json(content: &str) -> Result<Self> {
        let job: Self = serde_json::from_str(content).map_err(ConfigError::from)?;
        job.machine.validate()?;
        Ok(job)
    }

    /// Load a job from a `.toml` or `.json` file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }

    /// Write the whole program: preamble, every operation, postamble.
    pub fn run<W: Write>(&self, m: &mut Machine<W>) -> Result<()> {
        info!(operations = self.operations.len(), "Running job");
        m.standard_preamble(self.toolchange)?;
        for (index, operation) in self.operations.iter().enumerate() {
            debug!(index, op = operation.name(), "Applying operation");
            operation.apply(m)?;
        }
        m.standard_postamble()?;
        info!(lines = m.lines_written(), "Job complete");
        Ok(())
    }
}
