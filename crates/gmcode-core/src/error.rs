//! Error handling for gmcode
//!
//! Provides error types for every layer of the G-code generator:
//! - Geometry errors (vector normalisation, arc construction)
//! - Machine errors (emitter preconditions and output failures)
//! - Toolpath errors (strategy preconditions and convergence)
//! - Config errors (machine configuration files)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised while building or querying vectors and path segments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A near-zero vector was normalised
    #[error("Cannot take the unit vector of a degenerate vector (magnitude {magnitude:e})")]
    DegenerateVector {
        /// Magnitude of the offending vector.
        magnitude: f64,
    },

    /// Arc endpoints are not equidistant from the centre
    #[error("Invalid arc: start radius {start_radius} and end radius {end_radius} differ")]
    InvalidArc {
        /// Distance from the start point to the centre.
        start_radius: f64,
        /// Distance from the end point to the centre.
        end_radius: f64,
    },
}

/// Machine error type
///
/// Represents precondition violations of the G-code emitter and failures
/// of its output sink. A failing operation never writes a partial line.
#[derive(Error, Debug)]
pub enum MachineError {
    /// A feed move was requested before any feedrate was programmed
    #[error("Feedrate must be set before a G1 move")]
    FeedrateUndefined,

    /// An arc was requested without its centre
    #[error("Arc centre is missing the {axis} coordinate")]
    MissingArcCentre {
        /// Axis word that was not supplied (`I` or `J`).
        axis: char,
    },

    /// An arc was requested with zero turns
    #[error("Arc turn count must be at least 1, got {turns}")]
    InvalidTurns {
        /// The requested turn count.
        turns: u32,
    },

    /// A segment does not start where the tool currently is
    #[error("Path discontinuity: segment starts at {expected}, tool is at {actual}")]
    PathDiscontinuity {
        /// Declared start of the segment.
        expected: String,
        /// Tracked machine position.
        actual: String,
    },

    /// A segment cannot be expressed in the current machine state
    #[error("Unsupported segment: {reason}")]
    UnsupportedSegment {
        /// Why the segment cannot be emitted.
        reason: String,
    },

    /// Unknown plane name or code
    #[error("Invalid plane: {0:?}")]
    InvalidPlane(String),

    /// Comment text that would break the output line
    #[error("Invalid comment {text:?}: {reason}")]
    InvalidComment {
        /// The rejected comment text.
        text: String,
        /// The reason the comment was rejected.
        reason: String,
    },

    /// Accuracy must be a positive finite distance
    #[error("Invalid accuracy {0}: must be positive and finite")]
    InvalidAccuracy(f64),

    /// Writing to the output sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Toolpath error type
///
/// Represents precondition violations of the toolpath strategies.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolpathError {
    /// Spiral centre is not at the tool's Z height
    #[error("Spiral centre Z {centre_z} is not in the XY plane of the tool (Z {tool_z})")]
    Coplanarity {
        /// Z coordinate of the requested centre.
        centre_z: f64,
        /// Tracked Z coordinate of the tool.
        tool_z: f64,
    },

    /// Spiral stepping did not reach the target radius
    #[error("Spiral did not converge after {iterations} steps")]
    SpiralDivergence {
        /// Number of half-arcs cut before giving up.
        iterations: usize,
    },

    /// The tool is not on any corner of the facing rectangle
    #[error("Tool position {position} is not a corner of the rectangle around {centre}")]
    CornerNotFound {
        /// Tracked machine position.
        position: String,
        /// Rectangle centre.
        centre: String,
    },

    /// A strategy parameter is out of range
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file extension is not recognised
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is out of range
    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange {
        /// Offending key.
        key: String,
        /// Offending value, rendered.
        value: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error while reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main error type for gmcode
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Machine error
    #[error(transparent)]
    Machine(#[from] MachineError),

    /// Toolpath error
    #[error(transparent)]
    Toolpath(#[from] ToolpathError),

    /// Config error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a machine error
    pub fn is_machine_error(&self) -> bool {
        matches!(self, Error::Machine(_))
    }

    /// Check if this is a toolpath error
    pub fn is_toolpath_error(&self) -> bool {
        matches!(self, Error::Toolpath(_))
    }

    /// Check if the output sink failed
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            Error::Machine(MachineError::Io(_)) | Error::Config(ConfigError::Io(_))
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
