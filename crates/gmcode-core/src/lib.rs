//! # gmcode Core
//!
//! Core types for gmcode: the geometric path model shared by the G-code
//! emitter and the toolpath strategies, and the error types used across
//! the workspace.

pub mod error;
pub mod geom;

pub use error::{ConfigError, Error, GeometryError, MachineError, Result, ToolpathError};
pub use geom::{ArcXY, Endpoint, Line, Segment, Vector, TOLERANCE};
