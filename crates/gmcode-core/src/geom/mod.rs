//! Geometric path model
//!
//! This module provides:
//! - [`Vector`], a 3D point/direction with tolerance-based equality
//! - [`Line`] and [`ArcXY`] path primitives with tangent, normal and offset queries
//! - [`Segment`], the closed set of primitives a machine can cut

pub mod path;
pub mod vector;

pub use path::{ArcXY, Endpoint, Line, Segment};
pub use vector::Vector;

/// Distance below which two points are considered coincident.
pub const TOLERANCE: f64 = 1e-6;
