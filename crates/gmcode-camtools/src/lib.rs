//! # gmcode CAM Tools
//!
//! Toolpath strategies that drive a [`gmcode_machine::Machine`], and the
//! job runner that turns a TOML or JSON document into a program.
//!
//! ## Strategies
//!
//! - **Spiral**: pocket clearing from the current radius in or out to a target radius
//! - **Helical Entry**: helical plunge to a target height
//! - **Rect In**: rectangular facing pattern working inwards from a corner
//!
//! Strategies only use public machine operations, so the usual diffing
//! applies to everything they write.

pub mod helical_entry;
pub mod job;
pub mod rect_in;
pub mod spiral;

pub use helical_entry::{helical_entry, helix_turns};
pub use job::{Job, Operation};
pub use rect_in::rect_in;
pub use spiral::{spiral, MAX_SPIRAL_STEPS};

use gmcode_core::ToolpathError;

/// Reject zero, negative or non-finite cut increments.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<(), ToolpathError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ToolpathError::InvalidParameter {
            name: name.to_string(),
            reason: format!("must be a positive number, got {}", value),
        })
    }
}
