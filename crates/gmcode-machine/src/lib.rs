//! # gmcode Machine
//!
//! Stateful G-code emitter. A [`Machine`] tracks what the controller
//! already knows and writes the minimum words to reach each new state.
//!
//! ```no_run
//! use gmcode_machine::{Machine, Target};
//!
//! # fn main() -> Result<(), gmcode_core::MachineError> {
//! let mut m = Machine::create("part.ngc")?;
//! m.standard_preamble(true)?;
//! m.feedrate(400.0)?;
//! m.g0(Target::xyz(0.0, 0.0, 5.0))?;
//! m.g1(Target::z_only(-1.0))?;
//! m.standard_postamble()?;
//! m.close()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod format;
pub mod machine;
pub mod modes;
pub mod target;

pub use config::MachineConfig;
pub use format::{format_number, places_for};
pub use machine::{Machine, MachineResult};
pub use modes::{PathMode, Plane};
pub use target::{ArcMove, Target};
