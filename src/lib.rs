//! # gmcode
//!
//! Write G-code by driving a model of the machine. Every operation updates
//! the model and writes only the words the controller does not already
//! know, so programs stay short and readable.
//!
//! ## Architecture
//!
//! 1. **gmcode-core** - Vectors, path segments, error types
//! 2. **gmcode-machine** - The stateful emitter and its configuration
//! 3. **gmcode-camtools** - Spiral, helical entry and facing strategies, job files
//! 4. **gmcode** - Command line job runner

pub use gmcode_camtools::{helical_entry, helix_turns, rect_in, spiral, Job, Operation};
pub use gmcode_core::{
    ArcXY, ConfigError, Endpoint, Error, GeometryError, Line, MachineError, Result, Segment,
    ToolpathError, Vector, TOLERANCE,
};
pub use gmcode_machine::{ArcMove, Machine, MachineConfig, PathMode, Plane, Target};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Honours `RUST_LOG` (default `info`) and writes to stderr, leaving
/// stdout free for G-code.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
