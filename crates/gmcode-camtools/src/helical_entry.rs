//! Helical plunge into the stock.

use gmcode_core::{Result, Vector};
use gmcode_machine::{ArcMove, Machine, Target};
use std::io::Write;
use tracing::{debug, warn};

use crate::require_positive;

/// Number of full turns needed to descend `height` without any turn
/// exceeding `depth_of_cut`. Always at least one.
pub fn helix_turns(height: f64, depth_of_cut: f64) -> u32 {
    let turns = (height.abs() / depth_of_cut).ceil();
    if turns >= 1.0 {
        turns as u32
    } else {
        1
    }
}

/// Descend (or climb) to `final_height` on a helix around `centre`.
///
/// Only the X and Y of `centre` are used. The tool finishes at the X and
/// Y it started from.
pub fn helical_entry<W: Write>(
    m: &mut Machine<W>,
    centre: Vector,
    final_height: f64,
    depth_of_cut: f64,
    clockwise: bool,
) -> Result<()> {
    require_positive("depth_of_cut", depth_of_cut)?;

    let height = m.position().z - final_height;
    if height.abs() <= m.accuracy() {
        warn!(final_height, "Helical entry without a height change");
    }
    let turns = helix_turns(height, depth_of_cut);
    debug!(turns, height, "Helical entry around ({}, {})", centre.x, centre.y);

    m.comment("helical entry start")?;
    m.arc(
        ArcMove::around(centre.x, centre.y)
            .to(Target::z_only(final_height))
            .cw(clockwise)
            .with_turns(turns),
    )?;
    Ok(())
}
