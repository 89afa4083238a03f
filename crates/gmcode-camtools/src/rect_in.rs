//! Rectangular facing pattern working inwards from a corner.

use gmcode_core::{MachineError, Result, ToolpathError, Vector};
use gmcode_machine::{Machine, Target};
use std::io::Write;
use tracing::debug;

use crate::require_positive;

/// Corner directions from the centre, counter-clockwise from the
/// lower-left quadrant.
const QUADRANTS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

#[derive(Debug, Clone, Copy)]
struct Corner {
    point: Vector,
    /// 45 degree outward direction, stepped against to move inwards
    direction: Vector,
}

fn corners(centre: Vector, half_width: f64, half_height: f64, clockwise: bool) -> Vec<Corner> {
    let mut corners: Vec<Corner> = QUADRANTS
        .iter()
        .map(|&(sx, sy)| Corner {
            point: Vector::xy(centre.x + sx * half_width, centre.y + sy * half_height),
            direction: Vector::xy(sx, sy),
        })
        .collect();
    if clockwise {
        corners.reverse();
    }
    corners
}

/// Face an axis-aligned rectangle centred on `centre` whose corner is the
/// current tool position.
///
/// Each move travels to the next corner, stepping a quarter of
/// `width_of_cut` further in along the corner diagonal, until the
/// accumulated step passes the smaller half-size of the rectangle. Only
/// the X and Y of `centre` are used; Z never changes.
///
/// The half sizes are taken from the tool's distance to `centre`, so the
/// tool always sits on a corner. `CornerNotFound` is only returned when
/// the coordinates are so large that the rebuilt corner rounds away from
/// the tool position.
pub fn rect_in<W: Write>(
    m: &mut Machine<W>,
    centre: Vector,
    width_of_cut: f64,
    clockwise: bool,
) -> Result<()> {
    require_positive("width_of_cut", width_of_cut)?;
    if m.current_feedrate().is_none() {
        return Err(MachineError::FeedrateUndefined.into());
    }

    let position = m.position();
    let offset = position - centre;
    let (half_width, half_height) = (offset.x.abs(), offset.y.abs());
    let corners = corners(centre, half_width, half_height, clockwise);

    let here = Vector::xy(position.x, position.y);
    let start = corners
        .iter()
        .position(|corner| corner.point == here)
        .ok_or_else(|| ToolpathError::CornerNotFound {
            position: position.to_string(),
            centre: centre.to_string(),
        })?;
    debug!(start, half_width, half_height, "Facing rectangle around {}", centre);

    m.comment("rect_in start")?;
    let end_woc = half_width.min(half_height);
    let mut total_woc = 0.0;
    for corner in corners.iter().cycle().skip(start + 1) {
        total_woc += width_of_cut / 4.0;
        let end = corner.point - corner.direction * total_woc;
        m.g1(Target::xy(end.x, end.y))?;
        if total_woc > end_woc {
            break;
        }
    }
    m.comment("rect_in end")?;
    Ok(())
}
