//! Spiral pocketing from the current radius to a target radius.

use gmcode_core::{ArcXY, MachineError, Result, Segment, ToolpathError, Vector};
use gmcode_machine::{ArcMove, Machine, Plane, Target};
use std::io::Write;
use tracing::debug;

use crate::require_positive;

/// Half-arcs cut before the spiral is considered runaway.
pub const MAX_SPIRAL_STEPS: usize = 10_000;

/// Spiral around `centre` from the current position until the tool runs
/// at `radius_end`.
///
/// The spiral is built from 180 degree arcs around two centres offset by
/// a quarter of the depth of cut on either side of `centre`, so each full
/// turn moves the radius by `depth_of_cut`. It cuts outwards when
/// `radius_end` is larger than the starting radius and inwards otherwise.
/// Needs a feedrate for the final radial move.
pub fn spiral<W: Write>(
    m: &mut Machine<W>,
    centre: Vector,
    radius_end: f64,
    depth_of_cut: f64,
    clockwise: bool,
) -> Result<()> {
    require_positive("depth_of_cut", depth_of_cut)?;
    if !(radius_end > 0.0 && radius_end.is_finite()) {
        return Err(ToolpathError::InvalidParameter {
            name: "radius_end".to_string(),
            reason: format!("must be positive, got {}", radius_end),
        }
        .into());
    }

    let position = m.position();
    if (centre.z - position.z).abs() > m.accuracy() {
        return Err(ToolpathError::Coplanarity {
            centre_z: centre.z,
            tool_z: position.z,
        }
        .into());
    }
    if m.current_feedrate().is_none() {
        return Err(MachineError::FeedrateUndefined.into());
    }
    if let Some(plane) = m.current_plane().filter(|&p| p != Plane::XY) {
        return Err(MachineError::UnsupportedSegment {
            reason: format!("spiral arcs while the {} plane is active", plane),
        }
        .into());
    }

    let centre = Vector::new(centre.x, centre.y, position.z);
    let radial = position - centre;
    let radius_start = radial.magnitude();
    let doc = depth_of_cut.copysign(radius_end - radius_start);
    let wobble = radial.unit_vector()? * (doc / 4.0);
    let centres = [centre - wobble, centre + wobble];
    debug!(
        radius_start,
        radius_end, doc, "Spiral from {} around {}", position, centre
    );

    let full_circle = ArcMove::around(centre.x, centre.y).cw(clockwise);
    m.arc(full_circle)?;

    let mut step = 0;
    loop {
        let c = centres[step % 2];
        let start = m.position();
        let end = c * 2.0 - start;
        let arc = ArcXY::new(start, end, c, clockwise)?;
        m.cut(&[Segment::from(arc)])?;

        let distance_to_go = doc.signum() * ((radius_end - doc) - arc.radius());
        debug!(step, radius = arc.radius(), distance_to_go, "Spiral half-arc");
        if distance_to_go <= m.accuracy() {
            break;
        }

        step += 1;
        if step > MAX_SPIRAL_STEPS {
            return Err(ToolpathError::SpiralDivergence { iterations: step }.into());
        }
    }

    m.arc(full_circle)?;
    let end = centre + (m.position() - centre).unit_vector()? * radius_end;
    m.g1(Target::xy(end.x, end.y))?;
    m.arc(full_circle)?;
    Ok(())
}
