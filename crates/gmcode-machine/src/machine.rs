//! Stateful G-code emitter.
//!
//! [`Machine`] tracks what an ideal controller would know after executing
//! everything written so far (position, feedrate, plane, tool, path mode)
//! and writes only the words needed to move it to a newly requested state.

use gmcode_core::{MachineError, Segment, Vector};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, trace};

use crate::config::MachineConfig;
use crate::format::{format_number, places_for};
use crate::modes::{PathMode, Plane};
use crate::target::{ArcMove, Target};

/// Result type alias for machine operations.
pub type MachineResult<T> = Result<T, MachineError>;

const AXES: [char; 3] = ['X', 'Y', 'Z'];

/// G-code program writer bound to an output sink
///
/// Every operation either writes one complete line and updates the tracked
/// state, or fails and leaves both untouched.
#[derive(Debug)]
pub struct Machine<W: Write> {
    out: W,
    position: Vector,
    accuracy: f64,
    places: usize,
    feedrate: Option<f64>,
    plane: Option<Plane>,
    tool_number: Option<u32>,
    path_mode: Option<PathMode>,
    initialised: [bool; 3],
    preamble_path_mode: PathMode,
    initial_tool: u32,
    preamble_comments: bool,
    lines_written: usize,
}

impl Machine<BufWriter<File>> {
    /// Create (or truncate) a program file with the default configuration.
    pub fn create(path: impl AsRef<Path>) -> MachineResult<Self> {
        Self::create_with_config(path, &MachineConfig::default())
    }

    /// Create (or truncate) a program file.
    pub fn create_with_config(
        path: impl AsRef<Path>,
        config: &MachineConfig,
    ) -> MachineResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Creating G-code output file");
        let file = File::create(path)?;
        Self::with_config(BufWriter::new(file), config)
    }
}

impl<W: Write> Machine<W> {
    /// Bind a machine with the default configuration to `out`.
    pub fn new(out: W) -> Self {
        let config = MachineConfig::default();
        Self::from_parts(out, &config, config.accuracy)
    }

    /// Bind a configured machine to `out`.
    pub fn with_config(out: W, config: &MachineConfig) -> MachineResult<Self> {
        check_accuracy(config.accuracy)?;
        Ok(Self::from_parts(out, config, config.accuracy))
    }

    fn from_parts(out: W, config: &MachineConfig, accuracy: f64) -> Self {
        Self {
            out,
            position: Vector::ZERO,
            accuracy,
            places: places_for(accuracy),
            feedrate: None,
            plane: None,
            tool_number: None,
            path_mode: None,
            initialised: [false; 3],
            preamble_path_mode: config.preamble_path_mode(),
            initial_tool: config.initial_tool,
            preamble_comments: config.preamble_comments,
            lines_written: 0,
        }
    }

    /// Tracked absolute tool position.
    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Decimal places used for every emitted number.
    pub fn places(&self) -> usize {
        self.places
    }

    /// Change the resolution; only affects lines written afterwards.
    pub fn set_accuracy(&mut self, accuracy: f64) -> MachineResult<()> {
        check_accuracy(accuracy)?;
        self.accuracy = accuracy;
        self.places = places_for(accuracy);
        Ok(())
    }

    /// Last programmed feedrate.
    pub fn current_feedrate(&self) -> Option<f64> {
        self.feedrate
    }

    pub fn current_plane(&self) -> Option<Plane> {
        self.plane
    }

    pub fn current_tool(&self) -> Option<u32> {
        self.tool_number
    }

    pub fn current_path_mode(&self) -> Option<PathMode> {
        self.path_mode
    }

    /// Number of lines written so far.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Format a number with the current number of decimal places.
    pub fn format(&self, value: f64) -> String {
        format_number(value, self.places)
    }

    fn emit(&mut self, line: &str) -> MachineResult<()> {
        trace!(line, "emit");
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Write a line verbatim. The tracked state is not updated.
    pub fn write_raw(&mut self, text: &str) -> MachineResult<()> {
        self.emit(text.trim_end_matches('\n'))
    }

    fn axis_needs_word(&self, axis: usize, value: f64) -> bool {
        let current = [self.position.x, self.position.y, self.position.z][axis];
        !self.initialised[axis] || (value - current).abs() > self.accuracy
    }

    fn linear(&mut self, code: &str, target: Target) -> MachineResult<()> {
        let end = target.resolve(self.position);
        let values = [end.x, end.y, end.z];

        let mut words = vec![code.to_string()];
        let mut touched = [false; 3];
        for (axis, &value) in values.iter().enumerate() {
            if self.axis_needs_word(axis, value) {
                words.push(format!("{}{}", AXES[axis], self.format(value)));
                touched[axis] = true;
            }
        }

        if words.len() > 1 {
            self.emit(&words.join(" "))?;
            for (flag, hit) in self.initialised.iter_mut().zip(touched) {
                *flag |= hit;
            }
        }
        self.position = end;
        Ok(())
    }

    /// Rapid move (`G0`) to `target`.
    pub fn g0(&mut self, target: impl Into<Target>) -> MachineResult<()> {
        self.linear("G0", target.into())
    }

    /// Linear feed move (`G1`) to `target`; needs a feedrate.
    pub fn g1(&mut self, target: impl Into<Target>) -> MachineResult<()> {
        if self.feedrate.is_none() {
            return Err(MachineError::FeedrateUndefined);
        }
        self.linear("G1", target.into())
    }

    /// Program the feedrate if it differs from the last one written.
    pub fn feedrate(&mut self, feedrate: f64) -> MachineResult<()> {
        let changed = self
            .feedrate
            .map_or(true, |current| (current - feedrate).abs() > self.accuracy);
        if changed {
            let line = format!("F{}", self.format(feedrate));
            self.emit(&line)?;
            self.feedrate = Some(feedrate);
        }
        Ok(())
    }

    /// Circular or helical move (`G2`/`G3`) around an absolute centre.
    ///
    /// X and Y are always written; Z only when it changes.
    pub fn arc(&mut self, arc: ArcMove) -> MachineResult<()> {
        let i = arc.i.ok_or(MachineError::MissingArcCentre { axis: 'I' })?;
        let j = arc.j.ok_or(MachineError::MissingArcCentre { axis: 'J' })?;
        if arc.turns == 0 {
            return Err(MachineError::InvalidTurns { turns: arc.turns });
        }

        let end = arc.end.resolve(self.position);
        let code = if arc.clockwise { "G2" } else { "G3" };
        let mut words = vec![
            code.to_string(),
            format!("X{}", self.format(end.x)),
            format!("Y{}", self.format(end.y)),
        ];
        let z_word = self.axis_needs_word(2, end.z);
        if z_word {
            words.push(format!("Z{}", self.format(end.z)));
        }
        words.push(format!("I{}", self.format(i)));
        words.push(format!("J{}", self.format(j)));
        if arc.turns != 1 {
            words.push(format!("P{}", arc.turns));
        }

        self.emit(&words.join(" "))?;
        self.initialised[0] = true;
        self.initialised[1] = true;
        self.initialised[2] |= z_word;
        self.position = end;
        Ok(())
    }

    /// Replay a chain of segments starting at the current position.
    ///
    /// The whole chain is checked before anything is written.
    pub fn cut(&mut self, segments: &[Segment]) -> MachineResult<()> {
        let mut cursor = self.position;
        for segment in segments {
            if cursor != segment.start() {
                return Err(MachineError::PathDiscontinuity {
                    expected: segment.start().to_string(),
                    actual: cursor.to_string(),
                });
            }
            match segment {
                Segment::Line(_) if self.feedrate.is_none() => {
                    return Err(MachineError::FeedrateUndefined);
                }
                Segment::Arc(_) if self.plane.is_some_and(|p| p != Plane::XY) => {
                    return Err(MachineError::UnsupportedSegment {
                        reason: format!(
                            "XY arc while the {} plane is active",
                            self.plane.map_or("", |p| p.name())
                        ),
                    });
                }
                _ => {}
            }
            cursor = segment.end();
        }

        for segment in segments {
            match segment {
                Segment::Line(line) => self.g1(line.end)?,
                Segment::Arc(arc) => {
                    let centre = arc.centre();
                    self.arc(
                        ArcMove::around(centre.x, centre.y)
                            .to(arc.end())
                            .cw(arc.clockwise()),
                    )?
                }
            }
        }
        Ok(())
    }

    /// Select the working plane by name (`"xy"`, `"XZ"`, ...) or code (`"G19"`).
    pub fn plane(&mut self, name_or_code: &str) -> MachineResult<()> {
        let plane = name_or_code.parse::<Plane>()?;
        self.select_plane(plane)
    }

    /// Select the working plane if it is not already active.
    pub fn select_plane(&mut self, plane: Plane) -> MachineResult<()> {
        if self.plane != Some(plane) {
            let line = format!("{} ; plane {}", plane.code(), plane.name());
            self.emit(&line)?;
            self.plane = Some(plane);
        }
        Ok(())
    }

    /// Change tool if `tool` is not already loaded.
    pub fn toolchange(&mut self, tool: u32) -> MachineResult<()> {
        if self.tool_number != Some(tool) {
            self.emit(&format!("T{} M6", tool))?;
            self.tool_number = Some(tool);
        }
        Ok(())
    }

    /// Select the path-following mode if it differs from the active one.
    pub fn path_mode(&mut self, mode: PathMode) -> MachineResult<()> {
        if self.path_mode != Some(mode) {
            let line = mode.command(|v| self.format(v));
            self.emit(&line)?;
            self.path_mode = Some(mode);
        }
        Ok(())
    }

    /// Dwell for `seconds`. Always written.
    pub fn dwell(&mut self, seconds: f64) -> MachineResult<()> {
        let line = format!("G4 P{}", self.format(seconds));
        self.emit(&line)
    }

    /// Program pause (`M0`). Always written.
    pub fn pause(&mut self) -> MachineResult<()> {
        self.emit("M0")
    }

    /// Write `(text)`. A single trailing newline is dropped.
    pub fn comment(&mut self, text: &str) -> MachineResult<()> {
        let body = text.strip_suffix('\n').unwrap_or(text);
        let reason = if body.contains('\n') || body.contains('\r') {
            Some("comments must fit on one line")
        } else if body.contains('(') || body.contains(')') {
            Some("comments cannot contain parentheses")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(MachineError::InvalidComment {
                text: text.to_string(),
                reason: reason.to_string(),
            });
        }
        self.emit(&format!("({})", body))
    }

    /// Put the controller into a known set of modes.
    pub fn standard_preamble(&mut self, toolchange: bool) -> MachineResult<()> {
        if self.preamble_comments {
            self.comment("##### Start preamble #####")?;
        }
        self.select_plane(Plane::XY)?;
        for line in [
            "G21 ; mm",
            "G92.1 ; cancel offsets",
            "G40 ; cutter compensation off",
            "G90 ; absolute distance mode",
            "G90.1 ; arc centre absolute distance mode",
            "G94 ; feed rate in units per minute",
        ] {
            self.emit(line)?;
        }
        self.path_mode(self.preamble_path_mode)?;
        if toolchange {
            self.toolchange(self.initial_tool)?;
        }
        if self.preamble_comments {
            self.comment("##### End preamble #####")?;
        }
        Ok(())
    }

    /// End the program (`M2`).
    pub fn standard_postamble(&mut self) -> MachineResult<()> {
        self.emit("M2")
    }

    /// Flush and hand the sink back. The machine cannot be used afterwards.
    pub fn close(mut self) -> MachineResult<W> {
        self.out.flush()?;
        debug!(lines = self.lines_written, "Closed G-code output");
        Ok(self.out)
    }
}

fn check_accuracy(accuracy: f64) -> MachineResult<()> {
    if accuracy > 0.0 && accuracy.is_finite() {
        Ok(())
    } else {
        Err(MachineError::InvalidAccuracy(accuracy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> Machine<Vec<u8>> {
        Machine::new(Vec::new())
    }

    fn output(m: Machine<Vec<u8>>) -> Vec<String> {
        let bytes = m.close().unwrap();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_g0_writes_all_axes_first_time() {
        let mut m = machine();
        m.g0(Target::xyz(100.0, 200.0, 3.0)).unwrap();
        assert_eq!(output(m), ["G0 X100.0000 Y200.0000 Z3.0000"]);
    }

    #[test]
    fn test_first_touch_forces_zero_words() {
        let mut m = machine();
        m.g0(Target::new()).unwrap();
        assert_eq!(output(m), ["G0 X0.0000 Y0.0000 Z0.0000"]);
    }

    #[test]
    fn test_unchanged_axes_are_omitted() {
        let mut m = machine();
        m.g0(Target::xyz(1.0, 2.0, 3.0)).unwrap();
        m.g0(Target::x_only(4.0)).unwrap();
        m.g0(Target::xyz(4.0, 2.0, 5.0)).unwrap();
        assert_eq!(
            output(m),
            [
                "G0 X1.0000 Y2.0000 Z3.0000",
                "G0 X4.0000",
                "G0 Z5.0000"
            ]
        );
    }

    #[test]
    fn test_no_op_move_writes_nothing() {
        let mut m = machine();
        m.g0(Target::xyz(0.0, 0.0, 0.0)).unwrap();
        let before = m.lines_written();
        m.g0(Target::xyz(0.0, 0.0, 0.0)).unwrap();
        m.g0(Target::z_only(m.accuracy() * 0.9)).unwrap();
        assert_eq!(m.lines_written(), before);
    }

    #[test]
    fn test_position_follows_request_even_without_words() {
        let mut m = machine();
        m.g0(Target::xyz(0.0, 0.0, 0.0)).unwrap();
        m.g0(Target::z_only(5e-5)).unwrap();
        assert_eq!(m.position().z, 5e-5);
    }

    #[test]
    fn test_g1_needs_feedrate() {
        let mut m = machine();
        assert!(matches!(
            m.g1(Target::x_only(1.0)),
            Err(MachineError::FeedrateUndefined)
        ));
        assert_eq!(m.lines_written(), 0);
        assert_eq!(m.position(), Vector::ZERO);
    }

    #[test]
    fn test_feedrate_is_diffed() {
        let mut m = machine();
        m.feedrate(100.0).unwrap();
        m.feedrate(100.0).unwrap();
        m.feedrate(100.00001).unwrap();
        m.feedrate(250.0).unwrap();
        assert_eq!(output(m), ["F100.0000", "F250.0000"]);
    }

    #[test]
    fn test_feedrate_respects_accuracy() {
        let mut fine = machine();
        fine.set_accuracy(1e-6).unwrap();
        fine.feedrate(100.0).unwrap();
        fine.feedrate(100.00001).unwrap();
        assert_eq!(fine.lines_written(), 2);

        let mut coarse = machine();
        coarse.set_accuracy(1.0).unwrap();
        coarse.feedrate(100.0).unwrap();
        coarse.feedrate(100.00001).unwrap();
        assert_eq!(coarse.lines_written(), 1);
    }

    #[test]
    fn test_set_accuracy_updates_places() {
        let mut m = machine();
        assert_eq!(m.places(), 4);
        assert_eq!(m.format(1.0), "1.0000");
        assert_ne!(m.format(1.0 + m.accuracy()), m.format(1.0));

        m.set_accuracy(1e-8).unwrap();
        assert_eq!(m.places(), 8);
        assert_eq!(m.format(1.0), "1.00000000");
        assert!(matches!(
            m.set_accuracy(0.0),
            Err(MachineError::InvalidAccuracy(_))
        ));
        assert_eq!(m.places(), 8);
    }

    #[test]
    fn test_arc_always_writes_xy() {
        let mut m = machine();
        m.g0(Target::xyz(1.0, 0.0, 0.0)).unwrap();
        m.arc(ArcMove::around(0.0, 0.0)).unwrap();
        m.arc(ArcMove::around(0.0, 0.0).to(Target::xy(-1.0, 0.0)).cw(false))
            .unwrap();
        assert_eq!(
            output(m),
            [
                "G0 X1.0000 Y0.0000 Z0.0000",
                "G2 X1.0000 Y0.0000 I0.0000 J0.0000",
                "G3 X-1.0000 Y0.0000 I0.0000 J0.0000"
            ]
        );
    }

    #[test]
    fn test_helical_arc_writes_z_and_turns() {
        let mut m = machine();
        m.g0(Target::xyz(2.0, 0.0, 0.0)).unwrap();
        m.arc(
            ArcMove::around(0.0, 0.0)
                .to(Target::z_only(-3.0))
                .with_turns(3),
        )
        .unwrap();
        assert_eq!(m.position(), Vector::new(2.0, 0.0, -3.0));
        assert_eq!(
            output(m).last().unwrap(),
            "G2 X2.0000 Y0.0000 Z-3.0000 I0.0000 J0.0000 P3"
        );
    }

    #[test]
    fn test_arc_without_centre_fails() {
        let mut m = machine();
        let arc = ArcMove {
            i: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(
            m.arc(arc),
            Err(MachineError::MissingArcCentre { axis: 'J' })
        ));
        assert!(matches!(
            m.arc(ArcMove::default()),
            Err(MachineError::MissingArcCentre { axis: 'I' })
        ));
        assert!(matches!(
            m.arc(ArcMove::around(0.0, 0.0).with_turns(0)),
            Err(MachineError::InvalidTurns { turns: 0 })
        ));
        assert_eq!(m.lines_written(), 0);
    }

    #[test]
    fn test_plane_is_diffed() {
        let mut m = machine();
        m.plane("XY").unwrap();
        m.plane("yx").unwrap();
        m.plane("G17").unwrap();
        m.plane("xz").unwrap();
        assert_eq!(output(m), ["G17 ; plane XY", "G18 ; plane ZX"]);
    }

    #[test]
    fn test_invalid_plane() {
        let mut m = machine();
        assert!(matches!(m.plane("AB"), Err(MachineError::InvalidPlane(_))));
        assert_eq!(m.current_plane(), None);
    }

    #[test]
    fn test_toolchange_is_diffed() {
        let mut m = machine();
        m.toolchange(3).unwrap();
        m.toolchange(3).unwrap();
        m.toolchange(5).unwrap();
        assert_eq!(output(m), ["T3 M6", "T5 M6"]);
    }

    #[test]
    fn test_path_mode_is_diffed() {
        let mut m = machine();
        m.path_mode(PathMode::ExactPath).unwrap();
        m.path_mode(PathMode::ExactPath).unwrap();
        m.path_mode(PathMode::ExactStop).unwrap();
        m.path_mode(PathMode::blend_within(0.1, 0.2)).unwrap();
        m.path_mode(PathMode::default()).unwrap();
        assert_eq!(
            output(m),
            ["G61", "G61.1", "G64 P0.1000 Q0.2000", "G64"]
        );
    }

    #[test]
    fn test_dwell_and_pause_repeat() {
        let mut m = machine();
        m.dwell(0.5).unwrap();
        m.dwell(0.5).unwrap();
        m.pause().unwrap();
        m.pause().unwrap();
        assert_eq!(output(m), ["G4 P0.5000", "G4 P0.5000", "M0", "M0"]);
    }

    #[test]
    fn test_comment_validation() {
        let mut m = machine();
        assert!(m.comment("a(b)").is_err());
        assert!(m.comment("a)").is_err());
        assert!(m.comment("a\nb").is_err());
        assert!(m.comment("a\n\n").is_err());
        m.comment("trailing\n").unwrap();
        m.comment("plain").unwrap();
        assert_eq!(output(m), ["(trailing)", "(plain)"]);
    }

    #[test]
    fn test_write_raw() {
        let mut m = machine();
        m.write_raw("anything [0-9] goes\n").unwrap();
        assert_eq!(output(m), ["anything [0-9] goes"]);
    }

    #[test]
    fn test_postamble() {
        let mut m = machine();
        m.standard_postamble().unwrap();
        assert_eq!(output(m), ["M2"]);
    }

    #[test]
    fn test_with_config_rejects_bad_accuracy() {
        let config = MachineConfig {
            accuracy: -1.0,
            ..Default::default()
        };
        assert!(Machine::with_config(Vec::new(), &config).is_err());
    }
}
