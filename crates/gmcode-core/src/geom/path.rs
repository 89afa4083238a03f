//! Path segments: straight lines and XY-plane arcs.

use super::{Vector, TOLERANCE};
use crate::error::GeometryError;

/// Which end of a segment a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Vector,
    pub end: Vector,
}

impl Line {
    pub fn new(start: Vector, end: Vector) -> Self {
        Self { start, end }
    }

    /// Unit direction of travel.
    pub fn tangent(&self) -> Result<Vector, GeometryError> {
        (self.end - self.start).unit_vector()
    }

    /// Unit vector to the right of travel, in the XY plane.
    ///
    /// Only the XY projection of the direction counts, so ramps get the
    /// same normal as their plan view. Vertical lines have no XY
    /// direction and fail with `DegenerateVector`.
    pub fn normal(&self) -> Result<Vector, GeometryError> {
        let tangent = self.tangent()?;
        Ok(Vector::xy(tangent.x, tangent.y)
            .unit_vector()?
            .cross(&Vector::Z))
    }

    /// Parallel line `d` to the right of travel.
    pub fn offset_xy(&self, d: f64) -> Result<Self, GeometryError> {
        let shift = self.normal()? * d;
        Ok(Self::new(self.start + shift, self.end + shift))
    }

    /// Same line moved `d` along Z.
    pub fn offset_z(&self, d: f64) -> Self {
        let shift = Vector::Z * d;
        Self::new(self.start + shift, self.end + shift)
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Midpoint.
    pub fn centre(&self) -> Vector {
        (self.start + self.end) / 2.0
    }
}

/// A circular arc in the XY plane.
///
/// Both endpoints are stored so that `start == end` unambiguously means a
/// full circle in the arc's direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcXY {
    start: Vector,
    end: Vector,
    centre: Vector,
    clockwise: bool,
}

impl ArcXY {
    /// Build an arc, checking that both endpoints lie on the same circle.
    pub fn new(
        start: Vector,
        end: Vector,
        centre: Vector,
        clockwise: bool,
    ) -> Result<Self, GeometryError> {
        let start_radius = start.distance_to(&centre);
        let end_radius = end.distance_to(&centre);
        if (start_radius - end_radius).abs() > TOLERANCE {
            return Err(GeometryError::InvalidArc {
                start_radius,
                end_radius,
            });
        }
        Ok(Self {
            start,
            end,
            centre,
            clockwise,
        })
    }

    pub fn start(&self) -> Vector {
        self.start
    }

    pub fn end(&self) -> Vector {
        self.end
    }

    pub fn centre(&self) -> Vector {
        self.centre
    }

    pub fn clockwise(&self) -> bool {
        self.clockwise
    }

    fn point(&self, endpoint: Endpoint) -> Vector {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    /// Unit direction of travel at an endpoint.
    pub fn tangent(&self, endpoint: Endpoint) -> Result<Vector, GeometryError> {
        let point = self.point(endpoint);
        let radial = if self.clockwise {
            Line::new(self.centre, point)
        } else {
            Line::new(point, self.centre)
        };
        radial.normal()
    }

    /// Unit vector to the right of travel at an endpoint.
    pub fn normal(&self, endpoint: Endpoint) -> Result<Vector, GeometryError> {
        Ok(self.tangent(endpoint)?.cross(&Vector::Z))
    }

    /// Mean of the start and end radii.
    pub fn radius(&self) -> f64 {
        (self.start.distance_to(&self.centre) + self.end.distance_to(&self.centre)) / 2.0
    }

    /// Concentric arc with its radius grown by `d` (shrunk when negative).
    pub fn offset_xy(&self, d: f64) -> Result<Self, GeometryError> {
        let start = self.start + (self.start - self.centre).unit_vector()? * d;
        let end = self.end + (self.end - self.centre).unit_vector()? * d;
        Self::new(start, end, self.centre, self.clockwise)
    }
}

/// A segment that a machine can cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Line),
    Arc(ArcXY),
}

impl Segment {
    pub fn start(&self) -> Vector {
        match self {
            Segment::Line(line) => line.start,
            Segment::Arc(arc) => arc.start(),
        }
    }

    pub fn end(&self) -> Vector {
        match self {
            Segment::Line(line) => line.end,
            Segment::Arc(arc) => arc.end(),
        }
    }
}

impl From<Line> for Segment {
    fn from(line: Line) -> Self {
        Segment::Line(line)
    }
}

impl From<ArcXY> for Segment {
    fn from(arc: ArcXY) -> Self {
        Segment::Arc(arc)
    }
}
