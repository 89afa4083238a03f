use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::TOLERANCE;
use crate::error::GeometryError;

/// A point or direction in 3D machine space.
///
/// Equality is tolerance based: two vectors are equal when they are closer
/// than [`TOLERANCE`] and, if neither is near zero, point the same way
/// within [`TOLERANCE`]. Any two near-zero vectors compare equal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vector {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Vector {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A vector in the XY plane (z = 0).
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// X and Y components as a tuple.
    pub fn xy_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Euclidean length.
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Vector of length one in the same direction.
    pub fn unit_vector(&self) -> Result<Self, GeometryError> {
        let magnitude = self.magnitude();
        if magnitude < TOLERANCE {
            return Err(GeometryError::DegenerateVector { magnitude });
        }
        Ok(*self / magnitude)
    }

    fn is_near_zero(&self) -> bool {
        self.magnitude() < TOLERANCE
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        if self.distance_to(other) >= TOLERANCE {
            return false;
        }
        match (self.unit_vector(), other.unit_vector()) {
            (Ok(a), Ok(b)) => a.distance_to(&b) < TOLERANCE,
            // one or both near zero: distance alone decides
            _ => self.is_near_zero() || other.is_near_zero(),
        }
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;

    fn mul(self, v: Vector) -> Vector {
        v * self
    }
}

impl Div<f64> for Vector {
    type Output = Self;

    fn div(self, s: f64) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s)
    }
}

impl From<(f64, f64, f64)> for Vector {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}
