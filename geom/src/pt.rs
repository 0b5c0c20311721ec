use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::Angle;

/// A point in tile pixel space. x grows east, y grows south, like screen drawing order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt2D {
    x: f64,
    y: f64,
}

impl Pt2D {
    pub fn new(x: f64, y: f64) -> Pt2D {
        Pt2D { x, y }
    }

    pub fn zero() -> Pt2D {
        Pt2D::new(0.0, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn angle_to(&self, to: Pt2D) -> Angle {
        // DON'T invert y here
        Angle::from_delta(to.x - self.x, to.y - self.y)
    }

    pub fn dist_to(&self, to: Pt2D) -> f64 {
        ((to.x - self.x).powi(2) + (to.y - self.y).powi(2)).sqrt()
    }

    pub fn approx_eq(&self, other: Pt2D, threshold: f64) -> bool {
        self.dist_to(other) <= threshold
    }
}

impl Add for Pt2D {
    type Output = Pt2D;

    fn add(self, other: Pt2D) -> Pt2D {
        Pt2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Pt2D {
    type Output = Pt2D;

    fn sub(self, other: Pt2D) -> Pt2D {
        Pt2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Pt2D {
    type Output = Pt2D;

    fn mul(self, factor: f64) -> Pt2D {
        Pt2D::new(self.x * factor, self.y * factor)
    }
}

impl fmt::Display for Pt2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt2D({:.2}, {:.2})", self.x, self.y)
    }
}
