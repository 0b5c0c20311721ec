use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// An angle stored in radians, always normalized to (-pi, pi].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);
    pub const QUARTER_TURN: Angle = Angle(PI / 2.0);
    pub const HALF_TURN: Angle = Angle(PI);

    /// Normalizes any finite input.
    pub fn new_rads(rads: f64) -> Angle {
        let wrapped = rads.rem_euclid(2.0 * PI);
        Angle(if wrapped > PI { wrapped - 2.0 * PI } else { wrapped })
    }

    pub fn degrees(degs: f64) -> Angle {
        Angle::new_rads(degs.to_radians())
    }

    /// The bearing from the origin towards (dx, dy).
    pub fn from_delta(dx: f64, dy: f64) -> Angle {
        Angle::new_rads(dy.atan2(dx))
    }

    pub fn rads(self) -> f64 {
        self.0
    }

    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }

    pub fn opposite(self) -> Angle {
        self + Angle::HALF_TURN
    }

    /// The circular mean: the direction of the summed unit vectors. Averaging +179 and -179
    /// degrees gives 180, not 0. Panics on an empty list.
    pub fn average(angles: &[Angle]) -> Angle {
        assert!(!angles.is_empty(), "Can't average zero angles");
        let (sin, cos) = angles.iter().fold((0.0, 0.0), |(sin, cos), a| {
            (sin + a.0.sin(), cos + a.0.cos())
        });
        Angle::new_rads(sin.atan2(cos))
    }

    /// Unsigned angular distance, in [0, pi].
    pub fn difference(self, other: Angle) -> Angle {
        let diff = (self.0 - other.0).abs();
        Angle::new_rads(if diff > PI { 2.0 * PI - diff } else { diff })
    }

    pub fn approx_eq(self, other: Angle, epsilon_rads: f64) -> bool {
        self.difference(other).0 <= epsilon_rads
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, other: Angle) -> Angle {
        Angle::new_rads(self.0 + other.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, other: Angle) -> Angle {
        Angle::new_rads(self.0 - other.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.3}°", self.to_degrees())
    }
}
