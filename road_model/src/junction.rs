use serde::{Deserialize, Serialize};

use geom::{Angle, LonLat};

use crate::lane_specs::Oneway;
use crate::way::WayBuilder;

/// One way's point at a junction. Indices refer to the tile's list of roads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WayPoint {
    pub way: usize,
    pub point: usize,
    pub is_first: bool,
    pub is_last: bool,
}

impl WayPoint {
    pub fn new(way: usize, point: usize, num_points: usize) -> WayPoint {
        WayPoint {
            way,
            point,
            is_first: point == 0,
            is_last: point + 1 == num_points,
        }
    }

    pub fn is_middle(&self) -> bool {
        !self.is_first && !self.is_last
    }
}

/// A node shared by more than one road.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub location: LonLat,
    pub way_points: Vec<WayPoint>,
}

impl Junction {
    /// Ways passing through this node
    pub fn through(&self) -> impl Iterator<Item = &WayPoint> {
        self.way_points.iter().filter(|wp| wp.is_middle())
    }

    /// Ways starting or ending here
    pub fn terminated(&self) -> impl Iterator<Item = &WayPoint> {
        self.way_points.iter().filter(|wp| !wp.is_middle())
    }

    /// Smooths the headings of the points meeting here, so offset lanes line up across the
    /// junction. Two ways ending at the same node are treated as one continuous road. If every
    /// way is one-way in the same sense, all headings merge into their average. Otherwise nothing
    /// changes.
    pub fn smooth(&self, builders: &mut [WayBuilder]) {
        let terminated: Vec<WayPoint> = self.terminated().cloned().collect();
        if terminated.len() == 2 && self.through().next().is_none() {
            // Flip one heading when both ways start here, or both end here, so the two point
            // the same way before averaging.
            let corrections = [
                if terminated[0].is_first {
                    Angle::HALF_TURN
                } else {
                    Angle::ZERO
                },
                if terminated[1].is_last {
                    Angle::HALF_TURN
                } else {
                    Angle::ZERO
                },
            ];
            let shared = Angle::average(&[
                builders[terminated[0].way].heading(terminated[0].point) + corrections[0],
                builders[terminated[1].way].heading(terminated[1].point) + corrections[1],
            ]);
            for (wp, correction) in terminated.iter().zip(corrections) {
                builders[wp.way].set_heading(wp.point, shared + correction);
            }
        } else if self.all_oneway(builders, Oneway::Forward)
            || self.all_oneway(builders, Oneway::Backward)
        {
            let headings: Vec<Angle> = self
                .way_points
                .iter()
                .map(|wp| builders[wp.way].heading(wp.point))
                .collect();
            let shared = Angle::average(&headings);
            for wp in &self.way_points {
                builders[wp.way].set_heading(wp.point, shared);
            }
        }
    }

    /// Mixing directions would average headings that point against each other's traffic.
    fn all_oneway(&self, builders: &[WayBuilder], oneway: Oneway) -> bool {
        self.way_points
            .iter()
            .all(|wp| Oneway::from_tags(&builders[wp.way].tags) == oneway)
    }
}
