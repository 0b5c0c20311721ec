use std::fmt;

use serde::{Deserialize, Serialize};

/// Car lanes, shoulders, and parallel parking are all this wide.
pub const CAR_LANE_WIDTH: f32 = 3.0;
pub const CYCLE_LANE_WIDTH: f32 = 1.0;
pub const SHOULDER_WIDTH: f32 = 3.0;
pub const VERGE_WIDTH: f32 = 2.0;
pub const SIDEWALK_WIDTH: f32 = 2.0;

/// Ordered the way lanes nest, from the outside of a road inwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LaneType {
    /// Zero-width boundary at either side of a road
    Edge,
    Sidewalk,
    /// A grass strip
    Verge,
    Parking,
    Shoulder,
    Cycle,
    Car,
}

impl LaneType {
    /// Parts of the road surface that vehicles use, as opposed to the edge, sidewalks, and verges.
    pub fn is_carriageway(self) -> bool {
        match self {
            LaneType::Parking | LaneType::Shoulder | LaneType::Cycle | LaneType::Car => true,
            LaneType::Edge | LaneType::Sidewalk | LaneType::Verge => false,
        }
    }
}

/// Which way traffic moves along a lane, relative to the way's own point order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    None,
    Forward,
    Backward,
    Both,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
            Direction::None | Direction::Both => self,
        }
    }

    fn arrow(self) -> Option<&'static str> {
        match self {
            Direction::None => None,
            Direction::Forward => Some("↑"),
            Direction::Backward => Some("↓"),
            Direction::Both => Some("↕"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub lane_type: LaneType,
    pub dir: Direction,
    /// In meters
    pub width: f32,
}

impl Lane {
    pub fn new(lane_type: LaneType, dir: Direction, width: f32) -> Lane {
        Lane {
            lane_type,
            dir,
            width,
        }
    }

    pub fn edge() -> Lane {
        Lane::new(LaneType::Edge, Direction::None, 0.0)
    }

    pub fn car(dir: Direction) -> Lane {
        Lane::new(LaneType::Car, dir, CAR_LANE_WIDTH)
    }

    pub fn cycle(dir: Direction) -> Lane {
        Lane::new(LaneType::Cycle, dir, CYCLE_LANE_WIDTH)
    }

    pub fn shoulder(dir: Direction) -> Lane {
        Lane::new(LaneType::Shoulder, dir, SHOULDER_WIDTH)
    }

    pub fn parking(width: f32) -> Lane {
        Lane::new(LaneType::Parking, Direction::None, width)
    }

    pub fn verge() -> Lane {
        Lane::new(LaneType::Verge, Direction::None, VERGE_WIDTH)
    }

    pub fn sidewalk() -> Lane {
        Lane::new(LaneType::Sidewalk, Direction::None, SIDEWALK_WIDTH)
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.lane_type == LaneType::Edge {
            return write!(f, "Edge");
        }
        write!(f, "{:?} ", self.lane_type)?;
        if let Some(arrow) = self.dir.arrow() {
            write!(f, "{} ", arrow)?;
        }
        write!(f, "{:.1}m", self.width)
    }
}

/// The cross-section of a way, from left to right.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Road {
    /// Empty, or bracketed by `Edge` lanes
    pub lanes: Vec<Lane>,
    /// Distance from the left edge of the cross-section to the way's own centerline, in meters
    pub center: f32,
}

impl Road {
    pub fn empty() -> Road {
        Road {
            lanes: Vec::new(),
            center: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn total_width(&self) -> f32 {
        self.lanes.iter().map(|l| l.width).sum()
    }

    /// Each lane with its lateral offsets (left, right) relative to the centerline. Left of the
    /// centerline is negative.
    pub fn lane_offsets(&self) -> Vec<(Lane, f32, f32)> {
        let mut result = Vec::new();
        let mut left = -self.center;
        for lane in &self.lanes {
            let right = left + lane.width;
            result.push((*lane, left, right));
            left = right;
        }
        result
    }
}

impl fmt::Display for Road {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Road(")?;
        for (idx, lane) in self.lanes.iter().enumerate() {
            if idx != 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", lane)?;
        }
        write!(f, ", Center={:.1}m)", self.center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let road = Road {
            lanes: vec![
                Lane::edge(),
                Lane::sidewalk(),
                Lane::car(Direction::Both),
                Lane::cycle(Direction::Backward),
                Lane::edge(),
            ],
            center: 3.5,
        };
        assert_eq!(
            road.to_string(),
            "Road(Edge|Sidewalk 2.0m|Car ↕ 3.0m|Cycle ↓ 1.0m|Edge, Center=3.5m)"
        );
        assert_eq!(Road::empty().to_string(), "Road(, Center=0.0m)");
    }

    #[test]
    fn offsets_start_left_of_center() {
        let road = Road {
            lanes: vec![
                Lane::edge(),
                Lane::car(Direction::Forward),
                Lane::car(Direction::Backward),
                Lane::edge(),
            ],
            center: 3.0,
        };
        let offsets: Vec<(f32, f32)> = road
            .lane_offsets()
            .into_iter()
            .map(|(_, left, right)| (left, right))
            .collect();
        assert_eq!(
            offsets,
            vec![(-3.0, -3.0), (-3.0, 0.0), (0.0, 3.0), (3.0, 3.0)]
        );
        assert_eq!(road.total_width(), 6.0);
    }
}
