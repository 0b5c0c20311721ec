use serde::{Deserialize, Serialize};

use geom::{Angle, LonLat, TileProjection};
use overlay_util::Tags;

use crate::lane::Road;
use crate::lane_specs::get_road;
use crate::osm;

/// A position along a way, with the direction the way is heading there.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub pos: LonLat,
    pub heading: Angle,
}

/// The straight piece of a way between two consecutive points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    /// Measured in the pixel space of the tile the way was loaded for
    pub bearing: Angle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Way {
    pub tags: Tags,
    pub points: Vec<Point>,
    pub segments: Vec<Segment>,
    pub road: Road,
}

impl Way {
    /// `None` for an unparseable `layer` tag. Missing means ground level.
    pub fn layer(&self) -> Option<i32> {
        parse_layer(&self.tags)
    }
}

pub(crate) fn parse_layer(tags: &Tags) -> Option<i32> {
    match tags.get(osm::LAYER) {
        Some(x) => x.trim().parse::<i32>().ok(),
        None => Some(0),
    }
}

/// The first phase of building a `Way`. Headings stay adjustable until `build`, so junctions can
/// smooth them.
#[derive(Clone, Debug)]
pub struct WayBuilder {
    pub tags: Tags,
    positions: Vec<LonLat>,
    bearings: Vec<Angle>,
    headings: Vec<Angle>,
}

impl WayBuilder {
    /// Needs at least two positions.
    pub fn new(tags: Tags, positions: Vec<LonLat>, projection: &TileProjection) -> WayBuilder {
        assert!(
            positions.len() >= 2,
            "A way needs 2 points, not {}",
            positions.len()
        );
        let bearings: Vec<Angle> = positions
            .windows(2)
            .map(|pair| {
                projection
                    .project(pair[0])
                    .angle_to(projection.project(pair[1]))
            })
            .collect();

        let mut headings = Vec::with_capacity(positions.len());
        headings.push(bearings[0]);
        for pair in bearings.windows(2) {
            headings.push(Angle::average(pair));
        }
        headings.push(bearings[bearings.len() - 1]);

        WayBuilder {
            tags,
            positions,
            bearings,
            headings,
        }
    }

    pub fn heading(&self, idx: usize) -> Angle {
        self.headings[idx]
    }

    pub fn set_heading(&mut self, idx: usize, heading: Angle) {
        self.headings[idx] = heading;
    }

    pub fn build(self) -> Way {
        let points: Vec<Point> = self
            .positions
            .into_iter()
            .zip(self.headings)
            .map(|(pos, heading)| Point { pos, heading })
            .collect();
        let segments = points
            .windows(2)
            .zip(self.bearings)
            .map(|(pair, bearing)| Segment {
                start: pair[0],
                end: pair[1],
                bearing,
            })
            .collect();
        let road = get_road(&self.tags);
        Way {
            tags: self.tags,
            points,
            segments,
            road,
        }
    }
}
