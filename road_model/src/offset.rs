//! Projecting lateral offsets from a way's centerline into tile pixels. Each point is pushed out
//! perpendicular to its own heading, stretched so that lanes keep their width along segments
//! whose bearing differs from the heading.

use std::f64::consts::FRAC_PI_2;

use geom::{Pt2D, TileProjection};

use crate::way::{Point, Segment, Way};

/// Below this, bends are too sharp to stretch offsets faithfully.
const MIN_EXTENSION: f64 = 0.5;

/// The pixel displacement of one meter to the right of `point`, for drawing `segment`.
pub fn offset_direction(projection: &TileProjection, segment: &Segment, point: &Point) -> Pt2D {
    let mut extension = segment.bearing.difference(point.heading).rads().cos();
    if extension < MIN_EXTENSION {
        warn!(
            "Unusual length extension for offset on {}: segment {}, point {}, extension {}",
            projection.tile, segment.bearing, point.heading, extension
        );
        extension = MIN_EXTENSION;
    }
    let theta = FRAC_PI_2 - point.heading.rads();
    Pt2D::new(-theta.cos(), theta.sin()) * (projection.image_scale() / extension)
}

pub fn offset(pixel: Pt2D, direction: Pt2D, meters: f64) -> Pt2D {
    pixel + direction * meters
}

/// The band between two lateral offsets along one segment, as a polygon.
pub fn lane_quad(
    projection: &TileProjection,
    segment: &Segment,
    left: f64,
    right: f64,
) -> [Pt2D; 4] {
    let start = projection.project(segment.start.pos);
    let end = projection.project(segment.end.pos);
    let start_dir = offset_direction(projection, segment, &segment.start);
    let end_dir = offset_direction(projection, segment, &segment.end);
    [
        offset(start, start_dir, left),
        offset(start, start_dir, right),
        offset(end, end_dir, right),
        offset(end, end_dir, left),
    ]
}

/// The whole way shifted sideways by a fixed distance. Every point is offset along the segment
/// that starts there, except the last.
pub fn offset_polyline(projection: &TileProjection, way: &Way, meters: f64) -> Vec<Pt2D> {
    let mut pts = Vec::with_capacity(way.points.len());
    for segment in &way.segments {
        pts.push(offset(
            projection.project(segment.start.pos),
            offset_direction(projection, segment, &segment.start),
            meters,
        ));
    }
    if let Some(last) = way.segments.last() {
        pts.push(offset(
            projection.project(last.end.pos),
            offset_direction(projection, last, &last.end),
            meters,
        ));
    }
    pts
}
