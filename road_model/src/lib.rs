//! The road model: how OSM ways become cross-sections of lanes, and how those lanes are laid out
//! along the ways of one tile.
//!
//! Everything assumes left-hand traffic. Forward traffic keeps to the left side of the way.

#[macro_use]
extern crate log;

mod element;
mod junction;
mod lane;
mod lane_specs;
pub mod offset;
pub mod osm;
mod tile_data;
mod way;

pub use crate::element::{parse_overpass_json, Element};
pub use crate::junction::{Junction, WayPoint};
pub use crate::lane::{
    Direction, Lane, LaneType, Road, CAR_LANE_WIDTH, CYCLE_LANE_WIDTH, SHOULDER_WIDTH,
    SIDEWALK_WIDTH, VERGE_WIDTH,
};
pub use crate::lane_specs::{get_road, DrivingLanes, Oneway};
pub use crate::tile_data::TileData;
pub use crate::way::{Point, Segment, Way, WayBuilder};
