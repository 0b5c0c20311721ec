//! Geometry primitives for drawing overlays onto slippy-map tiles: angles, GPS coordinates, tile
//! pixel coordinates, and the math relating tiles to the globe.

mod angle;
mod gps;
mod pt;
mod tile;

pub use crate::angle::Angle;
pub use crate::gps::{GPSBounds, LonLat};
pub use crate::pt::Pt2D;
pub use crate::tile::{TileId, TileProjection, TILE_SIZE_PX};
