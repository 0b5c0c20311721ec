use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{GPSBounds, LonLat, Pt2D};

/// Tiles are square images of this many pixels per side.
pub const TILE_SIZE_PX: f64 = 256.0;
/// Equatorial circumference of the earth, in meters.
const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

/// A standard slippy-map tile address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub fn new(zoom: u8, x: u32, y: u32) -> TileId {
        TileId { zoom, x, y }
    }

    /// The tile at a coarser zoom that contains this one.
    pub fn ancestor(self, zoom: u8) -> TileId {
        assert!(
            zoom <= self.zoom,
            "Can't find the ancestor of {} at finer zoom {}",
            self,
            zoom
        );
        let shift = u32::from(self.zoom - zoom);
        TileId {
            zoom,
            x: self.x.checked_shr(shift).unwrap_or(0),
            y: self.y.checked_shr(shift).unwrap_or(0),
        }
    }

    /// The northwest corner
    pub fn nw(self) -> LonLat {
        corner(self.zoom, f64::from(self.x), f64::from(self.y))
    }

    /// The southeast corner, shared with the northwest corner of the diagonal neighbor.
    pub fn se(self) -> LonLat {
        corner(self.zoom, f64::from(self.x) + 1.0, f64::from(self.y) + 1.0)
    }

    pub fn projection(self) -> TileProjection {
        TileProjection::new(self)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Inverse Web-Mercator
fn corner(zoom: u8, x: f64, y: f64) -> LonLat {
    let n = 2.0_f64.powi(i32::from(zoom));
    LonLat::new(
        x / n * 360.0 - 180.0,
        (PI - 2.0 * PI * y / n).sinh().atan().to_degrees(),
    )
}

/// Maps GPS coordinates onto the pixels of one tile. Within a tile, latitude and longitude are
/// interpolated linearly between the corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileProjection {
    pub tile: TileId,
    nw: LonLat,
    se: LonLat,
    image_scale: f64,
}

impl TileProjection {
    pub fn new(tile: TileId) -> TileProjection {
        let nw = tile.nw();
        let meters_per_pixel = EARTH_CIRCUMFERENCE_M * nw.latitude.to_radians().cos()
            / 2.0_f64.powi(i32::from(tile.zoom) + 8);
        TileProjection {
            tile,
            nw,
            se: tile.se(),
            image_scale: 1.0 / meters_per_pixel,
        }
    }

    pub fn nw(&self) -> LonLat {
        self.nw
    }

    pub fn se(&self) -> LonLat {
        self.se
    }

    /// Pixels per meter at this tile's zoom and latitude.
    pub fn image_scale(&self) -> f64 {
        self.image_scale
    }

    pub fn project(&self, pt: LonLat) -> Pt2D {
        Pt2D::new(
            TILE_SIZE_PX * (pt.longitude - self.nw.longitude)
                / (self.se.longitude - self.nw.longitude),
            TILE_SIZE_PX * (pt.latitude - self.nw.latitude) / (self.se.latitude - self.nw.latitude),
        )
    }

    /// The area covered by this tile, grown on every side by roughly `oversize_m` meters, so that
    /// things just outside the edges are still captured.
    pub fn query_bounds(&self, oversize_m: f64) -> GPSBounds {
        let oversize = oversize_m * self.image_scale / TILE_SIZE_PX;
        let lat_extra = oversize * (self.nw.latitude - self.se.latitude);
        let lon_extra = oversize * (self.se.longitude - self.nw.longitude);
        GPSBounds {
            min_lon: self.nw.longitude - lon_extra,
            min_lat: self.se.latitude - lat_extra,
            max_lon: self.se.longitude + lon_extra,
            max_lat: self.nw.latitude + lat_extra,
        }
    }
}
