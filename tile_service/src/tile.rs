use std::fmt;
use std::sync::Arc;

use geom::{TileId, TileProjection};
use road_model::{TileData, Way};

/// One requested tile. The data may be shared with every other tile under the same load-zoom
/// ancestor, but the projection is always this tile's own.
#[derive(Clone)]
pub struct Tile<T = TileData> {
    pub projection: TileProjection,
    pub data: Arc<T>,
}

impl<T> Tile<T> {
    pub fn new(id: TileId, data: Arc<T>) -> Tile<T> {
        Tile {
            projection: id.projection(),
            data,
        }
    }

    pub fn id(&self) -> TileId {
        self.projection.tile
    }

    pub fn zoom(&self) -> u8 {
        self.projection.tile.zoom
    }
}

impl Tile<TileData> {
    pub fn rails_in_layer(&self, layer: i32) -> impl Iterator<Item = &Way> {
        in_layer(&self.data.rails, layer)
    }

    pub fn roads_in_layer(&self, layer: i32) -> impl Iterator<Item = &Way> {
        in_layer(&self.data.roads, layer)
    }
}

fn in_layer(ways: &[Way], layer: i32) -> impl Iterator<Item = &Way> {
    ways.iter().filter(move |w| w.layer() == Some(layer))
}

impl<T> fmt::Display for Tile<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tile({})", self.id())
    }
}
