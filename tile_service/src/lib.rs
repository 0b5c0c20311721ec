//! Serves overlay tiles: loads data per coarse tile through a shared cache, then draws any finer
//! tile beneath it. The lane overlay draws roads and rails; the completeness overlay washes each
//! tile by how much of it has been mapped.

#[macro_use]
extern crate log;

mod cache;
mod completeness;
mod config;
pub mod render;
mod source;
mod tile;

pub use crate::cache::{Payload, TileCache};
pub use crate::completeness::Completeness;
pub use crate::config::{CacheConfig, ServiceConfig};
pub use crate::render::{
    render_completeness, Canvas, Color, Instruction, Pen, RecordingCanvas, Renderer,
};
pub use crate::source::{clip, DataSource, FileSource, Query};
pub use crate::tile::Tile;
