//! Command-line access to the overlays: inspect how tags become lanes, or draw a tile from an
//! Overpass dump without running a server.

#[macro_use]
extern crate log;

use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;
use structopt::StructOpt;

use geom::TileId;
use overlay_util::Tags;
use road_model::{get_road, Road, TileData};
use tile_service::{
    render_completeness, CacheConfig, Completeness, FileSource, RecordingCanvas, Renderer,
    ServiceConfig, TileCache,
};

#[derive(StructOpt)]
#[structopt(name = "overlay", about = "Road and rail lane overlay tiles")]
enum Command {
    /// Print the cross-section of a way with the given tags
    Lanes {
        /// Tags in `key=value` form, like `highway=residential sidewalk=both`
        #[structopt()]
        tags: Vec<String>,
        /// Print each lane with its offsets as JSON, instead of a summary
        #[structopt(long)]
        json: bool,
    },
    /// Draw one tile from an Overpass JSON dump, printing the drawing instructions as JSON
    Render {
        /// The path to an Overpass JSON response
        #[structopt(long)]
        input: String,
        #[structopt(long)]
        zoom: u8,
        #[structopt(long)]
        x: u32,
        #[structopt(long)]
        y: u32,
        /// The path to a JSON ServiceConfig. Defaults are used otherwise.
        #[structopt(long)]
        config: Option<String>,
    },
    /// Wash one tile by how completely it's mapped, from an Overpass JSON dump of `out count;`
    /// results, printing the drawing instructions as JSON
    Completeness {
        /// The path to an Overpass JSON response
        #[structopt(long)]
        input: String,
        #[structopt(long)]
        zoom: u8,
        #[structopt(long)]
        x: u32,
        #[structopt(long)]
        y: u32,
        /// The path to a JSON ServiceConfig. Defaults are used otherwise.
        #[structopt(long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    overlay_util::logger::setup();

    match Command::from_args() {
        Command::Lanes { tags, json } => lanes(tags, json)?,
        Command::Render {
            input,
            zoom,
            x,
            y,
            config,
        } => render(input, TileId::new(zoom, x, y), config).await?,
        Command::Completeness {
            input,
            zoom,
            x,
            y,
            config,
        } => completeness(input, TileId::new(zoom, x, y), config).await?,
    }
    Ok(())
}

fn parse_tags(raw: Vec<String>) -> Result<Tags> {
    let mut tags = Tags::empty();
    for kv in raw {
        match kv.split_once('=') {
            Some((k, v)) if !k.is_empty() => tags.insert(k, v),
            _ => bail!("Tags must look like key=value, not {}", kv),
        }
    }
    Ok(tags)
}

#[derive(Serialize)]
struct LaneOutput {
    #[serde(flatten)]
    lane: road_model::Lane,
    left: f32,
    right: f32,
}

fn lanes(raw: Vec<String>, json: bool) -> Result<()> {
    let road: Road = get_road(&parse_tags(raw)?);
    if json {
        let lanes: Vec<LaneOutput> = road
            .lane_offsets()
            .into_iter()
            .map(|(lane, left, right)| LaneOutput { lane, left, right })
            .collect();
        println!("{}", serde_json::to_string_pretty(&lanes)?);
    } else {
        println!("{}", road);
        println!("{:.1}m wide", road.total_width());
    }
    Ok(())
}

fn load_config(path: Option<String>) -> Result<ServiceConfig> {
    match path {
        Some(path) => ServiceConfig::load(&path),
        None => Ok(ServiceConfig::default()),
    }
}

fn check_zoom(id: TileId, levels: &CacheConfig) -> Result<()> {
    if !levels.serves(id.zoom) {
        bail!(
            "Can't render {}; zoom must be in [{}, {}]",
            id,
            levels.min_zoom,
            levels.max_zoom
        );
    }
    Ok(())
}

fn print_instructions(canvas: RecordingCanvas) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&canvas.instructions)?);
    Ok(())
}

async fn render(input: String, id: TileId, config: Option<String>) -> Result<()> {
    let config = load_config(config)?;
    check_zoom(id, &config.lanes)?;

    let cache: TileCache<TileData> =
        TileCache::new(config.clone(), Arc::new(FileSource::new(input)));
    let tile = cache.get(id).await;
    let mut canvas = RecordingCanvas::new();
    Renderer::new(&tile, &config).render(&mut canvas);
    info!(
        "Drew {} with {} instructions",
        tile,
        canvas.instructions.len()
    );
    print_instructions(canvas)
}

async fn completeness(input: String, id: TileId, config: Option<String>) -> Result<()> {
    let config = load_config(config)?;
    check_zoom(id, &config.completeness)?;

    let cache: TileCache<Completeness> =
        TileCache::new(config, Arc::new(FileSource::new(input)));
    let tile = cache.get(id).await;
    match tile.data.fraction() {
        Some(x) => info!("{} is {:.0}% complete", tile, x * 100.0),
        None => warn!("{} has no feature counts", tile),
    }
    let mut canvas = RecordingCanvas::new();
    render_completeness(&tile, &mut canvas);
    print_instructions(canvas)
}
