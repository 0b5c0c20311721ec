use std::collections::BTreeSet;

use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};

use geom::{GPSBounds, LonLat};
use road_model::{parse_overpass_json, Element};

/// What to ask the upstream for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Query {
    /// Every way touching the bounds, plus all of the nodes those ways use
    Ways,
    /// One `Element::Count` per tag family that a well-mapped area has: natural, landuse,
    /// barrier, waterway, highway=road, other highways, cycleway, power, building, addressed
    /// buildings, amenity
    Counts,
}

/// Where raw data comes from. Implementations own their transport, retries, and query language;
/// the cache only imposes a timeout.
pub trait DataSource: Send + Sync + 'static {
    fn fetch(&self, query: Query, bounds: GPSBounds) -> BoxFuture<'static, Result<Vec<Element>>>;
}

/// Serves an Overpass JSON dump from disk, as if the dump were the whole world.
pub struct FileSource {
    path: String,
}

impl FileSource {
    pub fn new(path: String) -> FileSource {
        FileSource { path }
    }
}

impl DataSource for FileSource {
    fn fetch(&self, query: Query, bounds: GPSBounds) -> BoxFuture<'static, Result<Vec<Element>>> {
        let path = self.path.clone();
        debug!(
            "Reading {:?} from {} for bbox {}",
            query,
            path,
            bounds.to_overpass_bbox()
        );
        async move {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path))?;
            let elements = parse_overpass_json(&raw).with_context(|| format!("in {}", path))?;
            Ok(match query {
                Query::Ways => clip(elements, &bounds),
                // A dump's counts already describe the area it was taken from
                Query::Counts => elements
                    .into_iter()
                    .filter(|e| matches!(e, Element::Count { .. }))
                    .collect(),
            })
        }
        .boxed()
    }
}

/// Keeps the ways with at least one node inside `bounds`, and every node they reference. Anything
/// else is dropped.
pub fn clip(elements: Vec<Element>, bounds: &GPSBounds) -> Vec<Element> {
    let inside: BTreeSet<i64> = elements
        .iter()
        .filter_map(|e| match e {
            Element::Node { id, lat, lon } if bounds.contains(LonLat::new(*lon, *lat)) => {
                Some(*id)
            }
            _ => None,
        })
        .collect();
    let mut used = BTreeSet::new();
    for e in &elements {
        if let Element::Way { nodes, .. } = e {
            if nodes.iter().any(|id| inside.contains(id)) {
                used.extend(nodes.iter().cloned());
            }
        }
    }

    elements
        .into_iter()
        .filter(|e| match e {
            Element::Node { id, .. } => used.contains(id),
            Element::Way { nodes, .. } => nodes.iter().any(|id| inside.contains(id)),
            Element::Count { .. } | Element::Other => false,
        })
        .collect()
}
