use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use geom::{LonLat, TileProjection};
use overlay_util::{prettyprint_usize, MultiMap, Tags};

use crate::junction::{Junction, WayPoint};
use crate::osm;
use crate::way::{parse_layer, Way, WayBuilder};
use crate::Element;

/// Everything drawn from one load-zoom tile's worth of upstream data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TileData {
    /// Every parseable layer present, ascending
    pub layers: Vec<i32>,
    pub rails: Vec<Way>,
    pub roads: Vec<Way>,
    /// Only between roads
    pub junctions: Vec<Junction>,
}

impl TileData {
    pub fn empty() -> TileData {
        TileData::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rails.is_empty() && self.roads.is_empty()
    }

    /// Headings are computed in the pixel space of `projection`.
    pub fn load(projection: &TileProjection, elements: &[Element]) -> TileData {
        let mut node_order = Vec::new();
        let mut nodes: BTreeMap<i64, LonLat> = BTreeMap::new();
        let mut ways: Vec<(&Tags, &Vec<i64>)> = Vec::new();
        for element in elements {
            match element {
                Element::Node { id, lat, lon } => {
                    node_order.push(*id);
                    nodes.insert(*id, LonLat::new(*lon, *lat));
                }
                Element::Way {
                    tags, nodes: ids, ..
                } => {
                    if !tags.inner().is_empty() {
                        ways.push((tags, ids));
                    }
                }
                Element::Count { .. } | Element::Other => {}
            }
        }

        let layers: BTreeSet<i32> = ways
            .iter()
            .filter_map(|(tags, _)| parse_layer(tags))
            .collect();

        let mut rails = Vec::new();
        let mut road_builders = Vec::new();
        let mut road_nodes: Vec<&Vec<i64>> = Vec::new();
        for (tags, node_ids) in ways {
            if tags.is(osm::AREA, "yes") {
                continue;
            }
            let is_rail = tags.is_any(osm::RAILWAY, &osm::RAILWAYS);
            let is_road = tags.is_any(osm::HIGHWAY, &osm::ROAD_HIGHWAYS);
            if !is_rail && !is_road {
                continue;
            }
            let positions = match resolve_positions(node_ids, &nodes) {
                Some(pts) => pts,
                None => continue,
            };
            if is_rail {
                rails.push(WayBuilder::new(tags.clone(), positions.clone(), projection).build());
            }
            if is_road {
                road_builders.push(WayBuilder::new(tags.clone(), positions, projection));
                road_nodes.push(node_ids);
            }
        }

        let mut roads_per_node: MultiMap<i64, usize> = MultiMap::new();
        for (idx, node_ids) in road_nodes.iter().enumerate() {
            for id in node_ids.iter() {
                roads_per_node.insert(*id, idx);
            }
        }
        let mut junctions = Vec::new();
        for id in node_order {
            let roads = roads_per_node.get(id);
            if roads.len() < 2 {
                continue;
            }
            // A closed way touches its first node twice
            let way_points = roads
                .iter()
                .flat_map(|idx| {
                    let node_ids = road_nodes[*idx];
                    node_ids
                        .iter()
                        .enumerate()
                        .filter(move |(_, x)| **x == id)
                        .map(move |(point, _)| WayPoint::new(*idx, point, node_ids.len()))
                })
                .collect();
            let junction = Junction {
                location: nodes[&id],
                way_points,
            };
            junction.smooth(&mut road_builders);
            junctions.push(junction);
        }

        let roads: Vec<Way> = road_builders.into_iter().map(|b| b.build()).collect();
        info!(
            "Loaded {}: {} rails, {} roads, {} road junctions",
            projection.tile,
            prettyprint_usize(rails.len()),
            prettyprint_usize(roads.len()),
            prettyprint_usize(junctions.len())
        );
        TileData {
            layers: layers.into_iter().collect(),
            rails,
            roads,
            junctions,
        }
    }
}

/// `None` if the way can't be drawn.
fn resolve_positions(node_ids: &[i64], nodes: &BTreeMap<i64, LonLat>) -> Option<Vec<LonLat>> {
    let mut positions = Vec::with_capacity(node_ids.len());
    for id in node_ids {
        match nodes.get(id) {
            Some(pt) => positions.push(*pt),
            None => {
                warn!("Skipping way with missing node {}", id);
                return None;
            }
        }
    }
    if positions.len() < 2 {
        warn!("Skipping way with only {} points", positions.len());
        return None;
    }
    Some(positions)
}
