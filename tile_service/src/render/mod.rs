//! Draws a tile's rails and roads onto a `Canvas`, one layer at a time from the bottom up. Within
//! a layer, rail beds go underneath roads, and the rails themselves go on top.

mod canvas;
pub mod style;

pub use self::canvas::{Canvas, Color, Instruction, Pen, RecordingCanvas};

use geom::{Pt2D, TILE_SIZE_PX};
use road_model::offset::{lane_quad, offset_polyline};
use road_model::{osm, LaneType, Way};

use self::style::Transition;
use crate::{Completeness, ServiceConfig, Tile};

pub struct Renderer<'a> {
    tile: &'a Tile,
    rails: bool,
    roads: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(tile: &'a Tile, config: &ServiceConfig) -> Renderer<'a> {
        Renderer {
            tile,
            rails: config.rails,
            roads: config.roads,
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        for layer in &self.tile.data.layers {
            let layer = *layer;
            if self.rails {
                self.rail_beds(layer, canvas);
            }
            if self.roads {
                self.lane_fills(layer, canvas, |lt| lt == LaneType::Sidewalk);
                self.lane_fills(layer, canvas, |lt| lt != LaneType::Sidewalk);
                if self.tile.zoom() >= style::LANE_LINE_MIN_ZOOM {
                    self.lane_boundaries(layer, canvas);
                }
            }
            if self.rails {
                self.rail_lines(layer, canvas);
            }
        }
    }

    fn rail_beds(&self, layer: i32, canvas: &mut dyn Canvas) {
        for way in self.tile.rails_in_layer(layer) {
            self.fill_band(way, gauge_meters(way) * style::BALLAST_WIDTH, style::BALLAST, canvas);
        }
        for way in self.tile.rails_in_layer(layer) {
            if way.tags.is(osm::RAILWAY, "abandoned") {
                continue;
            }
            self.fill_band(way, gauge_meters(way) * style::SLEEPER_WIDTH, style::SLEEPERS, canvas);
        }
    }

    fn fill_band(&self, way: &Way, width: f64, color: Color, canvas: &mut dyn Canvas) {
        for segment in &way.segments {
            let quad = lane_quad(&self.tile.projection, segment, -width / 2.0, width / 2.0);
            canvas.fill_polygon(color, &quad);
        }
    }

    fn rail_lines(&self, layer: i32, canvas: &mut dyn Canvas) {
        for way in self.tile.rails_in_layer(layer) {
            if way
                .tags
                .is_any(osm::RAILWAY, &["abandoned", "construction"])
            {
                continue;
            }
            let pen = if way.tags.is(osm::RAILWAY, "disused") {
                &style::DISUSED_RAIL
            } else {
                &style::RAIL
            };
            let half_gauge = gauge_meters(way) / 2.0;
            for side in [-half_gauge, half_gauge] {
                canvas.stroke_polyline(pen, &offset_polyline(&self.tile.projection, way, side));
            }
        }
    }

    /// Fills every lane matching `which`, segment by segment.
    fn lane_fills<F: Fn(LaneType) -> bool>(&self, layer: i32, canvas: &mut dyn Canvas, which: F) {
        for way in self.tile.roads_in_layer(layer) {
            if way.road.is_empty() {
                continue;
            }
            for segment in &way.segments {
                for (lane, left, right) in way.road.lane_offsets() {
                    if !which(lane.lane_type) {
                        continue;
                    }
                    if let Some(color) = style::lane_color(lane.lane_type) {
                        let quad = lane_quad(
                            &self.tile.projection,
                            segment,
                            f64::from(left),
                            f64::from(right),
                        );
                        canvas.fill_polygon(color, &quad);
                    }
                }
            }
        }
    }

    fn lane_boundaries(&self, layer: i32, canvas: &mut dyn Canvas) {
        let zoom = self.tile.zoom();
        for way in self.tile.roads_in_layer(layer) {
            let offsets = way.road.lane_offsets();
            for pair in offsets.windows(2) {
                let (prev, _, _) = pair[0];
                let (lane, left, _) = pair[1];
                let pen = match style::transition(prev.lane_type, lane.lane_type) {
                    Transition::Kerb if zoom >= style::KERB_MIN_ZOOM => &style::KERB,
                    Transition::LaneLine if prev.dir == lane.dir => {
                        &style::LANE_LINE_SAME_DIRECTION
                    }
                    Transition::LaneLine => &style::LANE_LINE,
                    Transition::Kerb | Transition::Nothing => continue,
                };
                let pts: Vec<Pt2D> = offset_polyline(&self.tile.projection, way, f64::from(left));
                canvas.stroke_polyline(pen, &pts);
            }
        }
    }
}

/// Washes the whole tile from red (nothing mapped) to green (everything mapped). Draws nothing if
/// the tile's data is missing.
pub fn render_completeness(tile: &Tile<Completeness>, canvas: &mut dyn Canvas) {
    if let Some(fraction) = tile.data.fraction() {
        let corners = [
            Pt2D::new(0.0, 0.0),
            Pt2D::new(TILE_SIZE_PX, 0.0),
            Pt2D::new(TILE_SIZE_PX, TILE_SIZE_PX),
            Pt2D::new(0.0, TILE_SIZE_PX),
        ];
        canvas.fill_polygon(style::completeness_color(fraction), &corners);
    }
}

/// The distance between the rails, in meters
fn gauge_meters(way: &Way) -> f64 {
    let mm = way
        .tags
        .get(osm::GAUGE)
        .and_then(|x| x.trim().parse::<f64>().ok())
        .unwrap_or(osm::DEFAULT_GAUGE_MM);
    mm / 1000.0
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use geom::TileId;
    use road_model::{Element, TileData};

    // A straight east-west way across the middle of the tile.
    fn tile(zoom: u8, tags: Vec<(&str, &str)>) -> Tile {
        let id = TileId::new(zoom, 1 << (zoom - 1), (87_000 << 2) >> (20 - zoom));
        let proj = id.projection();
        let lat = (proj.nw().latitude + proj.se().latitude) / 2.0;
        let elements = vec![
            Element::Node {
                id: 1,
                lon: proj.nw().longitude,
                lat,
            },
            Element::Node {
                id: 2,
                lon: proj.se().longitude,
                lat,
            },
            Element::Way {
                id: 10,
                nodes: vec![1, 2],
                tags: tags.into_iter().collect(),
            },
        ];
        Tile::new(id, Arc::new(TileData::load(&proj, &elements)))
    }

    fn draw(tile: &Tile, config: &ServiceConfig) -> Vec<Instruction> {
        let mut canvas = RecordingCanvas::new();
        Renderer::new(tile, config).render(&mut canvas);
        canvas.instructions
    }

    fn fills(instructions: &[Instruction]) -> Vec<Color> {
        instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::FillPolygon { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    fn strokes(instructions: &[Instruction]) -> Vec<Pen> {
        instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::StrokePolyline { pen, .. } => Some(*pen),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn sidewalks_go_underneath() {
        let t = tile(
            18,
            vec![
                ("highway", "residential"),
                ("sidewalk", "both"),
                ("cycleway", "lane"),
            ],
        );
        let out = draw(&t, &ServiceConfig::default());
        assert_eq!(
            fills(&out),
            vec![
                style::SIDEWALK,
                style::SIDEWALK,
                style::CYCLE_LANE,
                style::CAR_LANE,
                style::CAR_LANE,
                style::CYCLE_LANE,
            ]
        );
        // Zoom 18 has lane lines between the four carriageway lanes, but no kerbs yet.
        assert_eq!(
            strokes(&out),
            vec![style::LANE_LINE_SAME_DIRECTION, style::LANE_LINE, style::LANE_LINE_SAME_DIRECTION]
        );
    }

    #[test]
    fn kerbs_when_zoomed_in() {
        let t = tile(19, vec![("highway", "residential"), ("sidewalk", "both")]);
        assert_eq!(
            strokes(&draw(&t, &ServiceConfig::default())),
            vec![style::KERB, style::LANE_LINE, style::KERB]
        );

        let t = tile(17, vec![("highway", "residential"), ("sidewalk", "both")]);
        assert!(strokes(&draw(&t, &ServiceConfig::default())).is_empty());
    }

    #[test]
    fn lane_geometry() {
        let t = tile(18, vec![("highway", "residential"), ("oneway", "yes")]);
        let scale = t.projection.image_scale();
        let out = draw(&t, &ServiceConfig::default());
        match &out[0] {
            Instruction::FillPolygon { color, points } => {
                assert_eq!(*color, style::CAR_LANE);
                // One 3m lane centered on the way, which runs along y = 128
                assert!((points[0].y() - (128.0 - 1.5 * scale)).abs() < 1e-3);
                assert!((points[1].y() - (128.0 + 1.5 * scale)).abs() < 1e-3);
                assert!(points[0].x().abs() < 1e-6);
                assert!((points[2].x() - 256.0).abs() < 1e-6);
            }
            x => panic!("Unexpected {:?}", x),
        }
    }

    #[test]
    fn rails() {
        let t = tile(18, vec![("railway", "rail")]);
        let out = draw(&t, &ServiceConfig::default());
        assert_eq!(fills(&out), vec![style::BALLAST, style::SLEEPERS]);
        assert_eq!(strokes(&out), vec![style::RAIL, style::RAIL]);

        let t = tile(18, vec![("railway", "disused"), ("gauge", "1000")]);
        let out = draw(&t, &ServiceConfig::default());
        assert_eq!(strokes(&out), vec![style::DISUSED_RAIL, style::DISUSED_RAIL]);

        let t = tile(18, vec![("railway", "abandoned")]);
        let out = draw(&t, &ServiceConfig::default());
        assert_eq!(fills(&out), vec![style::BALLAST]);
        assert!(strokes(&out).is_empty());

        let t = tile(18, vec![("railway", "construction")]);
        let out = draw(&t, &ServiceConfig::default());
        assert_eq!(fills(&out), vec![style::BALLAST, style::SLEEPERS]);
        assert!(strokes(&out).is_empty());

        let no_rails = ServiceConfig {
            rails: false,
            ..Default::default()
        };
        let t = tile(18, vec![("railway", "rail")]);
        assert!(draw(&t, &no_rails).is_empty());
    }

    #[test]
    fn gauges() {
        let t = tile(18, vec![("railway", "rail"), ("gauge", "1000")]);
        assert_eq!(gauge_meters(&t.data.rails[0]), 1.0);
        let t = tile(18, vec![("railway", "rail"), ("gauge", "1435;1000")]);
        assert_eq!(gauge_meters(&t.data.rails[0]), 1.435);
    }

    #[test]
    fn layers_draw_bottom_up() {
        let id = TileId::new(18, 131_072, 87_000);
        let proj = id.projection();
        let lat = (proj.nw().latitude + proj.se().latitude) / 2.0;
        let elements = vec![
            Element::Node {
                id: 1,
                lon: proj.nw().longitude,
                lat,
            },
            Element::Node {
                id: 2,
                lon: proj.se().longitude,
                lat,
            },
            Element::Way {
                id: 10,
                nodes: vec![1, 2],
                tags: vec![("highway", "primary"), ("oneway", "yes"), ("layer", "1")]
                    .into_iter()
                    .collect(),
            },
            Element::Way {
                id: 11,
                nodes: vec![1, 2],
                tags: vec![("railway", "rail"), ("layer", "-1")].into_iter().collect(),
            },
        ];
        let t = Tile::new(id, Arc::new(TileData::load(&proj, &elements)));
        assert_eq!(t.data.layers, vec![-1, 1]);
        let out = draw(&t, &ServiceConfig::default());
        assert_eq!(
            fills(&out),
            vec![style::BALLAST, style::SLEEPERS, style::CAR_LANE]
        );
    }
    #[test]
    fn completeness_wash() {
        let id = TileId::new(10, 512, 340);
        let draw = |c: Completeness| {
            let mut canvas = RecordingCanvas::new();
            render_completeness(&Tile::new(id, Arc::new(c)), &mut canvas);
            canvas.instructions
        };

        let out = draw(Completeness {
            counted: 4,
            present: 3,
        });
        assert_eq!(out.len(), 1);
        match &out[0] {
            Instruction::FillPolygon { color, points } => {
                assert_eq!(*color, style::completeness_color(0.75));
                assert_eq!(points.len(), 4);
                assert_eq!(points[2], Pt2D::new(256.0, 256.0));
            }
            x => panic!("Unexpected {:?}", x),
        }
        assert!(draw(Completeness::default()).is_empty());
    }
}
