use serde::{Deserialize, Serialize};

use geom::Pt2D;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 255 is opaque
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: Color,
    /// In pixels
    pub width: f64,
    /// Lengths of the drawn and skipped parts, in pixels. Solid if `None`.
    pub dash: Option<(f64, f64)>,
}

impl Pen {
    pub const fn solid(color: Color, width: f64) -> Pen {
        Pen {
            color,
            width,
            dash: None,
        }
    }

    pub const fn dashed(color: Color, width: f64, on: f64, off: f64) -> Pen {
        Pen {
            color,
            width,
            dash: Some((on, off)),
        }
    }
}

/// A 2D drawing backend for one 256x256 pixel tile.
pub trait Canvas {
    fn fill_polygon(&mut self, color: Color, pts: &[Pt2D]);
    fn stroke_polyline(&mut self, pen: &Pen, pts: &[Pt2D]);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    FillPolygon { color: Color, points: Vec<Pt2D> },
    StrokePolyline { pen: Pen, points: Vec<Pt2D> },
}

/// Remembers what was drawn, in order, instead of drawing it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordingCanvas {
    pub instructions: Vec<Instruction>,
}

impl RecordingCanvas {
    pub fn new() -> RecordingCanvas {
        RecordingCanvas::default()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_polygon(&mut self, color: Color, pts: &[Pt2D]) {
        self.instructions.push(Instruction::FillPolygon {
            color,
            points: pts.to_vec(),
        });
    }

    fn stroke_polyline(&mut self, pen: &Pen, pts: &[Pt2D]) {
        self.instructions.push(Instruction::StrokePolyline {
            pen: *pen,
            points: pts.to_vec(),
        });
    }
}
