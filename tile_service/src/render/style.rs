use road_model::LaneType;

use super::canvas::{Color, Pen};

/// Lane boundaries only appear when zoomed in this far.
pub const LANE_LINE_MIN_ZOOM: u8 = 18;
pub const KERB_MIN_ZOOM: u8 = 19;

pub const SIDEWALK: Color = Color::rgb(128, 128, 128);
pub const VERGE: Color = Color::rgb(112, 160, 80);
pub const PARKING: Color = Color::rgb(64, 64, 192);
pub const SHOULDER: Color = Color::rgb(192, 192, 192);
pub const CYCLE_LANE: Color = Color::rgb(64, 192, 64);
pub const CAR_LANE: Color = Color::rgb(0, 0, 0);

pub const KERB: Pen = Pen::solid(Color::rgb(192, 192, 192), 1.0);
pub const LANE_LINE: Pen = Pen::dashed(Color::rgb(255, 255, 255), 1.0, 10.0, 5.0);
pub const LANE_LINE_SAME_DIRECTION: Pen = Pen::dashed(Color::rgb(255, 255, 255), 1.0, 5.0, 10.0);

// Relative to the track gauge
pub const SLEEPER_WIDTH: f64 = 1.8;
pub const BALLAST_WIDTH: f64 = 2.8;

pub const RAIL: Pen = Pen::solid(Color::rgb(192, 192, 192), 1.0);
pub const DISUSED_RAIL: Pen = Pen::solid(Color::rgb(64, 64, 64), 1.0);
pub const SLEEPERS: Color = Color::rgb(133, 133, 130);
pub const BALLAST: Color = Color::rgb(102, 66, 33);

/// Half transparent, so the map underneath stays readable
pub fn completeness_color(fraction: f32) -> Color {
    let green = (fraction.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::rgba(255 - green, green, 0, 128)
}

/// The fill for a lane, if it has one. Edges are never filled.
pub fn lane_color(lt: LaneType) -> Option<Color> {
    match lt {
        LaneType::Edge => None,
        LaneType::Sidewalk => Some(SIDEWALK),
        LaneType::Verge => Some(VERGE),
        LaneType::Parking => Some(PARKING),
        LaneType::Shoulder => Some(SHOULDER),
        LaneType::Cycle => Some(CYCLE_LANE),
        LaneType::Car => Some(CAR_LANE),
    }
}

/// What to draw on the boundary between two adjacent lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Nothing,
    /// The carriageway meets something off of it
    Kerb,
    /// Between two parts of the carriageway
    LaneLine,
}

pub fn transition(left: LaneType, right: LaneType) -> Transition {
    use LaneType::*;

    match (left, right) {
        (Parking | Shoulder | Cycle | Car, Parking | Shoulder | Cycle | Car) => {
            Transition::LaneLine
        }
        (Edge | Sidewalk | Verge, Parking | Shoulder | Cycle | Car)
        | (Parking | Shoulder | Cycle | Car, Edge | Sidewalk | Verge) => Transition::Kerb,
        (Edge | Sidewalk | Verge, Edge | Sidewalk | Verge) => Transition::Nothing,
    }
}
