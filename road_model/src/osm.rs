// These are common OSM keys. Keys used in just one or two places don't really need to be defined
// here.

pub const HIGHWAY: &str = "highway";
pub const RAILWAY: &str = "railway";
pub const ONEWAY: &str = "oneway";
pub const JUNCTION: &str = "junction";
pub const LAYER: &str = "layer";
pub const AREA: &str = "area";
pub const GAUGE: &str = "gauge";

pub const LANES: &str = "lanes";
pub const LANES_FORWARD: &str = "lanes:forward";
pub const LANES_BACKWARD: &str = "lanes:backward";
pub const LANES_BOTH_WAYS: &str = "lanes:both_ways";

pub const CYCLEWAY: &str = "cycleway";
pub const SHOULDER: &str = "shoulder";
pub const PARKING_LANE: &str = "parking:lane";
pub const VERGE: &str = "verge";
pub const SIDEWALK: &str = "sidewalk";

/// The highway classes drawn as roads.
pub const ROAD_HIGHWAYS: [&str; 13] = [
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "residential",
    "service",
    "motorway_link",
    "trunk_link",
    "primary_link",
    "secondary_link",
    "tertiary_link",
];

/// The railway values drawn as track.
pub const RAILWAYS: [&str; 11] = [
    "abandoned",
    "construction",
    "disused",
    "funicular",
    "light_rail",
    "monorail",
    "narrow_gauge",
    "preserved",
    "rail",
    "subway",
    "tram",
];

/// Standard gauge, in millimeters
pub const DEFAULT_GAUGE_MM: f64 = 1435.0;
