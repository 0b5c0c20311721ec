use overlay_util::Tags;

use crate::lane::{Direction, Lane, Road, CAR_LANE_WIDTH};
use crate::osm;

/// Which way traffic may move along the whole way, relative to its point order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Oneway {
    No,
    Forward,
    Backward,
}

impl Oneway {
    pub fn from_tags(tags: &Tags) -> Oneway {
        match tags.get(osm::ONEWAY).map(|x| x.as_str()) {
            Some("yes" | "true" | "1") => Oneway::Forward,
            Some("-1" | "reverse") => Oneway::Backward,
            Some(_) => Oneway::No,
            None => {
                if tags.is(osm::HIGHWAY, "motorway") || tags.is(osm::JUNCTION, "roundabout") {
                    Oneway::Forward
                } else {
                    Oneway::No
                }
            }
        }
    }
}

/// The main value of a key like `sidewalk` or `verge`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Absent,
    /// Interpretation depends on the key
    Yes,
    Left,
    Right,
    Both,
}

impl Side {
    fn parse(value: Option<&str>) -> Side {
        match value {
            Some("yes") => Side::Yes,
            Some("left") => Side::Left,
            Some("right") => Side::Right,
            Some("both") => Side::Both,
            _ => Side::Absent,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cycleway {
    Lane,
    OppositeLane,
}

impl Cycleway {
    fn parse(value: Option<&String>) -> Option<Cycleway> {
        match value.map(|x| x.as_str()) {
            Some("lane") => Some(Cycleway::Lane),
            Some("opposite_lane") => Some(Cycleway::OppositeLane),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParkingLane {
    Parallel,
    Diagonal,
    Perpendicular,
}

impl ParkingLane {
    fn parse(value: Option<&String>) -> Option<ParkingLane> {
        match value.map(|x| x.as_str()) {
            Some("parallel") => Some(ParkingLane::Parallel),
            Some("diagonal") => Some(ParkingLane::Diagonal),
            Some("perpendicular") => Some(ParkingLane::Perpendicular),
            _ => None,
        }
    }

    fn width(self) -> f32 {
        match self {
            ParkingLane::Parallel => CAR_LANE_WIDTH,
            ParkingLane::Diagonal => CAR_LANE_WIDTH * 1.5,
            ParkingLane::Perpendicular => CAR_LANE_WIDTH * 2.0,
        }
    }
}

/// How many car lanes go each way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrivingLanes {
    pub forward: usize,
    pub both_ways: usize,
    pub backward: usize,
}

impl DrivingLanes {
    pub fn total(&self) -> usize {
        self.forward + self.both_ways + self.backward
    }

    pub fn from_tags(tags: &Tags, oneway: Oneway) -> DrivingLanes {
        let lanes = count(tags, osm::LANES);
        let fwd = count(tags, osm::LANES_FORWARD);
        let back = count(tags, osm::LANES_BACKWARD);
        let both = count(tags, osm::LANES_BOTH_WAYS);
        let given = fwd
            .unwrap_or(0)
            .saturating_add(back.unwrap_or(0))
            .saturating_add(both.unwrap_or(0));

        let total = if let Some(n) = lanes {
            n
        } else if fwd.is_some() || back.is_some() || both.is_some() {
            given
        } else if oneway != Oneway::No
            || tags.is_any(osm::HIGHWAY, &["service", "unclassified"])
        {
            1
        } else {
            2
        };
        let remaining = total.saturating_sub(given);

        let result = match oneway {
            // Whatever isn't given goes to the first missing count, travel direction first
            Oneway::Forward | Oneway::Backward => {
                let (mut with, mut against) = if oneway == Oneway::Forward {
                    (fwd, back)
                } else {
                    (back, fwd)
                };
                let mut both_ways = both;
                if with.is_none() {
                    with = Some(remaining);
                } else if both_ways.is_none() {
                    both_ways = Some(remaining);
                } else if against.is_none() {
                    against = Some(remaining);
                }
                let (with, both_ways, against) = (
                    with.unwrap_or(0),
                    both_ways.unwrap_or(0),
                    against.unwrap_or(0),
                );
                if oneway == Oneway::Forward {
                    DrivingLanes {
                        forward: with,
                        both_ways,
                        backward: against,
                    }
                } else {
                    DrivingLanes {
                        forward: against,
                        both_ways,
                        backward: with,
                    }
                }
            }
            Oneway::No => {
                let both_ways = match (both, fwd, back) {
                    (Some(n), _, _) => n,
                    (None, Some(_), Some(_)) => remaining,
                    (None, None, None) => total % 2,
                    _ => 0,
                };
                let rest = total.saturating_sub(both_ways);
                let (forward, backward) = match (fwd, back) {
                    (Some(f), Some(b)) => (f, b),
                    (Some(f), None) => (f, rest.saturating_sub(f)),
                    (None, Some(b)) => (rest.saturating_sub(b), b),
                    (None, None) => (rest - rest / 2, rest / 2),
                };
                DrivingLanes {
                    forward,
                    both_ways,
                    backward,
                }
            }
        };

        if result.total() != total {
            warn!(
                "Driving lanes {:?} don't add up to {} in {:?}",
                result, total, tags
            );
        }
        if (oneway == Oneway::Forward && result.backward > 0)
            || (oneway == Oneway::Backward && result.forward > 0)
        {
            warn!("{:?} way has lanes going the other way: {:?}", oneway, tags);
        }
        result
    }
}

/// No real road has more lanes than this in one count.
const MAX_LANES: usize = 32;

fn count(tags: &Tags, key: &str) -> Option<usize> {
    let value = tags.get(key)?;
    match value.trim().parse::<usize>() {
        Ok(n) if n <= MAX_LANES => Some(n),
        Ok(_) => {
            warn!("Ignoring implausible {}={}", key, value);
            None
        }
        Err(_) => {
            warn!("Ignoring unparseable {}={}", key, value);
            None
        }
    }
}

/// Per-side presence after applying `key:left`, `key:right` and `key:both` overrides to the main
/// value.
fn resolve_sides(tags: &Tags, key: &str, (mut left, mut right): (bool, bool)) -> (bool, bool) {
    let both = format!("{}:both", key);
    if let Some(v) = tags.get_first(&[format!("{}:left", key).as_str(), both.as_str()]) {
        left = v == "yes";
    }
    if let Some(v) = tags.get_first(&[format!("{}:right", key).as_str(), both.as_str()]) {
        right = v == "yes";
    }
    (left, right)
}

/// Lanes accumulate outwards from the car lanes on both sides.
struct CrossSection {
    /// Innermost first
    left: Vec<Lane>,
    cars: Vec<Lane>,
    /// Innermost first
    right: Vec<Lane>,
}

impl CrossSection {
    /// Lanes are given in left-to-right order.
    fn add_left(&mut self, lanes: Vec<Lane>) {
        self.left.extend(lanes.into_iter().rev());
    }

    fn add_right(&mut self, lanes: Vec<Lane>) {
        self.right.extend(lanes);
    }

    /// The direction of traffic next to each side of the car block. Two-way lanes count as
    /// forward on the left and backward on the right.
    fn adjacent_traffic(&self) -> (Direction, Direction) {
        let left = match self.cars.first().map(|l| l.dir) {
            Some(Direction::Both) => Direction::Forward,
            Some(dir) => dir,
            None => Direction::None,
        };
        let right = match self.cars.last().map(|l| l.dir) {
            Some(Direction::Both) => Direction::Backward,
            Some(dir) => dir,
            None => Direction::None,
        };
        (left, right)
    }

    fn build(self) -> Road {
        let left_width: f32 = self.left.iter().map(|l| l.width).sum();
        let car_width: f32 = self.cars.iter().map(|l| l.width).sum();

        let mut lanes = vec![Lane::edge()];
        lanes.extend(self.left.into_iter().rev());
        lanes.extend(self.cars);
        lanes.extend(self.right);
        lanes.push(Lane::edge());
        Road {
            lanes,
            center: left_width + car_width / 2.0,
        }
    }
}

/// Lays out the cross-section of a way from its tags, for left-hand traffic.
pub fn get_road(tags: &Tags) -> Road {
    if !tags.contains_key(osm::HIGHWAY) {
        return Road::empty();
    }
    let oneway = Oneway::from_tags(tags);
    let driving = DrivingLanes::from_tags(tags, oneway);
    if driving.total() == 0 {
        return Road::empty();
    }

    let mut cars = Vec::new();
    cars.extend(std::iter::repeat(Lane::car(Direction::Forward)).take(driving.forward));
    cars.extend(std::iter::repeat(Lane::car(Direction::Both)).take(driving.both_ways));
    cars.extend(std::iter::repeat(Lane::car(Direction::Backward)).take(driving.backward));
    let mut xs = CrossSection {
        left: Vec::new(),
        cars,
        right: Vec::new(),
    };
    let (left_traffic, right_traffic) = xs.adjacent_traffic();

    // Cycle lanes
    let cycle_left = Cycleway::parse(tags.get_first(&[
        "cycleway:left",
        "cycleway:both",
        osm::CYCLEWAY,
    ]));
    let mut cycle_right = tags.get_first(&["cycleway:right", "cycleway:both"]);
    if cycle_right.is_none() && oneway == Oneway::No {
        cycle_right = tags.get(osm::CYCLEWAY);
    }
    let cycle_right = Cycleway::parse(cycle_right);
    xs.add_left(cycle_lanes(tags, "left", cycle_left, left_traffic));
    xs.add_right(cycle_lanes(tags, "right", cycle_right, right_traffic));

    // Shoulders
    let shoulder = match tags.get(osm::SHOULDER) {
        Some(v) => Side::parse(Some(v.as_str())),
        None if tags.is(osm::HIGHWAY, "motorway") => Side::Yes,
        None => Side::Absent,
    };
    let (left, right) = resolve_sides(
        tags,
        osm::SHOULDER,
        match shoulder {
            Side::Yes => (
                left_traffic == Direction::Forward,
                right_traffic == Direction::Backward,
            ),
            other => literal_sides(other),
        },
    );
    if left {
        xs.add_left(vec![Lane::shoulder(left_traffic)]);
    }
    if right {
        xs.add_right(vec![Lane::shoulder(right_traffic)]);
    }

    // Parking
    let parking = |side: &str| {
        ParkingLane::parse(tags.get_first(&[
            format!("{}:{}", osm::PARKING_LANE, side).as_str(),
            format!("{}:both", osm::PARKING_LANE).as_str(),
            osm::PARKING_LANE,
        ]))
    };
    if let Some(p) = parking("left") {
        xs.add_left(vec![Lane::parking(p.width())]);
    }
    if let Some(p) = parking("right") {
        xs.add_right(vec![Lane::parking(p.width())]);
    }

    // Verges, then sidewalks outside of them
    for (key, lane) in [(osm::VERGE, Lane::verge()), (osm::SIDEWALK, Lane::sidewalk())] {
        let main = match Side::parse(tags.get(key).map(|x| x.as_str())) {
            Side::Yes => (true, true),
            other => literal_sides(other),
        };
        let (left, right) = resolve_sides(tags, key, main);
        if left {
            xs.add_left(vec![lane]);
        }
        if right {
            xs.add_right(vec![lane]);
        }
    }

    xs.build()
}

fn literal_sides(side: Side) -> (bool, bool) {
    match side {
        Side::Both => (true, true),
        Side::Left => (true, false),
        Side::Right => (false, true),
        Side::Yes | Side::Absent => (false, false),
    }
}

/// Left-to-right cycle lanes for one side of the road.
fn cycle_lanes(
    tags: &Tags,
    side: &str,
    cycleway: Option<Cycleway>,
    traffic: Direction,
) -> Vec<Lane> {
    let cycleway = match cycleway {
        Some(c) => c,
        None => return Vec::new(),
    };
    if tags.is(&format!("{}:{}:oneway", osm::CYCLEWAY, side), "no") {
        return vec![
            Lane::cycle(Direction::Forward),
            Lane::cycle(Direction::Backward),
        ];
    }
    vec![Lane::cycle(match cycleway {
        Cycleway::Lane => traffic,
        Cycleway::OppositeLane => traffic.opposite(),
    })]
}
