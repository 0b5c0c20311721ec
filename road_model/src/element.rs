use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use overlay_util::Tags;

/// A raw record from an Overpass API response (`[out:json]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        id: i64,
        nodes: Vec<i64>,
        #[serde(default)]
        tags: Tags,
    },
    /// The answer to an `out count;` statement. `tags` holds the `nodes`, `ways`, `relations`,
    /// and `total` counts, as strings.
    Count {
        #[serde(default)]
        tags: Tags,
    },
    /// Relations, areas, and anything else we don't draw
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct Response {
    elements: Vec<Element>,
}

/// Parses a whole Overpass JSON response.
pub fn parse_overpass_json(raw: &str) -> Result<Vec<Element>> {
    let response: Response =
        serde_json::from_str(raw).context("parsing Overpass JSON response")?;
    Ok(response.elements)
}
