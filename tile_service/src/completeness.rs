use serde::{Deserialize, Serialize};

use geom::TileProjection;
use road_model::Element;

use crate::{CacheConfig, Payload, Query, ServiceConfig};

/// How much of an area has been mapped, judged by how many kinds of features appear in it at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    /// How many feature counts came back
    pub counted: usize,
    /// How many of those found anything
    pub present: usize,
}

impl Completeness {
    pub fn from_counts(elements: &[Element]) -> Completeness {
        let mut result = Completeness::default();
        for element in elements {
            if let Element::Count { tags } = element {
                result.counted += 1;
                if tags.get("total").map(|x| x.trim() != "0").unwrap_or(false) {
                    result.present += 1;
                }
            }
        }
        result
    }

    /// Between 0 and 1. `None` without any counts, like when the fetch failed.
    pub fn fraction(&self) -> Option<f32> {
        if self.counted == 0 {
            None
        } else {
            Some(self.present as f32 / self.counted as f32)
        }
    }
}

impl Payload for Completeness {
    const QUERY: Query = Query::Counts;

    fn cache_config(config: &ServiceConfig) -> &CacheConfig {
        &config.completeness
    }

    fn from_elements(_: &TileProjection, elements: &[Element]) -> Completeness {
        let result = Completeness::from_counts(elements);
        if result.counted == 0 {
            warn!("No feature counts among {} elements", elements.len());
        }
        result
    }
}
