use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Which zooms one overlay serves, and how much of it to keep in memory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Data is fetched and cached for tiles at this zoom, then shared by all of their
    /// descendants.
    pub load_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// How many load-zoom tiles to keep
    pub capacity: usize,
}

impl CacheConfig {
    pub fn lanes() -> CacheConfig {
        CacheConfig {
            load_zoom: 14,
            min_zoom: 16,
            max_zoom: 22,
            capacity: 16,
        }
    }

    pub fn completeness() -> CacheConfig {
        CacheConfig {
            load_zoom: 10,
            min_zoom: 10,
            max_zoom: 10,
            capacity: 160,
        }
    }

    pub fn serves(&self, zoom: u8) -> bool {
        self.min_zoom <= zoom && zoom <= self.max_zoom
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.load_zoom <= self.min_zoom && self.min_zoom <= self.max_zoom) {
            bail!(
                "{} zooms must satisfy load_zoom <= min_zoom <= max_zoom, not {} / {} / {}",
                name,
                self.load_zoom,
                self.min_zoom,
                self.max_zoom
            );
        }
        if self.capacity == 0 {
            bail!("{} cache capacity must be at least 1", name);
        }
        Ok(())
    }
}

/// How tiles are loaded, cached, and drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub lanes: CacheConfig,
    pub completeness: CacheConfig,
    /// In seconds
    pub fetch_timeout: u64,
    /// Fetch a little beyond each tile, so ways crossing the edges are drawn on both sides.
    pub query_oversize_meters: f64,
    pub rails: bool,
    pub roads: bool,
}

impl Default for ServiceConfig {
    fn default() -> ServiceConfig {
        ServiceConfig {
            lanes: CacheConfig::lanes(),
            completeness: CacheConfig::completeness(),
            fetch_timeout: 60,
            query_oversize_meters: 20.0,
            rails: true,
            roads: true,
        }
    }
}

impl ServiceConfig {
    /// Missing fields keep their defaults. A cache section has to be given whole.
    pub fn load(path: &str) -> Result<ServiceConfig> {
        let raw = fs_err::read_to_string(path)?;
        let config: ServiceConfig =
            serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    fn validate(&self) -> Result<()> {
        self.lanes.validate("lanes")?;
        self.completeness.validate("completeness")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config() {
        let config: ServiceConfig = serde_json::from_str(
            r#"{"rails": false, "completeness": {"load_zoom": 9, "min_zoom": 9, "max_zoom": 11, "capacity": 4}}"#,
        )
        .unwrap();
        assert!(!config.rails);
        assert_eq!(config.lanes, CacheConfig::lanes());
        assert_eq!(config.completeness.capacity, 4);
        assert!(config.completeness.serves(11));
        assert!(!config.completeness.serves(12));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults() {
        let config = ServiceConfig::default();
        assert!(config.lanes.serves(16));
        assert!(!config.lanes.serves(15));
        assert!(config.completeness.serves(10));
        assert!(!config.completeness.serves(11));
    }

    #[test]
    fn bad_zooms() {
        let config = ServiceConfig {
            lanes: CacheConfig {
                load_zoom: 17,
                ..CacheConfig::lanes()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = ServiceConfig {
            completeness: CacheConfig {
                capacity: 0,
                ..CacheConfig::completeness()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
