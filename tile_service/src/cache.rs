use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use lru::LruCache;

use geom::{TileId, TileProjection};
use road_model::{Element, TileData};

use crate::{CacheConfig, DataSource, Query, ServiceConfig, Tile};

/// What one load tile's worth of upstream data becomes. `Default` is what a tile gets when its
/// data couldn't be fetched.
pub trait Payload: Default + Send + Sync + 'static {
    const QUERY: Query;

    fn cache_config(config: &ServiceConfig) -> &CacheConfig;

    fn from_elements(projection: &TileProjection, elements: &[Element]) -> Self;
}

impl Payload for TileData {
    const QUERY: Query = Query::Ways;

    fn cache_config(config: &ServiceConfig) -> &CacheConfig {
        &config.lanes
    }

    fn from_elements(projection: &TileProjection, elements: &[Element]) -> TileData {
        TileData::load(projection, elements)
    }
}

/// A load in progress or already finished. Every clone resolves to the same data.
type SharedLoad<T> = Shared<BoxFuture<'static, Arc<T>>>;

/// Loads data once per load-zoom tile and shares it with every tile beneath it. Concurrent
/// requests for the same load tile wait on the same fetch. Only the most recently used
/// `capacity` load tiles are kept.
pub struct TileCache<T: Payload = TileData> {
    config: ServiceConfig,
    source: Arc<dyn DataSource>,
    loads: Mutex<LruCache<TileId, SharedLoad<T>>>,
}

impl<T: Payload> TileCache<T> {
    pub fn new(config: ServiceConfig, source: Arc<dyn DataSource>) -> TileCache<T> {
        let levels = T::cache_config(&config);
        assert!(
            levels.load_zoom <= levels.min_zoom && levels.min_zoom <= levels.max_zoom,
            "Bad zoom range: load {}, min {}, max {}",
            levels.load_zoom,
            levels.min_zoom,
            levels.max_zoom
        );
        assert!(levels.capacity >= 1, "The cache needs room for 1 tile");
        let capacity = levels.capacity;
        TileCache {
            loads: Mutex::new(LruCache::new(capacity)),
            config,
            source,
        }
    }

    /// Panics if the zoom isn't servable. Never fails otherwise; a tile whose data couldn't be
    /// fetched just gets the default payload.
    pub async fn get(&self, id: TileId) -> Tile<T> {
        let levels = T::cache_config(&self.config);
        assert!(
            levels.serves(id.zoom),
            "Can't serve {}; zoom must be in [{}, {}]",
            id,
            levels.min_zoom,
            levels.max_zoom
        );
        let load = self.start_load(id.ancestor(levels.load_zoom));
        Tile::new(id, load.await)
    }

    /// The load tiles currently cached, most recently used first.
    pub fn cached(&self) -> Vec<TileId> {
        self.loads.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }

    fn start_load(&self, id: TileId) -> SharedLoad<T> {
        let mut loads = self.loads.lock().unwrap();
        if let Some(load) = loads.get(&id) {
            return load.clone();
        }

        // Spawned, so the load finishes and fills the cache even if every caller gives up
        let handle = tokio::spawn(fetch_tile::<T>(
            id,
            self.source.clone(),
            self.config.fetch_timeout(),
            self.config.query_oversize_meters,
        ));
        let load = async move {
            match handle.await {
                Ok(data) => data,
                Err(err) => {
                    error!("Loading {} crashed: {}", id, err);
                    Arc::new(T::default())
                }
            }
        }
        .boxed()
        .shared();
        loads.put(id, load.clone());
        info!(
            "Caching {:?} for {} ({} / {})",
            T::QUERY,
            id,
            loads.len(),
            T::cache_config(&self.config).capacity
        );
        load
    }
}

async fn fetch_tile<T: Payload>(
    id: TileId,
    source: Arc<dyn DataSource>,
    timeout: Duration,
    oversize_meters: f64,
) -> Arc<T> {
    let projection = id.projection();
    let bounds = projection.query_bounds(oversize_meters);
    let data = match tokio::time::timeout(timeout, source.fetch(T::QUERY, bounds)).await {
        Ok(Ok(elements)) => T::from_elements(&projection, &elements),
        Ok(Err(err)) => {
            warn!("Fetching {:?} for {} failed: {:#}", T::QUERY, id, err);
            T::default()
        }
        Err(_) => {
            warn!(
                "Fetching {:?} for {} timed out after {:?}",
                T::QUERY,
                id,
                timeout
            );
            T::default()
        }
    };
    Arc::new(data)
}
