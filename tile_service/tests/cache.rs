use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use futures::future::{join_all, BoxFuture, FutureExt};

use geom::{GPSBounds, TileId};
use road_model::{Element, TileData};
use tile_service::{
    CacheConfig, Completeness, DataSource, FileSource, Query, ServiceConfig, TileCache,
};

/// Serves the same elements for any bounds, after a delay, and counts how often it's asked.
/// Ways go to `Query::Ways`, counts to `Query::Counts`.
struct CountingSource {
    fetches: Arc<AtomicUsize>,
    delay: Duration,
    fail: bool,
    elements: Vec<Element>,
}

impl CountingSource {
    fn new(elements: Vec<Element>) -> (CountingSource, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        (
            CountingSource {
                fetches: fetches.clone(),
                delay: Duration::from_millis(50),
                fail: false,
                elements,
            },
            fetches,
        )
    }
}

impl DataSource for CountingSource {
    fn fetch(&self, query: Query, _: GPSBounds) -> BoxFuture<'static, Result<Vec<Element>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay;
        let result = if self.fail {
            Err(anyhow!("upstream is down"))
        } else {
            Ok(self
                .elements
                .iter()
                .filter(|e| matches!(e, Element::Count { .. }) == (query == Query::Counts))
                .cloned()
                .collect())
        };
        async move {
            tokio::time::sleep(delay).await;
            result
        }
        .boxed()
    }
}

/// One primary road, somewhere inside load tile 14/8192/5450.
fn one_road() -> Vec<Element> {
    let proj = TileId::new(14, 8192, 5450).projection();
    let lon = |f: f64| proj.nw().longitude + f * (proj.se().longitude - proj.nw().longitude);
    let lat = |f: f64| proj.nw().latitude + f * (proj.se().latitude - proj.nw().latitude);
    vec![
        Element::Node {
            id: 1,
            lat: lat(0.2),
            lon: lon(0.2),
        },
        Element::Node {
            id: 2,
            lat: lat(0.2),
            lon: lon(0.8),
        },
        Element::Way {
            id: 10,
            nodes: vec![1, 2],
            tags: vec![("highway", "primary")].into_iter().collect(),
        },
    ]
}

fn config(capacity: usize) -> ServiceConfig {
    overlay_util::logger::setup_for_tests();
    ServiceConfig {
        lanes: CacheConfig {
            capacity,
            ..CacheConfig::lanes()
        },
        fetch_timeout: 1,
        ..Default::default()
    }
}

fn cache(source: CountingSource, capacity: usize) -> TileCache {
    TileCache::new(config(capacity), Arc::new(source))
}

#[tokio::test]
async fn concurrent_requests_share_one_fetch() {
    let (source, fetches) = CountingSource::new(one_road());
    let cache = cache(source, 4);

    // All of these live under 14/8192/5450
    let ids = vec![
        TileId::new(16, 32768, 21800),
        TileId::new(16, 32771, 21803),
        TileId::new(17, 65540, 43601),
        TileId::new(22, 2_097_152, 1_395_200),
        TileId::new(16, 32768, 21800),
    ];
    let tiles = join_all(ids.iter().map(|id| cache.get(*id))).await;

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert_eq!(cache.cached(), vec![TileId::new(14, 8192, 5450)]);
    for (tile, id) in tiles.iter().zip(ids) {
        assert_eq!(tile.id(), id);
        assert!(Arc::ptr_eq(&tile.data, &tiles[0].data));
        assert_eq!(tile.data.roads.len(), 1);
    }
}

#[tokio::test]
async fn spawned_requests_share_one_fetch() {
    let (source, fetches) = CountingSource::new(one_road());
    let cache = Arc::new(cache(source, 4));

    let mut handles = Vec::new();
    for dx in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache.get(TileId::new(18, 131_072 + dx, 87_200)).await
        }));
    }
    for handle in handles {
        let tile = handle.await.unwrap();
        assert_eq!(tile.data.roads.len(), 1);
    }
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zoom_pyramid_shares_data() {
    let (source, fetches) = CountingSource::new(one_road());
    let cache = cache(source, 4);

    let coarse = cache.get(TileId::new(16, 32768, 21800)).await;
    let fine = cache.get(TileId::new(20, 524_288, 348_800)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&coarse.data, &fine.data));
    // Same geometry, different projections
    assert!(fine.projection.image_scale() > coarse.projection.image_scale());
}

#[tokio::test]
async fn least_recently_used_tiles_are_evicted() {
    let (source, fetches) = CountingSource::new(Vec::new());
    let cache = cache(source, 2);

    let a = TileId::new(16, 0, 0);
    let b = TileId::new(16, 4, 0);
    let c = TileId::new(16, 8, 0);
    cache.get(a).await;
    cache.get(b).await;
    // Touch a, so b is the oldest
    cache.get(a).await;
    cache.get(c).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 3);
    assert_eq!(
        cache.cached(),
        vec![TileId::new(14, 2, 0), TileId::new(14, 0, 0)]
    );

    // b has to be fetched again, and pushes out a
    cache.get(b).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 4);
    assert_eq!(
        cache.cached(),
        vec![TileId::new(14, 1, 0), TileId::new(14, 2, 0)]
    );
}

#[tokio::test]
async fn failures_are_cached_as_empty() {
    let (mut source, fetches) = CountingSource::new(one_road());
    source.fail = true;
    let cache = cache(source, 4);

    let tile = cache.get(TileId::new(16, 32768, 21800)).await;
    assert!(tile.data.is_empty());
    assert!(tile.data.layers.is_empty());
    let tile = cache.get(TileId::new(16, 32768, 21800)).await;
    assert!(tile.data.is_empty());
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn timeouts_are_cached_as_empty() {
    let (mut source, fetches) = CountingSource::new(one_road());
    source.delay = Duration::from_secs(5);
    let cache = cache(source, 4);

    let tile = cache.get(TileId::new(16, 32768, 21800)).await;
    assert!(tile.data.is_empty());
    cache.get(TileId::new(17, 65536, 43600)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_file_is_empty() {
    let cache: TileCache<TileData> = TileCache::new(
        ServiceConfig::default(),
        Arc::new(FileSource::new("/does/not/exist.json".to_string())),
    );
    let tile = cache.get(TileId::new(16, 32768, 21800)).await;
    assert!(tile.data.is_empty());
}

fn counts(totals: &[&str]) -> Vec<Element> {
    totals
        .iter()
        .map(|total| Element::Count {
            tags: vec![("total", *total)].into_iter().collect(),
        })
        .collect()
}

#[tokio::test]
async fn completeness_has_its_own_cache() {
    let mut elements = one_road();
    elements.extend(counts(&["5", "0", "1", "0"]));
    let (source, fetches) = CountingSource::new(elements);
    let source: Arc<dyn DataSource> = Arc::new(source);
    let config = config(4);
    let lanes: TileCache<TileData> = TileCache::new(config.clone(), source.clone());
    let completeness: TileCache<Completeness> = TileCache::new(config, source);

    // Zoom 10 is only served by the completeness overlay
    let id = TileId::new(10, 512, 340);
    let tiles = join_all((0..3).map(|_| completeness.get(id))).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    for tile in &tiles {
        assert_eq!(tile.data.fraction(), Some(0.5));
    }
    assert_eq!(completeness.cached(), vec![id]);

    // Count elements never turn into geometry, and ways never into counts
    let tile = lanes.get(TileId::new(16, 32768, 21800)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
    assert_eq!(tile.data.roads.len(), 1);
    assert_eq!(lanes.cached(), vec![TileId::new(14, 8192, 5450)]);
}

#[tokio::test]
async fn failed_completeness_is_unknown() {
    let (mut source, fetches) = CountingSource::new(counts(&["1"]));
    source.fail = true;
    let cache: TileCache<Completeness> = TileCache::new(config(4), Arc::new(source));
    let tile = cache.get(TileId::new(10, 1, 1)).await;
    assert_eq!(tile.data.fraction(), None);
    cache.get(TileId::new(10, 1, 1)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
#[should_panic]
async fn completeness_zoom_out_of_range() {
    let (source, _) = CountingSource::new(Vec::new());
    let cache: TileCache<Completeness> = TileCache::new(config(4), Arc::new(source));
    cache.get(TileId::new(16, 0, 0)).await;
}

#[tokio::test]
#[should_panic]
async fn zoom_out_of_range() {
    let (source, _) = CountingSource::new(Vec::new());
    cache(source, 4).get(TileId::new(15, 0, 0)).await;
}
