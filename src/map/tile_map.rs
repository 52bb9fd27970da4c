use anyhow::{anyhow, Result};
use log::info;

use super::costs::{FerryCost, WeightCache};
use super::dijkstra::{dijkstra, BoardingCost, DistanceMap};
use super::extract::{extract_distances, UnreachablePolicy};
use super::logging::approx_mb;
use super::models::{DistanceResult, FerryLinks, Tile};
use super::tile_store::TileStore;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MapOptions {
    pub boarding: BoardingCost,
    pub unreachable: UnreachablePolicy,
    pub ferry_cost: FerryCost,
}

/// A loaded map ready for distance queries once [`TileMap::compute_costs`]
/// has run.
#[derive(Debug)]
pub struct TileMap {
    store: TileStore,
    ferries: FerryLinks,
    options: MapOptions,
    cache: Option<WeightCache>,
}

impl TileMap {
    pub fn new(store: TileStore, ferries: FerryLinks, options: MapOptions) -> Self {
        info!(
            "Map loaded: {} tiles, {} ferry origins. Approximate size in RAM: {:.1} MB",
            store.len(),
            ferries.len(),
            approx_mb::<Tile>(store.len())
        );
        Self { store, ferries, options, cache: None }
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn options(&self) -> MapOptions {
        self.options
    }

    pub fn costs(&self) -> Option<&WeightCache> {
        self.cache.as_ref()
    }

    /// Builds (or rebuilds) the weighted adjacency cache.
    pub fn compute_costs(&mut self) {
        self.cache = Some(WeightCache::build(&self.store, &self.ferries, self.options.ferry_cost));
    }

    pub fn dijkstra(&self, x: i32, y: i32) -> Result<DistanceMap> {
        let cache = self
            .cache
            .as_ref()
            .ok_or_else(|| anyhow!("costs not computed; call compute_costs before querying"))?;
        let source = self
            .store
            .slot_at(x, y)
            .ok_or_else(|| anyhow!("source tile ({}, {}) is not in the map", x, y))?;
        Ok(dijkstra(&self.store, cache, source, self.options.boarding))
    }

    pub fn compute_distances(&self, x: i32, y: i32) -> Result<Vec<DistanceResult>> {
        let dist = self.dijkstra(x, y)?;
        Ok(extract_distances(&self.store, &dist, self.options.unreachable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::models::GridBounds;

    fn small_map() -> TileMap {
        let bounds = GridBounds::new(2, 2).unwrap();
        let tiles = vec![Tile::new(0, 0), Tile::new(1, 0), Tile::new(0, 1), Tile::new(1, 1)];
        let store = TileStore::from_tiles(bounds, tiles).unwrap();
        TileMap::new(store, FerryLinks::new(), MapOptions::default())
    }

    #[test]
    fn querying_before_compute_costs_fails() {
        let m = small_map();
        let err = m.compute_distances(0, 0).unwrap_err();
        assert!(err.to_string().contains("compute_costs"));
    }

    #[test]
    fn unknown_source_is_an_error() {
        let mut m = small_map();
        m.compute_costs();
        assert!(m.compute_distances(5, 5).is_err());
        assert!(m.compute_distances(-1, 0).is_err());
    }

    #[test]
    fn one_result_per_tile() {
        let mut m = small_map();
        m.compute_costs();
        let out = m.compute_distances(1, 1).unwrap();
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|r| r.distance.is_some()));
    }

    #[test]
    fn compute_costs_twice_gives_the_same_cache() {
        let mut m = small_map();
        m.compute_costs();
        let first = m.costs().cloned();
        m.compute_costs();
        assert_eq!(m.costs().cloned(), first);
    }
}
