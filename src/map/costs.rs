use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashMap;

use super::logging::approx_mb;
use super::models::FerryLinks;
use super::neighbor_policy::Direction;
use super::rules::{edge_weight, Weight};
use super::tile_store::TileStore;

/// Cost to each of the 8 neighbors, indexed by [`Direction::index`].
pub type EdgeWeights = [Option<Weight>; 8];

/// How a ferry landing is priced.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum FerryCost {
    /// Straight-line distance between origin and landing.
    #[default]
    Euclidean,
    Fixed(Weight),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FerryEdge {
    pub to: usize,
    pub cost: Weight,
}

/// Precomputed directional costs for every tile of a [`TileStore`], plus the
/// ferry edges merged on top. Read-only once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightCache {
    weights: Vec<EdgeWeights>,
    ferries: HashMap<usize, Vec<FerryEdge>>,
}

impl WeightCache {
    pub fn build(store: &TileStore, links: &FerryLinks, ferry_cost: FerryCost) -> Self {
        info!("Computing costs for {} tiles...", store.len());
        let weights = build_weights(store);
        let ferries = merge_ferries(store, links, ferry_cost);
        info!(
            "Costs computed. Approximate size in RAM: {:.1} MB ({} tiles with ferry links)",
            approx_mb::<EdgeWeights>(weights.len()),
            ferries.len()
        );
        Self { weights, ferries }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, slot: usize, d: Direction) -> Option<Weight> {
        self.weights[slot][d.index()]
    }

    pub fn ferries(&self, slot: usize) -> &[FerryEdge] {
        self.ferries.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// One pass over every tile; each entry depends only on the read-only store.
pub fn build_weights(store: &TileStore) -> Vec<EdgeWeights> {
    (0..store.len())
        .into_par_iter()
        .map(|slot| tile_weights(store, slot))
        .collect()
}

pub fn tile_weights(store: &TileStore, slot: usize) -> EdgeWeights {
    let src = store.tile(slot);
    let mut out: EdgeWeights = [None; 8];
    for d in Direction::ALL {
        let Some(n) = store.neighbor_slot(slot, d) else { continue };
        let dest = store.tile(n);
        let w = match d.shared() {
            Some((a, b)) => {
                // Out-of-bounds or unloaded flanks are treated as land.
                let flank = |f| store.neighbor_slot(slot, f).map(|s| store.tile(s));
                match (flank(a), flank(b)) {
                    (Some(fa), Some(fb)) => edge_weight(src, dest, &[fa, fb], false),
                    (Some(f), None) | (None, Some(f)) => edge_weight(src, dest, &[f], false),
                    (None, None) => edge_weight(src, dest, &[], false),
                }
            }
            None => edge_weight(src, dest, &[], false),
        };
        out[d.index()] = w;
    }
    out
}

pub fn merge_ferries(store: &TileStore, links: &FerryLinks, ferry_cost: FerryCost) -> HashMap<usize, Vec<FerryEdge>> {
    let bounds = store.bounds();
    let mut out: HashMap<usize, Vec<FerryEdge>> = HashMap::new();
    for (origin, landings) in links.iter() {
        let Some(from) = store.slot(*origin) else {
            let (x, y) = bounds.coords(*origin);
            warn!("ferry origin ({}, {}) is not in the map; skipping {} landings", x, y, landings.len());
            continue;
        };
        let src = store.tile(from);
        let mut edges = Vec::with_capacity(landings.len());
        for landing in landings.iter() {
            let Some(to) = store.slot(*landing) else {
                let (x, y) = bounds.coords(*landing);
                warn!("ferry landing ({}, {}) from ({}, {}) is not in the map", x, y, src.x, src.y);
                continue;
            };
            if to == from {
                continue;
            }
            let dest = store.tile(to);
            let cost = match ferry_cost {
                FerryCost::Fixed(c) => c,
                FerryCost::Euclidean => {
                    let dx = (src.x - dest.x) as f64;
                    let dy = (src.y - dest.y) as f64;
                    (dx * dx + dy * dy).sqrt()
                }
            };
            edges.push(FerryEdge { to, cost });
        }
        debug!("ferry ({}, {}) -> {} landings", src.x, src.y, edges.len());
        if !edges.is_empty() {
            out.insert(from, edges);
        }
    }
    out
}
