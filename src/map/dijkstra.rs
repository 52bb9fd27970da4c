use log::{debug, info};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::costs::WeightCache;
use super::neighbor_policy::Direction;
use super::rules::{edge_weight, is_crossable_from_settlement};
use super::tile_store::TileStore;

/// What boarding a vessel from the query source costs when the regular rules
/// forbid the first move.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum BoardingCost {
    /// The vessel is already waiting: the first move is free.
    #[default]
    Free,
    /// Priced by `edge_weight` with the settlement rule.
    EdgeWeight,
    /// The source is not a settlement; the regular rules apply to every move.
    Disabled,
}

#[derive(Copy, Clone, Debug)]
struct QueueEntry {
    dist: f64,
    slot: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest distance first.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Slot-indexed shortest distances from one source; `INFINITY` when unreached.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMap {
    dist: Vec<f64>,
}

impl DistanceMap {
    pub fn get(&self, slot: usize) -> Option<f64> {
        self.dist.get(slot).copied().filter(|d| d.is_finite())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.dist
    }

    pub fn reached(&self) -> usize {
        self.dist.iter().filter(|d| d.is_finite()).count()
    }
}

/// Single-source Dijkstra over the precomputed cache. Neither the store nor
/// the cache is modified, so concurrent runs may share them.
pub fn dijkstra(store: &TileStore, cache: &WeightCache, source: usize, boarding: BoardingCost) -> DistanceMap {
    let origin = store.tile(source);
    info!("Running dijkstra from ({}, {})...", origin.x, origin.y);

    let mut dist = vec![f64::INFINITY; store.len()];
    let mut pq = BinaryHeap::new();
    dist[source] = 0.0;
    pq.push(QueueEntry { dist: 0.0, slot: source });

    let mut settled = 0usize;
    while let Some(QueueEntry { dist: du, slot: u }) = pq.pop() {
        if du > dist[u] {
            continue;
        }
        settled += 1;

        for d in Direction::ALL {
            let Some(n) = store.neighbor_slot(u, d) else { continue };
            let mut w = cache.weight(u, d);
            if w.is_none() && u == source {
                w = boarding_weight(store, u, n, boarding);
            }
            // Still no weight: u and n are not connected.
            let Some(w) = w else { continue };
            relax(&mut dist, &mut pq, n, du + w);
        }

        for f in cache.ferries(u) {
            relax(&mut dist, &mut pq, f.to, du + f.cost);
        }
    }

    let out = DistanceMap { dist };
    debug!("dijkstra settled {} pops", settled);
    info!("Dijkstra done: {} of {} tiles reachable", out.reached(), store.len());
    out
}

fn boarding_weight(store: &TileStore, from: usize, to: usize, boarding: BoardingCost) -> Option<f64> {
    if boarding == BoardingCost::Disabled {
        return None;
    }
    let (src, dest) = (store.tile(from), store.tile(to));
    if !is_crossable_from_settlement(src, dest) {
        return None;
    }
    match boarding {
        BoardingCost::Free => Some(0.0),
        BoardingCost::EdgeWeight => edge_weight(src, dest, &[], true),
        BoardingCost::Disabled => None,
    }
}

fn relax(dist: &mut [f64], pq: &mut BinaryHeap<QueueEntry>, n: usize, alt: f64) {
    if alt < dist[n] {
        dist[n] = alt;
        pq.push(QueueEntry { dist: alt, slot: n });
    }
}
