use super::dijkstra::DistanceMap;
use super::models::DistanceResult;
use super::tile_store::TileStore;

/// Whether tiles the source cannot reach appear in the extracted results.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum UnreachablePolicy {
    /// Keep them with a `None` distance.
    #[default]
    Include,
    Omit,
}

pub fn extract_distances(store: &TileStore, dist: &DistanceMap, policy: UnreachablePolicy) -> Vec<DistanceResult> {
    store
        .tiles()
        .iter()
        .enumerate()
        .map(|(slot, t)| DistanceResult { x: t.x, y: t.y, distance: dist.get(slot) })
        .filter(|r| policy == UnreachablePolicy::Include || r.distance.is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::costs::{FerryCost, WeightCache};
    use crate::map::dijkstra::{dijkstra, BoardingCost};
    use crate::map::models::{FerryLinks, GridBounds, Tile};

    #[test]
    fn policy_controls_unreachable_entries() {
        let bounds = GridBounds::new(3, 1).unwrap();
        let s = TileStore::from_tiles(bounds, vec![Tile::new(0, 0), Tile::new(2, 0)]).unwrap();
        let c = WeightCache::build(&s, &FerryLinks::new(), FerryCost::default());
        let d = dijkstra(&s, &c, 0, BoardingCost::Free);

        let all = extract_distances(&s, &d, UnreachablePolicy::Include);
        assert_eq!(
            all,
            vec![
                DistanceResult { x: 0, y: 0, distance: Some(0.0) },
                DistanceResult { x: 2, y: 0, distance: None },
            ]
        );

        let reached = extract_distances(&s, &d, UnreachablePolicy::Omit);
        assert_eq!(reached, vec![DistanceResult { x: 0, y: 0, distance: Some(0.0) }]);
    }
}
