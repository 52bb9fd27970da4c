use anyhow::{bail, Result};
use log::info;

use super::load_map::load_store;
use crate::map::config::Config;
use crate::map::tile_store::TileStore;

/// Row-by-row outline of a grid circle: `(dx, min_dy, max_dy)` for every row
/// offset `dx` in `[-(radius-1), radius-1]`. The centre tile counts as the
/// first ring, so `radius` 8 reaches 7 tiles out.
pub fn circle_boundaries(radius: i32) -> Vec<(i32, i32, i32)> {
    let r = radius - 1;
    let (lo, hi) = (r as f64 - 0.5, r as f64 + 0.5);
    (-r..=r)
        .filter_map(|dx| {
            let ring: Vec<i32> = (-r..=r)
                .filter(|dy| {
                    let d = ((dx * dx + dy * dy) as f64).sqrt();
                    d >= lo && d <= hi
                })
                .collect();
            Some((dx, *ring.iter().min()?, *ring.iter().max()?))
        })
        .collect()
}

/// Absolute `((x, y_from), (x, y_to))` spans covered by the circle around `center`.
pub fn circle_ranges(center: (i32, i32), radius: i32) -> Vec<((i32, i32), (i32, i32))> {
    let (x, y) = center;
    circle_boundaries(radius)
        .into_iter()
        .map(|(dx, lo, hi)| ((x + dx, y + lo), (x + dx, y + hi)))
        .collect()
}

pub fn is_in_range(target: (i32, i32), tile: (i32, i32), boundaries: &[(i32, i32, i32)]) -> bool {
    let dx = tile.0 - target.0;
    let dy = tile.1 - target.1;
    boundaries
        .iter()
        .any(|&(row, lo, hi)| row == dx && dy >= lo && dy <= hi)
}

/// Number of forested tiles within `radius` of each target.
pub fn count_forest_tiles(store: &TileStore, targets: &[(i32, i32)], radius: i32) -> Vec<((i32, i32), usize)> {
    targets
        .iter()
        .map(|&target| {
            let count = circle_ranges(target, radius)
                .into_iter()
                .flat_map(|((x, from), (_, to))| (from..=to).map(move |y| (x, y)))
                .filter(|&(x, y)| store.get_at(x, y).map(|t| t.is_forest()).unwrap_or(false))
                .count();
            (target, count)
        })
        .collect()
}

/// `x,y` pair as given on the command line.
pub fn parse_target(input: &str) -> Result<(i32, i32)> {
    let parts: Vec<&str> = input.split(',').map(|s| s.trim()).collect();
    if parts.len() != 2 {
        bail!("invalid target {:?}: expected x,y", input);
    }
    let x = parts[0].parse::<i32>().map_err(|e| anyhow::anyhow!("invalid x in {:?}: {}", input, e))?;
    let y = parts[1].parse::<i32>().map_err(|e| anyhow::anyhow!("invalid y in {:?}: {}", input, e))?;
    Ok((x, y))
}

pub fn cmd_forest_count(cfg: &Config, targets: &[(i32, i32)], radius: i32) -> Result<Vec<((i32, i32), usize)>> {
    let (def_map, _) = crate::util::default_paths();
    let map_dir = cfg.map_dir.clone().unwrap_or(def_map);
    let store = load_store(&map_dir, cfg.bounds()?)?;
    info!("Counting forest tiles within radius {} of {} targets", radius, targets.len());
    let counts = count_forest_tiles(&store, targets, radius);
    for ((x, y), c) in counts.iter() {
        println!("({}, {}): {} forest tiles", x, y, c);
    }
    Ok(counts)
}
