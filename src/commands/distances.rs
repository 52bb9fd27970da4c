use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::collections::HashMap;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::load_map::{load_ferries, load_store, load_towns, Town};
use crate::map::config::Config;
use crate::map::models::{DistanceResult, FerryLinks};
use crate::map::tile_map::TileMap;

/// Output file stem for a query label: lowercase, with every run of
/// non-alphanumeric characters collapsed to `_`.
pub fn slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_sep = false;
    for c in label.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    if out.is_empty() {
        out.push_str("unnamed");
    }
    out
}

/// `[x, y, distance_or_null]` per tile.
pub fn result_rows(results: &[DistanceResult]) -> Vec<(i32, i32, Option<f64>)> {
    results.iter().map(|r| (r.x, r.y, r.distance)).collect()
}

pub fn write_results(path: &Path, results: &[DistanceResult]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer(&mut w, &result_rows(results)).with_context(|| format!("write {}", path.display()))?;
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// One output file stem per town. Towns whose names share a slug get their
/// coordinates appended; two towns that still collide are an error.
pub fn output_stems(towns: &[Town]) -> Result<Vec<String>> {
    let mut by_slug: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, t) in towns.iter().enumerate() {
        by_slug.entry(slug(&t.name)).or_default().push(i);
    }

    let mut stems: Vec<String> = towns.iter().map(|t| slug(&t.name)).collect();
    for (s, idx) in by_slug.iter().filter(|(_, idx)| idx.len() > 1) {
        let names: Vec<&str> = idx.iter().map(|&i| towns[i].name.as_str()).collect();
        warn!("towns {:?} share the output name {}; appending coordinates", names, s);
        for &i in idx {
            stems[i] = format!("{}_{}_{}", s, towns[i].x, towns[i].y);
        }
    }

    let mut owner: HashMap<&str, usize> = HashMap::new();
    for (i, stem) in stems.iter().enumerate() {
        if let Some(&j) = owner.get(stem.as_str()) {
            bail!(
                "towns {:?} and {:?} would both be written to {}.json",
                towns[j].name,
                towns[i].name,
                stem
            );
        }
        owner.insert(stem.as_str(), i);
    }
    Ok(stems)
}

/// Runs one query per town against the shared map and writes one file each.
/// Queries only read the map, so they run in parallel.
pub fn run_queries(map: &TileMap, towns: &[Town], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let stems = output_stems(towns)?;
    fs::create_dir_all(out_dir).with_context(|| format!("create output folder {}", out_dir.display()))?;
    towns
        .par_iter()
        .zip(stems.par_iter())
        .map(|(town, stem)| {
            let results = map
                .compute_distances(town.x, town.y)
                .with_context(|| format!("distances for {} at ({}, {})", town.name, town.x, town.y))?;
            let path = out_dir.join(format!("{}.json", stem));
            write_results(&path, &results)?;
            info!("{}: {} results written to {}", town.name, results.len(), path.display());
            Ok(path)
        })
        .collect()
}

/// Loads the map described by `cfg`, builds its costs, and answers either the
/// single `source` query or every town listed in the configured towns file.
pub fn cmd_distances(cfg: &Config, source: Option<Town>) -> Result<Vec<PathBuf>> {
    let (def_map, def_out) = crate::util::default_paths();
    let map_dir = cfg.map_dir.clone().unwrap_or(def_map);
    let out_dir = cfg.out_dir.clone().unwrap_or(def_out);
    let bounds = cfg.bounds()?;

    let towns = match source {
        Some(t) => vec![t],
        None => {
            let path = cfg
                .towns
                .as_deref()
                .context("no source given: pass --x/--y or a towns file")?;
            load_towns(path)?
        }
    };

    println!("Using map folder : {}", map_dir.display());
    println!("Using output dir : {}", out_dir.display());

    let store = load_store(&map_dir, bounds)?;
    let ferries = match cfg.ferries.as_deref() {
        Some(p) => load_ferries(p, bounds)?,
        None => FerryLinks::new(),
    };

    let mut map = TileMap::new(store, ferries, cfg.map_options());
    map.compute_costs();
    let written = run_queries(&map, &towns, &out_dir)?;
    println!("Distances for {} sources written to {}", written.len(), out_dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_normalises_labels() {
        assert_eq!(slug("Port Royal"), "port_royal");
        assert_eq!(slug("  St. John's -- Harbour "), "st_john_s_harbour");
        assert_eq!(slug("abc"), "abc");
        assert_eq!(slug("!!"), "unnamed");
    }

    fn town(name: &str, x: i32, y: i32) -> Town {
        Town { name: name.into(), x, y }
    }

    #[test]
    fn colliding_slugs_get_coordinates() {
        let towns = [town("Port Royal", 0, 0), town("port-royal", 1, 0), town("Inland", 2, 0)];
        let stems = output_stems(&towns).unwrap();
        assert_eq!(stems, vec!["port_royal_0_0", "port_royal_1_0", "inland"]);
    }

    #[test]
    fn identical_towns_are_rejected() {
        let towns = [town("Port Royal", 0, 0), town("PORT ROYAL", 0, 0)];
        let err = output_stems(&towns).unwrap_err();
        assert!(err.to_string().contains("port_royal_0_0.json"), "{}", err);
    }

    #[test]
    fn rows_serialise_as_triples() {
        let rows = result_rows(&[
            DistanceResult { x: 1, y: 2, distance: Some(1.5) },
            DistanceResult { x: 3, y: 4, distance: None },
        ]);
        let s = serde_json::to_string(&rows).unwrap();
        assert_eq!(s, "[[1,2,1.5],[3,4,null]]");
    }
}
