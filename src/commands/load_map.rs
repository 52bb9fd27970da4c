use anyhow::{bail, Context, Result};
use log::info;
use rayon::prelude::*;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::map::models::{FerryLinks, GridBounds, Tile};
use crate::map::tile_store::TileStore;

/// Whole map in one file, as produced by a single-archive export.
pub const SINGLE_FILE_MAP: &str = "map_data.json";
/// Map split over several files, concatenated in this order.
pub const MULTI_FILE_MAP: [&str; 4] = ["plots_0.json", "plots_1.json", "plots_2.json", "plots_3.json"];

const COMPACT_FIELDS: usize = 10;

#[derive(Deserialize, Debug, Default)]
struct TileData {
    #[serde(default, deserialize_with = "opt_integral")]
    alt: Option<i64>,
    #[serde(default, deserialize_with = "opt_integral")]
    fertility: Option<i64>,
    #[serde(default, deserialize_with = "opt_integral")]
    forest: Option<i64>,
    #[serde(default, deserialize_with = "opt_integral")]
    res: Option<i64>,
    #[serde(default, deserialize_with = "opt_integral")]
    res_amount: Option<i64>,
    #[serde(default, deserialize_with = "opt_integral")]
    region: Option<i64>,
    #[serde(default, deserialize_with = "opt_integral")]
    area: Option<i64>,
    #[serde(rename = "type", default, deserialize_with = "opt_integral")]
    kind: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct ObjectTile {
    #[serde(deserialize_with = "integral")]
    x: i64,
    #[serde(deserialize_with = "integral")]
    y: i64,
    #[serde(default)]
    data: TileData,
}

#[derive(Deserialize, Debug)]
struct Location {
    x: i32,
    y: i32,
}

#[derive(Deserialize, Debug)]
struct Landing {
    location: Location,
}

#[derive(Deserialize, Debug)]
struct FerryRecord {
    location: Location,
    #[serde(default)]
    landings: Option<Vec<Landing>>,
}

/// A named query source, usually a town.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Town {
    pub name: String,
    pub x: i32,
    pub y: i32,
}

fn narrow(v: Option<i64>, field: &str) -> Result<Option<i32>> {
    v.map(|n| i32::try_from(n).with_context(|| format!("field {} out of range: {}", field, n)))
        .transpose()
}

fn required(v: Option<i64>, field: &str) -> Result<i32> {
    match narrow(v, field)? {
        Some(n) => Ok(n),
        None => bail!("missing required field {}", field),
    }
}

fn build_tile(x: i32, y: i32, d: TileData) -> Result<Tile> {
    Ok(Tile {
        x,
        y,
        altitude: narrow(d.alt, "alt")?.unwrap_or(0),
        fertility: narrow(d.fertility, "fertility")?.unwrap_or(0),
        forest: narrow(d.forest, "forest")?,
        resource: narrow(d.res, "res")?,
        resource_amount: narrow(d.res_amount, "res_amount")?,
        region: narrow(d.region, "region")?,
        navigable_area: narrow(d.area, "area")?,
        water_type: narrow(d.kind, "type")?,
    })
}

/// Whole numbers written as floats (`60.0`) count as integers.
fn as_integer(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn integral<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<i64, D::Error> {
    let n = Number::deserialize(d)?;
    as_integer(&n).ok_or_else(|| de::Error::custom(format!("expected an integer, got {}", n)))
}

fn opt_integral<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<i64>, D::Error> {
    Option::<Number>::deserialize(d)?
        .map(|n| as_integer(&n).ok_or_else(|| de::Error::custom(format!("expected an integer, got {}", n))))
        .transpose()
}

fn compact_field(v: &Value, pos: usize) -> Result<Option<i64>> {
    match v {
        Value::Null => Ok(None),
        Value::Number(n) => match as_integer(n) {
            Some(i) => Ok(Some(i)),
            None => bail!("compact field {} is not an integer: {}", pos, n),
        },
        other => bail!("compact field {} is not an integer: {}", pos, other),
    }
}

/// `[x, y, alt, fertility, forest, res, res_amount, region, area, type]`
fn parse_compact(arr: &[Value]) -> Result<Tile> {
    if arr.len() != COMPACT_FIELDS {
        bail!("compact tile record must have {} fields, got {}", COMPACT_FIELDS, arr.len());
    }
    let f = arr
        .iter()
        .enumerate()
        .map(|(i, v)| compact_field(v, i))
        .collect::<Result<Vec<_>>>()?;
    let x = required(f[0], "x")?;
    let y = required(f[1], "y")?;
    let data = TileData {
        alt: f[2],
        fertility: f[3],
        forest: f[4],
        res: f[5],
        res_amount: f[6],
        region: f[7],
        area: f[8],
        kind: f[9],
    };
    build_tile(x, y, data).with_context(|| format!("tile ({}, {})", x, y))
}

fn parse_object(v: &Value) -> Result<Tile> {
    let raw = ObjectTile::deserialize(v).context("invalid tile object")?;
    let x = required(Some(raw.x), "x")?;
    let y = required(Some(raw.y), "y")?;
    build_tile(x, y, raw.data).with_context(|| format!("tile ({}, {})", x, y))
}

/// Accepts either the object form or the compact array form of a tile.
pub fn parse_tile(v: &Value) -> Result<Tile> {
    match v {
        Value::Array(arr) => parse_compact(arr),
        Value::Object(_) => parse_object(v),
        other => bail!("expected a tile object or array, got {}", other),
    }
}

pub fn parse_tiles(values: &[Value], source: &Path) -> Result<Vec<Tile>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| parse_tile(v).with_context(|| format!("tile record #{} in {}", i, source.display())))
        .collect()
}

fn read_json_array(path: &Path) -> Result<Vec<Value>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("parse JSON array {}", path.display()))
}

pub fn load_tile_file(path: &Path) -> Result<Vec<Tile>> {
    info!("Loading {}...", path.display());
    let values = read_json_array(path)?;
    parse_tiles(&values, path)
}

/// The JSON files making up the map in `dir`, in load order.
pub fn map_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        bail!("map folder not found: {}", dir.display());
    }
    let single = dir.join(SINGLE_FILE_MAP);
    if single.is_file() {
        return Ok(vec![single]);
    }
    let files: Vec<PathBuf> = MULTI_FILE_MAP.iter().map(|f| dir.join(f)).collect();
    if let Some(missing) = files.iter().find(|p| !p.is_file()) {
        bail!(
            "map folder {} has neither {} nor {}",
            dir.display(),
            SINGLE_FILE_MAP,
            missing.display()
        );
    }
    Ok(files)
}

pub fn load_tiles(dir: &Path) -> Result<Vec<Tile>> {
    let files = map_files(dir)?;
    let parts = files
        .par_iter()
        .map(|p| load_tile_file(p))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.into_iter().flatten().collect())
}

pub fn load_store(dir: &Path, bounds: GridBounds) -> Result<TileStore> {
    let tiles = load_tiles(dir)?;
    info!("Parsed {} tiles from {}", tiles.len(), dir.display());
    TileStore::from_tiles(bounds, tiles).with_context(|| format!("build tile store from {}", dir.display()))
}

pub fn parse_ferries(values: &[Value], bounds: GridBounds, source: &Path) -> Result<FerryLinks> {
    let mut links = FerryLinks::new();
    for (i, v) in values.iter().enumerate() {
        let ctx = || format!("ferry record #{} in {}", i, source.display());
        let rec = FerryRecord::deserialize(v).with_context(ctx)?;
        let Location { x, y } = rec.location;
        let Some(origin) = bounds.safe_key(x, y) else {
            bail!("ferry origin ({}, {}) outside the grid ({})", x, y, ctx());
        };
        let mut landings = BTreeSet::new();
        for l in rec.landings.unwrap_or_default() {
            let Location { x: lx, y: ly } = l.location;
            let Some(k) = bounds.safe_key(lx, ly) else {
                bail!("ferry landing ({}, {}) outside the grid ({})", lx, ly, ctx());
            };
            landings.insert(k);
        }
        links.entry(origin).or_default().extend(landings);
    }
    Ok(links)
}

pub fn load_ferries(path: &Path, bounds: GridBounds) -> Result<FerryLinks> {
    info!("Loading ferries from {}...", path.display());
    let values = read_json_array(path)?;
    parse_ferries(&values, bounds, path)
}

pub fn load_towns(path: &Path) -> Result<Vec<Town>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parse towns {}", path.display()))
}
