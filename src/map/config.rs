use anyhow::Result;
use log::warn;
use std::{env, path::PathBuf};

use super::costs::FerryCost;
use super::dijkstra::BoardingCost;
use super::extract::UnreachablePolicy;
use super::models::{GridBounds, MAX_HEIGHT, MAX_WIDTH};
use super::rules::Weight;
use super::tile_map::MapOptions;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub map_dir: Option<PathBuf>,
    pub ferries: Option<PathBuf>,
    pub towns: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub threads: Option<usize>,
    pub omit_unreachable: Option<bool>,
    pub boarding_cost: Option<BoardingCost>,
    pub ferry_cost: Option<FerryCost>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn from_env_defaults() -> Self {
        let map_dir = env::var("TERRAIN_MAP_DIR").ok().map(PathBuf::from);
        let ferries = env::var("TERRAIN_FERRIES").ok().map(PathBuf::from);
        let towns = env::var("TERRAIN_TOWNS").ok().map(PathBuf::from);
        let out_dir = env::var("TERRAIN_OUT_DIR").ok().map(PathBuf::from);
        let width = env_parsed("TERRAIN_WIDTH", |s| s.parse::<u32>().ok());
        let height = env_parsed("TERRAIN_HEIGHT", |s| s.parse::<u32>().ok());
        let threads = env_parsed("TERRAIN_THREADS", |s| s.parse::<usize>().ok());
        let omit_unreachable = env_parsed("TERRAIN_OMIT_UNREACHABLE", parse_flag);
        let boarding_cost = env_parsed("TERRAIN_BOARDING_COST", parse_boarding_cost);
        let ferry_cost = env_parsed("TERRAIN_FERRY_COST", parse_ferry_cost);
        let log_level = Self::env_log_level();
        Self {
            map_dir,
            ferries,
            towns,
            out_dir,
            width,
            height,
            threads,
            omit_unreachable,
            boarding_cost,
            ferry_cost,
            log_level,
        }
    }

    pub fn env_log_level() -> Option<String> {
        env::var("TERRAIN_LOG_LEVEL").ok()
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(mut self, other: Config) -> Self {
        if other.map_dir.is_some() { self.map_dir = other.map_dir; }
        if other.ferries.is_some() { self.ferries = other.ferries; }
        if other.towns.is_some() { self.towns = other.towns; }
        if other.out_dir.is_some() { self.out_dir = other.out_dir; }
        if other.width.is_some() { self.width = other.width; }
        if other.height.is_some() { self.height = other.height; }
        if other.threads.is_some() { self.threads = other.threads; }
        if other.omit_unreachable.is_some() { self.omit_unreachable = other.omit_unreachable; }
        if other.boarding_cost.is_some() { self.boarding_cost = other.boarding_cost; }
        if other.ferry_cost.is_some() { self.ferry_cost = other.ferry_cost; }
        if other.log_level.is_some() { self.log_level = other.log_level; }
        self
    }

    pub fn bounds(&self) -> Result<GridBounds> {
        GridBounds::new(self.width.unwrap_or(MAX_WIDTH), self.height.unwrap_or(MAX_HEIGHT))
    }

    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            boarding: self.boarding_cost.unwrap_or_default(),
            unreachable: if self.omit_unreachable.unwrap_or(false) { UnreachablePolicy::Omit } else { UnreachablePolicy::Include },
            ferry_cost: self.ferry_cost.unwrap_or_default(),
        }
    }
}

/// Reads `key` and parses its trimmed value. A value that does not parse is
/// reported and ignored.
fn env_parsed<T>(key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = env::var(key).ok()?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!("ignoring {}={:?}: not a valid value", key, raw);
    }
    parsed
}

pub fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `free`, `edge-weight` or `disabled`.
pub fn parse_boarding_cost(input: &str) -> Option<BoardingCost> {
    match input.trim().to_ascii_lowercase().as_str() {
        "free" | "zero" | "0" => Some(BoardingCost::Free),
        "edge-weight" | "edge_weight" | "weight" => Some(BoardingCost::EdgeWeight),
        "disabled" | "none" => Some(BoardingCost::Disabled),
        _ => None,
    }
}

/// `euclidean`, `fixed:<cost>` or a bare number (fixed cost).
pub fn parse_ferry_cost(input: &str) -> Option<FerryCost> {
    let t = input.trim();
    if t.eq_ignore_ascii_case("euclidean") {
        return Some(FerryCost::Euclidean);
    }
    let num = t.strip_prefix("fixed:").unwrap_or(t);
    let c = num.trim().parse::<Weight>().ok()?;
    if c.is_finite() && c >= 0.0 { Some(FerryCost::Fixed(c)) } else { None }
}
