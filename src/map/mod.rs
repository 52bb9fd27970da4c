//! Weighted-grid pathfinding over land/sea terrain.

pub mod config;
pub mod costs;
pub mod dijkstra;
pub mod extract;
pub mod logging;
pub mod models;
pub mod neighbor_policy;
pub mod rules;
pub mod tile_map;
pub mod tile_store;

pub use costs::{FerryCost, WeightCache};
pub use dijkstra::{BoardingCost, DistanceMap};
pub use extract::UnreachablePolicy;
pub use models::{DistanceResult, FerryLinks, GridBounds, Tile, TileKey};
pub use tile_map::{MapOptions, TileMap};
pub use tile_store::TileStore;
