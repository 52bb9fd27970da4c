use anyhow::{bail, Result};

use super::models::{GridBounds, Tile, TileKey};
use super::neighbor_policy::{Direction, Offset};

const EMPTY: u32 = u32::MAX;

/// Dense tile arena. `slots` maps every grid key to the position of its tile
/// in `tiles` (or `EMPTY`), so lookups never hash.
#[derive(Clone, Debug)]
pub struct TileStore {
    bounds: GridBounds,
    slots: Vec<u32>,
    tiles: Vec<Tile>,
}

impl TileStore {
    pub fn new(bounds: GridBounds) -> Self {
        Self { bounds, slots: vec![EMPTY; bounds.len()], tiles: Vec::new() }
    }

    pub fn from_tiles<I: IntoIterator<Item = Tile>>(bounds: GridBounds, tiles: I) -> Result<Self> {
        let mut store = Self::new(bounds);
        for t in tiles {
            store.insert(t)?;
        }
        Ok(store)
    }

    pub fn insert(&mut self, tile: Tile) -> Result<()> {
        let Some(key) = self.bounds.safe_key(tile.x, tile.y) else {
            bail!(
                "tile ({}, {}) lies outside the {}x{} grid",
                tile.x,
                tile.y,
                self.bounds.width,
                self.bounds.height
            );
        };
        if self.slots[key.index()] != EMPTY {
            bail!("duplicate tile at ({}, {})", tile.x, tile.y);
        }
        if self.tiles.len() >= EMPTY as usize {
            bail!("tile store is full");
        }
        self.slots[key.index()] = self.tiles.len() as u32;
        self.tiles.push(tile);
        Ok(())
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in load order; a tile's position here is its slot.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, slot: usize) -> &Tile {
        &self.tiles[slot]
    }

    pub fn key_of(&self, tile: &Tile) -> TileKey {
        self.bounds.key(tile.x, tile.y)
    }

    pub fn slot(&self, key: TileKey) -> Option<usize> {
        match self.slots.get(key.index()) {
            Some(&s) if s != EMPTY => Some(s as usize),
            _ => None,
        }
    }

    pub fn slot_at(&self, x: i32, y: i32) -> Option<usize> {
        self.bounds.safe_key(x, y).and_then(|k| self.slot(k))
    }

    pub fn get(&self, key: TileKey) -> Option<&Tile> {
        self.slot(key).map(|s| &self.tiles[s])
    }

    pub fn get_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.slot_at(x, y).map(|s| &self.tiles[s])
    }

    /// Slot of the loaded neighbor of `slot` in direction `d`, if any.
    pub fn neighbor_slot(&self, slot: usize, d: Direction) -> Option<usize> {
        let t = &self.tiles[slot];
        let Offset(dx, dy) = d.offset();
        self.slot_at(t.x + dx, t.y + dy)
    }

    /// In-bounds neighbor keys of `(x, y)`, loaded or not.
    pub fn adjacency_keys(&self, x: i32, y: i32) -> Vec<TileKey> {
        Direction::ALL
            .iter()
            .filter_map(|d| {
                let Offset(dx, dy) = d.offset();
                self.bounds.safe_key(x + dx, y + dy)
            })
            .collect()
    }
}
