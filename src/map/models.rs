use anyhow::{bail, Result};
use std::collections::{BTreeSet, HashMap};

pub const MAX_WIDTH: u32 = 4096;
pub const MAX_HEIGHT: u32 = 4096;

/// Dense identifier of a grid cell: `y * width + x`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TileKey(pub u32);

impl TileKey {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declared extent of the grid. Every key derived from these bounds is
/// unique for coordinates in `[0, width) x [0, height)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
}

impl Default for GridBounds {
    fn default() -> Self {
        Self { width: MAX_WIDTH, height: MAX_HEIGHT }
    }
}

impl GridBounds {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("grid bounds must be non-empty, got {}x{}", width, height);
        }
        if width.checked_mul(height).is_none() {
            bail!("grid bounds {}x{} exceed the addressable key range", width, height);
        }
        Ok(Self { width, height })
    }

    /// Number of cells in the grid.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Key for an in-bounds coordinate. Callers outside the domain get a
    /// meaningless key; use [`GridBounds::safe_key`] when that can happen.
    pub fn key(&self, x: i32, y: i32) -> TileKey {
        debug_assert!(self.contains(x, y), "({}, {}) outside {:?}", x, y, self);
        TileKey((y as u32).wrapping_mul(self.width).wrapping_add(x as u32))
    }

    pub fn safe_key(&self, x: i32, y: i32) -> Option<TileKey> {
        if self.contains(x, y) {
            Some(self.key(x, y))
        } else {
            None
        }
    }

    pub fn coords(&self, key: TileKey) -> (i32, i32) {
        ((key.0 % self.width) as i32, (key.0 / self.width) as i32)
    }
}

/// One terrain cell. Created once at load time and never mutated.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub altitude: i32,
    pub fertility: i32,
    pub forest: Option<i32>,
    pub resource: Option<i32>,
    pub resource_amount: Option<i32>,
    pub region: Option<i32>,
    pub navigable_area: Option<i32>,
    pub water_type: Option<i32>,
}

impl Tile {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, ..Self::default() }
    }

    pub fn with_altitude(mut self, altitude: i32) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_forest(mut self, forest: i32) -> Self {
        self.forest = Some(forest);
        self
    }

    pub fn with_water(mut self, water_type: i32) -> Self {
        self.water_type = Some(water_type);
        self
    }

    pub fn is_sea(&self) -> bool {
        self.water_type.is_some()
    }

    pub fn is_forest(&self) -> bool {
        self.forest.is_some()
    }
}

/// Long-range sea lanes: origin key -> set of landing keys.
pub type FerryLinks = HashMap<TileKey, BTreeSet<TileKey>>;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DistanceResult {
    pub x: i32,
    pub y: i32,
    pub distance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_over_the_domain() {
        let b = GridBounds::new(7, 5).unwrap();
        let mut seen = std::collections::HashSet::new();
        for y in 0..5 {
            for x in 0..7 {
                let k = b.key(x, y);
                assert!(seen.insert(k), "duplicate key for ({}, {})", x, y);
                assert_eq!(b.coords(k), (x, y));
            }
        }
        assert_eq!(seen.len(), b.len());
    }

    #[test]
    fn safe_key_rejects_out_of_bounds() {
        let b = GridBounds::new(4, 3).unwrap();
        assert_eq!(b.safe_key(0, 0), Some(TileKey(0)));
        assert_eq!(b.safe_key(3, 2), Some(TileKey(11)));
        assert_eq!(b.safe_key(-1, 0), None);
        assert_eq!(b.safe_key(0, -1), None);
        assert_eq!(b.safe_key(4, 0), None);
        assert_eq!(b.safe_key(0, 3), None);
    }

    #[test]
    fn bounds_validation() {
        assert!(GridBounds::new(0, 10).is_err());
        assert!(GridBounds::new(u32::MAX, 2).is_err());
        assert_eq!(GridBounds::default().len(), 4096 * 4096);
    }

    #[test]
    fn tile_predicates() {
        let t = Tile::new(1, 2);
        assert!(!t.is_sea() && !t.is_forest());
        let t = t.with_water(1).with_forest(3);
        assert!(t.is_sea() && t.is_forest());
    }
}
