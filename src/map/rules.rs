//! Crossability and move-cost rules between adjacent tiles.
//!
//! Land move cost is `length * forest_factor + altitude_penalty`; sea move
//! cost is just `length`. `length` is 1 for straight moves and 1.414 for
//! diagonals.

use super::models::Tile;

pub type Weight = f64;

pub const STRAIGHT_LENGTH: Weight = 1.0;
pub const DIAGONAL_LENGTH: Weight = 1.414;

pub fn is_adjacent(a: &Tile, b: &Tile) -> bool {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
}

pub fn is_diagonal(a: &Tile, b: &Tile) -> bool {
    (a.x - b.x).abs() == 1 && (a.y - b.y).abs() == 1
}

/// Whether a regular (mid-path) move from `src` to `dest` is allowed.
///
/// `shared` holds the loaded orthogonal tiles of the 2x2 block formed by a
/// diagonal move; a missing one counts as land. Land may cut any corner,
/// while a sea diagonal needs at least one sea tile on its flanks.
pub fn is_crossable(src: &Tile, dest: &Tile, shared: &[&Tile]) -> bool {
    if !is_adjacent(src, dest) {
        return false;
    }
    if src.is_sea() != dest.is_sea() {
        return false;
    }
    if !is_diagonal(src, dest) {
        return true;
    }
    if !src.is_sea() {
        return true;
    }
    shared.iter().any(|t| t.is_sea())
}

/// Boarding from a settlement: any adjacent tile is reachable, land or sea.
pub fn is_crossable_from_settlement(src: &Tile, dest: &Tile) -> bool {
    is_adjacent(src, dest)
}

pub fn forest_factor(src: &Tile, dest: &Tile) -> Weight {
    match (src.is_forest(), dest.is_forest()) {
        (true, true) => 2.0,
        (true, false) | (false, true) => 1.5,
        (false, false) => 1.0,
    }
}

pub fn altitude_penalty(diff: u32) -> Weight {
    match diff {
        0..=24 => 0.0,
        25..=74 => 2.0,
        75..=124 => 5.0,
        _ => 20.0,
    }
}

/// Cost of moving from `src` to `dest`, or `None` when the move is not allowed.
///
/// Panics if the tiles are not adjacent: callers only ever pass neighbors.
pub fn edge_weight(src: &Tile, dest: &Tile, shared: &[&Tile], source_is_settlement: bool) -> Option<Weight> {
    assert!(
        is_adjacent(src, dest),
        "edge_weight on non-adjacent tiles ({}, {}) -> ({}, {})",
        src.x,
        src.y,
        dest.x,
        dest.y
    );

    let allowed = if source_is_settlement {
        is_crossable_from_settlement(src, dest)
    } else {
        is_crossable(src, dest, shared)
    };
    if !allowed {
        return None;
    }

    let length = if is_diagonal(src, dest) { DIAGONAL_LENGTH } else { STRAIGHT_LENGTH };
    if dest.is_sea() {
        return Some(length);
    }
    let diff = src.altitude.abs_diff(dest.altitude);
    Some(length * forest_factor(src, dest) + altitude_penalty(diff))
}
