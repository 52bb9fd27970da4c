pub mod distances;
pub mod forest_count;
pub mod load_map;
