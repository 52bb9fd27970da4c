use std::path::PathBuf;

pub const MAP_REL_PATH: &str = "map";
pub const OUT_REL_PATH: &str = "out/distances";

pub fn repo_root() -> PathBuf {
    // CARGO_MANIFEST_DIR is the repo root.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Default (map folder, output folder).
pub fn default_paths() -> (PathBuf, PathBuf) {
    let root = repo_root();
    (root.join(MAP_REL_PATH), root.join(OUT_REL_PATH))
}
