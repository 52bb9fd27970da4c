use anyhow::Result;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

use terrain_paths::commands::distances::cmd_distances;
use terrain_paths::commands::load_map::Town;
use terrain_paths::map::config::Config;

type Row = (i32, i32, Option<f64>);

/// `~ . . ~` with a ferry from the west sea tile to the east one.
fn seed_world() -> Result<TempDir> {
    let dir = tempdir()?;
    let map = dir.path().join("map");
    fs::create_dir_all(&map)?;
    fs::write(
        map.join("map_data.json"),
        r#"[
            [0, 0, 0, 0, null, null, null, null, 1, 1],
            {"x": 1, "y": 0, "data": {"alt": 0}},
            {"x": 2, "y": 0, "data": {"alt": 10, "fertility": 40}},
            [3, 0, 0, 0, null, null, null, null, 2, 1]
        ]"#,
    )?;
    fs::write(
        dir.path().join("ferries.json"),
        r#"[
            {"location": {"x": 0, "y": 0}, "landings": [{"location": {"x": 3, "y": 0}}]},
            {"location": {"x": 3, "y": 0}, "landings": null}
        ]"#,
    )?;
    fs::write(
        dir.path().join("towns.json"),
        r#"[{"name": "West Harbour", "x": 1, "y": 0}, {"name": "Inland", "x": 2, "y": 0}]"#,
    )?;
    Ok(dir)
}

fn config(dir: &Path) -> Config {
    Config {
        map_dir: Some(dir.join("map")),
        ferries: Some(dir.join("ferries.json")),
        towns: Some(dir.join("towns.json")),
        out_dir: Some(dir.join("out")),
        width: Some(4),
        height: Some(1),
        ..Config::default()
    }
}

fn read_rows(path: &Path) -> Result<Vec<Row>> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn distance(rows: &[Row], x: i32, y: i32) -> Option<Option<f64>> {
    rows.iter().find(|r| r.0 == x && r.1 == y).map(|r| r.2)
}

#[test]
fn writes_one_file_per_town() -> Result<()> {
    let dir = seed_world()?;
    let written = cmd_distances(&config(dir.path()), None)?;
    assert_eq!(written.len(), 2);

    let out = dir.path().join("out");
    let harbour = read_rows(&out.join("west_harbour.json"))?;
    assert_eq!(harbour.len(), 4);
    assert_eq!(distance(&harbour, 1, 0), Some(Some(0.0)));
    // Boarding from the town is free, then the ferry crosses 3 tiles.
    assert_eq!(distance(&harbour, 0, 0), Some(Some(0.0)));
    assert_eq!(distance(&harbour, 2, 0), Some(Some(1.0)));
    assert_eq!(distance(&harbour, 3, 0), Some(Some(3.0)));

    let inland = read_rows(&out.join("inland.json"))?;
    assert_eq!(distance(&inland, 3, 0), Some(Some(0.0)));
    assert_eq!(distance(&inland, 1, 0), Some(Some(1.0)));
    // No lane leads back west and ships cannot land.
    assert_eq!(distance(&inland, 0, 0), Some(None));
    Ok(())
}

#[test]
fn unreachable_tiles_can_be_omitted() -> Result<()> {
    let dir = seed_world()?;
    let cfg = Config { omit_unreachable: Some(true), ..config(dir.path()) };
    cmd_distances(&cfg, None)?;

    let inland = read_rows(&dir.path().join("out").join("inland.json"))?;
    assert_eq!(inland.len(), 3);
    assert_eq!(distance(&inland, 0, 0), None);
    Ok(())
}

#[test]
fn single_source_ignores_towns_file() -> Result<()> {
    let dir = seed_world()?;
    let cfg = Config { towns: None, ..config(dir.path()) };
    let source = Town { name: "source_3_0".into(), x: 3, y: 0 };
    let written = cmd_distances(&cfg, Some(source))?;
    assert_eq!(written, vec![dir.path().join("out").join("source_3_0.json")]);

    let rows = read_rows(&written[0])?;
    assert_eq!(distance(&rows, 3, 0), Some(Some(0.0)));
    // The source counts as a settlement, so stepping ashore is free too.
    assert_eq!(distance(&rows, 2, 0), Some(Some(0.0)));
    assert_eq!(distance(&rows, 1, 0), Some(Some(1.0)));
    assert_eq!(distance(&rows, 0, 0), Some(None));
    Ok(())
}

#[test]
fn errors_are_reported_with_context() -> Result<()> {
    let dir = seed_world()?;

    let cfg = Config { towns: None, ..config(dir.path()) };
    let err = cmd_distances(&cfg, None).unwrap_err();
    assert!(err.to_string().contains("no source given"));

    let missing = Town { name: "Nowhere".into(), x: 0, y: 3 };
    let err = cmd_distances(&Config { height: Some(4), ..config(dir.path()) }, Some(missing)).unwrap_err();
    assert!(format!("{:#}", err).contains("not in the map"), "{:#}", err);

    let cfg = Config { map_dir: Some(dir.path().join("absent")), ..config(dir.path()) };
    let err = cmd_distances(&cfg, None).unwrap_err();
    assert!(err.to_string().contains("map folder not found"));
    Ok(())
}

#[test]
fn towns_sharing_a_slug_keep_separate_files() -> Result<()> {
    let dir = seed_world()?;
    fs::write(
        dir.path().join("towns.json"),
        r#"[{"name": "Port Royal", "x": 1, "y": 0}, {"name": "port-royal", "x": 2, "y": 0}]"#,
    )?;
    let written = cmd_distances(&config(dir.path()), None)?;

    let out = dir.path().join("out");
    assert_eq!(written, vec![out.join("port_royal_1_0.json"), out.join("port_royal_2_0.json")]);
    assert_eq!(fs::read_dir(&out)?.count(), 2);

    let west = read_rows(&written[0])?;
    let east = read_rows(&written[1])?;
    assert_eq!(distance(&west, 1, 0), Some(Some(0.0)));
    assert_eq!(distance(&east, 2, 0), Some(Some(0.0)));
    Ok(())
}

#[test]
fn identical_towns_are_refused_before_writing() -> Result<()> {
    let dir = seed_world()?;
    fs::write(
        dir.path().join("towns.json"),
        r#"[{"name": "Inland", "x": 2, "y": 0}, {"name": "inland", "x": 2, "y": 0}]"#,
    )?;
    let err = cmd_distances(&config(dir.path()), None).unwrap_err();
    assert!(format!("{:#}", err).contains("would both be written"), "{:#}", err);
    assert!(!dir.path().join("out").exists());
    Ok(())
}
