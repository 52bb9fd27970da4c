use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use terrain_paths::commands::{distances, forest_count, load_map::Town};
use terrain_paths::map::config::{self, Config};
use terrain_paths::map::logging;

#[derive(Parser, Debug)]
#[command(name = "terrain_paths", version, about = "Terrain distance maps for land and sea travel")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct CommonOpts {
    /// Folder with map_data.json or plots_0..3.json (default: repo_root/map or TERRAIN_MAP_DIR)
    #[arg(long = "map-dir")]
    map_dir: Option<PathBuf>,
    /// Grid width (default: 4096)
    #[arg(long)]
    width: Option<u32>,
    /// Grid height (default: 4096)
    #[arg(long)]
    height: Option<u32>,
    /// Number of worker threads (rayon)
    #[arg(long)]
    threads: Option<usize>,
    /// Log level (trace|debug|info|warn|error)
    #[arg(long = "log-level")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute distances from each town (or one source) to every tile
    Distances {
        #[command(flatten)]
        common: CommonOpts,
        /// Ferry records JSON
        #[arg(long)]
        ferries: Option<PathBuf>,
        /// Towns JSON: [{"name", "x", "y"}, ...]
        #[arg(long)]
        towns: Option<PathBuf>,
        /// Output folder (default: repo_root/out/distances)
        #[arg(long = "out-dir")]
        out_dir: Option<PathBuf>,
        /// Single source X (instead of a towns file)
        #[arg(long, requires = "y")]
        x: Option<i32>,
        /// Single source Y
        #[arg(long, requires = "x")]
        y: Option<i32>,
        /// Label for the single source output file
        #[arg(long)]
        name: Option<String>,
        /// Leave unreachable tiles out of the results instead of writing null
        #[arg(long = "omit-unreachable")]
        omit_unreachable: bool,
        /// Cost of boarding from the source: free | edge-weight | disabled
        #[arg(long = "boarding-cost")]
        boarding_cost: Option<String>,
        /// Ferry pricing: euclidean | fixed:<cost>
        #[arg(long = "ferry-cost")]
        ferry_cost: Option<String>,
    },

    /// Count forest tiles within a circular range of each target
    ForestCount {
        #[command(flatten)]
        common: CommonOpts,
        /// Target tiles as x,y (repeatable)
        #[arg(long = "target", num_args = 1.., required = true)]
        targets: Vec<String>,
        /// Circle radius in tiles, centre included
        #[arg(long, default_value_t = 8)]
        radius: i32,
    },
}

fn base_config(common: &CommonOpts) -> Config {
    Config {
        map_dir: common.map_dir.clone(),
        width: common.width,
        height: common.height,
        threads: common.threads,
        log_level: common.log_level.clone(),
        ..Config::default()
    }
}

/// CLI first, then environment overrides (env > CLI).
fn finish_config(cli_cfg: Config) -> Config {
    // Logging starts before the env is read so bad values get reported.
    let level = Config::env_log_level().or_else(|| cli_cfg.log_level.clone());
    logging::init(level.as_deref());
    let cfg = cli_cfg.merge(Config::from_env_defaults());
    if let Some(n) = cfg.threads {
        let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
    }
    cfg
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Distances {
            common,
            ferries,
            towns,
            out_dir,
            x,
            y,
            name,
            omit_unreachable,
            boarding_cost,
            ferry_cost,
        } => {
            let boarding_cost = boarding_cost
                .map(|s| config::parse_boarding_cost(&s).ok_or_else(|| anyhow!("invalid --boarding-cost {:?}", s)))
                .transpose()?;
            let ferry_cost = ferry_cost
                .map(|s| config::parse_ferry_cost(&s).ok_or_else(|| anyhow!("invalid --ferry-cost {:?}", s)))
                .transpose()?;
            let cfg = finish_config(Config {
                ferries,
                towns,
                out_dir,
                omit_unreachable: omit_unreachable.then_some(true),
                boarding_cost,
                ferry_cost,
                ..base_config(&common)
            });
            let source = match (x, y) {
                (Some(x), Some(y)) => Some(Town { name: name.unwrap_or_else(|| format!("source_{}_{}", x, y)), x, y }),
                _ => None,
            };
            distances::cmd_distances(&cfg, source).map(|_| ())
        }
        Commands::ForestCount { common, targets, radius } => {
            let cfg = finish_config(base_config(&common));
            let targets = targets
                .iter()
                .map(|t| forest_count::parse_target(t))
                .collect::<Result<Vec<_>>>()?;
            forest_count::cmd_forest_count(&cfg, &targets, radius).map(|_| ())
        }
    }
}
