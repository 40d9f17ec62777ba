use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use odormap::io::{load_obstacles, load_samples, read_config};
use odormap::{Config, GasMap, Observation, Point3d};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Build a kernel DM+V gas distribution map from a list of samples.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Samples, one `x y concentration` (or `x y z concentration`) per line
    #[arg(short, long)]
    samples: PathBuf,

    /// Domain and kernel configuration (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Obstacle list; samples inside an obstacle are ingested as zero
    #[arg(long)]
    obstacles: Option<PathBuf>,

    /// Where to write the map dump (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the estimate at X,Y (repeatable)
    #[arg(short, long = "query", value_name = "X,Y", value_parser = parse_xy)]
    queries: Vec<Point3d>,
}

fn parse_xy(s: &str) -> Result<Point3d, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {:?}", s))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x {:?}: {}", x, e))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y {:?}: {}", y, e))?;
    Ok(Point3d::planar(x, y))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("odormap=info"))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => read_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            info!("No config given, using the reference deployment");
            Config::default()
        }
    };

    let mut map = GasMap::new(&config)?;

    let obstacles = match &args.obstacles {
        Some(path) => load_obstacles(path)
            .with_context(|| format!("Failed to read obstacles from {}", path.display()))?,
        None => Default::default(),
    };

    let samples = load_samples(&args.samples)
        .with_context(|| format!("Failed to read samples from {}", args.samples.display()))?;

    let mut masked = 0usize;
    let observations = samples.into_iter().map(|obs| {
        if obstacles.contains(&obs.position) {
            masked += 1;
            Observation::new(obs.position, 0.0)
        } else {
            obs
        }
    });
    map.ingest_observations(observations)?;

    if masked > 0 {
        warn!("{} samples fell inside obstacles and were ingested as zero", masked);
    }

    let stats = map.stats();
    info!(
        "Ingested {} samples, {}/{} cells touched, mean confidence {:.3}",
        stats.samples_ingested, stats.touched_cells, stats.total_cells, stats.mean_confidence
    );
    if let Some((i, j, peak)) = stats.peak_concentration {
        let center = map.grid().center_of(i, j);
        info!(
            "Peak estimate {:.4} at cell ({}, {}) centred on ({:.3}, {:.3})",
            peak,
            i,
            j,
            center.x(),
            center.y()
        );
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            map.write_dump(BufWriter::new(file))?;
            info!("Wrote gas distribution map to {}", path.display());
        }
        None => map.write_dump(io::stdout().lock())?,
    }

    let mut stdout = io::stdout().lock();
    for position in &args.queries {
        match map.query(position) {
            Ok(value) => writeln!(stdout, "{}, {}, {}", position.x(), position.y(), value)?,
            Err(e) => warn!("{}", e),
        }
    }

    Ok(())
}
