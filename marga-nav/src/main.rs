//! MargaNav replay tool
//!
//! Plans a route through the building and replays a recorded scan log
//! through the full pipeline, logging every guidance instruction.
//!
//! Usage:
//!   marga-nav --start N1 --goal P1 --scans data/sample/scans.json
//!   marga-nav --start N1 --goal P1 --scans scans.json --config marga.toml --data ./building

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use marga_nav::io::{BuildingData, load_scan_log};
use marga_nav::{
    GuidanceEvent, GuidanceSession, KnnPositioner, MargaConfig, MargaError, Navigator, Result,
    RssiSmoother,
};

/// Replay a recorded scan log against a planned route
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Start node id
    #[arg(short, long)]
    start: String,

    /// Destination node id
    #[arg(short, long)]
    goal: String,

    /// Recorded scan log (JSON array of scan frames)
    #[arg(long)]
    scans: PathBuf,

    /// Configuration file path (default: marga.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Building data directory, overrides [data] dir
    #[arg(short, long)]
    data: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marga_nav=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            MargaConfig::load(path)?
        }
        None if Path::new("marga.toml").exists() => {
            info!("Loading configuration from marga.toml");
            MargaConfig::load(Path::new("marga.toml"))?
        }
        None => {
            info!("Using default configuration");
            MargaConfig::default()
        }
    };

    if let Some(dir) = args.data {
        info!("Using building data from {:?}", dir);
        config.data.dir = dir;
    }

    info!("MargaNav v{}", env!("CARGO_PKG_VERSION"));

    let building = BuildingData::load(&config.data)?;
    building.places.validate_request(&args.start, &args.goal)?;

    let graph = Arc::new(building.graph);
    let places = Arc::new(building.places);
    let session = match GuidanceSession::plan(
        graph,
        places,
        &args.start,
        &args.goal,
        config.guidance.to_guidance_config(),
    ) {
        Ok(session) => session,
        Err(MargaError::Navigation(e)) => {
            report(&GuidanceEvent::RouteUnavailable(e.clone()));
            return Err(e.into());
        }
        Err(e) => return Err(e),
    };

    let mut navigator = Navigator::new(
        RssiSmoother::new(config.smoothing.alpha),
        KnnPositioner::new(config.positioning.k),
        Arc::new(building.fingerprints),
        session,
    );

    for event in navigator.begin() {
        report(&event);
    }

    let frames = load_scan_log(&args.scans)?;
    info!("Replaying {} scan frames", frames.len());

    let epoch = Instant::now();
    for frame in &frames {
        let now = epoch + Duration::from_millis(frame.timestamp_ms);
        for event in navigator.process_scan(&frame.readings, now) {
            report(&event);
        }
    }

    match navigator.snapshot() {
        Some(snapshot) => info!("Final position: {}", snapshot),
        None => warn!("No position estimate was produced"),
    }
    info!(
        "Session ended in state {:?} after {} reroute(s)",
        navigator.session().state(),
        navigator.session().reroute_count()
    );

    Ok(())
}

/// Log one event the way the announcement layer would render it.
fn report(event: &GuidanceEvent) {
    if !event.is_spoken() {
        tracing::debug!("{}", event);
        return;
    }
    match event.emphasis() {
        Some(emphasis) => info!("[{:?}] {}", emphasis, event),
        None => info!("{}", event),
    }
}
