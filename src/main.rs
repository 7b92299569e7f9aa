use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use eyre::{Result, WrapErr, bail};
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use route_planner::model::{RouteModifiers, Units};
use route_planner::request::RequestOptions;
use route_planner::{
    GoogleMapsClient, GoogleMapsConfig, OptimizerOptions, RouteOptimizer, Stop, StopRecord,
};

/// Plans an optimized round trip through a list of stops.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Start and end address of the tour
    #[arg(short, long)]
    origin: String,

    /// JSON file with an array of stops ({"name", "address", ...})
    #[arg(short, long)]
    stops: Option<PathBuf>,

    /// Extra destination address, may be repeated
    #[arg(short, long = "destination")]
    destinations: Vec<String>,

    /// Where to write the route result
    #[arg(long, default_value = "optimized_route.json")]
    output: PathBuf,

    /// Pause between geocoding requests, in milliseconds
    #[arg(long, default_value_t = 200)]
    geocode_delay_ms: u64,

    /// Unit system for the route service (metric or imperial)
    #[arg(long, default_value = "metric")]
    units: Units,

    #[arg(long)]
    avoid_tolls: bool,

    #[arg(long)]
    avoid_highways: bool,

    #[arg(long)]
    avoid_ferries: bool,

    /// Log file, appended to alongside stderr
    #[arg(long, default_value = "route_planner.log")]
    log_file: PathBuf,
}

/// Logs to stderr and to `log_file`, filtered by `RUST_LOG` (default `info`).
fn init_tracing(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .wrap_err_with(|| format!("opening log file {}", log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    // Before the filter is built, so RUST_LOG may come from .env.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let mut stops: Vec<StopRecord> = match &cli.stops {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .wrap_err_with(|| format!("reading stops from {}", path.display()))?;
            serde_json::from_str(&raw)
                .wrap_err_with(|| format!("parsing stops from {}", path.display()))?
        }
        None => Vec::new(),
    };
    stops.extend(
        cli.destinations
            .iter()
            .map(|address| StopRecord::new(address.clone(), address.clone())),
    );
    if stops.is_empty() {
        bail!("no stops given; pass --stops or --destination");
    }

    let config = GoogleMapsConfig::from_env()?;
    let client = GoogleMapsClient::new(config).wrap_err("building HTTP client")?;
    let options = OptimizerOptions {
        geocode_delay: Duration::from_millis(cli.geocode_delay_ms),
        request: RequestOptions {
            route_modifiers: RouteModifiers {
                avoid_tolls: cli.avoid_tolls,
                avoid_highways: cli.avoid_highways,
                avoid_ferries: cli.avoid_ferries,
            },
            units: cli.units,
            ..RequestOptions::default()
        },
        ..OptimizerOptions::default()
    };
    let mut optimizer = RouteOptimizer::with_options(&client, &client, options);

    let itinerary = optimizer.optimize_stops(&cli.origin, &stops)?;
    let result = itinerary.result();

    println!("\n===== Route Optimization Results =====");
    println!("Origin: {}", result.origin);
    println!("Total Distance: {:.2} km", result.total_distance_km);
    println!("Total Duration: {} minutes", result.total_duration_mins);
    println!("\nOptimized Route:");
    println!("Start at: {}", result.origin);
    for entry in itinerary.stops() {
        let (distance, duration) = entry
            .leg
            .as_ref()
            .map(|leg| (format!("{:.2} km", leg.distance_km), format!("{} mins", leg.duration_mins)))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
        println!(
            "{}. {} - {} ({}, {})",
            entry.sequence + 1,
            entry.stop.name(),
            entry.stop.address(),
            distance,
            duration
        );
    }
    match itinerary.return_leg() {
        Some(leg) => println!(
            "Return to: {} ({:.2} km, {} mins)",
            result.origin, leg.distance_km, leg.duration_mins
        ),
        None => println!("Return to: {}", result.origin),
    }

    if !result.unresolved_destinations.is_empty() {
        println!("\nSkipped (could not geocode):");
        for address in &result.unresolved_destinations {
            println!("  {}", address);
        }
    }

    match result.path() {
        Ok(path) => println!("\nPath points: {}", path.points().len()),
        Err(err) => warn!(error = %err, "could not decode route polyline"),
    }

    match result.map_urls.len() {
        0 => println!("\nGoogle Maps URL: unavailable"),
        1 => println!("\nGoogle Maps URL: {}", result.map_url),
        count => {
            println!("\nGoogle Maps URLs ({} parts):", count);
            for (index, url) in result.map_urls.iter().enumerate() {
                println!("  {}. {}", index + 1, url);
            }
        }
    }

    let json_output = serde_json::to_string_pretty(result)?;
    fs::write(&cli.output, json_output)
        .wrap_err_with(|| format!("writing {}", cli.output.display()))?;
    info!(
        output = %cli.output.display(),
        stats = ?optimizer.cache_stats(),
        "optimization complete"
    );

    Ok(())
}
