use anyhow::{Context, Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use geoedit::api::{GeometryStore, HttpStore};
use geoedit::config::FileConfig;
use geoedit::domain::{GeoObject, GeometryPatch, GeometryRecord};
use geoedit::editor::{EditorController, Gesture, GestureOutcome};
use geoedit::geometry::{Bounds, Projector, mean_center};
use geoedit::{Geometry, serialize};

/// Inspect and edit geo-object geometry payloads
///
/// Examples:
///   # Show how a stored payload is interpreted
///   geoedit inspect '[[1,2],[3,4],[5,6],[7,8]]'
///
///   # Replay a gesture script against a local payload
///   geoedit edit --payload-file lake.json --script gestures.json
///
///   # Fetch a geosystem, apply gestures and save it back
///   geoedit apply --id 35545d45-284a-46ed-9bd5-33d8d30c78aa --script gestures.json
#[derive(Parser, Debug)]
#[command(name = "geoedit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches geoedit.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a payload and print its geometry type, center and bounds
    Inspect {
        /// Raw coordinate payload (JSON)
        payload: Option<String>,

        /// Read the payload from a file instead
        #[arg(long, conflicts_with = "payload")]
        file: Option<PathBuf>,
    },

    /// Replay a gesture script against a local payload and print the result
    Edit {
        #[command(flatten)]
        source: PayloadSource,

        /// JSON file with a list of gestures
        #[arg(long)]
        script: PathBuf,
    },

    /// Fetch a geosystem and print its geometry
    Fetch {
        /// Geosystem id
        #[arg(long)]
        id: String,
    },

    /// Fetch a geosystem, replay a gesture script and save the geometry
    Apply {
        /// Geosystem id
        #[arg(long)]
        id: String,

        /// JSON file with a list of gestures
        #[arg(long)]
        script: PathBuf,

        /// Print the patch instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct PayloadSource {
    /// Raw coordinate payload (JSON)
    #[arg(long)]
    payload: Option<String>,

    /// File holding the raw coordinate payload
    #[arg(long)]
    payload_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = if let Some(ref config_path) = args.config {
        if !config_path.exists() {
            bail!("Config file not found: {:?}", config_path);
        }
        FileConfig::load_from(config_path)?
    } else {
        FileConfig::load().unwrap_or_default()
    };

    init_tracing(args.verbose || config.verbose);

    match args.command {
        Command::Inspect { payload, file } => {
            let raw = match (payload, file) {
                (Some(p), _) => p,
                (None, Some(path)) => read_payload(&path)?,
                (None, None) => bail!("Provide a payload or --file"),
            };
            inspect(&config, &raw)
        }
        Command::Edit { source, script } => {
            let raw = match (source.payload, source.payload_file) {
                (Some(p), _) => p,
                (None, Some(path)) => read_payload(&path)?,
                (None, None) => bail!("Provide --payload or --payload-file"),
            };
            let object = GeoObject {
                id: "local".to_string(),
                geometry: Some(GeometryRecord {
                    border: raw,
                    ..Default::default()
                }),
                ..Default::default()
            };
            let patch = replay(&config, object, &script)?;
            println!("{}", patch.geometry.border);
            Ok(())
        }
        Command::Fetch { id } => {
            let store = HttpStore::new(&config.api)?;
            let raw = with_spinner(&format!("Fetching geosystem {}...", id), || {
                store.fetch_geometry(&id)
            })?;
            inspect(&config, &raw)
        }
        Command::Apply {
            id,
            script,
            dry_run,
        } => {
            let store = HttpStore::new(&config.api)?;
            let object = with_spinner(&format!("Fetching geosystem {}...", id), || {
                store.fetch_object(&id)
            })?;

            let patch = replay(&config, object, &script)?;
            if dry_run {
                println!("{}", serde_json::to_string_pretty(&patch)?);
                return Ok(());
            }

            with_spinner("Saving geometry...", || store.save_geometry(&patch))?;
            println!("Saved geometry of {}", patch.id);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "geoedit=debug" } else { "geoedit=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_payload(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read payload: {:?}", path))
}

fn inspect(config: &FileConfig, raw: &str) -> Result<()> {
    let Some(geometry) = config.parser().parse(raw) else {
        bail!("Unable to read geometry data");
    };

    println!("Type: {}", geometry.kind());
    println!("Points: {}", geometry.points().len());
    if let Some((lat, lon)) = mean_center(&geometry) {
        println!("Center: ({:.6}, {:.6})", lat, lon);
    }
    if let Some(bounds) = Bounds::of(&geometry) {
        println!(
            "Bounds: lat {:.6}..{:.6}, lon {:.6}..{:.6}",
            bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
        );
    }
    if let Geometry::Polygon(rings) = &geometry {
        println!("Rings: {} (holes: {})", rings.len(), rings.len().saturating_sub(1));
    }
    println!("{}", serde_json::to_string(&geometry)?);
    println!("Normalized payload: {}", serialize(&geometry));
    Ok(())
}

fn replay(config: &FileConfig, object: GeoObject, script: &Path) -> Result<GeometryPatch> {
    let contents = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read gesture script: {:?}", script))?;
    let gestures: Vec<Gesture> =
        serde_json::from_str(&contents).context("Failed to parse gesture script")?;

    let geometry = object
        .border()
        .and_then(|raw| config.parser().parse(raw))
        .context("Unable to read geometry data")?;
    let center = mean_center(&geometry).context("Geometry has no coordinates")?;
    let projector = Projector::new(center);

    let mut controller = EditorController::new(config.controller_settings());
    controller
        .enter(object)
        .context("Failed to enter edit mode")?;

    let start = Instant::now();
    for (i, gesture) in gestures.into_iter().enumerate() {
        let outcome = controller.handle(gesture, &projector);
        match &outcome {
            GestureOutcome::Rejected(err) => println!("#{}: rejected ({})", i + 1, err),
            GestureOutcome::RevertMarker { ring, point, to } => println!(
                "#{}: marker {}/{} reverted to ({}, {})",
                i + 1,
                ring,
                point,
                to.0,
                to.1
            ),
            other => tracing::debug!("#{}: {:?}", i + 1, other),
        }
        for notice in controller.drain_notices() {
            println!("  ! {}", notice.message);
        }
    }
    tracing::debug!("Replayed script in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    controller.save().context("Failed to save geometry")
}

fn with_spinner<T>(message: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let spinner = create_spinner(message);
    let start = Instant::now();
    let result = f();
    match &result {
        Ok(_) => spinner.finish_with_message(format!(
            "{} done [{:.1}s]",
            message.trim_end_matches("..."),
            start.elapsed().as_secs_f32()
        )),
        Err(_) => spinner.abandon_with_message(format!(
            "{} failed",
            message.trim_end_matches("...")
        )),
    }
    result
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
