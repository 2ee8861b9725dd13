use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use trailog_core::*;

#[derive(Parser)]
#[command(name = "trailog")]
#[command(about = "Personal running and cycling log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a new workout
    Log {
        /// Workout type (running, cycling)
        kind: String,

        /// Distance in km
        #[arg(long, allow_hyphen_values = true)]
        distance: String,

        /// Duration in minutes
        #[arg(long, allow_hyphen_values = true)]
        duration: String,

        /// Cadence in steps per minute (running)
        #[arg(long, allow_hyphen_values = true)]
        cadence: Option<String>,

        /// Elevation gain in meters (cycling)
        #[arg(long, allow_hyphen_values = true)]
        elevation: Option<String>,

        /// Latitude of the workout (defaults to location.home)
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the workout (defaults to location.home)
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },

    /// List logged workouts, newest first
    List,

    /// Print a map marker for every workout
    Markers,

    /// Show one workout and a map link to it
    Show {
        /// Workout id
        id: String,
    },

    /// Import workouts from an exported log file
    Import {
        /// Path to the exported JSON file
        file: PathBuf,
    },

    /// Delete the whole workout log
    Reset,
}

fn main() -> Result<()> {
    // Initialize logging
    trailog_core::logging::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_or_default(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.data_dir {
        config.data.data_dir = dir;
    }

    let storage = FileStorage::new(config.workouts_path());
    tracing::debug!("Using workout log at {:?}", storage.path());
    let codec = PersistenceCodec::new(storage);

    match cli.command {
        Commands::Log {
            kind,
            distance,
            duration,
            cadence,
            elevation,
            lat,
            lng,
        } => {
            let cadence_or_elevation = if kind.trim().eq_ignore_ascii_case("cycling") {
                elevation
            } else {
                cadence
            };
            let form = WorkoutForm {
                kind,
                distance,
                duration,
                cadence_or_elevation: cadence_or_elevation.unwrap_or_default(),
            };
            let position = lat.zip(lng).map(|(lat, lng)| Coordinates::new(lat, lng));
            cmd_log(codec, &form, position, &config)
        }
        Commands::List => cmd_list(codec),
        Commands::Markers => cmd_markers(codec),
        Commands::Show { id } => cmd_show(codec, &id, &config),
        Commands::Import { file } => cmd_import(codec, &file),
        Commands::Reset => cmd_reset(codec),
    }
}

fn cmd_log(
    codec: PersistenceCodec<FileStorage>,
    form: &WorkoutForm,
    position: Option<Coordinates>,
    config: &Config,
) -> Result<()> {
    // Strict open: never overwrite a log we could not read
    let mut session = Session::open(codec)?;

    let mut locator = FixedLocation::new(position.or(config.location.home));
    let coords = locator.request_position()?;

    let workout = session.record(form, coords)?;
    display_workout(workout);
    println!("✓ Workout logged!");
    Ok(())
}

fn cmd_list(codec: PersistenceCodec<FileStorage>) -> Result<()> {
    let session = Session::open_or_empty(codec);
    let store = session.store();

    if store.is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }

    for workout in store.all().rev() {
        display_workout(workout);
    }
    Ok(())
}

fn cmd_markers(codec: PersistenceCodec<FileStorage>) -> Result<()> {
    let session = Session::open_or_empty(codec);
    let mut renderer = TextMapRenderer;
    session.render_markers(&mut renderer)
}

fn cmd_show(codec: PersistenceCodec<FileStorage>, id: &str, config: &Config) -> Result<()> {
    let session = Session::open(codec)?;
    let workout = session.store().find_by_id(id)?;

    display_workout(workout);
    println!(
        "  Logged: {}",
        workout
            .created_at()
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
    );
    println!("  Map: {}", map_link(workout.coords(), config.map.zoom_level));
    Ok(())
}

fn cmd_import(codec: PersistenceCodec<FileStorage>, file: &Path) -> Result<()> {
    let blob = std::fs::read_to_string(file)?;
    let mut session = Session::open(codec)?;
    let count = session.import(&blob)?;

    println!("✓ Imported {} workouts", count);
    Ok(())
}

fn cmd_reset(codec: PersistenceCodec<FileStorage>) -> Result<()> {
    let mut session = Session::open_or_empty(codec);
    session.reset()?;

    println!("✓ Workout log cleared");
    Ok(())
}

/// Prints one line per marker instead of drawing a map
struct TextMapRenderer;

impl MapRenderer for TextMapRenderer {
    fn place_marker(&mut self, coords: Coordinates, popup_text: &str, icon: Icon) -> Result<()> {
        println!(
            "📍 [{}] {} {} ({})",
            coords,
            icon_glyph(icon),
            popup_text,
            icon.tag()
        );
        Ok(())
    }
}

fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Runner => "🏃",
        Icon::Cyclist => "🚴",
    }
}

fn map_link(coords: Coordinates, zoom: u8) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={zoom}/{lat}/{lng}",
        lat = coords.lat,
        lng = coords.lng,
        zoom = zoom
    )
}

fn display_workout(workout: &Workout) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} {}", icon_glyph(workout.icon()), workout.description());
    println!("╰─────────────────────────────────────────╯");
    println!("  id: {}", workout.id());
    println!(
        "  {} {} km   ⏱ {} min",
        icon_glyph(workout.icon()),
        workout.distance_km(),
        workout.duration_min()
    );

    match *workout.detail() {
        WorkoutDetail::Running {
            cadence_spm,
            pace_min_per_km,
        } => {
            println!("  ⚡ {:.1} min/km   🦶 {} spm", pace_min_per_km, cadence_spm);
        }
        WorkoutDetail::Cycling {
            elevation_gain_m,
            speed_kmh,
        } => {
            println!("  ⚡ {:.1} km/h   ⛰ {} m", speed_kmh, elevation_gain_m);
        }
    }
    println!();
}
