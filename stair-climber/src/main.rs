//! stair-climber - plan and climb the competition staircase
//!
//! # Usage
//!
//! ```bash
//! # Show the route the configured path finder takes
//! stair-climber --config stair-climber.toml plan
//!
//! # Drive the robot over the serial link
//! stair-climber --config stair-climber.toml climb
//!
//! # Run the whole climb against a simulated drive
//! stair-climber climb --dry-run
//! ```

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stair_climber::{
    survey, Config, CourseLayout, LogSpeaker, Navigation, PathFinderType, Result, StairsArea,
};
use tinyk_io::{MockTransport, SerialTransport, Transport};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path finder for the surveyed map, overrides the configuration
    #[arg(long, value_enum)]
    path_finder: Option<PathFinderType>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the surveyed map and the planned route
    Plan,
    /// Climb the stairs
    Climb {
        /// Use a simulated drive that completes every command
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(finder) = args.path_finder {
        config.planning.path_finder = finder;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .format(|buf, record| {
        writeln!(
            buf,
            "[{}] {} - {}",
            record.level(),
            record.target(),
            record.args()
        )
    })
    .init();

    log::info!("stair-climber starting...");
    log::info!(
        "  Stairs: {} steps of {}cm",
        config.stairs.step_count,
        config.stairs.step_width_cm
    );
    for (role, finder) in [
        ("Path finder", config.planning.path_finder),
        ("Sensor path finder", config.planning.sensor_path_finder),
    ] {
        log::info!("  {}: {} ({})", role, finder, finder.description());
    }

    match args.command {
        Command::Plan => plan(&config),
        Command::Climb { dry_run: true } => {
            log::info!("Dry run, no commands reach the drive");
            climb(MockTransport::auto_complete(), &config)
        }
        Command::Climb { dry_run: false } => {
            let transport = SerialTransport::open(config.serial.clone())?;
            climb(transport, &config)
        }
    }
}

fn plan(config: &Config) -> Result<()> {
    let survey = survey(&mut CourseLayout::from_config(config), config)?;

    println!("{}", survey.map.render(survey.path.as_ref()));
    match &survey.path {
        Some(path) => println!("{}", path),
        None => println!("No path found, the sensor plan would be used"),
    }
    Ok(())
}

fn climb<T: Transport>(transport: T, config: &Config) -> Result<()> {
    let survey = survey(&mut CourseLayout::from_config(config), config)?;
    let mut navigation = Navigation::with_transport(transport, Box::new(LogSpeaker));

    let init = navigation.initialize()?;
    if !init.success {
        log::warn!("Drive did not initialize cleanly: {:?}", init.error);
    }

    let mut area = StairsArea::new(survey.map, navigation, config);
    area.formulate_plan(survey.path);
    let outcome = area.climb();
    area.navigation_mut().shutdown();

    match &outcome {
        Ok(()) => log::info!("stair-climber finished at the goal"),
        Err(e) => log::error!("Climb aborted: {}", e),
    }
    outcome
}
