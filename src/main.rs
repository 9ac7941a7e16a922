//! # Roomforge Command Line
//!
//! Generates validated rooms or complete levels and prints them as text.

use clap::{Parser, Subcommand};
use log::info;
use roomforge::{
    find_regions, generate_complete_level, generate_validated_room, ConfigFile, ForgeResult,
    LayoutType, LevelGraph, MovementAttributes, Room, TraversalVerifier,
};
use std::path::PathBuf;

/// Command line arguments for Roomforge.
#[derive(Parser, Debug)]
#[command(name = "roomforge")]
#[command(about = "Procedural platformer rooms that are proven beatable")]
#[command(version)]
struct Args {
    /// JSON configuration file; built-in defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a single validated room
    Room {
        /// Random seed; overrides the configuration file
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of exit doors
        #[arg(long, default_value_t = 1)]
        exits: usize,

        /// Distance from the level start, drives difficulty
        #[arg(long, default_value_t = 0)]
        depth: u32,

        /// Print the tile grid
        #[arg(long)]
        ascii: bool,
    },
    /// Generate a complete multi-room level
    Level {
        /// Random seed; overrides the configuration file
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of rooms
        #[arg(long)]
        rooms: Option<usize>,

        /// Graph layout (linear, branching, looping)
        #[arg(long)]
        layout: Option<LayoutType>,

        /// Print every room's tile grid
        #[arg(long)]
        ascii: bool,
    },
}

fn main() -> ForgeResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Roomforge v{}", roomforge::VERSION);

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ConfigFile::load(path)?
        }
        None => ConfigFile::default(),
    };

    match args.command {
        Command::Room {
            seed,
            exits,
            depth,
            ascii,
        } => {
            if let Some(seed) = seed {
                config.generation.seed = seed;
            }
            config.validate()?;

            let room = generate_validated_room(&config.generation, &config.movement, depth, exits);
            print_room("room", &room, &config.movement, ascii);
        }
        Command::Level {
            seed,
            rooms,
            layout,
            ascii,
        } => {
            if let Some(layout) = layout {
                config.level.layout_type = layout;
                if layout != LayoutType::Linear {
                    // Side rooms need a spare exit
                    config.level.exit_doors_per_room = config.level.exit_doors_per_room.max(2);
                }
            }
            if let Some(rooms) = rooms {
                config.level.num_rooms = rooms;
            }
            let seed = seed.unwrap_or(config.generation.seed);
            config.validate()?;

            let level =
                generate_complete_level(&config.generation, &config.level, &config.movement, seed);
            print_level(&level, &config.movement, ascii);
        }
    }

    Ok(())
}

/// Initializes logging at the given level.
///
/// With `dev-tools` a tracing subscriber collects both spans and log records.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new().parse_filters(log_level).init();
    }
}

fn print_room(room_id: &str, room: &Room, attrs: &MovementAttributes, ascii: bool) {
    let (width, height) = room.size();
    println!(
        "{}: {}x{} difficulty {} depth {} enemy density {:.3}",
        room_id,
        width,
        height,
        room.difficulty_rating,
        room.depth_from_start,
        room.enemy_density
    );
    if let Some(spawn) = room.player_spawn {
        println!("  spawn {}", spawn);
    }
    for door in room.doors.values() {
        println!("  door {} {:?} at {}", door.id, door.door_type, door.position);
    }
    println!("  {} spawn areas", room.spawn_areas.len());
    println!("  {} air regions", find_regions(room).len());
    match TraversalVerifier::new(room, *attrs).verify() {
        Ok(()) => println!("  traversable"),
        Err(failure) => println!("  not traversable: {}", failure),
    }
    if ascii {
        print!("{}", room);
    }
}

fn print_level(level: &LevelGraph, attrs: &MovementAttributes, ascii: bool) {
    println!(
        "level seed {} start {} goal {}",
        level.seed,
        level.start_room_id.as_deref().unwrap_or("-"),
        level.goal_room_id.as_deref().unwrap_or("-")
    );
    for room_id in level.room_ids() {
        if let Some(room) = level.get_room(room_id) {
            print_room(room_id, room, attrs, ascii);
        }
    }
    for room_id in level.room_ids() {
        println!("{} -> [{}]", room_id, level.neighbors(room_id).join(", "));
    }
    for link in &level.door_links {
        println!(
            "link {}:{} -> {}:{} [{}]",
            link.from_room_id, link.from_door_id, link.to_room_id, link.to_door_id, link.choice_label
        );
    }
    if let Some(path) = level.shortest_path_to_goal() {
        println!("path {}", path.join(" -> "));
    }
}
