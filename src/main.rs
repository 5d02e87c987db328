//! Shardstage headless driver.
//!
//! Builds a stage from a JSON descriptor (or the built-in stage), commits
//! the arrangement as laid out, then runs a fixed number of 60 Hz frames
//! with a scripted walk and prints how the round went.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --walk right --frames 600
//! cargo run --release -- --stage stage.json --config stage.ini
//! ```

use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};

use shardstage::descriptor::StageDesc;
use shardstage::resources::input::InputFrame;
use shardstage::resources::stageconfig::StageConfig;
use shardstage::stage::Stage;

const FRAME_TIME: f64 = 1.0 / 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Walk {
    Left,
    Right,
    #[value(name = "none")]
    Stand,
}

/// Shardstage headless stage runner
#[derive(Parser)]
#[command(version, about = "Run a shardstage stage headless and report the outcome")]
struct Cli {
    /// Stage descriptor (JSON). Falls back to the built-in stage.
    #[arg(long, value_name = "PATH")]
    stage: Option<PathBuf>,

    /// Configuration file (INI). Defaults to ./stage.ini when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Direction the player holds for the whole run.
    #[arg(long, value_enum, default_value_t = Walk::Right)]
    walk: Walk,
}

fn load_stage_desc(path: Option<&Path>) -> StageDesc {
    let Some(path) = path else {
        return StageDesc::fallback();
    };
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
        .and_then(|text| StageDesc::from_json(&text));
    match loaded {
        Ok(desc) => desc,
        Err(e) => {
            warn!("{}; using the built-in stage", e);
            StageDesc::fallback()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = cli
        .config
        .clone()
        .map(StageConfig::with_path)
        .unwrap_or_default();
    if let Err(e) = config.load_from_file() {
        if cli.config.is_some() {
            warn!("{}; using defaults", e);
        } else {
            info!("{}; using defaults", e);
        }
    }

    let desc = load_stage_desc(cli.stage.as_deref());
    let mut stage = match Stage::new(config) {
        Ok(stage) => stage,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    stage.create_stage(&desc);

    let mut frames_run = 0;
    for frame_no in 0..cli.frames {
        let frame = InputFrame {
            left: cli.walk == Walk::Left,
            right: cli.walk == Walk::Right,
            // Any gameplay key commits the arrangement; "down" moves nothing.
            down: frame_no == 0,
            ..Default::default()
        };
        stage.update(frame, FRAME_TIME);
        frames_run += 1;
        if stage.load_stage_wait() || stage.load_select_wait() {
            break;
        }
    }

    println!("stage: {}", desc.name);
    println!("frames: {}", frames_run);
    println!("mode: {:?}", stage.mode());
    if let Some(cause) = stage.state().game_over_cause() {
        println!("game over: {:?}", cause);
    }
    println!("ground polygons: {}", stage.world_hitboxes().len());
    for (i, circle) in stage.player_collisions().iter().enumerate() {
        println!(
            "player {}: ({:.1}, {:.1})",
            i, circle.center.x, circle.center.y
        );
    }
}
