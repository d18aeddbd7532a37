//! Fruit Merge entry point
//!
//! Native headless shell: runs a session in idle/demo mode on the rapier2d
//! physics world and logs what happens.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use fruit_merge::Tuning;
use fruit_merge::consts::SIM_HZ;
use fruit_merge::render::Scene;
use fruit_merge::sim::{Game, GameEvent, RapierWorld, TickInput, tick};

#[derive(Debug, Parser)]
#[command(version, about = "Headless fruit merge demo")]
struct Args {
    /// RNG seed for the run
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Simulated seconds to play
    #[arg(long, default_value_t = 120)]
    seconds: u64,
    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let json = args
        .tuning
        .as_ref()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("reading tuning file {}", path.display()))
        })
        .transpose()?;
    let tuning = Tuning::load(json.as_deref());

    log::info!("Fruit Merge (native) starting, seed {}", args.seed);
    let mut game = Game::new(RapierWorld::new(tuning.gravity), tuning, args.seed);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let total_ticks = args.seconds * SIM_HZ;
    for _ in 0..total_ticks {
        tick(&mut game, &input);
        for event in game.state.drain_events() {
            match event {
                GameEvent::Merged { tier, pos, .. } => {
                    log::info!("Merge -> tier {} at ({:.0}, {:.0})", tier, pos.x, pos.y)
                }
                GameEvent::WarningArmed { .. } => log::warn!("Piece resting above the line!"),
                GameEvent::WarningCleared => log::info!("Warning cleared"),
                other => log::debug!("{:?}", other),
            }
        }
        if game.state.is_ended() {
            break;
        }
    }

    let scene = Scene::capture(&game);
    let seconds = game.state.time_ticks as f64 / SIM_HZ as f64;
    println!(
        "{} after {:.1}s: score {}, {} pieces on the field",
        if scene.hud.game_over_visible {
            "Game over"
        } else {
            "Stopped"
        },
        seconds,
        scene.hud.score,
        game.state.free_pieces().count()
    );
    Ok(())
}
