//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. Input handling,
//! due timers, the physics step, merges and the loss check all run here, in
//! that order, on the caller's thread.

use super::game::Game;
use super::physics::PhysicsWorld;
use super::state::{GamePhase, Layout};
use crate::consts::SIM_DT;

/// Ticks a pending piece hovers before idle mode drops it
const IDLE_DROP_DELAY: u64 = 30;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer X in screen coordinates
    pub pointer_x: Option<f32>,
    /// Drop the pending piece (click/tap)
    pub drop: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a fresh run
    pub restart: bool,
    /// New host layout (resize, overlay moved)
    pub layout: Option<Layout>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the session by one fixed timestep
pub fn tick<W: PhysicsWorld>(game: &mut Game<W>, input: &TickInput) {
    if input.restart {
        game.reset();
        return;
    }

    // Handle pause toggle
    if input.pause {
        match game.state.phase {
            GamePhase::Playing => {
                game.state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => game.state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if game.state.phase != GamePhase::Playing {
        return;
    }

    game.state.time_ticks += 1;

    if let Some(layout) = input.layout {
        game.state.layout = layout;
    }

    if input.idle_mode {
        play_idle(game);
    }

    if let Some(x) = input.pointer_x {
        game.on_pointer_move(x);
    }
    if input.drop {
        game.on_drop();
    }

    // Drop cooldown elapsed
    if game
        .state
        .spawn_at
        .is_some_and(|at| game.state.time_ticks >= at)
    {
        game.state.spawn_at = None;
        game.spawn_next();
    }

    let started = game.world.step(SIM_DT);
    game.resolve_merges(&started);
    game.check_loss();
}

/// Sweep the pending piece across the field and drop it after a short hover
fn play_idle<W: PhysicsWorld>(game: &mut Game<W>) {
    let Some(piece) = game.state.pending_piece() else {
        return;
    };
    let hovered = game.state.time_ticks.saturating_sub(piece.created_at);

    // Add oscillating offset based on time to create variety
    let time_factor = game.state.time_ticks as f32 * 0.01;
    let sweep = (time_factor.sin() * 0.7) + (time_factor * 2.3).sin() * 0.3;
    let half = game.tuning.field_width / 2.0;
    game.place_pending(half + sweep * half);

    if hovered >= IDLE_DROP_DELAY {
        game.on_drop();
    }
}
