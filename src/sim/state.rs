//! Game state and core simulation types
//!
//! The physics world owns every body. What the rules layer knows about a body
//! lives here, in a side table keyed by [`BodyId`].

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::BodyId;
use super::tiers::{self, Tier};
use crate::consts::FIELD_WIDTH;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation stepping, input accepted
    Playing,
    /// Game is paused
    Paused,
    /// Run ended; only a reset leaves this phase
    GameOver,
}

/// Loss monitor state while playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossState {
    /// No settled piece above the line
    Clear,
    /// A settled piece is above the line; the run ends at `deadline` unless it clears
    Warning { deadline: u64 },
}

/// Rules-layer metadata for one fruit body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: BodyId,
    /// Index into the tier table
    pub tier: u8,
    /// Player-controlled, static, awaiting a drop
    pub pending: bool,
    /// Excluded from loss checks before this tick
    pub immune_until: Option<u64>,
    /// Tick the piece entered the world
    pub created_at: u64,
}

impl Piece {
    /// Tier table entry; `None` if `tier` is out of range (corrupt snapshot)
    pub fn tier(&self) -> Option<&'static Tier> {
        tiers::tier(self.tier)
    }

    pub fn radius(&self) -> Option<f32> {
        self.tier().map(|t| t.radius)
    }

    /// Released into the simulation
    pub fn is_free(&self) -> bool {
        !self.pending
    }

    pub fn is_immune(&self, now: u64) -> bool {
        self.immune_until.is_some_and(|until| now < until)
    }
}

/// Host layout the input mapping and spawn position depend on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Left edge of the play field on screen
    pub viewport_left: f32,
    /// On-screen width of the play field (device pixels)
    pub viewport_width: f32,
    /// Bottom of any overlay drawn over the top of the field (field units)
    pub overlay_bottom: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            viewport_left: 0.0,
            viewport_width: FIELD_WIDTH,
            overlay_bottom: 0.0,
        }
    }
}

impl Layout {
    /// Map a screen X coordinate to field units
    pub fn screen_to_field_x(&self, screen_x: f32, field_width: f32) -> f32 {
        let local = screen_x - self.viewport_left;
        if self.viewport_width > 0.0 {
            local * field_width / self.viewport_width
        } else {
            local
        }
    }
}

/// Things that happened during a tick, for HUD/audio hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// World cleared and rebuilt
    Reset,
    PieceSpawned { id: BodyId, tier: u8 },
    PieceDropped { id: BodyId, x: f32 },
    Merged {
        consumed: [BodyId; 2],
        created: BodyId,
        tier: u8,
        pos: Vec2,
    },
    ScoreChanged { score: u64 },
    WarningArmed { deadline: u64 },
    WarningCleared,
    GameOver { score: u64 },
}

/// Complete rules-layer state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn RNG
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub score: u64,
    pub phase: GamePhase,
    pub loss: LossState,
    /// Fruit metadata, by body id
    pub pieces: BTreeMap<BodyId, Piece>,
    /// The single player-controlled piece, if any
    pub pending: Option<BodyId>,
    /// Drop gate
    pub can_drop: bool,
    /// Tick at which the next piece spawns
    pub spawn_at: Option<u64>,
    pub layout: Layout,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            score: 0,
            phase: GamePhase::Playing,
            loss: LossState::Clear,
            pieces: BTreeMap::new(),
            pending: None,
            can_drop: false,
            spawn_at: None,
            layout: Layout::default(),
            events: Vec::new(),
        }
    }

    /// Back to a fresh run. The RNG stream and host layout carry over.
    pub fn reset(&mut self) {
        let rng = self.rng.clone();
        let layout = self.layout;
        *self = Self::new(self.seed);
        self.rng = rng;
        self.layout = layout;
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn warning_active(&self) -> bool {
        matches!(self.loss, LossState::Warning { .. })
    }

    pub fn warning_deadline(&self) -> Option<u64> {
        match self.loss {
            LossState::Warning { deadline, .. } => Some(deadline),
            LossState::Clear => None,
        }
    }

    /// Pieces released into the simulation, by id
    pub fn free_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values().filter(|p| p.is_free())
    }

    pub fn pending_piece(&self) -> Option<&Piece> {
        self.pending.and_then(|id| self.pieces.get(&id))
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
