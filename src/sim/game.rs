//! Game session: world, rules state and the operations that create pieces
//!
//! A [`Game`] owns the physics world and the rules state together. Nothing is
//! global; the host drives it with [`tick`](super::tick::tick).

use glam::Vec2;
use rand::Rng;

use super::physics::{BodyDesc, BodyId, Material, PhysicsWorld};
use super::state::{GameEvent, GamePhase, GameState, Piece};
use super::tiers::{self, Tier};
use crate::tuning::Tuning;

/// Static bodies framing the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundaries {
    pub ground: BodyId,
    pub left_wall: BodyId,
    pub right_wall: BodyId,
    /// Sensor along the warning line (never blocks pieces)
    pub warning_line: BodyId,
}

impl Boundaries {
    pub fn contains(&self, id: BodyId) -> bool {
        [self.ground, self.left_wall, self.right_wall, self.warning_line].contains(&id)
    }
}

/// One play session over a physics world
#[derive(Debug, Clone)]
pub struct Game<W> {
    pub world: W,
    pub state: GameState,
    pub tuning: Tuning,
    pub boundaries: Boundaries,
}

impl<W: PhysicsWorld> Game<W> {
    /// Start a session: builds the field and spawns the first piece
    pub fn new(world: W, tuning: Tuning, seed: u64) -> Self {
        let mut game = Self {
            world,
            state: GameState::new(seed),
            tuning: tuning.sanitized(),
            boundaries: Boundaries {
                ground: BodyId(0),
                left_wall: BodyId(0),
                right_wall: BodyId(0),
                warning_line: BodyId(0),
            },
        };
        game.reset();
        game
    }

    /// Reset to a fresh run from any phase.
    ///
    /// Clears the world, drops every outstanding timer, rebuilds the field and
    /// spawns one pending piece.
    pub fn reset(&mut self) {
        self.world.clear();
        self.state.reset();
        self.boundaries = self.build_boundaries();
        self.state.events.push(GameEvent::Reset);
        self.state.events.push(GameEvent::ScoreChanged { score: 0 });
        log::info!("New run (seed {})", self.state.seed);
        self.spawn_next();
    }

    fn build_boundaries(&mut self) -> Boundaries {
        let t = &self.tuning;
        let (w, h) = (t.field_width, t.field_height);
        let ground = BodyDesc::rect(
            Vec2::new(w / 2.0, h - t.ground_height / 2.0),
            Vec2::new(w, t.ground_height),
        );
        let left = BodyDesc::rect(Vec2::new(0.0, h / 2.0), Vec2::new(t.wall_thickness, h));
        let right = BodyDesc::rect(Vec2::new(w, h / 2.0), Vec2::new(t.wall_thickness, h));
        let line = BodyDesc::rect(Vec2::new(w / 2.0, t.warning_line_y), Vec2::new(w, 2.0))
            .with_sensor(true);

        Boundaries {
            ground: self.world.insert(ground),
            left_wall: self.world.insert(left),
            right_wall: self.world.insert(right),
            warning_line: self.world.insert(line),
        }
    }

    /// Create a fruit body of `tier` at `pos` and register its metadata
    pub fn create_piece(&mut self, pos: Vec2, tier: &Tier, is_static: bool) -> BodyId {
        let material = Material {
            restitution: self.tuning.restitution,
            friction: self.tuning.friction,
        };
        let desc = BodyDesc::circle(pos, tier.radius)
            .with_static(is_static)
            .with_material(material);
        let id = self.world.insert(desc);
        self.state.pieces.insert(
            id,
            Piece {
                id,
                tier: tier.index,
                pending: false,
                immune_until: None,
                created_at: self.state.time_ticks,
            },
        );
        id
    }

    /// Remove a fruit from the world and the side table
    pub fn destroy_piece(&mut self, id: BodyId) {
        self.world.remove(id);
        self.state.pieces.remove(&id);
        if self.state.pending == Some(id) {
            self.state.pending = None;
        }
    }

    /// Spawn the next player-controlled piece.
    ///
    /// No-op once the run has ended or while a pending piece already exists.
    pub fn spawn_next(&mut self) {
        if self.state.is_ended() || self.state.pending.is_some() {
            return;
        }

        let index = self.state.rng.random_range(0..self.tuning.spawn_tier_count);
        let Some(tier) = tiers::tier(index) else {
            return;
        };
        let pos = Vec2::new(self.tuning.field_width / 2.0, self.hover_y(tier.radius));
        let id = self.create_piece(pos, tier, true);
        if let Some(piece) = self.state.pieces.get_mut(&id) {
            piece.pending = true;
        }
        self.state.pending = Some(id);
        self.state.can_drop = true;
        self.state.events.push(GameEvent::PieceSpawned { id, tier: tier.index });
        log::debug!("Spawned {} ({:?}) at {:?}", tier.name, id, pos);
    }

    /// Y where a pending piece of `radius` hovers.
    ///
    /// Its top clears the overlay and its bottom stays above the warning line
    /// by the hover margin. When both cannot hold, clearing the overlay wins.
    pub fn hover_y(&self, radius: f32) -> f32 {
        let top_limit = self.state.layout.overlay_bottom + radius;
        let bottom_limit = self.tuning.warning_line_y - self.tuning.hover_margin - radius;
        if top_limit <= bottom_limit {
            (top_limit + bottom_limit) / 2.0
        } else {
            top_limit
        }
    }

    /// Add merge points to the score
    pub fn update_score(&mut self, delta: u64) {
        self.state.score += delta;
        self.state.events.push(GameEvent::ScoreChanged {
            score: self.state.score,
        });
    }

    /// Terminal transition; stops stepping until the next reset
    pub(crate) fn end_game(&mut self) {
        if self.state.is_ended() {
            return;
        }
        self.state.phase = GamePhase::GameOver;
        self.state.loss = super::state::LossState::Clear;
        self.state.can_drop = false;
        self.state.spawn_at = None;
        self.state.events.push(GameEvent::GameOver {
            score: self.state.score,
        });
        log::info!(
            "Game over at tick {} with score {}",
            self.state.time_ticks,
            self.state.score
        );
    }
}
