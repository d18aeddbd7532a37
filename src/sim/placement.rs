//! Player control of the pending piece

use glam::Vec2;

use super::game::Game;
use super::physics::PhysicsWorld;
use super::state::GameEvent;

impl<W: PhysicsWorld> Game<W> {
    /// Follow the pointer with the pending piece (screen X coordinate)
    pub fn on_pointer_move(&mut self, screen_x: f32) {
        let field_x = self
            .state
            .layout
            .screen_to_field_x(screen_x, self.tuning.field_width);
        self.place_pending(field_x);
    }

    /// Move the pending piece to `field_x`, clamped inside the field.
    ///
    /// The hover height is recomputed because the overlay may have moved.
    pub fn place_pending(&mut self, field_x: f32) {
        if self.state.is_ended() {
            return;
        }
        let Some((id, Some(radius))) = self.state.pending_piece().map(|p| (p.id, p.radius()))
        else {
            return;
        };

        let width = self.tuning.field_width;
        let x = if 2.0 * radius <= width {
            field_x.clamp(radius, width - radius)
        } else {
            width / 2.0
        };
        let y = self.hover_y(radius);
        self.world.set_position(id, Vec2::new(x, y));
    }

    /// Release the pending piece into the simulation.
    ///
    /// Returns `false` when there is nothing to drop, the gate is closed or
    /// the run has ended.
    pub fn on_drop(&mut self) -> bool {
        if self.state.is_ended() || !self.state.can_drop {
            return false;
        }
        let Some(id) = self.state.pending else {
            return false;
        };

        let now = self.state.time_ticks;
        self.state.can_drop = false;
        self.world.set_static(id, false);
        if let Some(piece) = self.state.pieces.get_mut(&id) {
            piece.pending = false;
            piece.immune_until = Some(now.saturating_add(self.tuning.immunity_ticks()));
        }
        self.state.pending = None;
        self.state.spawn_at = Some(now.saturating_add(self.tuning.drop_cooldown_ticks()));

        let x = self.world.position(id).map_or(0.0, |p| p.x);
        self.state.events.push(GameEvent::PieceDropped { id, x });
        log::debug!("Dropped {:?} at x={:.1} (tick {})", id, x, now);
        true
    }
}
