//! Loss detection with a warning countdown
//!
//! `Clear -> Warning` when a settled, non-immune free piece pokes above the
//! warning line. `Warning -> Clear` as soon as that stops being true.
//! `Warning -> GameOver` if it is still true when the countdown expires.

use super::game::Game;
use super::physics::PhysicsWorld;
use super::state::{GameEvent, GamePhase, LossState};

impl<W: PhysicsWorld> Game<W> {
    /// True if any free, non-immune piece has come to rest with its top edge
    /// above the warning line
    pub fn any_settled_over_line(&self) -> bool {
        let now = self.state.time_ticks;
        let line = self.tuning.warning_line_y;
        let threshold = self.tuning.stable_speed_threshold;

        self.state
            .free_pieces()
            .filter(|p| !p.is_immune(now))
            .any(|p| {
                let (Some(pos), Some(speed), Some(radius)) = (
                    self.world.position(p.id),
                    self.world.speed(p.id),
                    p.radius(),
                ) else {
                    return false;
                };
                pos.y - radius < line && speed < threshold
            })
    }

    /// Advance the loss state machine; runs once per tick after merges
    pub fn check_loss(&mut self) {
        if self.state.phase != GamePhase::Playing {
            return;
        }

        let now = self.state.time_ticks;
        let over_line = self.any_settled_over_line();

        let loss = self.state.loss;
        match loss {
            LossState::Clear if over_line => {
                let deadline = now.saturating_add(self.tuning.warning_countdown_ticks());
                self.state.loss = LossState::Warning { deadline };
                self.state.events.push(GameEvent::WarningArmed { deadline });
                log::debug!("Warning armed at tick {}, deadline {}", now, deadline);
            }
            LossState::Warning { .. } if !over_line => {
                self.state.loss = LossState::Clear;
                self.state.events.push(GameEvent::WarningCleared);
                log::debug!("Warning cleared at tick {}", now);
            }
            LossState::Warning { deadline, .. } if now >= deadline => {
                self.end_game();
            }
            _ => {}
        }
    }
}
