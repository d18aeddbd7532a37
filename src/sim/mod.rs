//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod game;
pub mod loss;
pub mod merge;
pub mod physics;
pub mod placement;
pub mod state;
pub mod tick;
pub mod tiers;
pub mod world;

#[cfg(test)]
pub(crate) mod testing;

pub use game::{Boundaries, Game};
pub use physics::{BodyDesc, BodyId, BodyView, CollisionPair, Material, PhysicsWorld, Shape};
pub use state::{GameEvent, GamePhase, GameState, Layout, LossState, Piece};
pub use tick::{TickInput, tick};
pub use tiers::{MAX_TIER, TIER_COUNT, TIERS, Tier, next_tier, tier};
pub use world::RapierWorld;
