//! Same-tier fusion
//!
//! Two free pieces of equal tier that start touching are replaced by one piece
//! of the next tier at their midpoint.

use std::collections::BTreeSet;

use super::game::Game;
use super::physics::{BodyId, CollisionPair, PhysicsWorld};
use super::state::GameEvent;
use super::tiers;

impl<W: PhysicsWorld> Game<W> {
    /// Apply every eligible merge in a collision-start batch.
    ///
    /// Pairs are handled in reported order. A body consumed by an earlier pair
    /// is skipped in later ones, so three touching equal pieces fuse once.
    /// Returns the number of merges performed.
    pub fn resolve_merges(&mut self, pairs: &[CollisionPair]) -> usize {
        let mut consumed: BTreeSet<BodyId> = BTreeSet::new();
        let mut merges = 0;

        for pair in pairs {
            if pair.a == pair.b || consumed.contains(&pair.a) || consumed.contains(&pair.b) {
                continue;
            }
            // Walls, sensors and unknown bodies have no metadata
            let (Some(a), Some(b)) = (
                self.state.pieces.get(&pair.a),
                self.state.pieces.get(&pair.b),
            ) else {
                continue;
            };
            if a.pending || b.pending || a.tier != b.tier {
                continue;
            }
            // Terminal tier is inert on self-collision
            let Some(next) = a.tier().and_then(tiers::next_tier) else {
                continue;
            };
            let (Some(pos_a), Some(pos_b)) = (
                self.world.position(pair.a),
                self.world.position(pair.b),
            ) else {
                continue;
            };

            // Both sources leave the world before the result appears
            self.destroy_piece(pair.a);
            self.destroy_piece(pair.b);
            consumed.insert(pair.a);
            consumed.insert(pair.b);

            let pos = (pos_a + pos_b) * 0.5;
            let created = self.create_piece(pos, next, false);
            self.state.events.push(GameEvent::Merged {
                consumed: [pair.a, pair.b],
                created,
                tier: next.index,
                pos,
            });
            self.update_score(u64::from(next.index));
            merges += 1;

            log::debug!(
                "Merged {:?}+{:?} into {} ({:?}), score {}",
                pair.a,
                pair.b,
                next.name,
                created,
                self.state.score
            );
        }

        merges
    }
}
