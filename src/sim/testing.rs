//! Scripted physics world for rules tests
//!
//! Bodies never move on their own. Each `step` returns the next queued
//! collision batch, so tests decide exactly what touches when.

use std::collections::{BTreeMap, VecDeque};

use glam::Vec2;

use super::physics::{BodyDesc, BodyId, BodyView, CollisionPair, PhysicsWorld};

#[derive(Debug, Clone)]
struct ScriptedBody {
    desc: BodyDesc,
    vel: Vec2,
}

#[derive(Debug, Clone)]
pub struct ScriptedWorld {
    bodies: BTreeMap<BodyId, ScriptedBody>,
    batches: VecDeque<Vec<CollisionPair>>,
    next_id: u32,
    pub steps: u64,
}

impl Default for ScriptedWorld {
    fn default() -> Self {
        Self {
            bodies: BTreeMap::new(),
            batches: VecDeque::new(),
            next_id: 1,
            steps: 0,
        }
    }
}

impl ScriptedWorld {
    /// Queue a collision batch for a future step
    pub fn queue(&mut self, pairs: Vec<CollisionPair>) {
        self.batches.push_back(pairs);
    }

    pub fn is_static(&self, id: BodyId) -> bool {
        self.bodies.get(&id).is_some_and(|b| b.desc.is_static)
    }

    pub fn is_sensor(&self, id: BodyId) -> bool {
        self.bodies.get(&id).is_some_and(|b| b.desc.is_sensor)
    }
}

impl PhysicsWorld for ScriptedWorld {
    fn insert(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, ScriptedBody { desc, vel: Vec2::ZERO });
        id
    }

    fn remove(&mut self, id: BodyId) -> bool {
        self.bodies.remove(&id).is_some()
    }

    fn clear(&mut self) {
        self.bodies.clear();
    }

    fn set_position(&mut self, id: BodyId, pos: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.desc.pos = pos;
        }
    }

    fn set_velocity(&mut self, id: BodyId, vel: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.vel = vel;
        }
    }

    fn set_static(&mut self, id: BodyId, is_static: bool) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.desc.is_static = is_static;
            body.vel = Vec2::ZERO;
        }
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.desc.pos)
    }

    fn speed(&self, id: BodyId) -> Option<f32> {
        self.bodies.get(&id).map(|b| b.vel.length())
    }

    fn step(&mut self, _dt: f32) -> Vec<CollisionPair> {
        self.steps += 1;
        self.batches.pop_front().unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.bodies.len()
    }

    fn bodies(&self) -> Vec<BodyView> {
        self.bodies
            .iter()
            .map(|(&id, b)| BodyView {
                id,
                shape: b.desc.shape,
                pos: b.desc.pos,
                is_static: b.desc.is_static,
                is_sensor: b.desc.is_sensor,
            })
            .collect()
    }
}
