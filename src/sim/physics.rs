//! Physics engine seam
//!
//! The rules layer never touches an engine's body objects directly. It talks to
//! a [`PhysicsWorld`] through opaque [`BodyId`]s and keeps its own metadata in a
//! side table keyed by those ids.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Engine-assigned body identifier (never reused within one world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned rectangle
    Rect { half_extents: Vec2 },
}

/// Surface response constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.1,
        }
    }
}

/// Everything needed to create a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub shape: Shape,
    pub pos: Vec2,
    pub is_static: bool,
    /// Sensors report contacts but never push anything
    pub is_sensor: bool,
    pub material: Material,
}

impl BodyDesc {
    pub fn circle(pos: Vec2, radius: f32) -> Self {
        Self {
            shape: Shape::Circle { radius },
            pos,
            is_static: false,
            is_sensor: false,
            material: Material::default(),
        }
    }

    /// Static rectangle centered at `pos`
    pub fn rect(pos: Vec2, size: Vec2) -> Self {
        Self {
            shape: Shape::Rect {
                half_extents: size * 0.5,
            },
            pos,
            is_static: true,
            is_sensor: false,
            material: Material::default(),
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

/// Two bodies that started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionPair {
    pub a: BodyId,
    pub b: BodyId,
}

impl CollisionPair {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        Self { a, b }
    }

    /// Same pair with ids in ascending order
    pub fn ordered(self) -> Self {
        if self.a <= self.b {
            self
        } else {
            Self { a: self.b, b: self.a }
        }
    }
}

/// Read-only body snapshot for renderers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    pub id: BodyId,
    pub shape: Shape,
    pub pos: Vec2,
    pub is_static: bool,
    pub is_sensor: bool,
}

/// Operations the rules layer needs from a rigid-body engine
pub trait PhysicsWorld {
    /// Add a body and return its id
    fn insert(&mut self, desc: BodyDesc) -> BodyId;

    /// Remove a body; `false` if it was not present
    fn remove(&mut self, id: BodyId) -> bool;

    /// Remove every body
    fn clear(&mut self);

    fn set_position(&mut self, id: BodyId, pos: Vec2);

    fn set_velocity(&mut self, id: BodyId, vel: Vec2);

    /// Switch between static (immovable, unaffected by gravity) and dynamic
    fn set_static(&mut self, id: BodyId, is_static: bool);

    fn position(&self, id: BodyId) -> Option<Vec2>;

    /// Scalar speed in pixels per second
    fn speed(&self, id: BodyId) -> Option<f32>;

    /// Advance by `dt` seconds and report the pairs that started touching.
    ///
    /// Sensor contacts are reported too. Two static bodies never collide.
    fn step(&mut self, dt: f32) -> Vec<CollisionPair>;

    /// Number of bodies in the world
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all bodies, ordered by id
    fn bodies(&self) -> Vec<BodyView>;
}
