//! rapier2d-backed world
//!
//! Wraps a rapier2d pipeline behind [`PhysicsWorld`]. rapier owns body and
//! collider storage; this type maps our [`BodyId`]s to rapier handles and turns
//! `CollisionEvent::Started` into [`CollisionPair`]s.
//!
//! rapier2d is built with `enhanced-determinism`, so a fixed timestep plus the
//! id-ordered bookkeeping here replays identically on the same platform.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use rapier2d::prelude::*;

use super::physics::{BodyDesc, BodyId, BodyView, CollisionPair, PhysicsWorld, Shape};

/// rapier tolerances are tuned for meters; the field is measured in pixels
const PIXELS_PER_METER: Real = 100.0;

/// Our view of one registered body
#[derive(Debug, Clone, Copy)]
struct Entry {
    body: RigidBodyHandle,
    shape: Shape,
    is_sensor: bool,
}

/// Gravity-driven world implementing [`PhysicsWorld`] on top of rapier2d
pub struct RapierWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    entries: BTreeMap<BodyId, Entry>,
    /// Maps rapier ColliderHandle -> BodyId for collision lookup
    collider_to_body: HashMap<ColliderHandle, BodyId>,
    next_id: u32,
}

impl RapierWorld {
    /// Create an empty world with downward gravity (pixels/s²)
    pub fn new(gravity: f32) -> Self {
        let integration_params = IntegrationParameters {
            length_unit: PIXELS_PER_METER,
            ..IntegrationParameters::default()
        };
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![0.0, gravity],
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            entries: BTreeMap::new(),
            collider_to_body: HashMap::new(),
            next_id: 1,
        }
    }

    fn rigid_body(&self, id: BodyId) -> Option<&RigidBody> {
        let entry = self.entries.get(&id)?;
        self.rigid_body_set.get(entry.body)
    }

    fn rigid_body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let entry = self.entries.get(&id)?;
        self.rigid_body_set.get_mut(entry.body)
    }
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new(crate::tuning::Tuning::default().gravity)
    }
}

impl PhysicsWorld for RapierWorld {
    fn insert(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let translation = vector![desc.pos.x, desc.pos.y];
        let rb = if desc.is_static {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        }
        .translation(translation)
        .ccd_enabled(matches!(desc.shape, Shape::Circle { .. }))
        .build();
        let body = self.rigid_body_set.insert(rb);

        let shape = match desc.shape {
            Shape::Circle { radius } => SharedShape::ball(radius),
            Shape::Rect { half_extents } => SharedShape::cuboid(half_extents.x, half_extents.y),
        };
        let collider = ColliderBuilder::new(shape)
            .restitution(desc.material.restitution)
            .friction(desc.material.friction)
            .sensor(desc.is_sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider =
            self.collider_set
                .insert_with_parent(collider, body, &mut self.rigid_body_set);

        self.collider_to_body.insert(collider, id);
        self.entries.insert(
            id,
            Entry {
                body,
                shape: desc.shape,
                is_sensor: desc.is_sensor,
            },
        );
        id
    }

    fn remove(&mut self, id: BodyId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        self.rigid_body_set.remove(
            entry.body,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.collider_to_body.retain(|_, body| *body != id);
        true
    }

    fn clear(&mut self) {
        // Fresh rapier state; ids keep counting up
        let next_id = self.next_id;
        *self = Self::new(self.gravity.y);
        self.next_id = next_id;
    }

    fn set_position(&mut self, id: BodyId, pos: Vec2) {
        if let Some(rb) = self.rigid_body_mut(id) {
            rb.set_translation(vector![pos.x, pos.y], true);
        }
    }

    fn set_velocity(&mut self, id: BodyId, vel: Vec2) {
        match self.rigid_body_mut(id) {
            Some(rb) if rb.is_dynamic() => rb.set_linvel(vector![vel.x, vel.y], true),
            _ => {}
        }
    }

    fn set_static(&mut self, id: BodyId, is_static: bool) {
        let Some(rb) = self.rigid_body_mut(id) else {
            return;
        };
        if is_static {
            rb.set_linvel(vector![0.0, 0.0], false);
            rb.set_angvel(0.0, false);
            rb.set_body_type(RigidBodyType::Fixed, false);
        } else {
            rb.set_body_type(RigidBodyType::Dynamic, true);
        }
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        let t = self.rigid_body(id)?.translation();
        Some(Vec2::new(t.x, t.y))
    }

    fn speed(&self, id: BodyId) -> Option<f32> {
        let rb = self.rigid_body(id)?;
        Some(if rb.is_dynamic() { rb.linvel().norm() } else { 0.0 })
    }

    fn step(&mut self, dt: f32) -> Vec<CollisionPair> {
        self.integration_params.dt = dt;

        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let mut started = Vec::new();
        while let Ok(event) = collision_recv.try_recv() {
            if let CollisionEvent::Started(h1, h2, _flags) = event {
                let a = self.collider_to_body.get(&h1).copied();
                let b = self.collider_to_body.get(&h2).copied();
                if let (Some(a), Some(b)) = (a, b) {
                    started.push(CollisionPair::new(a, b).ordered());
                }
            }
        }

        // Channel delivery order is not part of the simulation state
        started.sort_by_key(|pair| (pair.a, pair.b));
        started.dedup();
        started
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn bodies(&self) -> Vec<BodyView> {
        self.entries
            .iter()
            .filter_map(|(&id, entry)| {
                let rb = self.rigid_body_set.get(entry.body)?;
                let t = rb.translation();
                Some(BodyView {
                    id,
                    shape: entry.shape,
                    pos: Vec2::new(t.x, t.y),
                    is_static: !rb.is_dynamic(),
                    is_sensor: entry.is_sensor,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::physics::Material;

    fn floor(world: &mut RapierWorld) -> BodyId {
        // Top face at y = 580
        world.insert(BodyDesc::rect(Vec2::new(200.0, 600.0), Vec2::new(400.0, 40.0)))
    }

    fn run(world: &mut RapierWorld, ticks: u32) -> Vec<CollisionPair> {
        let mut started = Vec::new();
        for _ in 0..ticks {
            started.extend(world.step(SIM_DT));
        }
        started
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = RapierWorld::default();
        let id = world.insert(BodyDesc::circle(Vec2::new(100.0, 100.0), 10.0));
        run(&mut world, 60);
        let pos = world.position(id).unwrap();
        assert!(pos.y > 200.0, "expected fall, got y={}", pos.y);
        assert!((pos.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_static_body_stays_put() {
        let mut world = RapierWorld::default();
        let id = world.insert(BodyDesc::circle(Vec2::new(100.0, 100.0), 10.0).with_static(true));
        run(&mut world, 60);
        assert_eq!(world.position(id), Some(Vec2::new(100.0, 100.0)));
        assert_eq!(world.speed(id), Some(0.0));
    }

    #[test]
    fn test_circle_comes_to_rest_on_floor() {
        let mut world = RapierWorld::default();
        floor(&mut world);
        let ball = world.insert(
            BodyDesc::circle(Vec2::new(200.0, 300.0), 10.0).with_material(Material {
                restitution: 0.3,
                friction: 0.2,
            }),
        );
        run(&mut world, 5 * 120);
        let pos = world.position(ball).unwrap();
        assert!((pos.y - 570.0).abs() < 1.0, "resting y={}", pos.y);
        assert!(world.speed(ball).unwrap() < 30.0);
    }

    #[test]
    fn test_collision_start_reported() {
        let mut world = RapierWorld::default();
        let ground = floor(&mut world);
        let ball = world.insert(BodyDesc::circle(Vec2::new(200.0, 560.0), 10.0));

        let started = run(&mut world, 240);
        assert!(started.contains(&CollisionPair::new(ground, ball)));
        // Pairs come out ordered and sorted
        assert!(started.windows(2).all(|w| (w[0].a, w[0].b) < (w[1].a, w[1].b)));
        assert!(started.iter().all(|p| p.a < p.b));
    }

    #[test]
    fn test_sensor_reports_but_does_not_block() {
        let mut world = RapierWorld::default();
        let sensor = world.insert(
            BodyDesc::rect(Vec2::new(200.0, 150.0), Vec2::new(400.0, 2.0)).with_sensor(true),
        );
        let ball = world.insert(BodyDesc::circle(Vec2::new(200.0, 100.0), 10.0));

        let started = run(&mut world, 60);
        assert!(started.contains(&CollisionPair::new(sensor, ball)));
        assert!(world.position(ball).unwrap().y > 200.0);
    }

    #[test]
    fn test_static_pairs_never_collide() {
        let mut world = RapierWorld::default();
        floor(&mut world);
        world.insert(BodyDesc::circle(Vec2::new(200.0, 580.0), 10.0).with_static(true));
        assert!(run(&mut world, 10).is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut world = RapierWorld::default();
        let a = world.insert(BodyDesc::circle(Vec2::ZERO, 5.0));
        let b = world.insert(BodyDesc::circle(Vec2::new(50.0, 0.0), 5.0));
        assert_eq!(world.len(), 2);

        assert!(world.remove(a));
        assert!(!world.remove(a));
        assert_eq!(world.position(a), None);
        assert_eq!(world.len(), 1);

        world.clear();
        assert!(world.is_empty());
        assert!(world.bodies().is_empty());
        assert_eq!(world.position(b), None);

        // Ids are never reused
        let c = world.insert(BodyDesc::circle(Vec2::ZERO, 5.0));
        assert!(c > b);
    }

    #[test]
    fn test_set_static_freezes_velocity() {
        let mut world = RapierWorld::default();
        let id = world.insert(BodyDesc::circle(Vec2::ZERO, 5.0));
        run(&mut world, 10);
        assert!(world.speed(id).unwrap() > 0.0);

        world.set_static(id, true);
        assert_eq!(world.speed(id), Some(0.0));
        world.set_velocity(id, Vec2::new(100.0, 0.0));
        assert_eq!(world.speed(id), Some(0.0));

        let frozen = world.position(id);
        run(&mut world, 10);
        assert_eq!(world.position(id), frozen);
    }

    #[test]
    fn test_released_body_starts_falling() {
        let mut world = RapierWorld::default();
        let id = world.insert(BodyDesc::circle(Vec2::new(50.0, 50.0), 5.0).with_static(true));
        run(&mut world, 10);
        assert_eq!(world.position(id), Some(Vec2::new(50.0, 50.0)));

        world.set_static(id, false);
        run(&mut world, 30);
        assert!(world.position(id).unwrap().y > 55.0);
    }

    #[test]
    fn test_equal_circles_stack_side_by_side() {
        let mut world = RapierWorld::default();
        floor(&mut world);
        let a = world.insert(BodyDesc::circle(Vec2::new(195.0, 500.0), 10.0));
        let b = world.insert(BodyDesc::circle(Vec2::new(205.0, 500.0), 10.0));
        run(&mut world, 5 * 120);

        let pa = world.position(a).unwrap();
        let pb = world.position(b).unwrap();
        // Overlap resolved, neither sunk into the floor
        assert!(pa.distance(pb) > 19.0);
        assert!(pa.y < 571.0 && pb.y < 571.0);
    }

    #[test]
    fn test_bodies_snapshot_ordered_by_id() {
        let mut world = RapierWorld::default();
        let ground = floor(&mut world);
        let ball = world.insert(BodyDesc::circle(Vec2::new(200.0, 100.0), 8.0));

        let views = world.bodies();
        assert_eq!(views.iter().map(|v| v.id).collect::<Vec<_>>(), vec![ground, ball]);
        assert!(views[0].is_static);
        assert!(!views[1].is_static);
        assert_eq!(views[1].shape, Shape::Circle { radius: 8.0 });
    }
}
