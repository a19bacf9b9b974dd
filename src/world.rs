//! Fixed-timestep simulation driving.

use glam::Vec3;

use crate::body;
use crate::resolver;

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: zero (top-down scenes apply gameplay
    /// forces instead; set this for side-view scenes).
    pub gravity: Vec3,
    /// Fixed timestep for physics updates in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of sub-steps per frame. Default: 4.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::ZERO,
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
        }
    }
}

/// Drives the per-step pipeline at a fixed timestep.
///
/// Collision detection is an external stage: `step` takes a `detect`
/// closure and calls it once per substep, after velocity integration and
/// before resolution, so it can record contacts against body entities.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    accumulator: f64,
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
        }
    }

    /// Step the simulation forward by `delta_time` seconds.
    ///
    /// Uses a fixed timestep accumulator to ensure deterministic
    /// simulation.
    pub fn step<F>(&mut self, world: &mut hecs::World, delta_time: f64, mut detect: F)
    where
        F: FnMut(&mut hecs::World),
    {
        self.accumulator += delta_time;

        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps
        {
            self.fixed_step(world, self.config.fixed_timestep as f32, &mut detect);
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > self.config.fixed_timestep * self.config.max_substeps as f64 {
            self.accumulator = 0.0;
        }

        tracing::trace!("physics step ran {} substeps", substeps);
    }

    fn fixed_step<F>(&mut self, world: &mut hecs::World, dt: f32, detect: &mut F)
    where
        F: FnMut(&mut hecs::World),
    {
        // 1. Apply forces (gravity)
        body::apply_gravity(world, self.config.gravity);

        // 2. Integrate velocities
        body::integrate_velocities(world, dt);

        // 3. Collision detection records contacts
        detect(world);

        // 4. Resolve contacts
        resolver::resolve_contacts(world);

        // 5. Integrate positions
        body::integrate_positions(world, dt);

        // 6. Clear force accumulators
        body::clear_forces(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::contact::{record_contact, Contact, ContactStore};

    #[test]
    fn test_physics_config_default() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, Vec3::ZERO);
        assert!((config.fixed_timestep - 1.0 / 60.0).abs() < 1e-10);
        assert_eq!(config.max_substeps, 4);
    }

    #[test]
    fn test_physics_world_free_fall() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            ..PhysicsConfig::default()
        });

        let entity = world.spawn((
            {
                let mut body = Body::new_dynamic(1.0, 1.0);
                body.position = Vec3::new(0.0, 10.0, 0.0);
                body
            },
            ContactStore::new(),
        ));

        // Simulate ~1 second
        for _ in 0..60 {
            physics.step(&mut world, 1.0 / 60.0, |_| {});
        }

        let body = world.get::<&Body>(entity).unwrap();
        assert!(
            body.position.y < 10.0,
            "Body should have fallen: y = {}",
            body.position.y
        );
    }

    #[test]
    fn test_substeps_capped_per_step() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());

        // A frame spike worth 60 substeps only runs max_substeps of them
        let mut detect_calls = 0;
        physics.step(&mut world, 1.0, |_| detect_calls += 1);
        assert_eq!(detect_calls, 4);

        // The clamp drops the leftover backlog instead of replaying it
        let mut detect_calls = 0;
        physics.step(&mut world, 1.0 / 60.0, |_| detect_calls += 1);
        assert!(detect_calls <= 1, "backlog replayed: {} substeps", detect_calls);
    }

    #[test]
    fn test_physics_world_collision() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());

        let radius = 0.5;
        let spawn = |world: &mut hecs::World, x: f32, vx: f32| {
            let mut body = Body::new_dynamic(10.0, 5.0);
            body.position = Vec3::new(x, 0.0, 0.0);
            body.velocity = Vec3::new(vx, 0.0, 0.0);
            body.restitution = 0.5;
            world.spawn((body, ContactStore::new()))
        };

        // Two circles closing head-on
        let left = spawn(&mut world, -1.0, 2.0);
        let right = spawn(&mut world, 1.0, -2.0);

        // Minimal circle-circle detection stage: record a mirrored contact
        // whenever the two overlap.
        let detect = |world: &mut hecs::World| {
            let (pos_l, pos_r) = {
                let l = world.get::<&Body>(left).unwrap().position;
                let r = world.get::<&Body>(right).unwrap().position;
                (l, r)
            };
            let offset = pos_l - pos_r;
            let depth = radius * 2.0 - offset.length();
            if depth > 0.0 {
                let normal = offset.normalize();
                let point = (pos_l + pos_r) * 0.5;
                record_contact(
                    world,
                    left,
                    Contact {
                        point,
                        normal,
                        depth,
                        body: right,
                    },
                )
                .unwrap();
                record_contact(
                    world,
                    right,
                    Contact {
                        point,
                        normal: -normal,
                        depth,
                        body: left,
                    },
                )
                .unwrap();
            }
        };

        // Simulate 2 seconds
        for _ in 0..120 {
            physics.step(&mut world, 1.0 / 60.0, detect);
        }

        let body_l = world.get::<&Body>(left).unwrap();
        let body_r = world.get::<&Body>(right).unwrap();

        // The bounce should have reversed both bodies
        assert!(
            body_l.velocity.x < 0.0,
            "left body should move away after bounce: {:?}",
            body_l.velocity
        );
        assert!(
            body_r.velocity.x > 0.0,
            "right body should move away after bounce: {:?}",
            body_r.velocity
        );

        // And they should have separated
        let distance = (body_l.position - body_r.position).length();
        assert!(
            distance > radius * 2.0,
            "bodies still overlapping: distance = {}",
            distance
        );

        // No contact survives a step
        assert!(world.get::<&ContactStore>(left).unwrap().is_empty());
        assert!(world.get::<&ContactStore>(right).unwrap().is_empty());
    }
}
