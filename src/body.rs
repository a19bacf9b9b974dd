//! Body state, force accumulation, and integration.

use glam::{Vec2, Vec3};

/// Bounding shape attached to a body.
///
/// The resolver only consumes the bounding radius (for the linear/angular
/// balance heuristic); full shape geometry belongs to the detection stage.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl Shape {
    /// Radius of the smallest circle enclosing the shape.
    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Shape::Circle { radius } => *radius,
            Shape::Rect { half_extents } => half_extents.length(),
        }
    }
}

/// Rigid body component.
///
/// Positions and velocities are 3D vectors for uniformity with contact
/// geometry, but rotation is a single scalar about the z axis.
#[derive(Debug, Clone)]
pub struct Body {
    pub mass: f32,
    /// Reciprocal of mass; zero encodes an immovable body.
    pub inv_mass: f32,
    /// Moment of inertia about the z axis.
    pub inertia: f32,
    /// Reciprocal of the moment of inertia; zero encodes an immovable body.
    pub inv_inertia: f32,
    pub position: Vec3,
    /// Orientation angle in radians.
    pub heading: f32,
    pub velocity: Vec3,
    pub angular_velocity: f32,
    pub force: Vec3,
    pub torque: f32,
    /// Linear damping factor (default: 0.01).
    pub linear_damping: f32,
    /// Angular damping factor (default: 0.01).
    pub angular_damping: f32,
    /// Coefficient of restitution (0.0 - 1.0).
    pub restitution: f32,
    /// Immovable bodies take no impulses and skip integration.
    pub stationary: bool,
    pub shape: Option<Shape>,
}

impl Body {
    /// Create a new dynamic body with the given mass and moment of inertia.
    pub fn new_dynamic(mass: f32, inertia: f32) -> Self {
        Self {
            mass,
            inv_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
            inertia,
            inv_inertia: if inertia > 0.0 { 1.0 / inertia } else { 0.0 },
            position: Vec3::ZERO,
            heading: 0.0,
            velocity: Vec3::ZERO,
            angular_velocity: 0.0,
            force: Vec3::ZERO,
            torque: 0.0,
            linear_damping: 0.01,
            angular_damping: 0.01,
            restitution: 0.3,
            stationary: false,
            shape: None,
        }
    }

    /// Create a new stationary (immovable) body.
    pub fn new_stationary() -> Self {
        Self {
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            position: Vec3::ZERO,
            heading: 0.0,
            velocity: Vec3::ZERO,
            angular_velocity: 0.0,
            force: Vec3::ZERO,
            torque: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            restitution: 0.3,
            stationary: true,
            shape: None,
        }
    }

    /// Accumulate a force through the center of mass.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Accumulate a force applied at an offset from the center of mass,
    /// contributing torque about the z axis.
    pub fn apply_force_at(&mut self, force: Vec3, offset: Vec3) {
        self.force += force;
        self.torque += offset.cross(force).z;
    }

    /// Accumulate a torque about the z axis.
    pub fn apply_torque(&mut self, torque: f32) {
        self.torque += torque;
    }
}

/// Apply gravity force to all non-stationary bodies.
pub fn apply_gravity(world: &mut hecs::World, gravity: Vec3) {
    for (_, body) in world.query_mut::<&mut Body>() {
        if !body.stationary && body.mass > 0.0 {
            body.force += gravity * body.mass;
        }
    }
}

/// Integrate velocities using semi-implicit Euler: v += (F/m) * dt.
pub fn integrate_velocities(world: &mut hecs::World, dt: f32) {
    for (_, body) in world.query_mut::<&mut Body>() {
        if body.stationary {
            continue;
        }

        // Linear velocity: v += (F/m) * dt
        body.velocity += body.force * body.inv_mass * dt;

        // Angular velocity: omega += (tau / I) * dt
        body.angular_velocity += body.torque * body.inv_inertia * dt;

        // Apply damping
        body.velocity *= (1.0 - body.linear_damping).max(0.0);
        body.angular_velocity *= (1.0 - body.angular_damping).max(0.0);
    }
}

/// Integrate positions: p += v * dt, heading += omega * dt.
pub fn integrate_positions(world: &mut hecs::World, dt: f32) {
    for (_, body) in world.query_mut::<&mut Body>() {
        if body.stationary {
            continue;
        }

        body.position += body.velocity * dt;
        body.heading += body.angular_velocity * dt;
    }
}

/// Clear force and torque accumulators on all bodies.
pub fn clear_forces(world: &mut hecs::World) {
    for (_, body) in world.query_mut::<&mut Body>() {
        body.force = Vec3::ZERO;
        body.torque = 0.0;
    }
}
