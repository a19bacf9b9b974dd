//! Traction 2D physics core
//!
//! Rigid-body contact resolution for arcade games, built on [`hecs`] and
//! [`glam`]. Rotation is scalar, single-axis: bodies spin about the z axis
//! only.
//!
//! # Architecture
//!
//! Each fixed substep runs the following pipeline:
//!
//! 1. Apply forces (gravity, accumulated gameplay forces)
//! 2. Integrate velocities
//! 3. Collision detection records contacts (external stage)
//! 4. Resolve contacts (impulse resolution)
//! 5. Integrate positions
//! 6. Clear force accumulators
//!
//! Collision detection lives outside this crate: a detection stage records
//! [`Contact`]s against body entities each substep through
//! [`record_contact`], and the resolver discharges the deepest contact per
//! colliding pair. [`PhysicsWorld::step`] drives the whole pipeline at a
//! fixed timestep; the individual stages are also public for drivers that
//! schedule the phases themselves.

pub mod body;
pub mod contact;
pub mod resolver;
pub mod world;

// Re-export commonly used types
pub use body::{Body, Shape};
pub use contact::{record_contact, Contact, ContactBucket, ContactError, ContactStore};
pub use resolver::{resolve, resolve_contacts};
pub use world::{PhysicsConfig, PhysicsWorld};

// Re-export glam for convenience
pub use glam;
