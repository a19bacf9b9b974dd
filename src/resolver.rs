//! Impulse resolution: discharges the deepest contact per colliding pair.
//!
//! For each body, the resolver walks its contact buckets in detection
//! order, picks the single deepest interpenetration per pair, applies
//! opposite linear and angular impulses plus a depenetration displacement
//! to both bodies, and removes the mirrored bucket from the other body so
//! the pair is handled exactly once per step. A body's remaining contacts
//! are cleared afterwards; no contact survives a step.

use glam::Vec3;
use hecs::Entity;

use crate::body::Body;
use crate::contact::{Contact, ContactStore};

/// Resolve the pending contacts of every body in the world.
///
/// Entities are snapshotted up front because resolving one body mutates
/// other bodies' contact stores. The order across bodies is unspecified;
/// pair discharge makes the outcome independent of it.
pub fn resolve_contacts(world: &mut hecs::World) {
    let entities: Vec<Entity> = world
        .query::<&ContactStore>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    for entity in entities {
        resolve(world, entity);
    }
}

/// Resolve the contacts held by one body.
///
/// Per bucket, the deepest contact is discharged against the colliding
/// body: both bodies receive mass-scaled displacement and restitution-
/// scaled linear and angular impulses with opposite signs. The entity's
/// contact store is left empty.
pub fn resolve(world: &mut hecs::World, entity: Entity) {
    // Take the buckets out; this clears the store and lets the pass mutate
    // other bodies' stores while iterating.
    let buckets = match world.get::<&mut ContactStore>(entity) {
        Ok(mut store) => store.take(),
        Err(_) => return,
    };

    for bucket in &buckets {
        let contact = match deepest_interpenetration(&bucket.contacts) {
            Some(contact) => contact,
            None => continue,
        };

        let other = contact.body;
        let (a, b) = match (snapshot(world, entity), snapshot(world, other)) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };

        // Both immovable: the mass-scaling terms are undefined. Discharge
        // the pair without impulses.
        if a.inv_mass + b.inv_mass == 0.0 {
            tracing::debug!(
                "contact between immovable bodies {:?} and {:?}, skipping",
                entity,
                other
            );
            discharge_mirror(world, entity, other);
            continue;
        }

        let restitution = a.restitution.min(b.restitution);

        let relative_velocity = b.velocity - a.velocity;
        let normal_speed = contact.normal.dot(relative_velocity);

        // The classical combined-mass denominator is folded into the
        // per-body mass scaling in apply_to_body.
        let linear_impulse = contact.normal * normal_speed;
        let displacement = contact.normal * contact.depth;

        apply_to_body(
            world,
            entity,
            &a,
            &b,
            contact,
            displacement,
            linear_impulse,
            restitution,
        );
        apply_to_body(
            world,
            other,
            &b,
            &a,
            contact,
            -displacement,
            -linear_impulse,
            restitution,
        );

        discharge_mirror(world, entity, other);
    }
}

/// Cached body data for one resolution pass.
struct BodyData {
    mass: f32,
    inv_mass: f32,
    inertia: f32,
    inv_inertia: f32,
    position: Vec3,
    velocity: Vec3,
    restitution: f32,
    stationary: bool,
    radius: Option<f32>,
}

fn snapshot(world: &hecs::World, entity: Entity) -> Option<BodyData> {
    let body = world.get::<&Body>(entity).ok()?;
    Some(BodyData {
        mass: body.mass,
        inv_mass: body.inv_mass,
        inertia: body.inertia,
        inv_inertia: body.inv_inertia,
        position: body.position,
        velocity: body.velocity,
        restitution: body.restitution,
        stationary: body.stationary,
        radius: body.shape.map(|shape| shape.bounding_radius()),
    })
}

/// Pick the contact with the largest interpenetration depth.
///
/// Returns `None` when every depth is zero or negative. Strict comparison
/// keeps the first of equal maxima.
fn deepest_interpenetration(contacts: &[Contact]) -> Option<&Contact> {
    let mut max_depth = 0.0;
    let mut deepest = None;
    for contact in contacts {
        if contact.depth > max_depth {
            max_depth = contact.depth;
            deepest = Some(contact);
        }
    }
    deepest
}

/// Apply one side of a contact discharge to a single body.
#[allow(clippy::too_many_arguments)]
fn apply_to_body(
    world: &mut hecs::World,
    entity: Entity,
    this: &BodyData,
    other: &BodyData,
    contact: &Contact,
    displacement: Vec3,
    linear_impulse: Vec3,
    restitution: f32,
) {
    if this.stationary {
        return;
    }

    let arm = contact.point - this.position;

    // Linear component: heavier bodies take less of the shared
    // displacement and impulse.
    let mass_scaling = this.inv_mass / (this.inv_mass + other.inv_mass);

    // This ad-hoc scaling affects the balance between the linear and
    // angular components: contacts far from the center trade linear
    // response for angular response.
    let linear_balance = match this.radius {
        Some(radius) => (1.0 - arm.length() / (radius * 2.0)).clamp(0.0, 1.0),
        None => 1.0,
    };

    let eff_restitution = 1.0 + restitution;

    let mut body = match world.get::<&mut Body>(entity) {
        Ok(body) => body,
        Err(_) => return,
    };

    body.position += displacement * mass_scaling;
    body.velocity += linear_impulse * eff_restitution * mass_scaling * linear_balance;

    // Angular component
    let inv_inertia_sum = this.inv_inertia + other.inv_inertia;
    if this.inertia > 0.0 && inv_inertia_sum > 0.0 {
        let rotational_impulse = (linear_impulse * this.mass).cross(arm) / this.inertia;
        let magnitude = rotational_impulse.z;
        let inertia_scaling = this.inv_inertia / inv_inertia_sum;
        body.angular_velocity += -magnitude * eff_restitution * inertia_scaling;
    }
}

/// Remove the bucket the other body holds against `entity`; the pair has
/// been handled from this side.
fn discharge_mirror(world: &mut hecs::World, entity: Entity, other: Entity) {
    if let Ok(mut store) = world.get::<&mut ContactStore>(other) {
        store.remove(entity);
    }
}
