//! Contact records and per-body contact storage.

use glam::Vec3;
use hecs::Entity;
use thiserror::Error;

/// A detected overlap between two bodies.
///
/// Produced by the detection stage once per step, consumed and destroyed
/// by the resolver within the same step.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Contact point in world space.
    pub point: Vec3,
    /// Unit contact normal, pointing from the other body toward the
    /// owning body's surface.
    pub normal: Vec3,
    /// How far the shapes overlap along the normal.
    pub depth: f32,
    /// The other body in the pair.
    pub body: Entity,
}

/// Error recording a contact.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("entity {0:?} has no contact store")]
    NoStore(Entity),
}

/// All contacts one body holds against a single other body this step.
#[derive(Debug, Clone)]
pub struct ContactBucket {
    /// The other body in the pair.
    pub other: Entity,
    /// Contacts in detection order. A fast-moving step can record several
    /// entries for the same pair; the resolver discharges only the deepest.
    pub contacts: Vec<Contact>,
}

/// Per-body contact storage, one bucket per distinct colliding body.
///
/// Buckets keep detection-insertion order, which the resolution pass relies
/// on. Lookup is a linear scan; a body sees a handful of simultaneous pairs
/// per step at most.
#[derive(Debug, Clone, Default)]
pub struct ContactStore {
    buckets: Vec<ContactBucket>,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contact to the bucket keyed by its colliding body, creating
    /// the bucket if this is the first contact against that body.
    pub fn record(&mut self, contact: Contact) {
        match self.buckets.iter_mut().find(|b| b.other == contact.body) {
            Some(bucket) => bucket.contacts.push(contact),
            None => self.buckets.push(ContactBucket {
                other: contact.body,
                contacts: vec![contact],
            }),
        }
    }

    /// Drop the bucket keyed by the given body, if present.
    pub fn remove(&mut self, body: Entity) {
        self.buckets.retain(|b| b.other != body);
    }

    /// Move all buckets out, leaving the store empty.
    pub fn take(&mut self) -> Vec<ContactBucket> {
        std::mem::take(&mut self.buckets)
    }

    /// Number of buckets (distinct colliding bodies).
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn buckets(&self) -> &[ContactBucket] {
        &self.buckets
    }
}

/// Record a contact detected against `owner`.
///
/// This is the boundary the detection stage calls, possibly several times
/// per pair per step.
pub fn record_contact(
    world: &mut hecs::World,
    owner: Entity,
    contact: Contact,
) -> Result<(), ContactError> {
    let mut store = world
        .get::<&mut ContactStore>(owner)
        .map_err(|_| ContactError::NoStore(owner))?;
    store.record(contact);
    Ok(())
}
