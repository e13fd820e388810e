//! Live property animations and the per-entity slot table.

use hashbrown::HashMap;

use crate::easing::{add_scaled4, sub4, Easing};
use crate::error::HostError;
use crate::ids::EntityId;
use crate::pool::{Handle, Pool, PoolStats, Poolable};
use crate::property::{PropertyFamily, PropertyId};
use crate::value::PropertyValue;

pub type AnimationId = Handle<PropertyAnimation>;

/// Interpolation family, fixed when the animation is created.
#[derive(Clone, Debug, PartialEq)]
pub enum Interpolation {
    Float { start: f32, delta: f32 },
    Int { start: i32, delta: i32 },
    Color { start: [f32; 4], delta: [f32; 4] },
    Bool { start: bool, target: bool },
    Enum { start: u32, target: u32 },
    Text { start: String, target: String },
}

impl Default for Interpolation {
    fn default() -> Self {
        Interpolation::Float {
            start: 0.0,
            delta: 0.0,
        }
    }
}

impl Interpolation {
    /// Build from the current value and the step's target value.
    pub fn between(
        property: PropertyId,
        current: PropertyValue,
        target: PropertyValue,
    ) -> Result<Self, HostError> {
        let mismatch = |found| HostError::KindMismatch {
            property,
            expected: property.kind(),
            found,
        };
        Ok(match (current, target) {
            (PropertyValue::Float(a), PropertyValue::Float(b)) => Interpolation::Float {
                start: a,
                delta: b - a,
            },
            (PropertyValue::Int(a), PropertyValue::Int(b)) => Interpolation::Int {
                start: a,
                delta: b.wrapping_sub(a),
            },
            (PropertyValue::Color(a), PropertyValue::Color(b)) => Interpolation::Color {
                start: a,
                delta: sub4(b, a),
            },
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => Interpolation::Bool {
                start: a,
                target: b,
            },
            (PropertyValue::Enum(a), PropertyValue::Enum(b)) => Interpolation::Enum {
                start: a,
                target: b,
            },
            (PropertyValue::Text(a), PropertyValue::Text(b)) => Interpolation::Text {
                start: a,
                target: b,
            },
            (current, target) => {
                // Report whichever side disagrees with the property's declared kind.
                let found = if current.kind() != property.kind() {
                    current.kind()
                } else {
                    target.kind()
                };
                return Err(mismatch(found));
            }
        })
    }

    pub fn final_value(&self) -> PropertyValue {
        match self {
            Interpolation::Float { start, delta } => PropertyValue::Float(start + delta),
            Interpolation::Int { start, delta } => PropertyValue::Int(start.wrapping_add(*delta)),
            Interpolation::Color { start, delta } => {
                PropertyValue::Color(add_scaled4(*start, *delta, 1.0))
            }
            Interpolation::Bool { target, .. } => PropertyValue::Bool(*target),
            Interpolation::Enum { target, .. } => PropertyValue::Enum(*target),
            Interpolation::Text { target, .. } => PropertyValue::Text(target.clone()),
        }
    }

    /// Value at blend factor `k`. Switch kinds hold the start value until `k > 0.5`.
    pub fn sample(&self, k: f32) -> PropertyValue {
        match self {
            Interpolation::Float { start, delta } => PropertyValue::Float(start + delta * k),
            // Truncate the eased delta toward zero.
            Interpolation::Int { start, delta } => {
                PropertyValue::Int(start.wrapping_add((*delta as f32 * k) as i32))
            }
            Interpolation::Color { start, delta } => {
                PropertyValue::Color(add_scaled4(*start, *delta, k))
            }
            Interpolation::Bool { start, target } => {
                PropertyValue::Bool(if k > 0.5 { *target } else { *start })
            }
            Interpolation::Enum { start, target } => {
                PropertyValue::Enum(if k > 0.5 { *target } else { *start })
            }
            Interpolation::Text { start, target } => {
                PropertyValue::Text(if k > 0.5 { target.clone() } else { start.clone() })
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyAnimation {
    pub entity: EntityId,
    pub property: Option<PropertyId>,
    pub interpolation: Interpolation,
    pub elapsed: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl Poolable for PropertyAnimation {}

impl PropertyAnimation {
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Value to write this tick: the final value once elapsed reaches duration,
    /// otherwise the eased sample.
    #[inline]
    pub fn current_value(&self) -> PropertyValue {
        self.value_at(self.elapsed)
    }

    pub fn value_at(&self, elapsed: f32) -> PropertyValue {
        if elapsed >= self.duration {
            return self.interpolation.final_value();
        }
        let t = elapsed / self.duration;
        self.interpolation.sample(self.easing.apply(t))
    }

    pub fn family(&self) -> Option<PropertyFamily> {
        self.property.map(PropertyId::family)
    }
}

/// All live animations, indexed by `(entity, property)`.
#[derive(Debug, Default)]
pub struct AnimationTable {
    pool: Pool<PropertyAnimation>,
    slots: HashMap<(EntityId, PropertyId), AnimationId>,
    /// Live animations per target entity, for `release_entity`.
    by_entity: HashMap<EntityId, Vec<AnimationId>>,
}

impl AnimationTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pool: Pool::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            by_entity: HashMap::new(),
        }
    }

    /// Start (or restart in place) the animation for `(entity, property)`.
    pub fn upsert(
        &mut self,
        entity: EntityId,
        property: PropertyId,
        interpolation: Interpolation,
        duration: f32,
        easing: Easing,
        elapsed: f32,
    ) -> AnimationId {
        let id = match self.slots.get(&(entity, property)) {
            Some(&id) if self.pool.contains(id) => id,
            _ => {
                let id = self.pool.alloc();
                self.slots.insert((entity, property), id);
                self.by_entity.entry(entity).or_default().push(id);
                id
            }
        };
        if let Some(anim) = self.pool.get_mut(id) {
            anim.entity = entity;
            anim.property = Some(property);
            anim.interpolation = interpolation;
            anim.duration = duration.max(0.0);
            anim.easing = easing;
            anim.elapsed = elapsed.max(0.0);
        }
        id
    }

    pub fn get(&self, entity: EntityId, property: PropertyId) -> Option<&PropertyAnimation> {
        let id = *self.slots.get(&(entity, property))?;
        self.pool.get(id)
    }

    #[inline]
    pub fn get_mut_by_id(&mut self, id: AnimationId) -> Option<&mut PropertyAnimation> {
        self.pool.get_mut(id)
    }

    /// Remove one slot and return its record to the pool.
    pub fn remove(&mut self, id: AnimationId) -> bool {
        let Some(anim) = self.pool.get(id) else {
            return false;
        };
        let entity = anim.entity;
        if let Some(property) = anim.property {
            let key = (entity, property);
            if self.slots.get(&key) == Some(&id) {
                self.slots.remove(&key);
            }
        }
        if let Some(ids) = self.by_entity.get_mut(&entity) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_entity.remove(&entity);
            }
        }
        self.pool.free(id).is_ok()
    }

    /// Drop every slot on `entity`. Returns how many were released.
    pub fn release_entity(&mut self, entity: EntityId) -> usize {
        let Some(ids) = self.by_entity.remove(&entity) else {
            return 0;
        };
        ids.into_iter().filter(|id| self.remove(*id)).count()
    }

    /// Live animations of one family, collected into `out` (cleared first).
    pub fn collect_family(&self, family: PropertyFamily, out: &mut Vec<AnimationId>) {
        out.clear();
        out.extend(
            self.pool
                .iter()
                .filter(|(_, a)| a.family() == Some(family))
                .map(|(id, _)| id),
        );
    }

    pub fn on_entity(&self, entity: EntityId) -> impl Iterator<Item = &PropertyAnimation> {
        self.pool.iter().map(|(_, a)| a).filter(move |a| a.entity == entity)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    #[inline]
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub fn pool(&self) -> &Pool<PropertyAnimation> {
        &self.pool
    }
}
