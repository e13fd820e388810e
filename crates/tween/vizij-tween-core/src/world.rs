//! `MemoryWorld`: a small generational entity store implementing `TweenHost`.
//!
//! Used by tests, tools and headless embedding. Each entity holds at most one component
//! per property family. Slots are recycled through a free list; a recycled slot bumps its
//! generation so stale `EntityId`s stop resolving.

use std::fmt;

use hashbrown::HashMap;

use crate::components::{
    Position, PropertyComponent, SoundParams, SpawnerParams, SpriteState, Switches, TextParams,
    Tint, VisibilityVariance,
};
use crate::error::HostError;
use crate::host::TweenHost;
use crate::ids::EntityId;
use crate::property::{PropertyFamily, PropertyId};
use crate::value::PropertyValue;

/// Entity-configuration function: `(world, target, config)`.
pub type ConfigFn = Box<dyn FnMut(&mut MemoryWorld, EntityId, Option<&str>) -> Result<(), String>>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityRecord {
    pub position: Option<Position>,
    pub tint: Option<Tint>,
    pub sprite: Option<SpriteState>,
    pub spawner: Option<SpawnerParams>,
    pub visibility: Option<VisibilityVariance>,
    pub sound: Option<SoundParams>,
    pub text: Option<TextParams>,
    pub switches: Option<Switches>,
}

/// Components `MemoryWorld` knows where to store.
pub trait WorldComponent: PropertyComponent {
    fn slot(record: &EntityRecord) -> &Option<Self>;
    fn slot_mut(record: &mut EntityRecord) -> &mut Option<Self>;
}

macro_rules! world_component {
    ($ty:ty, $field:ident) => {
        impl WorldComponent for $ty {
            #[inline]
            fn slot(record: &EntityRecord) -> &Option<Self> {
                &record.$field
            }
            #[inline]
            fn slot_mut(record: &mut EntityRecord) -> &mut Option<Self> {
                &mut record.$field
            }
        }
    };
}

world_component!(Position, position);
world_component!(Tint, tint);
world_component!(SpriteState, sprite);
world_component!(SpawnerParams, spawner);
world_component!(VisibilityVariance, visibility);
world_component!(SoundParams, sound);
world_component!(TextParams, text);
world_component!(Switches, switches);

fn read_slot<C: PropertyComponent>(slot: &Option<C>, property: PropertyId) -> Option<PropertyValue> {
    slot.as_ref()?.read(property)
}

/// `None` when the component is missing, `Some(false)` on a kind mismatch.
fn write_slot<C: PropertyComponent>(
    slot: &mut Option<C>,
    property: PropertyId,
    value: PropertyValue,
) -> Option<bool> {
    Some(slot.as_mut()?.write(property, value))
}

#[derive(Default)]
pub struct MemoryWorld {
    records: Vec<Option<EntityRecord>>,
    generations: Vec<u32>,
    free_indices: Vec<u32>,
    functions: HashMap<String, ConfigFn>,
}

impl fmt::Debug for MemoryWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryWorld")
            .field("entities", &self.len())
            .field("free", &self.free_indices.len())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entity, reusing a freed slot when one is available.
    pub fn spawn(&mut self) -> EntityId {
        if let Some(index) = self.free_indices.pop() {
            self.records[index as usize] = Some(EntityRecord::default());
            return EntityId::new(index, self.generations[index as usize]);
        }
        let index = self.records.len() as u32;
        self.records.push(Some(EntityRecord::default()));
        self.generations.push(0);
        EntityId::new(index, 0)
    }

    /// Remove an entity and all its components. Returns `false` for stale ids.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.contains(entity) {
            return false;
        }
        let index = entity.index as usize;
        self.records[index] = None;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_indices.push(entity.index);
        true
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.record(entity).is_some()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.records.iter().filter(|r| r.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn record(&self, entity: EntityId) -> Option<&EntityRecord> {
        let index = entity.index as usize;
        if entity.is_none() || self.generations.get(index) != Some(&entity.generation) {
            return None;
        }
        self.records[index].as_ref()
    }

    pub fn record_mut(&mut self, entity: EntityId) -> Option<&mut EntityRecord> {
        let index = entity.index as usize;
        if entity.is_none() || self.generations.get(index) != Some(&entity.generation) {
            return None;
        }
        self.records[index].as_mut()
    }

    /// Attach (or replace) a component. Returns `false` if the entity is gone.
    pub fn insert<C: WorldComponent>(&mut self, entity: EntityId, component: C) -> bool {
        match self.record_mut(entity) {
            Some(record) => {
                *C::slot_mut(record) = Some(component);
                true
            }
            None => false,
        }
    }

    /// Detach a component, returning it.
    pub fn remove<C: WorldComponent>(&mut self, entity: EntityId) -> Option<C> {
        C::slot_mut(self.record_mut(entity)?).take()
    }

    pub fn get<C: WorldComponent>(&self, entity: EntityId) -> Option<&C> {
        C::slot(self.record(entity)?).as_ref()
    }

    pub fn get_mut<C: WorldComponent>(&mut self, entity: EntityId) -> Option<&mut C> {
        C::slot_mut(self.record_mut(entity)?).as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EntityRecord)> {
        self.records.iter().enumerate().filter_map(|(index, record)| {
            record
                .as_ref()
                .map(|r| (EntityId::new(index as u32, self.generations[index]), r))
        })
    }

    /// Register a function callable from `spawn_entity` and `execute_config_function`
    /// steps. Re-registering a name replaces it.
    pub fn register_function<F>(&mut self, name: &str, f: F)
    where
        F: FnMut(&mut MemoryWorld, EntityId, Option<&str>) -> Result<(), String> + 'static,
    {
        self.functions.insert(name.to_string(), Box::new(f));
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

impl TweenHost for MemoryWorld {
    fn is_alive(&self, entity: EntityId) -> bool {
        self.contains(entity)
    }

    fn create_entity(&mut self) -> EntityId {
        self.spawn()
    }

    fn delete_entity(&mut self, entity: EntityId) -> bool {
        self.despawn(entity)
    }

    fn read(&self, entity: EntityId, property: PropertyId) -> Result<PropertyValue, HostError> {
        let record = self.record(entity).ok_or(HostError::DeadEntity(entity))?;
        let value = match property.family() {
            PropertyFamily::Position => read_slot(&record.position, property),
            PropertyFamily::Color => read_slot(&record.tint, property),
            PropertyFamily::Sprite => read_slot(&record.sprite, property),
            PropertyFamily::Spawner => read_slot(&record.spawner, property),
            PropertyFamily::Visibility => read_slot(&record.visibility, property),
            PropertyFamily::Sound => read_slot(&record.sound, property),
            PropertyFamily::Text => read_slot(&record.text, property),
            PropertyFamily::Switch => read_slot(&record.switches, property),
        };
        value.ok_or(HostError::MissingComponent { entity, property })
    }

    fn write(
        &mut self,
        entity: EntityId,
        property: PropertyId,
        value: PropertyValue,
    ) -> Result<(), HostError> {
        let found = value.kind();
        let record = self
            .record_mut(entity)
            .ok_or(HostError::DeadEntity(entity))?;
        let written = match property.family() {
            PropertyFamily::Position => write_slot(&mut record.position, property, value),
            PropertyFamily::Color => write_slot(&mut record.tint, property, value),
            PropertyFamily::Sprite => write_slot(&mut record.sprite, property, value),
            PropertyFamily::Spawner => write_slot(&mut record.spawner, property, value),
            PropertyFamily::Visibility => write_slot(&mut record.visibility, property, value),
            PropertyFamily::Sound => write_slot(&mut record.sound, property, value),
            PropertyFamily::Text => write_slot(&mut record.text, property, value),
            PropertyFamily::Switch => write_slot(&mut record.switches, property, value),
        };
        match written {
            Some(true) => Ok(()),
            Some(false) => Err(HostError::KindMismatch {
                property,
                expected: property.kind(),
                found,
            }),
            None => Err(HostError::MissingComponent { entity, property }),
        }
    }

    fn configure(
        &mut self,
        function: &str,
        target: EntityId,
        config: Option<&str>,
    ) -> Result<(), HostError> {
        // Taken out while it runs so the function can borrow the world mutably.
        let Some(mut f) = self.functions.remove(function) else {
            return Err(HostError::UnknownFunction(function.to_string()));
        };
        let result = f(self, target, config);
        self.functions.entry(function.to_string()).or_insert(f);
        result.map_err(|message| HostError::FunctionFailed {
            function: function.to_string(),
            message,
        })
    }
}
