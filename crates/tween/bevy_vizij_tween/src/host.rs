//! `TweenHost` over a Bevy `World`.

use bevy::prelude::*;
use vizij_tween_core::{
    EntityId, HostError, Position, PropertyComponent, PropertyFamily, PropertyId, PropertyValue,
    SoundParams, SpawnerParams, SpriteState, Switches, TextParams, Tint, TweenHost,
    VisibilityVariance,
};

use crate::components::Animated;
use crate::resources::ConfigFunctions;

/// Core id for a Bevy entity (index and generation from `Entity::to_bits`).
pub fn entity_id(entity: Entity) -> EntityId {
    let bits = entity.to_bits();
    EntityId::new(bits as u32, (bits >> 32) as u32)
}

/// Bevy entity for a core id; `None` for the sentinel or bit patterns Bevy rejects.
pub fn to_entity(id: EntityId) -> Option<Entity> {
    if id.is_none() {
        return None;
    }
    Entity::try_from_bits(((id.generation as u64) << 32) | id.index as u64).ok()
}

fn read_from<C: PropertyComponent + Send + Sync + 'static>(
    world: &World,
    entity: Entity,
    property: PropertyId,
) -> Option<PropertyValue> {
    world.get::<Animated<C>>(entity)?.0.read(property)
}

fn write_to<C: PropertyComponent + Send + Sync + 'static>(
    world: &mut World,
    entity: Entity,
    property: PropertyId,
    value: PropertyValue,
) -> Option<bool> {
    let mut component = world.get_mut::<Animated<C>>(entity)?;
    Some(component.0.write(property, value))
}

pub struct WorldHost<'w> {
    world: &'w mut World,
}

impl<'w> WorldHost<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    fn live(&self, id: EntityId) -> Result<Entity, HostError> {
        to_entity(id)
            .filter(|e| self.world.get_entity(*e).is_some())
            .ok_or(HostError::DeadEntity(id))
    }
}

impl TweenHost for WorldHost<'_> {
    fn is_alive(&self, entity: EntityId) -> bool {
        self.live(entity).is_ok()
    }

    fn create_entity(&mut self) -> EntityId {
        entity_id(self.world.spawn_empty().id())
    }

    fn delete_entity(&mut self, entity: EntityId) -> bool {
        match to_entity(entity) {
            Some(e) => self.world.despawn(e),
            None => false,
        }
    }

    fn read(&self, entity: EntityId, property: PropertyId) -> Result<PropertyValue, HostError> {
        let e = self.live(entity)?;
        let world = &*self.world;
        let value = match property.family() {
            PropertyFamily::Position => read_from::<Position>(world, e, property),
            PropertyFamily::Color => read_from::<Tint>(world, e, property),
            PropertyFamily::Sprite => read_from::<SpriteState>(world, e, property),
            PropertyFamily::Spawner => read_from::<SpawnerParams>(world, e, property),
            PropertyFamily::Visibility => read_from::<VisibilityVariance>(world, e, property),
            PropertyFamily::Sound => read_from::<SoundParams>(world, e, property),
            PropertyFamily::Text => read_from::<TextParams>(world, e, property),
            PropertyFamily::Switch => read_from::<Switches>(world, e, property),
        };
        value.ok_or(HostError::MissingComponent { entity, property })
    }

    fn write(
        &mut self,
        entity: EntityId,
        property: PropertyId,
        value: PropertyValue,
    ) -> Result<(), HostError> {
        let e = self.live(entity)?;
        let found = value.kind();
        let world = &mut *self.world;
        let written = match property.family() {
            PropertyFamily::Position => write_to::<Position>(world, e, property, value),
            PropertyFamily::Color => write_to::<Tint>(world, e, property, value),
            PropertyFamily::Sprite => write_to::<SpriteState>(world, e, property, value),
            PropertyFamily::Spawner => write_to::<SpawnerParams>(world, e, property, value),
            PropertyFamily::Visibility => write_to::<VisibilityVariance>(world, e, property, value),
            PropertyFamily::Sound => write_to::<SoundParams>(world, e, property, value),
            PropertyFamily::Text => write_to::<TextParams>(world, e, property, value),
            PropertyFamily::Switch => write_to::<Switches>(world, e, property, value),
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
        let e = self.live(target)?;
        let f = self
            .world
            .get_resource::<ConfigFunctions>()
            .and_then(|fns| fns.map.get(function).copied())
            .ok_or_else(|| HostError::UnknownFunction(function.to_string()))?;
        f(self.world, e, config).map_err(|message| HostError::FunctionFailed {
            function: function.to_string(),
            message,
        })
    }
}
