//! Contract with the embedding entity/component runtime.
//!
//! The core never owns entities or components. It reads start values, writes
//! interpolated values, creates carrier entities for forked branches, and calls out for
//! side-effect steps, all through `TweenHost`. `MemoryWorld` (world.rs) and the Bevy
//! adapter implement it.

use crate::error::HostError;
use crate::ids::EntityId;
use crate::property::PropertyId;
use crate::value::PropertyValue;

pub trait TweenHost {
    fn is_alive(&self, entity: EntityId) -> bool;

    /// Create an empty entity (carriers, `spawn_entity` steps).
    fn create_entity(&mut self) -> EntityId;

    /// Delete an entity. Returns `false` if it was already gone.
    fn delete_entity(&mut self, entity: EntityId) -> bool;

    fn read(&self, entity: EntityId, property: PropertyId) -> Result<PropertyValue, HostError>;

    fn write(
        &mut self,
        entity: EntityId,
        property: PropertyId,
        value: PropertyValue,
    ) -> Result<(), HostError>;

    /// Run a registered entity-configuration function against `target`.
    fn configure(
        &mut self,
        function: &str,
        target: EntityId,
        config: Option<&str>,
    ) -> Result<(), HostError>;
}
