//! Output contracts from the tween engine.
//!
//! Values are written straight into the host; `Outputs` only carries the semantic events
//! of the tick so adapters can log or forward them.

use serde::{Deserialize, Serialize};

use crate::ids::EntityId;
use crate::property::PropertyId;
use crate::script::ScriptId;

/// Discrete signals emitted during a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TweenEvent {
    BranchForked {
        parent: ScriptId,
        script: ScriptId,
        carrier: EntityId,
    },
    ScriptFinished {
        script: ScriptId,
        owner: EntityId,
    },
    /// The owner entity disappeared before the script reached its end.
    ScriptCancelled {
        script: ScriptId,
        owner: EntityId,
    },
    MutationSkipped {
        entity: EntityId,
        property: PropertyId,
        reason: String,
    },
    StepSkipped {
        owner: EntityId,
        step: String,
        reason: String,
    },
    SideEffectFailed {
        entity: EntityId,
        step: String,
        reason: String,
    },
    EntitySpawned {
        entity: EntityId,
    },
    EntityDeleted {
        entity: EntityId,
    },
    AnimationFinished {
        entity: EntityId,
        property: PropertyId,
    },
    /// The target went away (entity deleted or component detached) mid-animation.
    AnimationDropped {
        entity: EntityId,
        property: PropertyId,
        reason: String,
    },
}

/// Outputs returned by TweenEngine::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<TweenEvent>,
    /// Events dropped this tick because `max_events_per_tick` was reached.
    #[serde(default)]
    pub dropped_events: usize,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped_events = 0;
    }

    #[inline]
    pub fn push_event(&mut self, event: TweenEvent, cap: usize) {
        if self.events.len() < cap {
            self.events.push(event);
        } else {
            self.dropped_events += 1;
            log::debug!("event cap {cap} reached, dropping {event:?}");
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
