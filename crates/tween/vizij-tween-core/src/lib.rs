//! Vizij Tween Core (engine-agnostic)
//!
//! Declarative tween scripts: an authored tree of steps (waits, parallel groups,
//! sub-scripts, jumps, property mutations and entity side effects) is interpreted once
//! per tick, and the property animations it starts are written back into the host by
//! one applicator pass per component family. Script instances and animations are pooled.
//!
//! The host entity runtime is abstracted by `TweenHost`; `MemoryWorld` is a standalone
//! implementation and `bevy_vizij_tween` adapts a Bevy `World`.

pub mod animation;
pub mod apply;
pub mod components;
pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod host;
pub mod ids;
mod interpreter;
pub mod outputs;
pub mod pool;
pub mod property;
pub mod scratch;
pub mod script;
pub mod step;
pub mod stored_script;
pub mod value;
pub mod world;

// Re-exports for consumers (adapters)
pub use animation::{AnimationId, AnimationTable, Interpolation, PropertyAnimation};
pub use apply::{Applicator, ApplyStats};
pub use components::{
    Position, PropertyComponent, SoundParams, SpawnerParams, SpriteState, Switches, TextParams,
    Tint, VisibilityVariance,
};
pub use config::Config;
pub use easing::Easing;
pub use engine::TweenEngine;
pub use error::{HostError, PoolError, TweenError};
pub use host::TweenHost;
pub use ids::EntityId;
pub use outputs::{Outputs, TweenEvent};
pub use pool::{Handle, Pool, PoolStats, Poolable};
pub use property::{PropertyFamily, PropertyId};
pub use script::{ScriptId, ScriptInstance, ScriptState};
pub use step::{
    ColorTargets, PositionTargets, SoundTargets, SpawnerTargets, SpriteTargets, Step,
    StepDefaults, StepKind, SwitchTargets, TextTargets, VisibilityTargets,
};
pub use stored_script::{parse_script_json, Script};
pub use value::{PropertyValue, ValueKind};
pub use world::{ConfigFn, EntityRecord, MemoryWorld, WorldComponent};
