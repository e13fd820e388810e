//! Bevy plugin for vizij-tween-core.
//!
//! Scripts run on the `FixedUpdate` schedule: requested scripts are started, the
//! interpreter pass runs, then the applicators write into `Animated<_>` components.

pub mod components;
pub mod host;
pub mod resources;
pub mod systems;

use bevy::prelude::*;
use vizij_tween_core::{Config, Script, ScriptId, TweenEngine};

pub use components::{Animated, PlayTween};
pub use host::{entity_id, to_entity, WorldHost};
pub use resources::{ConfigFn, ConfigFunctions, FixedDt, TweenEvents};

#[derive(Resource)]
pub struct VizijTweenEngine(pub TweenEngine);

impl Default for VizijTweenEngine {
    fn default() -> Self {
        Self(TweenEngine::new(Config::default()))
    }
}

#[derive(Default)]
pub struct VizijTweenPlugin {
    pub config: Config,
}

impl Plugin for VizijTweenPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(VizijTweenEngine(TweenEngine::new(self.config.clone())))
            .init_resource::<ConfigFunctions>()
            .init_resource::<TweenEvents>()
            .init_resource::<FixedDt>()
            .add_systems(
                FixedUpdate,
                (
                    systems::start_requested_tweens_system,
                    systems::interpret_tweens_system,
                    systems::apply_tweens_system,
                )
                    .chain(),
            );
    }
}

/// Start `script` on `owner` right away, outside of the `PlayTween` flow.
pub fn start_script(world: &mut World, owner: Entity, script: &Script) -> Option<ScriptId> {
    let mut eng = world.get_resource_mut::<VizijTweenEngine>()?;
    Some(eng.0.start(entity_id(owner), script))
}

/// Forget the scripts and animations of an entity the app is about to despawn.
pub fn release_entity(world: &mut World, entity: Entity) {
    if let Some(mut eng) = world.get_resource_mut::<VizijTweenEngine>() {
        eng.0.release_entity(entity_id(entity));
    }
}
