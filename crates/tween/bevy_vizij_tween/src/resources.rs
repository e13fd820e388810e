use bevy::prelude::*;
use std::collections::HashMap;
use vizij_tween_core::TweenEvent;

/// Entity-configuration function reachable from `spawn_entity` and
/// `execute_config_function` steps.
pub type ConfigFn = fn(&mut World, Entity, Option<&str>) -> Result<(), String>;

/// Registry of config functions by name.
#[derive(Resource, Default)]
pub struct ConfigFunctions {
    pub map: HashMap<String, ConfigFn>,
}

impl ConfigFunctions {
    pub fn register(&mut self, name: &str, f: ConfigFn) -> &mut Self {
        self.map.insert(name.to_string(), f);
        self
    }
}

/// Events of the last fixed tick, staged for gameplay systems to read.
#[derive(Resource, Default, Debug)]
pub struct TweenEvents {
    pub events: Vec<TweenEvent>,
    pub dropped: usize,
    /// Set when the core reported a configuration error; the app is asked to exit.
    pub fault: Option<String>,
}

/// Fixed timestep configuration (seconds per tick).
#[derive(Resource)]
pub struct FixedDt(pub f32);

impl Default for FixedDt {
    fn default() -> Self {
        Self(1.0 / 60.0)
    }
}
