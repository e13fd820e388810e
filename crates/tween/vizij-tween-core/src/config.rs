//! Core configuration for vizij-tween-core.

use serde::{Deserialize, Serialize};

/// Configuration for pool sizing and per-tick limits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Script instances constructed up front.
    pub initial_scripts: usize,
    /// Property animations constructed up front.
    pub initial_animations: usize,

    /// Initial capacity hints for scratch buffers.
    pub scratch_targets: usize,
    pub scratch_handles: usize,

    /// Steps a single instance may fire in one tick. Bounds zero-duration jump loops;
    /// the remainder runs next tick.
    pub max_steps_per_tick: usize,

    /// Maximum events to retain per tick; later events are dropped (and logged at debug).
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_scripts: 64,
            initial_animations: 256,
            scratch_targets: 16,
            scratch_handles: 256,
            max_steps_per_tick: 64,
            max_events_per_tick: 1024,
        }
    }
}
