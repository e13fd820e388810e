//! Scratch buffers reused across ticks.

use crate::animation::AnimationId;
use crate::config::Config;
use crate::property::PropertyId;
use crate::script::ScriptId;
use crate::value::PropertyValue;

#[derive(Debug, Default)]
pub struct Scratch {
    /// Field targets of the mutation step being applied.
    pub targets: Vec<(PropertyId, PropertyValue)>,
    /// Live script handles snapshotted at the start of the interpreter pass.
    pub scripts: Vec<ScriptId>,
    /// Animation handles of the family being applied.
    pub animations: Vec<AnimationId>,
}

impl Scratch {
    pub fn new(cfg: &Config) -> Self {
        Self {
            targets: Vec::with_capacity(cfg.scratch_targets),
            scripts: Vec::with_capacity(cfg.scratch_handles),
            animations: Vec::with_capacity(cfg.scratch_handles),
        }
    }

    #[inline]
    pub fn begin_frame(&mut self) {
        self.targets.clear();
        self.scripts.clear();
        self.animations.clear();
    }
}
