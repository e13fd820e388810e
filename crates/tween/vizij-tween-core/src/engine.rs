//! Engine: owns the script and animation pools and runs the two passes of a tick.
//!
//! Methods:
//! - new, start / start_steps / start_with, stop (with host), release_entity
//! - update (interpreter pass, then every applicator), or interpret + apply separately
//! - snapshot_script / restore_script for rewind-style tooling

use std::sync::Arc;

use crate::animation::{AnimationTable, PropertyAnimation};
use crate::apply::{applicators, Applicator, ApplyStats};
use crate::config::Config;
use crate::error::{PoolError, TweenError};
use crate::host::TweenHost;
use crate::ids::EntityId;
use crate::interpreter::{Effects, Fork, Interpreter};
use crate::outputs::Outputs;
use crate::pool::{Pool, PoolStats};
use crate::property::PropertyId;
use crate::scratch::Scratch;
use crate::script::{ScriptId, ScriptInstance};
use crate::step::{Step, StepDefaults};
use crate::stored_script::Script;

#[derive(Debug)]
pub struct TweenEngine {
    cfg: Config,
    scripts: Pool<ScriptInstance>,
    animations: AnimationTable,
    applicators: [Applicator; 8],
    forks: Vec<Fork>,
    scratch: Scratch,
    outputs: Outputs,
}

impl Default for TweenEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl TweenEngine {
    pub fn new(cfg: Config) -> Self {
        Self {
            scripts: Pool::with_capacity(cfg.initial_scripts),
            animations: AnimationTable::with_capacity(cfg.initial_animations),
            applicators: applicators(),
            forks: Vec::new(),
            scratch: Scratch::new(&cfg),
            outputs: Outputs::default(),
            cfg,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    // ---------- Scripts ----------

    /// Run an authored script on `owner`. Steps without a target act on `owner`.
    pub fn start(&mut self, owner: EntityId, script: &Script) -> ScriptId {
        self.start_with(owner, script.steps.clone(), script.defaults_for(owner))
    }

    pub fn start_steps(&mut self, owner: EntityId, steps: Arc<[Step]>) -> ScriptId {
        self.start_with(owner, steps, StepDefaults::with_target(owner))
    }

    /// Attach a new instance to `owner`. The first step is considered on the next tick.
    pub fn start_with(
        &mut self,
        owner: EntityId,
        steps: Arc<[Step]>,
        defaults: StepDefaults,
    ) -> ScriptId {
        let id = self.scripts.alloc();
        if let Some(inst) = self.scripts.get_mut(id) {
            inst.bind_shared(owner, steps, defaults);
        }
        log::debug!("started {id:?} on {owner}");
        id
    }

    /// Free an instance without finishing it. Animations it started on other entities
    /// keep running; a forked branch's carrier entity is deleted along with it.
    pub fn stop<H: TweenHost + ?Sized>(&mut self, id: ScriptId, host: &mut H) -> bool {
        let Some(inst) = self.scripts.get(id) else {
            self.scripts.free(id).ok();
            return false;
        };
        let (owner, carrier) = (inst.owner, inst.carrier);
        if self.scripts.free(id).is_err() {
            return false;
        }
        if carrier {
            self.animations.release_entity(owner);
            host.delete_entity(owner);
        }
        log::debug!("stopped {id:?} on {owner}");
        true
    }

    /// Forget everything attached to `entity`: its script instances and the animations
    /// targeting it. Call when the host deletes an entity outside of a script.
    pub fn release_entity(&mut self, entity: EntityId) -> usize {
        self.scripts.collect_handles(&mut self.scratch.scripts);
        let mut released = 0;
        for &id in &self.scratch.scripts {
            let owned = self.scripts.get(id).is_some_and(|s| s.owner == entity);
            if owned && self.scripts.free(id).is_ok() {
                released += 1;
            }
        }
        self.scratch.scripts.clear();
        released + self.animations.release_entity(entity)
    }

    // ---------- Tick ----------

    /// Advance by `dt` seconds: interpreter pass, then every applicator.
    ///
    /// Returns `Err` only for configuration errors (an unrecognized step type reached
    /// dispatch) and pool misuse; the embedding application treats those as fatal.
    pub fn update<H: TweenHost + ?Sized>(
        &mut self,
        dt: f32,
        host: &mut H,
    ) -> Result<&Outputs, TweenError> {
        self.begin_frame();
        self.interpret(dt, host)?;
        self.apply(dt, host);
        Ok(&self.outputs)
    }

    /// Clear per-tick outputs and scratch. `update` calls this itself.
    pub fn begin_frame(&mut self) {
        self.scratch.begin_frame();
        self.outputs.clear();
    }

    /// Interpreter pass only. Instances started during the pass (forks) are processed in
    /// the same pass with the time carried from their fork point.
    pub fn interpret<H: TweenHost + ?Sized>(
        &mut self,
        dt: f32,
        host: &mut H,
    ) -> Result<(), TweenError> {
        let dt = dt.max(0.0);
        self.scripts.collect_handles(&mut self.scratch.scripts);
        let mut interpreter = Interpreter {
            scripts: &mut self.scripts,
            fx: Effects {
                cfg: &self.cfg,
                animations: &mut self.animations,
                targets: &mut self.scratch.targets,
                forks: &mut self.forks,
                outputs: &mut self.outputs,
                host,
            },
        };
        let result = interpreter.run(&self.scratch.scripts, dt);
        if result.is_err() {
            self.forks.clear();
        }
        result
    }

    /// Every applicator pass, in family order.
    pub fn apply<H: TweenHost + ?Sized>(&mut self, dt: f32, host: &mut H) -> ApplyStats {
        let dt = dt.max(0.0);
        let mut total = ApplyStats::default();
        for applicator in self.applicators {
            let stats = applicator.run(
                &mut self.animations,
                host,
                dt,
                &mut self.scratch.animations,
                &mut self.outputs,
                self.cfg.max_events_per_tick,
            );
            total.written += stats.written;
            total.finished += stats.finished;
            total.dropped += stats.dropped;
        }
        total
    }

    // ---------- Inspection ----------

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn script(&self, id: ScriptId) -> Option<&ScriptInstance> {
        self.scripts.get(id)
    }

    pub fn scripts(&self) -> impl Iterator<Item = (ScriptId, &ScriptInstance)> {
        self.scripts.iter()
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }

    pub fn animation(&self, entity: EntityId, property: PropertyId) -> Option<&PropertyAnimation> {
        self.animations.get(entity, property)
    }

    pub fn animations_on(&self, entity: EntityId) -> impl Iterator<Item = &PropertyAnimation> {
        self.animations.on_entity(entity)
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn script_pool_stats(&self) -> PoolStats {
        self.scripts.stats()
    }

    pub fn animation_pool_stats(&self) -> PoolStats {
        self.animations.pool_stats()
    }

    /// Verify free lists and slot tables agree.
    pub fn check_pools(&self) -> Result<(), PoolError> {
        self.scripts.check_consistency()?;
        self.animations.pool().check_consistency()
    }

    // ---------- Snapshots ----------

    /// Deep copy of an instance's runtime state.
    pub fn snapshot_script(&self, id: ScriptId) -> Option<ScriptInstance> {
        self.scripts.get(id).cloned()
    }

    /// Bring a snapshot back as a new live instance. One-time setup is not repeated.
    pub fn restore_script(&mut self, snapshot: &ScriptInstance) -> ScriptId {
        let id = self.scripts.alloc();
        if let Some(inst) = self.scripts.get_mut(id) {
            inst.clone_from(snapshot);
        }
        id
    }

    /// Deep-copy a live instance into a fresh pooled allocation that runs alongside it.
    pub fn duplicate_script(&mut self, id: ScriptId) -> Option<ScriptId> {
        self.scripts.duplicate(id)
    }
}
