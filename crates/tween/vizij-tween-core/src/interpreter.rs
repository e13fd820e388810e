//! Step interpreter: advances every script instance once per tick.
//!
//! Time is carried across steps. When a wait runs out mid-frame, the unused part of the
//! frame flows into the next step, so a branch fires its steps at the same elapsed times
//! whatever the frame rate. Animations created by a step start with that leftover as
//! their elapsed time, and forks start with it as their own elapsed time.

use std::fmt;
use std::sync::Arc;

use crate::animation::{AnimationTable, Interpolation};
use crate::config::Config;
use crate::error::TweenError;
use crate::host::TweenHost;
use crate::ids::EntityId;
use crate::outputs::{Outputs, TweenEvent};
use crate::pool::Pool;
use crate::property::PropertyId;
use crate::script::{ScriptId, ScriptInstance};
use crate::step::{Step, StepDefaults, StepKind};
use crate::value::PropertyValue;

/// A branch waiting to be placed on its own carrier entity.
#[derive(Debug)]
pub(crate) struct Fork {
    parent: ScriptId,
    source: ForkSource,
    defaults: StepDefaults,
    /// Time already past since the fork point.
    elapsed: f32,
}

#[derive(Debug)]
enum ForkSource {
    /// Child list of a sub-script step, shared with the authored tree.
    Shared(Arc<[Step]>),
    /// A delayed parallel child, copied into the instance's own list.
    Single(Step),
}

/// Location of a step for diagnostics, e.g. `steps[2].steps[0]`.
#[derive(Clone, Copy)]
struct StepPath<'p> {
    parent: Option<&'p StepPath<'p>>,
    index: usize,
}

impl<'p> StepPath<'p> {
    fn root(index: usize) -> Self {
        Self {
            parent: None,
            index,
        }
    }

    fn child(&'p self, index: usize) -> StepPath<'p> {
        StepPath {
            parent: Some(self),
            index,
        }
    }
}

impl fmt::Display for StepPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent {
            write!(f, "{parent}.")?;
        }
        write!(f, "steps[{}]", self.index)
    }
}

enum Outcome {
    Waiting,
    Finished,
    Cancelled,
}

/// Everything a step may touch besides the script pool.
pub(crate) struct Effects<'a, H: TweenHost + ?Sized> {
    pub cfg: &'a Config,
    pub animations: &'a mut AnimationTable,
    pub targets: &'a mut Vec<(PropertyId, PropertyValue)>,
    pub forks: &'a mut Vec<Fork>,
    pub outputs: &'a mut Outputs,
    pub host: &'a mut H,
}

pub(crate) struct Interpreter<'a, H: TweenHost + ?Sized> {
    pub scripts: &'a mut Pool<ScriptInstance>,
    pub fx: Effects<'a, H>,
}

impl<'a, H: TweenHost + ?Sized> Interpreter<'a, H> {
    /// Tick the given instances, then place and tick every branch forked on the way.
    pub fn run(&mut self, ids: &[ScriptId], dt: f32) -> Result<(), TweenError> {
        for &id in ids {
            self.tick(id, dt)?;
        }
        while let Some(fork) = self.fx.forks.pop() {
            let id = self.place_fork(fork);
            self.tick(id, 0.0)?;
        }
        Ok(())
    }

    fn place_fork(&mut self, fork: Fork) -> ScriptId {
        let carrier = self.fx.host.create_entity();
        let id = self.scripts.alloc();
        if let Some(inst) = self.scripts.get_mut(id) {
            match fork.source {
                ForkSource::Shared(steps) => inst.bind_shared(carrier, steps, fork.defaults),
                ForkSource::Single(step) => inst.bind_owned(carrier, step, fork.defaults),
            }
            inst.carrier = true;
            inst.state.elapsed = fork.elapsed;
        }
        log::trace!("forked {id:?} from {:?} onto carrier {carrier}", fork.parent);
        self.fx.outputs.push_event(
            TweenEvent::BranchForked {
                parent: fork.parent,
                script: id,
                carrier,
            },
            self.fx.cfg.max_events_per_tick,
        );
        id
    }

    fn tick(&mut self, id: ScriptId, dt: f32) -> Result<(), TweenError> {
        let Some(inst) = self.scripts.get_mut(id) else {
            // Released earlier in this pass.
            return Ok(());
        };
        let owner = inst.owner;
        if !self.fx.host.is_alive(owner) {
            return self.cancel(id);
        }

        let (program, state) = inst.split();
        let steps = program.steps();
        if !state.initialized {
            state.initialized = true;
            state.wait = steps.first().map(Step::delay_or_zero).unwrap_or(0.0);
        }
        state.elapsed += dt;

        let mut budget = self.fx.cfg.max_steps_per_tick;
        let outcome = loop {
            if state.elapsed < state.wait {
                break Outcome::Waiting;
            }
            state.elapsed -= state.wait;
            state.wait = 0.0;

            if state.cursor >= steps.len() {
                break Outcome::Finished;
            }
            if state.executed {
                state.executed = false;
                state.cursor += 1;
                match steps.get(state.cursor) {
                    Some(next) => state.wait = next.delay_or_zero(),
                    None => break Outcome::Finished,
                }
                continue;
            }
            if budget == 0 {
                log::debug!("{id:?}: step budget exhausted, resuming next tick");
                break Outcome::Waiting;
            }
            budget -= 1;

            let step = &steps[state.cursor];
            if let StepKind::Jump { distance } = step.kind {
                let target = (state.cursor as i64 + distance as i64).clamp(0, steps.len() as i64);
                state.cursor = target as usize;
                state.wait = step.resolved_duration(&program.defaults)
                    + steps.get(state.cursor).map(Step::delay_or_zero).unwrap_or(0.0);
                continue;
            }

            let path = StepPath::root(state.cursor);
            self.fx
                .apply_step(id, owner, step, &program.defaults, path, state.elapsed)?;
            state.executed = true;
            state.wait = if step.kind.is_side_effect() {
                0.0
            } else {
                step.resolved_duration(&program.defaults)
            };

            if !self.fx.host.is_alive(owner) {
                break Outcome::Cancelled;
            }
        };

        match outcome {
            Outcome::Waiting => Ok(()),
            Outcome::Finished => self.finish(id),
            Outcome::Cancelled => self.cancel(id),
        }
    }

    fn finish(&mut self, id: ScriptId) -> Result<(), TweenError> {
        let Some(inst) = self.scripts.get(id) else {
            return Ok(());
        };
        let (owner, carrier) = (inst.owner, inst.carrier);
        if carrier {
            self.fx.animations.release_entity(owner);
            self.fx.host.delete_entity(owner);
        }
        self.scripts.free(id)?;
        log::trace!("{id:?} finished on {owner}");
        self.fx.outputs.push_event(
            TweenEvent::ScriptFinished { script: id, owner },
            self.fx.cfg.max_events_per_tick,
        );
        Ok(())
    }

    fn cancel(&mut self, id: ScriptId) -> Result<(), TweenError> {
        let Some(inst) = self.scripts.get(id) else {
            return Ok(());
        };
        let owner = inst.owner;
        self.fx.animations.release_entity(owner);
        self.scripts.free(id)?;
        log::debug!("{id:?} cancelled, owner {owner} is gone");
        self.fx.outputs.push_event(
            TweenEvent::ScriptCancelled { script: id, owner },
            self.fx.cfg.max_events_per_tick,
        );
        Ok(())
    }
}

impl<'a, H: TweenHost + ?Sized> Effects<'a, H> {
    fn apply_step(
        &mut self,
        script: ScriptId,
        owner: EntityId,
        step: &Step,
        defaults: &StepDefaults,
        path: StepPath<'_>,
        leftover: f32,
    ) -> Result<(), TweenError> {
        match &step.kind {
            StepKind::Wait => {}
            StepKind::SubScript { steps } => self.forks.push(Fork {
                parent: script,
                source: ForkSource::Shared(steps.clone()),
                defaults: step.child_defaults(defaults),
                elapsed: leftover,
            }),
            StepKind::Parallel { steps } => {
                let inherited = step.child_defaults(defaults);
                for (j, child) in steps.iter().enumerate() {
                    match &child.kind {
                        StepKind::SubScript { .. } | StepKind::Jump { .. } => {
                            self.skip_step(owner, child, &path.child(j), "not supported inside a parallel group");
                        }
                        _ if child.delay_or_zero() > 0.0 => self.forks.push(Fork {
                            parent: script,
                            source: ForkSource::Single(child.clone()),
                            defaults: inherited,
                            elapsed: leftover,
                        }),
                        _ => self.apply_step(script, owner, child, &inherited, path.child(j), leftover)?,
                    }
                }
            }
            StepKind::Jump { .. } => {
                self.skip_step(owner, step, &path, "jump outside a step list");
            }
            StepKind::Unrecognized => {
                log::error!("unrecognized step at {path} (owner {owner})");
                return Err(TweenError::UnrecognizedStep {
                    path: path.to_string(),
                    owner,
                });
            }
            StepKind::SpawnEntity { function, config } => {
                let entity = self.host.create_entity();
                self.outputs.push_event(
                    TweenEvent::EntitySpawned { entity },
                    self.cfg.max_events_per_tick,
                );
                if let Err(e) = self.host.configure(function, entity, config.as_deref()) {
                    self.side_effect_failed(entity, step, e.to_string());
                }
            }
            StepKind::DeleteEntity => {
                let target = step.resolved_target(defaults);
                if !self.host.is_alive(target) {
                    self.side_effect_failed(target, step, format!("invalid entity {target}"));
                    return Ok(());
                }
                self.animations.release_entity(target);
                self.host.delete_entity(target);
                self.outputs.push_event(
                    TweenEvent::EntityDeleted { entity: target },
                    self.cfg.max_events_per_tick,
                );
            }
            StepKind::ExecuteConfigFunction { function, config } => {
                let target = step.resolved_target(defaults);
                if !self.host.is_alive(target) {
                    self.side_effect_failed(target, step, format!("invalid entity {target}"));
                    return Ok(());
                }
                if let Err(e) = self.host.configure(function, target, config.as_deref()) {
                    self.side_effect_failed(target, step, e.to_string());
                }
            }
            kind => {
                self.targets.clear();
                if kind.mutation_targets(self.targets) {
                    self.apply_mutation(step, defaults, leftover);
                }
            }
        }
        Ok(())
    }

    /// Start one animation per collected field target. Targets the host cannot read are
    /// skipped with a warning; the rest of the step still applies.
    ///
    /// When the slot is already animating, the start value is that animation's value at
    /// the moment this step fired rather than the last value written, which lags a tick.
    fn apply_mutation(&mut self, step: &Step, defaults: &StepDefaults, leftover: f32) {
        let target = step.resolved_target(defaults);
        let duration = step.resolved_duration(defaults);
        let easing = step.resolved_easing(defaults);
        let cap = self.cfg.max_events_per_tick;

        for (property, value) in self.targets.drain(..) {
            let running = self.animations.get(target, property);
            let started = self
                .host
                .read(target, property)
                .map(|read| match running {
                    Some(anim) => anim.value_at(anim.elapsed - leftover),
                    None => read,
                })
                .and_then(|current| Interpolation::between(property, current, value));
            match started {
                Ok(interpolation) => {
                    self.animations
                        .upsert(target, property, interpolation, duration, easing, leftover);
                }
                Err(e) => {
                    log::warn!("skipping '{property}' on {target}: {e}");
                    self.outputs.push_event(
                        TweenEvent::MutationSkipped {
                            entity: target,
                            property,
                            reason: e.to_string(),
                        },
                        cap,
                    );
                }
            }
        }
    }

    fn skip_step(&mut self, owner: EntityId, step: &Step, path: &StepPath<'_>, reason: &str) {
        log::warn!("{path}: skipping '{}' step: {reason}", step.type_name());
        self.outputs.push_event(
            TweenEvent::StepSkipped {
                owner,
                step: step.type_name().to_string(),
                reason: reason.to_string(),
            },
            self.cfg.max_events_per_tick,
        );
    }

    fn side_effect_failed(&mut self, entity: EntityId, step: &Step, reason: String) {
        log::warn!("'{}' on {entity} failed: {reason}", step.type_name());
        self.outputs.push_event(
            TweenEvent::SideEffectFailed {
                entity,
                step: step.type_name().to_string(),
                reason,
            },
            self.cfg.max_events_per_tick,
        );
    }
}
