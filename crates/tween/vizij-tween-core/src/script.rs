//! Per-branch runtime state.
//!
//! A `ScriptInstance` walks one step list. The list is either a shared reference into
//! authored data (`Arc<[Step]>`, never mutated or freed here) or a private copy owned
//! by the instance, used when a single parallel child is forked onto its own carrier.
//! The private buffer lives inside the pooled instance, so its capacity is recycled
//! along with the instance.

use std::sync::Arc;

use crate::ids::EntityId;
use crate::pool::{Handle, Poolable};
use crate::step::{Step, StepDefaults};

pub type ScriptId = Handle<ScriptInstance>;

/// The steps a script walks and the defaults they resolve against.
#[derive(Clone, Debug, Default)]
pub struct StepProgram {
    shared: Option<Arc<[Step]>>,
    owned: Vec<Step>,
    pub defaults: StepDefaults,
}

impl StepProgram {
    #[inline]
    pub fn steps(&self) -> &[Step] {
        match &self.shared {
            Some(steps) => steps,
            None => &self.owned,
        }
    }

    /// True when the list is a private copy rather than a shared reference.
    #[inline]
    pub fn owns_steps(&self) -> bool {
        self.shared.is_none() && !self.owned.is_empty()
    }

    fn clear(&mut self) {
        self.shared = None;
        self.owned.clear();
        self.defaults = StepDefaults::default();
    }
}

/// Cursor and timers.
///
/// `wait` is the delay before the step at `cursor` fires while `executed` is false, and
/// that step's duration once it has fired.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScriptState {
    pub cursor: usize,
    pub elapsed: f32,
    pub wait: f32,
    pub executed: bool,
    /// One-time setup (initial delay) already ran; survives snapshot/restore.
    pub initialized: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ScriptInstance {
    /// Entity the instance is attached to; its death cancels the branch.
    pub owner: EntityId,
    /// The owner was created for this branch alone and is deleted with it.
    pub carrier: bool,
    pub program: StepProgram,
    pub state: ScriptState,
}

impl Poolable for ScriptInstance {
    fn reset(&mut self) {
        self.owner = EntityId::NONE;
        self.carrier = false;
        self.program.clear();
        self.state = ScriptState::default();
    }
}

impl ScriptInstance {
    /// Point the instance at a shared step list.
    pub fn bind_shared(&mut self, owner: EntityId, steps: Arc<[Step]>, defaults: StepDefaults) {
        self.owner = owner;
        self.program.shared = Some(steps);
        self.program.owned.clear();
        self.program.defaults = defaults;
    }

    /// Give the instance a private one-step list.
    pub fn bind_owned(&mut self, owner: EntityId, step: Step, defaults: StepDefaults) {
        self.owner = owner;
        self.program.shared = None;
        self.program.owned.clear();
        self.program.owned.push(step);
        self.program.defaults = defaults;
    }

    #[inline]
    pub fn steps(&self) -> &[Step] {
        self.program.steps()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.cursor >= self.steps().len()
    }

    /// Borrow the program immutably and the timers mutably at the same time.
    #[inline]
    pub fn split(&mut self) -> (&StepProgram, &mut ScriptState) {
        (&self.program, &mut self.state)
    }
}
