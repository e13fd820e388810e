//! Applicators: one pass per property family, writing animation values into the host.

use crate::animation::{AnimationId, AnimationTable};
use crate::error::HostError;
use crate::host::TweenHost;
use crate::outputs::{Outputs, TweenEvent};
use crate::property::PropertyFamily;

/// Per-pass counters, mostly for tests and trace logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub written: usize,
    pub finished: usize,
    pub dropped: usize,
}

/// Samples and writes every live animation of one property family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Applicator {
    family: PropertyFamily,
}

impl Applicator {
    pub const fn new(family: PropertyFamily) -> Self {
        Self { family }
    }

    pub fn family(&self) -> PropertyFamily {
        self.family
    }

    /// Write the current value of each animation, then advance it by `dt`.
    ///
    /// The value is sampled before the advance, so an animation created this tick writes
    /// its start value (plus any carried time) first. A finished animation writes its
    /// final value once and is removed.
    pub fn run<H: TweenHost + ?Sized>(
        &self,
        table: &mut AnimationTable,
        host: &mut H,
        dt: f32,
        handles: &mut Vec<AnimationId>,
        outputs: &mut Outputs,
        event_cap: usize,
    ) -> ApplyStats {
        let mut stats = ApplyStats::default();
        table.collect_family(self.family, handles);

        for &id in handles.iter() {
            let Some(anim) = table.get_mut_by_id(id) else {
                continue;
            };
            let Some(property) = anim.property else {
                continue;
            };
            let entity = anim.entity;
            let value = anim.current_value();
            let finished = anim.is_finished();
            if !finished {
                anim.elapsed += dt;
            }

            match host.write(entity, property, value) {
                Ok(()) => {
                    stats.written += 1;
                    if finished {
                        table.remove(id);
                        stats.finished += 1;
                        outputs.push_event(
                            TweenEvent::AnimationFinished { entity, property },
                            event_cap,
                        );
                    }
                }
                Err(e @ (HostError::DeadEntity(_) | HostError::MissingComponent { .. })) => {
                    log::debug!("dropping '{property}' animation on {entity}: {e}");
                    table.remove(id);
                    stats.dropped += 1;
                    outputs.push_event(
                        TweenEvent::AnimationDropped {
                            entity,
                            property,
                            reason: e.to_string(),
                        },
                        event_cap,
                    );
                }
                Err(e) => {
                    log::warn!("write of '{property}' on {entity} failed: {e}");
                    if finished {
                        table.remove(id);
                    }
                }
            }
        }

        if stats != ApplyStats::default() {
            log::trace!("{:?} applicator: {stats:?}", self.family);
        }
        stats
    }
}

/// One applicator per family, in a fixed order.
pub fn applicators() -> [Applicator; 8] {
    PropertyFamily::ALL.map(Applicator::new)
}
