use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::TweenError;
use crate::ids::EntityId;
use crate::step::{Step, StepDefaults, StepKind};

/// A named, authored step list plus script-wide defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub name: String,
    /// Duration for steps that leave theirs unset.
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub easing: Option<Easing>,
    pub steps: Arc<[Step]>,
}

impl Script {
    pub fn new(name: &str, steps: Vec<Step>) -> Self {
        Self {
            name: name.to_string(),
            duration: None,
            easing: None,
            steps: steps.into(),
        }
    }

    /// Root defaults for a run of this script against `owner`.
    pub fn defaults_for(&self, owner: EntityId) -> StepDefaults {
        StepDefaults {
            target: owner,
            duration: self.duration,
            easing: self.easing,
        }
    }

    /// Check timing fields and step types across the whole tree.
    pub fn validate(&self) -> Result<(), TweenError> {
        check_time("duration", self.duration, "script")?;
        validate_list(&self.steps, "steps")
    }
}

/// Parse a script from JSON and validate it.
pub fn parse_script_json(s: &str) -> Result<Script, TweenError> {
    let script: Script = serde_json::from_str(s)?;
    script.validate()?;
    Ok(script)
}

fn check_time(field: &str, value: Option<f32>, path: &str) -> Result<(), TweenError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(TweenError::InvalidStep {
            path: path.to_string(),
            reason: format!("{field} must be finite and >= 0, got {v}"),
        }),
        _ => Ok(()),
    }
}

fn validate_list(steps: &[Step], prefix: &str) -> Result<(), TweenError> {
    for (i, step) in steps.iter().enumerate() {
        let path = format!("{prefix}[{i}]");
        check_time("delay", step.delay, &path)?;
        check_time("duration", step.duration, &path)?;
        match &step.kind {
            StepKind::Unrecognized => {
                return Err(TweenError::UnrecognizedStep {
                    path,
                    owner: EntityId::NONE,
                })
            }
            StepKind::Jump { distance: 0 } => {
                return Err(TweenError::InvalidStep {
                    path,
                    reason: "jump distance must be non-zero".into(),
                })
            }
            StepKind::Parallel { steps } => {
                for (j, child) in steps.iter().enumerate() {
                    if matches!(child.kind, StepKind::SubScript { .. } | StepKind::Jump { .. }) {
                        log::warn!(
                            "{path}.steps[{j}]: '{}' inside a parallel group is skipped at runtime",
                            child.type_name()
                        );
                    }
                }
                validate_list(steps, &format!("{path}.steps"))?;
            }
            StepKind::SubScript { steps } => validate_list(steps, &format!("{path}.steps"))?,
            _ => {}
        }
    }
    Ok(())
}
