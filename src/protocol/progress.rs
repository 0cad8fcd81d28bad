//! Progress updates from stdin

use std::time::Duration;

use tracing::debug;

use crate::descriptor::ProgressDescriptor;
use crate::dispatch::GeneralConfig;
use crate::host::HostCommand;

use super::{Effect, UpdateEvent};

/// Delay between reaching 100% and closing an auto-close dialog.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_millis(250);

const COMPLETE: u32 = 100;

/// A line holding a non-negative integer; anything else is ignored.
pub fn parse_line(line: &str) -> Option<UpdateEvent> {
    let value: u64 = line.trim().parse().ok()?;
    let value = u32::try_from(value.min(u64::from(COMPLETE))).ok()?;
    Some(UpdateEvent::SetProgress(value))
}

#[derive(Debug, Clone)]
pub struct ProgressState {
    value: u32,
    pulsating: bool,
    auto_close: bool,
    /// Set by the first line reaching 100, cleared when a later line drops below
    completed: bool,
    cancel_accepts: bool,
    cancel_label: String,
}

impl ProgressState {
    pub fn new(descriptor: &ProgressDescriptor, general: &GeneralConfig) -> Self {
        Self {
            value: descriptor.percentage.min(COMPLETE),
            pulsating: descriptor.pulsate,
            auto_close: descriptor.auto_close,
            completed: false,
            cancel_accepts: false,
            cancel_label: general.cancel_label().to_string(),
        }
    }

    pub fn start(&mut self) -> Vec<Effect> {
        if self.pulsating {
            return vec![Effect::Host(HostCommand::Pulsate)];
        }
        vec![Effect::Host(HostCommand::SetProgress(self.value))]
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Whether the cancel control currently finishes the dialog successfully.
    pub fn cancel_accepts(&self) -> bool {
        self.cancel_accepts
    }

    pub fn apply(&mut self, event: UpdateEvent) -> Vec<Effect> {
        match event {
            UpdateEvent::Pulsate => {
                if self.pulsating {
                    return Vec::new();
                }
                self.pulsating = true;
                vec![Effect::Host(HostCommand::Pulsate)]
            }
            UpdateEvent::SetProgress(value) => self.set_progress(value),
            other => {
                debug!("Progress ignores {:?}", other);
                Vec::new()
            }
        }
    }

    fn set_progress(&mut self, value: u32) -> Vec<Effect> {
        if self.pulsating {
            debug!("Ignoring progress {} while pulsating", value);
            return Vec::new();
        }

        self.value = value.min(COMPLETE);
        let mut effects = vec![Effect::Host(HostCommand::SetProgress(self.value))];

        if self.value == COMPLETE {
            if self.completed {
                return effects;
            }
            self.completed = true;
            if self.auto_close {
                effects.push(Effect::CloseAfter(AUTO_CLOSE_DELAY));
            } else {
                self.cancel_accepts = true;
                effects.push(Effect::Host(HostCommand::SetCancelBehavior {
                    accepts: true,
                    label: "Ok".to_string(),
                }));
            }
        } else if self.completed {
            self.completed = false;
            self.cancel_accepts = false;
            effects.push(Effect::Host(HostCommand::SetCancelBehavior {
                accepts: false,
                label: self.cancel_label.clone(),
            }));
        }

        effects
    }
}
