//! `key: value` commands for a listening notification

use tracing::warn;

use crate::descriptor::NotificationDescriptor;
use crate::host::HostCommand;

use super::{Effect, UpdateEvent};

const USAGE: &str = "icon: <filename>\nmessage: <UTF-8 encoded text>\ntooltip: <UTF-8 encoded text>\nvisible: <true|false>\nhints: <key:value[:key:value...]>";

/// One recognized command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Icon(String),
    Update(UpdateEvent),
}

/// Parse one line. `None` for lines without a recognized key.
pub fn parse_line(line: &str) -> Option<Command> {
    let (key, value) = line.split_once(':')?;
    let value = value.trim();
    let command = match key {
        "icon" => Command::Icon(value.to_string()),
        "message" | "tooltip" => Command::Update(UpdateEvent::SetNotificationText(value.to_string())),
        "visible" => {
            let hidden = value.eq_ignore_ascii_case("false") || value == "0";
            Command::Update(UpdateEvent::SetVisible(!hidden))
        }
        "hints" => Command::Update(UpdateEvent::SetHints(value.to_string())),
        _ => return None,
    };
    Some(command)
}

#[derive(Debug, Clone)]
pub struct NotificationState {
    text: String,
    hints: String,
    listen: bool,
    fallback_shown: bool,
}

impl NotificationState {
    pub fn new(descriptor: &NotificationDescriptor) -> Self {
        Self {
            text: descriptor.text.clone(),
            hints: descriptor.hints.clone(),
            listen: descriptor.listen,
            fallback_shown: false,
        }
    }

    pub fn start(&mut self) -> Vec<Effect> {
        if self.text.is_empty() {
            return Vec::new();
        }
        vec![Effect::Notify(self.text.clone())]
    }

    /// Once the initial notification is out: a one-shot notification
    /// is done unless the user has a fallback surface to dismiss.
    pub fn started(&self) -> Vec<Effect> {
        if self.listen || self.fallback_shown {
            return Vec::new();
        }
        vec![Effect::Finish]
    }

    pub fn hints(&self) -> &str {
        &self.hints
    }

    pub fn listening(&self) -> bool {
        self.listen
    }

    /// Record that the host now shows the fallback surface.
    pub fn fallback_shown(&mut self) {
        self.fallback_shown = true;
    }

    /// Handle one batch of input lines.
    pub fn on_batch(&mut self, text: &str) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut recognized = false;
        for line in text.lines() {
            match parse_line(line) {
                Some(Command::Icon(icon)) => {
                    recognized = true;
                    warn!("'icon' command is not supported (got {:?})", icon);
                }
                Some(Command::Update(event)) => {
                    recognized = true;
                    effects.extend(self.apply(event));
                }
                None => {}
            }
        }
        if !recognized {
            warn!("Unrecognized notification command, expected one of:\n{}", USAGE);
        }
        effects
    }

    pub fn apply(&mut self, event: UpdateEvent) -> Vec<Effect> {
        match event {
            UpdateEvent::SetNotificationText(text) => vec![Effect::Notify(text)],
            UpdateEvent::SetVisible(visible) => {
                if self.fallback_shown {
                    vec![Effect::Host(HostCommand::SetFallbackVisible(visible))]
                } else {
                    warn!("'visible' command only applies to the fallback notification surface");
                    Vec::new()
                }
            }
            UpdateEvent::SetHints(hints) => {
                self.hints = hints;
                Vec::new()
            }
            UpdateEvent::EndOfStream => vec![Effect::Finish],
            _ => Vec::new(),
        }
    }
}
