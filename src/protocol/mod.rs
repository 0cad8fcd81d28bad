//! Live stdin protocol
//!
//! Progress, text-info and listening notification dialogs keep reading
//! standard input while they are shown. Each line becomes an
//! [`UpdateEvent`]; the per-mode state turns events into [`Effect`]s for
//! the event loop to carry out.

pub mod input;
pub mod notification;
pub mod progress;
pub mod text_info;

use std::time::Duration;

use crate::descriptor::DialogDescriptor;
use crate::dispatch::GeneralConfig;
use crate::host::HostCommand;

pub use input::LiveInput;
pub use notification::NotificationState;
pub use progress::ProgressState;
pub use text_info::TextInfoState;

/// One mutation parsed from live input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    SetProgress(u32),
    Pulsate,
    AppendText(String),
    SetVisible(bool),
    SetNotificationText(String),
    SetHints(String),
    EndOfStream,
}

/// Something the event loop has to do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Host(HostCommand),
    /// Send a desktop notification with this text
    Notify(String),
    /// Finish successfully, silently, after a delay
    CloseAfter(Duration),
    /// Finish successfully, silently, now
    Finish,
}

/// Per-dialog protocol state. Dialogs without a live protocol are `Idle`.
#[derive(Debug, Clone)]
pub enum LiveState {
    Idle,
    Progress(ProgressState),
    TextInfo(TextInfoState),
    Notification(NotificationState),
}

impl LiveState {
    pub fn new(descriptor: &DialogDescriptor, general: &GeneralConfig) -> Self {
        match descriptor {
            DialogDescriptor::Progress(progress) => LiveState::Progress(ProgressState::new(progress, general)),
            DialogDescriptor::TextInfo(text) => LiveState::TextInfo(TextInfoState::new(text)),
            DialogDescriptor::Notification(notification) => {
                LiveState::Notification(NotificationState::new(notification))
            }
            _ => LiveState::Idle,
        }
    }

    /// Effects to run right after the dialog is launched.
    pub fn start(&mut self) -> Vec<Effect> {
        match self {
            LiveState::Progress(progress) => progress.start(),
            LiveState::Notification(notification) => notification.start(),
            LiveState::Idle | LiveState::TextInfo(_) => Vec::new(),
        }
    }

    /// Effects to run once the start effects have been carried out.
    pub fn started(&self) -> Vec<Effect> {
        match self {
            LiveState::Notification(notification) => notification.started(),
            _ => Vec::new(),
        }
    }

    pub fn on_line(&mut self, line: &str) -> Vec<Effect> {
        match self {
            LiveState::Progress(progress) => progress::parse_line(line)
                .map(|event| progress.apply(event))
                .unwrap_or_default(),
            LiveState::TextInfo(text) => text.apply(UpdateEvent::AppendText(line.to_string())),
            LiveState::Notification(notification) => notification.on_batch(line),
            LiveState::Idle => Vec::new(),
        }
    }

    pub fn on_end_of_stream(&mut self) -> Vec<Effect> {
        match self {
            LiveState::Notification(notification) => notification.apply(UpdateEvent::EndOfStream),
            _ => Vec::new(),
        }
    }

    pub fn on_scroll_settled(&mut self) -> Vec<Effect> {
        match self {
            LiveState::TextInfo(text) => text.scroll_settled(),
            _ => Vec::new(),
        }
    }

    /// Whether cancelling right now counts as acceptance.
    pub fn cancel_accepts(&self) -> bool {
        match self {
            LiveState::Progress(progress) => progress.cancel_accepts(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ProgressDescriptor, TextInfoDescriptor, TextSource};

    #[test]
    fn test_idle_for_static_dialogs() {
        let descriptor = DialogDescriptor::Entry(Default::default());
        let mut state = LiveState::new(&descriptor, &GeneralConfig::default());
        assert!(state.start().is_empty());
        assert!(state.on_line("100\n").is_empty());
        assert!(!state.cancel_accepts());
    }

    #[test]
    fn test_progress_lines() {
        let descriptor = DialogDescriptor::Progress(ProgressDescriptor::default());
        let mut state = LiveState::new(&descriptor, &GeneralConfig::default());
        assert!(state.on_line("abc\n").is_empty());
        state.on_line("100\n");
        assert!(state.cancel_accepts());
        assert!(state.on_end_of_stream().is_empty());
    }

    #[test]
    fn test_text_lines_keep_newlines() {
        let descriptor = DialogDescriptor::TextInfo(TextInfoDescriptor {
            source: TextSource::Stdin,
            editable: false,
            font: None,
            checkbox: None,
            auto_scroll: false,
        });
        let mut state = LiveState::new(&descriptor, &GeneralConfig::default());
        assert_eq!(
            state.on_line("hello\n"),
            vec![Effect::Host(HostCommand::AppendText {
                text: "hello\n".into(),
                scroll: false
            })]
        );
    }
}
