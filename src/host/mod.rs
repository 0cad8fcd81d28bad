//! Dialog hosts
//!
//! A host turns a [`DialogDescriptor`] into something the user can interact
//! with. It runs beside the event loop and talks to it over two channels:
//! live mutations come in as [`HostCommand`]s, user actions go out as
//! [`HostEvent`]s. Answers are typed, so result extraction never has to
//! inspect widgets.

pub mod terminal;

use std::path::PathBuf;

use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::descriptor::{DialogDescriptor, Rgb};
use crate::dispatch::GeneralConfig;
use crate::error::HostError;

pub use terminal::TerminalHost;

/// Everything a host needs to put one dialog on screen.
#[derive(Debug, Clone)]
pub struct HostRequest {
    pub general: GeneralConfig,
    pub descriptor: DialogDescriptor,
    /// Initial text for text-info dialogs
    pub initial_text: String,
}

/// Live changes pushed to a dialog that is already showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    SetProgress(u32),
    Pulsate,
    /// Relabel the cancel control; `accepts` tells whether it now finishes
    /// the dialog successfully
    SetCancelBehavior { accepts: bool, label: String },
    /// Append to a text view. With `scroll`, animate to the end and report
    /// [`HostEvent::ScrollSettled`] when done.
    AppendText { text: String, scroll: bool },
    /// Show a notification message on the fallback surface
    ShowFallback { text: String, dismissable: bool },
    SetFallbackVisible(bool),
}

/// What the user did.
#[derive(Debug)]
pub enum HostEvent {
    Accepted(Answer),
    Cancelled,
    /// A slider moved
    ValueChanged(i32),
    /// A scroll animation finished or was skipped
    ScrollSettled,
    Failed(HostError),
}

/// The value a dialog produced, typed by mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Plain Ok, for dialogs without a value
    Acknowledged,
    Date(NaiveDate),
    Text(String),
    Credentials {
        username: Option<String>,
        password: String,
    },
    Paths(Vec<PathBuf>),
    Color(Rgb),
    Value(i32),
    /// Selected rows, or checked rows for checklists
    Rows(Vec<usize>),
    Form(Vec<FieldAnswer>),
}

impl Answer {
    pub fn kind(&self) -> &'static str {
        match self {
            Answer::Acknowledged => "acknowledgement",
            Answer::Date(_) => "date",
            Answer::Text(_) => "text",
            Answer::Credentials { .. } => "credentials",
            Answer::Paths(_) => "paths",
            Answer::Color(_) => "color",
            Answer::Value(_) => "value",
            Answer::Rows(_) => "rows",
            Answer::Form(_) => "form",
        }
    }
}

/// One form field's value, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAnswer {
    Text(String),
    Date(NaiveDate),
    Rows(Vec<usize>),
    Choice(String),
    Checked(bool),
}

/// The channel ends a host holds while its dialog is up.
pub struct HostLink {
    pub commands: mpsc::UnboundedReceiver<HostCommand>,
    pub events: mpsc::UnboundedSender<HostEvent>,
}

/// The loop's ends of a [`HostLink`].
pub struct HostHandle {
    pub commands: mpsc::UnboundedSender<HostCommand>,
    pub events: mpsc::UnboundedReceiver<HostEvent>,
}

/// Create a connected link/handle pair.
pub fn link() -> (HostLink, HostHandle) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (
        HostLink {
            commands: command_rx,
            events: event_tx,
        },
        HostHandle {
            commands: command_tx,
            events: event_rx,
        },
    )
}

/// Renders dialogs. `launch` must return promptly; interaction happens in
/// tasks or threads the host spawns, reporting through `link`.
pub trait DialogHost {
    fn launch(self, request: HostRequest, link: HostLink) -> Result<(), HostError>;
}
