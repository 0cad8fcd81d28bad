//! Dialog descriptors
//!
//! One builder per mode turns the filtered token stream into an immutable
//! description of the dialog. Builders are single-pass and permissive:
//! unknown flags warn, missing trailing values read as "", and only a
//! malformed numeric value is fatal.

pub mod calendar;
pub mod color;
pub mod entry;
pub mod file_selection;
pub mod forms;
pub mod list;
pub mod message;
pub mod notification;
pub mod password;
pub mod progress;
pub mod scale;
pub mod text_info;

use serde::Serialize;

use crate::args::Token;
use crate::dispatch::Mode;
use crate::error::ConfigError;

pub use calendar::CalendarDescriptor;
pub use color::{ColorDescriptor, Rgb};
pub use entry::EntryDescriptor;
pub use file_selection::{FileFilter, FileMode, FileSelectionDescriptor};
pub use forms::{FormField, FormsDescriptor};
pub use list::{ChecklistModel, ListDescriptor, Selection};
pub use message::{Button, MessageDescriptor};
pub use notification::NotificationDescriptor;
pub use password::PasswordDescriptor;
pub use progress::ProgressDescriptor;
pub use scale::ScaleDescriptor;
pub use text_info::{TextInfoDescriptor, TextSource};

/// Default separator for multi-value results.
pub const DEFAULT_SEPARATOR: &str = "|";

/// Everything needed to render one dialog, keyed by mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DialogDescriptor {
    Calendar(CalendarDescriptor),
    Entry(EntryDescriptor),
    Message(MessageDescriptor),
    FileSelection(FileSelectionDescriptor),
    List(ListDescriptor),
    Notification(NotificationDescriptor),
    Progress(ProgressDescriptor),
    Scale(ScaleDescriptor),
    TextInfo(TextInfoDescriptor),
    ColorSelection(ColorDescriptor),
    Password(PasswordDescriptor),
    Forms(FormsDescriptor),
}

impl DialogDescriptor {
    pub fn mode(&self) -> Mode {
        match self {
            DialogDescriptor::Calendar(_) => Mode::Calendar,
            DialogDescriptor::Entry(_) => Mode::Entry,
            DialogDescriptor::Message(m) => Mode::Message(m.kind),
            DialogDescriptor::FileSelection(_) => Mode::FileSelection,
            DialogDescriptor::List(_) => Mode::List,
            DialogDescriptor::Notification(_) => Mode::Notification,
            DialogDescriptor::Progress(_) => Mode::Progress,
            DialogDescriptor::Scale(_) => Mode::Scale,
            DialogDescriptor::TextInfo(_) => Mode::TextInfo,
            DialogDescriptor::ColorSelection(_) => Mode::ColorSelection,
            DialogDescriptor::Password(_) => Mode::Password,
            DialogDescriptor::Forms(_) => Mode::Forms,
        }
    }

    /// Whether this dialog consumes the live protocol on standard input.
    pub fn listens_to_stdin(&self) -> bool {
        match self {
            DialogDescriptor::Progress(p) => !p.pulsate,
            DialogDescriptor::TextInfo(t) => t.source == TextSource::Stdin,
            DialogDescriptor::Notification(n) => n.listen,
            _ => false,
        }
    }
}

/// Build the descriptor for `mode` from the tokens left after dispatch.
pub fn build(mode: Mode, tokens: &[Token]) -> Result<DialogDescriptor, ConfigError> {
    let descriptor = match mode {
        Mode::Calendar => DialogDescriptor::Calendar(calendar::build(
            tokens,
            chrono::Local::now().date_naive(),
        )?),
        Mode::Entry => DialogDescriptor::Entry(entry::build(tokens)),
        Mode::Message(kind) => DialogDescriptor::Message(message::build(kind, tokens)),
        Mode::FileSelection => DialogDescriptor::FileSelection(file_selection::build(tokens)),
        Mode::List => DialogDescriptor::List(list::build(tokens)?),
        Mode::Notification => DialogDescriptor::Notification(notification::build(tokens)),
        Mode::Progress => DialogDescriptor::Progress(progress::build(tokens)?),
        Mode::Scale => DialogDescriptor::Scale(scale::build(tokens)?),
        Mode::TextInfo => DialogDescriptor::TextInfo(text_info::build(tokens)),
        Mode::ColorSelection => DialogDescriptor::ColorSelection(color::build(tokens)),
        Mode::Password => DialogDescriptor::Password(password::build(tokens)),
        Mode::Forms => DialogDescriptor::Forms(forms::build(tokens)),
    };
    Ok(descriptor)
}

/// Split a `|`-delimited value list as used by the forms flags.
pub(crate) fn split_values(value: &str) -> Vec<String> {
    value.split('|').map(str::to_string).collect()
}
