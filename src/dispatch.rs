//! Mode dispatch and general options
//!
//! Pulls the options shared by every dialog out of the token stream and
//! picks the dialog mode. Whatever is left goes to the mode's builder.

use serde::Serialize;

use crate::args::{Token, TokenCursor};
use crate::error::ConfigError;
use crate::help::{self, HelpRequest};

/// Options that apply to every dialog mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneralConfig {
    pub title: Option<String>,
    pub window_icon: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Seconds until the process terminates unconditionally
    pub timeout: Option<u64>,
    pub ok_label: Option<String>,
    pub cancel_label: Option<String>,
    pub modal: bool,
    /// Opaque parent window handle, passed through to the host
    pub attach: Option<u64>,
}

impl GeneralConfig {
    pub fn cancel_label(&self) -> &str {
        self.cancel_label.as_deref().unwrap_or("Cancel")
    }

    pub fn ok_label(&self) -> &str {
        self.ok_label.as_deref().unwrap_or("Ok")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Error,
    Info,
    Question,
    Warning,
}

/// The dialog kind selected for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Calendar,
    Entry,
    Message(MessageKind),
    FileSelection,
    List,
    Notification,
    Progress,
    Scale,
    TextInfo,
    ColorSelection,
    Password,
    Forms,
}

impl Mode {
    pub fn from_flag(flag: &str) -> Option<Self> {
        let mode = match flag {
            "--calendar" => Mode::Calendar,
            "--entry" => Mode::Entry,
            "--error" => Mode::Message(MessageKind::Error),
            "--info" => Mode::Message(MessageKind::Info),
            "--question" => Mode::Message(MessageKind::Question),
            "--warning" => Mode::Message(MessageKind::Warning),
            "--file-selection" => Mode::FileSelection,
            "--list" => Mode::List,
            "--notification" => Mode::Notification,
            "--progress" => Mode::Progress,
            "--scale" => Mode::Scale,
            "--text-info" => Mode::TextInfo,
            "--color-selection" => Mode::ColorSelection,
            "--password" => Mode::Password,
            "--forms" => Mode::Forms,
            _ => return None,
        };
        Some(mode)
    }

    pub fn flag(self) -> &'static str {
        match self {
            Mode::Calendar => "--calendar",
            Mode::Entry => "--entry",
            Mode::Message(MessageKind::Error) => "--error",
            Mode::Message(MessageKind::Info) => "--info",
            Mode::Message(MessageKind::Question) => "--question",
            Mode::Message(MessageKind::Warning) => "--warning",
            Mode::FileSelection => "--file-selection",
            Mode::List => "--list",
            Mode::Notification => "--notification",
            Mode::Progress => "--progress",
            Mode::Scale => "--scale",
            Mode::TextInfo => "--text-info",
            Mode::ColorSelection => "--color-selection",
            Mode::Password => "--password",
            Mode::Forms => "--forms",
        }
    }

    pub fn name(self) -> &'static str {
        &self.flag()[2..]
    }
}

/// A parsed invocation, ready for its descriptor builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub general: GeneralConfig,
    pub mode: Mode,
    /// Tokens not consumed as general options, in original order
    pub remaining: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Help(HelpRequest),
    Run(Invocation),
}

/// Resolve help requests, general options and the dialog mode.
pub fn dispatch(tokens: &[Token]) -> Result<Dispatch, ConfigError> {
    if tokens.is_empty() {
        return Ok(Dispatch::Help(HelpRequest::Usage(String::new())));
    }
    if let Some(request) = help::detect(tokens) {
        return Ok(Dispatch::Help(request));
    }

    let (general, remaining) = read_general(tokens)?;

    // First match wins, looking at the full stream before filtering
    let Some(mode) = tokens.iter().find_map(|t| Mode::from_flag(&t.text)) else {
        return Ok(Dispatch::Help(HelpRequest::Usage(String::new())));
    };

    Ok(Dispatch::Run(Invocation {
        general,
        mode,
        remaining,
    }))
}

fn read_general(tokens: &[Token]) -> Result<(GeneralConfig, Vec<Token>), ConfigError> {
    let mut general = GeneralConfig::default();
    let mut remaining = Vec::new();
    let mut cursor = TokenCursor::new(tokens);

    while let Some(token) = cursor.advance() {
        match token.text.as_str() {
            "--title" => general.title = Some(cursor.value()),
            "--window-icon" => general.window_icon = Some(cursor.value()),
            "--width" => general.width = Some(cursor.unsigned("--width")?),
            "--height" => general.height = Some(cursor.unsigned("--height")?),
            "--timeout" => general.timeout = Some(cursor.unsigned("--timeout")?),
            "--ok-label" => general.ok_label = Some(cursor.value()),
            "--cancel-label" => general.cancel_label = Some(cursor.value()),
            "--modal" => general.modal = true,
            "--attach" => general.attach = Some(cursor.unsigned("--attach")?),
            _ => remaining.push(token.clone()),
        }
    }

    Ok((general, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::tokenize;

    fn run(args: &[&str]) -> Invocation {
        match dispatch(&tokenize(args.iter().copied())).unwrap() {
            Dispatch::Run(invocation) => invocation,
            other => panic!("expected a dialog, got {:?}", other),
        }
    }

    #[test]
    fn test_general_options_are_filtered() {
        let invocation = run(&[
            "--title=Pick", "--list", "--width", "300", "--column", "A", "--modal", "a", "--attach=77",
        ]);
        assert_eq!(invocation.mode, Mode::List);
        assert_eq!(invocation.general.title.as_deref(), Some("Pick"));
        assert_eq!(invocation.general.width, Some(300));
        assert_eq!(invocation.general.attach, Some(77));
        assert!(invocation.general.modal);
        let rest: Vec<_> = invocation.remaining.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rest, vec!["--list", "--column", "A", "a"]);
    }

    #[test]
    fn test_numeric_general_options_are_fatal_when_malformed() {
        for flag in ["--width", "--height", "--timeout", "--attach"] {
            let err = dispatch(&tokenize(["--entry", flag, "ten"])).unwrap_err();
            assert_eq!(
                err,
                ConfigError::NotUnsigned {
                    flag: flag.into(),
                    value: "ten".into()
                }
            );
        }
        // A missing trailing value is empty, which is not a number either
        assert!(dispatch(&tokenize(["--entry", "--timeout"])).is_err());
    }

    #[test]
    fn test_missing_trailing_text_value_is_empty() {
        let invocation = run(&["--entry", "--title"]);
        assert_eq!(invocation.general.title.as_deref(), Some(""));
    }

    #[test]
    fn test_first_mode_flag_wins() {
        assert_eq!(run(&["--progress", "--list"]).mode, Mode::Progress);
        assert_eq!(run(&["--warning"]).mode, Mode::Message(MessageKind::Warning));
    }

    #[test]
    fn test_no_mode_is_a_help_request() {
        let result = dispatch(&tokenize(["--title", "x"])).unwrap();
        assert_eq!(result, Dispatch::Help(HelpRequest::Usage(String::new())));
        assert_eq!(
            dispatch(&[]).unwrap(),
            Dispatch::Help(HelpRequest::Usage(String::new()))
        );
    }

    #[test]
    fn test_cancel_label_default() {
        let invocation = run(&["--progress", "--cancel-label", "Stop"]);
        assert_eq!(invocation.general.cancel_label(), "Stop");
        assert_eq!(GeneralConfig::default().cancel_label(), "Cancel");
    }
}
