//! Error, info, question and warning dialogs

use serde::Serialize;

use crate::args::{self, Token, TokenCursor};
use crate::dispatch::MessageKind;

const MESSAGE_FLAGS: &[&str] = &["--info", "--question", "--warning", "--error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Ok,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDescriptor {
    pub kind: MessageKind,
    pub text: String,
    /// Explicit icon, overriding the one derived from `kind`
    pub icon: Option<String>,
    pub wrap: bool,
    pub markup: bool,
    pub default_button: Button,
}

impl MessageDescriptor {
    pub fn buttons(&self) -> &'static [Button] {
        match self.kind {
            MessageKind::Question => &[Button::Ok, Button::Cancel],
            _ => &[Button::Ok],
        }
    }

    pub fn icon_name(&self) -> &str {
        if let Some(icon) = &self.icon {
            return icon;
        }
        match self.kind {
            MessageKind::Error => "dialog-error",
            MessageKind::Info => "dialog-information",
            MessageKind::Question => "dialog-question",
            MessageKind::Warning => "dialog-warning",
        }
    }
}

pub fn build(kind: MessageKind, tokens: &[Token]) -> MessageDescriptor {
    let mut descriptor = MessageDescriptor {
        kind,
        text: String::new(),
        icon: None,
        wrap: true,
        markup: true,
        default_button: Button::Ok,
    };

    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        match flag {
            "--text" => descriptor.text = cursor.value(),
            "--icon-name" => descriptor.icon = Some(cursor.value()),
            "--no-wrap" => descriptor.wrap = false,
            "--no-markup" => descriptor.markup = false,
            "--default-cancel" => descriptor.default_button = Button::Cancel,
            other => args::unrecognized(other, MESSAGE_FLAGS),
        }
    }

    descriptor
}
