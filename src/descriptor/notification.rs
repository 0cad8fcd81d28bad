//! Notification dialog

use serde::Serialize;

use crate::args::{self, Token, TokenCursor};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationDescriptor {
    pub text: String,
    /// Keep reading `key: value` commands from stdin
    pub listen: bool,
    /// Colon-separated `key:value` pairs forwarded as notification hints
    pub hints: String,
}

pub fn build(tokens: &[Token]) -> NotificationDescriptor {
    let mut descriptor = NotificationDescriptor::default();
    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        match flag {
            "--text" => descriptor.text = cursor.value(),
            "--listen" => descriptor.listen = true,
            "--hint" => descriptor.hints = cursor.value(),
            other => args::unrecognized(other, &["--notification"]),
        }
    }
    descriptor
}
