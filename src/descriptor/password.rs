//! Password dialog

use serde::Serialize;

use crate::args::{self, Token, TokenCursor};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PasswordDescriptor {
    /// Ask for a username above the password
    pub username: bool,
}

pub fn build(tokens: &[Token]) -> PasswordDescriptor {
    let mut descriptor = PasswordDescriptor::default();
    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        if flag == "--username" {
            descriptor.username = true;
            // Nothing after --username is inspected
            break;
        }
        args::unrecognized(flag, &["--password"]);
    }
    descriptor
}
