//! Text entry dialog

use serde::Serialize;

use crate::args::{self, Token, TokenCursor};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryDescriptor {
    pub text: String,
    pub entry_text: String,
    pub hide_text: bool,
}

pub fn build(tokens: &[Token]) -> EntryDescriptor {
    let mut descriptor = EntryDescriptor::default();
    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        match flag {
            "--text" => descriptor.text = cursor.value(),
            "--entry-text" => descriptor.entry_text = cursor.value(),
            "--hide-text" => descriptor.hide_text = true,
            other => args::unrecognized(other, &["--entry"]),
        }
    }
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::tokenize;

    #[test]
    fn test_later_text_overwrites() {
        let tokens = tokenize(["--entry", "--text=a", "--text", "b", "--entry-text", "x", "--hide-text", "--bogus"]);
        let entry = build(&tokens);
        assert_eq!(entry.text, "b");
        assert_eq!(entry.entry_text, "x");
        assert!(entry.hide_text);
    }
}
