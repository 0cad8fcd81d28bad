//! Argument tokenizing
//!
//! Raw process arguments become a flat [`Token`] sequence. Order matters:
//! repeatable flags append, singular flags overwrite, so every later
//! stage walks the tokens front to back with a [`TokenCursor`].

use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::ConfigError;

/// One command-line token and its position in the token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub index: usize,
    pub text: String,
}

/// Split `--opt=value` arguments into two tokens; pass everything else through.
pub fn tokenize<I, S>(args: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut texts = Vec::new();
    for arg in args {
        let arg: String = arg.into();
        match arg.strip_prefix("--").and_then(|rest| rest.find('=')) {
            Some(split) => {
                let split = split + 2;
                texts.push(arg[..split].to_string());
                texts.push(arg[split + 1..].to_string());
            }
            None => texts.push(arg),
        }
    }

    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| Token { index, text })
        .collect()
}

/// Walks a token slice, handing out flags and the values that follow them.
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Consume the next token.
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the next token's text.
    pub fn next_token(&mut self) -> Option<&'a str> {
        self.advance().map(|token| token.text.as_str())
    }

    /// Consume the value following a flag. A flag at the very end yields "".
    pub fn value(&mut self) -> String {
        self.next_token().unwrap_or_default().to_string()
    }

    /// Consume a value that must be a non-negative integer.
    pub fn unsigned<T: FromStr>(&mut self, flag: &str) -> Result<T, ConfigError> {
        let value = self.value();
        value.parse().map_err(|_| ConfigError::NotUnsigned {
            flag: flag.to_string(),
            value,
        })
    }

    /// Consume a value that must be a (possibly negative) integer.
    pub fn signed<T: FromStr>(&mut self, flag: &str) -> Result<T, ConfigError> {
        let value = self.value();
        value.parse().map_err(|_| ConfigError::NotInteger {
            flag: flag.to_string(),
            value,
        })
    }
}

/// Report a token no builder claimed. Flags are warned about unless they
/// are one of the mode's own selector flags; plain tokens only get a debug line.
pub fn unrecognized(token: &str, own_flags: &[&str]) {
    if token.starts_with("--") {
        if !own_flags.contains(&token) {
            warn!("Unrecognized argument {} for {}", token, own_flags.first().copied().unwrap_or("this dialog"));
        }
    } else {
        debug!("Ignoring stray value {:?}", token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_splits_long_options_at_first_equals() {
        let tokens = tokenize(["--title=a=b", "--list", "x=y", "-t=1"]);
        assert_eq!(texts(&tokens), vec!["--title", "a=b", "--list", "x=y", "-t=1"]);
        assert_eq!(tokens[3].index, 3);
    }

    #[test]
    fn test_empty_value_after_equals() {
        let tokens = tokenize(["--text="]);
        assert_eq!(texts(&tokens), vec!["--text", ""]);
    }

    #[test]
    fn test_cursor_missing_trailing_value_is_empty() {
        let tokens = tokenize(["--text"]);
        let mut cursor = TokenCursor::new(&tokens);
        assert_eq!(cursor.next_token(), Some("--text"));
        assert_eq!(cursor.value(), "");
        assert_eq!(cursor.next_token(), None);
    }

    #[test]
    fn test_cursor_numeric_values() {
        let tokens = tokenize(["12", "-3", "abc"]);
        let mut cursor = TokenCursor::new(&tokens);
        assert_eq!(cursor.unsigned::<u32>("--width"), Ok(12));
        assert_eq!(
            cursor.unsigned::<u32>("--height"),
            Err(ConfigError::NotUnsigned {
                flag: "--height".into(),
                value: "-3".into()
            })
        );
        assert!(cursor.signed::<i32>("--value").is_err());
    }
}
