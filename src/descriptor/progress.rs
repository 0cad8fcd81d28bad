//! Progress dialog

use serde::Serialize;

use crate::args::{self, Token, TokenCursor};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressDescriptor {
    pub text: String,
    pub percentage: u32,
    pub pulsate: bool,
    pub auto_close: bool,
    /// Signal the parent process when the dialog is cancelled
    pub auto_kill: bool,
    pub no_cancel: bool,
}

pub fn build(tokens: &[Token]) -> Result<ProgressDescriptor, ConfigError> {
    let mut descriptor = ProgressDescriptor::default();
    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        match flag {
            "--text" => descriptor.text = cursor.value(),
            "--percentage" => descriptor.percentage = cursor.unsigned("--percentage")?,
            "--pulsate" => descriptor.pulsate = true,
            "--auto-close" => descriptor.auto_close = true,
            "--auto-kill" => descriptor.auto_kill = true,
            "--no-cancel" => descriptor.no_cancel = true,
            other => args::unrecognized(other, &["--progress"]),
        }
    }
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::tokenize;

    #[test]
    fn test_progress_flags() {
        let tokens = tokenize(["--progress", "--percentage=40", "--auto-close", "--auto-kill", "--no-cancel"]);
        let progress = build(&tokens).unwrap();
        assert_eq!(progress.percentage, 40);
        assert!(progress.auto_close && progress.auto_kill && progress.no_cancel);
        assert!(!progress.pulsate);
    }

    #[test]
    fn test_negative_percentage_is_fatal() {
        let err = build(&tokenize(["--percentage", "-5"])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotUnsigned {
                flag: "--percentage".into(),
                value: "-5".into()
            }
        );
    }
}
