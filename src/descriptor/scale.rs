//! Scale (slider) dialog

use serde::Serialize;

use crate::args::{self, Token, TokenCursor};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleDescriptor {
    pub text: String,
    pub value: i32,
    pub min: i32,
    pub max: i32,
    pub step: i32,
    /// Print every intermediate value as the slider moves
    pub print_partial: bool,
    pub hide_value: bool,
}

impl Default for ScaleDescriptor {
    fn default() -> Self {
        Self {
            text: "Enter a value".to_string(),
            value: 0,
            min: 0,
            max: 100,
            step: 1,
            print_partial: false,
            hide_value: false,
        }
    }
}

impl ScaleDescriptor {
    /// Effective upper bound; a maximum below the minimum collapses onto it.
    pub fn upper(&self) -> i32 {
        self.max.max(self.min)
    }

    /// Starting position, clamped into the range.
    pub fn initial_value(&self) -> i32 {
        self.value.clamp(self.min, self.upper())
    }

    /// Step size, never less than one.
    pub fn step(&self) -> i32 {
        self.step.max(1)
    }
}

pub fn build(tokens: &[Token]) -> Result<ScaleDescriptor, ConfigError> {
    let mut descriptor = ScaleDescriptor::default();
    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        match flag {
            "--text" => descriptor.text = cursor.value(),
            "--value" => descriptor.value = cursor.signed("--value")?,
            "--min-value" => descriptor.min = cursor.signed("--min-value")?,
            "--max-value" => descriptor.max = cursor.signed("--max-value")?,
            "--step" => descriptor.step = cursor.signed("--step")?,
            "--print-partial" => descriptor.print_partial = true,
            "--hide-value" => descriptor.hide_value = true,
            other => args::unrecognized(other, &["--scale"]),
        }
    }
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::tokenize;

    #[test]
    fn test_defaults() {
        let scale = build(&tokenize(["--scale"])).unwrap();
        assert_eq!(scale, ScaleDescriptor::default());
        assert_eq!(scale.text, "Enter a value");
    }

    #[test]
    fn test_signed_values_and_clamping() {
        let tokens = tokenize(["--min-value", "-10", "--max-value", "10", "--value", "25", "--step", "0"]);
        let scale = build(&tokens).unwrap();
        assert_eq!(scale.min, -10);
        assert_eq!(scale.initial_value(), 10);
        assert_eq!(scale.step(), 1);
    }

    #[test]
    fn test_inverted_range_does_not_panic() {
        let tokens = tokenize(["--min-value", "50", "--max-value", "10", "--value", "0"]);
        let scale = build(&tokens).unwrap();
        assert_eq!(scale.initial_value(), 50);
    }

    #[test]
    fn test_malformed_value_is_fatal() {
        let err = build(&tokenize(["--value", "high"])).unwrap_err();
        assert!(err.to_string().contains("--value"));
    }
}
