//! Text info dialog

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::args::{self, Token, TokenCursor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextInfoDescriptor {
    pub source: TextSource,
    pub editable: bool,
    pub font: Option<String>,
    /// "I read and agree" label; Ok stays disabled until it is ticked
    pub checkbox: Option<String>,
    pub auto_scroll: bool,
}

impl TextInfoDescriptor {
    /// Initial contents: the file's text, or nothing for stdin.
    /// An unreadable file yields empty text.
    pub fn load_initial_text(&self) -> String {
        match &self.source {
            TextSource::Stdin => String::new(),
            TextSource::File(path) => match std::fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    warn!("Could not read {}: {}", path.display(), e);
                    String::new()
                }
            },
        }
    }
}

pub fn build(tokens: &[Token]) -> TextInfoDescriptor {
    let mut descriptor = TextInfoDescriptor {
        source: TextSource::Stdin,
        editable: false,
        font: None,
        checkbox: None,
        auto_scroll: false,
    };

    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        match flag {
            "--filename" => descriptor.source = TextSource::File(PathBuf::from(cursor.value())),
            "--editable" => descriptor.editable = true,
            "--font" => descriptor.font = Some(cursor.value()),
            "--checkbox" => descriptor.checkbox = Some(cursor.value()),
            "--auto-scroll" => descriptor.auto_scroll = true,
            other => args::unrecognized(other, &["--text-info"]),
        }
    }

    descriptor
}
