//! Color selection dialog

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::args::{self, Token, TokenCursor};

/// An opaque 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    /// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a basic color name.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        static RGB_FUNCTION: OnceLock<Option<Regex>> = OnceLock::new();
        let re = RGB_FUNCTION.get_or_init(|| {
            Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,[^)]*)?\)$").ok()
        });
        if let Some(caps) = re.as_ref().and_then(|re| re.captures(input)) {
            let channel = |i: usize| caps[i].parse::<u8>().ok();
            return Some(Rgb {
                r: channel(1)?,
                g: channel(2)?,
                b: channel(3)?,
            });
        }

        let named = match input.to_ascii_lowercase().as_str() {
            "black" => (0, 0, 0),
            "white" => (255, 255, 255),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "lime" => (0, 255, 0),
            "blue" => (0, 0, 255),
            "yellow" => (255, 255, 0),
            "cyan" => (0, 255, 255),
            "magenta" => (255, 0, 255),
            "gray" | "grey" => (128, 128, 128),
            "orange" => (255, 165, 0),
            "purple" => (128, 0, 128),
            _ => return None,
        };
        Some(Rgb {
            r: named.0,
            g: named.1,
            b: named.2,
        })
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Rgb {
                    r: digit(0)?,
                    g: digit(1)?,
                    b: digit(2)?,
                })
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Rgb {
                    r: byte(0)?,
                    g: byte(2)?,
                    b: byte(4)?,
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorDescriptor {
    pub color: Rgb,
    pub show_palette: bool,
}

pub fn build(tokens: &[Token]) -> ColorDescriptor {
    let mut descriptor = ColorDescriptor {
        color: Rgb::WHITE,
        show_palette: false,
    };

    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        match flag {
            "--color" => {
                let value = cursor.value();
                match Rgb::parse(&value) {
                    Some(color) => descriptor.color = color,
                    None => warn!("Ignoring unparsable color {:?}", value),
                }
            }
            "--show-palette" => {
                warn!("The show-palette parameter is not supported");
                descriptor.show_palette = true;
            }
            other => args::unrecognized(other, &["--color-selection"]),
        }
    }

    descriptor
}
