//! Calendar dialog

use std::fmt::Write;
use std::sync::OnceLock;

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Locale, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};

use crate::args::{self, Token, TokenCursor};
use crate::error::ConfigError;

/// Pattern used when no `--date-format` is given: the locale's date.
pub const DEFAULT_DATE_FORMAT: &str = "%x";

/// Last resort when even the locale pattern cannot be rendered.
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Variables consulted for the date locale, most specific first.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_TIME", "LANG"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDescriptor {
    pub text: String,
    pub day: u32,
    pub month: u32,
    pub year: u32,
    pub date_format: Option<String>,
}

impl CalendarDescriptor {
    /// The requested date, if the components form a real calendar date.
    pub fn date(&self) -> Option<NaiveDate> {
        let year = i32::try_from(self.year).ok()?;
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

pub fn build(tokens: &[Token], today: NaiveDate) -> Result<CalendarDescriptor, ConfigError> {
    let mut descriptor = CalendarDescriptor {
        text: String::new(),
        day: today.day(),
        month: today.month(),
        year: u32::try_from(today.year()).unwrap_or_default(),
        date_format: None,
    };

    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        match flag {
            "--text" => descriptor.text = cursor.value(),
            "--day" => descriptor.day = cursor.unsigned("--day")?,
            "--month" => descriptor.month = cursor.unsigned("--month")?,
            "--year" => descriptor.year = cursor.unsigned("--year")?,
            "--date-format" => descriptor.date_format = Some(cursor.value()),
            other => args::unrecognized(other, &["--calendar"]),
        }
    }

    Ok(descriptor)
}

/// Format `date` with a strftime pattern in the process locale. An empty
/// or invalid pattern falls back to the locale date.
pub fn format_date(date: NaiveDate, pattern: Option<&str>) -> String {
    static LOCALE: OnceLock<Locale> = OnceLock::new();
    let locale = *LOCALE.get_or_init(|| locale_from(|key| std::env::var(key).ok()));
    format_date_in(date, pattern, locale)
}

pub fn format_date_in(date: NaiveDate, pattern: Option<&str>, locale: Locale) -> String {
    let pattern = match pattern {
        Some(p) if !p.is_empty() => p,
        _ => DEFAULT_DATE_FORMAT,
    };
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        warn!("Invalid date format {:?}, using the default", pattern);
        return locale_date(date, locale);
    }
    match render(date, pattern, locale) {
        Some(formatted) => formatted,
        None => {
            // Time fields (%H, %p, %Z...) have nothing to read from a date
            warn!("Date format {:?} needs more than a date, using the default", pattern);
            locale_date(date, locale)
        }
    }
}

fn locale_date(date: NaiveDate, locale: Locale) -> String {
    render(date, DEFAULT_DATE_FORMAT, locale).unwrap_or_else(|| date.format(ISO_DATE_FORMAT).to_string())
}

fn render(date: NaiveDate, pattern: &str, locale: Locale) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format_localized(pattern, locale)).ok()?;
    Some(out)
}

/// Resolve the date locale from `LC_ALL`, `LC_TIME` and `LANG`, dropping
/// the codeset and modifier (`de_DE.UTF-8@euro` is `de_DE`). Unknown or
/// unset locales are POSIX.
fn locale_from(lookup: impl Fn(&str) -> Option<String>) -> Locale {
    let Some(value) = LOCALE_VARS
        .iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.is_empty())
    else {
        return Locale::POSIX;
    };
    let name = value.split(['.', '@']).next().unwrap_or_default();
    match name {
        "" | "C" | "POSIX" => Locale::POSIX,
        name => Locale::try_from(name).unwrap_or_else(|_| {
            debug!("Unknown locale {}, formatting dates as POSIX", name);
            Locale::POSIX
        }),
    }
}
