//! Error types for rdialog

use thiserror::Error;

/// Fatal problems with the command line. Reported before any dialog exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{flag} must be followed by a positive number (got {value:?})")]
    NotUnsigned { flag: String, value: String },

    #[error("{flag} must be followed by an integer (got {value:?})")]
    NotInteger { flag: String, value: String },
}

/// Failures of the dialog host.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Host task failed: {0}")]
    Task(String),
}

/// Failures of the notification transport. These never abort: the
/// caller falls back to the dialog host.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    #[error("D-Bus call failed: {0}")]
    Fdo(#[from] zbus::fdo::Error),

    #[error("Notification service is not available")]
    Unavailable,

    #[error("Timed out probing the notification service")]
    ProbeTimeout,
}

/// The host answered with a value that does not fit the dialog mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Host answered {answer} for a {mode} dialog")]
pub struct ResultError {
    pub mode: &'static str,
    pub answer: &'static str,
}

