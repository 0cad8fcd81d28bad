//! rdialog
//!
//! Shows dialogs from shell scripts. The command line picks a dialog mode
//! and its options, the user's answer is printed on stdout and reflected in
//! the exit code. Progress, text-info and notification dialogs can be
//! driven live through stdin.

pub mod app;
pub mod args;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod help;
pub mod host;
pub mod notify;
pub mod protocol;
pub mod result;
pub mod settings;

pub use descriptor::DialogDescriptor;
pub use dispatch::{dispatch, Dispatch, GeneralConfig, Invocation, Mode};
pub use error::{ConfigError, HostError, NotifyError};
pub use result::Exit;
