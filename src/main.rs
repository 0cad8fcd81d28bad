//! rdialog
//!
//! Dialogs for shell scripts.
//!
//! # Usage
//!
//! ```bash
//! rdialog --entry --title "Login" --text "User name"
//! long_job | rdialog --progress --auto-close
//! rdialog --notification --listen < commands
//! ```

use std::io::Write;

use anyhow::Context;
use tracing::{debug, error};

use rdialog::app;
use rdialog::args::tokenize;
use rdialog::descriptor;
use rdialog::dispatch::{dispatch, Dispatch};
use rdialog::help;
use rdialog::host::TerminalHost;
use rdialog::notify::DbusNotifier;
use rdialog::protocol::LiveInput;
use rdialog::result::{self, Exit};
use rdialog::settings::Settings;

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    // stdout carries the result
    tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let tokens = tokenize(std::env::args().skip(1));
    let invocation = match dispatch(&tokens) {
        Ok(Dispatch::Help(request)) => {
            print!("{}", help::render(&request));
            return Ok(());
        }
        Ok(Dispatch::Run(invocation)) => invocation,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let descriptor = match descriptor::build(invocation.mode, &invocation.remaining) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    match serde_json::to_string(&descriptor) {
        Ok(json) => debug!("Dialog: {}", json),
        Err(e) => debug!("Could not serialize dialog: {}", e),
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let exit = runtime.block_on(async {
        let input = if descriptor.listens_to_stdin() {
            LiveInput::stdin()
        } else {
            None
        };
        let transport = (!settings.no_dbus).then(DbusNotifier::new);
        let mut stdout = std::io::stdout();
        app::run(
            invocation.general,
            descriptor,
            TerminalHost::new(),
            transport,
            input,
            &mut stdout,
        )
        .await
    });

    // Prompts may still hold blocking threads; do not wait for them
    runtime.shutdown_background();
    let _ = console::Term::stderr().show_cursor();

    finish(exit)
}

fn finish(exit: Exit) -> ! {
    if let Some(text) = &exit.stdout {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
            error!("Failed to write result: {}", e);
            std::process::exit(1);
        }
    }
    if exit.kill_parent {
        result::signal_parent();
    }
    std::process::exit(exit.code)
}
