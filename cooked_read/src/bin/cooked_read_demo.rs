// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Interactive demo: reads lines from the terminal with history and popups until Ctrl+C.
//!
//! Keys: Up/Down recall, F7 history list, F9 jump to command number, F2 copy up to a
//! char, F4 delete up to a char, Esc clears the line.

use std::{io::{Stdout, stdout},
          path::PathBuf,
          thread};

use clap::Parser;
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use miette::IntoDiagnostic;
use r3bl_cooked_read::{AsyncConsole, CancelReason, ConsoleSession, CrosstermScreen,
                       InputEvent, ProcessId, ReadRequest, ScreenBuffer,
                       SessionConfig, TextAttributes, TracingConfig, input_events_from_crossterm,
                       ok, point, setup_default_miette_global_report_handler, size};
use tracing_core::LevelFilter;

type DemoConsole = AsyncConsole<CrosstermScreen<Stdout>>;

#[derive(Debug, Parser)]
#[command(about = "Line editor with command history and popups, in your terminal")]
struct CliArg {
    /// Write debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Session config as JSON. Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lines typed under the same name share a history.
    #[arg(long, default_value = "demo.exe")]
    exe_name: String,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    setup_default_miette_global_report_handler(
        "https://github.com/r3bl-org/r3bl-open-core/issues/new",
    );

    let cli_arg = CliArg::parse();

    if let Some(log_file) = &cli_arg.log_file {
        TracingConfig::new_file(log_file.display().to_string(), LevelFilter::DEBUG)
            .install_global()?;
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
    }

    let config = match &cli_arg.config {
        Some(path) => SessionConfig::try_load(path)?,
        None => SessionConfig::default(),
    };

    let (cols, rows) = terminal::size().into_diagnostic()?;
    let screen = CrosstermScreen::new(stdout(), size(usize::from(cols), usize::from(rows)));
    let console = AsyncConsole::new(ConsoleSession::new(config, screen).into_safe());

    enable_raw_mode().into_diagnostic()?;
    let result = run(&console, &cli_arg.exe_name).await;
    console.lock().shutdown();
    disable_raw_mode().into_diagnostic()?;
    println!();

    tracing::debug!(message = "Stop logging...");
    result
}

async fn run(console: &DemoConsole, exe_name: &str) -> miette::Result<()> {
    console.lock().screen_mut().clear().into_diagnostic()?;

    spawn_input_thread(console.clone());

    loop {
        let request = ReadRequest::new(ProcessId(std::process::id()), exe_name);
        match console.read_line(request).await {
            Ok(response) => {
                let line = response.to_string_lossy();
                echo_result(console, &format!("> {}", line.trim_end()))?;
            }
            Err(error) if error.is_cancelled() => {
                tracing::debug!(message = "read cancelled, exiting", %error);
                return ok!();
            }
            Err(error) => return Err(error.into()),
        }
    }
}

/// Crossterm's reader blocks, so it gets its own thread. The process exits without
/// joining it.
fn spawn_input_thread(console: DemoConsole) {
    thread::spawn(move || {
        loop {
            let event = match crossterm::event::read() {
                Ok(event) => event,
                Err(error) => {
                    tracing::error!(message = "terminal read failed", %error);
                    console.cancel(CancelReason::HandleClosing);
                    return;
                }
            };
            for input_event in input_events_from_crossterm(event) {
                if let InputEvent::WindowBufferSize(new_size) = input_event {
                    console.lock().screen_mut().resize(new_size);
                }
                console.write_input(input_event);
            }
        }
    });
}

/// Print `text` on the row the cursor is on, then move to the next one. At the bottom
/// the screen is cleared.
fn echo_result(console: &DemoConsole, text: &str) -> miette::Result<()> {
    let mut session = console.lock();
    let screen = session.screen_mut();
    let rows = screen.size().rows;
    let mut row = screen.cursor_position().row;
    if row + 2 >= rows {
        screen.clear().into_diagnostic()?;
        row = 0;
    }
    screen
        .write_text(text, point(0, row), TextAttributes::DEFAULT)
        .into_diagnostic()?;
    screen
        .set_cursor_position(point(0, row + 1))
        .into_diagnostic()?;
    ok!()
}
