//! # Interactive shell
//!
//! Reads telecommands typed by the operator on a background thread and hands
//! them to the main loop over a channel, so that a blocked prompt never holds
//! up the control cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{error, info};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

// Internal
use comms_if::tc::Tc;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const PROMPT: &str = "arm $ ";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Handle to the shell thread.
pub(crate) struct Shell {
    rx: Receiver<ShellEvent>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

pub(crate) enum ShellEvent {
    /// The operator entered a valid telecommand.
    Tc(Tc),

    /// The operator closed the shell.
    Exit,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ShellError {
    #[error("Could not create the line editor: {0}")]
    EditorError(ReadlineError),

    #[error("Could not spawn the shell thread: {0}")]
    ThreadError(std::io::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Shell {
    /// Start the shell on its own thread.
    pub(crate) fn spawn() -> Result<Self, ShellError> {
        let mut rl = DefaultEditor::new().map_err(ShellError::EditorError)?;

        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("shell".into())
            .spawn(move || loop {
                let event = match rl.readline(PROMPT) {
                    Ok(line) => {
                        let line = line.trim();

                        if line.is_empty() {
                            continue
                        }

                        rl.add_history_entry(line).ok();

                        if line == "exit" || line == "quit" {
                            ShellEvent::Exit
                        }
                        else {
                            match Tc::from_line(line) {
                                Ok(tc) => ShellEvent::Tc(tc),
                                Err(e) => {
                                    println!("{}", e);
                                    continue
                                }
                            }
                        }
                    },
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                        ShellEvent::Exit
                    },
                    Err(e) => {
                        error!("Shell error: {}", e);
                        ShellEvent::Exit
                    }
                };

                let exit = matches!(event, ShellEvent::Exit);

                // The main loop has stopped listening, nothing left to do
                if tx.send(event).is_err() || exit {
                    break
                }
            })
            .map_err(ShellError::ThreadError)?;

        info!("Shell started, type `help` for the list of commands");

        Ok(Self { rx })
    }

    /// Get the next event from the shell, or `None` if the operator has not
    /// entered anything since the last call.
    ///
    /// A shell thread which has gone away is reported as an exit.
    pub(crate) fn poll(&self) -> Option<ShellEvent> {
        match self.rx.try_recv() {
            Ok(e) => Some(e),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(ShellEvent::Exit),
        }
    }
}
