//! Operator-facing console lines. Structured detail goes to the log file instead.

use std::io::{self, BufRead, Write};
use zlaunch_core::{LaunchObserver, Stage, Version};

/// Prints run progress as plain status lines.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl LaunchObserver for ConsoleObserver {
    fn on_stage(&mut self, stage: Stage) {
        match stage {
            Stage::CheckingVersion => println!("Checking for updates..."),
            Stage::Downloading => println!("Downloading update..."),
            Stage::Starting => println!("Starting the application..."),
            Stage::CheckingLock | Stage::Persisting => {}
        }
    }

    fn on_update_available(&mut self, local: &Version, remote: &Version) {
        println!("Version {} is available (current {})", remote, local);
    }

    fn on_progress(&mut self, percent: u32) {
        println!("{}%", percent);
    }

    fn on_downloaded(&mut self, version: &Version) {
        println!("Version {} is downloaded!", version);
    }
}

/// Print the error chain and, if asked, block until the operator presses Enter.
pub fn report_failure(err: &anyhow::Error, pause: bool) {
    eprintln!("zlaunch error: {:#}", err);
    if pause {
        wait_for_enter(io::stdin().lock(), io::stdout());
    }
}

fn wait_for_enter(mut input: impl BufRead, mut out: impl Write) {
    let _ = writeln!(out, "Press Enter to exit...");
    let _ = out.flush();
    let mut line = String::new();
    let _ = input.read_line(&mut line);
}
