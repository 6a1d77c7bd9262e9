// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line prompts that give up cleanly on EOF or Ctrl-C
//!
//! Input is read on a plain OS thread and handed over through a channel.
//! A read that never completes then only parks that thread, so the runtime
//! can still shut down and the process exits after a Ctrl-C.

use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;

/// Lines buffered ahead of the prompt
const READ_AHEAD: usize = 16;

/// Why a prompt returned without an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Input closed
    Eof,
    /// Ctrl-C
    Signal,
}

/// Reads answers line by line from a background reader thread
pub struct Prompter {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl Prompter {
    /// Prompt on standard input
    pub fn stdin() -> Self {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    /// Prompt on any line source; `reader` is drained on its own thread
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel(READ_AHEAD);
        let spawned = std::thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    let failed = line.is_err();
                    if tx.blocking_send(line).is_err() || failed {
                        break;
                    }
                }
            });
        if let Err(e) = spawned {
            // The sender went with the closure, so prompts report EOF
            tracing::error!(error = %e, "failed to start input reader");
        }
        Self { lines: rx }
    }

    /// Print `prompt` and read one trimmed line
    pub async fn line(&mut self, prompt: &str) -> Result<String, Interrupt> {
        print!("{prompt}");
        let _ = std::io::stdout().flush();

        let next = tokio::select! {
            line = self.lines.recv() => line,
            _ = tokio::signal::ctrl_c() => return Err(Interrupt::Signal),
        };

        match next {
            Some(Ok(line)) => Ok(line.trim().to_string()),
            None => Err(Interrupt::Eof),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "failed to read input");
                Err(Interrupt::Eof)
            }
        }
    }

    /// Prompt until a non-blank answer is given
    pub async fn nonempty(&mut self, prompt: &str) -> Result<String, Interrupt> {
        loop {
            let answer = self.line(prompt).await?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            println!("Input cannot be blank.");
        }
    }

    /// Prompt until a whole number above zero is given
    pub async fn positive_int(&mut self, prompt: &str) -> Result<u64, Interrupt> {
        loop {
            let answer = self.line(prompt).await?;
            match parse_positive_int(&answer) {
                Ok(value) => return Ok(value),
                Err(message) => println!("{message}"),
            }
        }
    }
}

/// Parse a strictly positive integer, or explain what is wrong with it
pub fn parse_positive_int(text: &str) -> Result<u64, &'static str> {
    match text.trim().parse::<i128>() {
        Ok(value) if value > 0 => u64::try_from(value).map_err(|_| "That number is too large."),
        Ok(_) => Err("Please enter a positive integer."),
        Err(_) => Err("Not a number - try again"),
    }
}
