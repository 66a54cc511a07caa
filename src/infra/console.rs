//! Line-oriented command input for the interactive sandbox.

use std::str::FromStr;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

pub const HELP: &str = "commands: run | clear | example | show | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxCommand {
    /// Render immediately.
    Run,
    /// Reset to the blank template, after confirmation.
    Clear,
    /// Load the card example.
    Example,
    /// Print the URL of the current preview.
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown command `{0}`")]
pub struct UnknownCommand(pub String);

impl FromStr for SandboxCommand {
    type Err = UnknownCommand;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "run" | "r" => Ok(Self::Run),
            "clear" | "c" => Ok(Self::Clear),
            "example" | "e" => Ok(Self::Example),
            "show" | "s" => Ok(Self::Show),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

/// Only an explicit yes confirms.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Reads commands and confirmation answers from stdin.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next non-blank line, or `None` at end of input.
    pub async fn next_line(&mut self) -> Result<Option<String>, std::io::Error> {
        while let Some(line) = self.lines.next_line().await? {
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    /// Print `prompt` and wait for a yes/no answer. End of input counts as no.
    pub async fn confirm(&mut self, prompt: &str) -> Result<bool, std::io::Error> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(format!("{prompt} [y/N] ").as_bytes()).await?;
        stdout.flush().await?;

        Ok(self
            .lines
            .next_line()
            .await?
            .is_some_and(|answer| is_affirmative(&answer)))
    }
}
