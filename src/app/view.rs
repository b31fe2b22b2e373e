//! Text output of the shell.

use super::command::CommandKind;
use super::status::StatusCode;
use cellarium_core::{BindingFailure, EngineEvent, WorldSnapshot};
use std::fmt::Display;
use std::io::{self, Write};

pub const PROGRAM_NAME: &str = "Cellarium";
pub const PROMPT: &str = "> ";

/// Writes everything the user sees; the shell never prints directly.
pub struct View<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> View<W> {
    pub fn new(out: W) -> Self {
        Self { out, json: false }
    }

    /// Print snapshots as one JSON object per line.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "{PROGRAM_NAME} {} - cellular automaton simulation host",
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(self.out, "Type HELP for a list of commands.")
    }

    pub fn about(&mut self) -> io::Result<()> {
        writeln!(self.out, "{PROGRAM_NAME} {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(
            self.out,
            "Runs cellular automata whose behavior comes from pluggable modules bound to"
        )?;
        writeln!(
            self.out,
            "the initialization, update, evaluation, reproduction and selection phases."
        )
    }

    pub fn help(&mut self) -> io::Result<()> {
        writeln!(self.out, "Commands (case-insensitive, abbreviations in parentheses):")?;
        for (name, abbreviations, summary) in CommandKind::TABLE {
            let usage = if name == "TESTSIM" {
                format!("{name} ({}) <cycle-count>", abbreviations.join(", "))
            } else {
                format!("{name} ({})", abbreviations.join(", "))
            };
            writeln!(self.out, "  {usage:<32}{summary}")?;
        }
        Ok(())
    }

    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{PROMPT}")?;
        self.out.flush()
    }

    /// Reports a non-success status, with optional detail.
    pub fn status(&mut self, code: StatusCode, detail: Option<&str>) -> io::Result<()> {
        match detail {
            Some(detail) => writeln!(self.out, "{code} {detail}"),
            None => writeln!(self.out, "{code}"),
        }
    }

    pub fn usage(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "Usage: {text}")
    }

    pub fn error(&mut self, error: &dyn Display) -> io::Result<()> {
        writeln!(self.out, "Error: {error}")
    }

    pub fn binding_failure(&mut self, failure: &BindingFailure) -> io::Result<()> {
        writeln!(
            self.out,
            "Warning: {} hook '{}' not bound: {}",
            failure.phase, failure.reference, failure.error
        )
    }

    pub fn world_loaded(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "World '{name}' loaded.")
    }

    pub fn snapshot(&mut self, snapshot: &WorldSnapshot) -> io::Result<()> {
        if self.json {
            let line = serde_json::to_string(snapshot).map_err(io::Error::other)?;
            writeln!(self.out, "{line}")
        } else {
            write!(self.out, "{snapshot}")
        }
    }

    pub fn event(&mut self, event: &EngineEvent) -> io::Result<()> {
        match event {
            EngineEvent::HookSucceeded { .. } => Ok(()),
            EngineEvent::HookFailed {
                phase,
                cycle,
                error,
            } => writeln!(self.out, "  {phase} hook failed in cycle {cycle}: {error}"),
            EngineEvent::Snapshot(snapshot) => self.snapshot(snapshot),
        }
    }
}
