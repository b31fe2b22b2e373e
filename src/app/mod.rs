//! Interactive command shell.
//!
//! The shell reads one command per line, executes it against the loaded
//! world (if any) and reports a [`StatusCode`]. Configuration problems leave
//! the shell running without a world.

pub mod command;
pub mod status;
pub mod view;

pub use command::{Command, CommandKind};
pub use status::StatusCode;
pub use view::View;

use anyhow::Context;
use cellarium_core::{BindingFailure, ModuleRegistry, SimulationEngine, WorldConfig};
use std::io::{self, BufRead, Write};
use std::path::Path;

const TESTSIM_USAGE: &str = "TESTSIM <cycle-count>";

pub struct App {
    modules: ModuleRegistry,
    engine: Option<SimulationEngine>,
    pub running: bool,
}

impl App {
    #[must_use]
    pub fn new(modules: ModuleRegistry) -> Self {
        Self {
            modules,
            engine: None,
            running: true,
        }
    }

    #[must_use]
    pub fn engine(&self) -> Option<&SimulationEngine> {
        self.engine.as_ref()
    }

    #[must_use]
    pub fn has_world(&self) -> bool {
        self.engine.is_some()
    }

    /// Replaces the current world. On error no world remains loaded.
    pub fn load_config(&mut self, config: &WorldConfig) -> anyhow::Result<Vec<BindingFailure>> {
        self.engine = None;
        let (engine, failures) = SimulationEngine::from_config(config, &self.modules)
            .with_context(|| format!("building world '{}'", config.name))?;
        self.engine = Some(engine);
        Ok(failures)
    }

    /// Reads, validates and binds a configuration file.
    pub fn load_configuration(&mut self, path: &Path) -> anyhow::Result<Vec<BindingFailure>> {
        self.engine = None;
        let config = cellarium_io::load_world_config(path)
            .with_context(|| format!("loading configuration '{}'", path.display()))?;
        self.load_config(&config)
    }

    /// Executes one command, writing its output and any error status.
    pub fn execute<W: Write>(
        &mut self,
        command: &Command,
        view: &mut View<W>,
    ) -> io::Result<StatusCode> {
        let status = match &command.kind {
            CommandKind::Help => {
                view.help()?;
                StatusCode::NoError
            }
            CommandKind::About => {
                view.about()?;
                StatusCode::NoError
            }
            CommandKind::Exit => {
                self.running = false;
                StatusCode::NoError
            }
            CommandKind::TestSim => self.test_sim(&command.args, view)?,
            CommandKind::Unknown(word) => {
                let detail = format!("'{word}'");
                view.status(StatusCode::UnknownCommand, Some(detail.as_str()))?;
                return Ok(StatusCode::UnknownCommand);
            }
        };
        if status.is_error() {
            view.status(status, None)?;
        }
        Ok(status)
    }

    fn test_sim<W: Write>(&mut self, args: &[String], view: &mut View<W>) -> io::Result<StatusCode> {
        let [count] = args else {
            view.usage(TESTSIM_USAGE)?;
            return Ok(StatusCode::InvalidNumberOfArguments);
        };
        let Ok(count) = count.parse::<i64>() else {
            view.usage(TESTSIM_USAGE)?;
            return Ok(StatusCode::InvalidArgument);
        };
        let Some(engine) = self.engine.as_mut() else {
            return Ok(StatusCode::NoWorld);
        };
        match engine.run_cycles(count) {
            Ok(events) => {
                for event in &events {
                    view.event(event)?;
                }
                Ok(StatusCode::NoError)
            }
            Err(error) => {
                view.error(&error)?;
                view.usage(TESTSIM_USAGE)?;
                Ok(StatusCode::InvalidArgument)
            }
        }
    }

    /// Prompt loop until `EXIT` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, view: &mut View<W>) -> io::Result<()> {
        let mut line = String::new();
        while self.running {
            view.prompt()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                tracing::debug!("End of input");
                break;
            }
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            let status = self.execute(&command, view)?;
            tracing::debug!(kind = ?command.kind, ?status, "Command executed");
        }
        Ok(())
    }
}
