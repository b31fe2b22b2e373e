//! Error types for cellarium_io.

use cellarium_core::SimError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a configuration document into a usable world.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File absent or unreadable
    #[error("Configuration file '{}' could not be read: {source}", path.display())]
    Missing {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed document
    #[error("{}", render_parse(message, *line, *column, excerpt.as_ref()))]
    Parse {
        message: String,
        line: usize,
        column: usize,
        /// The offending line and its caret pointer, when the position is known.
        excerpt: Option<(String, String)>,
    },

    /// Well-formed document describing an unusable world
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid characteristics: {0}")]
    Registry(#[from] SimError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    #[must_use]
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::Invalid(msg.into())
    }

    /// Location of a parse error as `(line, column)`, 1-based.
    #[must_use]
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::Parse { line, column, .. } if *line > 0 => Some((*line, *column)),
            _ => None,
        }
    }
}

fn render_parse(
    message: &str,
    line: usize,
    column: usize,
    excerpt: Option<&(String, String)>,
) -> String {
    let mut text = format!("Configuration parse error: {message}");
    if line > 0 {
        text.push_str(&format!("\nLine: {line}, column: {column}"));
    }
    if let Some((source, caret)) = excerpt {
        text.push_str(&format!("\n{source}\n{caret}"));
    }
    text
}
