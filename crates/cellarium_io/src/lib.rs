//! # Cellarium IO
//!
//! Configuration loading for Cellarium worlds.
//!
//! World documents are JSON. Parse failures report the line and column and,
//! for syntax errors, a caret pointer under the offending character.

/// Error types and result alias for configuration loading
pub mod error;
/// JSON helpers and world configuration loading
pub mod serialization;

pub use error::{ConfigError, Result};
pub use serialization::{
    build_caret_pointer, from_json, load_world_config, parse_world_config, read_json_file,
};
