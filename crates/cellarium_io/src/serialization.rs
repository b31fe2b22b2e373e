//! JSON helpers and world configuration loading.
//!
//! Documents are read as JSON5, so comments and trailing commas are accepted.
//! Property names are folded to lower case before deserializing, which makes
//! key matching case-insensitive. Syntax errors carry their position and the
//! offending line with a caret under the column; content errors (missing or
//! mistyped fields) carry neither.

use crate::error::{ConfigError, Result};
use cellarium_core::{CharacteristicRegistry, WorldConfig};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const TAB_WIDTH: usize = 4;

/// Deserializes JSON text, mapping failures to [`ConfigError::Parse`].
///
/// Object keys are lower-cased first, so `T` must use lower-case field names.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(ConfigError::Parse {
            message: "Empty configuration document".to_string(),
            line: 0,
            column: 0,
            excerpt: None,
        });
    }
    let mut value: Value = json5::from_str(json).map_err(|e| syntax_error(json, e))?;
    fold_keys(&mut value);
    serde_json::from_value(value).map_err(|e| ConfigError::Parse {
        message: e.to_string(),
        line: 0,
        column: 0,
        excerpt: None,
    })
}

/// Lower-cases every object key. On a case-only collision the later key wins.
fn fold_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, mut inner) in std::mem::take(map) {
                fold_keys(&mut inner);
                map.insert(key.to_lowercase(), inner);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(fold_keys),
        _ => {}
    }
}

/// Reads a file and deserializes its JSON content.
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Missing {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&text)
}

/// Parses and validates a world configuration document.
///
/// Beyond syntax this checks [`WorldConfig::validate`] and builds the
/// characteristic registry once, so duplicate names surface here rather than
/// when the engine is constructed.
pub fn parse_world_config(text: &str) -> Result<WorldConfig> {
    let config: WorldConfig = from_json(text)?;
    check_world_config(&config)?;
    Ok(config)
}

/// Loads and validates a world configuration file.
pub fn load_world_config<P: AsRef<Path>>(path: P) -> Result<WorldConfig> {
    let path = path.as_ref();
    let config: WorldConfig = read_json_file(path)?;
    check_world_config(&config)?;
    tracing::info!(
        path = %path.display(),
        world = %config.name,
        fingerprint = %config.fingerprint(),
        "Configuration loaded"
    );
    Ok(config)
}

fn check_world_config(config: &WorldConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| ConfigError::invalid(e.to_string()))?;
    CharacteristicRegistry::new(&config.characteristics)?;
    Ok(())
}

fn syntax_error(text: &str, err: json5::Error) -> ConfigError {
    let json5::Error::Message { msg, location } = err;
    let (line, column) = location.map_or((0, 0), |loc| (loc.line, loc.column));
    let excerpt = line
        .checked_sub(1)
        .and_then(|index| text.lines().nth(index))
        .map(|source| build_caret_pointer(source, column));
    ConfigError::Parse {
        message: summarize(&msg),
        line,
        column,
        excerpt,
    }
}

/// Grammar errors render their own excerpt; keep only the `= expected ...`
/// note so the caret is not drawn twice.
fn summarize(msg: &str) -> String {
    msg.lines()
        .map(str::trim)
        .find_map(|l| l.strip_prefix("= "))
        .or_else(|| msg.lines().map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or("Syntax error")
        .to_string()
}

/// Returns the line with tabs expanded and a `^` line under `column`
/// (1-based, counted in characters of the original line). Columns past the
/// end point just after the last character.
#[must_use]
pub fn build_caret_pointer(line: &str, column: usize) -> (String, String) {
    let mut expanded = String::with_capacity(line.len());
    let mut caret_offset = None;
    for (i, ch) in line.chars().enumerate() {
        if i + 1 == column.max(1) {
            caret_offset = Some(expanded.chars().count());
        }
        if ch == '\t' {
            expanded.push_str(&" ".repeat(TAB_WIDTH));
        } else {
            expanded.push(ch);
        }
    }
    let offset = caret_offset.unwrap_or_else(|| expanded.chars().count());
    (expanded, format!("{}^", " ".repeat(offset)))
}
