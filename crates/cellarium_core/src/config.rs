//! World configuration document.
//!
//! Maps the JSON world descriptor onto strongly-typed structures. Field names
//! are lower case; loaders fold property names before deserializing so any
//! casing matches. Unknown properties are ignored, numbers may be written as
//! strings, and every lifecycle hook is optional.
//!
//! ## Example
//!
//! ```json
//! {
//!   "name": "colony",
//!   "space": 2,
//!   "dimensions": [100, 100],
//!   "characteristics": ["age", "size"],
//!   "update": { "method": "cellarium_growth;Growth.Colony;Update", "parameters": ["1", "2"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle hook a behavior module can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Initialization,
    Update,
    Evaluation,
    Reproduction,
    Selection,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Initialization,
        Phase::Update,
        Phase::Evaluation,
        Phase::Reproduction,
        Phase::Selection,
    ];

    /// Hooks run on every cycle, in execution order.
    pub const CYCLE: [Phase; 4] = [
        Phase::Update,
        Phase::Evaluation,
        Phase::Reproduction,
        Phase::Selection,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Initialization => "initialization",
            Phase::Update => "update",
            Phase::Evaluation => "evaluation",
            Phase::Reproduction => "reproduction",
            Phase::Selection => "selection",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown simulation phase '{wanted}'"))
    }
}

/// Binding of one lifecycle hook to a module reference.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MethodConfig {
    /// `<module>;<namespace>.<type>;<method>`, namespace optional.
    pub method: String,
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl MethodConfig {
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    pub name: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub space: i64,
    #[serde(deserialize_with = "lenient::integers")]
    pub dimensions: Vec<i64>,
    /// Defines registry order.
    pub characteristics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initialization: Option<MethodConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<MethodConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<MethodConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reproduction: Option<MethodConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<MethodConfig>,
}

/// Integers written as JSON numbers or as numeric strings.
mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
        Text(String),
    }

    impl Number {
        fn into_i64<E: Error>(self) -> Result<i64, E> {
            match self {
                Self::Int(n) => Ok(n),
                #[allow(clippy::cast_possible_truncation)]
                Self::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
                Self::Float(f) => Err(E::custom(format!("expected an integer, found {f}"))),
                Self::Text(s) => s
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("expected an integer, found \"{s}\""))),
            }
        }
    }

    pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Number::deserialize(deserializer)?.into_i64()
    }

    pub fn integers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
        Vec::<Number>::deserialize(deserializer)?
            .into_iter()
            .map(Number::into_i64)
            .collect()
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: "world".to_string(),
            space: 2,
            dimensions: vec![100, 100],
            characteristics: vec!["age".to_string()],
            initialization: None,
            update: None,
            evaluation: None,
            reproduction: None,
            selection: None,
        }
    }
}

impl WorldConfig {
    #[must_use]
    pub fn method(&self, phase: Phase) -> Option<&MethodConfig> {
        match phase {
            Phase::Initialization => self.initialization.as_ref(),
            Phase::Update => self.update.as_ref(),
            Phase::Evaluation => self.evaluation.as_ref(),
            Phase::Reproduction => self.reproduction.as_ref(),
            Phase::Selection => self.selection.as_ref(),
        }
    }

    pub fn set_method(&mut self, phase: Phase, method: Option<MethodConfig>) {
        let slot = match phase {
            Phase::Initialization => &mut self.initialization,
            Phase::Update => &mut self.update,
            Phase::Evaluation => &mut self.evaluation,
            Phase::Reproduction => &mut self.reproduction,
            Phase::Selection => &mut self.selection,
        };
        *slot = method;
    }

    /// Validates the document.
    ///
    /// # Validation Rules
    /// - The world name must not be blank
    /// - At least one characteristic must be configured
    /// - `space` and every dimension must be non-negative
    /// - Every configured hook must name a method reference
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.name.trim().is_empty(), "World name must not be empty");
        anyhow::ensure!(
            !self.characteristics.is_empty(),
            "At least one characteristic must be configured"
        );
        anyhow::ensure!(self.space >= 0, "Space must be non-negative");
        anyhow::ensure!(
            self.dimensions.iter().all(|d| *d >= 0),
            "Dimensions must be non-negative"
        );
        for phase in Phase::ALL {
            if let Some(method) = self.method(phase) {
                anyhow::ensure!(
                    !method.method.trim().is_empty(),
                    "Method reference for phase '{}' must not be empty",
                    phase
                );
            }
        }
        Ok(())
    }

    /// Stable hash of the semantic content, for correlating runs in logs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update(format!("{:?}", self.space).as_bytes());
        hasher.update(format!("{:?}", self.dimensions).as_bytes());
        hasher.update(format!("{:?}", self.characteristics).as_bytes());
        for phase in Phase::ALL {
            hasher.update(format!("{:?}", self.method(phase)).as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
