//! Error types for the simulation kernel.
//!
//! Every fallible kernel operation reports one of these variants. Module
//! execution faults are captured here too, so a misbehaving behavior module
//! never aborts the host.

use cellarium_data::Position;
use thiserror::Error;

/// Main error type for cellarium_core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// The same characteristic name (ignoring case) was registered twice
    #[error("Duplicate characteristic name: {0}")]
    DuplicateName(String),

    /// A characteristic name with no registry entry
    #[error("Unknown characteristic: {0}")]
    UnknownCharacteristic(String),

    /// A blank characteristic name in the registry input
    #[error("Characteristic name at position {0} is empty")]
    EmptyName(usize),

    /// Characteristic index outside the cell's vector
    #[error("Characteristic index {index} out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// Mutation of a cell that does not belong to the active write generation
    #[error("Write access denied: cell generation {stamp} is not the active write generation {active}")]
    WriteProtection { stamp: u64, active: u64 },

    /// A handle whose write target no longer exists in the write view
    #[error("Cell at {0} is no longer present in the write view")]
    Detached(Position),

    /// Malformed `<module>;<type>;<method>` reference
    #[error("Invalid module reference: {0}")]
    ReferenceParse(String),

    #[error("Module '{0}' not found")]
    ModuleNotFound(String),

    #[error("Type '{type_name}' not found in module '{module}'")]
    TypeNotFound { module: String, type_name: String },

    #[error("Method '{method}' not found on type '{type_name}' in module '{module}'")]
    MethodNotFound {
        module: String,
        type_name: String,
        method: String,
    },

    /// Fault raised inside an invoked behavior module
    #[error("Module execution failed in '{hook}': {message}")]
    ModuleExecution { hook: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for cellarium_core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new reference parse error.
    #[must_use]
    pub fn reference<S: Into<String>>(msg: S) -> Self {
        Self::ReferenceParse(msg.into())
    }

    /// Creates a new unknown characteristic error.
    #[must_use]
    pub fn unknown<S: Into<String>>(name: S) -> Self {
        Self::UnknownCharacteristic(name.into())
    }

    /// Creates a new module execution error.
    #[must_use]
    pub fn execution<H: Into<String>, S: Into<String>>(hook: H, msg: S) -> Self {
        Self::ModuleExecution {
            hook: hook.into(),
            message: msg.into(),
        }
    }

    /// Creates a new invalid argument error.
    #[must_use]
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Whether this error came from resolving a module reference.
    #[must_use]
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::ReferenceParse(_)
                | Self::ModuleNotFound(_)
                | Self::TypeNotFound { .. }
                | Self::MethodNotFound { .. }
        )
    }
}
