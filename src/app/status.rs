use std::fmt;

/// Outcome of one shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    NoError,
    UnexpectedStatus,
    UnknownCommand,
    InvalidNumberOfArguments,
    InvalidArgument,
    /// A simulation command ran with no world loaded.
    NoWorld,
}

impl StatusCode {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NoError => "No error.",
            Self::UnexpectedStatus => "Unexpected program status.",
            Self::UnknownCommand => "Unknown command.",
            Self::InvalidNumberOfArguments => "The command has an invalid number of arguments.",
            Self::InvalidArgument => "The command has an invalid argument value.",
            Self::NoWorld => "No simulation world is loaded.",
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self != Self::NoError
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_no_error_is_success() {
        assert!(!StatusCode::NoError.is_error());
        assert!(StatusCode::NoWorld.is_error());
        assert_eq!(StatusCode::UnknownCommand.to_string(), "Unknown command.");
    }
}
