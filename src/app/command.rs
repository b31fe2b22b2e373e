//! Shell command parsing.

/// Recognised command words. Matching ignores case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    About,
    Exit,
    TestSim,
    Unknown(String),
}

impl CommandKind {
    /// Full name and accepted abbreviations, used for matching and help.
    pub const TABLE: [(&'static str, &'static [&'static str], &'static str); 4] = [
        ("HELP", &["H"], "Show this list of commands."),
        ("ABOUT", &["AB"], "Show program information."),
        ("EXIT", &["E", "X"], "Leave the program."),
        ("TESTSIM", &["TS"], "Run <cycle-count> simulation cycles."),
    ];

    #[must_use]
    pub fn from_word(word: &str) -> Self {
        let upper = word.to_uppercase();
        match upper.as_str() {
            "HELP" | "H" => Self::Help,
            "ABOUT" | "AB" => Self::About,
            "EXIT" | "E" | "X" => Self::Exit,
            "TESTSIM" | "TS" => Self::TestSim,
            _ => Self::Unknown(word.to_string()),
        }
    }
}

/// A command word with its whitespace-separated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub args: Vec<String>,
}

impl Command {
    /// Splits a line on whitespace. Returns `None` for a blank line.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let kind = CommandKind::from_word(words.next()?);
        Some(Self {
            kind,
            args: words.map(str::to_string).collect(),
        })
    }
}
