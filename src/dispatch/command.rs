//! Command-line parsing.

use std::fmt;

/// Word that ends an interactive or scripted run.
pub const QUIT: &str = "quit";

/// One parsed command: an operation word followed by its argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Operation word, lowercased.
    pub operation: String,
    /// Remaining whitespace-separated tokens, case preserved.
    pub tokens: Vec<String>,
}

impl Command {
    /// Parse a line. Blank lines and lines starting with `#` yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let mut words = line.split_whitespace();
        let operation = words.next()?.to_lowercase();
        Some(Self {
            operation,
            tokens: words.map(str::to_string).collect(),
        })
    }

    /// Whether this command ends the run.
    pub fn is_quit(&self) -> bool {
        self.operation == QUIT
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.operation)?;
        for token in &self.tokens {
            write!(f, " {}", token)?;
        }
        Ok(())
    }
}
