//! Parsing of interactive input lines.

use parlor_server::domain::Color;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Chat(String),
    Rename(String),
    Color(Color),
    /// Connect when offline, disconnect when connected
    Connect,
    Who,
    Help,
    Quit,
    /// Unknown command or bad argument; carries a message for the user
    Invalid(String),
}

impl InputCommand {
    /// Parse a line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Some(Self::Chat(line.to_string()));
        };

        let (name, argument) = command
            .split_once(char::is_whitespace)
            .map(|(name, argument)| (name, argument.trim()))
            .unwrap_or((command, ""));

        let parsed = match name {
            "name" => Self::Rename(argument.to_string()),
            "color" | "colour" => match Color::from_hex(argument) {
                Ok(color) => Self::Color(color),
                Err(e) => Self::Invalid(format!("{} (expected #RRGGBB)", e)),
            },
            "connect" => Self::Connect,
            "who" => Self::Who,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Invalid(format!("unknown command: /{} (try /help)", other)),
        };
        Some(parsed)
    }
}
