//! REPL command parsing

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty input")]
    Empty,

    #[error("Missing symbol for {0} command")]
    MissingSymbol(&'static str),

    #[error("Unknown command: {0}")]
    Unknown(String),
}

/// Parsed command from one REPL line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Type a symbol into the input and press add
    Add { symbol: String },
    /// Press a tag's remove control
    Remove { symbol: String },
    /// Re-fetch and show the watchlist
    List,
    /// Press the listen button
    Listen,
    /// Cancel the running analysis
    Abort,
    Help,
    Exit,
    /// Bare text: typed into the input, then Enter
    Type { text: String },
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(CommandError::Empty);
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Type {
                text: input.to_string(),
            });
        };

        let mut parts = rest.split_whitespace();
        let cmd = parts.next().map(str::to_lowercase).ok_or(CommandError::Empty)?;
        let arg = parts.next();

        match cmd.as_str() {
            "add" | "a" | "watch" => {
                let symbol = arg.ok_or(CommandError::MissingSymbol("add"))?;
                Ok(Command::Add {
                    symbol: symbol.to_string(),
                })
            }
            "remove" | "rm" | "unwatch" => {
                let symbol = arg.ok_or(CommandError::MissingSymbol("remove"))?;
                Ok(Command::Remove {
                    symbol: symbol.to_uppercase(),
                })
            }
            "list" | "ls" | "watchlist" => Ok(Command::List),
            "listen" | "l" | "analyze" => Ok(Command::Listen),
            "abort" | "stop" => Ok(Command::Abort),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(CommandError::Unknown(cmd)),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Market Whisperer Commands
=========================

Watchlist:
  /add <symbol>      Add a symbol to the watchlist
  /remove <symbol>   Remove a symbol from the watchlist
  /list              Show the watchlist

Analysis:
  /listen            Start an analysis run and wait for whispers
  /abort             Cancel the running analysis (Ctrl-C works too)

Other:
  /help              Show this help
  /exit              Exit

Aliases:
  /a = /add   /rm = /remove   /ls = /list   /l = /listen   /q = /exit

Typing a bare symbol and pressing Enter adds it.
"
    }
}
