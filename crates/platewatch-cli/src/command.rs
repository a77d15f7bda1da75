//! Parsing of REPL input lines.

use platewatch_core::Label;
use thiserror::Error;

/// Words accepted as the first token of a REPL line.
pub const COMMAND_WORDS: [&str; 8] = [
    "list", "see", "unsee", "reset", "undo", "help", "quit", "exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    List,
    See(Label),
    Unsee(Label),
    Reset,
    Undo,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    UnknownCommand(String),
    #[error("'{0}' needs a state name, e.g. '{0} New York'")]
    MissingState(&'static str),
    #[error("'{0}' is not one of the 50 U.S. states")]
    UnknownState(String),
    #[error("'{0}' takes no arguments")]
    UnexpectedArgument(&'static str),
}

/// Parses one non-empty REPL line.
///
/// Command words and state names are matched case-insensitively.
pub fn parse(line: &str) -> Result<ReplCommand, ParseError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => no_argument("list", rest, ReplCommand::List),
        "see" | "s" => Ok(ReplCommand::See(state_argument("see", rest)?)),
        "unsee" | "u" => Ok(ReplCommand::Unsee(state_argument("unsee", rest)?)),
        "reset" => no_argument("reset", rest, ReplCommand::Reset),
        "undo" | "z" => no_argument("undo", rest, ReplCommand::Undo),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        _ => Err(ParseError::UnknownCommand(verb.to_string())),
    }
}

fn no_argument(
    verb: &'static str,
    rest: &str,
    command: ReplCommand,
) -> Result<ReplCommand, ParseError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::UnexpectedArgument(verb))
    }
}

fn state_argument(verb: &'static str, rest: &str) -> Result<Label, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingState(verb));
    }
    Label::find(rest).ok_or_else(|| ParseError::UnknownState(rest.to_string()))
}

pub const HELP_TEXT: &str = "\
Commands:
  list            show every state, seen ones last
  see <state>     mark a state as seen
  unsee <state>   move a state back to the unseen list
  reset           clear all progress
  undo            revert the last change
  help            show this text
  quit            leave PlateWatch";

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str) -> Label {
        Label::from_name(name).unwrap()
    }

    #[test]
    fn test_state_names_with_spaces() {
        assert_eq!(
            parse("see new   hampshire").unwrap_err(),
            ParseError::UnknownState("new   hampshire".to_string())
        );
        assert_eq!(
            parse("see New Hampshire").unwrap(),
            ReplCommand::See(label("New Hampshire"))
        );
        assert_eq!(
            parse("  UNSEE   north dakota ").unwrap(),
            ReplCommand::Unsee(label("North Dakota"))
        );
    }

    #[test]
    fn test_aliases() {
        assert_eq!(parse("ls").unwrap(), ReplCommand::List);
        assert_eq!(parse("s texas").unwrap(), ReplCommand::See(label("Texas")));
        assert_eq!(parse("z").unwrap(), ReplCommand::Undo);
        assert_eq!(parse("exit").unwrap(), ReplCommand::Quit);
        assert_eq!(parse("?").unwrap(), ReplCommand::Help);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("see").unwrap_err(), ParseError::MissingState("see"));
        assert_eq!(
            parse("see Narnia").unwrap_err(),
            ParseError::UnknownState("Narnia".to_string())
        );
        assert_eq!(
            parse("reset now").unwrap_err(),
            ParseError::UnexpectedArgument("reset")
        );
        assert_eq!(
            parse("fly Texas").unwrap_err(),
            ParseError::UnknownCommand("fly".to_string())
        );
    }
}
