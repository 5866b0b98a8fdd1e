//! Parsing of interactive review commands.
//!
//! Lines starting with `:` are commands. Any other non-blank line is a prompt
//! that is generated immediately.

use pipeline::ContentKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Select the kind used by the next generation.
    Kind(ContentKind),
    /// Generate a draft. Carries new prompt text, or `None` to reuse the
    /// current prompt.
    Generate(Option<String>),
    Retry,
    Approve,
    Discard,
    /// Print the session status and the staged draft.
    Show,
    /// List a catalog; `None` lists the selected kind.
    List(Option<ContentKind>),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown command ':{0}' (type :help for the list)")]
    Unknown(String),
    #[error(":{command} needs an argument: {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("{0}")]
    BadKind(String),
}

pub const HELP: &str = "\
Type a description to generate a draft for the selected kind, or:
  :kind <machinery|training>   select what to generate
  :generate [text]             generate from the current (or new) prompt
  :retry                       generate again after a failure
  :approve                     add the staged draft to its catalog
  :discard                     drop the staged draft or abandon a request
  :show                        print the session and the staged draft
  :list [machinery|training]   list a catalog
  :help                        show this help
  :quit                        leave";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Some(Command::Generate(Some(line.to_string()))));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "kind" | "k" => {
            let arg = arg.ok_or(CommandError::MissingArgument {
                command: "kind",
                expected: "machinery or training",
            })?;
            Command::Kind(arg.parse().map_err(CommandError::BadKind)?)
        }
        "generate" | "gen" | "g" => Command::Generate(arg.map(str::to_string)),
        "retry" | "r" => Command::Retry,
        "approve" | "a" => Command::Approve,
        "discard" | "d" => Command::Discard,
        "show" | "s" => Command::Show,
        "list" | "l" => Command::List(
            arg.map(str::parse::<ContentKind>)
                .transpose()
                .map_err(CommandError::BadKind)?,
        ),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_prompt() {
        assert_eq!(
            parse("  A powerful 90 HP tractor for sugarcane ").unwrap(),
            Some(Command::Generate(Some(
                "A powerful 90 HP tractor for sugarcane".to_string()
            )))
        );
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn kind_accepts_any_case() {
        assert_eq!(
            parse(":kind Training").unwrap(),
            Some(Command::Kind(ContentKind::Training))
        );
        assert!(matches!(parse(":kind tools"), Err(CommandError::BadKind(_))));
        assert_eq!(
            parse(":kind").unwrap_err(),
            CommandError::MissingArgument {
                command: "kind",
                expected: "machinery or training",
            }
        );
    }

    #[test]
    fn generate_takes_optional_text() {
        assert_eq!(parse(":generate").unwrap(), Some(Command::Generate(None)));
        assert_eq!(
            parse(":g  rotavator for clay soil").unwrap(),
            Some(Command::Generate(Some("rotavator for clay soil".to_string())))
        );
    }

    #[test]
    fn list_defaults_to_selected_kind() {
        assert_eq!(parse(":list").unwrap(), Some(Command::List(None)));
        assert_eq!(
            parse(":list machinery").unwrap(),
            Some(Command::List(Some(ContentKind::Machinery)))
        );
    }

    #[test]
    fn short_aliases() {
        assert_eq!(parse(":a").unwrap(), Some(Command::Approve));
        assert_eq!(parse(":d").unwrap(), Some(Command::Discard));
        assert_eq!(parse(":r").unwrap(), Some(Command::Retry));
        assert_eq!(parse(":q").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn unknown_commands_are_errors() {
        assert_eq!(
            parse(":publish").unwrap_err(),
            CommandError::Unknown("publish".to_string())
        );
    }
}
