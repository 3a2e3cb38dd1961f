pub mod poll;

use crate::error::CommandError;
use crate::models::PollConfig;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A quoted run (quotes stripped) or a bare word
    static ref TOKEN: Regex = Regex::new(r#""([^"]*)"|(\S+)"#).unwrap();
}

/// One line of console input, parsed.
#[derive(Debug, Clone)]
pub enum Command {
    Create {
        config: PollConfig,
        id: Option<String>,
    },
    Vote {
        poll_id: String,
        choice: String,
        voter_id: Option<String>,
    },
    Results {
        poll_id: String,
    },
    End {
        poll_id: String,
    },
    List,
    Help,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }

    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim_start()))
        .unwrap_or((line, ""));

    match name.to_ascii_lowercase().as_str() {
        "create" => poll::parse_create(rest),
        "vote" => poll::parse_vote(&tokenize(rest)),
        "results" => poll::parse_results(&tokenize(rest)),
        "end" => poll::parse_end(&tokenize(rest)),
        "list" => Ok(Command::List),
        "help" => Ok(Command::Help),
        _ => Err(CommandError::UnknownCommand(name.to_string())),
    }
}

pub(crate) fn tokenize(input: &str) -> Vec<String> {
    TOKEN
        .captures_iter(input)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_keeps_quoted_words_together() {
        assert_eq!(
            tokenize(r#"p1 "ice cream" bob"#),
            vec!["p1", "ice cream", "bob"]
        );
        assert_eq!(tokenize(r#"p1 """#), vec!["p1", ""]);
    }

    #[test]
    fn blank_lines_are_empty_commands() {
        assert!(matches!(parse_command("   "), Err(CommandError::Empty)));
    }

    #[test]
    fn command_names_are_case_insensitive() {
        assert!(matches!(parse_command("LIST"), Ok(Command::List)));
        assert!(matches!(parse_command("Help"), Ok(Command::Help)));
    }

    #[test]
    fn unknown_commands_are_reported() {
        match parse_command("launch rockets") {
            Err(CommandError::UnknownCommand(name)) => assert_eq!(name, "launch"),
            other => panic!("unexpected parse result: {:?}", other),
        }
    }
}
