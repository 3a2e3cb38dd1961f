use crate::commands::Command;
use crate::error::CommandError;
use crate::models::PollConfig;
use serde::Deserialize;

pub const HELP: &str = "\
Commands:
  create <json>                     open a poll, e.g. create {\"label\":\"Lunch?\",\"startTime\":\"2026-10-19T12:00:00Z\",\"endTime\":\"2026-10-19T13:00:00Z\",\"values\":[\"pizza\",\"salad\"]}
                                    optional fields: allowMultiple, anyInput, id
  vote <poll_id> <choice> [voter]   cast a vote (quote choices containing spaces)
  results <poll_id>                 show the current tally
  end <poll_id>                     close a poll and announce the winner
  list                              show active polls
  help                              show this message";

#[derive(Deserialize)]
struct CreatePayload {
    #[serde(flatten)]
    config: PollConfig,
    #[serde(default)]
    id: Option<String>,
}

pub fn parse_create(payload: &str) -> Result<Command, CommandError> {
    if payload.trim().is_empty() {
        return Err(CommandError::MissingArgument("poll configuration"));
    }
    let CreatePayload { config, id } = serde_json::from_str(payload)?;
    Ok(Command::Create { config, id })
}

pub fn parse_vote(args: &[String]) -> Result<Command, CommandError> {
    let poll_id = args.first().ok_or(CommandError::MissingArgument("poll_id"))?;
    let choice = args.get(1).ok_or(CommandError::MissingArgument("choice"))?;
    Ok(Command::Vote {
        poll_id: poll_id.clone(),
        choice: choice.clone(),
        voter_id: args.get(2).cloned(),
    })
}

pub fn parse_results(args: &[String]) -> Result<Command, CommandError> {
    let poll_id = args.first().ok_or(CommandError::MissingArgument("poll_id"))?;
    Ok(Command::Results {
        poll_id: poll_id.clone(),
    })
}

pub fn parse_end(args: &[String]) -> Result<Command, CommandError> {
    let poll_id = args.first().ok_or(CommandError::MissingArgument("poll_id"))?;
    Ok(Command::End {
        poll_id: poll_id.clone(),
    })
}
