use thiserror::Error;

/// Stable identifier for [`PollError::AlreadyVoted`].
pub const ALREADY_VOTED: &str = "ALREADY_VOTED";
/// Stable identifier for [`PollError::UnavailableChoice`].
pub const UNAVAILABLE_CHOICE: &str = "UNAVAILABLE_CHOICE";

/// Rejections raised by a single poll while casting a vote.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("Voter has already voted in this poll")]
    AlreadyVoted,
    #[error("Choice is not available in this poll")]
    UnavailableChoice,
}

impl PollError {
    pub fn code(&self) -> &'static str {
        match self {
            PollError::AlreadyVoted => ALREADY_VOTED,
            PollError::UnavailableChoice => UNAVAILABLE_CHOICE,
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Poll not found: {0}")]
    PollNotFound(String),
    #[error("A poll with id {0} already exists")]
    DuplicatePoll(String),
    #[error("Poll ends before it starts")]
    InvalidWindow,
    #[error("Poll has not started yet")]
    NotStarted,
    #[error("Poll is closed")]
    PollClosed,
    #[error(transparent)]
    Vote(#[from] PollError),
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Invalid poll configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("POLL_CHECK_INTERVAL_SECONDS must be a positive integer")]
    InvalidCheckInterval,
    #[error("POLL_ID_BITS must be an integer between 1 and 122")]
    InvalidIdBits,
}
