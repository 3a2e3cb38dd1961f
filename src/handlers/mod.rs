mod vote;

use crate::commands::poll::HELP;
use crate::commands::{Command, parse_command};
use crate::error::CommandError;
use crate::store::PollStore;
use async_trait::async_trait;
use log::{info, warn};
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Destination for the replies produced by command handlers.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, message: &str) -> Result<(), HandlerError>;
}

pub struct StdoutResponder {
    out: Mutex<Stdout>,
}

impl StdoutResponder {
    pub fn new() -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for StdoutResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Responder for StdoutResponder {
    async fn respond(&self, message: &str) -> Result<(), HandlerError> {
        let mut out = self.out.lock().await;
        out.write_all(message.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        Ok(())
    }
}

// Entry point for one line of console input
pub async fn handle_line(
    store: &PollStore,
    responder: &dyn Responder,
    line: &str,
) -> Result<(), HandlerError> {
    match parse_command(line) {
        Ok(command) => handle_command(store, responder, command).await,
        Err(CommandError::Empty) => Ok(()),
        Err(e) => {
            warn!("Could not parse command {:?}: {}", line, e);
            responder.respond(&format!("{}. Type `help` for usage.", e)).await
        }
    }
}

pub async fn handle_command(
    store: &PollStore,
    responder: &dyn Responder,
    command: Command,
) -> Result<(), HandlerError> {
    match command {
        Command::Create { config, id } => match store.create_poll(config, id).await {
            Ok(poll_id) => responder.respond(&format!("Created poll {}", poll_id)).await,
            Err(e) => responder.respond(&format!("Could not create poll: {}", e)).await,
        },
        Command::Vote {
            poll_id,
            choice,
            voter_id,
        } => vote::handle_vote(store, responder, &poll_id, &choice, voter_id.as_deref()).await,
        Command::Results { poll_id } => match store.results(&poll_id).await {
            Ok(results) => responder.respond(&results).await,
            Err(e) => responder.respond(&e.to_string()).await,
        },
        Command::End { poll_id } => match store.end_poll(&poll_id).await {
            Ok(results) => {
                info!("Poll {} ended by command", poll_id);
                responder
                    .respond(&format!(
                        "Poll {} has ended. Winner: {}\n{}",
                        poll_id, results.winner, results.summary
                    ))
                    .await
            }
            Err(e) => responder.respond(&e.to_string()).await,
        },
        Command::List => {
            let polls = store.active_polls().await;
            if polls.is_empty() {
                return responder.respond("No active polls.").await;
            }
            let lines: Vec<String> = polls
                .iter()
                .map(|poll| format!("{}: {} (ends {})", poll.id, poll.label, poll.ends_at.to_rfc3339()))
                .collect();
            responder.respond(&lines.join("\n")).await
        }
        Command::Help => responder.respond(HELP).await,
    }
}
