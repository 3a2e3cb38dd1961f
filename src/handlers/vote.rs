use crate::error::StoreError;
use crate::handlers::{HandlerError, Responder};
use crate::store::PollStore;
use crate::voting::{display_choice, votes_label};
use log::{info, warn};

pub async fn handle_vote(
    store: &PollStore,
    responder: &dyn Responder,
    poll_id: &str,
    choice: &str,
    voter_id: Option<&str>,
) -> Result<(), HandlerError> {
    info!(
        "Recording vote: poll_id={}, choice={}, voter_id={}",
        poll_id,
        choice,
        voter_id.unwrap_or("<anonymous>")
    );

    let message = match store.vote(poll_id, choice, voter_id).await {
        Ok(count) => format!(
            "Vote recorded for {}. It now has {}.",
            display_choice(choice),
            votes_label(count)
        ),
        Err(StoreError::Vote(e)) => {
            warn!("Vote rejected in poll {}: {}", poll_id, e.code());
            format!("Vote rejected [{}]: {}", e.code(), e)
        }
        Err(e) => {
            warn!("Vote rejected in poll {}: {}", poll_id, e);
            format!("Vote rejected: {}", e)
        }
    };

    responder.respond(&message).await
}
