use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::error::StoreError;
use crate::ids::{IdGenerator, TimeIdGenerator};
use crate::models::{Poll, PollConfig};
use crate::voting::{PollResults, plurality};

struct PollEntry {
    poll: Poll,
    is_active: bool,
    created_at: DateTime<Utc>,
}

/// Short description of a poll for listings.
#[derive(Debug, Clone, Serialize)]
pub struct PollSummary {
    pub id: String,
    pub label: String,
    pub ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// In-memory owner of every poll, keyed by poll id.
///
/// Each poll sits behind its own lock, so votes on one poll never wait on
/// another and two votes on the same poll are applied one after the other.
pub struct PollStore {
    polls: RwLock<HashMap<String, Arc<Mutex<PollEntry>>>>,
    ids: Box<dyn IdGenerator>,
}

impl Default for PollStore {
    fn default() -> Self {
        Self::new(Box::new(TimeIdGenerator::default()))
    }
}

impl PollStore {
    pub fn new(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            polls: RwLock::new(HashMap::new()),
            ids,
        }
    }

    // Open a new poll and return its id
    pub async fn create_poll(
        &self,
        config: PollConfig,
        id: Option<String>,
    ) -> Result<String, StoreError> {
        if config.end_time < config.start_time {
            return Err(StoreError::InvalidWindow);
        }

        let poll = Poll::with_generator(config, id, self.ids.as_ref());
        let poll_id = poll.id().to_string();

        let mut polls = self.polls.write().await;
        if polls.contains_key(&poll_id) {
            warn!("Refusing to create poll with duplicate id {}", poll_id);
            return Err(StoreError::DuplicatePoll(poll_id));
        }

        info!("Created poll {} ({})", poll_id, poll.label());
        let entry = PollEntry {
            poll,
            is_active: true,
            created_at: Utc::now(),
        };
        polls.insert(poll_id.clone(), Arc::new(Mutex::new(entry)));

        Ok(poll_id)
    }

    async fn entry(&self, poll_id: &str) -> Result<Arc<Mutex<PollEntry>>, StoreError> {
        self.polls
            .read()
            .await
            .get(poll_id)
            .cloned()
            .ok_or_else(|| StoreError::PollNotFound(poll_id.to_string()))
    }

    pub async fn vote(
        &self,
        poll_id: &str,
        choice: &str,
        voter_id: Option<&str>,
    ) -> Result<u64, StoreError> {
        self.vote_at(poll_id, choice, voter_id, Utc::now()).await
    }

    /// Casts a vote as if the current time were `now`.
    pub async fn vote_at(
        &self,
        poll_id: &str,
        choice: &str,
        voter_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let entry = self.entry(poll_id).await?;
        let mut entry = entry.lock().await;

        if !entry.is_active || now > entry.poll.end_time() {
            return Err(StoreError::PollClosed);
        }
        if now < entry.poll.start_time() {
            return Err(StoreError::NotStarted);
        }

        let count = entry.poll.vote(choice, voter_id)?;
        debug!("Poll {}: {} now has {} votes", poll_id, choice, count);
        Ok(count)
    }

    pub async fn results(&self, poll_id: &str) -> Result<String, StoreError> {
        let entry = self.entry(poll_id).await?;
        let entry = entry.lock().await;
        Ok(entry.poll.results())
    }

    pub async fn standings(&self, poll_id: &str) -> Result<PollResults, StoreError> {
        let entry = self.entry(poll_id).await?;
        let entry = entry.lock().await;
        Ok(plurality::calculate_results(&entry.poll))
    }

    // End a poll (set is_active = false) and return its final standings
    pub async fn end_poll(&self, poll_id: &str) -> Result<PollResults, StoreError> {
        let entry = self.entry(poll_id).await?;
        let mut entry = entry.lock().await;
        if entry.is_active {
            entry.is_active = false;
            info!("Ended poll {}", poll_id);
        }
        Ok(plurality::calculate_results(&entry.poll))
    }

    pub async fn is_active(&self, poll_id: &str) -> Result<bool, StoreError> {
        let entry = self.entry(poll_id).await?;
        let entry = entry.lock().await;
        Ok(entry.is_active)
    }

    async fn snapshot(&self) -> Vec<(String, Arc<Mutex<PollEntry>>)> {
        self.polls
            .read()
            .await
            .iter()
            .map(|(id, entry)| (id.clone(), Arc::clone(entry)))
            .collect()
    }

    // Get polls that have passed their end time and are still active
    pub async fn get_expired_polls(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut expired = Vec::new();
        for (id, entry) in self.snapshot().await {
            let entry = entry.lock().await;
            if entry.is_active && entry.poll.end_time() < now {
                expired.push(id);
            }
        }
        expired
    }

    pub async fn active_polls(&self) -> Vec<PollSummary> {
        let mut active = Vec::new();
        for (id, entry) in self.snapshot().await {
            let entry = entry.lock().await;
            if entry.is_active {
                active.push(PollSummary {
                    id,
                    label: entry.poll.label().to_string(),
                    ends_at: entry.poll.end_time(),
                    created_at: entry.created_at,
                });
            }
        }
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PollError;
    use chrono::Duration;

    fn open_config(values: &[&str]) -> PollConfig {
        let now = Utc::now();
        PollConfig::new("Standup time", now - Duration::hours(1), now + Duration::hours(1))
            .with_values(values.iter().copied())
    }

    #[tokio::test]
    async fn creates_polls_with_explicit_or_generated_ids() {
        let store = PollStore::default();
        let explicit = store
            .create_poll(open_config(&["9am"]), Some("standup".to_string()))
            .await
            .unwrap();
        assert_eq!(explicit, "standup");

        let generated = store.create_poll(open_config(&["9am"]), None).await.unwrap();
        assert!(!generated.is_empty());
        assert_ne!(generated, explicit);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let store = PollStore::default();
        store.create_poll(open_config(&[]), Some("p".into())).await.unwrap();
        let err = store.create_poll(open_config(&[]), Some("p".into())).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePoll(id) if id == "p"));
    }

    #[tokio::test]
    async fn inverted_window_is_rejected() {
        let store = PollStore::default();
        let now = Utc::now();
        let config = PollConfig::new("Backwards", now, now - Duration::minutes(1));
        let err = store.create_poll(config, None).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidWindow));
    }

    #[tokio::test]
    async fn votes_outside_the_window_are_refused() {
        let store = PollStore::default();
        let id = store.create_poll(open_config(&["9am"]), None).await.unwrap();
        let now = Utc::now();

        let early = store.vote_at(&id, "9am", None, now - Duration::hours(2)).await;
        assert!(matches!(early, Err(StoreError::NotStarted)));
        let late = store.vote_at(&id, "9am", None, now + Duration::hours(2)).await;
        assert!(matches!(late, Err(StoreError::PollClosed)));

        assert_eq!(store.vote(&id, "9am", None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ended_polls_refuse_votes_and_report_standings() {
        let store = PollStore::default();
        let id = store.create_poll(open_config(&["9am", "10am"]), None).await.unwrap();
        store.vote(&id, "10am", Some("ana")).await.unwrap();

        let results = store.end_poll(&id).await.unwrap();
        assert_eq!(results.winner, "10am");
        assert!(!store.is_active(&id).await.unwrap());

        let err = store.vote(&id, "9am", Some("bo")).await.unwrap_err();
        assert!(matches!(err, StoreError::PollClosed));
        assert!(store.active_polls().await.is_empty());
    }

    #[tokio::test]
    async fn poll_errors_surface_through_the_store() {
        let store = PollStore::default();
        let id = store.create_poll(open_config(&["9am"]), None).await.unwrap();
        let err = store.vote(&id, "noon", Some("ana")).await.unwrap_err();
        assert!(matches!(err, StoreError::Vote(PollError::UnavailableChoice)));
        let err = store.vote(&id, "9am", Some("ana")).await.unwrap_err();
        assert!(matches!(err, StoreError::Vote(PollError::AlreadyVoted)));
    }

    #[tokio::test]
    async fn unknown_poll_is_not_found() {
        let store = PollStore::default();
        let err = store.results("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::PollNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn finds_only_active_expired_polls() {
        let store = PollStore::default();
        let now = Utc::now();
        let short = PollConfig::new("Short", now - Duration::hours(2), now - Duration::hours(1));
        let expired = store.create_poll(short.clone(), Some("short".into())).await.unwrap();
        store.create_poll(short, Some("ended".into())).await.unwrap();
        store.end_poll("ended").await.unwrap();
        store.create_poll(open_config(&[]), Some("open".into())).await.unwrap();

        assert_eq!(store.get_expired_polls(now).await, vec![expired]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_votes_are_all_counted() {
        let store = Arc::new(PollStore::default());
        let id = store
            .create_poll(open_config(&["yes"]).allow_multiple(true), None)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..50 {
                    store.vote(&id, "yes", None).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let results = store.standings(&id).await.unwrap();
        assert_eq!(results.standings[0].votes, 400);
    }
}
