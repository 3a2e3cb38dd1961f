use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::PollError;
use crate::ids::{IdGenerator, TimeIdGenerator};
use crate::voting::{display_choice, votes_label};

/// Voter id used when a vote is cast without one. All anonymous votes share it.
pub const DEFAULT_VOTER: &str = "0";

/// Everything needed to open a poll, as accepted by `create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollConfig {
    pub label: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default)]
    pub any_input: bool,
}

impl PollConfig {
    pub fn new(label: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            label: label.into(),
            start_time,
            end_time,
            values: Vec::new(),
            allow_multiple: false,
            any_input: false,
        }
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    pub fn any_input(mut self, any: bool) -> Self {
        self.any_input = any;
        self
    }
}

/// A single poll: its choices, their tallies and who has voted.
#[derive(Debug, Clone)]
pub struct Poll {
    id: String,
    label: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    // insertion order of the keys in `values`
    choices: Vec<String>,
    values: HashMap<String, u64>,
    voters: HashMap<String, bool>,
    allow_multiple: bool,
    any_input: bool,
}

impl Poll {
    pub fn new(config: PollConfig, id: Option<String>) -> Self {
        Self::with_generator(config, id, &TimeIdGenerator::default())
    }

    pub fn with_generator(config: PollConfig, id: Option<String>, ids: &dyn IdGenerator) -> Self {
        let id = id.unwrap_or_else(|| ids.generate());

        let mut choices = Vec::with_capacity(config.values.len());
        let mut values = HashMap::with_capacity(config.values.len());
        for choice in config.values {
            if !values.contains_key(&choice) {
                values.insert(choice.clone(), 0);
                choices.push(choice);
            }
        }

        Self {
            id,
            label: config.label,
            start_time: config.start_time,
            end_time: config.end_time,
            choices,
            values,
            voters: HashMap::new(),
            allow_multiple: config.allow_multiple,
            any_input: config.any_input,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn allows_multiple(&self) -> bool {
        self.allow_multiple
    }

    pub fn accepts_any_input(&self) -> bool {
        self.any_input
    }

    /// Current count for `choice`, or `None` if it is not a known choice.
    pub fn count(&self, choice: &str) -> Option<u64> {
        self.values.get(choice).copied()
    }

    /// Choices with their counts, in the order they were added.
    pub fn values(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.choices
            .iter()
            .map(move |choice| (choice.as_str(), self.values.get(choice).copied().unwrap_or(0)))
    }

    pub fn total_votes(&self) -> u64 {
        self.values.values().sum()
    }

    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.voters.get(voter_id).copied().unwrap_or(false)
    }

    /// Casts a vote for `choice` and returns its new count.
    ///
    /// In single-vote mode the voter is marked before the choice is checked, so
    /// a vote for an unknown choice still uses up that voter's attempt.
    pub fn vote(&mut self, choice: &str, voter_id: Option<&str>) -> Result<u64, PollError> {
        if self.allow_multiple {
            return self.handle_choice(choice);
        }

        let voter_id = voter_id.unwrap_or(DEFAULT_VOTER);
        if self.has_voted(voter_id) {
            return Err(PollError::AlreadyVoted);
        }
        self.voters.insert(voter_id.to_string(), true);

        self.handle_choice(choice)
    }

    /// Tallies one vote for `choice` without any voter bookkeeping.
    pub fn handle_choice(&mut self, choice: &str) -> Result<u64, PollError> {
        match self.values.get_mut(choice) {
            Some(count) => {
                *count += 1;
                Ok(*count)
            }
            None if self.any_input => {
                self.values.insert(choice.to_string(), 1);
                self.choices.push(choice.to_string());
                Ok(1)
            }
            None => Err(PollError::UnavailableChoice),
        }
    }

    /// Header line, then one line per choice. Control characters in labels are escaped.
    pub fn results(&self) -> String {
        let mut summary = format!("Results for {}:", display_choice(&self.label));
        for (choice, count) in self.values() {
            summary.push_str(&format!("\n{}: {}", display_choice(choice), votes_label(count)));
        }
        summary
    }
}
