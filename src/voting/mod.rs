pub mod plurality;

use serde::Serialize;

// Report produced when a poll's standings are requested or the poll is ended
#[derive(Debug, Clone)]
pub struct PollResults {
    pub winner: String,              // Leading choice, or a tie/no-votes message
    pub summary: String,             // Detailed results as formatted text
    pub raw_results: String,         // JSON rendering of `standings`
    pub standings: Vec<VoteCount>,   // Per-choice counts, best first
}

// Structure to hold vote counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteCount {
    pub choice: String,
    pub votes: u64,
    pub rank: usize,
}

/// `1 vote`, `2 votes`, ...
pub fn votes_label(count: u64) -> String {
    if count == 1 {
        "1 vote".to_string()
    } else {
        format!("{} votes", count)
    }
}

/// Choice text safe to print on a single line: control characters are escaped.
pub fn display_choice(choice: &str) -> String {
    choice
        .chars()
        .map(|c| {
            if c.is_control() {
                c.escape_default().to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}
