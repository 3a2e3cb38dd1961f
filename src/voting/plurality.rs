use crate::models::Poll;
use crate::voting::{PollResults, VoteCount, display_choice, votes_label};

pub const NO_VOTES: &str = "No votes were cast";

pub fn calculate_results(poll: &Poll) -> PollResults {
    // Stable sort keeps insertion order among equal counts
    let mut sorted_votes: Vec<(String, u64)> = poll
        .values()
        .map(|(choice, votes)| (choice.to_string(), votes))
        .collect();
    sorted_votes.sort_by(|a, b| b.1.cmp(&a.1));

    // Competition ranking: tied choices share a rank, the next rank skips ahead
    let mut standings: Vec<VoteCount> = Vec::with_capacity(sorted_votes.len());
    for (i, (choice, votes)) in sorted_votes.iter().enumerate() {
        let rank = match standings.last() {
            Some(VoteCount { votes: prev, rank, .. }) if prev == votes => *rank,
            _ => i + 1,
        };
        standings.push(VoteCount {
            choice: choice.clone(),
            votes: *votes,
            rank,
        });
    }

    let raw_results = serde_json::to_string(&standings).unwrap_or_default();
    let total_votes = poll.total_votes();

    // If no votes were cast
    if total_votes == 0 {
        return PollResults {
            winner: NO_VOTES.to_string(),
            summary: format!("No votes were cast in {}.", poll.label()),
            raw_results,
            standings,
        };
    }

    let leaders: Vec<&str> = standings
        .iter()
        .filter(|count| count.rank == 1)
        .map(|count| count.choice.as_str())
        .collect();
    let winner = if leaders.len() == 1 {
        leaders[0].to_string()
    } else {
        format!("Tie: {}", leaders.join(", "))
    };

    let mut summary = String::new();
    for count in &standings {
        let share = (count.votes as f64 * 1000.0 / total_votes as f64).round() / 10.0;
        let choice = display_choice(&count.choice);
        let line = if count.rank == 1 {
            format!("**{}**: {} ({}%)", choice, votes_label(count.votes), share)
        } else {
            format!("{}: {} ({}%)", choice, votes_label(count.votes), share)
        };
        summary.push_str(&line);
        summary.push('\n');
    }
    summary.push_str(&format!("\n{} cast.", votes_label(total_votes)));

    PollResults {
        winner,
        summary,
        raw_results,
        standings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PollConfig;
    use chrono::{Duration, Utc};

    fn poll_with(values: &[&str]) -> Poll {
        let now = Utc::now();
        let config = PollConfig::new("Best editor", now, now + Duration::days(1))
            .with_values(values.iter().copied())
            .allow_multiple(true);
        Poll::new(config, Some("p1".to_string()))
    }

    #[test]
    fn empty_poll_has_no_winner() {
        let results = calculate_results(&poll_with(&["vim", "emacs"]));
        assert_eq!(results.winner, NO_VOTES);
        assert_eq!(results.standings.len(), 2);
        assert!(results.summary.contains("Best editor"));
    }

    #[test]
    fn leader_wins_and_is_highlighted() {
        let mut poll = poll_with(&["vim", "emacs", "nano"]);
        poll.vote("emacs", None).unwrap();
        poll.vote("emacs", None).unwrap();
        poll.vote("vim", None).unwrap();
        poll.vote("nano", None).unwrap();

        let results = calculate_results(&poll);
        assert_eq!(results.winner, "emacs");
        assert!(results.summary.starts_with("**emacs**: 2 votes (50%)"));
        assert!(results.summary.contains("vim: 1 vote (25%)"));
        assert!(results.summary.ends_with("4 votes cast."));
        let ranks: Vec<_> = results.standings.iter().map(|c| (c.choice.as_str(), c.rank)).collect();
        assert_eq!(ranks, vec![("emacs", 1), ("vim", 2), ("nano", 2)]);
    }

    #[test]
    fn shared_lead_is_reported_as_tie() {
        let mut poll = poll_with(&["vim", "emacs", "nano"]);
        poll.vote("nano", None).unwrap();
        poll.vote("vim", None).unwrap();

        let results = calculate_results(&poll);
        assert_eq!(results.winner, "Tie: vim, nano");
        assert_eq!(results.standings[2].rank, 3);
    }

    #[test]
    fn raw_results_are_json_standings() {
        let mut poll = poll_with(&["vim"]);
        poll.vote("vim", None).unwrap();
        let results = calculate_results(&poll);
        assert_eq!(results.raw_results, r#"[{"choice":"vim","votes":1,"rank":1}]"#);
    }
}
