//! In-memory poll tracking: named choices, per-choice tallies and optional
//! one-vote-per-voter enforcement, with a small console front end.

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod store;
pub mod tasks;
pub mod voting;

pub use error::{ALREADY_VOTED, PollError, StoreError, UNAVAILABLE_CHOICE};
pub use models::{DEFAULT_VOTER, Poll, PollConfig};
pub use store::PollStore;
