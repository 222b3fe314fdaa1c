//! Voting and consensus domain
//!
//! At the end of every round each member casts a vote on whether the panel
//! is converging. The votes are tallied and compared against the panel's
//! consensus threshold.
//!
//! ```text
//! member text ──parse_vote──▶ ParsedVote ──▶ VoteTally ──▶ ConsensusThreshold::is_satisfied
//!   "VOTE: AGREE"              (Agree, ..)     {4,1,0}        4/5 >= 0.8 → consensus
//! ```

pub mod consensus;
pub mod parsing;
pub mod vote;

pub use consensus::{ConsensusThreshold, DEFAULT_THRESHOLD, VoteTally};
pub use parsing::{MAX_ARGUMENTS, parse_argument_list, parse_vote};
pub use vote::{ParsedVote, VoteType};
