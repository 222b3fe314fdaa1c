//! Response parsing for panel deliberations.
//!
//! These functions extract structured data from free-form model output.
//! They are pure domain logic with no I/O.
//!
//! | Function | Use Case | Markers |
//! |----------|----------|---------|
//! | [`parse_vote`] | End-of-round vote | `VOTE:` / `REASONING:` |
//! | [`parse_argument_list`] | Pro/against extraction | numbered or bulleted lines |

use super::vote::{ParsedVote, VoteType};

const VOTE_MARKER: &str = "VOTE:";
const REASONING_MARKER: &str = "REASONING:";

/// Maximum number of items kept by [`parse_argument_list`]
pub const MAX_ARGUMENTS: usize = 5;

/// Parse a vote response.
///
/// Reads the line following the first `VOTE:` marker. `DISAGREE` is checked
/// before `AGREE` because the former contains the latter. Anything else
/// (no marker, or neither token) is an abstention.
///
/// The rationale is everything after `REASONING:` when present, otherwise
/// the whole raw response.
///
/// # Examples
///
/// ```
/// use council_domain::quorum::{parse_vote, VoteType};
///
/// let parsed = parse_vote("VOTE: DISAGREE\nREASONING: I have concerns.");
/// assert_eq!(parsed.vote, VoteType::Disagree);
/// assert_eq!(parsed.rationale, "I have concerns.");
/// ```
pub fn parse_vote(response: &str) -> ParsedVote {
    let vote = match response.find(VOTE_MARKER) {
        Some(idx) => {
            let vote_line = response[idx + VOTE_MARKER.len()..]
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .to_uppercase();

            if vote_line.contains("DISAGREE") {
                VoteType::Disagree
            } else if vote_line.contains("AGREE") {
                VoteType::Agree
            } else {
                VoteType::Abstain
            }
        }
        None => VoteType::Abstain,
    };

    let rationale = match response.find(REASONING_MARKER) {
        Some(idx) => response[idx + REASONING_MARKER.len()..].trim().to_string(),
        None => response.to_string(),
    };

    ParsedVote { vote, rationale }
}

/// Parse a numbered or bulleted list into at most [`MAX_ARGUMENTS`] items.
///
/// Leading numbering (`1.`, `2)`) and bullets (`-`, `*`, `•`) are stripped;
/// blank lines are dropped.
pub fn parse_argument_list(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .take(MAX_ARGUMENTS)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0
        && let Some(rest) = line[digits..]
            .strip_prefix('.')
            .or_else(|| line[digits..].strip_prefix(')'))
    {
        return rest.trim();
    }

    for bullet in ['-', '*', '•'] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest.trim();
        }
    }

    line
}
