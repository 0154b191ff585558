//! Vote reconciliation for a single post or reply.
//!
//! Three signals can disagree about what the viewer voted: an optimistic
//! client-side override, the vote the server reports, and the raw voter id
//! lists. They are consulted in that order and the first one that yields a
//! direction wins.

use plaza_types::models::{Vote, VoteSnapshot};
use tracing::trace;

/// Resolved vote plus the selection flags derived from it.
/// The flags are computed on read so they can never drift from `vote`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteState {
    vote: Option<Vote>,
}

impl VoteState {
    pub fn vote(&self) -> Option<Vote> {
        self.vote
    }

    pub fn is_up_selected(&self) -> bool {
        self.vote == Some(Vote::Up)
    }

    pub fn is_down_selected(&self) -> bool {
        self.vote == Some(Vote::Down)
    }
}

/// Resolve the viewer's vote on `snapshot`.
///
/// `current_user_id` is only used for the voter-list fallback. It is read as a
/// number; integral forms such as `"7.0"` or `"1e1"` name users 7 and 10, while
/// blank, fractional or non-numeric ids match nobody. A user listed as both
/// upvoter and downvoter resolves to `Up`.
pub fn resolve_vote(
    snapshot: &VoteSnapshot,
    current_user_id: Option<&str>,
    local_override: Option<Vote>,
) -> VoteState {
    if let Some(vote) = local_override {
        return VoteState { vote: Some(vote) };
    }

    if let Some(vote) = snapshot.explicit_vote.as_deref().and_then(Vote::parse_explicit) {
        return VoteState { vote: Some(vote) };
    }

    let vote = current_user_id.and_then(parse_user_id).and_then(|uid| {
        if snapshot.upvoter_ids.contains(&uid) {
            Some(Vote::Up)
        } else if snapshot.downvoter_ids.contains(&uid) {
            Some(Vote::Down)
        } else {
            None
        }
    });

    VoteState { vote }
}

fn parse_user_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(id);
    }
    // Integral float spellings
    let value = trimmed.parse::<f64>().ok()?;
    let in_range = value.is_finite() && value.abs() < i64::MAX as f64;
    (in_range && value.fract() == 0.0).then(|| value as i64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    explicit_vote: Option<String>,
    upvoter_ids: Vec<i64>,
    downvoter_ids: Vec<i64>,
    current_user_id: Option<String>,
    local_override: Option<Vote>,
}

impl MemoKey {
    fn matches(&self, snapshot: &VoteSnapshot, current_user_id: Option<&str>, local_override: Option<Vote>) -> bool {
        self.local_override == local_override
            && self.current_user_id.as_deref() == current_user_id
            && self.explicit_vote == snapshot.explicit_vote
            && self.upvoter_ids == snapshot.upvoter_ids
            && self.downvoter_ids == snapshot.downvoter_ids
    }
}

/// Memoizing wrapper around [`resolve_vote`], one per rendered post/reply.
/// Recomputes only when one of the inputs differs from the previous call.
#[derive(Debug, Default)]
pub struct VoteResolver {
    last: Option<(MemoKey, VoteState)>,
    recomputations: u64,
}

impl VoteResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &mut self,
        snapshot: &VoteSnapshot,
        current_user_id: Option<&str>,
        local_override: Option<Vote>,
    ) -> VoteState {
        if let Some((key, state)) = &self.last {
            if key.matches(snapshot, current_user_id, local_override) {
                return *state;
            }
        }

        let state = resolve_vote(snapshot, current_user_id, local_override);
        self.recomputations += 1;
        trace!(vote = ?state.vote(), "vote recomputed");

        self.last = Some((
            MemoKey {
                explicit_vote: snapshot.explicit_vote.clone(),
                upvoter_ids: snapshot.upvoter_ids.clone(),
                downvoter_ids: snapshot.downvoter_ids.clone(),
                current_user_id: current_user_id.map(str::to_owned),
                local_override,
            },
            state,
        ));
        state
    }

    /// Number of times the underlying resolution actually ran.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
