use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// One row of `GET /leaderboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: UserId,
    #[serde(default, alias = "username")]
    pub name: String,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub rank: usize,
    pub entry: LeaderboardEntry,
    pub is_current_user: bool,
}

/// Ranks entries by backend order (1-based) and flags the current user.
#[must_use]
pub fn rank_entries(entries: Vec<LeaderboardEntry>, current: Option<UserId>) -> Vec<Standing> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| Standing {
            rank: index + 1,
            is_current_user: current.is_some_and(|id| id == entry.id),
            entry,
        })
        .collect()
}

/// Splits standings into the podium (top three) and the rest.
#[must_use]
pub fn podium(standings: &[Standing]) -> (&[Standing], &[Standing]) {
    standings.split_at(standings.len().min(3))
}
