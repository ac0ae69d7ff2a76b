use quest_core::model::{LeaderboardEntry, SessionContext, Standing, podium, rank_entries};

use crate::api::Api;
use crate::error::ApiError;

pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Leaderboard {
    pub standings: Vec<Standing>,
}

impl Leaderboard {
    /// Top three, then everyone else.
    #[must_use]
    pub fn podium(&self) -> (&[Standing], &[Standing]) {
        podium(&self.standings)
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&Standing> {
        self.standings.iter().find(|s| s.is_current_user)
    }
}

#[derive(Clone)]
pub struct LeaderboardService {
    api: Api,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Public ranking; the current user is recognised from the token's `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request failure.
    pub async fn standings(
        &self,
        ctx: &SessionContext,
        limit: Option<u32>,
    ) -> Result<Leaderboard, ApiError> {
        let limit = limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT).max(1);
        let entries: Vec<LeaderboardEntry> = self
            .api
            .get_list(&format!("leaderboard?limit={limit}"), None)
            .await?;
        let current = ctx.auth().and_then(|auth| auth.user_id());
        Ok(Leaderboard {
            standings: rank_entries(entries, current),
        })
    }
}
