use crate::error::SettlementError;
use crate::store::CompetitionStore;
use core_types::{FinishRecord, RatingScope};
use rating::RatingEngine;
use tracing::{error, info};
use uuid::Uuid;

/// Applies a concluded contest's finish order to the skill-rating pools.
///
/// Ranking is auxiliary to contest settlement: a contest with no
/// leaderboard, or one that has vanished, is logged and skipped rather
/// than failing the caller.
pub struct RankingService<'a, S> {
    store: &'a S,
    engine: RatingEngine,
}

impl<'a, S: CompetitionStore> RankingService<'a, S> {
    pub fn new(store: &'a S, engine: RatingEngine) -> Self {
        Self { store, engine }
    }

    /// Updates the global pool and, for arena contests, the arena pool.
    ///
    /// The two scopes are independent, so they run concurrently; both must
    /// commit before the settlement counts as done.
    pub async fn settle_contest(&self, contest_id: Uuid) -> Result<(), SettlementError> {
        let finish_order = self.store.finish_order(contest_id).await?;
        if finish_order.is_empty() {
            info!(%contest_id, "contest has no leaderboard entries, skipping rating update");
            return Ok(());
        }

        let contest = match self.store.contest(contest_id).await? {
            Some(contest) => contest,
            None => {
                error!(%contest_id, "contest not found, skipping rating update");
                return Ok(());
            }
        };

        match contest.arena_id {
            Some(arena_id) => {
                let (global, arena) = tokio::join!(
                    self.update_scope(RatingScope::Global, &finish_order),
                    self.update_scope(RatingScope::Arena(arena_id), &finish_order),
                );
                global?;
                arena?;
            }
            None => self.update_scope(RatingScope::Global, &finish_order).await?,
        }

        info!(%contest_id, competitors = finish_order.len(), "contest ratings settled");
        Ok(())
    }

    /// One scope's update: load priors, apply the ranked update, commit.
    ///
    /// Priors come from the competitor's most recent rating *within this
    /// scope*; an arena pool is never seeded from global ratings.
    async fn update_scope(
        &self,
        scope: RatingScope,
        finish_order: &[FinishRecord],
    ) -> Result<(), SettlementError> {
        let competitor_ids: Vec<Uuid> =
            finish_order.iter().map(|entry| entry.competitor_id).collect();
        let priors = self.store.ratings(&scope, &competitor_ids).await?;
        let updated = self.engine.update_ratings(finish_order, &priors)?;
        self.store.save_ratings(&scope, &updated).await?;
        Ok(())
    }
}
