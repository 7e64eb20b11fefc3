use analytics::RiskMetricsRecord;
use core_types::{
    ContestMeta, FinishRecord, PortfolioSnapshot, Prediction, PredictionEvent, RatingScope,
    ScoreAggregate, SkillRating,
};
use database::{DbError, DbRepository};
use rating::RatedCompetitor;
use scoring::ScoredPrediction;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// The persistence surface the settlement services run against.
///
/// `DbRepository` is the production implementation; tests run against an
/// in-memory store. Methods that write multiple rows are each one atomic
/// unit: implementations must commit all of a call's effects or none.
#[allow(async_fn_in_trait)]
pub trait CompetitionStore {
    async fn contest(&self, contest_id: Uuid) -> Result<Option<ContestMeta>, DbError>;

    async fn finish_order(&self, contest_id: Uuid) -> Result<Vec<FinishRecord>, DbError>;

    /// Current ratings of the listed competitors within a scope.
    /// Competitors with no history in the scope are absent from the map.
    async fn ratings(
        &self,
        scope: &RatingScope,
        competitor_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, SkillRating>, DbError>;

    async fn save_ratings(
        &self,
        scope: &RatingScope,
        ratings: &BTreeMap<Uuid, RatedCompetitor>,
    ) -> Result<(), DbError>;

    async fn snapshots(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
    ) -> Result<Vec<PortfolioSnapshot>, DbError>;

    /// Upserts the current risk record and appends its time-series row,
    /// atomically.
    async fn save_risk_metrics(&self, record: &RiskMetricsRecord) -> Result<(), DbError>;

    async fn event(&self, event_id: Uuid) -> Result<Option<PredictionEvent>, DbError>;

    async fn predictions_for_event(&self, event_id: Uuid) -> Result<Vec<Prediction>, DbError>;

    async fn apply_scores(
        &self,
        contest_id: Uuid,
        scored: &[ScoredPrediction],
    ) -> Result<(), DbError>;

    async fn aggregates(&self, contest_id: Uuid) -> Result<Vec<ScoreAggregate>, DbError>;
}

/// Capability extension for stores that track balance transfers.
///
/// Not every snapshot provider records transfer history. Callers that need
/// the no-transfer verification bound on this trait; a store without the
/// capability simply never satisfies the bound, so the check cannot be
/// invoked against it by accident.
#[allow(async_fn_in_trait)]
pub trait TransferAware: CompetitionStore {
    /// Number of transfers recorded for the participant during the contest.
    async fn transfer_count(&self, participant_id: Uuid, contest_id: Uuid)
        -> Result<u64, DbError>;
}

impl CompetitionStore for DbRepository {
    async fn contest(&self, contest_id: Uuid) -> Result<Option<ContestMeta>, DbError> {
        self.get_contest(contest_id).await
    }

    async fn finish_order(&self, contest_id: Uuid) -> Result<Vec<FinishRecord>, DbError> {
        self.get_finish_order(contest_id).await
    }

    async fn ratings(
        &self,
        scope: &RatingScope,
        competitor_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, SkillRating>, DbError> {
        self.get_ratings(scope, competitor_ids).await
    }

    async fn save_ratings(
        &self,
        scope: &RatingScope,
        ratings: &BTreeMap<Uuid, RatedCompetitor>,
    ) -> Result<(), DbError> {
        self.upsert_ratings(scope, ratings).await
    }

    async fn snapshots(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
    ) -> Result<Vec<PortfolioSnapshot>, DbError> {
        self.get_snapshots(participant_id, contest_id).await
    }

    async fn save_risk_metrics(&self, record: &RiskMetricsRecord) -> Result<(), DbError> {
        DbRepository::save_risk_metrics(self, record).await
    }

    async fn event(&self, event_id: Uuid) -> Result<Option<PredictionEvent>, DbError> {
        self.get_event(event_id).await
    }

    async fn predictions_for_event(&self, event_id: Uuid) -> Result<Vec<Prediction>, DbError> {
        self.get_predictions(event_id).await
    }

    async fn apply_scores(
        &self,
        contest_id: Uuid,
        scored: &[ScoredPrediction],
    ) -> Result<(), DbError> {
        DbRepository::apply_scores(self, contest_id, scored).await
    }

    async fn aggregates(&self, contest_id: Uuid) -> Result<Vec<ScoreAggregate>, DbError> {
        self.get_aggregates(contest_id).await
    }
}

impl TransferAware for DbRepository {
    async fn transfer_count(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
    ) -> Result<u64, DbError> {
        self.count_transfers(participant_id, contest_id).await
    }
}
