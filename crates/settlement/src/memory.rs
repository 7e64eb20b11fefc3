//! An in-memory `CompetitionStore` for exercising the settlement services
//! without a database. Each write method applies all of its effects under
//! one lock acquisition, mirroring the transactional guarantees of the
//! real repository.

use crate::store::{CompetitionStore, TransferAware};
use analytics::RiskMetricsRecord;
use chrono::DateTime;
use core_types::{
    ContestMeta, ContestType, FinishRecord, OutcomeClass, PortfolioSnapshot, Prediction,
    PredictionEvent, RatingScope, ScoreAggregate, SkillRating,
};
use database::DbError;
use rating::RatedCompetitor;
use scoring::ScoredPrediction;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    next_id: u128,
    contests: HashMap<Uuid, ContestMeta>,
    finish_orders: HashMap<Uuid, Vec<FinishRecord>>,
    ratings: HashMap<(String, Uuid), RatedCompetitor>,
    scopes_written: Vec<String>,
    snapshots: HashMap<(Uuid, Uuid), Vec<PortfolioSnapshot>>,
    risk_records: HashMap<(Uuid, Uuid), RiskMetricsRecord>,
    risk_series: HashMap<(Uuid, Uuid), Vec<RiskMetricsRecord>>,
    events: HashMap<Uuid, PredictionEvent>,
    predictions: HashMap<Uuid, Vec<Prediction>>,
    aggregates: HashMap<(Uuid, Uuid), ScoreAggregate>,
    transfers: HashMap<(Uuid, Uuid), u64>,
}

pub(crate) struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn add_contest(&self, arena_id: Option<String>) -> Uuid {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let next_id = inner.next_id;
        let contest_id = Uuid::from_u128(0xC000 + inner.next_id);
        inner.contests.insert(
            contest_id,
            ContestMeta {
                contest_id,
                name: format!("contest-{}", next_id),
                contest_type: ContestType::Trading,
                arena_id,
                start_date: Some(DateTime::from_timestamp(1_700_000_000, 0).unwrap()),
                end_date: Some(DateTime::from_timestamp(1_700_600_000, 0).unwrap()),
            },
        );
        contest_id
    }

    pub fn set_finish_order(&self, contest_id: Uuid, order: Vec<FinishRecord>) {
        self.inner
            .lock()
            .unwrap()
            .finish_orders
            .insert(contest_id, order);
    }

    pub fn seed_rating(&self, scope: &RatingScope, competitor_id: Uuid, rating: SkillRating) {
        self.inner.lock().unwrap().ratings.insert(
            (scope.storage_key(), competitor_id),
            RatedCompetitor {
                rating,
                ordinal: 0.0,
            },
        );
    }

    pub fn rating(&self, scope: &RatingScope, competitor_id: Uuid) -> Option<RatedCompetitor> {
        self.inner
            .lock()
            .unwrap()
            .ratings
            .get(&(scope.storage_key(), competitor_id))
            .copied()
    }

    pub fn scopes_written(&self) -> Vec<String> {
        self.inner.lock().unwrap().scopes_written.clone()
    }

    /// Replaces the snapshot series for a (participant, contest) pair.
    pub fn add_snapshots(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
        series: Vec<PortfolioSnapshot>,
    ) {
        self.inner
            .lock()
            .unwrap()
            .snapshots
            .insert((participant_id, contest_id), series);
    }

    pub fn risk_record(&self, participant_id: Uuid, contest_id: Uuid) -> Option<RiskMetricsRecord> {
        self.inner
            .lock()
            .unwrap()
            .risk_records
            .get(&(participant_id, contest_id))
            .cloned()
    }

    pub fn risk_series_len(&self, participant_id: Uuid, contest_id: Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .risk_series
            .get(&(participant_id, contest_id))
            .map_or(0, Vec::len)
    }

    pub fn add_transfers(&self, participant_id: Uuid, contest_id: Uuid, count: u64) {
        self.inner
            .lock()
            .unwrap()
            .transfers
            .insert((participant_id, contest_id), count);
    }

    pub fn add_event(&self, contest_id: Uuid, outcome: Option<OutcomeClass>) -> PredictionEvent {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let event = PredictionEvent {
            event_id: Uuid::from_u128(0xE000 + inner.next_id),
            contest_id,
            description: format!("event-{}", inner.next_id),
            outcome,
        };
        inner.events.insert(event.event_id, event.clone());
        event
    }

    pub fn add_prediction(&self, prediction: Prediction) {
        self.inner
            .lock()
            .unwrap()
            .predictions
            .entry(prediction.event_id)
            .or_default()
            .push(prediction);
    }

    pub fn aggregates_for(&self, contest_id: Uuid) -> Vec<ScoreAggregate> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<ScoreAggregate> = inner
            .aggregates
            .values()
            .filter(|aggregate| aggregate.contest_id == contest_id)
            .cloned()
            .collect();
        rows.sort_by_key(|aggregate| aggregate.competitor_id);
        rows
    }
}

impl CompetitionStore for MemoryStore {
    async fn contest(&self, contest_id: Uuid) -> Result<Option<ContestMeta>, DbError> {
        Ok(self.inner.lock().unwrap().contests.get(&contest_id).cloned())
    }

    async fn finish_order(&self, contest_id: Uuid) -> Result<Vec<FinishRecord>, DbError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .finish_orders
            .get(&contest_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn ratings(
        &self,
        scope: &RatingScope,
        competitor_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, SkillRating>, DbError> {
        let inner = self.inner.lock().unwrap();
        let key = scope.storage_key();
        Ok(competitor_ids
            .iter()
            .filter_map(|id| {
                inner
                    .ratings
                    .get(&(key.clone(), *id))
                    .map(|rated| (*id, rated.rating))
            })
            .collect())
    }

    async fn save_ratings(
        &self,
        scope: &RatingScope,
        ratings: &BTreeMap<Uuid, RatedCompetitor>,
    ) -> Result<(), DbError> {
        let mut inner = self.inner.lock().unwrap();
        let key = scope.storage_key();
        for (competitor_id, rated) in ratings {
            inner.ratings.insert((key.clone(), *competitor_id), *rated);
        }
        if !inner.scopes_written.contains(&key) {
            inner.scopes_written.push(key);
        }
        Ok(())
    }

    async fn snapshots(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
    ) -> Result<Vec<PortfolioSnapshot>, DbError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .snapshots
            .get(&(participant_id, contest_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn save_risk_metrics(&self, record: &RiskMetricsRecord) -> Result<(), DbError> {
        let mut inner = self.inner.lock().unwrap();
        let key = (record.participant_id, record.contest_id);
        inner.risk_records.insert(key, record.clone());
        inner.risk_series.entry(key).or_default().push(record.clone());
        Ok(())
    }

    async fn event(&self, event_id: Uuid) -> Result<Option<PredictionEvent>, DbError> {
        Ok(self.inner.lock().unwrap().events.get(&event_id).cloned())
    }

    async fn predictions_for_event(&self, event_id: Uuid) -> Result<Vec<Prediction>, DbError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .predictions
            .get(&event_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn apply_scores(
        &self,
        contest_id: Uuid,
        scored: &[ScoredPrediction],
    ) -> Result<(), DbError> {
        let mut inner = self.inner.lock().unwrap();
        for score in scored {
            let aggregate = inner
                .aggregates
                .entry((score.predictor_id, contest_id))
                .or_insert_with(|| ScoreAggregate::empty(score.predictor_id, contest_id));
            scoring::apply_score(aggregate, score);
        }
        Ok(())
    }

    async fn aggregates(&self, contest_id: Uuid) -> Result<Vec<ScoreAggregate>, DbError> {
        Ok(self.aggregates_for(contest_id))
    }
}

impl TransferAware for MemoryStore {
    async fn transfer_count(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
    ) -> Result<u64, DbError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .transfers
            .get(&(participant_id, contest_id))
            .copied()
            .unwrap_or(0))
    }
}
