use crate::DbError;
use analytics::RiskMetricsRecord;
use chrono::{DateTime, Utc};
use core_types::{
    ContestMeta, ContestType, FinishRecord, OutcomeClass, PortfolioSnapshot, Prediction,
    PredictionEvent, RatingScope, ScoreAggregate, SkillRating,
};
use rating::RatedCompetitor;
use scoring::ScoredPrediction;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
///
/// Queries use runtime binding rather than compile-time macros so the
/// crate builds without a live database.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==========================================================================
    // Contests
    // ==========================================================================

    /// Fetches a contest's metadata, or `None` if it does not exist.
    pub async fn get_contest(&self, contest_id: Uuid) -> Result<Option<ContestMeta>, DbError> {
        let row = sqlx::query(
            "SELECT contest_id, name, contest_type, arena_id, start_date, end_date \
             FROM contests WHERE contest_id = $1",
        )
        .bind(contest_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(contest_from_row).transpose()
    }

    /// Fetches the finish order of a concluded contest, best rank first.
    pub async fn get_finish_order(&self, contest_id: Uuid) -> Result<Vec<FinishRecord>, DbError> {
        let rows = sqlx::query(
            "SELECT competitor_id, finish_rank FROM contest_results \
             WHERE contest_id = $1 ORDER BY finish_rank ASC",
        )
        .bind(contest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| FinishRecord {
                competitor_id: row.get("competitor_id"),
                finish_rank: row.get::<i32, _>("finish_rank") as u32,
            })
            .collect())
    }

    /// Every participant with at least one snapshot in the contest.
    pub async fn get_participants(&self, contest_id: Uuid) -> Result<Vec<Uuid>, DbError> {
        let rows = sqlx::query(
            "SELECT DISTINCT participant_id FROM portfolio_snapshots \
             WHERE contest_id = $1 ORDER BY participant_id",
        )
        .bind(contest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.get("participant_id")).collect())
    }

    // ==========================================================================
    // Skill ratings
    // ==========================================================================

    /// Fetches the current rating of each listed competitor within a scope.
    /// Competitors with no history in the scope are simply absent.
    pub async fn get_ratings(
        &self,
        scope: &RatingScope,
        competitor_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, SkillRating>, DbError> {
        let rows = sqlx::query(
            "SELECT competitor_id, mu, sigma FROM skill_ratings \
             WHERE scope = $1 AND competitor_id = ANY($2)",
        )
        .bind(scope.storage_key())
        .bind(competitor_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.get("competitor_id"),
                    SkillRating::new(row.get("mu"), row.get("sigma")),
                )
            })
            .collect())
    }

    /// Replaces the current ratings of a scope's competitors in a single
    /// transaction; a partially-updated pool is never observable.
    pub async fn upsert_ratings(
        &self,
        scope: &RatingScope,
        ratings: &BTreeMap<Uuid, RatedCompetitor>,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        let scope_key = scope.storage_key();

        for (competitor_id, rated) in ratings {
            sqlx::query(
                "INSERT INTO skill_ratings (competitor_id, scope, mu, sigma, ordinal, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, NOW()) \
                 ON CONFLICT (competitor_id, scope) DO UPDATE SET \
                 mu = EXCLUDED.mu, sigma = EXCLUDED.sigma, ordinal = EXCLUDED.ordinal, \
                 updated_at = NOW()",
            )
            .bind(competitor_id)
            .bind(&scope_key)
            .bind(rated.rating.mu)
            .bind(rated.rating.sigma)
            .bind(rated.ordinal)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(scope = %scope.storage_key(), competitors = ratings.len(), "rating pool committed");
        Ok(())
    }

    // ==========================================================================
    // Portfolio snapshots & risk metrics
    // ==========================================================================

    /// Fetches a participant's snapshot series for a contest, oldest first.
    pub async fn get_snapshots(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
    ) -> Result<Vec<PortfolioSnapshot>, DbError> {
        let rows = sqlx::query(
            "SELECT ts, total_value FROM portfolio_snapshots \
             WHERE participant_id = $1 AND contest_id = $2 ORDER BY ts ASC",
        )
        .bind(participant_id)
        .bind(contest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PortfolioSnapshot {
                timestamp: row.get("ts"),
                total_value: row.get("total_value"),
            })
            .collect())
    }

    /// Persists a computed risk record: the current-record upsert and the
    /// time-series insert succeed or fail together in one transaction.
    pub async fn save_risk_metrics(&self, record: &RiskMetricsRecord) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO risk_metrics (\
                 participant_id, contest_id, simple_return, annualized_return, \
                 max_drawdown, calmar_ratio, downside_deviation, sortino_ratio, \
                 snapshot_count, computed_at\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (participant_id, contest_id) DO UPDATE SET \
                 simple_return = EXCLUDED.simple_return, \
                 annualized_return = EXCLUDED.annualized_return, \
                 max_drawdown = EXCLUDED.max_drawdown, \
                 calmar_ratio = EXCLUDED.calmar_ratio, \
                 downside_deviation = EXCLUDED.downside_deviation, \
                 sortino_ratio = EXCLUDED.sortino_ratio, \
                 snapshot_count = EXCLUDED.snapshot_count, \
                 computed_at = EXCLUDED.computed_at",
        )
        .bind(record.participant_id)
        .bind(record.contest_id)
        .bind(record.simple_return)
        .bind(record.annualized_return)
        .bind(record.max_drawdown)
        .bind(record.calmar_ratio)
        .bind(record.downside_deviation)
        .bind(record.sortino_ratio)
        .bind(record.snapshot_count as i32)
        .bind(record.computed_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO risk_metrics_snapshots (\
                 participant_id, contest_id, ts, simple_return, max_drawdown, \
                 calmar_ratio, sortino_ratio\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(record.participant_id)
        .bind(record.contest_id)
        .bind(record.computed_at)
        .bind(record.simple_return)
        .bind(record.max_drawdown)
        .bind(record.calmar_ratio)
        .bind(record.sortino_ratio)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Fetches the current risk record for a (participant, contest) pair.
    pub async fn get_risk_metrics(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
    ) -> Result<RiskMetricsRecord, DbError> {
        let row = sqlx::query(
            "SELECT participant_id, contest_id, simple_return, annualized_return, \
                    max_drawdown, calmar_ratio, downside_deviation, sortino_ratio, \
                    snapshot_count, computed_at \
             FROM risk_metrics WHERE participant_id = $1 AND contest_id = $2",
        )
        .bind(participant_id)
        .bind(contest_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(RiskMetricsRecord {
            participant_id: row.get("participant_id"),
            contest_id: row.get("contest_id"),
            simple_return: row.get("simple_return"),
            annualized_return: row.get("annualized_return"),
            max_drawdown: row.get("max_drawdown"),
            calmar_ratio: row.get("calmar_ratio"),
            downside_deviation: row.get("downside_deviation"),
            sortino_ratio: row.get("sortino_ratio"),
            snapshot_count: row.get::<i32, _>("snapshot_count") as u32,
            computed_at: row.get("computed_at"),
        })
    }

    /// Number of transfers recorded for a participant within a contest.
    pub async fn count_transfers(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
    ) -> Result<u64, DbError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS transfer_count FROM transfers \
             WHERE participant_id = $1 AND contest_id = $2",
        )
        .bind(participant_id)
        .bind(contest_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i64, _>("transfer_count") as u64)
    }

    // ==========================================================================
    // Predictions & scoring
    // ==========================================================================

    /// Fetches an event, or `None` if it does not exist. The outcome
    /// column is null until the event resolves.
    pub async fn get_event(&self, event_id: Uuid) -> Result<Option<PredictionEvent>, DbError> {
        let row = sqlx::query(
            "SELECT event_id, contest_id, description, outcome \
             FROM prediction_events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(event_from_row).transpose()
    }

    /// Every prediction submitted against an event.
    pub async fn get_predictions(&self, event_id: Uuid) -> Result<Vec<Prediction>, DbError> {
        let rows = sqlx::query(
            "SELECT predictor_id, event_id, contest_id, guessed, confidence \
             FROM predictions WHERE event_id = $1 ORDER BY created_at ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(prediction_from_row).collect()
    }

    /// Folds scored predictions into the per-competitor aggregates, one
    /// upsert-increment per prediction, all inside one transaction.
    pub async fn apply_scores(
        &self,
        contest_id: Uuid,
        scored: &[ScoredPrediction],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for score in scored {
            sqlx::query(
                "INSERT INTO score_aggregates (\
                     competitor_id, contest_id, total_predictions, correct_predictions, brier_sum\
                 ) VALUES ($1, $2, 1, $3, $4) \
                 ON CONFLICT (competitor_id, contest_id) DO UPDATE SET \
                     total_predictions = score_aggregates.total_predictions + 1, \
                     correct_predictions = score_aggregates.correct_predictions + $3, \
                     brier_sum = score_aggregates.brier_sum + $4",
            )
            .bind(score.predictor_id)
            .bind(contest_id)
            .bind(i64::from(score.is_correct))
            .bind(score.brier_term)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Every score aggregate recorded for a contest.
    pub async fn get_aggregates(&self, contest_id: Uuid) -> Result<Vec<ScoreAggregate>, DbError> {
        let rows = sqlx::query(
            "SELECT competitor_id, contest_id, total_predictions, correct_predictions, brier_sum \
             FROM score_aggregates WHERE contest_id = $1 ORDER BY competitor_id",
        )
        .bind(contest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ScoreAggregate {
                competitor_id: row.get("competitor_id"),
                contest_id: row.get("contest_id"),
                total_predictions: row.get::<i64, _>("total_predictions") as u64,
                correct_predictions: row.get::<i64, _>("correct_predictions") as u64,
                brier_sum: row.get("brier_sum"),
            })
            .collect())
    }
}

// ==============================================================================
// Row decoding
// ==============================================================================

fn contest_from_row(row: PgRow) -> Result<ContestMeta, DbError> {
    Ok(ContestMeta {
        contest_id: row.get("contest_id"),
        name: row.get("name"),
        contest_type: ContestType::parse(row.get::<&str, _>("contest_type"))?,
        arena_id: row.get("arena_id"),
        start_date: row.get::<Option<DateTime<Utc>>, _>("start_date"),
        end_date: row.get::<Option<DateTime<Utc>>, _>("end_date"),
    })
}

fn event_from_row(row: PgRow) -> Result<PredictionEvent, DbError> {
    let outcome = row
        .get::<Option<&str>, _>("outcome")
        .map(OutcomeClass::parse)
        .transpose()?;

    Ok(PredictionEvent {
        event_id: row.get("event_id"),
        contest_id: row.get("contest_id"),
        description: row.get("description"),
        outcome,
    })
}

fn prediction_from_row(row: PgRow) -> Result<Prediction, DbError> {
    Ok(Prediction {
        predictor_id: row.get("predictor_id"),
        event_id: row.get("event_id"),
        contest_id: row.get("contest_id"),
        guessed: OutcomeClass::parse(row.get::<&str, _>("guessed"))?,
        confidence: row.get("confidence"),
    })
}
