use crate::error::SettlementError;
use crate::store::{CompetitionStore, TransferAware};
use analytics::{RiskEngine, RiskMetricsRecord};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

/// Sequences the two risk calculations for one (participant, contest) pair
/// and persists the merged result as a single atomic unit.
///
/// If either calculation fails, nothing is written: the record upsert and
/// its time-series row only happen after both succeed, and the store
/// commits them in one transaction.
pub struct MetricsOrchestrator<'a, S> {
    store: &'a S,
    engine: RiskEngine,
}

impl<'a, S: CompetitionStore> MetricsOrchestrator<'a, S> {
    pub fn new(store: &'a S, engine: RiskEngine) -> Self {
        Self { store, engine }
    }

    /// Computes and persists all risk metrics for the pair, superseding any
    /// previously stored record.
    pub async fn calculate_and_save(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
    ) -> Result<RiskMetricsRecord, SettlementError> {
        let contest = self
            .store
            .contest(contest_id)
            .await?
            .ok_or(SettlementError::ContestNotFound(contest_id))?;
        let snapshots = self.store.snapshots(participant_id, contest_id).await?;

        let calmar = self.engine.calmar(&snapshots, &contest)?;
        let sortino = self.engine.sortino(&snapshots, &contest)?;

        let record = RiskMetricsRecord::from_parts(
            participant_id,
            contest_id,
            &calmar,
            &sortino,
            self.engine.settings().ratio_precision,
            Utc::now(),
        );

        self.store.save_risk_metrics(&record).await?;
        info!(
            %participant_id,
            %contest_id,
            calmar = %record.calmar_ratio,
            sortino = %record.sortino_ratio,
            "risk metrics saved"
        );
        Ok(record)
    }
}

impl<'a, S: TransferAware> MetricsOrchestrator<'a, S> {
    /// Like [`calculate_and_save`](Self::calculate_and_save), but first
    /// verifies that the participant moved no funds during the contest.
    ///
    /// The endpoint-ratio return calculation is only meaningful because
    /// intra-competition transfers are prohibited; a store that tracks
    /// transfer history lets us enforce that instead of trusting it.
    pub async fn calculate_and_save_verified(
        &self,
        participant_id: Uuid,
        contest_id: Uuid,
    ) -> Result<RiskMetricsRecord, SettlementError> {
        let transfers = self
            .store
            .transfer_count(participant_id, contest_id)
            .await?;
        if transfers > 0 {
            return Err(SettlementError::TransferActivity {
                participant_id,
                contest_id,
                transfers,
            });
        }
        self.calculate_and_save(participant_id, contest_id).await
    }
}
