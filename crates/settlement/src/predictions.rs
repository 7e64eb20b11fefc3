use crate::error::SettlementError;
use crate::store::CompetitionStore;
use scoring::LeaderboardRow;
use tracing::info;
use uuid::Uuid;

/// Scores resolved events and assembles the prediction leaderboard.
pub struct PredictionSettler<'a, S> {
    store: &'a S,
}

impl<'a, S: CompetitionStore> PredictionSettler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Scores every prediction submitted against a resolved event and folds
    /// the results into the running aggregates. Returns the number of
    /// predictions scored; zero is a valid outcome for an event nobody
    /// predicted.
    pub async fn score_event(&self, event_id: Uuid) -> Result<usize, SettlementError> {
        let event = self
            .store
            .event(event_id)
            .await?
            .ok_or(SettlementError::EventNotFound(event_id))?;
        let predictions = self.store.predictions_for_event(event_id).await?;

        let scored = scoring::score_event(&event, &predictions)?;
        if !scored.is_empty() {
            self.store.apply_scores(event.contest_id, &scored).await?;
        }

        info!(%event_id, scored = scored.len(), "event scored");
        Ok(scored.len())
    }

    /// The contest's prediction leaderboard, ranked and ready to display.
    pub async fn leaderboard(&self, contest_id: Uuid) -> Result<Vec<LeaderboardRow>, SettlementError> {
        let aggregates = self.store.aggregates(contest_id).await?;
        Ok(scoring::leaderboard::assemble(&aggregates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use core_types::{OutcomeClass, Prediction, PredictionEvent};

    fn prediction(predictor: u128, event: &PredictionEvent, guessed: OutcomeClass, confidence: f64) -> Prediction {
        Prediction {
            predictor_id: Uuid::from_u128(predictor),
            event_id: event.event_id,
            contest_id: event.contest_id,
            guessed,
            confidence,
        }
    }

    #[tokio::test]
    async fn scoring_an_event_updates_the_aggregates() {
        let store = MemoryStore::new();
        let contest_id = store.add_contest(None);
        let event = store.add_event(contest_id, Some(OutcomeClass::Yes));
        store.add_prediction(prediction(1, &event, OutcomeClass::Yes, 0.7));
        store.add_prediction(prediction(2, &event, OutcomeClass::No, 0.6));

        let scored = PredictionSettler::new(&store)
            .score_event(event.event_id)
            .await
            .unwrap();
        assert_eq!(scored, 2);

        let aggregates = store.aggregates_for(contest_id);
        let winner = aggregates
            .iter()
            .find(|a| a.competitor_id == Uuid::from_u128(1))
            .unwrap();
        assert_eq!(winner.total_predictions, 1);
        assert_eq!(winner.correct_predictions, 1);
        assert!((winner.brier_sum - 0.09).abs() < 1e-12);

        let loser = aggregates
            .iter()
            .find(|a| a.competitor_id == Uuid::from_u128(2))
            .unwrap();
        assert_eq!(loser.correct_predictions, 0);
        assert!((loser.brier_sum - 0.36).abs() < 1e-12);
    }

    #[tokio::test]
    async fn aggregates_accumulate_across_events() {
        let store = MemoryStore::new();
        let contest_id = store.add_contest(None);
        let settler = PredictionSettler::new(&store);

        for outcome in [OutcomeClass::Yes, OutcomeClass::No] {
            let event = store.add_event(contest_id, Some(outcome));
            store.add_prediction(prediction(1, &event, OutcomeClass::Yes, 0.8));
            settler.score_event(event.event_id).await.unwrap();
        }

        let aggregates = store.aggregates_for(contest_id);
        let competitor = &aggregates[0];
        assert_eq!(competitor.total_predictions, 2);
        assert_eq!(competitor.correct_predictions, 1);
        // (1 - 0.8)^2 + 0.8^2
        assert!((competitor.brier_sum - 0.68).abs() < 1e-12);
    }

    #[tokio::test]
    async fn unresolved_event_is_a_validation_failure() {
        let store = MemoryStore::new();
        let contest_id = store.add_contest(None);
        let event = store.add_event(contest_id, None);
        store.add_prediction(prediction(1, &event, OutcomeClass::Yes, 0.7));

        let result = PredictionSettler::new(&store).score_event(event.event_id).await;

        let err = result.unwrap_err();
        assert!(err.is_validation());
        assert!(store.aggregates_for(contest_id).is_empty());
    }

    #[tokio::test]
    async fn event_with_no_predictions_scores_zero_and_touches_nothing() {
        let store = MemoryStore::new();
        let contest_id = store.add_contest(None);
        let event = store.add_event(contest_id, Some(OutcomeClass::No));

        let scored = PredictionSettler::new(&store)
            .score_event(event.event_id)
            .await
            .unwrap();

        assert_eq!(scored, 0);
        assert!(store.aggregates_for(contest_id).is_empty());
    }

    #[tokio::test]
    async fn missing_event_is_an_error() {
        let store = MemoryStore::new();
        let result = PredictionSettler::new(&store)
            .score_event(Uuid::from_u128(404))
            .await;
        assert!(matches!(result, Err(SettlementError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn leaderboard_ranks_the_accumulated_aggregates() {
        let store = MemoryStore::new();
        let contest_id = store.add_contest(None);
        let settler = PredictionSettler::new(&store);

        // Competitor 1 is right with high confidence, competitor 2 is
        // right with low confidence, competitor 3 is wrong.
        let event = store.add_event(contest_id, Some(OutcomeClass::Yes));
        store.add_prediction(prediction(1, &event, OutcomeClass::Yes, 0.9));
        store.add_prediction(prediction(2, &event, OutcomeClass::Yes, 0.55));
        store.add_prediction(prediction(3, &event, OutcomeClass::No, 0.8));
        settler.score_event(event.event_id).await.unwrap();

        let board = settler.leaderboard(contest_id).await.unwrap();

        assert_eq!(board.len(), 3);
        assert_eq!(board[0].competitor_id, Uuid::from_u128(1));
        assert_eq!(board[1].competitor_id, Uuid::from_u128(2));
        assert_eq!(board[2].competitor_id, Uuid::from_u128(3));
        assert_eq!(
            board.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(board[0].accuracy, 1.0);
        assert_eq!(board[2].accuracy, 0.0);
    }
}
