use crate::error::RatingError;
use crate::model::{self, RankedBelief};
use configuration::RatingSettings;
use core_types::{FinishRecord, SkillRating};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use uuid::Uuid;

/// A competitor's posterior belief plus the derived display ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatedCompetitor {
    pub rating: SkillRating,
    pub ordinal: f64,
}

/// A stateless calculator that applies one contest's finish order to the
/// competitors' skill beliefs.
///
/// Persistence of "current" ratings is the caller's concern: priors come in
/// as an explicit map, posteriors go out as an explicit map. Competitors
/// absent from the prior map are seeded from the default prior.
#[derive(Debug, Clone)]
pub struct RatingEngine {
    settings: RatingSettings,
}

impl RatingEngine {
    /// Creates a new `RatingEngine` with the given model parameters.
    pub fn new(settings: RatingSettings) -> Result<Self, RatingError> {
        // Validate that the model parameters are logical.
        if settings.sigma <= 0.0 {
            return Err(RatingError::InvalidParameters(
                "prior sigma must be greater than 0".to_string(),
            ));
        }
        if settings.beta <= 0.0 {
            return Err(RatingError::InvalidParameters(
                "beta must be greater than 0".to_string(),
            ));
        }
        if settings.kappa <= 0.0 || settings.kappa >= 1.0 {
            return Err(RatingError::InvalidParameters(
                "kappa must be between 0 and 1".to_string(),
            ));
        }
        Ok(Self { settings })
    }

    /// The prior assigned to a competitor with no history in a scope.
    pub fn default_prior(&self) -> SkillRating {
        SkillRating::new(self.settings.mu, self.settings.sigma)
    }

    /// The conservative scalar used to display and sort a belief.
    pub fn ordinal(&self, rating: &SkillRating) -> f64 {
        rating.ordinal(
            self.settings.ordinal_z,
            self.settings.ordinal_alpha,
            self.settings.ordinal_target,
        )
    }

    /// Treats the finish order as a single multi-competitor ranked match
    /// and returns the posterior belief for every competitor on the board.
    ///
    /// The output always has exactly one entry per input competitor, each
    /// with `sigma > 0`.
    pub fn update_ratings(
        &self,
        leaderboard: &[FinishRecord],
        priors: &HashMap<Uuid, SkillRating>,
    ) -> Result<BTreeMap<Uuid, RatedCompetitor>, RatingError> {
        let mut beliefs = Vec::with_capacity(leaderboard.len());
        let mut seen = BTreeMap::new();

        for entry in leaderboard {
            if seen.insert(entry.competitor_id, ()).is_some() {
                return Err(RatingError::DuplicateCompetitor(entry.competitor_id));
            }
            let prior = priors
                .get(&entry.competitor_id)
                .copied()
                .unwrap_or_else(|| self.default_prior());
            if prior.sigma <= 0.0 {
                return Err(RatingError::InvalidPrior(entry.competitor_id));
            }
            beliefs.push(RankedBelief {
                mu: prior.mu,
                sigma: prior.sigma,
                rank: entry.finish_rank,
            });
        }

        model::update(&mut beliefs, self.settings.beta, self.settings.kappa);

        let updated = leaderboard
            .iter()
            .zip(beliefs)
            .map(|(entry, belief)| {
                let rating = SkillRating::new(belief.mu, belief.sigma);
                let ordinal = self.ordinal(&rating);
                (entry.competitor_id, RatedCompetitor { rating, ordinal })
            })
            .collect::<BTreeMap<_, _>>();

        debug!(
            competitors = updated.len(),
            "applied ranked rating update"
        );
        Ok(updated)
    }
}
